//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: precios,
//! disponibilidad y ciclo de vida de las reservas.

pub mod availability;
pub mod booking_service;
pub mod password;
pub mod pricing;
pub mod vehicle_locks;

pub use availability::AvailabilityChecker;
pub use booking_service::BookingService;
pub use vehicle_locks::VehicleLocks;
