//! Repositorios
//!
//! Acceso a datos detrás de traits, con implementación PostgreSQL y en memoria.

pub mod booking_repository;
pub mod memory;
pub mod user_repository;
pub mod vehicle_repository;

pub use booking_repository::{BookingRepository, PgBookingRepository};
pub use memory::{InMemoryBookingRepository, InMemoryUserRepository, InMemoryVehicleRepository};
pub use user_repository::{PgUserRepository, UserRepository};
pub use vehicle_repository::{PgVehicleRepository, VehicleRepository};
