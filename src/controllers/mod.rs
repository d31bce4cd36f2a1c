//! Controladores
//!
//! Capa entre las rutas HTTP y los servicios/repositorios.

pub mod auth_controller;
pub mod booking_controller;
pub mod vehicle_controller;
