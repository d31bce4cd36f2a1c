//! Backend de alquiler de vehículos
//!
//! Catálogo de vehículos, reservas con verificación de disponibilidad y
//! cálculo de precios, autenticación JWT y cliente HTTP tipado.

pub mod client;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
