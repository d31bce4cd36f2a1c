//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! JWT y extractores de axum con errores uniformes.

pub mod errors;
pub mod extract;
pub mod jwt;
pub mod validation;
