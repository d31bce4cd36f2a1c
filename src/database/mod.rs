//! Módulo de base de datos
//!
//! Maneja la conexión y operaciones con PostgreSQL

pub mod connection;

pub use connection::DatabaseConnection;

/// SQLSTATE de violación de restricción EXCLUDE
pub const EXCLUSION_VIOLATION: &str = "23P01";

/// SQLSTATE de violación de restricción UNIQUE
pub const UNIQUE_VIOLATION: &str = "23505";

/// Código SQLSTATE de un error de base de datos, si existe
pub fn sqlstate(error: &sqlx::Error) -> Option<String> {
    match error {
        sqlx::Error::Database(db_error) => db_error.code().map(|code| code.into_owned()),
        _ => None,
    }
}
