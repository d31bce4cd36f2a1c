//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

/// Exponer detalles internos (solo en desarrollo)
static EXPOSE_INTERNAL_DETAILS: AtomicBool = AtomicBool::new(false);

/// Activar o desactivar los detalles internos en las respuestas 5xx
pub fn expose_internal_details(enabled: bool) {
    EXPOSE_INTERNAL_DETAILS.store(enabled, Ordering::Relaxed);
}

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Availability conflict: {0}")]
    AvailabilityConflict(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub code: String,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            details: None,
            code: code.to_string(),
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    fn with_internal_details(self, details: serde_json::Value) -> Self {
        if EXPOSE_INTERNAL_DETAILS.load(Ordering::Relaxed) {
            self.with_details(details)
        } else {
            self
        }
    }
}

impl AppError {
    /// Código HTTP asociado a cada error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::AvailabilityConflict(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            AppError::Database(_) | AppError::Hash(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn to_error_response(&self) -> ErrorResponse {
        match self {
            AppError::Database(e) => ErrorResponse::new(
                "Internal Server Error",
                "An error occurred while accessing the database",
                "INTERNAL_ERROR",
            )
            .with_internal_details(json!({ "sql_error": e.to_string() })),

            AppError::Validation(e) => ErrorResponse::new(
                "Validation Error",
                first_validation_message(e),
                "VALIDATION_ERROR",
            )
            .with_details(json!(e)),

            AppError::BadRequest(msg) => {
                ErrorResponse::new("Validation Error", msg.as_str(), "VALIDATION_ERROR")
            }

            AppError::Unauthorized(msg) => {
                ErrorResponse::new("Unauthorized", msg.as_str(), "UNAUTHORIZED")
            }

            AppError::Forbidden(msg) => ErrorResponse::new("Forbidden", msg.as_str(), "FORBIDDEN"),

            AppError::NotFound(msg) => ErrorResponse::new("Not Found", msg.as_str(), "NOT_FOUND"),

            AppError::AvailabilityConflict(msg) => {
                ErrorResponse::new("Availability Conflict", msg.as_str(), "AVAILABILITY_CONFLICT")
            }

            AppError::Conflict(msg) => ErrorResponse::new("Conflict", msg.as_str(), "CONFLICT"),

            AppError::RateLimitExceeded => ErrorResponse::new(
                "Rate Limit Exceeded",
                "Too many requests. Please try again later",
                "RATE_LIMIT_EXCEEDED",
            ),

            AppError::Hash(msg) => ErrorResponse::new(
                "Internal Server Error",
                "An error occurred while processing credentials",
                "INTERNAL_ERROR",
            )
            .with_internal_details(json!({ "hash_error": msg })),

            AppError::Internal(msg) => ErrorResponse::new(
                "Internal Server Error",
                "An unexpected error occurred",
                "INTERNAL_ERROR",
            )
            .with_internal_details(json!({ "internal_error": msg })),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("❌ {}", self);
        } else {
            tracing::warn!("⚠️ {}", self);
        }

        (status, Json(self.to_error_response())).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

fn first_validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| errors.iter().map(move |error| (field, error)))
        .map(|(field, error)| match &error.message {
            Some(message) => message.to_string(),
            None => format!("Invalid value for '{}'", field),
        })
        .next()
        .unwrap_or_else(|| "The provided data is invalid".to_string())
}

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: impl Into<Cow<'static, str>>) -> AppError {
    let mut error = ValidationError::new("invalid");
    error.message = Some(message.into());

    let mut errors = ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str) -> AppError {
    AppError::NotFound(format!("{} not found", resource))
}

/// Función helper para crear errores de acceso prohibido
pub fn forbidden_error(message: &str) -> AppError {
    AppError::Forbidden(message.to_string())
}

/// Función helper para crear errores internos
pub fn internal_error(message: &str) -> AppError {
    AppError::Internal(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(validation_error("startDate", "bad").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::AvailabilityConflict("taken".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(not_found_error("Car").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(forbidden_error("no").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::Unauthorized("no token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(internal_error("boom").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_message_is_surfaced() {
        let response = validation_error("endDate", "End date must be after start date")
            .to_error_response();
        assert_eq!(response.code, "VALIDATION_ERROR");
        assert_eq!(response.message, "End date must be after start date");
        assert!(response.details.is_some());
    }

    #[test]
    fn test_internal_details_hidden_by_default() {
        let response = internal_error("connection reset").to_error_response();
        assert_eq!(response.message, "An unexpected error occurred");
        assert!(response.details.is_none());
    }
}
