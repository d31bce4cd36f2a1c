//! Extractores con rechazos convertidos a `AppError`
//!
//! Los extractores estándar de axum responden con texto plano cuando el
//! cuerpo, la ruta o la query no se pueden deserializar; estos wrappers
//! mantienen la forma JSON de error de la API.

use axum::extract::{FromRequest, FromRequestParts};
use axum::response::{IntoResponse, Response};

use crate::utils::errors::AppError;

/// Body JSON
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl<T: serde::Serialize> IntoResponse for AppJson<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Parámetros de ruta
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Parámetros de query
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
