//! Rutas HTTP
//!
//! Este módulo arma el router de Axum con todas las rutas de la API y
//! las capas comunes (rate limiting, trazas, compresión, CORS).

pub mod auth_routes;
pub mod booking_routes;
pub mod user_routes;
pub mod vehicle_routes;

use axum::{middleware, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors::cors_layer;
use crate::middleware::rate_limit::rate_limit_middleware;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_routes::create_auth_router(&state))
        .nest("/api/users", user_routes::create_user_router(&state))
        .nest("/api/cars", vehicle_routes::create_vehicle_router(&state))
        .nest("/api/bookings", booking_routes::create_booking_router(&state))
        .layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "car-rental-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
