use axum::{extract::State, http::StatusCode, middleware, routing::post, Json, Router};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{AuthResponse, SigninRequest, SignupRequest};
use crate::middleware::rate_limit::rate_limit_middleware;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::AppJson;

/// Rutas de autenticación, con un rate limit más estricto
pub fn create_auth_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route_layer(middleware::from_fn_with_state(
            state.rate_limiter.strict(),
            rate_limit_middleware,
        ))
}

async fn signup(
    State(state): State<AppState>,
    AppJson(request): AppJson<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let controller = AuthController::new(&state);
    let response = controller.signup(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn signin(
    State(state): State<AppState>,
    AppJson(request): AppJson<SigninRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let controller = AuthController::new(&state);
    let response = controller.signin(request).await?;
    Ok(Json(response))
}
