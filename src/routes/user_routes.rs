use axum::{middleware, routing::get, Extension, Json, Router};

use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::user::UserResponse;
use crate::state::AppState;

pub fn create_user_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}

async fn me(Extension(auth_user): Extension<AuthenticatedUser>) -> Json<UserResponse> {
    Json(UserResponse::from(auth_user.user))
}
