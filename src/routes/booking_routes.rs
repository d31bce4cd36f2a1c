use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{BookingResponse, CreateBookingRequest, UpdateBookingStatusRequest};
use crate::middleware::auth::{admin_only_middleware, auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppPath};

/// Todas las rutas requieren autenticación; `/admin/all` además requiere admin
pub fn create_booking_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking).get(list_my_bookings))
        .route(
            "/admin/all",
            get(list_all_bookings).route_layer(middleware::from_fn(admin_only_middleware)),
        )
        .route("/:id", get(get_booking).put(update_booking))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    AppJson(request): AppJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let controller = BookingController::new(&state);
    let response = controller.create(&auth_user.requester(), request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_my_bookings(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller.list_mine(&auth_user.requester()).await?;
    Ok(Json(response))
}

async fn list_all_bookings(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller.list_all(&auth_user.requester()).await?;
    Ok(Json(response))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller.get(&auth_user.requester(), id).await?;
    Ok(Json(response))
}

async fn update_booking(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateBookingStatusRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller
        .update_status(&auth_user.requester(), id, request)
        .await?;
    Ok(Json(response))
}
