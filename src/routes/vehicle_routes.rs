use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{delete, get, post, put, MethodRouter},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{
    AvailabilityQuery, AvailabilityResponse, CreateVehicleRequest, MessageResponse,
    UpdateVehicleRequest, VehicleListQuery, VehiclePageResponse,
};
use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::models::vehicle::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppPath, AppQuery};

/// Lectura pública; creación, edición y borrado solo para admin
pub fn create_vehicle_router(state: &AppState) -> Router<AppState> {
    let admin = |route: MethodRouter<AppState>| {
        route
            .route_layer(middleware::from_fn(admin_only_middleware))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
    };

    Router::new()
        .route("/", get(list_vehicles).merge(admin(post(create_vehicle))))
        .route(
            "/:id",
            get(get_vehicle)
                .merge(admin(put(update_vehicle)))
                .merge(admin(delete(delete_vehicle))),
        )
        .route("/:id/availability", get(check_availability))
}

async fn list_vehicles(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<VehicleListQuery>,
) -> Result<Json<VehiclePageResponse>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.search(query).await?;
    Ok(Json(response))
}

async fn get_vehicle(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Vehicle>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn check_availability(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppQuery(query): AppQuery<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.check_availability(id, query).await?;
    Ok(Json(response))
}

async fn create_vehicle(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<Vehicle>), AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_vehicle(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateVehicleRequest>,
) -> Result<Json<Vehicle>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let controller = VehicleController::new(&state);
    controller.delete(id).await?;
    Ok(Json(MessageResponse {
        message: "Car removed".to_string(),
    }))
}
