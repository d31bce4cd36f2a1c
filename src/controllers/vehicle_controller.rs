use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{
    AvailabilityQuery, AvailabilityResponse, CreateVehicleRequest, UpdateVehicleRequest,
    VehicleListQuery, VehiclePageResponse,
};
use crate::models::booking::DateRange;
use crate::models::vehicle::Vehicle;
use crate::repositories::VehicleRepository;
use crate::services::BookingService;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, validation_error, AppResult};
use crate::utils::validation::parse_instant_field;

pub struct VehicleController {
    repository: Arc<dyn VehicleRepository>,
    bookings: Arc<BookingService>,
}

impl VehicleController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.vehicles.clone(),
            bookings: state.booking_service.clone(),
        }
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> AppResult<Vehicle> {
        request.validate()?;

        let vehicle = self.repository.create(&request.into_vehicle()).await?;
        log::info!("🚗 Car {} created ({} {})", vehicle.id, vehicle.make, vehicle.model);

        Ok(vehicle)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Vehicle> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Car"))
    }

    pub async fn search(&self, query: VehicleListQuery) -> AppResult<VehiclePageResponse> {
        let search = query.into_search()?;
        let page = self.repository.search(&search).await?;

        Ok(VehiclePageResponse::new(
            page.vehicles,
            page.total,
            search.page,
            search.limit,
        ))
    }

    pub async fn update(&self, id: Uuid, request: UpdateVehicleRequest) -> AppResult<Vehicle> {
        let current = self.get_by_id(id).await?;

        let mut vehicle = request.apply(current)?;
        vehicle.updated_at = chrono::Utc::now();

        let vehicle = self.repository.update(&vehicle).await?;
        log::info!("🚗 Car {} updated", vehicle.id);

        Ok(vehicle)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Car"));
        }

        log::info!("🗑️ Car {} deleted", id);
        Ok(())
    }

    /// Disponibilidad de solo lectura; el flag `available` cuenta como no disponible
    pub async fn check_availability(
        &self,
        id: Uuid,
        query: AvailabilityQuery,
    ) -> AppResult<AvailabilityResponse> {
        let vehicle = self.get_by_id(id).await?;

        let start = parse_instant_field("startDate", query.start_date.as_deref().unwrap_or(""))?;
        let end = parse_instant_field("endDate", query.end_date.as_deref().unwrap_or(""))?;
        let range = DateRange::new(start, end)
            .ok_or_else(|| validation_error("endDate", "End date must be after start date"))?;

        let available = vehicle.available && self.bookings.is_available(id, &range).await?;

        Ok(AvailabilityResponse { available })
    }
}
