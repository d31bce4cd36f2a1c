//! Servicio de reservas
//!
//! Orquesta el ciclo de vida de una reserva: validación de precondiciones,
//! verificación de disponibilidad, cálculo de precio, persistencia y
//! transiciones de estado con control de permisos.
//!
//! Toda escritura que pueda activar una reserva se hace con el lock del
//! vehículo tomado, y el repositorio vuelve a rechazar solapes por su lado.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::booking::{Booking, BookingExtras, BookingStatus, DateRange};
use crate::models::user::Requester;
use crate::models::vehicle::Vehicle;
use crate::repositories::booking_repository::DATES_TAKEN;
use crate::repositories::{BookingRepository, VehicleRepository};
use crate::services::availability::AvailabilityChecker;
use crate::services::pricing;
use crate::services::vehicle_locks::VehicleLocks;
use crate::utils::errors::{forbidden_error, not_found_error, validation_error, AppError, AppResult};

pub struct BookingService {
    vehicles: Arc<dyn VehicleRepository>,
    bookings: Arc<dyn BookingRepository>,
    availability: AvailabilityChecker,
    locks: VehicleLocks,
}

impl BookingService {
    pub fn new(vehicles: Arc<dyn VehicleRepository>, bookings: Arc<dyn BookingRepository>) -> Self {
        Self {
            availability: AvailabilityChecker::new(bookings.clone()),
            vehicles,
            bookings,
            locks: VehicleLocks::new(),
        }
    }

    /// Crear una reserva `pending` para el usuario
    pub async fn create(
        &self,
        car_id: Uuid,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        extras: BookingExtras,
    ) -> AppResult<(Booking, Vehicle)> {
        self.create_at(car_id, user_id, start, end, extras, Utc::now()).await
    }

    /// Igual que `create` con el instante actual explícito
    pub async fn create_at(
        &self,
        car_id: Uuid,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        extras: BookingExtras,
        now: DateTime<Utc>,
    ) -> AppResult<(Booking, Vehicle)> {
        let vehicle = self
            .vehicles
            .find_by_id(car_id)
            .await?
            .ok_or_else(|| not_found_error("Car"))?;

        if !vehicle.available {
            return Err(AppError::AvailabilityConflict(
                "Car is not available for booking".to_string(),
            ));
        }

        let range = DateRange::new(start, end)
            .ok_or_else(|| validation_error("endDate", "End date must be after start date"))?;

        if start < now {
            return Err(validation_error("startDate", "Start date must be in the future"));
        }

        let _guard = self.locks.lock(car_id).await;

        if !self.availability.is_available(car_id, &range).await? {
            tracing::info!("🚫 Car {} already booked in [{}, {})", car_id, start, end);
            return Err(AppError::AvailabilityConflict(DATES_TAKEN.to_string()));
        }

        let total_price = pricing::price(vehicle.price_per_day, start, end);
        if !total_price.is_finite() {
            return Err(validation_error("totalPrice", "Total price is out of range"));
        }

        let booking = Booking::new(car_id, user_id, range, total_price, extras, now);
        let booking = self.bookings.insert(&booking).await?;

        tracing::info!(
            "✅ Booking {} created for car {} ({} days, total {})",
            booking.id,
            car_id,
            booking.duration_days(),
            booking.total_price
        );

        Ok((booking, vehicle))
    }

    /// Leer una reserva propia (o cualquiera, si es admin)
    pub async fn get(&self, booking_id: Uuid, requester: &Requester) -> AppResult<Booking> {
        let booking = self.find(booking_id).await?;

        if !requester.is_admin() && booking.user_id != requester.user_id {
            return Err(forbidden_error("Not authorized to access this booking"));
        }

        Ok(booking)
    }

    /// Cambiar el estado de una reserva.
    ///
    /// Un usuario solo puede cancelar sus propias reservas. Un admin puede
    /// fijar cualquier estado; si eso reactiva la reserva se vuelve a
    /// comprobar la disponibilidad.
    pub async fn set_status(
        &self,
        booking_id: Uuid,
        requester: &Requester,
        new_status: BookingStatus,
    ) -> AppResult<Booking> {
        let booking = self.find(booking_id).await?;

        if !requester.is_admin() {
            if booking.user_id != requester.user_id {
                return Err(forbidden_error("Not authorized to update this booking"));
            }
            if new_status != BookingStatus::Cancelled {
                return Err(forbidden_error("Users can only cancel bookings"));
            }
        }

        let _guard = self.locks.lock(booking.car_id).await;

        // Releer bajo el lock
        let booking = self.find(booking_id).await?;

        if booking.status == new_status {
            return Ok(booking);
        }

        if !requester.is_admin() && booking.status.is_terminal() {
            return Err(AppError::BadRequest(format!(
                "Booking is already {}",
                booking.status
            )));
        }

        if new_status.is_active() && !booking.status.is_active() {
            let active = self.bookings.find_active_by_car(booking.car_id).await?;
            let conflict = active
                .iter()
                .any(|other| other.id != booking.id && other.range().overlaps(&booking.range()));
            if conflict {
                return Err(AppError::AvailabilityConflict(DATES_TAKEN.to_string()));
            }
        }

        let updated = self.bookings.update_status(booking_id, new_status).await?;

        tracing::info!(
            "🔄 Booking {} moved {} -> {} by {}",
            booking_id,
            booking.status,
            new_status,
            requester.user_id
        );

        Ok(updated)
    }

    /// Reservas del usuario, más recientes primero
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Booking>> {
        self.bookings.list_by_user(user_id).await
    }

    /// Todas las reservas, más recientes primero (solo admin)
    pub async fn list_all(&self, requester: &Requester) -> AppResult<Vec<Booking>> {
        if !requester.is_admin() {
            return Err(forbidden_error("Not authorized to list all bookings"));
        }
        self.bookings.list_all().await
    }

    pub async fn is_available(&self, car_id: Uuid, range: &DateRange) -> AppResult<bool> {
        self.availability.is_available(car_id, range).await
    }

    async fn find(&self, booking_id: Uuid) -> AppResult<Booking> {
        self.bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| not_found_error("Booking"))
    }
}
