use std::sync::Arc;

use uuid::Uuid;

use crate::models::booking::{Booking, DateRange};
use crate::repositories::BookingRepository;
use crate::utils::errors::AppResult;

/// Primera reserva activa que se solapa con `range`
pub fn first_conflict<'a>(bookings: &'a [Booking], range: &DateRange) -> Option<&'a Booking> {
    bookings
        .iter()
        .find(|booking| booking.status.is_active() && booking.range().overlaps(range))
}

/// Verificador de disponibilidad sobre el ledger de reservas
#[derive(Clone)]
pub struct AvailabilityChecker {
    bookings: Arc<dyn BookingRepository>,
}

impl AvailabilityChecker {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    /// `true` si ninguna reserva activa del vehículo se solapa con `range`.
    ///
    /// No mira el flag `available` del vehículo ni si existe.
    pub async fn is_available(&self, car_id: Uuid, range: &DateRange) -> AppResult<bool> {
        let active = self.bookings.find_active_by_car(car_id).await?;
        Ok(first_conflict(&active, range).is_none())
    }
}
