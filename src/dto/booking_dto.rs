use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::booking::{Booking, BookingExtras, BookingStatus};
use crate::models::user::UserSummary;
use crate::models::vehicle::Vehicle;
use crate::utils::errors::{validation_error, AppResult};

// Request para crear una reserva
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub car_id: Uuid,
    pub start_date: String,
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropoff_location: Option<String>,
    #[validate(range(min = 0, message = "Additional drivers cannot be negative"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_drivers: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance: Option<bool>,
}

impl CreateBookingRequest {
    pub fn extras(&self) -> BookingExtras {
        BookingExtras {
            insurance: self.insurance.unwrap_or(false),
            additional_drivers: self.additional_drivers.unwrap_or(0),
            pickup_location: self.pickup_location.clone().unwrap_or_default(),
            dropoff_location: self.dropoff_location.clone().unwrap_or_default(),
        }
    }
}

// Request para cambiar el estado
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateBookingStatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

impl UpdateBookingStatusRequest {
    pub fn status(&self) -> AppResult<BookingStatus> {
        let raw = self
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| validation_error("status", "Status is required"))?;

        raw.parse::<BookingStatus>()
            .map_err(|message| validation_error("status", message))
    }
}

/// Reserva con los campos derivados calculados al leer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    #[serde(flatten)]
    pub booking: Booking,
    pub car: Option<Vehicle>,
    pub duration_days: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<UserSummary>,
}

impl BookingResponse {
    pub fn new(booking: Booking, car: Option<Vehicle>) -> Self {
        Self {
            duration_days: booking.duration_days(),
            booking,
            car,
            customer: None,
        }
    }

    pub fn with_customer(mut self, customer: Option<UserSummary>) -> Self {
        self.customer = customer;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_required_and_parsed() {
        let missing = UpdateBookingStatusRequest::default();
        assert!(missing.status().is_err());

        let invalid = UpdateBookingStatusRequest { status: Some("archived".into()) };
        assert!(invalid.status().is_err());

        let valid = UpdateBookingStatusRequest { status: Some("cancelled".into()) };
        assert_eq!(valid.status().unwrap(), BookingStatus::Cancelled);
    }

    #[test]
    fn test_extras_defaults() {
        let request: CreateBookingRequest = serde_json::from_value(serde_json::json!({
            "carId": Uuid::new_v4(),
            "startDate": "2099-01-01",
            "endDate": "2099-01-04"
        }))
        .unwrap();

        assert_eq!(request.extras(), BookingExtras::default());
    }

    #[test]
    fn test_negative_drivers_rejected() {
        let request: CreateBookingRequest = serde_json::from_value(serde_json::json!({
            "carId": Uuid::new_v4(),
            "startDate": "2099-01-01",
            "endDate": "2099-01-04",
            "additionalDrivers": -1
        }))
        .unwrap();

        assert!(request.validate().is_err());
    }
}
