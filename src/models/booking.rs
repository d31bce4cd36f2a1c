//! Modelo de Booking
//!
//! Este módulo contiene el struct Booking, su máquina de estados y el
//! intervalo semiabierto `[inicio, fin)` usado para detectar solapes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::services::pricing;

/// Estado de la reserva - mapea al ENUM booking_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash, Default)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Estados que bloquean el vehículo
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// Estados sin transiciones de salida
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| format!("Invalid status '{}'", value))
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intervalo semiabierto `[start, end)` con `start < end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    /// `None` si `start >= end`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// `[a, b)` y `[s, e)` se solapan sii `a < e && b > s`
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Datos opcionales de la reserva; no afectan a la disponibilidad
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingExtras {
    pub insurance: bool,
    pub additional_drivers: i32,
    pub pickup_location: String,
    pub dropoff_location: String,
}

/// Booking principal - mapea exactamente a la tabla bookings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub car_id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: f64,
    pub status: BookingStatus,
    pub payment_intent: String,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub additional_drivers: i32,
    pub insurance: bool,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Nueva reserva en estado `pending`, sin pago
    pub fn new(
        car_id: Uuid,
        user_id: Uuid,
        range: DateRange,
        total_price: f64,
        extras: BookingExtras,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            car_id,
            user_id,
            start_date: range.start(),
            end_date: range.end(),
            total_price,
            status: BookingStatus::Pending,
            payment_intent: String::new(),
            is_paid: false,
            paid_at: None,
            additional_drivers: extras.additional_drivers,
            insurance: extras.insurance,
            pickup_location: extras.pickup_location,
            dropoff_location: extras.dropoff_location,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }

    /// Duración en días, calculada al leer
    pub fn duration_days(&self) -> i64 {
        pricing::duration_days(self.start_date, self.end_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, d, 0, 0, 0).unwrap()
    }

    fn range(start: u32, end: u32) -> DateRange {
        DateRange::new(day(start), day(end)).unwrap()
    }

    #[test]
    fn test_range_requires_start_before_end() {
        assert!(DateRange::new(day(4), day(4)).is_none());
        assert!(DateRange::new(day(5), day(4)).is_none());
    }

    #[test]
    fn test_adjacent_ranges_do_not_overlap() {
        assert!(!range(1, 4).overlaps(&range(4, 6)));
        assert!(!range(4, 6).overlaps(&range(1, 4)));
    }

    #[test]
    fn test_partial_and_nested_ranges_overlap() {
        assert!(range(1, 5).overlaps(&range(3, 6)));
        assert!(range(3, 6).overlaps(&range(1, 5)));
        assert!(range(1, 10).overlaps(&range(3, 4)));
        assert!(range(3, 4).overlaps(&range(1, 10)));
    }

    #[test]
    fn test_status_classification() {
        assert!(BookingStatus::Pending.is_active());
        assert!(BookingStatus::Confirmed.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
        assert!(BookingStatus::Completed.is_terminal());
        assert!(!BookingStatus::Confirmed.is_terminal());
        assert_eq!("cancelled".parse::<BookingStatus>().unwrap(), BookingStatus::Cancelled);
        assert!("archived".parse::<BookingStatus>().is_err());
    }
}
