use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{sqlstate, EXCLUSION_VIOLATION};
use crate::models::booking::{Booking, BookingStatus};
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub const DATES_TAKEN: &str = "Car is not available for selected dates";

/// Ledger de reservas.
///
/// Las implementaciones deben rechazar con `AvailabilityConflict` cualquier
/// inserción o reactivación que deje dos reservas activas solapadas sobre
/// el mismo vehículo.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: &Booking) -> AppResult<Booking>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>>;

    /// Reservas `pending` o `confirmed` del vehículo
    async fn find_active_by_car(&self, car_id: Uuid) -> AppResult<Vec<Booking>>;

    /// Más recientes primero
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Booking>>;

    /// Más recientes primero
    async fn list_all(&self) -> AppResult<Vec<Booking>>;

    async fn update_status(&self, id: Uuid, status: BookingStatus) -> AppResult<Booking>;
}

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_overlap(error: sqlx::Error) -> AppError {
    match sqlstate(&error).as_deref() {
        Some(EXCLUSION_VIOLATION) => AppError::AvailabilityConflict(DATES_TAKEN.to_string()),
        _ => AppError::Database(error),
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn insert(&self, booking: &Booking) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                id, car_id, user_id, start_date, end_date, total_price, status,
                payment_intent, is_paid, paid_at, additional_drivers, insurance,
                pickup_location, dropoff_location, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(booking.id)
        .bind(booking.car_id)
        .bind(booking.user_id)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.total_price)
        .bind(booking.status)
        .bind(&booking.payment_intent)
        .bind(booking.is_paid)
        .bind(booking.paid_at)
        .bind(booking.additional_drivers)
        .bind(booking.insurance)
        .bind(&booking.pickup_location)
        .bind(&booking.dropoff_location)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_overlap)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    async fn find_active_by_car(&self, car_id: Uuid) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE car_id = $1 AND status IN ('pending', 'confirmed')
            ORDER BY start_date ASC
            "#,
        )
        .bind(car_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn list_all(&self) -> AppResult<Vec<Booking>> {
        let bookings =
            sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(bookings)
    }

    async fn update_status(&self, id: Uuid, status: BookingStatus) -> AppResult<Booking> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_overlap)?;

        booking.ok_or_else(|| not_found_error("Booking"))
    }
}
