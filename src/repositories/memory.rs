//! Repositorios en memoria
//!
//! Implementaciones de los repositorios sobre `RwLock<Vec<_>>`, usadas
//! cuando no hay `DATABASE_URL` configurada y en los tests. El orden de
//! inserción se conserva, de modo que "más recientes primero" equivale a
//! recorrer el vector al revés.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::booking::{Booking, BookingStatus};
use crate::models::user::User;
use crate::models::vehicle::{compare_by_keys, Vehicle, VehiclePage, VehicleSearch};
use crate::repositories::booking_repository::{BookingRepository, DATES_TAKEN};
use crate::repositories::user_repository::{UserRepository, EMAIL_TAKEN};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::availability::first_conflict;
use crate::utils::errors::{not_found_error, AppError, AppResult};

#[derive(Default)]
pub struct InMemoryVehicleRepository {
    vehicles: RwLock<Vec<Vehicle>>,
}

impl InMemoryVehicleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VehicleRepository for InMemoryVehicleRepository {
    async fn create(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        let mut vehicles = self.vehicles.write().await;
        if vehicles.iter().any(|v| v.id == vehicle.id) {
            return Err(AppError::Conflict("Car already exists".to_string()));
        }
        vehicles.push(vehicle.clone());
        Ok(vehicle.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicles = self.vehicles.read().await;
        Ok(vehicles.iter().find(|v| v.id == id).cloned())
    }

    async fn search(&self, search: &VehicleSearch) -> AppResult<VehiclePage> {
        let vehicles = self.vehicles.read().await;

        let mut matching: Vec<&Vehicle> = vehicles
            .iter()
            .rev()
            .filter(|v| search.filter.matches(v))
            .collect();
        matching.sort_by(|a, b| compare_by_keys(&search.sort, a, b));

        let total = matching.len() as u64;
        let vehicles = matching
            .into_iter()
            .skip(search.offset() as usize)
            .take(search.limit as usize)
            .cloned()
            .collect();

        Ok(VehiclePage { vehicles, total })
    }

    async fn update(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        let mut vehicles = self.vehicles.write().await;
        let slot = vehicles
            .iter_mut()
            .find(|v| v.id == vehicle.id)
            .ok_or_else(|| not_found_error("Car"))?;
        *slot = vehicle.clone();
        Ok(vehicle.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut vehicles = self.vehicles.write().await;
        let before = vehicles.len();
        vehicles.retain(|v| v.id != id);
        Ok(vehicles.len() != before)
    }
}

#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: RwLock<Vec<Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<'a>(bookings: impl DoubleEndedIterator<Item = &'a Booking>) -> Vec<Booking> {
    bookings.rev().cloned().collect()
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert(&self, booking: &Booking) -> AppResult<Booking> {
        let mut bookings = self.bookings.write().await;

        if booking.status.is_active() {
            let same_car: Vec<Booking> = bookings
                .iter()
                .filter(|b| b.car_id == booking.car_id)
                .cloned()
                .collect();
            if first_conflict(&same_car, &booking.range()).is_some() {
                return Err(AppError::AvailabilityConflict(DATES_TAKEN.to_string()));
            }
        }

        bookings.push(booking.clone());
        Ok(booking.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn find_active_by_car(&self, car_id: Uuid) -> AppResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .iter()
            .filter(|b| b.car_id == car_id && b.status.is_active())
            .cloned()
            .collect())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(newest_first(bookings.iter().filter(|b| b.user_id == user_id)))
    }

    async fn list_all(&self) -> AppResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(newest_first(bookings.iter()))
    }

    async fn update_status(&self, id: Uuid, status: BookingStatus) -> AppResult<Booking> {
        let mut bookings = self.bookings.write().await;

        let index = bookings
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| not_found_error("Booking"))?;

        if status.is_active() && !bookings[index].status.is_active() {
            let target = &bookings[index];
            let others: Vec<Booking> = bookings
                .iter()
                .filter(|b| b.car_id == target.car_id && b.id != target.id)
                .cloned()
                .collect();
            if first_conflict(&others, &target.range()).is_some() {
                return Err(AppError::AvailabilityConflict(DATES_TAKEN.to_string()));
            }
        }

        let booking = &mut bookings[index];
        booking.status = status;
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AppResult<User> {
        let mut users = self.users.write().await;
        let email = user.email.to_lowercase();
        if users.iter().any(|u| u.email == email) {
            return Err(AppError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let mut stored = user.clone();
        stored.email = email;
        users.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.trim().to_lowercase();
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::{BookingExtras, DateRange};
    use chrono::{DateTime, TimeZone};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2099, 3, d, 0, 0, 0).unwrap()
    }

    fn booking(car_id: Uuid, start: u32, end: u32) -> Booking {
        let range = DateRange::new(day(start), day(end)).unwrap();
        Booking::new(car_id, Uuid::new_v4(), range, 100.0, BookingExtras::default(), Utc::now())
    }

    #[tokio::test]
    async fn test_insert_rejects_overlap_on_same_car() {
        let repo = InMemoryBookingRepository::new();
        let car = Uuid::new_v4();

        repo.insert(&booking(car, 1, 5)).await.unwrap();
        let result = repo.insert(&booking(car, 4, 8)).await;
        assert!(matches!(result, Err(AppError::AvailabilityConflict(_))));

        // Otro vehículo, mismas fechas
        repo.insert(&booking(Uuid::new_v4(), 4, 8)).await.unwrap();
        // Adyacente
        repo.insert(&booking(car, 5, 8)).await.unwrap();
    }

    #[tokio::test]
    async fn test_reactivation_checks_overlap() {
        let repo = InMemoryBookingRepository::new();
        let car = Uuid::new_v4();

        let first = repo.insert(&booking(car, 1, 5)).await.unwrap();
        repo.update_status(first.id, BookingStatus::Cancelled).await.unwrap();
        repo.insert(&booking(car, 2, 6)).await.unwrap();

        let result = repo.update_status(first.id, BookingStatus::Confirmed).await;
        assert!(matches!(result, Err(AppError::AvailabilityConflict(_))));
    }

    #[tokio::test]
    async fn test_user_email_is_unique_case_insensitive() {
        let repo = InMemoryUserRepository::new();
        let user = User::new("Ana".into(), "Ana@Example.com".into(), "hash".into(), Default::default());
        repo.create(&user).await.unwrap();

        let dup = User::new("Other".into(), "ana@example.com".into(), "hash".into(), Default::default());
        assert!(matches!(repo.create(&dup).await, Err(AppError::Conflict(_))));
        assert!(repo.find_by_email("ANA@example.com").await.unwrap().is_some());
    }
}
