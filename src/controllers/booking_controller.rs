use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::dto::booking_dto::{BookingResponse, CreateBookingRequest, UpdateBookingStatusRequest};
use crate::models::booking::Booking;
use crate::models::user::{Requester, UserSummary};
use crate::models::vehicle::Vehicle;
use crate::repositories::{UserRepository, VehicleRepository};
use crate::services::BookingService;
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::validation::parse_instant_field;

pub struct BookingController {
    service: Arc<BookingService>,
    vehicles: Arc<dyn VehicleRepository>,
    users: Arc<dyn UserRepository>,
}

impl BookingController {
    pub fn new(state: &AppState) -> Self {
        Self {
            service: state.booking_service.clone(),
            vehicles: state.vehicles.clone(),
            users: state.users.clone(),
        }
    }

    pub async fn create(
        &self,
        requester: &Requester,
        request: CreateBookingRequest,
    ) -> AppResult<BookingResponse> {
        request.validate()?;

        let start = parse_instant_field("startDate", &request.start_date)?;
        let end = parse_instant_field("endDate", &request.end_date)?;

        let (booking, vehicle) = self
            .service
            .create(request.car_id, requester.user_id, start, end, request.extras())
            .await?;

        Ok(BookingResponse::new(booking, Some(vehicle)))
    }

    pub async fn get(&self, requester: &Requester, id: Uuid) -> AppResult<BookingResponse> {
        let booking = self.service.get(id, requester).await?;
        let car = self.vehicles.find_by_id(booking.car_id).await?;
        Ok(BookingResponse::new(booking, car))
    }

    pub async fn update_status(
        &self,
        requester: &Requester,
        id: Uuid,
        request: UpdateBookingStatusRequest,
    ) -> AppResult<BookingResponse> {
        let status = request.status()?;
        let booking = self.service.set_status(id, requester, status).await?;
        let car = self.vehicles.find_by_id(booking.car_id).await?;
        Ok(BookingResponse::new(booking, car))
    }

    pub async fn list_mine(&self, requester: &Requester) -> AppResult<Vec<BookingResponse>> {
        let bookings = self.service.list_for_user(requester.user_id).await?;
        self.with_cars(bookings).await
    }

    /// Todas las reservas con los datos del cliente
    pub async fn list_all(&self, requester: &Requester) -> AppResult<Vec<BookingResponse>> {
        let bookings = self.service.list_all(requester).await?;

        let mut user_ids: Vec<Uuid> = bookings.iter().map(|b| b.user_id).collect();
        user_ids.sort();
        user_ids.dedup();

        let customers: HashMap<Uuid, UserSummary> = self
            .users
            .find_many(&user_ids)
            .await?
            .iter()
            .map(|user| (user.id, UserSummary::from(user)))
            .collect();

        let responses = self.with_cars(bookings).await?;
        Ok(responses
            .into_iter()
            .map(|response| {
                let customer = customers.get(&response.booking.user_id).cloned();
                response.with_customer(customer)
            })
            .collect())
    }

    async fn with_cars(&self, bookings: Vec<Booking>) -> AppResult<Vec<BookingResponse>> {
        let mut cars: HashMap<Uuid, Option<Vehicle>> = HashMap::new();
        let mut responses = Vec::with_capacity(bookings.len());

        for booking in bookings {
            if !cars.contains_key(&booking.car_id) {
                let car = self.vehicles.find_by_id(booking.car_id).await?;
                cars.insert(booking.car_id, car);
            }
            let car = cars.get(&booking.car_id).cloned().flatten();
            responses.push(BookingResponse::new(booking, car));
        }

        Ok(responses)
    }
}
