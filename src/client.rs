//! Cliente HTTP tipado para la API de alquiler
//!
//! El token se pasa explícitamente en cada llamada autenticada; el cliente
//! no guarda credenciales.

use chrono::{DateTime, Utc};
use http::StatusCode;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::dto::auth_dto::{AuthResponse, SigninRequest, SignupRequest};
use crate::dto::booking_dto::{BookingResponse, CreateBookingRequest};
use crate::dto::vehicle_dto::{
    AvailabilityResponse, CreateVehicleRequest, MessageResponse, UpdateVehicleRequest,
    VehicleListQuery, VehiclePageResponse,
};
use crate::models::booking::BookingStatus;
use crate::models::user::UserResponse;
use crate::models::vehicle::Vehicle;
use crate::utils::errors::ErrorResponse;

/// Errores del cliente
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status} ({code}): {message}")]
    Api {
        status: StatusCode,
        code: String,
        message: String,
    },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api { code, .. } => Some(code),
            ClientError::Http(_) => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Cliente HTTP para la API de alquiler
#[derive(Clone)]
pub struct RentalApiClient {
    client: Client,
    base_url: String,
}

impl RentalApiClient {
    /// Crear nuevo cliente apuntando a `base_url` (sin `/api`)
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(error) => (error.code, error.message),
            Err(_) => (String::new(), body),
        };

        Err(ClientError::Api {
            status,
            code,
            message,
        })
    }

    fn get(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        Self::authorize(self.client.get(self.url(path)), token)
    }

    fn with_body<B: Serialize + ?Sized>(
        &self,
        builder: RequestBuilder,
        body: &B,
        token: Option<&str>,
    ) -> RequestBuilder {
        Self::authorize(builder.json(body), token)
    }

    fn authorize(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // --- Auth ---

    pub async fn signup(&self, request: &SignupRequest) -> ClientResult<AuthResponse> {
        let builder = self.client.post(self.url("/auth/signup"));
        Self::send(self.with_body(builder, request, None)).await
    }

    pub async fn signin(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let request = SigninRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let builder = self.client.post(self.url("/auth/signin"));
        Self::send(self.with_body(builder, &request, None)).await
    }

    pub async fn me(&self, token: &str) -> ClientResult<UserResponse> {
        Self::send(self.get("/users/me", Some(token))).await
    }

    // --- Catálogo ---

    pub async fn list_cars(&self, query: &VehicleListQuery) -> ClientResult<VehiclePageResponse> {
        Self::send(self.get("/cars", None).query(query)).await
    }

    pub async fn get_car(&self, id: Uuid) -> ClientResult<Vehicle> {
        Self::send(self.get(&format!("/cars/{}", id), None)).await
    }

    pub async fn car_availability(
        &self,
        id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ClientResult<bool> {
        let response: AvailabilityResponse = Self::send(
            self.get(&format!("/cars/{}/availability", id), None).query(&[
                ("startDate", start.to_rfc3339()),
                ("endDate", end.to_rfc3339()),
            ]),
        )
        .await?;
        Ok(response.available)
    }

    /// Disponibilidad de varios vehículos en paralelo para el mismo intervalo
    pub async fn cars_availability(
        &self,
        ids: &[Uuid],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<(Uuid, ClientResult<bool>)> {
        let requests = ids.iter().map(|&id| async move {
            (id, self.car_availability(id, start, end).await)
        });
        futures::future::join_all(requests).await
    }

    pub async fn create_car(&self, token: &str, request: &CreateVehicleRequest) -> ClientResult<Vehicle> {
        let builder = self.client.post(self.url("/cars"));
        Self::send(self.with_body(builder, request, Some(token))).await
    }

    pub async fn update_car(
        &self,
        token: &str,
        id: Uuid,
        request: &UpdateVehicleRequest,
    ) -> ClientResult<Vehicle> {
        let builder = self.client.put(self.url(&format!("/cars/{}", id)));
        Self::send(self.with_body(builder, request, Some(token))).await
    }

    pub async fn delete_car(&self, token: &str, id: Uuid) -> ClientResult<MessageResponse> {
        let builder = self.client.delete(self.url(&format!("/cars/{}", id)));
        Self::send(Self::authorize(builder, Some(token))).await
    }

    // --- Reservas ---

    pub async fn create_booking(
        &self,
        token: &str,
        request: &CreateBookingRequest,
    ) -> ClientResult<BookingResponse> {
        let builder = self.client.post(self.url("/bookings"));
        Self::send(self.with_body(builder, request, Some(token))).await
    }

    pub async fn my_bookings(&self, token: &str) -> ClientResult<Vec<BookingResponse>> {
        Self::send(self.get("/bookings", Some(token))).await
    }

    pub async fn get_booking(&self, token: &str, id: Uuid) -> ClientResult<BookingResponse> {
        Self::send(self.get(&format!("/bookings/{}", id), Some(token))).await
    }

    pub async fn set_booking_status(
        &self,
        token: &str,
        id: Uuid,
        status: BookingStatus,
    ) -> ClientResult<BookingResponse> {
        let builder = self.client.put(self.url(&format!("/bookings/{}", id)));
        let body = json!({ "status": status });
        Self::send(self.with_body(builder, &body, Some(token))).await
    }

    pub async fn all_bookings(&self, token: &str) -> ClientResult<Vec<BookingResponse>> {
        Self::send(self.get("/bookings/admin/all", Some(token))).await
    }
}
