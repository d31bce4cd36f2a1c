//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::middleware::rate_limit::RateLimitState;
use crate::repositories::{
    BookingRepository, InMemoryBookingRepository, InMemoryUserRepository,
    InMemoryVehicleRepository, PgBookingRepository, PgUserRepository, PgVehicleRepository,
    UserRepository, VehicleRepository,
};
use crate::services::BookingService;
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub vehicles: Arc<dyn VehicleRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub users: Arc<dyn UserRepository>,
    pub booking_service: Arc<BookingService>,
    pub rate_limiter: RateLimitState,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        vehicles: Arc<dyn VehicleRepository>,
        bookings: Arc<dyn BookingRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        let booking_service = Arc::new(BookingService::new(vehicles.clone(), bookings.clone()));
        let rate_limiter = RateLimitState::from_config(&config);

        Self {
            config: Arc::new(config),
            vehicles,
            bookings,
            users,
            booking_service,
            rate_limiter,
        }
    }

    /// Estado respaldado por PostgreSQL
    pub fn postgres(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self::new(
            config,
            Arc::new(PgVehicleRepository::new(pool.clone())),
            Arc::new(PgBookingRepository::new(pool.clone())),
            Arc::new(PgUserRepository::new(pool)),
        )
    }

    /// Estado en memoria (desarrollo sin base de datos y tests)
    pub fn in_memory(config: EnvironmentConfig) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryVehicleRepository::new()),
            Arc::new(InMemoryBookingRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
        )
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::from(self.config.as_ref())
    }
}
