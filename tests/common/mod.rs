#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

use car_rental::config::environment::EnvironmentConfig;
use car_rental::dto::vehicle_dto::CreateVehicleRequest;
use car_rental::models::user::{User, UserRole};
use car_rental::models::vehicle::Vehicle;
use car_rental::services::password::hash_password;
use car_rental::state::AppState;
use car_rental::utils::jwt::generate_token;

pub const PASSWORD: &str = "secret123";

pub fn test_config() -> EnvironmentConfig {
    let mut config = EnvironmentConfig::local_defaults();
    config.bcrypt_cost = 4;
    config.rate_limit_requests = 10_000;
    config
}

pub fn test_state() -> AppState {
    AppState::in_memory(test_config())
}

/// Instante fijo en enero de 2099
pub fn jan(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2099, 1, day, hour, 0, 0).unwrap()
}

pub fn car_request(make: &str, price_per_day: f64) -> CreateVehicleRequest {
    serde_json::from_value(serde_json::json!({
        "make": make,
        "model": "GT",
        "year": 2023,
        "pricePerDay": price_per_day,
        "category": "sports",
        "seats": 2,
        "description": "Test car",
        "location": "Miami Beach, FL"
    }))
    .unwrap()
}

pub async fn seed_vehicle(state: &AppState, make: &str, price_per_day: f64) -> Vehicle {
    state
        .vehicles
        .create(&car_request(make, price_per_day).into_vehicle())
        .await
        .unwrap()
}

pub async fn seed_vehicle_with(
    state: &AppState,
    make: &str,
    price_per_day: f64,
    customize: impl FnOnce(&mut Vehicle),
) -> Vehicle {
    let mut vehicle = car_request(make, price_per_day).into_vehicle();
    customize(&mut vehicle);
    state.vehicles.create(&vehicle).await.unwrap()
}

pub async fn seed_user(state: &AppState, email: &str, role: UserRole) -> (User, String) {
    let hash = hash_password(PASSWORD, 4).unwrap();
    let user = User::new("Test User".to_string(), email.to_string(), hash, role);
    let user = state.users.create(&user).await.unwrap();
    let token = generate_token(user.id, user.role, &state.jwt_config()).unwrap();
    (user, token)
}
