use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;
use validator::Validate;

use crate::models::vehicle::{
    FuelType, SortKey, Transmission, Vehicle, VehicleCategory, VehicleFilter, VehicleSearch,
    VehicleSortField,
};
use crate::utils::errors::{validation_error, AppError, AppResult};
use crate::utils::validation::validate_not_empty;

pub const MAX_PAGE_SIZE: u32 = 100;

// Request para crear un vehículo
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[validate(custom(function = "validate_not_empty", message = "Make is required"))]
    pub make: String,

    #[validate(custom(function = "validate_not_empty", message = "Model is required"))]
    pub model: String,

    #[validate(range(min = 1886, max = 2100, message = "Year must be between 1886 and 2100"))]
    pub year: i32,

    #[validate(range(
        min = 0.0,
        max = 1000000.0,
        message = "Price per day must be between 0 and 1000000"
    ))]
    pub price_per_day: f64,

    pub category: VehicleCategory,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub transmission: Option<Transmission>,

    #[serde(default)]
    pub fuel_type: Option<FuelType>,

    #[validate(range(min = 1, message = "Seats must be at least 1"))]
    pub seats: i32,

    #[validate(custom(function = "validate_not_empty", message = "Description is required"))]
    pub description: String,

    #[serde(default)]
    pub features: Vec<String>,

    #[serde(default)]
    pub available: Option<bool>,

    #[validate(custom(function = "validate_not_empty", message = "Location is required"))]
    pub location: String,

    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    #[serde(default)]
    pub rating: Option<f64>,

    #[validate(range(min = 0, message = "Review count cannot be negative"))]
    #[serde(default)]
    pub review_count: Option<i32>,

    #[serde(default)]
    pub featured: Option<bool>,
}

impl CreateVehicleRequest {
    pub fn into_vehicle(self) -> Vehicle {
        let now = Utc::now();
        Vehicle {
            id: Uuid::new_v4(),
            make: self.make.trim().to_string(),
            model: self.model.trim().to_string(),
            year: self.year,
            price_per_day: self.price_per_day,
            category: self.category,
            images: self.images,
            transmission: self.transmission.unwrap_or_default(),
            fuel_type: self.fuel_type.unwrap_or_default(),
            seats: self.seats,
            description: self.description,
            features: self.features,
            available: self.available.unwrap_or(true),
            location: self.location,
            rating: self.rating.unwrap_or(0.0),
            review_count: self.review_count.unwrap_or(0),
            featured: self.featured.unwrap_or(false),
            created_at: now,
            updated_at: now,
        }
    }
}

// Request para actualizar un vehículo (patch parcial)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price_per_day: Option<f64>,
    pub category: Option<VehicleCategory>,
    pub images: Option<Vec<String>>,
    pub transmission: Option<Transmission>,
    pub fuel_type: Option<FuelType>,
    pub seats: Option<i32>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    pub available: Option<bool>,
    pub location: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
    pub featured: Option<bool>,
}

impl UpdateVehicleRequest {
    /// Aplicar el patch y revalidar el vehículo resultante completo
    pub fn apply(self, current: Vehicle) -> AppResult<Vehicle> {
        let merged = CreateVehicleRequest {
            make: self.make.unwrap_or(current.make),
            model: self.model.unwrap_or(current.model),
            year: self.year.unwrap_or(current.year),
            price_per_day: self.price_per_day.unwrap_or(current.price_per_day),
            category: self.category.unwrap_or(current.category),
            images: self.images.unwrap_or(current.images),
            transmission: Some(self.transmission.unwrap_or(current.transmission)),
            fuel_type: Some(self.fuel_type.unwrap_or(current.fuel_type)),
            seats: self.seats.unwrap_or(current.seats),
            description: self.description.unwrap_or(current.description),
            features: self.features.unwrap_or(current.features),
            available: Some(self.available.unwrap_or(current.available)),
            location: self.location.unwrap_or(current.location),
            rating: Some(self.rating.unwrap_or(current.rating)),
            review_count: Some(self.review_count.unwrap_or(current.review_count)),
            featured: Some(self.featured.unwrap_or(current.featured)),
        };
        merged.validate()?;

        let mut vehicle = merged.into_vehicle();
        vehicle.id = current.id;
        vehicle.created_at = current.created_at;
        Ok(vehicle)
    }
}

/// Query string de `GET /api/cars`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_seats: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

fn is_sort_token(token: &str) -> bool {
    static SORT_TOKEN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    SORT_TOKEN
        .get_or_init(|| Regex::new(r"^-?[A-Za-z]+$"))
        .as_ref()
        .map_or(false, |re| re.is_match(token))
}

/// Parsear `make,-pricePerDay` a claves de ordenación
pub fn parse_sort(raw: &str) -> AppResult<Vec<SortKey>> {
    let mut keys = Vec::new();

    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !is_sort_token(token) {
            return Err(validation_error("sort", format!("Invalid sort field '{}'", token)));
        }

        let (name, descending) = match token.strip_prefix('-') {
            Some(name) => (name, true),
            None => (token, false),
        };

        let field = VehicleSortField::parse(name)
            .ok_or_else(|| validation_error("sort", format!("Cannot sort by '{}'", name)))?;
        keys.push(SortKey { field, descending });
    }

    if keys.is_empty() {
        keys = VehicleSearch::default().sort;
    }
    Ok(keys)
}

impl VehicleListQuery {
    pub fn into_search(self) -> AppResult<VehicleSearch> {
        let category = self
            .category
            .as_deref()
            .map(str::parse::<VehicleCategory>)
            .transpose()
            .map_err(|message| validation_error("category", message))?;

        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(validation_error("page", "Page must be at least 1"));
        }

        let limit = self.limit.unwrap_or(10);
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(validation_error("limit", "Limit must be between 1 and 100"));
        }

        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(AppError::BadRequest(
                    "minPrice cannot be greater than maxPrice".to_string(),
                ));
            }
        }

        let sort = match self.sort.as_deref() {
            Some(raw) => parse_sort(raw)?,
            None => VehicleSearch::default().sort,
        };

        Ok(VehicleSearch {
            filter: VehicleFilter {
                category,
                make: self.make.filter(|m| !m.trim().is_empty()),
                min_price: self.min_price,
                max_price: self.max_price,
                available: self.available,
                featured: self.featured,
                location: self.location.filter(|l| !l.trim().is_empty()),
                min_seats: self.min_seats,
            },
            sort,
            page,
            limit,
        })
    }
}

// Response paginada del catálogo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehiclePageResponse {
    pub cars: Vec<Vehicle>,
    pub page: u32,
    pub pages: u64,
    pub total: u64,
}

impl VehiclePageResponse {
    pub fn new(cars: Vec<Vehicle>, total: u64, page: u32, limit: u32) -> Self {
        Self {
            cars,
            page,
            pages: total.div_ceil(u64::from(limit.max(1))),
            total,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
