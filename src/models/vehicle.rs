//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle (expuesto como `car` en la API),
//! sus enumeraciones y los tipos de búsqueda del catálogo.
//! Mapea exactamente al schema PostgreSQL de la tabla `cars`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Categoría del vehículo - mapea al ENUM vehicle_category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "vehicle_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleCategory {
    Luxury,
    Sports,
    Suv,
    Convertible,
    Exotic,
}

/// Tipo de transmisión - mapea al ENUM transmission_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash, Default)]
#[sqlx(type_name = "transmission_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Transmission {
    #[default]
    Automatic,
    Manual,
}

/// Tipo de combustible - mapea al ENUM fuel_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash, Default)]
#[sqlx(type_name = "fuel_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    #[default]
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

impl VehicleCategory {
    pub const ALL: [VehicleCategory; 5] = [
        VehicleCategory::Luxury,
        VehicleCategory::Sports,
        VehicleCategory::Suv,
        VehicleCategory::Convertible,
        VehicleCategory::Exotic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleCategory::Luxury => "luxury",
            VehicleCategory::Sports => "sports",
            VehicleCategory::Suv => "suv",
            VehicleCategory::Convertible => "convertible",
            VehicleCategory::Exotic => "exotic",
        }
    }
}

impl FromStr for VehicleCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        VehicleCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| format!("Invalid category '{}'", value))
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vehicle principal - mapea exactamente a la tabla cars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price_per_day: f64,
    pub category: VehicleCategory,
    pub images: Vec<String>,
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    pub seats: i32,
    pub description: String,
    pub features: Vec<String>,
    pub available: bool,
    pub location: String,
    pub rating: f64,
    pub review_count: i32,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filtros del catálogo, combinados con AND
#[derive(Debug, Clone, Default)]
pub struct VehicleFilter {
    pub category: Option<VehicleCategory>,
    pub make: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub available: Option<bool>,
    pub featured: Option<bool>,
    pub location: Option<String>,
    pub min_seats: Option<i32>,
}

impl VehicleFilter {
    /// Evaluar el filtro en memoria (misma semántica que la consulta SQL)
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        self.category.map_or(true, |c| vehicle.category == c)
            && self.make.as_ref().map_or(true, |m| &vehicle.make == m)
            && self.min_price.map_or(true, |p| vehicle.price_per_day >= p)
            && self.max_price.map_or(true, |p| vehicle.price_per_day <= p)
            && self.available.map_or(true, |a| vehicle.available == a)
            && self.featured.map_or(true, |f| vehicle.featured == f)
            && self.location.as_ref().map_or(true, |l| {
                vehicle.location.to_lowercase().contains(&l.to_lowercase())
            })
            && self.min_seats.map_or(true, |s| vehicle.seats >= s)
    }
}

/// Campos ordenables del catálogo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleSortField {
    Make,
    Model,
    Year,
    PricePerDay,
    Seats,
    Rating,
    ReviewCount,
    CreatedAt,
}

impl VehicleSortField {
    /// Nombre del campo en la API
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "make" => Some(Self::Make),
            "model" => Some(Self::Model),
            "year" => Some(Self::Year),
            "pricePerDay" => Some(Self::PricePerDay),
            "seats" => Some(Self::Seats),
            "rating" => Some(Self::Rating),
            "reviewCount" => Some(Self::ReviewCount),
            "createdAt" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    /// Columna SQL correspondiente
    pub fn column(&self) -> &'static str {
        match self {
            Self::Make => "make",
            Self::Model => "model",
            Self::Year => "year",
            Self::PricePerDay => "price_per_day",
            Self::Seats => "seats",
            Self::Rating => "rating",
            Self::ReviewCount => "review_count",
            Self::CreatedAt => "created_at",
        }
    }

    fn compare(&self, a: &Vehicle, b: &Vehicle) -> Ordering {
        match self {
            Self::Make => a.make.cmp(&b.make),
            Self::Model => a.model.cmp(&b.model),
            Self::Year => a.year.cmp(&b.year),
            Self::PricePerDay => a.price_per_day.total_cmp(&b.price_per_day),
            Self::Seats => a.seats.cmp(&b.seats),
            Self::Rating => a.rating.total_cmp(&b.rating),
            Self::ReviewCount => a.review_count.cmp(&b.review_count),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

/// Clave de ordenación (campo + dirección)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: VehicleSortField,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(field: VehicleSortField) -> Self {
        Self { field, descending: false }
    }

    pub fn desc(field: VehicleSortField) -> Self {
        Self { field, descending: true }
    }
}

/// Comparar dos vehículos según una lista de claves de ordenación
pub fn compare_by_keys(keys: &[SortKey], a: &Vehicle, b: &Vehicle) -> Ordering {
    for key in keys {
        let ordering = key.field.compare(a, b);
        let ordering = if key.descending { ordering.reverse() } else { ordering };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Búsqueda paginada sobre el catálogo
#[derive(Debug, Clone)]
pub struct VehicleSearch {
    pub filter: VehicleFilter,
    pub sort: Vec<SortKey>,
    pub page: u32,
    pub limit: u32,
}

impl VehicleSearch {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl Default for VehicleSearch {
    fn default() -> Self {
        Self {
            filter: VehicleFilter::default(),
            sort: vec![SortKey::desc(VehicleSortField::CreatedAt)],
            page: 1,
            limit: 10,
        }
    }
}

/// Página de resultados con el total de coincidencias
#[derive(Debug, Clone)]
pub struct VehiclePage {
    pub vehicles: Vec<Vehicle>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_vehicle(make: &str, price: f64, seats: i32) -> Vehicle {
        let now = Utc::now();
        Vehicle {
            id: Uuid::new_v4(),
            make: make.to_string(),
            model: "Model".to_string(),
            year: 2023,
            price_per_day: price,
            category: VehicleCategory::Sports,
            images: vec![],
            transmission: Transmission::Automatic,
            fuel_type: FuelType::Petrol,
            seats,
            description: "Fast".to_string(),
            features: vec![],
            available: true,
            location: "Miami Beach, FL".to_string(),
            rating: 4.5,
            review_count: 10,
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("suv".parse::<VehicleCategory>().unwrap(), VehicleCategory::Suv);
        assert!("truck".parse::<VehicleCategory>().is_err());
    }

    #[test]
    fn test_filter_combines_with_and() {
        let vehicle = sample_vehicle("Porsche", 900.0, 2);

        let filter = VehicleFilter {
            make: Some("Porsche".to_string()),
            max_price: Some(1000.0),
            location: Some("miami".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&vehicle));

        let filter = VehicleFilter {
            make: Some("Porsche".to_string()),
            min_seats: Some(4),
            ..Default::default()
        };
        assert!(!filter.matches(&vehicle));
    }

    #[test]
    fn test_compare_by_keys_uses_secondary_key() {
        let a = sample_vehicle("Audi", 500.0, 4);
        let b = sample_vehicle("Audi", 300.0, 4);
        let keys = [SortKey::asc(VehicleSortField::Make), SortKey::desc(VehicleSortField::PricePerDay)];
        assert_eq!(compare_by_keys(&keys, &a, &b), Ordering::Less);
    }

    #[test]
    fn test_search_offset() {
        let search = VehicleSearch { page: 3, limit: 10, ..Default::default() };
        assert_eq!(search.offset(), 20);
    }
}
