use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::vehicle::{Vehicle, VehiclePage, VehicleSearch};
use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::validation::escape_like;

/// Almacenamiento del catálogo de vehículos
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn create(&self, vehicle: &Vehicle) -> AppResult<Vehicle>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>>;

    async fn search(&self, search: &VehicleSearch) -> AppResult<VehiclePage>;

    /// Reemplaza el registro completo; `NotFound` si no existe
    async fn update(&self, vehicle: &Vehicle) -> AppResult<Vehicle>;

    /// `true` si existía
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, search: &VehicleSearch) {
        let filter = &search.filter;
        builder.push(" WHERE TRUE");

        if let Some(category) = filter.category {
            builder.push(" AND category = ").push_bind(category);
        }
        if let Some(make) = &filter.make {
            builder.push(" AND make = ").push_bind(make.clone());
        }
        if let Some(min_price) = filter.min_price {
            builder.push(" AND price_per_day >= ").push_bind(min_price);
        }
        if let Some(max_price) = filter.max_price {
            builder.push(" AND price_per_day <= ").push_bind(max_price);
        }
        if let Some(available) = filter.available {
            builder.push(" AND available = ").push_bind(available);
        }
        if let Some(featured) = filter.featured {
            builder.push(" AND featured = ").push_bind(featured);
        }
        if let Some(location) = &filter.location {
            builder
                .push(" AND location ILIKE ")
                .push_bind(format!("%{}%", escape_like(location)));
        }
        if let Some(min_seats) = filter.min_seats {
            builder.push(" AND seats >= ").push_bind(min_seats);
        }
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    async fn create(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        let created = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO cars (
                id, make, model, year, price_per_day, category, images, transmission,
                fuel_type, seats, description, features, available, location,
                rating, review_count, featured, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(vehicle.price_per_day)
        .bind(vehicle.category)
        .bind(&vehicle.images)
        .bind(vehicle.transmission)
        .bind(vehicle.fuel_type)
        .bind(vehicle.seats)
        .bind(&vehicle.description)
        .bind(&vehicle.features)
        .bind(vehicle.available)
        .bind(&vehicle.location)
        .bind(vehicle.rating)
        .bind(vehicle.review_count)
        .bind(vehicle.featured)
        .bind(vehicle.created_at)
        .bind(vehicle.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn search(&self, search: &VehicleSearch) -> AppResult<VehiclePage> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM cars");
        Self::push_filters(&mut count, search);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM cars");
        Self::push_filters(&mut query, search);

        query.push(" ORDER BY ");
        for key in &search.sort {
            query
                .push(key.field.column())
                .push(if key.descending { " DESC, " } else { " ASC, " });
        }
        // Desempate estable
        query.push("id ASC");

        query
            .push(" LIMIT ")
            .push_bind(i64::from(search.limit))
            .push(" OFFSET ")
            .push_bind(search.offset() as i64);

        let vehicles = query.build_query_as::<Vehicle>().fetch_all(&self.pool).await?;

        Ok(VehiclePage {
            vehicles,
            total: total.max(0) as u64,
        })
    }

    async fn update(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        let updated = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE cars
            SET make = $2, model = $3, year = $4, price_per_day = $5, category = $6,
                images = $7, transmission = $8, fuel_type = $9, seats = $10,
                description = $11, features = $12, available = $13, location = $14,
                rating = $15, review_count = $16, featured = $17, updated_at = $18
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(vehicle.price_per_day)
        .bind(vehicle.category)
        .bind(&vehicle.images)
        .bind(vehicle.transmission)
        .bind(vehicle.fuel_type)
        .bind(vehicle.seats)
        .bind(&vehicle.description)
        .bind(&vehicle.features)
        .bind(vehicle.available)
        .bind(&vehicle.location)
        .bind(vehicle.rating)
        .bind(vehicle.review_count)
        .bind(vehicle.featured)
        .bind(vehicle.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| not_found_error("Car"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
