use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{sqlstate, UNIQUE_VIOLATION};
use crate::models::user::User;
use crate::utils::errors::{AppError, AppResult};

pub const EMAIL_TAKEN: &str = "User already exists";

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// `Conflict` si el email ya está registrado
    async fn create(&self, user: &User) -> AppResult<User>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Búsqueda sin distinguir mayúsculas
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<User>>;
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, phone, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(user.email.to_lowercase())
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.phone)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| match sqlstate(&error).as_deref() {
            Some(UNIQUE_VIOLATION) => AppError::Conflict(EMAIL_TAKEN.to_string()),
            _ => AppError::Database(error),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }
}
