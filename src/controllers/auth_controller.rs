//! Controlador de autenticación
//!
//! Registro, login, usuario actual y creación del admin inicial.

use std::sync::Arc;

use validator::Validate;

use crate::config::environment::{AdminBootstrap, EnvironmentConfig};
use crate::dto::auth_dto::{AuthResponse, SigninRequest, SignupRequest};
use crate::models::user::{User, UserResponse, UserRole};
use crate::repositories::UserRepository;
use crate::services::password::{hash_password, verify_password};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{generate_token, JwtConfig};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthController {
    users: Arc<dyn UserRepository>,
    config: Arc<EnvironmentConfig>,
    jwt: JwtConfig,
}

impl AuthController {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: state.users.clone(),
            config: state.config.clone(),
            jwt: state.jwt_config(),
        }
    }

    pub async fn signup(&self, request: SignupRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let password_hash = hash_password(&request.password, self.config.bcrypt_cost)?;
        let mut user = User::new(
            request.name.trim().to_string(),
            request.email.trim().to_lowercase(),
            password_hash,
            UserRole::User,
        );
        user.phone = request.phone;

        let user = self.users.create(&user).await?;
        log::info!("✅ User {} registered", user.id);

        self.auth_response(user)
    }

    pub async fn signin(&self, request: SigninRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            log::warn!("🔒 Failed sign-in for {}", user.email);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        self.auth_response(user)
    }

    /// Crear el admin configurado si todavía no existe
    pub async fn bootstrap_admin(&self, admin: &AdminBootstrap) -> AppResult<Option<User>> {
        if self.users.find_by_email(&admin.email).await?.is_some() {
            log::info!("👤 Admin {} already exists", admin.email);
            return Ok(None);
        }

        let password_hash = hash_password(&admin.password, self.config.bcrypt_cost)?;
        let user = User::new(
            admin.name.clone(),
            admin.email.trim().to_lowercase(),
            password_hash,
            UserRole::Admin,
        );

        let user = self.users.create(&user).await?;
        log::info!("👑 Admin {} created", user.email);

        Ok(Some(user))
    }

    fn auth_response(&self, user: User) -> AppResult<AuthResponse> {
        let token = generate_token(user.id, user.role, &self.jwt)?;
        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }
}
