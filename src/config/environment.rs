//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::ops::RangeInclusive;
use std::str::FromStr;

use thiserror::Error;

/// Secreto usado solo en desarrollo cuando `JWT_SECRET` no está definido
const DEV_JWT_SECRET: &str = "dev-only-jwt-secret-change-me";

/// Vida máxima de un token: 10 años
pub const MAX_JWT_EXPIRATION: i64 = 10 * 365 * 24 * 60 * 60;

/// Errores de configuración
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Administrador inicial creado al arrancar
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: i64,
    pub bcrypt_cost: u32,
    pub cors_origins: Vec<String>,
    pub rate_limit_requests: u32,
    pub rate_limit_window: u64,
    /// Confiar en `x-forwarded-for` (solo detrás de un proxy propio)
    pub trust_proxy: bool,
    pub log_level: String,
    pub admin: Option<AdminBootstrap>,
}

impl EnvironmentConfig {
    /// Valores por defecto para desarrollo local
    pub fn local_defaults() -> Self {
        Self {
            environment: "development".to_string(),
            port: 5000,
            host: "0.0.0.0".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiration: 7 * 24 * 60 * 60,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            cors_origins: Vec::new(),
            rate_limit_requests: 300,
            rate_limit_window: 60,
            trust_proxy: false,
            log_level: "info".to_string(),
            admin: None,
        }
    }

    /// Cargar configuración desde las variables de entorno del proceso
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Cargar configuración desde una función de búsqueda arbitraria
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::local_defaults();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = get("ENVIRONMENT").unwrap_or(defaults.environment);
        let is_production = environment == "production";

        let jwt_secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None if is_production => return Err(ConfigError::Missing("JWT_SECRET")),
            None => defaults.jwt_secret,
        };

        let admin = match (get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminBootstrap {
                name: get("ADMIN_NAME").unwrap_or_else(|| "Administrator".to_string()),
                email,
                password,
            }),
            (Some(_), None) => return Err(ConfigError::Missing("ADMIN_PASSWORD")),
            _ => None,
        };

        Ok(Self {
            port: parse_or("PORT", get("PORT"), defaults.port)?,
            host: get("HOST").unwrap_or(defaults.host),
            jwt_secret,
            jwt_expiration: parse_in_range(
                "JWT_EXPIRATION",
                get("JWT_EXPIRATION"),
                defaults.jwt_expiration,
                1..=MAX_JWT_EXPIRATION,
            )?,
            bcrypt_cost: parse_or("BCRYPT_COST", get("BCRYPT_COST"), defaults.bcrypt_cost)?,
            cors_origins: get("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            rate_limit_requests: parse_or(
                "RATE_LIMIT_REQUESTS",
                get("RATE_LIMIT_REQUESTS"),
                defaults.rate_limit_requests,
            )?,
            rate_limit_window: parse_or(
                "RATE_LIMIT_WINDOW",
                get("RATE_LIMIT_WINDOW"),
                defaults.rate_limit_window,
            )?,
            trust_proxy: parse_or("TRUST_PROXY", get("TRUST_PROXY"), defaults.trust_proxy)?,
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
            admin,
            environment,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Nivel de logging para tracing (por defecto INFO)
    pub fn tracing_level(&self) -> tracing::Level {
        tracing::Level::from_str(&self.log_level).unwrap_or(tracing::Level::INFO)
    }
}

pub(crate) fn parse_or<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}

/// Igual que `parse_or`, rechazando valores fuera de `range`
pub(crate) fn parse_in_range<T: FromStr + PartialOrd>(
    name: &'static str,
    value: Option<String>,
    default: T,
    range: RangeInclusive<T>,
) -> Result<T, ConfigError> {
    let parsed = parse_or(name, value.clone(), default)?;
    if range.contains(&parsed) {
        Ok(parsed)
    } else {
        Err(ConfigError::Invalid {
            name,
            value: value.unwrap_or_default(),
        })
    }
}
