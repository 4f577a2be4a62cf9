//! Auth service configuration.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use common::{CacheConfig, DatabaseConfig, Environment, JwtConfig, ServiceConfig};
use domain::{MAX_ACCESS_TOKEN_MINUTES, MAX_REFRESH_TOKEN_DAYS, MIN_JWT_SECRET_LENGTH};

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set to a non-default value in production")]
    InsecureSecret,

    #[error("{0} must be positive")]
    NonPositiveLifetime(&'static str),

    #[error("{name} must be at most {max}")]
    LifetimeTooLong { name: &'static str, max: i64 },
}

/// Auth service configuration.
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Runtime mode
    pub environment: Environment,
    /// Bind address, name and CORS
    pub service: ServiceConfig,
    /// Signing secret and token lifetimes
    pub jwt: JwtConfig,
    /// Account database
    pub database: DatabaseConfig,
    /// Redis session store
    pub cache: CacheConfig,
}

impl AuthServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to defaults; unparseable numbers log a
    /// warning and fall back as well.
    pub fn from_env() -> Self {
        let service_defaults = ServiceConfig::default();
        let jwt_defaults = JwtConfig::default();
        let database_defaults = DatabaseConfig::default();
        let cache_defaults = CacheConfig::default();

        Self {
            environment: Environment::parse(&env_or("APP_ENV", "development")),
            service: ServiceConfig {
                service_name: service_defaults.service_name,
                host: env_or("HOST", &service_defaults.host),
                port: env_parse("PORT", service_defaults.port),
                cors_allowed_origins: parse_origins(&env_or("CORS_ALLOWED_ORIGINS", "*")),
            },
            jwt: JwtConfig {
                secret: env_or("JWT_SECRET", &jwt_defaults.secret),
                access_expires_minutes: env_parse(
                    "JWT_ACCESS_EXPIRES_MINUTES",
                    jwt_defaults.access_expires_minutes,
                ),
                refresh_expires_days: env_parse(
                    "JWT_REFRESH_EXPIRES_DAYS",
                    jwt_defaults.refresh_expires_days,
                ),
            },
            database: DatabaseConfig {
                url: env_or("DATABASE_URL", &database_defaults.url),
                max_connections: env_parse(
                    "DATABASE_MAX_CONNECTIONS",
                    database_defaults.max_connections,
                ),
                min_connections: database_defaults.min_connections,
                timeout_ms: env_parse("STORE_TIMEOUT_MS", database_defaults.timeout_ms),
            },
            cache: CacheConfig {
                url: env_or("REDIS_URL", &cache_defaults.url),
                timeout_ms: env_parse("STORE_TIMEOUT_MS", cache_defaults.timeout_ms),
            },
        }
    }

    /// Check the configuration before serving.
    ///
    /// In production an empty or default signing secret is fatal; in
    /// development it only warns.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.access_expires_minutes <= 0 {
            return Err(ConfigError::NonPositiveLifetime("JWT_ACCESS_EXPIRES_MINUTES"));
        }
        if self.jwt.refresh_expires_days <= 0 {
            return Err(ConfigError::NonPositiveLifetime("JWT_REFRESH_EXPIRES_DAYS"));
        }
        if self.jwt.access_expires_minutes > MAX_ACCESS_TOKEN_MINUTES {
            return Err(ConfigError::LifetimeTooLong {
                name: "JWT_ACCESS_EXPIRES_MINUTES",
                max: MAX_ACCESS_TOKEN_MINUTES,
            });
        }
        if self.jwt.refresh_expires_days > MAX_REFRESH_TOKEN_DAYS {
            return Err(ConfigError::LifetimeTooLong {
                name: "JWT_REFRESH_EXPIRES_DAYS",
                max: MAX_REFRESH_TOKEN_DAYS,
            });
        }

        if self.jwt.uses_insecure_secret() {
            if self.environment.is_production() {
                return Err(ConfigError::InsecureSecret);
            }
            warn!("Using default JWT secret, this is insecure for production");
        } else if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            warn!(
                "JWT secret is shorter than {} bytes, consider a longer secret",
                MIN_JWT_SECRET_LENGTH
            );
        }

        if self.environment.is_production()
            && self.service.cors_allowed_origins.iter().any(|o| o == "*")
        {
            warn!(
                "CORS allows all origins in production, consider restricting \
                 CORS_ALLOWED_ORIGINS"
            );
        }

        Ok(())
    }
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            service: ServiceConfig::default(),
            jwt: JwtConfig::default(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Display + Copy,
{
    match env::var(key) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!(
                "Invalid value for {}: {:?}, using default {}",
                key, value, default
            );
            default
        }),
        Err(_) => default,
    }
}

/// Split a comma separated origin list; an empty list means any origin.
fn parse_origins(value: &str) -> Vec<String> {
    let origins: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect();

    if origins.is_empty() {
        vec!["*".to_string()]
    } else {
        origins
    }
}
