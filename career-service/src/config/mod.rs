use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct CareerConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub mongodb: MongoConfig,
    pub jwt: JwtConfig,
    pub cookies: CookieConfig,
    pub security: SecurityConfig,
    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: Secret<String>,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub access_secret: Secret<String>,
    pub refresh_secret: Secret<String>,
    pub access_token_expiry_minutes: i64,
    pub refresh_token_expiry_days: i64,
}

#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub secure: bool,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
}

/// Upper bounds keep token lifetimes within `chrono::Duration` range.
pub const MAX_ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 24 * 60;
pub const MAX_REFRESH_TOKEN_EXPIRY_DAYS: i64 = 365;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

impl CareerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let config = CareerConfig {
            common: common_config,
            environment: environment.clone(),
            service_name: get_env("SERVICE_NAME", Some("career-service"), false)?,
            service_version: get_env(
                "SERVICE_VERSION",
                Some(env!("CARGO_PKG_VERSION")),
                false,
            )?,
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            mongodb: MongoConfig {
                uri: Secret::new(get_env(
                    "MONGODB_URI",
                    Some("mongodb://localhost:27017"),
                    is_prod,
                )?),
                database: get_env("MONGODB_DATABASE", Some("career_guidance"), is_prod)?,
            },
            jwt: JwtConfig {
                access_secret: Secret::new(get_env(
                    "JWT_SECRET",
                    Some("dev-access-secret-change-me"),
                    is_prod,
                )?),
                refresh_secret: Secret::new(get_env(
                    "REFRESH_TOKEN_SECRET",
                    Some("dev-refresh-secret-change-me"),
                    is_prod,
                )?),
                access_token_expiry_minutes: parse_number(
                    "JWT_ACCESS_TOKEN_EXPIRY_MINUTES",
                    &get_env("JWT_ACCESS_TOKEN_EXPIRY_MINUTES", Some("15"), false)?,
                )?,
                refresh_token_expiry_days: parse_number(
                    "JWT_REFRESH_TOKEN_EXPIRY_DAYS",
                    &get_env("JWT_REFRESH_TOKEN_EXPIRY_DAYS", Some("7"), false)?,
                )?,
            },
            cookies: CookieConfig {
                secure: get_env(
                    "COOKIE_SECURE",
                    Some(if is_prod { "true" } else { "false" }),
                    false,
                )?
                .parse()
                .map_err(|e: std::str::ParseBoolError| {
                    AppError::ConfigError(anyhow::anyhow!("COOKIE_SECURE: {}", e))
                })?,
            },
            security: SecurityConfig {
                allowed_origins: get_env(
                    "ALLOWED_ORIGINS",
                    Some("http://localhost:3000"),
                    is_prod,
                )?
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            },
            gemini: GeminiConfig {
                api_key: Secret::new(get_env("GEMINI_API_KEY", Some(""), is_prod)?),
                model: get_env("GEMINI_MODEL", Some(DEFAULT_GEMINI_MODEL), false)?,
                base_url: get_env("GEMINI_BASE_URL", Some(DEFAULT_GEMINI_BASE_URL), false)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn is_prod(&self) -> bool {
        self.environment == Environment::Prod
    }

    pub(crate) fn validate(&self) -> Result<(), AppError> {
        if self.common.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }

        let access_minutes = self.jwt.access_token_expiry_minutes;
        if !(1..=MAX_ACCESS_TOKEN_EXPIRY_MINUTES).contains(&access_minutes) {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_ACCESS_TOKEN_EXPIRY_MINUTES must be between 1 and {}",
                MAX_ACCESS_TOKEN_EXPIRY_MINUTES
            )));
        }

        let refresh_days = self.jwt.refresh_token_expiry_days;
        if !(1..=MAX_REFRESH_TOKEN_EXPIRY_DAYS).contains(&refresh_days) {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_REFRESH_TOKEN_EXPIRY_DAYS must be between 1 and {}",
                MAX_REFRESH_TOKEN_EXPIRY_DAYS
            )));
        }

        let access = self.jwt.access_secret.expose_secret();
        let refresh = self.jwt.refresh_secret.expose_secret();
        if access.is_empty() || refresh.is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_SECRET and REFRESH_TOKEN_SECRET must be set"
            )));
        }
        if access == refresh {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_SECRET and REFRESH_TOKEN_SECRET must differ"
            )));
        }

        if self.is_prod() {
            if self.security.allowed_origins.iter().any(|o| o == "*") {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "Wildcard CORS origin not allowed in production"
                )));
            }

            if !self.cookies.secure {
                tracing::warn!("COOKIE_SECURE is disabled in production");
            }
        }

        if self.gemini.api_key.expose_secret().is_empty() {
            tracing::warn!("GEMINI_API_KEY is not set; recommendation requests will fail");
        }

        Ok(())
    }
}

fn parse_number(key: &str, raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|e: std::num::ParseIntError| AppError::ConfigError(anyhow::anyhow!("{}: {}", key, e)))
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}
