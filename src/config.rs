use std::fmt;

use anyhow::Context;
use serde::Deserialize;

/// Deployment environment, selected by the `ENVIRONMENT` variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Unknown flags fall back to production.
    pub fn from_flag(flag: &str) -> Self {
        match flag.trim().to_ascii_uppercase().as_str() {
            "DEV" | "DEVELOPMENT" => Self::Development,
            "STAGE" | "STAGING" => Self::Staging,
            _ => Self::Production,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Development => "Development Environment.",
            Self::Staging => "Test Environment.",
            Self::Production => "Production Environment.",
        }
    }

    pub fn debug(self) -> bool {
        !matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Development => "DEV",
            Self::Staging => "STAGE",
            Self::Production => "PROD",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub title: String,
    pub version: String,
    pub description: String,
    pub debug: bool,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment =
            Environment::from_flag(&lookup("ENVIRONMENT").unwrap_or_else(|| "DEV".into()));

        let database_url = lookup("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: lookup("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "user-service".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "user-service-clients".into()),
        };

        let port = match lookup("APP_PORT") {
            Some(v) => v.parse::<u16>().with_context(|| format!("invalid APP_PORT {v:?}"))?,
            None => 8000,
        };

        Ok(Self {
            environment,
            title: lookup("APP_TITLE").unwrap_or_else(|| "User Service".into()),
            version: env!("CARGO_PKG_VERSION").into(),
            description: environment.description().into(),
            debug: environment.debug(),
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            database_url,
            max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
            jwt,
        })
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "user_service=debug,axum=info,tower_http=debug"
        } else {
            "user_service=info,axum=info,tower_http=info"
        }
    }
}
