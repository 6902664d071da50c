use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Optional initial-admin provisioning. When the user database is empty at
/// startup and both email and password are set, a single account is created.
/// Nothing is seeded otherwise; no credentials live in source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminConfig {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
    /// Quiet period for the debounced preview re-render, in milliseconds.
    pub preview_debounce_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = std::env::var("DATA_DIR")
            .unwrap_or_else(|_| "./data".into())
            .into();
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "resumind".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "resumind-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let admin = AdminConfig {
            email: std::env::var("ADMIN_EMAIL").ok(),
            password: std::env::var("ADMIN_PASSWORD").ok(),
            name: std::env::var("ADMIN_NAME").ok(),
        };
        let preview_debounce_ms = std::env::var("PREVIEW_DEBOUNCE_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(300);
        Ok(Self {
            data_dir,
            jwt,
            admin,
            preview_debounce_ms,
        })
    }
}
