//! Configuration management

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::AppError;
use crate::constants::{
    DEFAULT_ACCESS_TOKEN_EXPIRY, DEFAULT_REFRESH_TOKEN_EXPIRY, DEFAULT_ROOT_DOMAIN,
    DEFAULT_TENANT_ROLE,
};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub tenancy: TenancySettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
}

/// Tenancy settings shared by every request.
#[derive(Debug, Deserialize, Clone)]
pub struct TenancySettings {
    /// Suffix appended to every tenant label, e.g. `acme` -> `acme.<root_domain>`.
    pub root_domain: String,
    /// Role assigned to the first user of a freshly registered tenant.
    pub default_role: String,
}

impl Default for TenancySettings {
    fn default() -> Self {
        Self {
            root_domain: DEFAULT_ROOT_DOMAIN.to_string(),
            default_role: DEFAULT_TENANT_ROLE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub dir: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "warden-server")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.run_migrations", false)?
            .set_default("jwt.access_token_expiry", DEFAULT_ACCESS_TOKEN_EXPIRY)?
            .set_default("jwt.refresh_token_expiry", DEFAULT_REFRESH_TOKEN_EXPIRY)?
            .set_default("tenancy.root_domain", DEFAULT_ROOT_DOMAIN)?
            .set_default("tenancy.default_role", DEFAULT_TENANT_ROLE)?
            .set_default("log.level", "info")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenancy_defaults() {
        let tenancy = TenancySettings::default();
        assert_eq!(tenancy.root_domain, DEFAULT_ROOT_DOMAIN);
        assert_eq!(tenancy.default_role, DEFAULT_TENANT_ROLE);
    }
}
