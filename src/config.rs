//! Application settings.
//!
//! Defaults are layered under an optional `safari.toml` and `SAFARI__*`
//! environment variables (`SAFARI__DATABASE__URL`, `SAFARI__PRICING__FEE__KIND`, ...).
//! The conventional `DATABASE_URL` and `JWT_SECRET` variables win when set.

use crate::services::pricing::FeePolicy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub pricing: PricingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricingConfig {
    pub fee: FeePolicy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Settings {
    /// Load settings from defaults, `safari.toml` and the environment.
    pub fn new() -> Result<Self, SettingsError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::with_name("safari").required(false))
            .add_source(
                config::Environment::with_prefix("SAFARI")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("auth.jwt_secret", env::var("JWT_SECRET").ok())?
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.database.url.is_empty() {
            return Err(SettingsError::Invalid("database.url is required".into()));
        }
        if self.database.max_connections == 0 {
            return Err(SettingsError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }
        if self.auth.jwt_secret.is_empty() {
            return Err(SettingsError::Invalid("auth.jwt_secret is required".into()));
        }
        if self.auth.token_ttl_hours <= 0 {
            return Err(SettingsError::Invalid(
                "auth.token_ttl_hours must be positive".into(),
            ));
        }
        match self.pricing.fee {
            FeePolicy::Flat(amount) if amount < Decimal::ZERO => Err(SettingsError::Invalid(
                "pricing.fee flat amount cannot be negative".into(),
            )),
            FeePolicy::Percent(p) if p < Decimal::ZERO || p > dec!(100) => Err(
                SettingsError::Invalid("pricing.fee percent must be within 0..=100".into()),
            ),
            _ => Ok(()),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgres://localhost/safari".to_string(),
                max_connections: 10,
                acquire_timeout_secs: 3,
                run_migrations: true,
            },
            auth: AuthConfig {
                jwt_secret: "change-me".to_string(),
                token_ttl_hours: 24,
            },
            pricing: PricingConfig {
                fee: FeePolicy::Percent(dec!(10)),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn rejects_empty_secret() {
        let mut settings = Settings::default();
        settings.auth.jwt_secret.clear();
        assert!(matches!(settings.validate(), Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn rejects_out_of_range_fee() {
        let mut settings = Settings::default();
        settings.pricing.fee = FeePolicy::Percent(dec!(150));
        assert!(settings.validate().is_err());

        settings.pricing.fee = FeePolicy::Flat(dec!(-1));
        assert!(settings.validate().is_err());

        settings.pricing.fee = FeePolicy::Flat(dec!(45));
        assert!(settings.validate().is_ok());
    }
}
