//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `LISTING_DESK`
//! prefix; nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use listing_desk::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod access;
mod database;
mod dialogue;
mod error;
mod publication;

pub use access::AccessConfig;
pub use database::DatabaseConfig;
pub use dialogue::DialogueSettings;
pub use error::{ConfigError, ValidationError};
pub use publication::PublicationConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration (SQLite)
    pub database: DatabaseConfig,

    /// Publication channel configuration
    pub publication: PublicationConfig,

    /// Allow-list of actors
    #[serde(default)]
    pub access: AccessConfig,

    /// Dialogue keywords and sentinels
    #[serde(default)]
    pub dialogue: DialogueSettings,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present (development), then reads environment
    /// variables with the `LISTING_DESK` prefix:
    ///
    /// - `LISTING_DESK__DATABASE__URL=sqlite://data/desk.db?mode=rwc`
    /// - `LISTING_DESK__PUBLICATION__CHANNEL_ID=-1001234`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LISTING_DESK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.publication.validate()?;
        self.dialogue.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn valid_config() -> AppConfig {
        AppConfig {
            database: DatabaseConfig {
                url: "sqlite://data/desk.db?mode=rwc".to_string(),
                max_connections: 5,
                acquire_timeout_secs: 30,
            },
            publication: PublicationConfig {
                channel_id: -1001234,
                bot_token: SecretString::new("123:abc".to_string()),
            },
            access: AccessConfig {
                allowed_actor_ids: vec![1, 2],
            },
            dialogue: DialogueSettings::default(),
        }
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn validation_surfaces_section_failures() {
        let mut config = valid_config();
        config.database.url = "mysql://nope".to_string();
        assert!(config.validate().is_err());
    }
}
