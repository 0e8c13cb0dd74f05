//! Publication channel configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Publication gateway configuration (the shared channel)
#[derive(Debug, Clone, Deserialize)]
pub struct PublicationConfig {
    /// Identifier of the shared channel listings are published into
    pub channel_id: i64,

    /// Transport credential used by the gateway implementation
    pub bot_token: SecretString,
}

impl PublicationConfig {
    /// Validate publication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.channel_id == 0 {
            return Err(ValidationError::MissingChannel);
        }
        if self.bot_token.expose_secret().trim().is_empty() {
            return Err(ValidationError::EmptyBotToken);
        }
        Ok(())
    }
}
