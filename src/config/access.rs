//! Access control configuration

use serde::Deserialize;

/// Allow-list configuration
///
/// An empty list denies every actor; this is the safe default for a fresh
/// deployment until brokers are enrolled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessConfig {
    /// Actor ids allowed to create listings and change statuses
    #[serde(default)]
    pub allowed_actor_ids: Vec<i64>,
}
