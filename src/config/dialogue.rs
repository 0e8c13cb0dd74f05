//! Dialogue engine configuration

use serde::Deserialize;

use crate::domain::dialogue::DialogueConfig;

use super::error::ValidationError;

/// Dialogue keyword configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DialogueSettings {
    /// Words accepted as a photo-phase completion signal
    #[serde(default = "default_completion_keywords")]
    pub completion_keywords: Vec<String>,

    /// Callback value the transport sends for the "custom value" button
    #[serde(default = "default_custom_sentinel")]
    pub custom_sentinel: String,
}

impl DialogueSettings {
    /// Validate dialogue configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.completion_keywords.is_empty() {
            return Err(ValidationError::NoCompletionKeywords);
        }
        if self.custom_sentinel.trim().is_empty() {
            return Err(ValidationError::EmptySentinel);
        }
        Ok(())
    }

    /// Builds the engine-side configuration.
    pub fn to_engine_config(&self) -> DialogueConfig {
        DialogueConfig {
            completion_keywords: self.completion_keywords.clone(),
            custom_sentinel: self.custom_sentinel.clone(),
        }
    }
}

impl Default for DialogueSettings {
    fn default() -> Self {
        Self {
            completion_keywords: default_completion_keywords(),
            custom_sentinel: default_custom_sentinel(),
        }
    }
}

fn default_completion_keywords() -> Vec<String> {
    DialogueConfig::default().completion_keywords
}

fn default_custom_sentinel() -> String {
    DialogueConfig::default().custom_sentinel
}
