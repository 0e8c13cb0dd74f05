//! Configuration for dialogue input interpretation.

/// Keyword and sentinel configuration for the dialogue engine.
///
/// Completion keywords let actors finish the photo phase by typing instead
/// of pressing the dedicated button; matching is case-insensitive on the
/// trimmed message.
#[derive(Debug, Clone)]
pub struct DialogueConfig {
    /// Words accepted as a photo-phase completion signal.
    pub completion_keywords: Vec<String>,
    /// The choice value the transport sends when the "custom value" escape
    /// button is pressed.
    pub custom_sentinel: String,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            completion_keywords: vec![
                "done".to_string(),
                "ready".to_string(),
                "finished".to_string(),
            ],
            custom_sentinel: "__custom__".to_string(),
        }
    }
}

impl DialogueConfig {
    /// Returns true if the text is a recognized completion keyword.
    pub fn is_completion_keyword(&self, text: &str) -> bool {
        let trimmed = text.trim();
        self.completion_keywords
            .iter()
            .any(|kw| kw.eq_ignore_ascii_case(trimmed))
    }

    /// Returns true if the value is the custom-choice sentinel.
    pub fn is_custom_sentinel(&self, value: &str) -> bool {
        value == self.custom_sentinel
    }
}
