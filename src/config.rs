use bioprompt_biometric::{BiometricError, PromptInfo};
use bioprompt_toast::ToastDuration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::MessageTable;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration is not valid JSON or has the wrong shape.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Text of the biometric dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptText {
    /// Dialog title.
    pub title: String,
    /// Dialog subtitle.
    pub subtitle: String,
    /// Dialog description.
    pub description: String,
    /// Label of the dismiss button.
    pub negative_button: String,
}

impl Default for PromptText {
    fn default() -> Self {
        Self {
            title: "Biometric Authentication".into(),
            subtitle: "Login using biometric credential.".into(),
            description: "Fingerprint Authentication".into(),
            negative_button: "Cancel".into(),
        }
    }
}

impl PromptText {
    /// Build the platform prompt from this text.
    ///
    /// # Errors
    /// Returns [`BiometricError::InvalidPrompt`] if the title or button label is empty.
    pub fn prompt_info(&self) -> Result<PromptInfo, BiometricError> {
        PromptInfo::builder()
            .title(&self.title)
            .subtitle(&self.subtitle)
            .description(&self.description)
            .negative_button(&self.negative_button)
            .build()
    }
}

/// Everything configurable about the flow.
///
/// Every field has a default, so a partial JSON document only overrides what
/// it names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Dialog text.
    pub prompt: PromptText,
    /// Outcome messages.
    pub messages: MessageTable,
    /// How long each message stays on screen.
    pub toast_duration: ToastDuration,
}

impl AppConfig {
    /// Parse a JSON configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] if `json` is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
