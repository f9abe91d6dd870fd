use crate::BiometricError;

/// Static text shown by the biometric dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptInfo {
    title: String,
    subtitle: String,
    description: String,
    negative_button: String,
}

impl PromptInfo {
    /// Start building a prompt.
    #[must_use]
    pub fn builder() -> PromptInfoBuilder {
        PromptInfoBuilder::default()
    }

    /// Dialog title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Line shown under the title.
    #[must_use]
    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    /// Longer body text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Label of the button that dismisses the dialog.
    #[must_use]
    pub fn negative_button(&self) -> &str {
        &self.negative_button
    }
}

/// Builder for [`PromptInfo`].
#[derive(Debug, Clone, Default)]
pub struct PromptInfoBuilder {
    title: String,
    subtitle: String,
    description: String,
    negative_button: String,
}

impl PromptInfoBuilder {
    /// Set the dialog title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the subtitle.
    #[must_use]
    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the negative button label. Pressing it only dismisses the dialog.
    #[must_use]
    pub fn negative_button(mut self, label: impl Into<String>) -> Self {
        self.negative_button = label.into();
        self
    }

    /// Finish the prompt.
    ///
    /// # Errors
    /// Returns [`BiometricError::InvalidPrompt`] if the title or the negative
    /// button label is empty. The platform builder rejects both.
    pub fn build(self) -> Result<PromptInfo, BiometricError> {
        if self.title.trim().is_empty() {
            return Err(BiometricError::InvalidPrompt("title cannot be empty".into()));
        }
        if self.negative_button.trim().is_empty() {
            return Err(BiometricError::InvalidPrompt(
                "negative button label cannot be empty".into(),
            ));
        }

        Ok(PromptInfo {
            title: self.title,
            subtitle: self.subtitle,
            description: self.description,
            negative_button: self.negative_button,
        })
    }
}
