use serde::{Deserialize, Serialize};

/// User-visible text for every outcome of the flow.
///
/// The error template may contain `{message}` and `{code}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageTable {
    /// Shown when the lock screen is not secured.
    pub no_secure_keyguard: String,
    /// Shown when `USE_BIOMETRIC` is not granted.
    pub permission_not_granted: String,
    /// Shown after a successful match.
    pub succeeded: String,
    /// Template for platform errors.
    pub error: String,
    /// Shown when the user cancels.
    pub cancelled: String,
}

impl Default for MessageTable {
    fn default() -> Self {
        Self {
            no_secure_keyguard: "No Fingerprint enrolled.".into(),
            permission_not_granted: "Permission not granted.".into(),
            succeeded: "Authentication Succeeded!".into(),
            error: "Authentication Error: {message}".into(),
            cancelled: "Authentication is cancelled by the user.".into(),
        }
    }
}

impl MessageTable {
    /// Render the error template.
    #[must_use]
    pub fn error(&self, code: i32, message: &str) -> String {
        // Code first, so a platform message containing "{code}" stays verbatim.
        self.error
            .replace("{code}", &code.to_string())
            .replace("{message}", message)
    }
}
