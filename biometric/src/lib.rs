//! Biometric prompt plumbing for bioprompt.
//!
//! The crate owns the pieces the authentication flow hands to the platform:
//! a [`PromptInfo`] describing the dialog, a [`CancellationSignal`] carrying the
//! user-cancel notification, and an [`AuthCallback`] through which the platform
//! reports exactly one terminal result. The platform itself sits behind the
//! [`BiometricPrompt`] trait.

#![warn(missing_docs)]

mod cancel;
mod outcome;
mod prompt;

/// Platform-specific implementations.
pub mod sys;

pub use cancel::CancellationSignal;
pub use outcome::{AuthCallback, AuthOutcome, AuthReceiver, BiometricErrorCode, channel};
pub use prompt::{PromptInfo, PromptInfoBuilder};
pub use sys::PlatformPrompt;

use thiserror::Error;

/// Errors raised on the Rust side while launching a biometric prompt.
///
/// Failures reported by the platform dialog itself are not errors here; they
/// arrive as [`AuthOutcome::Error`] through the [`AuthCallback`].
#[derive(Debug, Error)]
pub enum BiometricError {
    /// Biometric prompts are not available on this platform.
    #[error("Biometric authentication is not available on this device")]
    NotAvailable,
    /// The prompt configuration was rejected.
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),
    /// An error occurred in the platform backend.
    #[error("Platform error: {0}")]
    PlatformError(String),
}

/// A platform service able to show a biometric dialog.
///
/// `authenticate` only launches the dialog and returns. The result is
/// delivered later through `callback`, and a user cancellation is delivered
/// through `cancellation`.
pub trait BiometricPrompt: Send + Sync {
    /// Launch the dialog described by `prompt`.
    ///
    /// # Errors
    /// Returns a [`BiometricError`] when the dialog could not be shown at all.
    fn authenticate(
        &self,
        prompt: &PromptInfo,
        cancellation: CancellationSignal,
        callback: AuthCallback,
    ) -> Result<(), BiometricError>;
}

impl<T: BiometricPrompt + ?Sized> BiometricPrompt for std::sync::Arc<T> {
    fn authenticate(
        &self,
        prompt: &PromptInfo,
        cancellation: CancellationSignal,
        callback: AuthCallback,
    ) -> Result<(), BiometricError> {
        (**self).authenticate(prompt, cancellation, callback)
    }
}
