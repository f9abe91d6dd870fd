//! Transient user-facing messages.
//!
//! On Android a message is an `android.widget.Toast`. Desktop targets fall back
//! to a system notification.

#![warn(missing_docs)]

/// Platform-specific implementations.
pub mod sys;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long a toast stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastDuration {
    /// About two seconds.
    Short,
    /// About three and a half seconds.
    #[default]
    Long,
}

/// Errors that can occur while showing a toast.
#[derive(Debug, Clone, Error)]
pub enum ToastError {
    /// This target has no message surface.
    #[error("toasts are not supported on this platform")]
    NotSupported,
    /// The platform call failed.
    #[error("platform error: {0}")]
    Platform(String),
}

/// A single transient message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Text to display.
    pub message: String,
    /// Display duration.
    pub duration: ToastDuration,
}

impl Toast {
    /// Create a long toast.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration: ToastDuration::Long,
        }
    }

    /// Set the duration.
    #[must_use]
    pub fn with_duration(mut self, duration: ToastDuration) -> Self {
        self.duration = duration;
        self
    }

    /// Show the toast. Returns as soon as it has been queued.
    ///
    /// # Errors
    /// Returns a [`ToastError`] if the platform refuses the message.
    pub fn show(&self) -> Result<(), ToastError> {
        sys::show_toast(self)
    }
}

/// Destination for user-visible messages.
pub trait MessageSink: Send + Sync {
    /// Display `message` to the user.
    fn show(&self, message: &str);
}

impl<T: MessageSink + ?Sized> MessageSink for std::sync::Arc<T> {
    fn show(&self, message: &str) {
        (**self).show(message);
    }
}

/// [`MessageSink`] that shows every message as a [`Toast`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ToastSink {
    duration: ToastDuration,
}

impl ToastSink {
    /// Create a sink using `duration` for every toast.
    #[must_use]
    pub const fn new(duration: ToastDuration) -> Self {
        Self { duration }
    }
}

impl MessageSink for ToastSink {
    fn show(&self, message: &str) {
        log::info!("toast: {message}");
        if let Err(e) = Toast::new(message).with_duration(self.duration).show() {
            log::warn!("could not show toast: {e}");
        }
    }
}
