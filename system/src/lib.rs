//! Device security and capability queries.

#![warn(missing_docs)]

mod sys;

#[cfg(target_os = "android")]
pub use sys::init;

use thiserror::Error;

/// Fingerprint sensor.
pub const FEATURE_FINGERPRINT: &str = "android.hardware.fingerprint";

/// Errors from system queries.
#[derive(Debug, Clone, Error)]
pub enum SystemError {
    /// [`init`] has not been called yet.
    #[error("system module not initialized")]
    NotInitialized,
    /// A JNI call failed.
    #[error("jni error: {0}")]
    Jni(String),
}

/// Lock-screen state.
pub trait KeyguardService: Send + Sync {
    /// Whether a PIN, pattern, password or biometric unlock is configured.
    fn is_keyguard_secure(&self) -> bool;
}

/// Hardware and software features advertised by the device.
pub trait FeatureService: Send + Sync {
    /// Whether the device advertises `feature`, e.g. [`FEATURE_FINGERPRINT`].
    fn has_system_feature(&self, feature: &str) -> bool;
}

/// Both services backed by the running platform.
///
/// Query failures are logged and reported as `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformSystem;

impl PlatformSystem {
    /// Create the platform-backed services.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl KeyguardService for PlatformSystem {
    fn is_keyguard_secure(&self) -> bool {
        sys::is_keyguard_secure().unwrap_or_else(|e| {
            log::warn!("keyguard query failed: {e}");
            false
        })
    }
}

impl FeatureService for PlatformSystem {
    fn has_system_feature(&self, feature: &str) -> bool {
        sys::has_system_feature(feature).unwrap_or_else(|e| {
            log::warn!("feature query for {feature} failed: {e}");
            false
        })
    }
}

impl<T: KeyguardService + ?Sized> KeyguardService for std::sync::Arc<T> {
    fn is_keyguard_secure(&self) -> bool {
        (**self).is_keyguard_secure()
    }
}

impl<T: FeatureService + ?Sized> FeatureService for std::sync::Arc<T> {
    fn has_system_feature(&self, feature: &str) -> bool {
        (**self).has_system_feature(feature)
    }
}
