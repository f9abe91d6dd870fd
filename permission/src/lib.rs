//! Runtime permission checks.
//!
//! Only checking is supported. Requesting a permission at runtime is left to
//! the host application.

#![warn(missing_docs)]

/// Platform-specific implementations.
pub mod sys;

pub use sys::PlatformPermissions;

use thiserror::Error;

/// Permissions the application may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Permission {
    /// Use biometric hardware through the biometric prompt.
    UseBiometric,
}

impl Permission {
    /// The manifest name of the permission.
    #[must_use]
    pub const fn manifest_name(self) -> &'static str {
        match self {
            Self::UseBiometric => "android.permission.USE_BIOMETRIC",
        }
    }
}

/// The current status of a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionStatus {
    /// Permission has been granted.
    Granted,
    /// Permission has been denied.
    Denied,
    /// The status could not be determined.
    NotDetermined,
}

impl PermissionStatus {
    /// Whether the permission may be used right now.
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Errors raised while querying the platform.
#[derive(Debug, Clone, Error)]
pub enum PermissionError {
    /// An unknown error occurred.
    #[error("unknown error: {0}")]
    Unknown(String),
}

/// Something that can answer "is this permission granted?".
pub trait PermissionChecker: Send + Sync {
    /// Check the current status of `permission` without requesting it.
    fn check(&self, permission: Permission) -> PermissionStatus;
}

impl<T: PermissionChecker + ?Sized> PermissionChecker for std::sync::Arc<T> {
    fn check(&self, permission: Permission) -> PermissionStatus {
        (**self).check(permission)
    }
}
