//! Platform-specific permission implementations.

/// Android backend.
#[cfg(target_os = "android")]
pub mod android;

#[cfg(target_os = "android")]
pub use android::AndroidPermissions as PlatformPermissions;

// Fallback for targets without runtime permissions
#[cfg(not(target_os = "android"))]
pub use stub::StubPermissions as PlatformPermissions;

#[cfg(not(target_os = "android"))]
mod stub {
    use crate::{Permission, PermissionChecker, PermissionStatus};

    /// Checker for targets without a permission model.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct StubPermissions;

    impl StubPermissions {
        /// Create the stub checker.
        #[must_use]
        pub const fn new() -> Self {
            Self
        }
    }

    impl PermissionChecker for StubPermissions {
        fn check(&self, _permission: Permission) -> PermissionStatus {
            PermissionStatus::NotDetermined
        }
    }
}
