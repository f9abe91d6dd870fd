/// Android backend.
#[cfg(target_os = "android")]
pub mod android;
#[cfg(target_os = "android")]
pub use android::AndroidPrompt as PlatformPrompt;

#[cfg_attr(not(target_os = "android"), allow(dead_code))]
mod init;

/// Fallback for targets without a biometric prompt.
#[cfg(not(target_os = "android"))]
pub mod stub {
    use crate::{AuthCallback, BiometricError, BiometricPrompt, CancellationSignal, PromptInfo};

    /// Placeholder backend for targets without a biometric prompt.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct StubPrompt;

    impl StubPrompt {
        /// Create the stub backend.
        #[must_use]
        pub const fn new() -> Self {
            Self
        }
    }

    impl BiometricPrompt for StubPrompt {
        fn authenticate(
            &self,
            _prompt: &PromptInfo,
            _cancellation: CancellationSignal,
            _callback: AuthCallback,
        ) -> Result<(), BiometricError> {
            Err(BiometricError::NotAvailable)
        }
    }

}
#[cfg(not(target_os = "android"))]
pub use stub::StubPrompt as PlatformPrompt;
