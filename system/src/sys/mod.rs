#[cfg(target_os = "android")]
mod android;
#[cfg(target_os = "android")]
pub(crate) use android::{has_system_feature, is_keyguard_secure};
#[cfg(target_os = "android")]
pub use android::init;

#[cfg(not(target_os = "android"))]
mod stub {
    use crate::SystemError;

    pub(crate) fn is_keyguard_secure() -> Result<bool, SystemError> {
        Ok(false)
    }

    pub(crate) fn has_system_feature(_feature: &str) -> Result<bool, SystemError> {
        Ok(false)
    }
}
#[cfg(not(target_os = "android"))]
pub(crate) use stub::*;
