#[cfg(any(target_os = "linux", target_os = "windows", target_os = "macos"))]
mod desktop;
#[cfg(any(target_os = "linux", target_os = "windows", target_os = "macos"))]
pub(crate) use desktop::show_toast;

/// Android backend.
#[cfg(target_os = "android")]
pub mod android;
#[cfg(target_os = "android")]
pub(crate) use android::show_toast;

#[cfg(not(any(
    target_os = "linux",
    target_os = "windows",
    target_os = "macos",
    target_os = "android"
)))]
pub(crate) fn show_toast(_toast: &crate::Toast) -> Result<(), crate::ToastError> {
    Err(crate::ToastError::NotSupported)
}
