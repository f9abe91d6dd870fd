use crate::{Toast, ToastError};
use notify_rust::Notification;

/// Show a toast as a desktop notification.
pub fn show_toast(toast: &Toast) -> Result<(), ToastError> {
    Notification::new()
        .summary("bioprompt")
        .body(&toast.message)
        .show()
        .map(|_| ())
        .map_err(|e| ToastError::Platform(e.to_string()))
}
