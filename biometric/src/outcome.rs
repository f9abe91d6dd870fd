use std::fmt;

use tokio::sync::oneshot;

/// How a single authentication attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The platform matched the user's biometric.
    Succeeded,
    /// The platform reported an error. Code and message are passed through as-is.
    Error {
        /// Platform error code.
        code: i32,
        /// Human-readable message from the platform.
        message: String,
    },
    /// The user cancelled through the cancellation handle.
    Cancelled,
}

const MISSING_MESSAGE: &str = "null";

/// Receiving half of an attempt's result channel.
pub type AuthReceiver = oneshot::Receiver<AuthOutcome>;

/// Result sender handed to the platform for one attempt.
///
/// Both methods consume the callback, so at most one terminal result can be
/// reported per attempt.
pub struct AuthCallback {
    sender: oneshot::Sender<AuthOutcome>,
}

/// Create a callback and the receiver that observes it.
#[must_use]
pub fn channel() -> (AuthCallback, AuthReceiver) {
    let (sender, receiver) = oneshot::channel();
    (AuthCallback { sender }, receiver)
}

impl AuthCallback {
    /// Report a successful match.
    pub fn succeeded(self) {
        let _ = self.sender.send(AuthOutcome::Succeeded);
    }

    /// Report an unrecoverable error.
    pub fn error(self, code: i32, message: impl Into<String>) {
        let message = message.into();
        log::debug!(
            "biometric error {} ({code}): {message}",
            BiometricErrorCode::from(code)
        );
        let _ = self.sender.send(AuthOutcome::Error { code, message });
    }

    /// Report an error whose message may be missing.
    ///
    /// The platform passes a null error string through as the text `null`.
    pub fn platform_error(self, code: i32, message: Option<String>) {
        self.error(code, message.unwrap_or_else(|| MISSING_MESSAGE.to_owned()));
    }

    /// Whether the receiving side has gone away.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl fmt::Debug for AuthCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthCallback")
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}

/// Named view of the platform's biometric error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BiometricErrorCode {
    /// The hardware is unavailable; try again later.
    HwUnavailable,
    /// The sensor could not process the current image.
    UnableToProcess,
    /// The attempt timed out.
    Timeout,
    /// Not enough storage to complete the operation.
    NoSpace,
    /// The operation was cancelled because the sensor is unavailable.
    Canceled,
    /// Too many attempts; temporarily locked out.
    Lockout,
    /// Vendor-specific error.
    Vendor,
    /// Too many lockouts; strong authentication is required.
    LockoutPermanent,
    /// The user cancelled the operation.
    UserCanceled,
    /// No biometrics enrolled.
    NoBiometrics,
    /// The device has no biometric sensor.
    HwNotPresent,
    /// The user pressed the negative button.
    NegativeButton,
    /// No PIN, pattern or password set.
    NoDeviceCredential,
    /// Any code not listed above.
    Other(i32),
}

impl From<i32> for BiometricErrorCode {
    fn from(code: i32) -> Self {
        match code {
            1 => Self::HwUnavailable,
            2 => Self::UnableToProcess,
            3 => Self::Timeout,
            4 => Self::NoSpace,
            5 => Self::Canceled,
            7 => Self::Lockout,
            8 => Self::Vendor,
            9 => Self::LockoutPermanent,
            10 => Self::UserCanceled,
            11 => Self::NoBiometrics,
            12 => Self::HwNotPresent,
            13 => Self::NegativeButton,
            14 => Self::NoDeviceCredential,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for BiometricErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::HwUnavailable => "HW_UNAVAILABLE",
            Self::UnableToProcess => "UNABLE_TO_PROCESS",
            Self::Timeout => "TIMEOUT",
            Self::NoSpace => "NO_SPACE",
            Self::Canceled => "CANCELED",
            Self::Lockout => "LOCKOUT",
            Self::Vendor => "VENDOR",
            Self::LockoutPermanent => "LOCKOUT_PERMANENT",
            Self::UserCanceled => "USER_CANCELED",
            Self::NoBiometrics => "NO_BIOMETRICS",
            Self::HwNotPresent => "HW_NOT_PRESENT",
            Self::NegativeButton => "NEGATIVE_BUTTON",
            Self::NoDeviceCredential => "NO_DEVICE_CREDENTIAL",
            Self::Other(_) => "UNKNOWN",
        };
        f.write_str(name)
    }
}
