//! # bioprompt
//!
//! A single-screen fingerprint authentication flow on top of the platform
//! biometric prompt.
//!
//! The [`AuthFlowController`] checks two preconditions when the screen is
//! created (secure keyguard, `USE_BIOMETRIC` granted), opens the biometric
//! dialog when the user presses the button, and turns every outcome into a
//! transient message. All host capabilities are injected through
//! [`HostServices`], so the flow runs against fakes in tests and against JNI
//! backends on Android.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bioprompt::{AppConfig, AuthFlowController, HostServices};
//!
//! async fn run(services: HostServices) {
//!     let mut controller = AuthFlowController::new(services, AppConfig::default());
//!     controller.on_create();
//!
//!     if let Ok(attempt) = controller.authenticate() {
//!         let outcome = attempt.finish().await;
//!         println!("{outcome:?}");
//!     }
//! }
//! ```

#![warn(missing_docs)]

mod config;
mod controller;
mod messages;

#[cfg(target_os = "android")]
mod android;

pub use config::{AppConfig, ConfigError, PromptText};
pub use controller::{AuthAttempt, AuthFlowController, HostServices};
pub use messages::MessageTable;

pub use bioprompt_biometric as biometric;
pub use bioprompt_permission as permission;
pub use bioprompt_system as system;
pub use bioprompt_toast as toast;
