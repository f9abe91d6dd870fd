use std::fmt;
use std::sync::Arc;

use bioprompt_biometric::{
    AuthOutcome, AuthReceiver, BiometricError, BiometricPrompt, CancellationSignal, channel,
};
use bioprompt_permission::{Permission, PermissionChecker};
use bioprompt_system::{FEATURE_FINGERPRINT, FeatureService, KeyguardService};
use bioprompt_toast::MessageSink;

use crate::{AppConfig, MessageTable};

/// Code used when the dialog could not be launched at all.
pub(crate) const LAUNCH_FAILURE_CODE: i32 = -1;

type SuccessHook = Arc<dyn Fn() + Send + Sync>;

/// Host capabilities the flow depends on.
#[derive(Clone)]
pub struct HostServices {
    /// Lock-screen state.
    pub keyguard: Arc<dyn KeyguardService>,
    /// Runtime permission checks.
    pub permissions: Arc<dyn PermissionChecker>,
    /// Advertised hardware features.
    pub features: Arc<dyn FeatureService>,
    /// The biometric dialog.
    pub prompt: Arc<dyn BiometricPrompt>,
    /// Where user-visible messages go.
    pub messages: Arc<dyn MessageSink>,
}

impl fmt::Debug for HostServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostServices").finish_non_exhaustive()
    }
}

/// Drives the authentication screen.
pub struct AuthFlowController {
    services: HostServices,
    config: AppConfig,
    cancellation: Option<CancellationSignal>,
    on_success: Option<SuccessHook>,
}

impl AuthFlowController {
    /// Create a controller for one screen.
    #[must_use]
    pub fn new(services: HostServices, config: AppConfig) -> Self {
        Self {
            services,
            config,
            cancellation: None,
            on_success: None,
        }
    }

    /// Run `hook` after every successful authentication, once the success
    /// message has been shown. This is where the protected action goes.
    #[must_use]
    pub fn on_success<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(hook));
        self
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Cancellation handle of the most recent attempt.
    ///
    /// Cancelling it closes the platform dialog and shows the cancel message.
    /// After the attempt has finished it does nothing.
    #[must_use]
    pub const fn cancellation(&self) -> Option<&CancellationSignal> {
        self.cancellation.as_ref()
    }

    /// Screen creation. Runs the precondition check.
    ///
    /// The result is returned for inspection but does not gate
    /// [`authenticate`](Self::authenticate).
    pub fn on_create(&self) -> bool {
        let supported = self.check_biometric_support();
        log::info!("biometric support check: {supported}");
        supported
    }

    /// Check that biometric authentication can be used.
    ///
    /// Emits a message and returns `false` when the keyguard is not secure or
    /// `USE_BIOMETRIC` is not granted. Fingerprint hardware presence is queried
    /// but does not affect the result.
    pub fn check_biometric_support(&self) -> bool {
        let messages = &self.config.messages;

        if !self.services.keyguard.is_keyguard_secure() {
            self.notify(&messages.no_secure_keyguard);
            return false;
        }

        let permission = self.services.permissions.check(Permission::UseBiometric);
        if !permission.is_granted() {
            log::debug!("USE_BIOMETRIC status: {permission:?}");
            self.notify(&messages.permission_not_granted);
            return false;
        }

        let has_fingerprint = self.services.features.has_system_feature(FEATURE_FINGERPRINT);
        log::debug!("fingerprint hardware present: {has_fingerprint}");
        true
    }

    /// Open the biometric dialog.
    ///
    /// A fresh cancellation handle replaces the previous one. The call returns
    /// as soon as the dialog is launched; drive the returned [`AuthAttempt`] to
    /// route its outcome to the message sink.
    ///
    /// # Errors
    /// Returns a [`BiometricError`] if the prompt text is invalid or the
    /// platform could not show the dialog.
    pub fn authenticate(&mut self) -> Result<AuthAttempt, BiometricError> {
        let prompt = self.config.prompt.prompt_info()?;

        let cancellation = CancellationSignal::new();
        let sink = Arc::clone(&self.services.messages);
        let cancelled = self.config.messages.cancelled.clone();
        cancellation.set_on_cancel_listener(move || sink.show(&cancelled));
        self.cancellation = Some(cancellation.clone());

        let (callback, receiver) = channel();
        self.services
            .prompt
            .authenticate(&prompt, cancellation.clone(), callback)?;
        log::info!("biometric prompt launched");

        Ok(AuthAttempt {
            receiver,
            cancellation,
            sink: Arc::clone(&self.services.messages),
            messages: self.config.messages.clone(),
            on_success: self.on_success.clone(),
        })
    }

    /// Tell the user that the dialog could not be launched.
    pub fn report_launch_failure(&self, error: &BiometricError) {
        log::error!("could not launch biometric prompt: {error}");
        self.notify(
            &self
                .config
                .messages
                .error(LAUNCH_FAILURE_CODE, &error.to_string()),
        );
    }

    fn notify(&self, message: &str) {
        self.services.messages.show(message);
    }
}

impl fmt::Debug for AuthFlowController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthFlowController")
            .field("config", &self.config)
            .field("cancellation", &self.cancellation)
            .finish_non_exhaustive()
    }
}

/// One launched dialog, waiting for its outcome.
#[must_use = "the outcome is only reported once the attempt is finished"]
pub struct AuthAttempt {
    receiver: AuthReceiver,
    cancellation: CancellationSignal,
    sink: Arc<dyn MessageSink>,
    messages: MessageTable,
    on_success: Option<SuccessHook>,
}

impl AuthAttempt {
    /// Cancellation handle of this attempt.
    #[must_use]
    pub const fn cancellation(&self) -> &CancellationSignal {
        &self.cancellation
    }

    /// Wait for the outcome and show the matching message.
    ///
    /// A cancellation wins over any result the platform reports for the same
    /// attempt; its message comes from the cancel listener. Once a result is
    /// shown the attempt's handle is resolved and cancelling it does nothing.
    /// Returns `None` if the platform dropped the attempt without reporting
    /// anything.
    pub async fn finish(self) -> Option<AuthOutcome> {
        let Self {
            receiver,
            cancellation,
            sink,
            messages,
            on_success,
        } = self;

        let result = tokio::select! {
            biased;
            () = cancellation.cancelled() => return Some(AuthOutcome::Cancelled),
            result = receiver => result,
        };

        // Disarms the handle the controller still holds. Fails only if a
        // cancel got in after the result arrived.
        if !cancellation.resolve() {
            return Some(AuthOutcome::Cancelled);
        }

        match result {
            Ok(AuthOutcome::Succeeded) => {
                sink.show(&messages.succeeded);
                if let Some(hook) = on_success {
                    hook();
                }
                Some(AuthOutcome::Succeeded)
            }
            Ok(AuthOutcome::Error { code, message }) => {
                sink.show(&messages.error(code, &message));
                Some(AuthOutcome::Error { code, message })
            }
            Ok(AuthOutcome::Cancelled) => Some(AuthOutcome::Cancelled),
            Err(_) => {
                log::warn!("biometric prompt finished without a result");
                None
            }
        }
    }
}

impl fmt::Debug for AuthAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthAttempt")
            .field("cancellation", &self.cancellation)
            .finish_non_exhaustive()
    }
}
