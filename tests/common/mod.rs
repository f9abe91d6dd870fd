//! In-memory stand-ins for the host services.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bioprompt::biometric::{
    AuthCallback, BiometricError, BiometricPrompt, CancellationSignal, PromptInfo,
};
use bioprompt::permission::{Permission, PermissionChecker, PermissionStatus};
use bioprompt::system::{FeatureService, KeyguardService};
use bioprompt::toast::MessageSink;
use bioprompt::{AppConfig, AuthFlowController, HostServices};

pub struct FakeKeyguard(pub bool);

impl KeyguardService for FakeKeyguard {
    fn is_keyguard_secure(&self) -> bool {
        self.0
    }
}

#[derive(Default)]
pub struct FakePermissions {
    pub status: Mutex<Option<PermissionStatus>>,
    pub checked: Mutex<Vec<Permission>>,
}

impl FakePermissions {
    pub fn with(status: PermissionStatus) -> Self {
        Self {
            status: Mutex::new(Some(status)),
            checked: Mutex::default(),
        }
    }
}

impl PermissionChecker for FakePermissions {
    fn check(&self, permission: Permission) -> PermissionStatus {
        self.checked.lock().unwrap().push(permission);
        self.status
            .lock()
            .unwrap()
            .unwrap_or(PermissionStatus::NotDetermined)
    }
}

#[derive(Default)]
pub struct FakeFeatures {
    pub present: bool,
    pub queries: Mutex<Vec<String>>,
}

impl FeatureService for FakeFeatures {
    fn has_system_feature(&self, feature: &str) -> bool {
        self.queries.lock().unwrap().push(feature.to_owned());
        self.present
    }
}

#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl MessageSink for RecordingSink {
    fn show(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_owned());
    }
}

/// A launched dialog the test can resolve by hand.
pub struct OpenDialog {
    pub prompt: PromptInfo,
    pub cancellation: CancellationSignal,
    pub callback: AuthCallback,
}

/// Records every launch instead of showing a dialog.
#[derive(Default)]
pub struct FakePrompt {
    pub refuse: bool,
    pub launches: AtomicUsize,
    /// Dialogs torn down through the platform hook.
    pub closed: Arc<AtomicUsize>,
    dialogs: Mutex<Vec<OpenDialog>>,
}

impl FakePrompt {
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    pub fn take_dialog(&self) -> OpenDialog {
        self.dialogs
            .lock()
            .unwrap()
            .pop()
            .expect("no dialog was launched")
    }
}

impl BiometricPrompt for FakePrompt {
    fn authenticate(
        &self,
        prompt: &PromptInfo,
        cancellation: CancellationSignal,
        callback: AuthCallback,
    ) -> Result<(), BiometricError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if self.refuse {
            return Err(BiometricError::NotAvailable);
        }
        let closed = Arc::clone(&self.closed);
        cancellation.set_platform_hook(move || {
            closed.fetch_add(1, Ordering::SeqCst);
        });
        self.dialogs.lock().unwrap().push(OpenDialog {
            prompt: prompt.clone(),
            cancellation,
            callback,
        });
        Ok(())
    }
}

pub struct Harness {
    pub permissions: Arc<FakePermissions>,
    pub features: Arc<FakeFeatures>,
    pub prompt: Arc<FakePrompt>,
    pub sink: Arc<RecordingSink>,
    pub controller: AuthFlowController,
}

pub struct HarnessBuilder {
    keyguard_secure: bool,
    permission: PermissionStatus,
    fingerprint: bool,
    prompt: FakePrompt,
    config: AppConfig,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            keyguard_secure: true,
            permission: PermissionStatus::Granted,
            fingerprint: true,
            prompt: FakePrompt::default(),
            config: AppConfig::default(),
        }
    }
}

impl HarnessBuilder {
    pub fn keyguard_secure(mut self, secure: bool) -> Self {
        self.keyguard_secure = secure;
        self
    }

    pub fn permission(mut self, status: PermissionStatus) -> Self {
        self.permission = status;
        self
    }

    pub fn fingerprint(mut self, present: bool) -> Self {
        self.fingerprint = present;
        self
    }

    pub fn prompt(mut self, prompt: FakePrompt) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Harness {
        let permissions = Arc::new(FakePermissions::with(self.permission));
        let features = Arc::new(FakeFeatures {
            present: self.fingerprint,
            ..FakeFeatures::default()
        });
        let prompt = Arc::new(self.prompt);
        let sink = Arc::new(RecordingSink::default());

        let services = HostServices {
            keyguard: Arc::new(FakeKeyguard(self.keyguard_secure)),
            permissions: permissions.clone(),
            features: features.clone(),
            prompt: prompt.clone(),
            messages: sink.clone(),
        };

        Harness {
            permissions,
            features,
            prompt,
            sink,
            controller: AuthFlowController::new(services, self.config),
        }
    }
}

pub fn harness() -> HarnessBuilder {
    HarnessBuilder::default()
}
