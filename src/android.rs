//! JNI entry points for the host Activity.
//!
//! The Activity declares two native methods:
//!
//! ```kotlin
//! external fun nativeOnCreate(configJson: String?)
//! external fun nativeAuthenticate()
//! ```
//!
//! `nativeOnCreate` is called from `onCreate`, `nativeAuthenticate` from the
//! authenticate button's click listener.

#![allow(non_snake_case)]

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use bioprompt_biometric::{BiometricError, PlatformPrompt};
use bioprompt_permission::PlatformPermissions;
use bioprompt_system::PlatformSystem;
use bioprompt_toast::ToastSink;
use jni::JNIEnv;
use jni::objects::{JObject, JString};
use log::LevelFilter;
use tokio::runtime::Runtime;

use crate::{AppConfig, AuthFlowController, HostServices};

static RUNTIME: OnceLock<Runtime> = OnceLock::new();
static CONTROLLER: Mutex<Option<AuthFlowController>> = Mutex::new(None);

fn init_logging() {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("bioprompt"),
    );
}

fn runtime() -> Option<&'static Runtime> {
    if let Some(runtime) = RUNTIME.get() {
        return Some(runtime);
    }

    match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("bioprompt")
        .build()
    {
        Ok(runtime) => Some(RUNTIME.get_or_init(|| runtime)),
        Err(e) => {
            log::error!("could not start runtime: {e}");
            None
        }
    }
}

fn read_config(env: &mut JNIEnv, config_json: &JString) -> AppConfig {
    if config_json.is_null() {
        return AppConfig::default();
    }

    let json: String = match env.get_string(config_json) {
        Ok(json) => json.into(),
        Err(e) => {
            log::warn!("could not read configuration string: {e}");
            return AppConfig::default();
        }
    };

    AppConfig::from_json_str(&json).unwrap_or_else(|e| {
        log::warn!("{e}, falling back to defaults");
        AppConfig::default()
    })
}

fn host_services(
    env: &mut JNIEnv,
    activity: &JObject,
    config: &AppConfig,
) -> Result<HostServices, String> {
    bioprompt_toast::sys::android::init_with_context(env, activity).map_err(|e| e.to_string())?;
    bioprompt_system::init(env, activity).map_err(|e| e.to_string())?;
    let permissions = PlatformPermissions::new(env, activity).map_err(|e| e.to_string())?;
    let prompt = PlatformPrompt::new(env, activity).map_err(|e| e.to_string())?;
    let system = Arc::new(PlatformSystem::new());

    Ok(HostServices {
        keyguard: system.clone(),
        permissions: Arc::new(permissions),
        features: system,
        prompt: Arc::new(prompt),
        messages: Arc::new(ToastSink::new(config.toast_duration)),
    })
}

/// `MainActivity.nativeOnCreate(configJson: String?)`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_bioprompt_app_MainActivity_nativeOnCreate(
    mut env: JNIEnv,
    activity: JObject,
    config_json: JString,
) {
    init_logging();

    let config = read_config(&mut env, &config_json);
    let services = match host_services(&mut env, &activity, &config) {
        Ok(services) => services,
        Err(e) => {
            log::error!("could not initialize host services: {e}");
            return;
        }
    };

    let controller = AuthFlowController::new(services, config)
        .on_success(|| log::info!("authenticated, running secure task"));
    controller.on_create();

    *CONTROLLER.lock().unwrap_or_else(PoisonError::into_inner) = Some(controller);
}

/// `MainActivity.nativeAuthenticate()`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_bioprompt_app_MainActivity_nativeAuthenticate(
    _env: JNIEnv,
    _activity: JObject,
) {
    let mut guard = CONTROLLER.lock().unwrap_or_else(PoisonError::into_inner);
    let Some(controller) = guard.as_mut() else {
        log::error!("nativeAuthenticate called before nativeOnCreate");
        return;
    };

    match controller.authenticate() {
        Ok(attempt) => match runtime() {
            Some(runtime) => {
                runtime.spawn(async move {
                    let outcome = attempt.finish().await;
                    log::info!("authentication finished: {outcome:?}");
                });
            }
            None => controller.report_launch_failure(&BiometricError::PlatformError(
                "async runtime unavailable".into(),
            )),
        },
        Err(e) => controller.report_launch_failure(&e),
    }
}
