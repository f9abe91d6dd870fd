//! Android biometric prompt backend using JNI.
//!
//! `android.hardware.biometrics.BiometricPrompt` needs a callback object and a
//! cancel listener, neither of which can be implemented from JNI directly. The
//! embedded `BiometricHelper` class builds the dialog and reports back through
//! a single native method, `onFinished`. Cancelling the Rust handle reaches
//! the dialog through the helper's static `cancel`.

use super::init::InitCell;
use crate::{AuthCallback, BiometricError, BiometricPrompt, CancellationSignal, PromptInfo};
use jni::objects::{GlobalRef, JClass, JObject, JString, JValue};
use jni::sys::{jint, jlong};
use jni::{JNIEnv, JavaVM};
use std::fmt;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicI64, Ordering};

/// Embedded DEX bytecode containing the BiometricHelper class.
static DEX_BYTES: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/classes.dex"));

/// Class loader of the helper DEX, published once its natives are registered.
static CLASS_LOADER: InitCell<GlobalRef> = InitCell::new();

static JAVA_VM: OnceLock<JavaVM> = OnceLock::new();

/// Ids the helper uses to find a dialog again. Never reused, unlike heap
/// addresses.
static NEXT_ATTEMPT: AtomicI64 = AtomicI64::new(1);

const HELPER_CLASS: &str = "bioprompt.biometric.BiometricHelper";

// Result kinds (must match Kotlin).
const KIND_SUCCEEDED: jint = 0;
const KIND_ERROR: jint = 1;
const KIND_CANCELLED: jint = 2;

/// State parked on the Java side while the dialog is open.
struct PendingAttempt {
    callback: AuthCallback,
    cancellation: CancellationSignal,
}

fn jni_error(what: &str) -> impl FnOnce(jni::errors::Error) -> BiometricError + '_ {
    move |e| BiometricError::PlatformError(format!("{what}: {e}"))
}

/// Log and clear a Java exception left behind by a failed call, so later JNI
/// calls on this thread are legal.
fn clear_pending_exception(env: &mut JNIEnv) {
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
}

/// Initialize the DEX class loader. Must be called with a valid Context.
///
/// The loader is only published after `onFinished` has been registered, so a
/// failed attempt is retried by the next caller.
pub fn init_with_context(env: &mut JNIEnv, context: &JObject) -> Result<(), BiometricError> {
    CLASS_LOADER
        .get_or_try_init(|| {
            let loaded = load_helper(env, context);
            if loaded.is_err() {
                clear_pending_exception(env);
            }
            loaded
        })
        .map(|_| ())
}

fn load_helper(env: &mut JNIEnv, context: &JObject) -> Result<GlobalRef, BiometricError> {
    let cache_dir = env
        .call_method(context, "getCacheDir", "()Ljava/io/File;", &[])
        .and_then(|v| v.l())
        .map_err(jni_error("getCacheDir"))?;

    let cache_path = env
        .call_method(&cache_dir, "getAbsolutePath", "()Ljava/lang/String;", &[])
        .and_then(|v| v.l())
        .map_err(jni_error("getAbsolutePath"))?;

    let dex_path = format!(
        "{}/bioprompt_biometric.dex",
        env.get_string((&cache_path).into())
            .map_err(jni_error("get_string"))?
            .to_str()
            .map_err(|e| BiometricError::PlatformError(format!("to_str: {e}")))?
    );

    std::fs::write(&dex_path, DEX_BYTES)
        .map_err(|e| BiometricError::PlatformError(format!("write DEX: {e}")))?;

    let dex_path_jstring = env.new_string(&dex_path).map_err(jni_error("new_string"))?;

    let parent_loader = env
        .call_method(context, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])
        .and_then(|v| v.l())
        .map_err(jni_error("getClassLoader"))?;

    let dex_class_loader_class = env
        .find_class("dalvik/system/DexClassLoader")
        .map_err(jni_error("find DexClassLoader"))?;

    let class_loader = env
        .new_object(
            dex_class_loader_class,
            "(Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;Ljava/lang/ClassLoader;)V",
            &[
                JValue::Object(&dex_path_jstring),
                JValue::Object(&cache_path),
                JValue::Object(&JObject::null()),
                JValue::Object(&parent_loader),
            ],
        )
        .map_err(jni_error("new DexClassLoader"))?;

    // The helper lives in a secondary DEX, so the runtime cannot resolve its
    // native method by symbol name. Register it on the loaded class instead.
    let class = load_helper_class(env, &class_loader)?;
    register_natives(env, class)?;

    let vm = env.get_java_vm().map_err(jni_error("get_java_vm"))?;
    let _ = JAVA_VM.set(vm);

    let global_ref = env
        .new_global_ref(class_loader)
        .map_err(jni_error("new_global_ref"))?;
    log::info!("biometric helper loaded from {dex_path}");

    Ok(global_ref)
}

fn register_natives(env: &mut JNIEnv, class: JClass) -> Result<(), BiometricError> {
    let native_methods = [jni::NativeMethod {
        name: "onFinished".into(),
        sig: "(JIILjava/lang/String;)V".into(),
        fn_ptr: on_finished as *mut _,
    }];

    env.register_native_methods(class, &native_methods)
        .map_err(jni_error("register_native_methods"))
}

fn load_helper_class<'a>(
    env: &mut JNIEnv<'a>,
    class_loader: &JObject,
) -> Result<JClass<'a>, BiometricError> {
    let helper_class_name = env
        .new_string(HELPER_CLASS)
        .map_err(jni_error("new_string"))?;

    let helper_class = env
        .call_method(
            class_loader,
            "loadClass",
            "(Ljava/lang/String;)Ljava/lang/Class;",
            &[JValue::Object(&helper_class_name)],
        )
        .and_then(|v| v.l())
        .map_err(jni_error("loadClass"))?;

    Ok(helper_class.into())
}

fn get_helper_class<'a>(env: &mut JNIEnv<'a>) -> Result<JClass<'a>, BiometricError> {
    let class_loader = CLASS_LOADER.get().ok_or_else(|| {
        BiometricError::PlatformError("Class loader not initialized".into())
    })?;
    load_helper_class(env, class_loader.as_obj())
}

fn java_vm() -> Result<&'static JavaVM, BiometricError> {
    JAVA_VM
        .get()
        .ok_or_else(|| BiometricError::PlatformError("Java VM not initialized".into()))
}

extern "system" fn on_finished(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    kind: jint,
    code: jint,
    message: JString,
) {
    if handle == 0 {
        log::error!("onFinished called with a null handle");
        return;
    }

    // SAFETY: `handle` was produced by `Box::into_raw` in `authenticate`, and the
    // helper reports each handle exactly once.
    let pending = unsafe { Box::from_raw(handle as *mut PendingAttempt) };
    let PendingAttempt {
        callback,
        cancellation,
    } = *pending;

    match kind {
        KIND_SUCCEEDED => callback.succeeded(),
        KIND_CANCELLED => {
            cancellation.cancel();
            drop(callback);
        }
        KIND_ERROR => {
            let message = if message.is_null() {
                None
            } else {
                match env.get_string(&message) {
                    Ok(text) => Some(text.into()),
                    Err(e) => {
                        log::warn!("could not read biometric error message: {e}");
                        clear_pending_exception(&mut env);
                        None
                    }
                }
            };
            callback.platform_error(code, message);
        }
        other => {
            log::error!("unknown biometric result kind {other}");
            drop(callback);
        }
    }
}

/// Ask the helper to cancel the platform dialog of `attempt`.
fn cancel_platform(attempt: jlong) {
    let result = java_vm().and_then(|vm| {
        let mut env = vm
            .attach_current_thread()
            .map_err(jni_error("attach_current_thread"))?;

        let result = get_helper_class(&mut env).and_then(|class| {
            env.call_static_method(class, "cancel", "(J)V", &[JValue::Long(attempt)])
                .map(|_| ())
                .map_err(jni_error("cancel call"))
        });
        if result.is_err() {
            clear_pending_exception(&mut env);
        }
        result
    });

    if let Err(e) = result {
        log::warn!("could not cancel biometric prompt: {e}");
    }
}

/// Biometric prompt backed by `android.hardware.biometrics.BiometricPrompt`.
pub struct AndroidPrompt {
    activity: GlobalRef,
}

impl AndroidPrompt {
    /// Bind the backend to an Activity.
    ///
    /// # Errors
    /// Returns [`BiometricError::PlatformError`] if the helper DEX cannot be
    /// loaded or the JNI references cannot be created.
    pub fn new(env: &mut JNIEnv, activity: &JObject) -> Result<Self, BiometricError> {
        init_with_context(env, activity)?;

        let activity = env
            .new_global_ref(activity)
            .map_err(jni_error("new_global_ref"))?;

        Ok(Self { activity })
    }

    fn launch(
        &self,
        prompt: &PromptInfo,
        handle: jlong,
        attempt: jlong,
    ) -> Result<(), BiometricError> {
        let mut env = java_vm()?
            .attach_current_thread()
            .map_err(jni_error("attach_current_thread"))?;

        let result = self.call_helper(&mut env, prompt, handle, attempt);
        if result.is_err() {
            // Leave nothing pending for the failure report that follows.
            clear_pending_exception(&mut env);
        }
        result
    }

    fn call_helper(
        &self,
        env: &mut JNIEnv,
        prompt: &PromptInfo,
        handle: jlong,
        attempt: jlong,
    ) -> Result<(), BiometricError> {
        let title = env.new_string(prompt.title()).map_err(jni_error("new_string"))?;
        let subtitle = env
            .new_string(prompt.subtitle())
            .map_err(jni_error("new_string"))?;
        let description = env
            .new_string(prompt.description())
            .map_err(jni_error("new_string"))?;
        let negative = env
            .new_string(prompt.negative_button())
            .map_err(jni_error("new_string"))?;

        let class = get_helper_class(env)?;
        env.call_static_method(
            class,
            "authenticate",
            "(Landroid/app/Activity;Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;JJ)V",
            &[
                JValue::Object(self.activity.as_obj()),
                JValue::Object(&title),
                JValue::Object(&subtitle),
                JValue::Object(&description),
                JValue::Object(&negative),
                JValue::Long(handle),
                JValue::Long(attempt),
            ],
        )
        .map_err(jni_error("authenticate call"))?;

        Ok(())
    }
}

impl BiometricPrompt for AndroidPrompt {
    fn authenticate(
        &self,
        prompt: &PromptInfo,
        cancellation: CancellationSignal,
        callback: AuthCallback,
    ) -> Result<(), BiometricError> {
        let attempt = NEXT_ATTEMPT.fetch_add(1, Ordering::Relaxed);
        let pending = Box::new(PendingAttempt {
            callback,
            cancellation: cancellation.clone(),
        });
        let handle = Box::into_raw(pending) as jlong;

        if let Err(e) = self.launch(prompt, handle, attempt) {
            // The helper never saw the handle, so reclaim it here.
            // SAFETY: `handle` came from `Box::into_raw` above and was not reported.
            drop(unsafe { Box::from_raw(handle as *mut PendingAttempt) });
            return Err(e);
        }

        cancellation.set_platform_hook(move || cancel_platform(attempt));
        Ok(())
    }
}

impl fmt::Debug for AndroidPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AndroidPrompt").finish_non_exhaustive()
    }
}
