//! Android toast implementation using JNI.

use crate::{Toast, ToastDuration, ToastError};
use jni::objects::{GlobalRef, JObject, JValue};
use jni::sys::jint;
use jni::{JNIEnv, JavaVM};
use std::sync::OnceLock;

/// Embedded DEX bytecode containing ToastHelper class.
static DEX_BYTES: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/classes.dex"));

/// Cached class loader.
static CLASS_LOADER: OnceLock<GlobalRef> = OnceLock::new();

static JAVA_VM: OnceLock<JavaVM> = OnceLock::new();
static CONTEXT: OnceLock<GlobalRef> = OnceLock::new();

/// `Toast.LENGTH_SHORT` / `Toast.LENGTH_LONG`.
const LENGTH_SHORT: jint = 0;
const LENGTH_LONG: jint = 1;

fn platform(what: &str) -> impl FnOnce(jni::errors::Error) -> ToastError + '_ {
    move |e| ToastError::Platform(format!("{what}: {e}"))
}

/// Initialize toasts with a valid Context. Later calls are ignored.
///
/// # Errors
/// Returns [`ToastError::Platform`] if the helper DEX cannot be loaded.
pub fn init_with_context(env: &mut JNIEnv, context: &JObject) -> Result<(), ToastError> {
    if CLASS_LOADER.get().is_some() {
        return Ok(());
    }

    let cache_dir = env
        .call_method(context, "getCacheDir", "()Ljava/io/File;", &[])
        .and_then(|v| v.l())
        .map_err(platform("getCacheDir"))?;

    let cache_path = env
        .call_method(&cache_dir, "getAbsolutePath", "()Ljava/lang/String;", &[])
        .and_then(|v| v.l())
        .map_err(platform("getAbsolutePath"))?;

    let dex_path = format!(
        "{}/bioprompt_toast.dex",
        env.get_string((&cache_path).into())
            .map_err(platform("get_string"))?
            .to_str()
            .map_err(|e| ToastError::Platform(format!("to_str: {e}")))?
    );

    std::fs::write(&dex_path, DEX_BYTES)
        .map_err(|e| ToastError::Platform(format!("Failed to write DEX: {e}")))?;

    let dex_path_jstring = env.new_string(&dex_path).map_err(platform("new_string"))?;

    let parent_loader = env
        .call_method(context, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])
        .and_then(|v| v.l())
        .map_err(platform("getClassLoader"))?;

    let dex_class_loader_class = env
        .find_class("dalvik/system/DexClassLoader")
        .map_err(platform("find_class"))?;

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
        .map_err(platform("new_object"))?;

    let global_loader = env
        .new_global_ref(class_loader)
        .map_err(platform("new_global_ref"))?;
    let vm = env.get_java_vm().map_err(platform("get_java_vm"))?;
    // Toasts outlive any one Activity; keep the application context.
    let app_context = env
        .call_method(
            context,
            "getApplicationContext",
            "()Landroid/content/Context;",
            &[],
        )
        .and_then(|v| v.l())
        .map_err(platform("getApplicationContext"))?;
    let global_ctx = if app_context.is_null() {
        env.new_global_ref(context)
    } else {
        env.new_global_ref(app_context)
    }
    .map_err(platform("new_global_ref"))?;

    let _ = JAVA_VM.set(vm);
    let _ = CONTEXT.set(global_ctx);
    let _ = CLASS_LOADER.set(global_loader);
    Ok(())
}

fn get_helper_class<'a>(env: &mut JNIEnv<'a>) -> Result<jni::objects::JClass<'a>, ToastError> {
    let class_loader = CLASS_LOADER
        .get()
        .ok_or_else(|| ToastError::Platform("Class loader not initialized".into()))?;

    let helper_class_name = env
        .new_string("bioprompt.toast.ToastHelper")
        .map_err(platform("new_string name"))?;

    let helper_class = env
        .call_method(
            class_loader.as_obj(),
            "loadClass",
            "(Ljava/lang/String;)Ljava/lang/Class;",
            &[JValue::Object(&helper_class_name)],
        )
        .and_then(|v| v.l())
        .map_err(platform("loadClass"))?;

    Ok(helper_class.into())
}

/// Show a toast from any thread. [`init_with_context`] must have run first.
pub fn show_toast(toast: &Toast) -> Result<(), ToastError> {
    let vm = JAVA_VM
        .get()
        .ok_or_else(|| ToastError::Platform("toast module not initialized".into()))?;
    let context = CONTEXT
        .get()
        .ok_or_else(|| ToastError::Platform("toast module not initialized".into()))?;

    let mut env = vm
        .attach_current_thread()
        .map_err(platform("attach_current_thread"))?;

    let helper_jclass = get_helper_class(&mut env)?;
    let message = env
        .new_string(&toast.message)
        .map_err(platform("new_string"))?;
    let duration = match toast.duration {
        ToastDuration::Short => LENGTH_SHORT,
        ToastDuration::Long => LENGTH_LONG,
    };

    env.call_static_method(
        helper_jclass,
        "show",
        "(Landroid/content/Context;Ljava/lang/String;I)V",
        &[
            JValue::Object(context.as_obj()),
            JValue::Object(&message),
            JValue::Int(duration),
        ],
    )
    .map_err(platform("show"))?;

    Ok(())
}
