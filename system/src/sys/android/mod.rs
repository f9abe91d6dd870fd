use crate::SystemError;
use jni::objects::{GlobalRef, JObject, JValue};
use jni::{JNIEnv, JavaVM};
use std::sync::OnceLock;

static JAVA_VM: OnceLock<JavaVM> = OnceLock::new();
static CONTEXT: OnceLock<GlobalRef> = OnceLock::new();

/// Initialize the system module with an Android context.
///
/// Only the application context is kept, so passing an Activity does not pin
/// it. Must be called before the services are queried. Later calls are
/// ignored.
///
/// # Errors
/// Returns [`SystemError::Jni`] if the VM or the global reference cannot be obtained.
pub fn init(env: &mut JNIEnv, context: &JObject) -> Result<(), SystemError> {
    if CONTEXT.get().is_some() {
        return Ok(());
    }

    let vm = env
        .get_java_vm()
        .map_err(|e| SystemError::Jni(format!("get_java_vm: {e}")))?;
    let _ = JAVA_VM.set(vm);

    let app_context = application_context(env, context)
        .map_err(|e| SystemError::Jni(format!("getApplicationContext: {e}")))?;
    let global_ctx = env
        .new_global_ref(app_context)
        .map_err(|e| SystemError::Jni(format!("new_global_ref: {e}")))?;
    let _ = CONTEXT.set(global_ctx);
    Ok(())
}

/// `context.getApplicationContext()`, or `context` itself when that is null.
fn application_context<'a>(
    env: &mut JNIEnv<'a>,
    context: &JObject,
) -> jni::errors::Result<JObject<'a>> {
    let app = env
        .call_method(
            context,
            "getApplicationContext",
            "()Landroid/content/Context;",
            &[],
        )?
        .l()?;
    if app.is_null() {
        return env.new_local_ref(context);
    }
    Ok(app)
}

fn with_jni<T, F>(f: F) -> Result<T, SystemError>
where
    F: FnOnce(&mut JNIEnv, &JObject) -> jni::errors::Result<T>,
{
    let vm = JAVA_VM.get().ok_or(SystemError::NotInitialized)?;
    let ctx = CONTEXT.get().ok_or(SystemError::NotInitialized)?;

    let mut env = vm
        .attach_current_thread()
        .map_err(|e| SystemError::Jni(format!("attach_current_thread: {e}")))?;
    f(&mut env, ctx.as_obj()).map_err(|e| SystemError::Jni(e.to_string()))
}

pub(crate) fn is_keyguard_secure() -> Result<bool, SystemError> {
    with_jni(|env, ctx| {
        let service_name = env.new_string("keyguard")?;
        let keyguard = env
            .call_method(
                ctx,
                "getSystemService",
                "(Ljava/lang/String;)Ljava/lang/Object;",
                &[JValue::Object(&service_name)],
            )?
            .l()?;

        if keyguard.is_null() {
            return Ok(false);
        }

        env.call_method(&keyguard, "isKeyguardSecure", "()Z", &[])?.z()
    })
}

pub(crate) fn has_system_feature(feature: &str) -> Result<bool, SystemError> {
    with_jni(|env, ctx| {
        let package_manager = env
            .call_method(
                ctx,
                "getPackageManager",
                "()Landroid/content/pm/PackageManager;",
                &[],
            )?
            .l()?;

        let feature = env.new_string(feature)?;
        env.call_method(
            &package_manager,
            "hasSystemFeature",
            "(Ljava/lang/String;)Z",
            &[JValue::Object(&feature)],
        )?
        .z()
    })
}
