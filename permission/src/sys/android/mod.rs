//! Android permission implementation using JNI.

use crate::{Permission, PermissionChecker, PermissionError, PermissionStatus};
use jni::objects::{GlobalRef, JObject, JValue};
use jni::sys::jint;
use jni::{JNIEnv, JavaVM};
use std::fmt;

/// `PackageManager.PERMISSION_GRANTED`.
const PERMISSION_GRANTED: jint = 0;
/// `PackageManager.PERMISSION_DENIED`.
const PERMISSION_DENIED: jint = -1;

fn status_from_jint(status: jint) -> PermissionStatus {
    match status {
        PERMISSION_GRANTED => PermissionStatus::Granted,
        PERMISSION_DENIED => PermissionStatus::Denied,
        _ => PermissionStatus::NotDetermined,
    }
}

/// Check a permission using the Activity context.
///
/// # Errors
/// Returns [`PermissionError::Unknown`] if a JNI call fails.
pub fn check_with_activity(
    env: &mut JNIEnv,
    activity: &JObject,
    permission: Permission,
) -> Result<PermissionStatus, PermissionError> {
    let name = env
        .new_string(permission.manifest_name())
        .map_err(|e| PermissionError::Unknown(format!("new_string: {e}")))?;

    let result = env
        .call_method(
            activity,
            "checkSelfPermission",
            "(Ljava/lang/String;)I",
            &[JValue::Object(&name)],
        )
        .map_err(|e| PermissionError::Unknown(format!("checkSelfPermission: {e}")))?
        .i()
        .map_err(|e| PermissionError::Unknown(format!("checkSelfPermission result: {e}")))?;

    Ok(status_from_jint(result))
}

/// Permission checker bound to an Activity.
pub struct AndroidPermissions {
    vm: JavaVM,
    activity: GlobalRef,
}

impl AndroidPermissions {
    /// Bind the checker to an Activity.
    ///
    /// # Errors
    /// Returns [`PermissionError::Unknown`] if the JNI references cannot be created.
    pub fn new(env: &mut JNIEnv, activity: &JObject) -> Result<Self, PermissionError> {
        let vm = env
            .get_java_vm()
            .map_err(|e| PermissionError::Unknown(format!("get_java_vm: {e}")))?;
        let activity = env
            .new_global_ref(activity)
            .map_err(|e| PermissionError::Unknown(format!("new_global_ref: {e}")))?;
        Ok(Self { vm, activity })
    }
}

impl PermissionChecker for AndroidPermissions {
    fn check(&self, permission: Permission) -> PermissionStatus {
        let status = self
            .vm
            .attach_current_thread()
            .map_err(|e| PermissionError::Unknown(format!("attach_current_thread: {e}")))
            .and_then(|mut env| check_with_activity(&mut env, self.activity.as_obj(), permission));

        status.unwrap_or_else(|e| {
            log::warn!("permission check for {permission:?} failed: {e}");
            PermissionStatus::NotDetermined
        })
    }
}

impl fmt::Debug for AndroidPermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AndroidPermissions").finish_non_exhaustive()
    }
}
