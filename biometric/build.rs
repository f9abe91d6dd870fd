//! Build script for bioprompt-biometric.
//!
//! On Android targets the Kotlin helper is compiled to DEX and embedded.

use std::{env, path::PathBuf, process::Command};

const KOTLIN_FILE_RELATIVE_PATH: &str = "src/sys/android/BiometricHelper.kt";

fn main() {
    println!("cargo:rerun-if-changed={KOTLIN_FILE_RELATIVE_PATH}");

    if env::var("CARGO_CFG_TARGET_OS").unwrap() == "android" {
        build_android();
    }
}

fn build_android() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let kotlin_file =
        PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap()).join(KOTLIN_FILE_RELATIVE_PATH);

    let android_jar_path = android_build::android_jar(None).expect("Failed to find android.jar");

    // Compile .kt -> .class using kotlinc
    let classes_dir = out_dir.join("classes");
    std::fs::create_dir_all(&classes_dir).expect("Failed to create classes directory");

    let kotlinc_status = Command::new("kotlinc")
        .arg("-classpath")
        .arg(&android_jar_path)
        .arg("-d")
        .arg(&classes_dir)
        .arg(&kotlin_file)
        .status()
        .expect("Failed to run kotlinc - is Kotlin compiler installed?");

    assert!(kotlinc_status.success(), "kotlinc compilation failed");

    // The helper compiles to several classes (the object plus its callback).
    let package_dir = classes_dir.join("bioprompt").join("biometric");
    let class_files: Vec<PathBuf> = std::fs::read_dir(&package_dir)
        .expect("Failed to list compiled classes")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "class"))
        .collect();

    let d8_jar_path = android_build::android_d8_jar(None).expect("Failed to find d8.jar");

    // Convert .class -> .dex using D8
    let mut d8 = android_build::JavaRun::new();
    d8.class_path(d8_jar_path)
        .main_class("com.android.tools.r8.D8")
        .arg("--classpath")
        .arg(android_jar_path)
        .arg("--output")
        .arg(&out_dir);
    for class_file in &class_files {
        d8.arg(class_file);
    }

    assert!(
        d8.run()
            .expect("failed to acquire exit status for java d8.jar invocation")
            .success(),
        "D8 dexing failed"
    );
}
