mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bioprompt::biometric::{AuthOutcome, BiometricError};
use bioprompt::permission::PermissionStatus;
use bioprompt::{AppConfig, MessageTable};
use common::{FakePrompt, harness};

const CANCELLED: &str = "Authentication is cancelled by the user.";

#[tokio::test]
async fn success_shows_one_message() {
    let mut h = harness().build();
    let attempt = h.controller.authenticate().unwrap();

    h.prompt.take_dialog().callback.succeeded();

    assert_eq!(attempt.finish().await, Some(AuthOutcome::Succeeded));
    assert_eq!(h.sink.messages(), ["Authentication Succeeded!"]);
}

#[tokio::test]
async fn error_message_is_passed_through() {
    let mut h = harness().build();
    let attempt = h.controller.authenticate().unwrap();

    h.prompt.take_dialog().callback.error(7, "Lockout");

    assert_eq!(
        attempt.finish().await,
        Some(AuthOutcome::Error {
            code: 7,
            message: "Lockout".into()
        })
    );
    assert_eq!(h.sink.messages(), ["Authentication Error: Lockout"]);
}

#[tokio::test]
async fn missing_error_text_reads_null() {
    let mut h = harness().build();
    let attempt = h.controller.authenticate().unwrap();

    h.prompt.take_dialog().callback.platform_error(5, None);

    attempt.finish().await;
    assert_eq!(h.sink.messages(), ["Authentication Error: null"]);
}

#[tokio::test]
async fn cancellation_suppresses_late_results() {
    let mut h = harness().build();
    let attempt = h.controller.authenticate().unwrap();
    let dialog = h.prompt.take_dialog();

    dialog.cancellation.cancel();
    dialog.callback.succeeded();

    assert_eq!(attempt.finish().await, Some(AuthOutcome::Cancelled));
    assert_eq!(h.sink.messages(), [CANCELLED]);
}

#[tokio::test]
async fn cancellation_wakes_a_waiting_attempt() {
    let mut h = harness().build();
    let attempt = h.controller.authenticate().unwrap();
    let dialog = h.prompt.take_dialog();

    let waiting = tokio::spawn(attempt.finish());
    tokio::time::sleep(Duration::from_millis(10)).await;
    dialog.cancellation.cancel();

    let outcome = tokio::time::timeout(Duration::from_secs(1), waiting)
        .await
        .expect("attempt resolved")
        .unwrap();
    assert_eq!(outcome, Some(AuthOutcome::Cancelled));
    assert_eq!(h.sink.messages(), [CANCELLED]);

    // The platform may still hold the callback; reporting now changes nothing.
    dialog.callback.error(5, "Canceled");
    assert_eq!(h.sink.messages(), [CANCELLED]);
}

#[tokio::test]
async fn cancel_message_is_shown_without_finishing() {
    let mut h = harness().build();
    let _attempt = h.controller.authenticate().unwrap();

    h.controller.cancellation().unwrap().cancel();
    assert_eq!(h.sink.messages(), [CANCELLED]);
}

#[tokio::test]
async fn cancelling_the_handle_closes_the_dialog() {
    let mut h = harness().build();
    let attempt = h.controller.authenticate().unwrap();
    let dialog = h.prompt.take_dialog();

    h.controller.cancellation().unwrap().cancel();

    assert_eq!(h.prompt.closed.load(Ordering::SeqCst), 1);
    assert_eq!(attempt.finish().await, Some(AuthOutcome::Cancelled));
    assert_eq!(h.sink.messages(), [CANCELLED]);
    drop(dialog);
}

#[tokio::test]
async fn cancel_after_success_is_ignored() {
    let mut h = harness().build();
    let attempt = h.controller.authenticate().unwrap();
    h.prompt.take_dialog().callback.succeeded();
    assert_eq!(attempt.finish().await, Some(AuthOutcome::Succeeded));

    let handle = h.controller.cancellation().unwrap();
    handle.cancel();

    assert!(handle.is_resolved());
    assert!(!handle.is_cancelled());
    assert_eq!(h.prompt.closed.load(Ordering::SeqCst), 0);
    assert_eq!(h.sink.messages(), ["Authentication Succeeded!"]);
}

#[tokio::test]
async fn cancel_after_error_is_ignored() {
    let mut h = harness().build();
    let attempt = h.controller.authenticate().unwrap();
    h.prompt.take_dialog().callback.error(7, "Lockout");
    attempt.finish().await;

    h.controller.cancellation().unwrap().cancel();

    assert_eq!(h.prompt.closed.load(Ordering::SeqCst), 0);
    assert_eq!(h.sink.messages(), ["Authentication Error: Lockout"]);
}

#[tokio::test]
async fn cancel_after_dropped_dialog_is_ignored() {
    let mut h = harness().build();
    let attempt = h.controller.authenticate().unwrap();
    drop(h.prompt.take_dialog());
    assert_eq!(attempt.finish().await, None);

    h.controller.cancellation().unwrap().cancel();
    assert!(h.sink.messages().is_empty());
}

#[tokio::test]
async fn dropped_dialog_reports_nothing() {
    let mut h = harness().build();
    let attempt = h.controller.authenticate().unwrap();

    drop(h.prompt.take_dialog());

    assert_eq!(attempt.finish().await, None);
    assert!(h.sink.messages().is_empty());
}

#[tokio::test]
async fn authenticate_ignores_failed_preconditions() {
    let mut h = harness()
        .keyguard_secure(false)
        .permission(PermissionStatus::Denied)
        .build();

    assert!(!h.controller.on_create());
    let attempt = h.controller.authenticate().unwrap();
    assert_eq!(h.prompt.launches.load(Ordering::SeqCst), 1);

    h.prompt.take_dialog().callback.succeeded();
    attempt.finish().await;
    assert_eq!(
        h.sink.messages(),
        ["No Fingerprint enrolled.", "Authentication Succeeded!"]
    );
}

#[tokio::test]
async fn every_attempt_gets_a_fresh_handle() {
    let mut h = harness().build();

    let first = h.controller.authenticate().unwrap();
    let first_dialog = h.prompt.take_dialog();
    let second = h.controller.authenticate().unwrap();
    let second_dialog = h.prompt.take_dialog();

    assert!(!first.cancellation().same_as(second.cancellation()));
    assert!(
        h.controller
            .cancellation()
            .unwrap()
            .same_as(second.cancellation())
    );

    first_dialog.cancellation.cancel();
    assert!(!second.cancellation().is_cancelled());

    second_dialog.callback.succeeded();
    assert_eq!(first.finish().await, Some(AuthOutcome::Cancelled));
    assert_eq!(second.finish().await, Some(AuthOutcome::Succeeded));
    assert_eq!(
        h.sink.messages(),
        [CANCELLED, "Authentication Succeeded!"]
    );
}

#[tokio::test]
async fn dialog_uses_configured_text() {
    let mut h = harness().build();
    let _attempt = h.controller.authenticate().unwrap();

    let dialog = h.prompt.take_dialog();
    assert_eq!(dialog.prompt.title(), "Biometric Authentication");
    assert_eq!(dialog.prompt.subtitle(), "Login using biometric credential.");
    assert_eq!(dialog.prompt.description(), "Fingerprint Authentication");
    assert_eq!(dialog.prompt.negative_button(), "Cancel");
}

#[tokio::test]
async fn messages_come_from_the_table() {
    let config = AppConfig {
        messages: MessageTable {
            succeeded: "Angemeldet.".into(),
            error: "Fehler {code}: {message}".into(),
            cancelled: "Abgebrochen.".into(),
            ..MessageTable::default()
        },
        ..AppConfig::default()
    };
    let mut h = harness().config(config).build();

    let attempt = h.controller.authenticate().unwrap();
    h.prompt.take_dialog().callback.succeeded();
    attempt.finish().await;

    let attempt = h.controller.authenticate().unwrap();
    h.prompt.take_dialog().callback.error(7, "Gesperrt");
    attempt.finish().await;

    let attempt = h.controller.authenticate().unwrap();
    h.prompt.take_dialog().cancellation.cancel();
    attempt.finish().await;

    assert_eq!(
        h.sink.messages(),
        ["Angemeldet.", "Fehler 7: Gesperrt", "Abgebrochen."]
    );
}

#[tokio::test]
async fn success_hook_runs_after_message() {
    let h = harness().build();
    let sink = h.sink.clone();
    let runs = Arc::new(AtomicUsize::new(0));
    let seen = runs.clone();
    let mut controller = h.controller.on_success(move || {
        assert_eq!(sink.messages(), ["Authentication Succeeded!"]);
        seen.fetch_add(1, Ordering::SeqCst);
    });

    let attempt = controller.authenticate().unwrap();
    h.prompt.take_dialog().callback.succeeded();
    attempt.finish().await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    let attempt = controller.authenticate().unwrap();
    h.prompt.take_dialog().callback.error(7, "Lockout");
    attempt.finish().await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn refused_launch_is_an_error() {
    let mut h = harness().prompt(FakePrompt::refusing()).build();

    let err = h.controller.authenticate().unwrap_err();
    assert!(matches!(err, BiometricError::NotAvailable));

    h.controller.report_launch_failure(&err);
    assert_eq!(
        h.sink.messages(),
        ["Authentication Error: Biometric authentication is not available on this device"]
    );
}

#[test]
fn invalid_prompt_text_never_reaches_the_platform() {
    let mut config = AppConfig::default();
    config.prompt.negative_button.clear();
    let mut h = harness().config(config).build();

    assert!(matches!(
        h.controller.authenticate(),
        Err(BiometricError::InvalidPrompt(_))
    ));
    assert_eq!(h.prompt.launches.load(Ordering::SeqCst), 0);
}
