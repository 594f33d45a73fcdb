//! Architectural Contract Test: Notifications
//!
//! This test verifies when the reconciler notifies and what it says.
//!
//! Constraints verified:
//! - A create sends one "Creating DNS record" notification
//! - An update lists each changed field, then the time
//! - Up-to-date and throttled records send nothing
//! - Notifications are off unless enabled, even with a notifier present
//! - A failing notifier does not fail the run

mod common;

use cfddns_core::EngineConfig;
use cfddns_core::engine::Reconciler;
use common::*;

fn notifying(provider: &FakeDnsProvider, notifier: &RecordingNotifier, notify: bool) -> Reconciler {
    Reconciler::new(
        Box::new(provider.clone()),
        Some(Box::new(notifier.clone())),
        EngineConfig {
            notify,
            ..live_config()
        },
    )
}

#[tokio::test]
async fn create_sends_creating_notification() {
    let provider = FakeDnsProvider::new(vec![]);
    let notifier = RecordingNotifier::new();

    notifying(&provider, &notifier, true)
        .run(DOMAIN, &desired("1.2.3.4"), now())
        .await
        .expect("run succeeds");

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].title, format!("Creating DNS record: {}", FQDN));
    assert!(sent[0].body.contains("Content: 1.2.3.4"));
    assert!(sent[0].body.contains("Time: "));
}

#[tokio::test]
async fn update_lists_changed_fields() {
    let mut stale = observed("rec-1", "1.2.3.4", 3600);
    stale.proxied = true;
    let provider = FakeDnsProvider::new(vec![stale]);
    let notifier = RecordingNotifier::new();

    notifying(&provider, &notifier, true)
        .run(DOMAIN, &desired("5.6.7.8"), now())
        .await
        .expect("run succeeds");

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].title, format!("Updating DNS record: {}", FQDN));

    let lines: Vec<&str> = sent[0].body.lines().collect();
    assert_eq!(lines[0], "Content change: 1.2.3.4 -> 5.6.7.8");
    assert_eq!(lines[1], "Proxied change: true -> false");
    assert!(lines[2].starts_with("Time: "));
}

#[tokio::test]
async fn no_action_means_no_notification() {
    let provider = FakeDnsProvider::new(vec![
        observed("rec-1", "5.6.7.8", 3600),
        observed("rec-2", "1.2.3.4", 10),
    ]);
    let notifier = RecordingNotifier::new();

    notifying(&provider, &notifier, true)
        .run(DOMAIN, &desired("5.6.7.8"), now())
        .await
        .expect("run succeeds");

    assert_eq!(provider.mutation_count(), 0);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn notifications_disabled_by_default() {
    let provider = FakeDnsProvider::new(vec![]);
    let notifier = RecordingNotifier::new();

    notifying(&provider, &notifier, false)
        .run(DOMAIN, &desired("1.2.3.4"), now())
        .await
        .expect("run succeeds");

    assert_eq!(provider.created().len(), 1);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn notifier_failure_does_not_fail_run() {
    let provider = FakeDnsProvider::new(vec![observed("rec-1", "1.2.3.4", 3600)]);
    let notifier = RecordingNotifier::failing();

    let report = notifying(&provider, &notifier, true)
        .run(DOMAIN, &desired("5.6.7.8"), now())
        .await
        .expect("notification failure is not fatal");

    assert_eq!(notifier.sent().len(), 1);
    assert_eq!(provider.updated_ids(), vec!["rec-1".to_string()]);
    assert_eq!(report.outcomes.len(), 1);
}
