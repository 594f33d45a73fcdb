//! Test doubles and common utilities for reconciliation contract tests
//!
//! These doubles count every collaborator call so tests can assert exactly
//! which provider mutations a run issued.

#![allow(dead_code)]

use cfddns_core::config::EngineConfig;
use cfddns_core::error::{Error, Result};
use cfddns_core::record::{DesiredRecord, ObservedRecord, RecordType, Ttl};
use cfddns_core::traits::{DnsProvider, Notification, Notifier};
use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const ZONE_ID: &str = "zone-123";
pub const DOMAIN: &str = "example.com";
pub const FQDN: &str = "home.example.com";

/// Fixed "now" for deterministic throttle arithmetic
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Desired A record for [`FQDN`]
pub fn desired(content: &str) -> DesiredRecord {
    DesiredRecord::build(RecordType::A, FQDN, content, Ttl::Seconds(300), false)
}

/// Observed record matching [`desired`] except for content and age
pub fn observed(id: &str, content: &str, modified_ago_secs: i64) -> ObservedRecord {
    ObservedRecord {
        id: id.to_string(),
        record_type: "A".to_string(),
        name: FQDN.to_string(),
        content: content.to_string(),
        ttl: 300,
        proxied: false,
        created_on: "2020-01-01T00:00:00.000000Z".to_string(),
        modified_on: (now() - Duration::seconds(modified_ago_secs))
            .to_rfc3339_opts(SecondsFormat::Micros, true),
    }
}

/// Engine settings for a live run with a 300s wait
pub fn live_config() -> EngineConfig {
    EngineConfig {
        wait_secs: 300,
        force: false,
        dry_run: false,
        notify: false,
    }
}

/// A fake DnsProvider that serves canned records and counts calls
///
/// Clones share counters, so a test can hand one clone to the reconciler
/// and keep another for assertions.
#[derive(Clone)]
pub struct FakeDnsProvider {
    records: Arc<Mutex<Vec<ObservedRecord>>>,
    zone_lookups: Arc<AtomicUsize>,
    queries: Arc<AtomicUsize>,
    creates: Arc<Mutex<Vec<DesiredRecord>>>,
    updates: Arc<Mutex<Vec<String>>>,
    /// Mutations panic instead of recording (dry-run contract)
    forbid_mutations: bool,
    /// Fail the Nth update call (1-based)
    fail_update_on: Option<usize>,
    fail_zone_lookup: bool,
}

impl FakeDnsProvider {
    pub fn new(records: Vec<ObservedRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            zone_lookups: Arc::new(AtomicUsize::new(0)),
            queries: Arc::new(AtomicUsize::new(0)),
            creates: Arc::new(Mutex::new(Vec::new())),
            updates: Arc::new(Mutex::new(Vec::new())),
            forbid_mutations: false,
            fail_update_on: None,
            fail_zone_lookup: false,
        }
    }

    /// A provider whose mutation methods must never be reached
    pub fn read_only(records: Vec<ObservedRecord>) -> Self {
        Self {
            forbid_mutations: true,
            ..Self::new(records)
        }
    }

    pub fn failing_update_on(mut self, call: usize) -> Self {
        self.fail_update_on = Some(call);
        self
    }

    pub fn failing_zone_lookup(mut self) -> Self {
        self.fail_zone_lookup = true;
        self
    }

    pub fn zone_lookup_count(&self) -> usize {
        self.zone_lookups.load(Ordering::SeqCst)
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<DesiredRecord> {
        self.creates.lock().unwrap().clone()
    }

    pub fn updated_ids(&self) -> Vec<String> {
        self.updates.lock().unwrap().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.created().len() + self.updated_ids().len()
    }
}

#[async_trait::async_trait]
impl DnsProvider for FakeDnsProvider {
    async fn zone_id_by_name(&self, domain: &str) -> Result<String> {
        self.zone_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_zone_lookup {
            return Err(Error::not_found(format!("Zone not found: {}", domain)));
        }
        Ok(ZONE_ID.to_string())
    }

    async fn query_records(&self, zone_id: &str, name: &str) -> Result<Vec<ObservedRecord>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        assert_eq!(zone_id, ZONE_ID);
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.name.eq_ignore_ascii_case(name))
            .cloned()
            .collect())
    }

    async fn create_record(&self, zone_id: &str, record: &DesiredRecord) -> Result<String> {
        assert!(!self.forbid_mutations, "create_record called on a read-only provider");
        assert_eq!(zone_id, ZONE_ID);
        let mut creates = self.creates.lock().unwrap();
        creates.push(record.clone());
        Ok(format!("new-{}", creates.len()))
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        _record: &DesiredRecord,
    ) -> Result<()> {
        assert!(!self.forbid_mutations, "update_record called on a read-only provider");
        assert_eq!(zone_id, ZONE_ID);
        let mut updates = self.updates.lock().unwrap();
        updates.push(record_id.to_string());
        if self.fail_update_on == Some(updates.len()) {
            return Err(Error::provider("fake", "update rejected"));
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// A Notifier that records what it was asked to send
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        if self.fail {
            return Err(Error::notification("service unavailable"));
        }
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "recording"
    }
}
