//! Reconciliation engine
//!
//! The Reconciler is responsible for:
//! - Looking up the zone and the records matching the desired name
//! - Running the diff & throttle policy once per observed record
//! - Dispatching at most one create/update per record, honoring dry-run
//! - Sending a notification about each action
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐
//! │ DesiredRecord │──────────────┐
//! └───────────────┘              │
//!                                ▼
//!                        ┌──────────────┐
//!                        │  Reconciler  │
//!                        └──────────────┘
//!                                │
//!         ┌──────────────────────┼──────────────────────┐
//!         │                      │                      │
//!         ▼                      ▼                      ▼
//! ┌──────────────┐       ┌──────────────┐       ┌──────────────┐
//! │ DnsProvider  │       │   throttle   │       │   Notifier   │
//! │ (query/write)│       │   (decide)   │       │  (optional)  │
//! └──────────────┘       └──────────────┘       └──────────────┘
//! ```
//!
//! ## Flow
//!
//! 1. `zone_id_by_name(domain)`, `query_records(zone, fqdn)`
//! 2. No records: create (no throttle)
//! 3. Otherwise, per record: `decide`, then `dispatch`
//! 4. Notify for every record that had an action due
//!
//! A provider error at any step aborts the whole run; records after the
//! failing one are not processed.

pub mod dispatch;
pub mod throttle;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::record::{DesiredRecord, ObservedRecord};
use crate::traits::{DnsProvider, Notifier};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

pub use dispatch::{Action, ActionResult, Dispatcher};
pub use throttle::{Field, FieldChange, FieldDiff, ThrottleDecision, decide};

/// Records currently held by the provider for the desired name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Zone the records live in
    pub zone_id: String,
    /// Matching records (normally zero or one)
    pub records: Vec<ObservedRecord>,
}

/// Decision and result for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    /// ID of the observed record, `None` on the create path
    pub record_id: Option<String>,
    pub decision: ThrottleDecision,
    pub result: ActionResult,
}

/// Everything a run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub outcomes: Vec<RecordOutcome>,
}

/// One-shot reconciliation of a single record name
///
/// ## Lifecycle
///
/// 1. Create with [`Reconciler::new()`]
/// 2. Call [`Reconciler::observe()`] then [`Reconciler::apply()`], or
///    [`Reconciler::run()`] for both
/// 3. Drop
///
/// All provider calls are awaited one after another; nothing runs
/// concurrently.
pub struct Reconciler {
    /// DNS provider for reading and writing records
    provider: Box<dyn DnsProvider>,

    /// Optional notification backend
    notifier: Option<Box<dyn Notifier>>,

    /// Throttle and dry-run settings
    config: EngineConfig,
}

impl Reconciler {
    /// Create a new reconciler
    ///
    /// # Parameters
    ///
    /// - `provider`: DNS provider implementation
    /// - `notifier`: Notification backend, used only when `config.notify` is set
    /// - `config`: Engine settings
    pub fn new(
        provider: Box<dyn DnsProvider>,
        notifier: Option<Box<dyn Notifier>>,
        config: EngineConfig,
    ) -> Self {
        Self {
            provider,
            notifier,
            config,
        }
    }

    /// Fetch the records currently matching `desired`
    ///
    /// # Parameters
    ///
    /// - `domain`: Zone name, e.g. `example.com`
    /// - `desired`: The target record (its name is the query filter)
    pub async fn observe(&self, domain: &str, desired: &DesiredRecord) -> Result<Observation> {
        debug!(
            "Looking up zone {} at {}",
            domain,
            self.provider.provider_name()
        );
        let zone_id = self.provider.zone_id_by_name(domain).await?;
        debug!("Zone {} has ID {}", domain, zone_id);

        let records = self.provider.query_records(&zone_id, &desired.name).await?;
        debug!("Found {} record(s) named {}", records.len(), desired.name);

        Ok(Observation { zone_id, records })
    }

    /// Decide and act on an observation
    ///
    /// # Parameters
    ///
    /// - `observation`: Output of [`Reconciler::observe()`]
    /// - `desired`: The target record
    /// - `now`: Current instant, used for the throttle and the notification
    pub async fn apply(
        &self,
        observation: &Observation,
        desired: &DesiredRecord,
        now: DateTime<Utc>,
    ) -> Result<RunReport> {
        let dispatcher = Dispatcher::new(self.provider.as_ref(), &observation.zone_id);
        let mut report = RunReport::default();

        if observation.records.is_empty() {
            info!("No record found for {}, creating DNS record", desired.name);

            let decision = ThrottleDecision::create();
            let result = dispatcher
                .dispatch(&decision, desired, None, self.config.dry_run)
                .await?;
            info!("{}", result);

            self.notify(&result, &decision, desired, now).await;
            report.outcomes.push(RecordOutcome {
                record_id: None,
                decision,
                result,
            });
            return Ok(report);
        }

        for record in &observation.records {
            debug!(
                "ID:{} Name:{} Type:{} Content:{} TTL:{} Created:{} Modified:{}",
                record.id,
                record.name,
                record.record_type,
                record.content,
                record.ttl,
                record.created_on,
                record.modified_on
            );

            let decision = decide(
                record,
                desired,
                now,
                self.config.wait_secs,
                self.config.force,
            );

            for change in decision.diff.iter() {
                debug!("{}", change);
            }

            if decision.changed {
                debug!(
                    "Record {} needs updating: modified {}s ago, wait {}s",
                    record.id, decision.seconds_since_modified, decision.wait_secs
                );
                if decision.forced {
                    info!("Update forced although the last change is within the wait time");
                }
                if decision.should_act {
                    info!(
                        "Record last updated {} seconds ago, wait time currently {} seconds",
                        decision.seconds_since_modified, decision.wait_secs
                    );
                }
            }

            let result = dispatcher
                .dispatch(&decision, desired, Some(&record.id), self.config.dry_run)
                .await?;
            info!("{}", result);

            self.notify(&result, &decision, desired, now).await;
            report.outcomes.push(RecordOutcome {
                record_id: Some(record.id.clone()),
                decision,
                result,
            });
        }

        Ok(report)
    }

    /// Observe then apply
    pub async fn run(
        &self,
        domain: &str,
        desired: &DesiredRecord,
        now: DateTime<Utc>,
    ) -> Result<RunReport> {
        let observation = self.observe(domain, desired).await?;
        self.apply(&observation, desired, now).await
    }

    async fn notify(
        &self,
        result: &ActionResult,
        decision: &ThrottleDecision,
        desired: &DesiredRecord,
        now: DateTime<Utc>,
    ) {
        if !self.config.notify {
            return;
        }
        let Some(notifier) = self.notifier.as_deref() else {
            return;
        };
        if let Some(notification) = dispatch::notification_for(result, decision, desired, now) {
            dispatch::send_notification(notifier, &notification, self.config.dry_run).await;
        }
    }
}
