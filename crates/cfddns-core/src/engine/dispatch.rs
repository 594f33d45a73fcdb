//! Action dispatch
//!
//! Turns a [`ThrottleDecision`] into at most one provider mutation, honoring
//! dry-run, and builds the notification that describes what was done.

use crate::engine::throttle::ThrottleDecision;
use crate::error::Result;
use crate::record::DesiredRecord;
use crate::traits::{DnsProvider, Notification, Notifier};
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, info, warn};

/// The mutation a decision calls for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Create,
    Update { record_id: String },
}

/// What the dispatcher did for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    /// A new record was created
    Created { record_id: String },
    /// An existing record was overwritten
    Updated { record_id: String },
    /// An action was due but dry-run suppressed it
    DryRun { action: Action },
    /// Nothing differs
    UpToDate { record_id: String },
    /// Something differs but the wait window has not elapsed
    Throttled {
        record_id: String,
        seconds_since_modified: i64,
        wait_secs: u64,
    },
}

impl ActionResult {
    /// The action this result stands for, if any was due
    pub fn action(&self) -> Option<Action> {
        match self {
            ActionResult::Created { .. } => Some(Action::Create),
            ActionResult::Updated { record_id } => Some(Action::Update {
                record_id: record_id.clone(),
            }),
            ActionResult::DryRun { action } => Some(action.clone()),
            ActionResult::UpToDate { .. } | ActionResult::Throttled { .. } => None,
        }
    }
}

impl fmt::Display for ActionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionResult::Created { record_id } => write!(f, "Created DNS record: {}", record_id),
            ActionResult::Updated { record_id } => write!(f, "Updated DNS record: {}", record_id),
            ActionResult::DryRun { .. } => f.write_str("Dry run complete"),
            ActionResult::UpToDate { .. } => f.write_str("DNS record up to date, not updating"),
            ActionResult::Throttled {
                seconds_since_modified,
                wait_secs,
                ..
            } => write!(
                f,
                "Not updating record because it was last updated {} seconds ago and wait time currently {} seconds",
                seconds_since_modified, wait_secs
            ),
        }
    }
}

/// Issues create/update calls against one zone
pub struct Dispatcher<'a> {
    provider: &'a dyn DnsProvider,
    zone_id: &'a str,
}

impl<'a> Dispatcher<'a> {
    pub fn new(provider: &'a dyn DnsProvider, zone_id: &'a str) -> Self {
        Self { provider, zone_id }
    }

    /// Act on a decision
    ///
    /// # Parameters
    ///
    /// - `decision`: Throttle outcome ([`ThrottleDecision::create`] when nothing matched)
    /// - `desired`: The record to write
    /// - `observed_id`: ID of the matching record, `None` to create
    /// - `dry_run`: Report instead of mutating
    ///
    /// # Returns
    ///
    /// - `Ok(ActionResult)`: What happened
    /// - `Err(Error)`: The provider rejected the mutation; the run must abort
    pub async fn dispatch(
        &self,
        decision: &ThrottleDecision,
        desired: &DesiredRecord,
        observed_id: Option<&str>,
        dry_run: bool,
    ) -> Result<ActionResult> {
        let Some(record_id) = observed_id else {
            if dry_run {
                info!(
                    "[DRY-RUN] Would create {} record {} -> {}",
                    desired.record_type, desired.name, desired.content
                );
                return Ok(ActionResult::DryRun {
                    action: Action::Create,
                });
            }
            let record_id = self.provider.create_record(self.zone_id, desired).await?;
            info!("Created DNS record {} ({})", desired.name, record_id);
            return Ok(ActionResult::Created { record_id });
        };

        if !decision.changed {
            return Ok(ActionResult::UpToDate {
                record_id: record_id.to_string(),
            });
        }

        if !decision.should_act {
            return Ok(ActionResult::Throttled {
                record_id: record_id.to_string(),
                seconds_since_modified: decision.seconds_since_modified,
                wait_secs: decision.wait_secs,
            });
        }

        if dry_run {
            info!(
                "[DRY-RUN] Would update record {} ({}) -> {}",
                desired.name, record_id, desired.content
            );
            return Ok(ActionResult::DryRun {
                action: Action::Update {
                    record_id: record_id.to_string(),
                },
            });
        }

        self.provider
            .update_record(self.zone_id, record_id, desired)
            .await?;
        info!("Updated DNS record {} ({})", desired.name, record_id);
        Ok(ActionResult::Updated {
            record_id: record_id.to_string(),
        })
    }
}

/// Notification describing an action, or `None` when nothing was due
pub fn notification_for(
    result: &ActionResult,
    decision: &ThrottleDecision,
    desired: &DesiredRecord,
    now: DateTime<Utc>,
) -> Option<Notification> {
    let (title, mut body) = match result.action()? {
        Action::Create => (
            format!("Creating DNS record: {}", desired.name),
            format!(
                "Name: {}\nType: {}\nContent: {}\nProxied: {}\nTTL: {}\n",
                desired.name, desired.record_type, desired.content, desired.proxied, desired.ttl
            ),
        ),
        Action::Update { .. } => (
            format!("Updating DNS record: {}", desired.name),
            decision
                .diff
                .iter()
                .map(|change| format!("{}\n", change))
                .collect::<String>(),
        ),
    };
    body.push_str(&format!("Time: {}", now));
    Some(Notification::new(title, body))
}

/// Deliver a notification, or only log it in dry-run
///
/// Delivery failures are logged and swallowed; a change that was applied is
/// not undone by a notification problem.
pub async fn send_notification(
    notifier: &dyn Notifier,
    notification: &Notification,
    dry_run: bool,
) {
    debug!("Notification:\n{}\n---", notification.body);

    if dry_run {
        info!(
            "[DRY-RUN] Simulating {} notification: {}",
            notifier.notifier_name(),
            notification.title
        );
        return;
    }

    if let Err(e) = notifier.send(notification).await {
        warn!("{} notification failed: {}", notifier.notifier_name(), e);
    }
}
