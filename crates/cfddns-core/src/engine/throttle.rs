//! Diff & throttle decision
//!
//! Pure functions over an observed record, the desired record and the current
//! instant. Nothing here performs I/O or can fail.
//!
//! ## Policy
//!
//! 1. Compare type, name, content, proxied, TTL (in that order).
//! 2. No difference: never act, no time arithmetic.
//! 3. Difference: elapsed = now - modified_on, rounded to the nearest second.
//!    An unparseable `modified_on` counts as zero elapsed seconds, so a
//!    formatting surprise throttles instead of aborting the run.
//! 4. Act when elapsed >= wait, or when forced.

use crate::record::{DesiredRecord, ObservedRecord};
use crate::timestamp::parse_provider_timestamp;
use chrono::{DateTime, Utc};
use std::fmt;

/// A tracked record attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Type,
    Name,
    Content,
    Proxied,
    Ttl,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Type => "Type",
            Field::Name => "Name",
            Field::Content => "Content",
            Field::Proxied => "Proxied",
            Field::Ttl => "TTL",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One differing attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: Field,
    pub old: String,
    pub new: String,
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} change: {} -> {}", self.field, self.old, self.new)
    }
}

/// Ordered list of differing attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDiff {
    changes: Vec<FieldChange>,
}

impl FieldDiff {
    /// Compare an observed record against the desired one
    pub fn compute(observed: &ObservedRecord, desired: &DesiredRecord) -> Self {
        let mut changes = Vec::new();
        let mut check = |field: Field, differs: bool, old: String, new: String| {
            if differs {
                changes.push(FieldChange { field, old, new });
            }
        };

        check(
            Field::Type,
            !observed
                .record_type
                .eq_ignore_ascii_case(desired.record_type.as_str()),
            observed.record_type.clone(),
            desired.record_type.to_string(),
        );
        check(
            Field::Name,
            !names_match(&observed.name, &desired.name),
            observed.name.clone(),
            desired.name.clone(),
        );
        check(
            Field::Content,
            observed.content != desired.content,
            observed.content.clone(),
            desired.content.clone(),
        );
        check(
            Field::Proxied,
            observed.proxied != desired.proxied,
            observed.proxied.to_string(),
            desired.proxied.to_string(),
        );
        check(
            Field::Ttl,
            observed.ttl() != desired.ttl,
            observed.ttl().to_string(),
            desired.ttl.to_string(),
        );

        Self { changes }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldChange> {
        self.changes.iter()
    }

    /// The differing fields, in check order
    pub fn fields(&self) -> Vec<Field> {
        self.changes.iter().map(|c| c.field).collect()
    }
}

fn names_match(observed: &str, desired: &str) -> bool {
    observed
        .trim_end_matches('.')
        .eq_ignore_ascii_case(desired.trim_end_matches('.'))
}

/// Outcome of the diff & throttle policy for one observed record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleDecision {
    /// At least one tracked field differs
    pub changed: bool,
    /// Seconds since the provider last modified the record (0 when unchanged)
    pub seconds_since_modified: i64,
    /// Wait window the decision was made against
    pub wait_secs: u64,
    /// The change arrived inside the wait window
    pub too_soon: bool,
    /// `force` overrode a throttle that would otherwise have blocked
    pub forced: bool,
    /// `changed && (!too_soon || force)`
    pub should_act: bool,
    /// The differing fields
    pub diff: FieldDiff,
}

impl ThrottleDecision {
    /// Decision for an empty query result: create now, nothing to throttle against
    pub fn create() -> Self {
        Self {
            changed: true,
            seconds_since_modified: 0,
            wait_secs: 0,
            too_soon: false,
            forced: false,
            should_act: true,
            diff: FieldDiff::default(),
        }
    }
}

/// Decide whether to update an observed record
pub fn decide(
    observed: &ObservedRecord,
    desired: &DesiredRecord,
    now: DateTime<Utc>,
    wait_secs: u64,
    force: bool,
) -> ThrottleDecision {
    let diff = FieldDiff::compute(observed, desired);

    if diff.is_empty() {
        return ThrottleDecision {
            changed: false,
            seconds_since_modified: 0,
            wait_secs,
            too_soon: false,
            forced: false,
            should_act: false,
            diff,
        };
    }

    let seconds_since_modified = match parse_provider_timestamp(&observed.modified_on) {
        Ok(modified) => elapsed_seconds(now, modified),
        Err(e) => {
            tracing::warn!("{}; treating record {} as just modified", e, observed.id);
            0
        }
    };

    let too_soon = seconds_since_modified < i64::try_from(wait_secs).unwrap_or(i64::MAX);

    ThrottleDecision {
        changed: true,
        seconds_since_modified,
        wait_secs,
        too_soon,
        forced: too_soon && force,
        should_act: !too_soon || force,
        diff,
    }
}

/// Whole seconds from `then` to `now`, rounded half away from zero
pub fn elapsed_seconds(now: DateTime<Utc>, then: DateTime<Utc>) -> i64 {
    let millis = now.signed_duration_since(then).num_milliseconds();
    (millis.abs() + 500) / 1000 * millis.signum()
}
