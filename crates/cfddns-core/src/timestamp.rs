//! Provider timestamp parsing
//!
//! The only place that knows how the provider spells its timestamps.
//! Cloudflare API v4 reports `modified_on` as RFC 3339 with microseconds
//! (`2020-01-17T23:39:28.673486Z`). Older client libraries rendered the same
//! instant as `2020-01-17 23:39:28.673486 +0000 UTC`, which is accepted too.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};

/// Legacy layout: date, time with fractional seconds, numeric offset
const LEGACY_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.f %z";

/// Parse a provider modification timestamp into a UTC instant
pub fn parse_provider_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    // Legacy form carries a trailing zone abbreviation that chrono cannot
    // parse; the numeric offset before it is authoritative.
    let without_abbrev = match raw.rsplit_once(' ') {
        Some((head, tail)) if tail.chars().all(|c| c.is_ascii_alphabetic()) => head,
        _ => raw,
    };

    DateTime::parse_from_str(without_abbrev, LEGACY_LAYOUT)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::timestamp(format!("'{}': {}", raw, e)))
}
