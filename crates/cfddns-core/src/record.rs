//! DNS record model
//!
//! - [`RecordType`]: closed set of record types the provider accepts
//! - [`Ttl`] / [`TtlBucket`] / [`TtlMode`]: TTL input schemes, normalized to seconds
//! - [`DesiredRecord`]: the state the operator wants, built once per run
//! - [`ObservedRecord`]: the state the provider currently holds

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Caa,
    Cert,
    Cname,
    Dnskey,
    Ds,
    Loc,
    Mx,
    Naptr,
    Ns,
    Ptr,
    Smimea,
    Spf,
    Srv,
    Sshfp,
    Tlsa,
    Txt,
    Uri,
}

impl RecordType {
    /// Every supported record type
    pub const ALL: [RecordType; 19] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Caa,
        RecordType::Cert,
        RecordType::Cname,
        RecordType::Dnskey,
        RecordType::Ds,
        RecordType::Loc,
        RecordType::Mx,
        RecordType::Naptr,
        RecordType::Ns,
        RecordType::Ptr,
        RecordType::Smimea,
        RecordType::Spf,
        RecordType::Srv,
        RecordType::Sshfp,
        RecordType::Tlsa,
        RecordType::Txt,
        RecordType::Uri,
    ];

    /// Wire name of the type, as the provider spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Caa => "CAA",
            RecordType::Cert => "CERT",
            RecordType::Cname => "CNAME",
            RecordType::Dnskey => "DNSKEY",
            RecordType::Ds => "DS",
            RecordType::Loc => "LOC",
            RecordType::Mx => "MX",
            RecordType::Naptr => "NAPTR",
            RecordType::Ns => "NS",
            RecordType::Ptr => "PTR",
            RecordType::Smimea => "SMIMEA",
            RecordType::Spf => "SPF",
            RecordType::Srv => "SRV",
            RecordType::Sshfp => "SSHFP",
            RecordType::Tlsa => "TLSA",
            RecordType::Txt => "TXT",
            RecordType::Uri => "URI",
        }
    }

    /// Wire names of all types, sorted alphabetically
    pub fn sorted_names() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Self::ALL.iter().map(RecordType::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    /// Case-insensitive parse
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::invalid_input(format!("--type {} is not valid", s)))
    }
}

/// Which TTL input scheme a run accepts
///
/// A run uses exactly one mode; the CLI never mixes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtlMode {
    /// `auto` or one of the named buckets (`2m`, `5m`, ... `1d`)
    #[default]
    Named,
    /// `auto` or an integer number of seconds in [`MIN_NUMERIC_TTL`, `MAX_NUMERIC_TTL`]
    Numeric,
}

impl fmt::Display for TtlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TtlMode::Named => f.write_str("named"),
            TtlMode::Numeric => f.write_str("numeric"),
        }
    }
}

impl FromStr for TtlMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "named" => Ok(TtlMode::Named),
            "numeric" => Ok(TtlMode::Numeric),
            _ => Err(Error::invalid_input(format!(
                "--ttlmode {} is not valid, must be \"named\" or \"numeric\"",
                s
            ))),
        }
    }
}

/// Lowest TTL accepted in numeric mode (provider-imposed)
pub const MIN_NUMERIC_TTL: u32 = 30;

/// Highest TTL accepted in numeric mode
pub const MAX_NUMERIC_TTL: u32 = 600;

/// TTL value the provider uses to mean "automatic"
pub const PROVIDER_AUTO_TTL: u32 = 1;

/// Literal token for an automatic TTL in either mode
pub const AUTO_TTL_TOKEN: &str = "auto";

/// Named TTL bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlBucket {
    TwoMinutes,
    FiveMinutes,
    TenMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    TwoHours,
    FiveHours,
    TwelveHours,
    OneDay,
}

impl TtlBucket {
    /// Every bucket, shortest first
    pub const ALL: [TtlBucket; 10] = [
        TtlBucket::TwoMinutes,
        TtlBucket::FiveMinutes,
        TtlBucket::TenMinutes,
        TtlBucket::FifteenMinutes,
        TtlBucket::ThirtyMinutes,
        TtlBucket::OneHour,
        TtlBucket::TwoHours,
        TtlBucket::FiveHours,
        TtlBucket::TwelveHours,
        TtlBucket::OneDay,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TtlBucket::TwoMinutes => "2m",
            TtlBucket::FiveMinutes => "5m",
            TtlBucket::TenMinutes => "10m",
            TtlBucket::FifteenMinutes => "15m",
            TtlBucket::ThirtyMinutes => "30m",
            TtlBucket::OneHour => "1h",
            TtlBucket::TwoHours => "2h",
            TtlBucket::FiveHours => "5h",
            TtlBucket::TwelveHours => "12h",
            TtlBucket::OneDay => "1d",
        }
    }

    pub fn seconds(&self) -> u32 {
        match self {
            TtlBucket::TwoMinutes => 120,
            TtlBucket::FiveMinutes => 300,
            TtlBucket::TenMinutes => 600,
            TtlBucket::FifteenMinutes => 900,
            TtlBucket::ThirtyMinutes => 1800,
            TtlBucket::OneHour => 3600,
            TtlBucket::TwoHours => 7200,
            TtlBucket::FiveHours => 18000,
            TtlBucket::TwelveHours => 43200,
            TtlBucket::OneDay => 86400,
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.label().eq_ignore_ascii_case(label))
    }
}

/// Normalized TTL
///
/// `Auto` leaves the choice to the provider and is distinct from any explicit
/// number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ttl {
    Auto,
    Seconds(u32),
}

impl Ttl {
    /// Parse a `--ttl` value under the given mode
    pub fn parse(value: &str, mode: TtlMode) -> Result<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case(AUTO_TTL_TOKEN) {
            return Ok(Ttl::Auto);
        }

        match mode {
            TtlMode::Named => TtlBucket::from_label(value)
                .map(|bucket| Ttl::Seconds(bucket.seconds()))
                .ok_or_else(|| {
                    let labels: Vec<&str> = TtlBucket::ALL.iter().map(TtlBucket::label).collect();
                    Error::invalid_input(format!(
                        "--ttl {} is not valid, must be \"auto\" or one of: {}",
                        value,
                        labels.join(", ")
                    ))
                }),
            TtlMode::Numeric => value
                .parse::<u32>()
                .ok()
                .filter(|secs| (MIN_NUMERIC_TTL..=MAX_NUMERIC_TTL).contains(secs))
                .map(Ttl::Seconds)
                .ok_or_else(|| {
                    Error::invalid_input(format!(
                        "--ttl {} is not valid, must be between {} and {}, or \"auto\"",
                        value, MIN_NUMERIC_TTL, MAX_NUMERIC_TTL
                    ))
                }),
        }
    }

    /// Seconds as configured (`Auto` is 0)
    pub fn as_seconds(&self) -> u32 {
        match self {
            Ttl::Auto => 0,
            Ttl::Seconds(secs) => *secs,
        }
    }

    /// Value sent to the provider API
    pub fn to_provider(self) -> u32 {
        match self {
            Ttl::Auto => PROVIDER_AUTO_TTL,
            Ttl::Seconds(secs) => secs,
        }
    }

    /// Interpret a TTL reported by the provider
    pub fn from_provider(ttl: u32) -> Self {
        if ttl == PROVIDER_AUTO_TTL {
            Ttl::Auto
        } else {
            Ttl::Seconds(ttl)
        }
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ttl::Auto => f.write_str(AUTO_TTL_TOKEN),
            Ttl::Seconds(secs) => write!(f, "{}", secs),
        }
    }
}

impl Serialize for Ttl {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Ttl::Auto => serializer.serialize_str(AUTO_TTL_TOKEN),
            Ttl::Seconds(secs) => serializer.serialize_u32(*secs),
        }
    }
}

/// Fully qualified record name for a host within a domain
///
/// An empty host or `@` names the zone apex.
pub fn fqdn(host: &str, domain: &str) -> String {
    let host = host.trim().trim_end_matches('.');
    let domain = domain.trim().trim_end_matches('.');
    if host.is_empty() || host == "@" {
        domain.to_string()
    } else {
        format!("{}.{}", host, domain)
    }
}

/// The record state the operator wants to exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesiredRecord {
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Fully qualified record name
    pub name: String,
    /// Record content (the IP address for A records)
    pub content: String,
    /// Time-to-live
    pub ttl: Ttl,
    /// Whether the provider proxies traffic for this record
    pub proxied: bool,
}

impl DesiredRecord {
    /// Assemble the desired record from pre-validated inputs
    pub fn build(
        record_type: RecordType,
        name: impl Into<String>,
        content: impl Into<String>,
        ttl: Ttl,
        proxied: bool,
    ) -> Self {
        Self {
            record_type,
            name: name.into(),
            content: content.into(),
            ttl,
            proxied,
        }
    }
}

/// A record as currently held by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedRecord {
    /// Provider record ID
    pub id: String,
    /// Record type as reported by the provider
    #[serde(rename = "type")]
    pub record_type: String,
    /// Fully qualified record name
    pub name: String,
    /// Record content
    pub content: String,
    /// TTL as reported by the provider (1 means automatic)
    pub ttl: u32,
    /// Whether the provider proxies traffic for this record
    #[serde(default)]
    pub proxied: bool,
    /// Creation timestamp, provider format
    #[serde(default)]
    pub created_on: String,
    /// Last modification timestamp, provider format
    #[serde(default)]
    pub modified_on: String,
}

impl ObservedRecord {
    /// Normalized TTL of the observed record
    pub fn ttl(&self) -> Ttl {
        Ttl::from_provider(self.ttl)
    }
}
