//! Input validation
//!
//! Boolean checks run before anything reaches the decision engine. None of
//! them panic; the caller decides how to abort. Each has a parsing twin
//! ([`RecordType::from_str`], [`Ttl::parse`], [`IpProviders::select`]) that
//! carries a descriptive error instead of a bool.

use crate::record::{RecordType, Ttl, TtlMode};
use crate::registry::IpProviders;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Case-insensitive membership in the supported record types
pub fn validate_record_type(record_type: &str) -> bool {
    tracing::debug!("Validating: --type {}", record_type);
    RecordType::from_str(record_type).is_ok()
}

/// Check a `--ttl` value under the run's TTL mode
///
/// `"auto"` is accepted in both modes.
pub fn validate_ttl(ttl: &str, mode: TtlMode) -> bool {
    tracing::debug!("Validating: --ttl {} (mode: {})", ttl, mode);
    Ttl::parse(ttl, mode).is_ok()
}

/// Case-insensitive membership in the provider table, plus the `all` sentinel
pub fn validate_ip_provider(name: &str, providers: &IpProviders) -> bool {
    tracing::debug!("Validating: --ipprovider {}", name);
    providers.select(name).is_ok()
}

/// Dotted-quad IPv4 syntax check, each octet 0-255
pub fn is_valid_ipv4(ip: &str) -> bool {
    tracing::debug!("Validating: --ipv4 {}", ip);
    ip.parse::<Ipv4Addr>().is_ok()
}
