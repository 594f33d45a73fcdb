// # cfddns-core
//
// Core library for the cfddns dynamic-DNS updater.
//
// ## Architecture Overview
//
// This library provides the reconciliation logic for one DNS record:
// - **RecordType / Ttl**: Closed enumerations for validated inputs
// - **DesiredRecord / ObservedRecord**: Target state vs. provider state
// - **throttle::decide**: Pure diff & throttle policy
// - **Dispatcher**: Create-or-update with dry-run semantics
// - **Reconciler**: Zone lookup → query → decide → dispatch → notify
// - **DnsProvider / IpResolver / Notifier**: Collaborator traits
//
// ## Design Principles
//
// 1. **Pure core**: The decision engine reads only its explicit arguments
// 2. **Explicit config**: `RunConfig` is built once and passed by reference
// 3. **One-shot**: No state survives a run; the provider is the source of truth
// 4. **Fail fast**: No retry; a failed provider call ends the run
// 5. **Never delete**: Records are only created or updated

pub mod config;
pub mod engine;
pub mod error;
pub mod record;
pub mod registry;
pub mod timestamp;
pub mod traits;
pub mod validation;

// Re-export core types for convenience
pub use config::{EngineConfig, IpSourceConfig, RawConfig, RunConfig};
pub use engine::{ActionResult, Reconciler, RunReport, ThrottleDecision};
pub use error::{Error, Result};
pub use record::{DesiredRecord, ObservedRecord, RecordType, Ttl, TtlMode};
pub use registry::IpProviders;
pub use traits::{DnsProvider, IpResolver, Notification, Notifier};
