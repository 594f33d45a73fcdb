//! Collaborator traits
//!
//! The reconciliation core talks to the outside world only through these
//! interfaces, so every decision path can be exercised with test doubles.
//!
//! - [`DnsProvider`]: zone lookup, record query, record create/update
//! - [`IpResolver`]: public-IP discovery
//! - [`Notifier`]: push notifications about applied changes

pub mod dns_provider;
pub mod ip_resolver;
pub mod notifier;

pub use dns_provider::DnsProvider;
pub use ip_resolver::IpResolver;
pub use notifier::{Notification, Notifier};
