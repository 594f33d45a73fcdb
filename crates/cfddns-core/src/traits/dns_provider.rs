// # DNS Provider Trait
//
// Defines the interface for reading and writing DNS records via a provider API.
//
// ## Implementations
//
// - Cloudflare: `cfddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use cfddns_core::DnsProvider;
//
// async fn show(provider: &dyn DnsProvider) -> cfddns_core::Result<()> {
//     let zone_id = provider.zone_id_by_name("example.com").await?;
//     for record in provider.query_records(&zone_id, "home.example.com").await? {
//         println!("{} {} {}", record.name, record.record_type, record.content);
//     }
//     Ok(())
// }
// ```

use crate::record::{DesiredRecord, ObservedRecord};
use async_trait::async_trait;

/// Trait for DNS provider implementations
///
/// Implementations translate each call into exactly one provider API request.
///
/// ## Forbidden
///
/// - Retry or backoff: a failed call is returned and aborts the run
/// - Deciding whether a change is needed (owned by the throttle engine)
/// - Honoring dry-run (owned by the dispatcher; a mutation call is always real)
/// - Deleting records
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Look up the zone ID for a domain
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The zone ID
    /// - `Err(Error)`: Zone unknown to this account or the request failed
    async fn zone_id_by_name(&self, domain: &str) -> Result<String, crate::Error>;

    /// List records in a zone whose fully qualified name equals `name`
    ///
    /// Normally zero or one record; callers must handle more.
    async fn query_records(
        &self,
        zone_id: &str,
        name: &str,
    ) -> Result<Vec<ObservedRecord>, crate::Error>;

    /// Create a record
    ///
    /// # Returns
    ///
    /// The new record's ID
    async fn create_record(
        &self,
        zone_id: &str,
        record: &DesiredRecord,
    ) -> Result<String, crate::Error>;

    /// Overwrite an existing record, addressed by ID
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &DesiredRecord,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
