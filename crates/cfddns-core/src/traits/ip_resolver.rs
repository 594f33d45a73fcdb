// # IP Resolver Trait
//
// Defines the interface for discovering the caller's public address.
//
// ## Implementations
//
// - Plain-text HTTP services: `cfddns-ip-http` crate

use async_trait::async_trait;

/// Trait for public-IP discovery
///
/// One request per call, no caching between calls, no retry. Any failure is
/// reported as [`crate::Error::IpSource`], which ends the run with exit code 2.
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Resolve the public address using the named provider
    ///
    /// # Parameters
    ///
    /// - `provider_name`: A registered provider name (never the `all` sentinel)
    ///
    /// # Returns
    ///
    /// The response body with a single trailing newline removed. The text is
    /// returned verbatim; callers do not get IP syntax validation from here.
    async fn resolve(&self, provider_name: &str) -> Result<String, crate::Error>;
}
