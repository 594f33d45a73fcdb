// # HTTP IP Resolver
//
// This crate provides the plain-text HTTP implementation of `IpResolver` for
// cfddns.
//
// ## Behavior
//
// Each registered provider answers a bare GET with the caller's public address
// as text. One request per call; no caching, no polling, no retry. The body is
// returned with a single trailing newline removed and is not otherwise
// validated.
//
// Every failure (unknown provider, transport error, non-2xx status, unreadable
// body) is reported as `Error::IpSource`, which the binary maps to exit code 2.

use cfddns_core::registry::IpProviders;
use cfddns_core::traits::IpResolver;
use cfddns_core::{Error, Result};

use std::fmt;
use std::time::Duration;

/// Default HTTP timeout for IP lookups (10 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// One provider's answer, as printed by `--getip`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAnswer {
    pub name: String,
    pub url: String,
    pub ip: String,
}

impl fmt::Display for ProviderAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.name, self.url, self.ip)
    }
}

/// HTTP-based public-IP resolver
#[derive(Debug, Clone)]
pub struct HttpIpResolver {
    /// Provider name to URL table
    providers: IpProviders,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a resolver over a provider table
    pub fn new(providers: IpProviders) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::ip_source(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { providers, client })
    }

    /// Fetch the address from a URL
    async fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!("Fetching public IP from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::ip_source(format!("Request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::ip_source(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ip_source(format!("Failed to read response from {}: {}", url, e)))?;

        Ok(strip_trailing_newline(body))
    }

    /// Query every registered provider, in name order
    ///
    /// Stops at the first failure.
    pub async fn resolve_all(&self) -> Result<Vec<ProviderAnswer>> {
        let mut answers = Vec::new();
        for (name, url) in self.providers.iter() {
            let ip = self.fetch(url).await?;
            answers.push(ProviderAnswer {
                name: name.to_string(),
                url: url.to_string(),
                ip,
            });
        }
        Ok(answers)
    }
}

#[async_trait::async_trait]
impl IpResolver for HttpIpResolver {
    async fn resolve(&self, provider_name: &str) -> Result<String> {
        let url = self.providers.url_for(provider_name).ok_or_else(|| {
            Error::ip_source(format!("Unknown IP provider: {}", provider_name))
        })?;

        let ip = self.fetch(url).await?;
        tracing::debug!("{} reports public IP {}", provider_name, ip);
        Ok(ip)
    }
}

/// Remove exactly one trailing `\n` (and a `\r` before it)
fn strip_trailing_newline(mut body: String) -> String {
    if body.ends_with('\n') {
        body.pop();
        if body.ends_with('\r') {
            body.pop();
        }
    }
    body
}
