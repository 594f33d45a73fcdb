// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare implementation of `DnsProvider` for cfddns.
//
// ## Behavior
//
// - One HTTP request per trait call; nothing is cached between calls
// - HTTP timeout configured (30 seconds)
// - Status codes mapped to specific errors (401/403, 404, 429, 5xx)
// - Both scoped API tokens and the legacy email + global key pair
// - NO retry logic: a failed call ends the run
// - NO dry-run handling: the dispatcher never calls a mutation in dry-run
//
// ## Security Requirements
//
// - Credentials NEVER appear in logs or Debug output
// - Construction fails (it does not panic) on empty credentials
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones?name=...`
// - List DNS Records: GET `/zones/:zone_id/dns_records?name=...`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Overwrite DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

pub mod models;

use async_trait::async_trait;
use cfddns_core::config::Credentials;
use cfddns_core::record::{DesiredRecord, ObservedRecord};
use cfddns_core::traits::DnsProvider;
use cfddns_core::{Error, Result};
use models::{ApiResponse, CreatedRecord, RecordPayload, Zone};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER_NAME: &str = "cloudflare";

/// How requests authenticate
#[derive(Clone, PartialEq, Eq)]
pub enum CloudflareAuth {
    /// Scoped API token, sent as a bearer token
    Token(String),
    /// Legacy account email + global API key
    Key { email: String, key: String },
}

impl CloudflareAuth {
    /// Pick the auth scheme from configured credentials
    ///
    /// A token wins over the email + key pair.
    pub fn from_credentials(credentials: &Credentials) -> Result<Self> {
        if let Some(token) = &credentials.api_token {
            return Ok(Self::Token(token.clone()));
        }
        match (&credentials.api_email, &credentials.api_key) {
            (Some(email), Some(key)) => Ok(Self::Key {
                email: email.clone(),
                key: key.clone(),
            }),
            _ => Err(Error::config(
                "Cloudflare credentials missing: set CF_API_TOKEN, or both CF_API_EMAIL and CF_API_KEY",
            )),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Token(token) => token.is_empty(),
            Self::Key { email, key } => email.is_empty() || key.is_empty(),
        }
    }

    fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::Token(token) => request.bearer_auth(token),
            Self::Key { email, key } => request
                .header("X-Auth-Email", email)
                .header("X-Auth-Key", key),
        }
    }
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for CloudflareAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Token(<REDACTED>)"),
            Self::Key { .. } => f.write_str("Key(<REDACTED>)"),
        }
    }
}

/// Cloudflare DNS provider
///
/// Stateless and single-shot: every trait call is one request, and every
/// failure is returned to the caller.
///
/// # Security
///
/// The Debug implementation does NOT expose credentials.
pub struct CloudflareProvider {
    /// ⚠️ NEVER log this value
    auth: CloudflareAuth,

    /// API root, overridable for tests
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("auth", &self.auth)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a provider against the public Cloudflare API
    pub fn new(auth: CloudflareAuth) -> Result<Self> {
        Self::with_base_url(auth, CLOUDFLARE_API_BASE)
    }

    /// Create a provider against an alternative API root
    ///
    /// # Errors
    ///
    /// - Empty credentials
    /// - The HTTP client cannot be built
    pub fn with_base_url(auth: CloudflareAuth, base_url: impl Into<String>) -> Result<Self> {
        if auth.is_empty() {
            return Err(Error::config("Cloudflare credentials cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            auth,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and unwrap the v4 envelope
    ///
    /// `context` names the operation in error messages.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<T> {
        let response = self
            .auth
            .apply(request)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::http(format!("{}: HTTP request failed: {}", context, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("{}: failed to read response: {}", context, e)))?;

        if !status.is_success() {
            return Err(map_status(status, context, &body));
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
            Error::provider(PROVIDER_NAME, format!("{}: failed to parse response: {}", context, e))
        })?;

        if !envelope.success {
            return Err(Error::provider(
                PROVIDER_NAME,
                format!("{}: {}", context, envelope.error_summary()),
            ));
        }

        envelope.result.ok_or_else(|| {
            Error::provider(PROVIDER_NAME, format!("{}: response has no result", context))
        })
    }
}

/// Map a non-2xx status to an error
fn map_status(status: reqwest::StatusCode, context: &str, body: &str) -> Error {
    // Prefer the API's own error list when the body carries one
    let detail = serde_json::from_str::<ApiResponse<serde_json::Value>>(body)
        .map(|envelope| envelope.error_summary())
        .unwrap_or_else(|_| body.trim().to_string());

    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "{}: invalid credentials or insufficient permissions. Status: {}",
            context, status
        )),
        404 => Error::not_found(format!("{}: {}", context, detail)),
        429 => Error::rate_limited(format!(
            "{}: rate limit exceeded, retry later. Status: {}",
            context, status
        )),
        500..=599 => Error::provider(
            PROVIDER_NAME,
            format!("{}: Cloudflare server error: {} - {}", context, status, detail),
        ),
        _ => Error::provider(PROVIDER_NAME, format!("{}: {} - {}", context, status, detail)),
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// ```http
    /// GET /zones?name=example.com
    /// ```
    async fn zone_id_by_name(&self, domain: &str) -> Result<String> {
        tracing::debug!("Looking up zone ID for domain: {}", domain);

        let request = self.client.get(self.url("/zones")).query(&[("name", domain)]);
        let zones: Vec<Zone> = self.execute(request, "Zone lookup").await?;

        let zone = zones
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(format!("Zone not found: {}", domain)))?;

        tracing::debug!("Found zone ID: {}", zone.id);
        Ok(zone.id)
    }

    /// ```http
    /// GET /zones/:zone_id/dns_records?name=home.example.com
    /// ```
    async fn query_records(&self, zone_id: &str, name: &str) -> Result<Vec<ObservedRecord>> {
        tracing::debug!("Listing DNS records named {}", name);

        let request = self
            .client
            .get(self.url(&format!("/zones/{}/dns_records", zone_id)))
            .query(&[("name", name)]);
        self.execute(request, "Record lookup").await
    }

    /// ```http
    /// POST /zones/:zone_id/dns_records
    /// {"type":"A","name":"home.example.com","content":"1.2.3.4","ttl":300,"proxied":false}
    /// ```
    async fn create_record(&self, zone_id: &str, record: &DesiredRecord) -> Result<String> {
        tracing::info!(
            "Creating Cloudflare DNS record: {} -> {} ({})",
            record.name,
            record.content,
            record.record_type
        );

        let request = self
            .client
            .post(self.url(&format!("/zones/{}/dns_records", zone_id)))
            .json(&RecordPayload::from(record));
        let created: CreatedRecord = self.execute(request, "Record create").await?;
        Ok(created.id)
    }

    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// ```
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &DesiredRecord,
    ) -> Result<()> {
        tracing::info!(
            "Updating Cloudflare DNS record: {} -> {} ({})",
            record.name,
            record.content,
            record.record_type
        );

        let request = self
            .client
            .put(self.url(&format!("/zones/{}/dns_records/{}", zone_id, record_id)))
            .json(&RecordPayload::from(record));
        let _: serde_json::Value = self.execute(request, "Record update").await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfddns_core::record::{RecordType, Ttl};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn token() -> CloudflareAuth {
        CloudflareAuth::Token("test_token".to_string())
    }

    fn desired() -> DesiredRecord {
        DesiredRecord::build(RecordType::A, "home.example.com", "1.2.3.4", Ttl::Auto, true)
    }

    fn provider(server: &MockServer, auth: CloudflareAuth) -> CloudflareProvider {
        CloudflareProvider::with_base_url(auth, server.uri()).unwrap()
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let err = CloudflareProvider::new(CloudflareAuth::Token(String::new())).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_token_wins_over_key() {
        let creds = Credentials {
            api_email: Some("me@example.com".to_string()),
            api_key: Some("global".to_string()),
            api_token: Some("scoped".to_string()),
        };
        assert_eq!(
            CloudflareAuth::from_credentials(&creds).unwrap(),
            CloudflareAuth::Token("scoped".to_string())
        );

        let creds = Credentials {
            api_token: None,
            ..creds
        };
        assert!(matches!(
            CloudflareAuth::from_credentials(&creds).unwrap(),
            CloudflareAuth::Key { .. }
        ));

        assert!(CloudflareAuth::from_credentials(&Credentials::default()).is_err());
    }

    #[test]
    fn test_credentials_not_exposed_in_debug() {
        let provider =
            CloudflareProvider::new(CloudflareAuth::Token("secret_token_12345".to_string()))
                .unwrap();
        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_token"));
        assert!(debug_str.contains("CloudflareProvider"));

        let auth = CloudflareAuth::Key {
            email: "me@example.com".to_string(),
            key: "global_key_999".to_string(),
        };
        assert!(!format!("{:?}", auth).contains("global_key_999"));
    }

    #[test]
    fn test_payload_sends_auto_ttl_as_one() {
        let record = desired();
        let payload = serde_json::to_value(RecordPayload::from(&record)).unwrap();
        assert_eq!(
            payload,
            json!({
                "type": "A",
                "name": "home.example.com",
                "content": "1.2.3.4",
                "ttl": 1,
                "proxied": true
            })
        );
    }

    #[tokio::test]
    async fn test_zone_lookup_uses_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/zones"))
            .and(query_param("name", "example.com"))
            .and(header("authorization", "Bearer test_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "errors": [],
                "result": [{"id": "zone-abc", "name": "example.com"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider(&server, token());
        assert_eq!(provider.zone_id_by_name("example.com").await.unwrap(), "zone-abc");
    }

    #[tokio::test]
    async fn test_key_auth_sends_email_and_key_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/zones"))
            .and(header("X-Auth-Email", "me@example.com"))
            .and(header("X-Auth-Key", "global"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": [{"id": "zone-abc"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let auth = CloudflareAuth::Key {
            email: "me@example.com".to_string(),
            key: "global".to_string(),
        };
        let provider = provider(&server, auth);
        assert!(provider.zone_id_by_name("example.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_zone_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/zones"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": []
            })))
            .mount(&server)
            .await;

        let err = provider(&server, token())
            .zone_id_by_name("missing.test")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_query_records_parses_observed_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/zones/zone-abc/dns_records"))
            .and(query_param("name", "home.example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": [{
                    "id": "rec-1",
                    "type": "A",
                    "name": "home.example.com",
                    "content": "1.2.3.4",
                    "ttl": 1,
                    "proxied": false,
                    "created_on": "2024-01-01T00:00:00.000000Z",
                    "modified_on": "2024-05-01T10:00:00.123456Z"
                }]
            })))
            .mount(&server)
            .await;

        let records = provider(&server, token())
            .query_records("zone-abc", "home.example.com")
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "rec-1");
        assert_eq!(records[0].ttl(), Ttl::Auto);
        assert_eq!(records[0].modified_on, "2024-05-01T10:00:00.123456Z");
    }

    #[tokio::test]
    async fn test_create_posts_payload_and_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/zones/zone-abc/dns_records"))
            .and(body_json(json!({
                "type": "A",
                "name": "home.example.com",
                "content": "1.2.3.4",
                "ttl": 1,
                "proxied": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": {"id": "rec-new"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let id = provider(&server, token())
            .create_record("zone-abc", &desired())
            .await
            .unwrap();
        assert_eq!(id, "rec-new");
    }

    #[tokio::test]
    async fn test_update_puts_to_record_path() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/zones/zone-abc/dns_records/rec-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": {"id": "rec-1"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        provider(&server, token())
            .update_record("zone-abc", "rec-1", &desired())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_status_codes_map_to_errors() {
        let cases = [
            (403, "auth"),
            (404, "not_found"),
            (429, "rate_limited"),
            (503, "provider"),
        ];

        for (status, kind) in cases {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                    "success": false,
                    "errors": [{"code": 1000, "message": "boom"}],
                    "result": null
                })))
                .mount(&server)
                .await;

            let err = provider(&server, token())
                .zone_id_by_name("example.com")
                .await
                .unwrap_err();

            let matched = match kind {
                "auth" => matches!(err, Error::Authentication(_)),
                "not_found" => matches!(err, Error::NotFound(_)),
                "rate_limited" => matches!(err, Error::RateLimited(_)),
                _ => matches!(err, Error::Provider { .. }),
            };
            assert!(matched, "status {} gave {:?}", status, err);
        }
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "errors": [{"code": 81057, "message": "Record already exists."}],
                "result": null
            })))
            .mount(&server)
            .await;

        let err = provider(&server, token())
            .update_record("zone-abc", "rec-1", &desired())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("81057: Record already exists."));
    }
}
