//! Cloudflare API v4 wire models

use cfddns_core::record::DesiredRecord;
use serde::{Deserialize, Serialize};

/// Envelope wrapping every Cloudflare v4 response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    /// Absent on most error payloads
    pub result: Option<T>,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
}

impl<T> ApiResponse<T> {
    /// The `errors` array joined into one line
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return "unknown error".to_string();
        }
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

impl std::fmt::Display for ApiMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

#[derive(Debug, Deserialize)]
pub struct Zone {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Body for create (POST) and overwrite (PUT)
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RecordPayload<'a> {
    pub r#type: &'a str,
    pub name: &'a str,
    pub content: &'a str,
    pub ttl: u32,
    pub proxied: bool,
}

impl<'a> From<&'a DesiredRecord> for RecordPayload<'a> {
    fn from(record: &'a DesiredRecord) -> Self {
        Self {
            r#type: record.record_type.as_str(),
            name: &record.name,
            content: &record.content,
            ttl: record.ttl.to_provider(),
            proxied: record.proxied,
        }
    }
}

/// The subset of a created record we need back
#[derive(Debug, Deserialize)]
pub struct CreatedRecord {
    pub id: String,
}
