//! Public-IP provider registry
//!
//! Maps a short provider name (e.g. `aws`) to the URL of a service that
//! answers a plain GET with the caller's public address as text.
//!
//! ## Usage
//!
//! ```rust
//! use cfddns_core::registry::{IpProviderSelection, IpProviders};
//!
//! let providers = IpProviders::with_defaults();
//! assert_eq!(providers.url_for("AWS"), Some("https://checkip.amazonaws.com"));
//!
//! match providers.select("all").unwrap() {
//!     IpProviderSelection::All => {}
//!     IpProviderSelection::Named(_) => unreachable!(),
//! }
//! ```
//!
//! Names are matched case-insensitively. The sentinel `all` selects every
//! provider and is only meaningful for listing, never for resolving a single
//! address.

use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Sentinel provider name selecting every registered provider
pub const ALL_PROVIDERS: &str = "all";

/// Default provider used when none is configured
pub const DEFAULT_IP_PROVIDER: &str = "aws";

/// Built-in provider table
const DEFAULT_PROVIDERS: &[(&str, &str)] = &[
    ("aws", "https://checkip.amazonaws.com"),
    ("ipify", "https://api.ipify.org"),
    ("my-ip.io", "https://api.my-ip.io/ip"),
];

/// Result of selecting a provider by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpProviderSelection {
    /// The `all` sentinel
    All,
    /// A single registered provider (canonical lowercase name)
    Named(String),
}

/// Registry of public-IP providers
///
/// Iteration order is by name, so listings are stable between runs.
#[derive(Debug, Clone, Default)]
pub struct IpProviders {
    providers: BTreeMap<String, String>,
}

impl IpProviders {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in providers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (name, url) in DEFAULT_PROVIDERS {
            registry.register(*name, *url);
        }
        registry
    }

    /// Register (or replace) a provider
    ///
    /// # Parameters
    ///
    /// - `name`: Provider name; stored lowercase
    /// - `url`: Endpoint returning the public IP as plain text
    pub fn register(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.providers
            .insert(name.into().to_ascii_lowercase(), url.into());
    }

    /// URL of a registered provider
    pub fn url_for(&self, name: &str) -> Option<&str> {
        self.providers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Resolve a `--ipprovider` value
    ///
    /// # Returns
    ///
    /// - `Ok(IpProviderSelection)`: the sentinel or a registered provider
    /// - `Err(Error::InvalidInput)`: unknown name
    pub fn select(&self, name: &str) -> Result<IpProviderSelection> {
        let lowered = name.trim().to_ascii_lowercase();
        if lowered == ALL_PROVIDERS {
            return Ok(IpProviderSelection::All);
        }
        if self.providers.contains_key(&lowered) {
            return Ok(IpProviderSelection::Named(lowered));
        }
        Err(Error::invalid_input(format!(
            "--ipprovider {} is not a valid provider (choose from: {}, {})",
            name,
            self.list_providers().join(", "),
            ALL_PROVIDERS
        )))
    }

    /// All providers as `(name, url)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.providers
            .iter()
            .map(|(name, url)| (name.as_str(), url.as_str()))
    }

    /// Registered provider names in name order
    pub fn list_providers(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }
}
