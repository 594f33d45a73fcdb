//! Configuration types for cfddns
//!
//! Settings arrive as loosely-typed [`RawConfig`] layers (flags, environment,
//! config file) and are merged, then validated once into an immutable
//! [`RunConfig`] that is passed by reference to everything downstream.

use crate::error::{Error, Result};
use crate::record::{RecordType, Ttl, TtlMode, fqdn};
use crate::registry::{DEFAULT_IP_PROVIDER, IpProviderSelection, IpProviders};
use crate::validation::is_valid_ipv4;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Default record type
pub const DEFAULT_RECORD_TYPE: RecordType = RecordType::A;

/// Default `--ttl` in named mode
pub const DEFAULT_NAMED_TTL: &str = "5m";

/// Default `--ttl` in numeric mode
pub const DEFAULT_NUMERIC_TTL: &str = "300";

/// Default seconds to wait since the record's last modification
pub const DEFAULT_WAIT_SECS: u64 = 300;

/// Placeholder printed instead of secret values
const REDACTED: &str = "<REDACTED>";

/// One layer of unvalidated settings
///
/// Field names match the CLI flags and the YAML config file keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    pub domain: Option<String>,
    pub host: Option<String>,
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub ttl: Option<String>,
    pub ttlmode: Option<String>,
    pub cfproxy: Option<bool>,
    pub ipprovider: Option<String>,
    pub ipv4: Option<String>,
    pub wait: Option<u64>,
    pub force: Option<bool>,
    pub doit: Option<bool>,
    pub pushover: Option<bool>,
    pub api_email: Option<String>,
    pub api_key: Option<String>,
    pub api_token: Option<String>,
    pub pushoverapp: Option<String>,
    pub pushoverrecipient: Option<String>,
}

impl RawConfig {
    /// Merge two layers; values set in `self` win over `lower`
    pub fn merge(self, lower: RawConfig) -> RawConfig {
        RawConfig {
            domain: self.domain.or(lower.domain),
            host: self.host.or(lower.host),
            record_type: self.record_type.or(lower.record_type),
            ttl: self.ttl.or(lower.ttl),
            ttlmode: self.ttlmode.or(lower.ttlmode),
            cfproxy: self.cfproxy.or(lower.cfproxy),
            ipprovider: self.ipprovider.or(lower.ipprovider),
            ipv4: self.ipv4.or(lower.ipv4),
            wait: self.wait.or(lower.wait),
            force: self.force.or(lower.force),
            doit: self.doit.or(lower.doit),
            pushover: self.pushover.or(lower.pushover),
            api_email: self.api_email.or(lower.api_email),
            api_key: self.api_key.or(lower.api_key),
            api_token: self.api_token.or(lower.api_token),
            pushoverapp: self.pushoverapp.or(lower.pushoverapp),
            pushoverrecipient: self.pushoverrecipient.or(lower.pushoverrecipient),
        }
    }

    /// Effective TTL mode (named unless configured otherwise)
    pub fn ttl_mode(&self) -> Result<TtlMode> {
        self.ttlmode
            .as_deref()
            .map(TtlMode::from_str)
            .transpose()
            .map(Option::unwrap_or_default)
    }

    /// Effective `--ipprovider` value
    pub fn ip_provider(&self) -> &str {
        non_empty(&self.ipprovider).unwrap_or(DEFAULT_IP_PROVIDER)
    }

    /// Key/value listing for `--displayconfig`, sorted by key, secrets redacted
    pub fn display_entries(&self) -> BTreeMap<&'static str, String> {
        fn show<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(T::to_string).unwrap_or_default()
        }
        fn secret(value: &Option<String>) -> String {
            match value.as_deref() {
                Some(v) if !v.is_empty() => REDACTED.to_string(),
                _ => String::new(),
            }
        }

        let mut entries = BTreeMap::new();
        entries.insert("api_email", show(&self.api_email));
        entries.insert("api_key", secret(&self.api_key));
        entries.insert("api_token", secret(&self.api_token));
        entries.insert("cfproxy", self.cfproxy.unwrap_or(false).to_string());
        entries.insert("doit", self.doit.unwrap_or(false).to_string());
        entries.insert("domain", show(&self.domain));
        entries.insert("force", self.force.unwrap_or(false).to_string());
        entries.insert("host", show(&self.host));
        entries.insert("ipprovider", self.ip_provider().to_string());
        entries.insert("ipv4", show(&self.ipv4));
        entries.insert("pushover", self.pushover.unwrap_or(false).to_string());
        entries.insert("pushoverapp", secret(&self.pushoverapp));
        entries.insert("pushoverrecipient", secret(&self.pushoverrecipient));
        entries.insert(
            "ttl",
            self.ttl.clone().unwrap_or_else(|| match self.ttl_mode() {
                Ok(TtlMode::Numeric) => DEFAULT_NUMERIC_TTL.to_string(),
                _ => DEFAULT_NAMED_TTL.to_string(),
            }),
        );
        entries.insert(
            "ttlmode",
            self.ttlmode
                .clone()
                .unwrap_or_else(|| TtlMode::default().to_string()),
        );
        entries.insert(
            "type",
            self.record_type
                .clone()
                .unwrap_or_else(|| DEFAULT_RECORD_TYPE.to_string()),
        );
        entries.insert("wait", self.wait.unwrap_or(DEFAULT_WAIT_SECS).to_string());
        entries
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Where the record content comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpSourceConfig {
    /// Resolve through a registered public-IP provider
    Provider(String),
    /// Literal address supplied by the operator (already syntax-checked)
    Literal(String),
}

/// Settings that drive the throttle and the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Minimum seconds since the record's last modification before updating
    pub wait_secs: u64,
    /// Bypass the throttle when a change is detected
    pub force: bool,
    /// Compute and report decisions without mutating anything
    pub dry_run: bool,
    /// Send a push notification after an action
    pub notify: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            wait_secs: DEFAULT_WAIT_SECS,
            force: false,
            dry_run: true,
            notify: false,
        }
    }
}

/// Provider credentials
///
/// A scoped API token wins over the legacy email + global key pair.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_email: Option<String>,
    pub api_key: Option<String>,
    pub api_token: Option<String>,
}

// Custom Debug implementation that hides secrets
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_email", &self.api_email)
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .field("api_token", &self.api_token.as_ref().map(|_| REDACTED))
            .finish()
    }
}

/// Pushover application and recipient tokens
#[derive(Clone, PartialEq, Eq)]
pub struct PushoverConfig {
    pub app_token: String,
    pub recipient: String,
}

impl std::fmt::Debug for PushoverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushoverConfig")
            .field("app_token", &REDACTED)
            .field("recipient", &REDACTED)
            .finish()
    }
}

/// Validated, immutable configuration for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// DNS zone, e.g. `example.com`
    pub domain: String,
    /// Host label within the zone, e.g. `home`
    pub host: String,
    pub record_type: RecordType,
    pub ttl_mode: TtlMode,
    pub ttl: Ttl,
    pub proxied: bool,
    pub ip_source: IpSourceConfig,
    pub engine: EngineConfig,
    pub credentials: Credentials,
    /// Present when notifications are enabled
    pub pushover: Option<PushoverConfig>,
}

impl RunConfig {
    /// Validate a merged raw configuration
    ///
    /// Checks run in the order an operator would fix them: required names,
    /// IP provider, literal address, record type, TTL. The first failure is
    /// returned as [`Error::InvalidInput`] or [`Error::Config`].
    pub fn from_raw(raw: &RawConfig, providers: &IpProviders) -> Result<Self> {
        let domain = non_empty(&raw.domain)
            .ok_or_else(|| Error::config("--domain is required (or set CF_DOMAIN)"))?
            .to_string();
        let host = non_empty(&raw.host)
            .ok_or_else(|| Error::config("--host is required (or set CF_HOST)"))?
            .to_string();

        let ip_source = match non_empty(&raw.ipv4) {
            Some(literal) => {
                if !is_valid_ipv4(literal) {
                    return Err(Error::invalid_input(format!(
                        "--ipv4 {} is not a valid ip",
                        literal
                    )));
                }
                IpSourceConfig::Literal(literal.to_string())
            }
            None => match providers.select(raw.ip_provider())? {
                IpProviderSelection::Named(name) => IpSourceConfig::Provider(name),
                IpProviderSelection::All => {
                    return Err(Error::invalid_input(
                        "--ipprovider all is only valid together with --getip",
                    ));
                }
            },
        };

        let record_type = match non_empty(&raw.record_type) {
            Some(t) => RecordType::from_str(t)?,
            None => DEFAULT_RECORD_TYPE,
        };

        let ttl_mode = raw.ttl_mode()?;
        let ttl = match non_empty(&raw.ttl) {
            Some(t) => Ttl::parse(t, ttl_mode)?,
            None => match ttl_mode {
                TtlMode::Named => Ttl::parse(DEFAULT_NAMED_TTL, ttl_mode)?,
                TtlMode::Numeric => Ttl::parse(DEFAULT_NUMERIC_TTL, ttl_mode)?,
            },
        };

        let force = raw.force.unwrap_or(false);
        let engine = EngineConfig {
            wait_secs: raw.wait.unwrap_or(DEFAULT_WAIT_SECS),
            force,
            // Forcing an update implies applying it.
            dry_run: !(raw.doit.unwrap_or(false) || force),
            notify: raw.pushover.unwrap_or(false),
        };

        let credentials = Credentials {
            api_email: non_empty(&raw.api_email).map(str::to_string),
            api_key: non_empty(&raw.api_key).map(str::to_string),
            api_token: non_empty(&raw.api_token).map(str::to_string),
        };
        if credentials.api_token.is_none()
            && (credentials.api_email.is_none() || credentials.api_key.is_none())
        {
            return Err(Error::config(
                "Cloudflare credentials missing: set CF_API_TOKEN, or both CF_API_EMAIL and CF_API_KEY",
            ));
        }

        let pushover = if engine.notify {
            match (non_empty(&raw.pushoverapp), non_empty(&raw.pushoverrecipient)) {
                (Some(app), Some(recipient)) => Some(PushoverConfig {
                    app_token: app.to_string(),
                    recipient: recipient.to_string(),
                }),
                _ => {
                    return Err(Error::config(
                        "--pushover requires CF_PUSHOVERAPP and CF_PUSHOVERRECIPIENT",
                    ));
                }
            }
        } else {
            None
        };

        Ok(Self {
            domain,
            host,
            record_type,
            ttl_mode,
            ttl,
            proxied: raw.cfproxy.unwrap_or(false),
            ip_source,
            engine,
            credentials,
            pushover,
        })
    }

    /// Fully qualified name of the managed record
    pub fn fqdn(&self) -> String {
        fqdn(&self.host, &self.domain)
    }
}
