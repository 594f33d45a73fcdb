//! Command-line interface
//!
//! Flags that may also come from the config file carry no clap default, so an
//! absent flag falls through to the environment, then the file, then the
//! built-in default applied by `RunConfig`.

use cfddns_core::config::RawConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Create or update a Cloudflare DNS record with your public IP")]
pub struct Cli {
    /// DNS zone, e.g. example.com
    #[arg(long, env = "CF_DOMAIN", value_name = "DOMAIN")]
    pub domain: Option<String>,

    /// Host label within the zone ("@" for the apex)
    #[arg(long, env = "CF_HOST", value_name = "HOST")]
    pub host: Option<String>,

    /// Record type [default: A]
    #[arg(long = "type", value_name = "TYPE")]
    pub record_type: Option<String>,

    /// TTL: named bucket (auto, 2m, 5m, ..., 1d) or seconds 30-600 with --ttlmode numeric [default: 5m]
    #[arg(long, value_name = "TTL")]
    pub ttl: Option<String>,

    /// How --ttl is interpreted: named or numeric [default: named]
    #[arg(long, value_name = "MODE")]
    pub ttlmode: Option<String>,

    /// Proxy traffic for the record through Cloudflare
    #[arg(long)]
    pub cfproxy: bool,

    /// Public-IP provider, or "all" with --getip [default: aws]
    #[arg(long, value_name = "NAME")]
    pub ipprovider: Option<String>,

    /// Use this IPv4 address instead of looking one up
    #[arg(long, value_name = "IP")]
    pub ipv4: Option<String>,

    /// Seconds since the last change before updating again [default: 300]
    #[arg(long, value_name = "SECONDS")]
    pub wait: Option<u64>,

    /// Update even inside the wait time (implies --doit)
    #[arg(long)]
    pub force: bool,

    /// Apply changes; without this the run is a dry run
    #[arg(long)]
    pub doit: bool,

    /// Send a Pushover notification when a record is created or updated
    #[arg(long)]
    pub pushover: bool,

    /// Display debug information
    #[arg(long)]
    pub debug: bool,

    /// Display configuration and exit
    #[arg(long)]
    pub displayconfig: bool,

    /// List record types and exit
    #[arg(long)]
    pub typelist: bool,

    /// Print the public IP from --ipprovider ("all" for every provider) and exit
    #[arg(long)]
    pub getip: bool,

    /// Print the current DNS record(s)
    #[arg(long)]
    pub showcurrent: bool,

    /// Print the new or updated DNS record
    #[arg(long)]
    pub shownew: bool,

    /// YAML config file [default: config.yaml, if present]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Cloudflare account email (with CF_API_KEY)
    #[arg(long, env = "CF_API_EMAIL", hide_env_values = true, hide = true)]
    pub api_email: Option<String>,

    /// Cloudflare global API key (with CF_API_EMAIL)
    #[arg(long, env = "CF_API_KEY", hide_env_values = true, hide = true)]
    pub api_key: Option<String>,

    /// Cloudflare scoped API token
    #[arg(long, env = "CF_API_TOKEN", hide_env_values = true, hide = true)]
    pub api_token: Option<String>,

    /// Pushover application token
    #[arg(long, env = "CF_PUSHOVERAPP", hide_env_values = true, hide = true)]
    pub pushoverapp: Option<String>,

    /// Pushover user or group key
    #[arg(long, env = "CF_PUSHOVERRECIPIENT", hide_env_values = true, hide = true)]
    pub pushoverrecipient: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, env = "CF_LOG_LEVEL", default_value = "info", hide = true)]
    pub log_level: String,
}

impl Cli {
    /// Flags and environment as the top configuration layer
    ///
    /// Boolean switches only count when given; an absent switch lets the
    /// config file decide.
    pub fn to_raw(&self) -> RawConfig {
        fn switch(on: bool) -> Option<bool> {
            on.then_some(true)
        }

        RawConfig {
            domain: self.domain.clone(),
            host: self.host.clone(),
            record_type: self.record_type.clone(),
            ttl: self.ttl.clone(),
            ttlmode: self.ttlmode.clone(),
            cfproxy: switch(self.cfproxy),
            ipprovider: self.ipprovider.clone(),
            ipv4: self.ipv4.clone(),
            wait: self.wait,
            force: switch(self.force),
            doit: switch(self.doit),
            pushover: switch(self.pushover),
            api_email: self.api_email.clone(),
            api_key: self.api_key.clone(),
            api_token: self.api_token.clone(),
            pushoverapp: self.pushoverapp.clone(),
            pushoverrecipient: self.pushoverrecipient.clone(),
        }
    }
}
