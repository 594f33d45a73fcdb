// # cfddns - Cloudflare dynamic-DNS updater
//
// One-shot: resolve the public IP, compare it with the Cloudflare record and
// create or update the record when needed, then exit.
//
// This binary is a THIN integration layer:
// - Flag, environment and config-file handling (`cli`, `settings`)
// - Tracing setup
// - Wiring concrete collaborators into the core `Reconciler`
// - Mapping errors to exit codes
//
// All decision logic lives in cfddns-core.
//
// ## Configuration
//
// Flags, or environment variables with the `CF_` prefix:
// - `CF_DOMAIN`, `CF_HOST`: record to manage
// - `CF_API_TOKEN`, or `CF_API_EMAIL` + `CF_API_KEY`: Cloudflare credentials
// - `CF_PUSHOVERAPP`, `CF_PUSHOVERRECIPIENT`: Pushover tokens (with `--pushover`)
// - `CF_LOG_LEVEL`: trace, debug, info (default), warn, error
//
// Anything else may also be set in `config.yaml` (or `--config <path>`).
//
// ## Example
//
// ```bash
// export CF_API_TOKEN=your_token
// cfddns --domain example.com --host home            # dry run
// cfddns --domain example.com --host home --doit     # apply
// ```

mod cli;
mod settings;

use anyhow::Context;
use cfddns_core::config::{IpSourceConfig, RunConfig};
use cfddns_core::error::EXIT_IP_RESOLUTION;
use cfddns_core::record::{DesiredRecord, RecordType};
use cfddns_core::registry::{IpProviderSelection, IpProviders};
use cfddns_core::traits::{IpResolver, Notifier};
use cfddns_core::{Error, Reconciler};
use cfddns_ip_http::HttpIpResolver;
use cfddns_provider_cloudflare::{CloudflareAuth, CloudflareProvider};
use chrono::Utc;
use clap::Parser;
use clap::error::ErrorKind;
use cli::Cli;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the ways a run can end
///
/// - 0: Normal completion, help, or a listing
/// - 1: Validation, configuration, or provider failure
/// - 2: The public IP could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CfddnsExitCode {
    Success = 0,
    Failure = 1,
    IpResolution = 2,
}

impl From<CfddnsExitCode> for ExitCode {
    fn from(code: CfddnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

// Help and version requests arrive as clap errors but are not failures
impl From<&clap::Error> for CfddnsExitCode {
    fn from(err: &clap::Error) -> Self {
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => CfddnsExitCode::Success,
            _ => CfddnsExitCode::Failure,
        }
    }
}

impl From<&anyhow::Error> for CfddnsExitCode {
    fn from(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<Error>() {
            Some(e) if e.exit_code() == EXIT_IP_RESOLUTION => CfddnsExitCode::IpResolution,
            _ => CfddnsExitCode::Failure,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // `Error::exit` would report usage errors with 2, which means IP resolution here
            let code = CfddnsExitCode::from(&e);
            if let Err(io) = e.print() {
                eprintln!("Failed to print usage: {}", io);
            }
            return code.into();
        }
    };

    // Initialize tracing
    let log_level = if cli.debug {
        Level::DEBUG
    } else {
        match cli.log_level.parse::<Level>() {
            Ok(level) => level,
            Err(_) => {
                eprintln!(
                    "CF_LOG_LEVEL '{}' is not valid. Valid levels: trace, debug, info, warn, error",
                    cli.log_level
                );
                return CfddnsExitCode::Failure.into();
            }
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CfddnsExitCode::Failure.into();
    }

    if cli.typelist {
        for name in RecordType::sorted_names() {
            println!("{}", name);
        }
        return CfddnsExitCode::Success.into();
    }

    // Every call is awaited in turn; one thread is enough
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CfddnsExitCode::Failure.into();
        }
    };

    let result = rt.block_on(async {
        match run(cli).await {
            Ok(()) => CfddnsExitCode::Success,
            Err(e) => {
                error!("{:#}", e);
                CfddnsExitCode::from(&e)
            }
        }
    });

    result.into()
}

/// Everything after flag parsing and tracing setup
async fn run(cli: Cli) -> anyhow::Result<()> {
    let raw = settings::resolve(&cli)?;

    if cli.displayconfig {
        for (key, value) in raw.display_entries() {
            println!("CONFIG: {} : {}", key, value);
        }
        return Ok(());
    }

    let providers = IpProviders::with_defaults();
    let selection = providers.select(raw.ip_provider())?;

    if cli.getip {
        let resolver = HttpIpResolver::new(providers)?;
        match selection {
            IpProviderSelection::All => {
                for answer in resolver.resolve_all().await? {
                    println!("{}", answer);
                }
            }
            IpProviderSelection::Named(name) => println!("{}", resolver.resolve(&name).await?),
        }
        return Ok(());
    }

    let config = RunConfig::from_raw(&raw, &providers)?;
    info!(
        "Managing {} record {} (ttl {}, proxied {})",
        config.record_type,
        config.fqdn(),
        config.ttl,
        config.proxied
    );
    if config.engine.dry_run {
        warn!("Dry run: no changes will be made, pass --doit to apply them");
    }

    let content = match &config.ip_source {
        IpSourceConfig::Literal(ip) => {
            info!("Using IP address from --ipv4: {}", ip);
            ip.clone()
        }
        IpSourceConfig::Provider(name) => {
            let ip = HttpIpResolver::new(providers)?.resolve(name).await?;
            info!("Public IP from {}: {}", name, ip);
            ip
        }
    };

    let desired = DesiredRecord::build(
        config.record_type,
        config.fqdn(),
        content,
        config.ttl,
        config.proxied,
    );

    let provider = CloudflareProvider::new(CloudflareAuth::from_credentials(&config.credentials)?)?;
    let reconciler = Reconciler::new(Box::new(provider), build_notifier(&config)?, config.engine);

    let observation = reconciler
        .observe(&config.domain, &desired)
        .await
        .with_context(|| format!("Could not retrieve DNS records for {}", desired.name))?;

    if cli.showcurrent {
        for record in &observation.records {
            println!("Current DNS record:");
            println!("{}", serde_json::to_string_pretty(record)?);
        }
    }

    if cli.shownew {
        if observation.records.is_empty() {
            println!("New DNS Record:");
        } else {
            println!("Updated DNS Record:");
        }
        println!("{}", serde_json::to_string_pretty(&desired)?);
    }

    reconciler.apply(&observation, &desired, Utc::now()).await?;
    Ok(())
}

#[cfg(feature = "pushover")]
fn build_notifier(config: &RunConfig) -> cfddns_core::Result<Option<Box<dyn Notifier>>> {
    match &config.pushover {
        Some(pushover) => Ok(Some(Box::new(
            cfddns_notify_pushover::PushoverNotifier::new(
                &pushover.app_token,
                &pushover.recipient,
            )?,
        ))),
        None => Ok(None),
    }
}

#[cfg(not(feature = "pushover"))]
fn build_notifier(config: &RunConfig) -> cfddns_core::Result<Option<Box<dyn Notifier>>> {
    if config.pushover.is_some() {
        warn!("Built without the pushover feature; --pushover is ignored");
    }
    Ok(None)
}
