//! Layered configuration loading
//!
//! Precedence, highest first: flag, `CF_*` environment variable (both via
//! clap), YAML config file, built-in default.

use crate::cli::Cli;
use cfddns_core::config::RawConfig;
use cfddns_core::{Error, Result};
use std::path::Path;

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Read the config file layer
///
/// An explicitly named file must exist and parse. The default file is
/// optional: if it is missing, the layer is empty.
pub fn load_file(explicit: Option<&Path>) -> Result<RawConfig> {
    let (path, required) = match explicit {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };

    if !required && !path.exists() {
        tracing::debug!("No {} found, using flags and environment only", path.display());
        return Ok(RawConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("cannot read '{}': {}", path.display(), e)))?;
    tracing::debug!("Loaded config file {}", path.display());
    parse(&content)
        .map_err(|e| Error::config(format!("invalid config file '{}': {}", path.display(), e)))
}

/// Parse a YAML config document
pub fn parse(content: &str) -> std::result::Result<RawConfig, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(RawConfig::default());
    }
    serde_yaml::from_str(content)
}

/// Merge flags and environment over the config file
pub fn resolve(cli: &Cli) -> Result<RawConfig> {
    let file = load_file(cli.config.as_deref())?;
    Ok(cli.to_raw().merge(file))
}
