//! Command-line interface parsing for the Pokedex CLI
//!
//! This module handles parsing of CLI arguments using clap, and turns them into
//! the validated `StartupConfig` the binary is wired from.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::cache::{DEFAULT_INTERVAL_SECS, MAX_INTERVAL_SECS};
use crate::data::DEFAULT_BASE_URL;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The cache interval must be between one second and `MAX_INTERVAL_SECS`
    #[error(
        "Invalid cache interval: '{0}'. The interval must be between 1 and {max} seconds",
        max = MAX_INTERVAL_SECS
    )]
    InvalidInterval(u64),

    /// The API URL is not an http(s) URL
    #[error("Invalid API URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidApiUrl(String),
}

/// Pokedex CLI - Browse the PokeAPI catalog from an interactive prompt
#[derive(Parser, Debug)]
#[command(name = "pokedexcli")]
#[command(about = "Interactive Pokedex backed by PokeAPI")]
#[command(version)]
pub struct Cli {
    /// Seconds an API response stays cached; also the period between cache sweeps
    #[arg(
        long,
        value_name = "SECS",
        env = "POKEDEX_CACHE_INTERVAL",
        default_value_t = DEFAULT_INTERVAL_SECS
    )]
    pub cache_interval: u64,

    /// Base URL of the PokeAPI REST service
    #[arg(
        long,
        value_name = "URL",
        env = "POKEDEX_API_URL",
        default_value = DEFAULT_BASE_URL
    )]
    pub api_url: String,

    /// Log cache and request activity to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// Freshness window and sweep period of the response cache
    pub cache_interval: Duration,
    /// Base URL without a trailing slash
    pub api_url: String,
    /// Whether verbose logging was requested
    pub verbose: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            cache_interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            api_url: DEFAULT_BASE_URL.to_string(),
            verbose: false,
        }
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with an interval in range and a normalised URL
    /// * `Err(CliError)` if either value is unusable
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if !(1..=MAX_INTERVAL_SECS).contains(&cli.cache_interval) {
            return Err(CliError::InvalidInterval(cli.cache_interval));
        }

        let api_url = cli.api_url.trim().trim_end_matches('/');
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(CliError::InvalidApiUrl(cli.api_url.clone()));
        }

        Ok(StartupConfig {
            cache_interval: Duration::from_secs(cli.cache_interval),
            api_url: api_url.to_string(),
            verbose: cli.verbose,
        })
    }
}
