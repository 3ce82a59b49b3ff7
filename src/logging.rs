//! Logging configuration using tracing
//!
//! Log lines go to stderr so they never interleave with REPL output on stdout.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "warn";

/// Filter used with `--verbose` when `RUST_LOG` is unset
const VERBOSE_FILTER: &str = "pokedexcli=debug,warn";

/// Builds the level filter, preferring `RUST_LOG` over `verbose`, e.g.:
/// - `RUST_LOG=pokedexcli::cache=trace` - every cache insert, hit and miss
/// - `RUST_LOG=pokedexcli=debug,reqwest=debug` - requests and sweeps
fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialize the global tracing subscriber
///
/// # Errors
/// Returns an error if a global subscriber has already been installed
pub fn init(verbose: bool) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init()
}
