//! Pokedex CLI - Browse the PokeAPI catalog from an interactive prompt
//!
//! Every API response is cached in memory for the configured interval, so
//! paging back and forth or re-inspecting a creature does not refetch it.

use std::io;
use std::process;

use clap::Parser;

use pokedexcli::cache::ExpiringCache;
use pokedexcli::cli::{Cli, StartupConfig};
use pokedexcli::commands::Session;
use pokedexcli::data::PokeApiClient;
use pokedexcli::{logging, repl};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    if let Err(e) = logging::init(config.verbose) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    // One cache for the whole session, handed to the client explicitly
    let cache = ExpiringCache::new(config.cache_interval)?;
    let client = PokeApiClient::new(config.api_url, cache.clone());
    let mut session = Session::new(client.first_location_page_url());
    let mut rng = rand::thread_rng();

    let lines = repl::spawn_stdin_reader();
    let mut stdout = io::stdout();
    repl::run(lines, &mut stdout, &mut session, &client, &mut rng).await?;

    cache.shutdown().await;
    Ok(())
}
