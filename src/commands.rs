//! REPL commands
//!
//! Each command reads or updates the per-session `Session` state and writes its
//! output to the supplied writer. Catalog data comes from `PokeApiClient`, so
//! repeated requests within the cache interval never reach the network.

use std::io::{self, Write};

use rand::Rng;
use thiserror::Error;

use crate::data::{ApiError, PokeApiClient, ResourcePage};
use crate::pokedex::Pokedex;

/// Base experience at or above which the catch chance bottoms out
const CATCH_EXPERIENCE_SCALE: f64 = 500.0;

/// Lowest possible catch chance
const MIN_CATCH_CHANCE: f64 = 0.1;

/// Errors that can occur while running a command
#[derive(Debug, Error)]
pub enum CommandError {
    /// `map` was called after the last page
    #[error("max page reached")]
    NoNextPage,

    /// `mapb` was called on the first page
    #[error("previous page does not exist")]
    NoPreviousPage,

    /// A command that needs an argument was called without one
    #[error("{command} requires a {argument} argument")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    /// A listing page came back with no results
    #[error("no results found for url: {0}")]
    EmptyPage(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Commands understood by the REPL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    Help,
    Map,
    MapBack,
    Explore,
    Catch,
    Inspect,
    Pokedex,
}

/// What the REPL should do after a command finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

impl Command {
    /// All commands in the order `help` lists them
    pub const ALL: [Command; 8] = [
        Command::Help,
        Command::Exit,
        Command::Map,
        Command::MapBack,
        Command::Explore,
        Command::Catch,
        Command::Inspect,
        Command::Pokedex,
    ];

    /// Name typed at the prompt
    pub fn name(&self) -> &'static str {
        match self {
            Command::Exit => "exit",
            Command::Help => "help",
            Command::Map => "map",
            Command::MapBack => "mapb",
            Command::Explore => "explore",
            Command::Catch => "catch",
            Command::Inspect => "inspect",
            Command::Pokedex => "pokedex",
        }
    }

    /// One-line description shown by `help`
    pub fn description(&self) -> &'static str {
        match self {
            Command::Exit => "Exit the Pokedex",
            Command::Help => "Displays a help message",
            Command::Map => "Displays the next page of location areas in the Pokemon world",
            Command::MapBack => "Displays the previous page of location areas in the Pokemon world",
            Command::Explore => "Explore a specific location and list the pokemon that live there",
            Command::Catch => {
                "Attempt to catch the specified pokemon and store its information in the pokedex"
            }
            Command::Inspect => "Get details on the pokemon you have caught",
            Command::Pokedex => "List all the pokemon currently in your pokedex",
        }
    }

    /// Looks up a command by the name typed at the prompt
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.name() == name)
    }
}

/// Mutable state carried between commands in one REPL session
#[derive(Debug)]
pub struct Session {
    /// URL of the next location page, `None` past the last page
    pub next: Option<String>,
    /// URL of the previous location page, `None` on the first page
    pub previous: Option<String>,
    pub pokedex: Pokedex,
}

impl Session {
    /// Creates a session positioned before the first location page
    pub fn new(first_page_url: impl Into<String>) -> Self {
        Self {
            next: Some(first_page_url.into()),
            previous: None,
            pokedex: Pokedex::new(),
        }
    }
}

/// Chance of a catch succeeding for a creature with the given base experience
pub fn catch_chance(base_experience: Option<u32>) -> f64 {
    let experience = f64::from(base_experience.unwrap_or(0));
    (1.0 - experience / CATCH_EXPERIENCE_SCALE).max(MIN_CATCH_CHANCE)
}

/// Runs one command against the session
///
/// # Arguments
/// * `command` - The command to run
/// * `args` - Remaining words typed after the command name
/// * `session` - Paging and pokedex state
/// * `client` - Catalog client used for lookups
/// * `rng` - Random source for catch attempts
/// * `out` - Where user-facing output is written
pub async fn execute<R: Rng, W: Write>(
    command: Command,
    args: &[String],
    session: &mut Session,
    client: &PokeApiClient,
    rng: &mut R,
    out: &mut W,
) -> Result<Outcome, CommandError> {
    match command {
        Command::Exit => {
            writeln!(out, "Closing the Pokedex... Goodbye!")?;
            return Ok(Outcome::Exit);
        }
        Command::Help => help(out)?,
        Command::Map => {
            let url = session.next.clone().ok_or(CommandError::NoNextPage)?;
            show_page(&url, session, client, out).await?;
        }
        Command::MapBack => {
            let url = session.previous.clone().ok_or(CommandError::NoPreviousPage)?;
            show_page(&url, session, client, out).await?;
        }
        Command::Explore => {
            let area = first_arg(args, command, "location area")?;
            explore(area, client, out).await?;
        }
        Command::Catch => {
            let name = first_arg(args, command, "pokemon name")?;
            catch(name, session, client, rng, out).await?;
        }
        Command::Inspect => {
            let name = first_arg(args, command, "pokemon name")?;
            inspect(name, &session.pokedex, out)?;
        }
        Command::Pokedex => list_pokedex(&session.pokedex, out)?,
    }
    Ok(Outcome::Continue)
}

fn first_arg<'a>(
    args: &'a [String],
    command: Command,
    argument: &'static str,
) -> Result<&'a str, CommandError> {
    args.first()
        .map(String::as_str)
        .ok_or(CommandError::MissingArgument {
            command: command.name(),
            argument,
        })
}

fn help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Welcome to the Pokedex!")?;
    writeln!(out, "Usage:")?;
    writeln!(out)?;
    for command in Command::ALL {
        writeln!(out, "{}: {}", command.name(), command.description())?;
    }
    Ok(())
}

async fn show_page<W: Write>(
    url: &str,
    session: &mut Session,
    client: &PokeApiClient,
    out: &mut W,
) -> Result<(), CommandError> {
    let page: ResourcePage = client.fetch_location_areas(url).await?;
    if page.count == 0 {
        return Err(CommandError::EmptyPage(url.to_string()));
    }

    for area in &page.results {
        writeln!(out, "{}", area.name)?;
    }
    session.next = page.next;
    session.previous = page.previous;
    Ok(())
}

async fn explore<W: Write>(
    area: &str,
    client: &PokeApiClient,
    out: &mut W,
) -> Result<(), CommandError> {
    writeln!(out, "Exploring {}...", area)?;
    let location = client.fetch_location_area(area).await?;

    if location.pokemon_encounters.is_empty() {
        writeln!(out, "No Pokemon found")?;
        return Ok(());
    }
    writeln!(out, "Found Pokemon:")?;
    for encounter in &location.pokemon_encounters {
        writeln!(out, "- {}", encounter.pokemon.name)?;
    }
    Ok(())
}

async fn catch<R: Rng, W: Write>(
    name: &str,
    session: &mut Session,
    client: &PokeApiClient,
    rng: &mut R,
    out: &mut W,
) -> Result<(), CommandError> {
    let pokemon = client.fetch_pokemon(name).await?;
    writeln!(out, "Throwing a Pokeball at {}...", name)?;

    let chance = catch_chance(pokemon.base_experience);
    if rng.gen::<f64>() < chance {
        writeln!(out, "{} was caught!", name)?;
        writeln!(out, "You may now inspect it with the inspect command.")?;
        session.pokedex.insert(name, pokemon);
    } else {
        writeln!(out, "{} escaped!", name)?;
    }
    Ok(())
}

fn inspect<W: Write>(name: &str, pokedex: &Pokedex, out: &mut W) -> io::Result<()> {
    let Some(record) = pokedex.get(name) else {
        return writeln!(out, "you have not caught that pokemon");
    };
    let pokemon = &record.pokemon;

    writeln!(out, "Name: {}", pokemon.name)?;
    writeln!(out, "Height: {}", pokemon.height)?;
    writeln!(out, "Weight: {}", pokemon.weight)?;
    writeln!(out, "Stats:")?;
    for stat in &pokemon.stats {
        writeln!(out, "  -{}: {}", stat.stat.name, stat.base_stat)?;
    }
    writeln!(out, "Types:")?;
    for slot in &pokemon.types {
        writeln!(out, "  - {}", slot.kind.name)?;
    }
    writeln!(out, "Caught: {}", record.caught_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    Ok(())
}

fn list_pokedex<W: Write>(pokedex: &Pokedex, out: &mut W) -> io::Result<()> {
    if pokedex.is_empty() {
        return writeln!(out, "You have not caught any pokemon");
    }
    writeln!(out, "Your Pokedex:")?;
    for name in pokedex.names() {
        writeln!(out, " - {}", name)?;
    }
    Ok(())
}
