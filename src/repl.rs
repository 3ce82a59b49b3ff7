//! Interactive read-eval-print loop
//!
//! Reads one command per line, dispatches it through `commands::execute`, and
//! prints command errors without ending the session.

use std::io::{self, BufRead, Write};
use std::thread;

use rand::Rng;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::commands::{self, Command, CommandError, Outcome, Session};
use crate::data::PokeApiClient;

/// Prompt printed before every line of input
pub const PROMPT: &str = "Pokedex > ";

/// Splits a line of input into lowercase words
pub fn clean_input(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Reads stdin line by line on a dedicated thread
///
/// The thread is detached so a pending read never holds up process exit. The
/// channel closes at end of input or on the first read error.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(1);
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to read stdin");
                    break;
                }
            }
        }
        debug!("stdin reader finished");
    });
    rx
}

/// Runs the REPL until `exit` or end of input
///
/// # Arguments
/// * `lines` - Input lines, one command per line
/// * `out` - Where prompts and command output are written
///
/// # Returns
/// * `Ok(())` when the user exits or input ends
/// * `Err` if writing output fails
pub async fn run<W, R>(
    mut lines: mpsc::Receiver<String>,
    out: &mut W,
    session: &mut Session,
    client: &PokeApiClient,
    rng: &mut R,
) -> io::Result<()>
where
    W: Write,
    R: Rng,
{
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let Some(line) = lines.recv().await else {
            writeln!(out)?;
            return Ok(());
        };

        let words = clean_input(&line);
        let Some((name, args)) = words.split_first() else {
            continue;
        };
        let Some(command) = Command::from_name(name) else {
            writeln!(out, "Unknown Command")?;
            continue;
        };

        match commands::execute(command, args, session, client, rng, out).await {
            Ok(Outcome::Exit) => return Ok(()),
            Ok(Outcome::Continue) => {}
            Err(CommandError::Output(e)) => return Err(e),
            Err(e) => {
                warn!(command = command.name(), error = %e, "command failed");
                writeln!(out, "{}", e)?;
            }
        }
    }
}
