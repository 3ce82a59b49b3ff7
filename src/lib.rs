//! Pokedex CLI Library
//!
//! This module exposes the cache, API client, and REPL modules for use by the
//! binary and in integration tests.

pub mod cache;
pub mod cli;
pub mod commands;
pub mod data;
pub mod logging;
pub mod pokedex;
pub mod repl;
