//! Cache module for deduplicating API requests
//!
//! This module provides an in-memory cache of raw response bodies keyed by
//! request URL. Entries are forgotten by a background sweep once they are
//! older than the cache's interval; nothing is persisted across runs.

mod expiring;

pub use expiring::{CacheError, ExpiringCache};

/// Default freshness window for cached responses (5 minutes)
pub const DEFAULT_INTERVAL_SECS: u64 = 300;

/// Longest freshness window accepted from the command line (30 days)
pub const MAX_INTERVAL_SECS: u64 = 30 * 24 * 60 * 60;
