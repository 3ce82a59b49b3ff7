//! Time-expiring response cache
//!
//! Provides an `ExpiringCache` that keeps raw response bodies in memory keyed by
//! request URL. A background sweeper spawned at construction removes entries
//! older than the configured interval, once per interval.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, trace, warn};

/// Errors that can occur when constructing a cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// The sweep interval must be a positive duration
    #[error("Cache interval must be greater than zero")]
    InvalidInterval,

    /// The interval is too long to schedule a first sweep for
    #[error("Cache interval is too large")]
    IntervalTooLarge,

    /// The sweeper needs a Tokio runtime to be spawned on
    #[error("Cache must be created from within a Tokio runtime")]
    NoRuntime,
}

/// A stored response body and the instant it was inserted
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    created_at: Instant,
}

/// State shared between every handle and (weakly) the sweeper task
#[derive(Debug)]
struct Inner {
    entries: Mutex<HashMap<String, CacheEntry>>,
    interval: Duration,
    shutdown_tx: mpsc::Sender<()>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl Inner {
    /// Removes every entry created strictly before `now - interval`.
    fn purge_expired(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| now.saturating_duration_since(entry.created_at) <= self.interval);
        before - entries.len()
    }
}

/// Concurrent in-memory cache whose entries are evicted by a background sweep
///
/// Handles are cheap to clone and all clones share the same entries. Lookups
/// never check staleness themselves: an entry stays visible until the first
/// sweep that runs more than `interval` after it was inserted.
///
/// The sweeper runs until [`ExpiringCache::shutdown`] is called or the last
/// handle is dropped.
#[derive(Debug, Clone)]
pub struct ExpiringCache {
    inner: Arc<Inner>,
}

impl ExpiringCache {
    /// Creates an empty cache and starts its sweeper
    ///
    /// # Arguments
    /// * `interval` - Freshness window and period between sweeps
    ///
    /// # Returns
    /// * `Ok(ExpiringCache)` ready for concurrent use
    /// * `Err(CacheError::InvalidInterval)` if `interval` is zero
    /// * `Err(CacheError::IntervalTooLarge)` if `now + interval` overflows
    /// * `Err(CacheError::NoRuntime)` if called outside a Tokio runtime
    pub fn new(interval: Duration) -> Result<Self, CacheError> {
        if interval.is_zero() {
            return Err(CacheError::InvalidInterval);
        }
        // First sweep one full interval from now, not immediately
        let first_sweep = Instant::now()
            .checked_add(interval)
            .ok_or(CacheError::IntervalTooLarge)?;
        let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let inner = Arc::new(Inner {
            entries: Mutex::new(HashMap::new()),
            interval,
            shutdown_tx,
            sweeper: Mutex::new(None),
        });

        let mut ticker = time::interval_at(first_sweep, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let handle = runtime.spawn(sweep_loop(Arc::downgrade(&inner), ticker, shutdown_rx));
        *inner.sweeper.lock() = Some(handle);

        debug!(interval_ms = interval.as_millis() as u64, "cache sweeper started");
        Ok(Self { inner })
    }

    /// Stores `value` under `key`, replacing any existing entry
    pub fn insert(&self, key: impl Into<String>, value: Vec<u8>) {
        let key = key.into();
        trace!(%key, bytes = value.len(), "cache insert");
        let entry = CacheEntry {
            value,
            created_at: Instant::now(),
        };
        self.inner.entries.lock().insert(key, entry);
    }

    /// Returns a copy of the value stored under `key`, if any
    pub fn lookup(&self, key: &str) -> Option<Vec<u8>> {
        let value = self
            .inner
            .entries
            .lock()
            .get(key)
            .map(|entry| entry.value.clone());
        match value {
            Some(_) => debug!(%key, "cache hit"),
            None => debug!(%key, "cache miss"),
        }
        value
    }

    /// Number of entries currently held, including ones awaiting the next sweep
    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stops the background sweeper and waits for it to exit
    ///
    /// The cache stays usable afterwards, but nothing is evicted any more.
    /// Calling this more than once is a no-op.
    pub async fn shutdown(&self) {
        let _ = self.inner.shutdown_tx.try_send(());
        let handle = self.inner.sweeper.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "cache sweeper did not exit cleanly");
            }
        }
    }
}

/// Evicts expired entries once per tick until shut down or orphaned
async fn sweep_loop(cache: Weak<Inner>, mut ticker: Interval, mut shutdown_rx: mpsc::Receiver<()>) {
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(inner) = cache.upgrade() else {
                    break;
                };
                let evicted = inner.purge_expired(Instant::now());
                if evicted > 0 {
                    debug!(evicted, remaining = inner.entries.lock().len(), "cache sweep");
                }
            }
            _ = shutdown_rx.recv() => {
                break;
            }
        }
    }
    debug!("cache sweeper stopped");
}
