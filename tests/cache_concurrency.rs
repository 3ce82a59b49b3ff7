//! Stress tests for concurrent cache access
//!
//! Many writers and readers share one cache on a multi-threaded runtime while
//! the sweeper keeps running underneath them.

use std::time::Duration;

use futures::future::join_all;
use pokedexcli::cache::ExpiringCache;

const WRITERS: usize = 8;
const READERS: usize = 8;
const KEYS_PER_WRITER: usize = 200;

fn key(writer: usize, i: usize) -> String {
    format!("https://pokeapi.co/api/v2/pokemon/{}", writer * KEYS_PER_WRITER + i)
}

fn value(writer: usize, i: usize) -> Vec<u8> {
    format!("{}:{}", writer, i).into_bytes()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_and_readers_lose_nothing() {
    let cache = ExpiringCache::new(Duration::from_millis(200)).unwrap();

    let writers = (0..WRITERS).map(|w| {
        let cache = cache.clone();
        tokio::spawn(async move {
            for i in 0..KEYS_PER_WRITER {
                cache.insert(key(w, i), value(w, i));
                // A shared key every writer overwrites
                cache.insert("shared", value(w, i));
                if i % 16 == 0 {
                    tokio::task::yield_now().await;
                }
            }
        })
    });

    let readers = (0..READERS).map(|r| {
        let cache = cache.clone();
        tokio::spawn(async move {
            let mut hits = 0usize;
            for i in 0..KEYS_PER_WRITER {
                let writer = (r + i) % WRITERS;
                if let Some(found) = cache.lookup(&key(writer, i)) {
                    assert_eq!(found, value(writer, i));
                    hits += 1;
                }
                if let Some(shared) = cache.lookup("shared") {
                    assert!(String::from_utf8(shared).unwrap().contains(':'));
                }
                if i % 16 == 0 {
                    tokio::task::yield_now().await;
                }
            }
            hits
        })
    });

    let writers: Vec<_> = writers.collect();
    let readers: Vec<_> = readers.collect();
    for result in join_all(writers).await {
        result.expect("writer panicked");
    }
    for result in join_all(readers).await {
        result.expect("reader panicked");
    }

    // Nothing is older than one interval yet, so every write must be visible
    for w in 0..WRITERS {
        for i in 0..KEYS_PER_WRITER {
            assert_eq!(cache.lookup(&key(w, i)), Some(value(w, i)));
        }
    }
    assert_eq!(cache.len(), WRITERS * KEYS_PER_WRITER + 1);

    // Let at least two full sweep periods pass
    tokio::time::sleep(Duration::from_millis(700)).await;
    assert!(cache.is_empty(), "expected every entry to be swept");

    cache.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_inserts_racing_sweeps_never_panic() {
    let cache = ExpiringCache::new(Duration::from_millis(5)).unwrap();

    let tasks: Vec<_> = (0..WRITERS)
        .map(|w| {
            let cache = cache.clone();
            tokio::spawn(async move {
                for round in 0..20 {
                    for i in 0..50 {
                        cache.insert(key(w, i), value(w, round));
                        let _ = cache.lookup(&key((w + 1) % WRITERS, i));
                    }
                    tokio::time::sleep(Duration::from_millis(2)).await;
                }
            })
        })
        .collect();

    for result in join_all(tasks).await {
        result.expect("task panicked");
    }

    // Each key holds either nothing (swept) or a value some writer stored
    for w in 0..WRITERS {
        for i in 0..50 {
            if let Some(found) = cache.lookup(&key(w, i)) {
                assert!(String::from_utf8(found).unwrap().starts_with(&format!("{}:", w)));
            }
        }
    }

    cache.shutdown().await;
}
