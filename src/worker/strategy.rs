//! Response-resolution strategies for intercepted requests.
//!
//! `serve` is deliberately generic over the cache lookup, network fetch,
//! and cache store operations: natively that makes the policy testable
//! with plain closures, and the Service Worker script mirrors the same
//! steps over the async Cache API.

use serde::Serialize;

use crate::config::OfflineFallback;

/// Fixed payload synthesized when the network is down and the fallback
/// policy says to answer anyway.
pub const OFFLINE_BODY: &str = r#"{"status":"offline"}"#;

/// Named strategies the routing table maps requests onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Serve from cache; on a miss fetch, store a copy, serve.
    CacheFirst,
    /// Always try the network and refresh the cache; fall back per
    /// policy when it fails.
    NetworkFirst,
    /// Not intercepted — the request goes out untouched.
    Passthrough,
}

impl Strategy {
    /// Whether this strategy reads or writes the named cache.
    pub fn uses_cache(self) -> bool {
        !matches!(self, Strategy::Passthrough)
    }
}

/// Where the served response came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Served {
    FromCache(String),
    FromNetwork(String),
    /// Network failed; this is the fallback (cached copy or offline
    /// payload).
    Fallback(String),
    /// Nothing to serve — the request fails as it would without a
    /// worker.
    Unavailable,
}

/// Execute a strategy for the request `key` over the given operations.
pub fn serve(
    strategy: Strategy,
    fallback: OfflineFallback,
    key: &str,
    mut lookup: impl FnMut(&str) -> Option<String>,
    mut fetch: impl FnMut(&str) -> Result<String, String>,
    mut store: impl FnMut(&str, &str),
) -> Served {
    match strategy {
        Strategy::Passthrough => match fetch(key) {
            Ok(body) => Served::FromNetwork(body),
            Err(_) => Served::Unavailable,
        },
        Strategy::CacheFirst => {
            if let Some(body) = lookup(key) {
                return Served::FromCache(body);
            }
            match fetch(key) {
                Ok(body) => {
                    store(key, &body);
                    Served::FromNetwork(body)
                }
                Err(err) => {
                    tracing::debug!(%key, %err, "uncached asset unreachable");
                    Served::Unavailable
                }
            }
        }
        Strategy::NetworkFirst => match fetch(key) {
            Ok(body) => {
                store(key, &body);
                Served::FromNetwork(body)
            }
            Err(err) => {
                tracing::debug!(%key, %err, "network-first falling back");
                match fallback {
                    OfflineFallback::CachedResponse => match lookup(key) {
                        Some(body) => Served::Fallback(body),
                        None => Served::Unavailable,
                    },
                    OfflineFallback::OfflinePayload => {
                        Served::Fallback(OFFLINE_BODY.to_string())
                    }
                }
            }
        },
    }
}
