//! Declarative routing table for intercepted requests.
//!
//! Predicates are evaluated in fixed priority order:
//!   1. non-GET methods are never intercepted,
//!   2. API paths (`/api/...`) are network-first,
//!   3. static-manifest members (same-origin path or CDN URL suffix)
//!      are cache-first,
//!   4. everything else follows the configured scope policy.
//!
//! Path-shaped rules compile into a `matchit` radix tree — the same
//! router engine that drives the command surface.

use serde::Serialize;

use crate::config::{WorkerConfig, WorkerScope};
use crate::worker::strategy::Strategy;
use crate::worker::{CACHE_NAME, STATIC_MANIFEST};

/// Strategy decision for one intercepted request, as answered to the
/// Service Worker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub strategy: Strategy,
    /// Cache the strategy reads/writes; absent for passthrough.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<&'static str>,
}

impl Decision {
    fn of(strategy: Strategy) -> Self {
        Self {
            strategy,
            cache: strategy.uses_cache().then_some(CACHE_NAME),
        }
    }
}

/// Compiled routing table. Rebuilt per decision request — route tables
/// are tiny and the worker asks rarely.
pub struct RouteTable {
    paths: matchit::Router<Strategy>,
    url_suffixes: Vec<&'static str>,
    scope: WorkerScope,
}

impl RouteTable {
    pub fn new(config: &WorkerConfig) -> Self {
        let mut paths = matchit::Router::new();
        paths.insert("/api/{*rest}", Strategy::NetworkFirst).ok();

        let mut url_suffixes = Vec::new();
        for asset in STATIC_MANIFEST {
            if asset.starts_with('/') {
                paths.insert(*asset, Strategy::CacheFirst).ok();
            } else {
                // Cross-origin bundle: match the full URL by suffix.
                url_suffixes.push(*asset);
            }
        }

        Self {
            paths,
            url_suffixes,
            scope: config.scope,
        }
    }

    /// Decide the strategy for one outbound request.
    pub fn decide(&self, method: &str, url: &str) -> Decision {
        if method != "GET" {
            return Decision::of(Strategy::Passthrough);
        }
        if let Ok(matched) = self.paths.at(request_path(url)) {
            return Decision::of(*matched.value);
        }
        if self.url_suffixes.iter().any(|suffix| url.ends_with(suffix)) {
            return Decision::of(Strategy::CacheFirst);
        }
        match self.scope {
            WorkerScope::ManifestOnly => Decision::of(Strategy::Passthrough),
            WorkerScope::AllNonApi => Decision::of(Strategy::CacheFirst),
        }
    }
}

/// Path component of a request URL: strips scheme/host and any query or
/// fragment. Already-relative URLs pass through.
fn request_path(url: &str) -> &str {
    let after_host = match url.find("://") {
        Some(scheme_end) => {
            let rest = &url[scheme_end + 3..];
            match rest.find('/') {
                Some(slash) => &rest[slash..],
                None => "/",
            }
        }
        None => url,
    };
    let end = after_host
        .find(['?', '#'])
        .unwrap_or(after_host.len());
    &after_host[..end]
}
