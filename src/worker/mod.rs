//! Offline cache worker policy — everything the Service Worker needs to
//! decide, none of the I/O it performs.
//!
//! The worker script intercepts outbound GETs and asks this module which
//! strategy applies (`router`); the strategy semantics themselves
//! (`strategy`) are defined over injected cache/fetch operations so the
//! exact serving behavior is pinned down and tested here, and mirrored
//! by the script over the async Cache API.
//!
//! One cache generation is active at a time: on activation every cache
//! under a different identifier is purged outright, no migration.

pub mod router;
pub mod strategy;

/// The single active cache generation.
pub const CACHE_NAME: &str = "sugarswap-cache-v1";

/// Static assets cached on install and served cache-first. Same-origin
/// entries are paths; CDN bundles are full URLs matched by suffix.
pub const STATIC_MANIFEST: &[&str] = &[
    "/",
    "/static/css/style.css",
    "/static/js/app.js",
    "https://unpkg.com/html5-qrcode@2.3.8/html5-qrcode.min.js",
    "https://cdn.jsdelivr.net/npm/canvas-confetti@1.9.3/dist/confetti.browser.min.js",
];

/// Caches to delete when a new worker generation activates: everything
/// that is not the active generation.
pub fn purge_plan(existing: &[String]) -> Vec<String> {
    existing
        .iter()
        .filter(|name| name.as_str() != CACHE_NAME)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purge_drops_every_other_generation() {
        let existing = vec![
            "sugarswap-cache-v0".to_string(),
            CACHE_NAME.to_string(),
            "unrelated-cache".to_string(),
        ];
        assert_eq!(
            purge_plan(&existing),
            vec!["sugarswap-cache-v0".to_string(), "unrelated-cache".to_string()]
        );
    }

    #[test]
    fn purge_of_only_active_cache_is_empty() {
        assert!(purge_plan(&[CACHE_NAME.to_string()]).is_empty());
        assert!(purge_plan(&[]).is_empty());
    }
}
