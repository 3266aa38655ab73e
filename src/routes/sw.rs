//! `/sw/*` — the Service Worker's view of the engine.
//!
//! The worker script owns the async Cache API and the actual fetches; it
//! asks these routes what to do: which strategy a request gets, what to
//! pre-cache on install, which cache generations to purge on activation,
//! and the offline payload to synthesize.

use crate::effects::error_reply;
use crate::routes::util::{query_params, require};
use crate::session::with_session;
use crate::worker::router::RouteTable;
use crate::worker::strategy::OFFLINE_BODY;
use crate::worker::{CACHE_NAME, STATIC_MANIFEST, purge_plan};

/// Handle GET /sw/route?method={M}&url={U}
/// Returns `{"strategy": ..., "cache": ...}` for one intercepted request.
pub fn handle_route_get(query: &str) -> String {
    let params = query_params(query);
    let url = match require(&params, "url") {
        Ok(u) => u,
        Err(msg) => return error_reply(&msg),
    };
    let method = params.get("method").map(String::as_str).unwrap_or("GET");

    let decision = with_session(|session| {
        RouteTable::new(&session.config.worker).decide(method, url)
    });
    serde_json::to_string(&decision).unwrap_or_else(|_| error_reply("unserializable decision"))
}

/// Handle GET /sw/manifest
/// Returns the active cache name and the assets to pre-cache on install.
pub fn handle_manifest_get() -> String {
    serde_json::json!({
        "cache": CACHE_NAME,
        "assets": STATIC_MANIFEST,
    })
    .to_string()
}

/// Handle GET /sw/activate?caches={a,b,c}
/// Returns the cache identifiers to delete: every generation except the
/// active one.
pub fn handle_activate_get(query: &str) -> String {
    let params = query_params(query);
    let existing: Vec<String> = params
        .get("caches")
        .map(|list| {
            list.split(',')
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    serde_json::json!({ "delete": purge_plan(&existing) }).to_string()
}

/// Handle GET /sw/offline — the synthesized offline payload.
pub fn handle_offline_get() -> String {
    OFFLINE_BODY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_decision_for_api_call() {
        let reply = handle_route_get("?method=GET&url=%2Fapi%2Fuser%2Fdata");
        assert!(reply.contains("network-first"));
        assert!(reply.contains(CACHE_NAME));
    }

    #[test]
    fn route_decision_defaults_method_to_get() {
        let reply = handle_route_get("?url=%2Fstatic%2Fjs%2Fapp.js");
        assert!(reply.contains("cache-first"));
    }

    #[test]
    fn route_requires_url() {
        assert!(handle_route_get("?method=GET").contains("missing parameter: url"));
    }

    #[test]
    fn manifest_lists_cache_and_assets() {
        let value: serde_json::Value =
            serde_json::from_str(&handle_manifest_get()).unwrap();
        assert_eq!(value["cache"], CACHE_NAME);
        let assets = value["assets"].as_array().unwrap();
        assert_eq!(assets.len(), STATIC_MANIFEST.len());
        assert!(assets.iter().any(|a| a == "/static/js/app.js"));
    }

    #[test]
    fn activate_purges_stale_generations() {
        let reply =
            handle_activate_get("?caches=sugarswap-cache-v0,sugarswap-cache-v1,other");
        let value: serde_json::Value = serde_json::from_str(&reply).unwrap();
        let delete = value["delete"].as_array().unwrap();
        assert_eq!(delete.len(), 2);
        assert!(!delete.iter().any(|d| d == CACHE_NAME));
    }

    #[test]
    fn offline_payload_is_fixed() {
        assert_eq!(handle_offline_get(), r#"{"status":"offline"}"#);
    }
}
