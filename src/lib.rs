//! SugarSwap in-browser engine.
//!
//! Exports `handle_request(method, path, query, body)` for the page and
//! Service Worker bridges to call. Uses `matchit` for URL routing — the
//! same router engine that powers Axum.
//!
//! `/app/*` routes are the page-controller commands: scans, water logs,
//! feedback acknowledgement, timers firing, session lifecycle. Replies
//! are JSON envelopes with a stats view and an ordered effect list the
//! page executes. `/sw/*` routes answer the Service Worker's policy
//! questions (strategy per request, install manifest, activation purge,
//! offline payload).

use wasm_bindgen::prelude::*;

pub mod catalog;
pub mod config;
pub mod effects;
pub mod error;
pub mod feedback;
pub mod gamification;
pub mod routes;
pub mod session;
pub mod sync;
pub mod worker;

/// Process an HTTP-like request and return a JSON reply.
///
/// Called from JavaScript (page controller and Service Worker) via
/// wasm-bindgen.
///
/// # Arguments
/// * `method` — HTTP method (e.g., "GET", "POST")
/// * `path`   — URL path (e.g., "/app/scan")
/// * `query`  — Query string (e.g., "?today=2026-02-18")
/// * `body`   — Request body: URL-encoded form params for commands,
///   raw JSON for `/app/config` and `/app/session/load`. Empty for GETs.
#[wasm_bindgen]
pub fn handle_request(method: &str, path: &str, query: &str, body: &str) -> String {
    // Build the router. matchit compiles route patterns into a radix tree.
    let mut router = matchit::Router::new();

    // Page-controller command routes — the value is a &str tag we match
    // on below.
    router.insert("/app/config", "config").ok();
    router.insert("/app/session/load", "session_load").ok();
    router.insert("/app/session/reset", "session_reset").ok();
    router.insert("/app/stats", "stats").ok();
    router.insert("/app/scan", "scan").ok();
    router.insert("/app/product", "product").ok();
    router.insert("/app/water", "water").ok();
    router.insert("/app/feedback/ack", "feedback_ack").ok();
    router.insert("/app/feedback/advance", "feedback_advance").ok();
    router.insert("/app/save/fire", "save_fire").ok();
    router.insert("/app/persist/failed", "persist_failed").ok();
    router.insert("/app/scanner/failed", "scanner_failed").ok();

    // Service Worker policy routes
    router.insert("/sw/route", "sw_route").ok();
    router.insert("/sw/manifest", "sw_manifest").ok();
    router.insert("/sw/activate", "sw_activate").ok();
    router.insert("/sw/offline", "sw_offline").ok();

    match router.at(path) {
        Ok(matched) => match (*matched.value, method) {
            ("config", "POST") => routes::session::handle_config_post(body),
            ("session_load", "POST") => routes::session::handle_load_post(query, body),
            ("session_reset", "POST") => routes::session::handle_reset_post(),
            ("stats", "GET") => routes::session::handle_stats_get(),
            ("scan", "POST") => routes::scan::handle_scan_post(body),
            ("product", "POST") => routes::scan::handle_product_post(body),
            ("water", "POST") => routes::log::handle_water_post(body),
            ("feedback_ack", "POST") => routes::feedback::handle_ack_post(body),
            ("feedback_advance", "POST") => routes::feedback::handle_advance_post(body),
            ("save_fire", "POST") => routes::session::handle_save_fire_post(body),
            ("persist_failed", "POST") => routes::session::handle_persist_failed_post(body),
            ("scanner_failed", "POST") => routes::session::handle_scanner_failed_post(body),

            ("sw_route", "GET") => routes::sw::handle_route_get(query),
            ("sw_manifest", "GET") => routes::sw::handle_manifest_get(),
            ("sw_activate", "GET") => routes::sw::handle_activate_get(query),
            ("sw_offline", "GET") => routes::sw::handle_offline_get(),

            _ => method_not_allowed(),
        },
        Err(_) => not_found(),
    }
}

fn not_found() -> String {
    r#"{"error":"404 — route not found"}"#.to_string()
}

fn method_not_allowed() -> String {
    r#"{"error":"405 — method not allowed"}"#.to_string()
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn entry_point_answers_in_wasm() {
        let reply = handle_request("GET", "/sw/offline", "", "");
        assert_eq!(reply, r#"{"status":"offline"}"#);
    }

    #[wasm_bindgen_test]
    fn unknown_route_is_404_in_wasm() {
        let reply = handle_request("GET", "/nope", "", "");
        assert!(reply.contains("404"));
    }
}
