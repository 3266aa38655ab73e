//! `/app/session/*`, `/app/config`, `/app/stats`, `/app/save/fire` —
//! session lifecycle, configuration, and the persistence callbacks.

use crate::config::EngineConfig;
use crate::effects::{Effect, Reply, error_reply};
use crate::error::EngineError;
use crate::routes::util::{form_params, query_params, require};
use crate::session::{SessionData, with_session, with_session_mut};

/// Handle POST /app/config
/// Body: a (possibly partial) `EngineConfig` as JSON. Missing fields
/// keep their defaults. State survives a config change; the new policies
/// apply from the next operation on.
pub fn handle_config_post(body: &str) -> String {
    let config: EngineConfig = match serde_json::from_str(body) {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::warn!(%err, "rejected config payload");
            return error_reply("invalid config JSON");
        }
    };
    with_session_mut(|session| {
        session.config = config;
        Reply::default().to_json()
    })
}

/// Handle POST /app/session/load?today={YYYY-MM-DD}
/// Body: the user data store payload (`gamification_state`,
/// `product_cache`) as JSON. Rolls the daily counter over when the
/// calendar day changed since the last consumption.
pub fn handle_load_post(query: &str, body: &str) -> String {
    let params = query_params(query);
    let today = match require(&params, "today") {
        Ok(t) => t,
        Err(msg) => return error_reply(&msg),
    };
    let data: SessionData = match serde_json::from_str(body) {
        Ok(data) => data,
        Err(err) => {
            tracing::warn!(%err, "could not read user data payload");
            return error_reply("invalid user data payload");
        }
    };
    with_session_mut(|session| {
        session.load(data, today);
        Reply::with_stats(session.stats(), Vec::new()).to_json()
    })
}

/// Handle POST /app/session/reset — logout.
pub fn handle_reset_post() -> String {
    with_session_mut(|session| {
        session.reset();
        Reply::default().to_json()
    })
}

/// Handle GET /app/stats — the current dashboard view.
pub fn handle_stats_get() -> String {
    with_session(|session| Reply::with_stats(session.stats(), Vec::new()).to_json())
}

/// Handle POST /app/save/fire
/// Body params: `generation={n}` — the debounce timer's generation.
/// Only the newest armed generation produces a persistence request.
pub fn handle_save_fire_post(body: &str) -> String {
    let params = form_params(body);
    let generation: u64 = match require(&params, "generation").map(str::parse) {
        Ok(Ok(g)) => g,
        _ => return error_reply("missing or invalid generation"),
    };

    with_session_mut(|session| {
        let mut effects = Vec::new();
        if session.saves.fire(generation) {
            effects.push(Effect::PersistState {
                data: session.export(),
            });
        }
        Reply::effects(effects).to_json()
    })
}

/// Handle POST /app/persist/failed
/// Body params: `message={detail}` — logged, never surfaced or retried.
/// At most one debounce window of progress is at risk.
pub fn handle_persist_failed_post(body: &str) -> String {
    let params = form_params(body);
    let detail = params.get("message").map(String::as_str).unwrap_or("unknown");
    let err = EngineError::PersistenceFailed(detail.to_string());
    tracing::warn!(%err, "state not saved this window");
    Reply::default().to_json()
}

/// Handle POST /app/scanner/failed
/// Body params: `message={detail}` — camera missing or permission
/// denied. Logged; the host returns the user to the dashboard with no
/// progression change.
pub fn handle_scanner_failed_post(body: &str) -> String {
    let params = form_params(body);
    let detail = params.get("message").map(String::as_str).unwrap_or("unknown");
    let err = EngineError::ScannerUnavailable(detail.to_string());
    tracing::warn!(%err, "scan attempt abandoned");
    Reply::default().to_json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Session, replace_session, with_session};

    fn reset_session() {
        replace_session(Session::new(EngineConfig::default()));
    }

    #[test]
    fn load_reports_stats_and_rolls_daily() {
        reset_session();
        let body = r#"{
            "gamification_state": {
                "level": 3,
                "current_xp": 250.0,
                "lifetime_stats": {
                    "total_sugar_saved_g": 100.0,
                    "daily_sugar_consumed_g": 30.0,
                    "last_consumed_date": "2026-02-17"
                },
                "streaks": { "current_streak_days": 5, "last_log_date": "2026-02-17" }
            },
            "product_cache": {}
        }"#;
        let reply = handle_load_post("?today=2026-02-18", body);
        let value: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["stats"]["level"], 3);
        assert_eq!(value["stats"]["daily_sugar_consumed_g"], 0.0);
        assert_eq!(value["stats"]["streak_days"], 5);
        reset_session();
    }

    #[test]
    fn load_rejects_garbage_payload() {
        reset_session();
        let reply = handle_load_post("?today=2026-02-18", "not json");
        assert!(reply.contains("invalid user data payload"));
        reset_session();
    }

    #[test]
    fn config_swaps_policies_in_place() {
        reset_session();
        handle_config_post(r#"{"xp_curve":{"curve":"flat","amount":3000.0}}"#);
        with_session(|s| {
            assert_eq!(
                s.config.xp_curve,
                crate::config::XpCurve::Flat { amount: 3000.0 }
            );
            // Untouched fields keep their defaults.
            assert_eq!(s.config.save_debounce_ms, 2000);
        });
        reset_session();
    }

    #[test]
    fn save_fire_exports_only_current_generation() {
        reset_session();
        let generation = crate::session::with_session_mut(|s| {
            s.gamification.level = 2;
            s.saves.schedule();
            s.saves.schedule()
        });

        let stale = handle_save_fire_post(&format!("generation={}", generation - 1));
        assert!(!stale.contains("persist_state"));

        let reply = handle_save_fire_post(&format!("generation={generation}"));
        let value: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["effects"][0]["type"], "persist_state");
        assert_eq!(value["effects"][0]["data"]["gamification_state"]["level"], 2);
        reset_session();
    }

    #[test]
    fn reset_clears_everything() {
        reset_session();
        crate::session::with_session_mut(|s| {
            s.gamification.level = 7;
            s.saves.schedule();
        });
        handle_reset_post();
        with_session(|s| {
            assert_eq!(s.gamification.level, 1);
            assert!(!s.saves.is_armed());
        });
        reset_session();
    }

    #[test]
    fn failure_reports_never_error() {
        reset_session();
        assert!(handle_persist_failed_post("message=503%20from%20store").contains("effects"));
        assert!(handle_scanner_failed_post("").contains("effects"));
        reset_session();
    }
}
