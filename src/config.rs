//! Engine configuration — every rule that varied across product revisions
//! is pinned here as an explicit, named policy with one canonical default.
//!
//! The host may replace the whole configuration at runtime via
//! `POST /app/config` with a JSON body; missing fields fall back to the
//! defaults below, so a partial config is always valid.

use serde::{Deserialize, Serialize};

/// XP required to reach the *next* level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "curve", rename_all = "snake_case")]
pub enum XpCurve {
    /// `level² × base_xp` — steepening requirement per level.
    Quadratic { base_xp: f64 },
    /// Fixed requirement regardless of level.
    Flat { amount: f64 },
}

impl Default for XpCurve {
    fn default() -> Self {
        XpCurve::Quadratic { base_xp: 100.0 }
    }
}

/// What happens to an accumulated streak when a day is missed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum StreakLapse {
    /// Keep 80% of the streak (floored) — forgiving.
    Decay { factor: f64 },
    /// Hard reset to zero.
    Reset,
}

impl Default for StreakLapse {
    fn default() -> Self {
        StreakLapse::Decay { factor: 0.8 }
    }
}

/// Where a product's per-serving sugar content comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeSource {
    /// The proxy-reported `sugars_serving` field (total container sugar),
    /// missing or zero means 0.
    #[default]
    ReportedServing,
    /// `serving_ml / 100 × sugars_100g`, computed from the serving size.
    Computed,
}

/// Which non-API GET requests the offline worker treats as cache-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerScope {
    /// Only assets on the static manifest; everything else passes through.
    #[default]
    ManifestOnly,
    /// Any non-API GET is cache-first.
    AllNonApi,
}

/// What network-first serves when the network is down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfflineFallback {
    /// The last cached response for the exact request; nothing cached
    /// means the request fails as it would without a worker.
    #[default]
    CachedResponse,
    /// A synthesized `{"status":"offline"}` payload.
    OfflinePayload,
}

/// Offline cache worker policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub scope: WorkerScope,
    pub offline_fallback: OfflineFallback,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            scope: WorkerScope::default(),
            offline_fallback: OfflineFallback::default(),
        }
    }
}

/// Complete engine configuration. One value per session, owned by the
/// `Session`; replaced wholesale, never mutated field-by-field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub xp_curve: XpCurve,
    pub streak_lapse: StreakLapse,
    pub intake_source: IntakeSource,
    /// Grams of sugar represented by one displayed sugar cube.
    pub sugar_cube_g: f64,
    /// Recommended daily sugar intake in grams (dashboard percentage base).
    pub daily_limit_g: f64,
    /// Sugar content of the reference sugary drink, grams per 100 mL.
    pub nemesis_sugar_per_100ml: f64,
    /// Serving volume assumed when a product's serving size is missing or
    /// unparseable; also the water-glass volume.
    pub default_serving_ml: f64,
    /// Feedback overlay hide-transition window.
    pub feedback_transition_ms: u32,
    /// Quiet period before mutated state is persisted.
    pub save_debounce_ms: u32,
    pub worker: WorkerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            xp_curve: XpCurve::default(),
            streak_lapse: StreakLapse::default(),
            intake_source: IntakeSource::default(),
            sugar_cube_g: 3.0,
            daily_limit_g: 75.0,
            nemesis_sugar_per_100ml: 10.6,
            default_serving_ml: 330.0,
            feedback_transition_ms: 500,
            save_debounce_ms: 2000,
            worker: WorkerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_rules() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.xp_curve, XpCurve::Quadratic { base_xp: 100.0 });
        assert_eq!(cfg.streak_lapse, StreakLapse::Decay { factor: 0.8 });
        assert_eq!(cfg.intake_source, IntakeSource::ReportedServing);
        assert_eq!(cfg.nemesis_sugar_per_100ml, 10.6);
        assert_eq!(cfg.default_serving_ml, 330.0);
        assert_eq!(cfg.save_debounce_ms, 2000);
        assert_eq!(cfg.feedback_transition_ms, 500);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{"sugar_cube_g": 4.0}"#).unwrap();
        assert_eq!(cfg.sugar_cube_g, 4.0);
        assert_eq!(cfg.daily_limit_g, 75.0);
        assert_eq!(cfg.worker.scope, WorkerScope::ManifestOnly);
    }

    #[test]
    fn policy_enums_roundtrip() {
        let cfg = EngineConfig {
            xp_curve: XpCurve::Flat { amount: 3000.0 },
            streak_lapse: StreakLapse::Reset,
            intake_source: IntakeSource::Computed,
            ..EngineConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
