//! Persisted progression state.
//!
//! Field names and nesting match the layout the user data store expects
//! (`gamification_state` inside the save payload). Deserialization is
//! lenient: fields introduced in later product revisions default to
//! zero/null so users persisted by older builds load cleanly.

use serde::{Deserialize, Serialize};

/// Lifetime and daily sugar rollups.
///
/// Dates are ISO calendar-day strings (`YYYY-MM-DD`) in the user's local
/// time zone, never timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifetimeStats {
    pub total_sugar_saved_g: f64,
    pub total_sugar_consumed_g: f64,
    pub daily_sugar_consumed_g: f64,
    pub last_consumed_date: Option<String>,
}

impl Default for LifetimeStats {
    fn default() -> Self {
        Self {
            total_sugar_saved_g: 0.0,
            total_sugar_consumed_g: 0.0,
            daily_sugar_consumed_g: 0.0,
            last_consumed_date: None,
        }
    }
}

/// Consecutive-day logging streak.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Streaks {
    pub current_streak_days: u32,
    pub last_log_date: Option<String>,
}

/// Complete progression state for one user session.
///
/// Invariant: after an XP grant settles, `current_xp` is below the
/// requirement for the next level (overflow carried into a level
/// increment by `progression::add_xp`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamificationState {
    pub level: u32,
    pub current_xp: f64,
    pub lifetime_stats: LifetimeStats,
    pub streaks: Streaks,
}

impl Default for GamificationState {
    fn default() -> Self {
        Self {
            level: 1,
            current_xp: 0.0,
            lifetime_stats: LifetimeStats::default(),
            streaks: Streaks::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_starts_at_level_one() {
        let state = GamificationState::default();
        assert_eq!(state.level, 1);
        assert_eq!(state.current_xp, 0.0);
        assert_eq!(state.streaks.current_streak_days, 0);
        assert!(state.streaks.last_log_date.is_none());
    }

    #[test]
    fn state_roundtrip_json() {
        let mut state = GamificationState::default();
        state.level = 3;
        state.current_xp = 120.5;
        state.lifetime_stats.total_sugar_saved_g = 68.9;
        state.lifetime_stats.last_consumed_date = Some("2026-02-18".to_string());
        state.streaks.current_streak_days = 4;
        state.streaks.last_log_date = Some("2026-02-18".to_string());

        let json = serde_json::to_string(&state).unwrap();
        let restored: GamificationState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn older_persisted_shape_backfills_new_fields() {
        // A user saved before the consumption-tracking revision has no
        // consumed/daily fields at all.
        let json = r#"{
            "level": 2,
            "current_xp": 35.0,
            "lifetime_stats": { "total_sugar_saved_g": 104.2 },
            "streaks": { "current_streak_days": 7, "last_log_date": "2026-02-17" }
        }"#;
        let state: GamificationState = serde_json::from_str(json).unwrap();
        assert_eq!(state.level, 2);
        assert_eq!(state.lifetime_stats.total_sugar_saved_g, 104.2);
        assert_eq!(state.lifetime_stats.total_sugar_consumed_g, 0.0);
        assert_eq!(state.lifetime_stats.daily_sugar_consumed_g, 0.0);
        assert!(state.lifetime_stats.last_consumed_date.is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        // Older builds persisted a "badges" array; it carries no logic.
        let json = r#"{ "level": 1, "current_xp": 0, "badges": [] }"#;
        let state: GamificationState = serde_json::from_str(json).unwrap();
        assert_eq!(state.level, 1);
    }
}
