//! Progression engine — level/XP grants, streak upkeep, consumption
//! rollups. State machine over `GamificationState`; every operation is
//! synchronous and total.
//!
//! `today` is always supplied by the caller as a `YYYY-MM-DD` local-date
//! string. The engine never reads a clock.

use chrono::NaiveDate;

use crate::config::{EngineConfig, StreakLapse, XpCurve};
use crate::gamification::state::GamificationState;

/// A level boundary crossed by an XP grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    /// The level just reached.
    pub level: u32,
}

/// XP required to *reach* `level` from the level below it.
pub fn xp_for_level(cfg: &EngineConfig, level: u32) -> f64 {
    match cfg.xp_curve {
        XpCurve::Quadratic { base_xp } => (level as f64) * (level as f64) * base_xp,
        XpCurve::Flat { amount } => amount,
    }
}

/// Add XP, carrying overflow into at most one level increment.
///
/// Crossing the next-level requirement subtracts that requirement once
/// and bumps the level by exactly one. A grant large enough to cross two
/// boundaries still produces a single level-up; the remainder triggers
/// the next one on the following grant.
pub fn add_xp(state: &mut GamificationState, cfg: &EngineConfig, amount: f64) -> Option<LevelUp> {
    state.current_xp += amount;
    let required = xp_for_level(cfg, state.level + 1);
    if state.current_xp >= required {
        state.level += 1;
        state.current_xp -= required;
        tracing::debug!(level = state.level, "level up");
        return Some(LevelUp { level: state.level });
    }
    None
}

/// Update the consecutive-day streak for a log happening on `today`.
///
/// Same-day repeat logs are a no-op. A log on the day after the last one
/// extends the streak. The first-ever log stamps the date and leaves the
/// streak at zero. A missed day applies the configured lapse policy.
pub fn update_streak(state: &mut GamificationState, cfg: &EngineConfig, today: &str) {
    let streaks = &mut state.streaks;
    if streaks.last_log_date.as_deref() == Some(today) {
        return;
    }

    match streaks.last_log_date.as_deref() {
        // First-ever log: nothing to extend yet.
        None => {}
        Some(last) if is_day_before(last, today) => {
            streaks.current_streak_days += 1;
        }
        Some(_) => {
            streaks.current_streak_days = match cfg.streak_lapse {
                StreakLapse::Decay { factor } => {
                    (streaks.current_streak_days as f64 * factor).floor() as u32
                }
                StreakLapse::Reset => 0,
            };
        }
    }
    streaks.last_log_date = Some(today.to_string());
}

/// True when `last` is the calendar day immediately before `today`.
/// Unparseable dates are never consecutive, so they fall into the lapse
/// branch rather than failing.
fn is_day_before(last: &str, today: &str) -> bool {
    match (parse_day(last), parse_day(today)) {
        (Some(last), Some(today)) => today.pred_opt() == Some(last),
        _ => false,
    }
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Record consumed sugar, rolling the daily counter over to a fresh day
/// first when the calendar day changed since the last consumption.
pub fn record_consumption(state: &mut GamificationState, grams: f64, today: &str) {
    let stats = &mut state.lifetime_stats;
    if stats.last_consumed_date.as_deref() != Some(today) {
        stats.daily_sugar_consumed_g = 0.0;
        stats.last_consumed_date = Some(today.to_string());
    }
    stats.daily_sugar_consumed_g += grams;
    stats.total_sugar_consumed_g += grams;
}

/// Record avoided sugar in the lifetime rollup.
pub fn record_saving(state: &mut GamificationState, grams: f64) {
    state.lifetime_stats.total_sugar_saved_g += grams;
}
