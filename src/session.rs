//! Session root — the single context object owning all engine state.
//!
//! Uses `thread_local!` + `RefCell` for safe mutable access in
//! single-threaded WASM. The worker keeps the module alive, so the
//! session persists across `handle_request` calls for the whole browser
//! visit. The thread-local is only the lifetime anchor: command handlers
//! borrow the `Session` once per request and pass it (or its fields)
//! explicitly into the components — nothing below this module reaches
//! into a global.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::catalog::ProductCache;
use crate::config::EngineConfig;
use crate::feedback::FeedbackQueue;
use crate::gamification::progression;
use crate::gamification::state::GamificationState;
use crate::sync::SaveScheduler;

/// The flat keyed structure exchanged with the user data store — exactly
/// what `GET/POST /api/user/data` carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionData {
    pub gamification_state: GamificationState,
    pub product_cache: ProductCache,
}

/// Everything owned by the active user session.
#[derive(Debug)]
pub struct Session {
    pub config: EngineConfig,
    pub gamification: GamificationState,
    pub products: ProductCache,
    pub feedback: FeedbackQueue,
    pub saves: SaveScheduler,
}

impl Session {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            gamification: GamificationState::default(),
            products: ProductCache::new(),
            feedback: FeedbackQueue::new(),
            saves: SaveScheduler::new(),
        }
    }

    /// Seed the session from the data store payload, then roll the daily
    /// consumption counter over if the calendar day changed since the
    /// user last consumed anything.
    pub fn load(&mut self, data: SessionData, today: &str) {
        self.gamification = data.gamification_state;
        self.products = data.product_cache;

        let stats = &mut self.gamification.lifetime_stats;
        if stats.last_consumed_date.as_deref() != Some(today) {
            stats.daily_sugar_consumed_g = 0.0;
            stats.last_consumed_date = Some(today.to_string());
        }
        tracing::info!(
            level = self.gamification.level,
            cached_products = self.products.len(),
            "session loaded"
        );
    }

    /// Snapshot for persistence.
    pub fn export(&self) -> SessionData {
        SessionData {
            gamification_state: self.gamification.clone(),
            product_cache: self.products.clone(),
        }
    }

    /// Logout: clear all user state, keep configuration, and invalidate
    /// any pending debounced save so it cannot leak into the next login.
    pub fn reset(&mut self) {
        self.gamification = GamificationState::default();
        self.products = ProductCache::new();
        self.feedback = FeedbackQueue::new();
        self.saves.cancel();
        tracing::info!("session reset");
    }

    /// The dashboard view derived from current state.
    pub fn stats(&self) -> StatsView {
        let gs = &self.gamification;
        let xp_for_next_level = progression::xp_for_level(&self.config, gs.level + 1);
        let cube = self.config.sugar_cube_g;
        StatsView {
            level: gs.level,
            current_xp: gs.current_xp,
            xp_for_next_level,
            xp_fraction: (gs.current_xp / xp_for_next_level).clamp(0.0, 1.0),
            total_sugar_saved_g: gs.lifetime_stats.total_sugar_saved_g,
            sugar_cubes_saved: cubes(gs.lifetime_stats.total_sugar_saved_g, cube),
            total_sugar_consumed_g: gs.lifetime_stats.total_sugar_consumed_g,
            sugar_cubes_consumed: cubes(gs.lifetime_stats.total_sugar_consumed_g, cube),
            daily_sugar_consumed_g: gs.lifetime_stats.daily_sugar_consumed_g,
            daily_limit_percent: gs.lifetime_stats.daily_sugar_consumed_g
                / self.config.daily_limit_g
                * 100.0,
            streak_days: gs.streaks.current_streak_days,
            show_fire: gs.streaks.current_streak_days >= 2,
        }
    }
}

fn cubes(grams: f64, cube_g: f64) -> u64 {
    (grams / cube_g).floor().max(0.0) as u64
}

/// Dashboard numbers the host renders verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsView {
    pub level: u32,
    pub current_xp: f64,
    pub xp_for_next_level: f64,
    /// Fill fraction for the XP bar, 0..=1.
    pub xp_fraction: f64,
    pub total_sugar_saved_g: f64,
    pub sugar_cubes_saved: u64,
    pub total_sugar_consumed_g: f64,
    pub sugar_cubes_consumed: u64,
    pub daily_sugar_consumed_g: f64,
    pub daily_limit_percent: f64,
    pub streak_days: u32,
    pub show_fire: bool,
}

thread_local! {
    static SESSION: RefCell<Session> = RefCell::new(Session::new(EngineConfig::default()));
}

/// Execute a closure with read access to the session.
pub fn with_session<F, R>(f: F) -> R
where
    F: FnOnce(&Session) -> R,
{
    SESSION.with(|s| f(&s.borrow()))
}

/// Execute a closure with mutable access to the session.
pub fn with_session_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut Session) -> R,
{
    SESSION.with(|s| f(&mut s.borrow_mut()))
}

/// Replace the whole session (tests, and config replacement).
pub fn replace_session(new_session: Session) {
    SESSION.with(|s| {
        *s.borrow_mut() = new_session;
    });
}
