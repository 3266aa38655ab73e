//! Gamification — the progression state and the pure sugar model.
//!
//! `state` holds the persisted `GamificationState`; `sugar` converts raw
//! product nutrition data into saved/consumed grams; `progression`
//! mutates level, XP, streaks, and consumption rollups. All mutation
//! happens synchronously inside one command, so a triggering event is
//! applied atomically as far as the host can observe.

pub mod progression;
pub mod state;
pub mod sugar;
