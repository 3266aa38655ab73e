//! Logging pipeline — the one place a choice turns into progression.
//!
//! Both entry points (a confirmed product scan and the water button)
//! funnel through the same sequence: record grams, grant XP, update the
//! streak, queue the user-facing feedback, and schedule a debounced
//! save. Everything happens inside one `with_session_mut` borrow, so a
//! triggering event is applied atomically as far as the host can see.

use crate::effects::{Effect, Reply, TimerKind, error_reply};
use crate::feedback::FeedbackItem;
use crate::gamification::{progression, sugar};
use crate::routes::util::{form_params, require};
use crate::session::{Session, with_session_mut};

/// Handle POST /app/water
/// Body params: `today={YYYY-MM-DD}`
///
/// Logs one default serving of water as a sugar-free choice.
pub fn handle_water_post(body: &str) -> String {
    let params = form_params(body);
    let today = match require(&params, "today") {
        Ok(t) => t,
        Err(msg) => return error_reply(&msg),
    };

    with_session_mut(|session| {
        let mut effects = Vec::new();
        let saving = sugar::water_saving(&session.config);
        progression::record_saving(&mut session.gamification, saving);
        grant_xp(session, saving, &mut effects);

        let centiliters = session.config.default_serving_ml / 10.0;
        push_feedback(
            session,
            FeedbackItem::ok(
                "Healthy Choice!",
                format!("You logged {centiliters:.0}cl of water. +{saving:.0} XP"),
            ),
            &mut effects,
        );
        effects.push(Effect::play_sound("scan_success.mp3"));

        progression::update_streak(&mut session.gamification, &session.config, today);
        effects.push(schedule_save(session));
        Reply::with_stats(session.stats(), effects).to_json()
    })
}

/// Apply a confirmed product log: the sugar-free path records a saving
/// and celebrates, the sugary path records consumption. Returns the
/// effects of the whole pipeline.
pub fn apply_product(session: &mut Session, barcode: &str, today: &str) -> Vec<Effect> {
    let Some(product) = session.products.get(barcode).cloned() else {
        // The confirm action always refers to a product cached during
        // resolution; a miss here means the session was reset mid-prompt.
        tracing::warn!(%barcode, "confirmed product no longer cached");
        return Vec::new();
    };

    let mut effects = Vec::new();
    let saving = sugar::sugar_saving(&product, &session.config);
    let intake = sugar::sugar_intake(&product, &session.config);

    if saving > 0.0 {
        progression::record_saving(&mut session.gamification, saving);
        grant_xp(session, saving, &mut effects);
        push_feedback(
            session,
            FeedbackItem::ok(
                "CRITICAL HIT!",
                format!("You avoided {saving:.1}g of sugar! +{saving:.0} XP"),
            ),
            &mut effects,
        );
        effects.push(Effect::play_sound("scan_success.mp3"));
        effects.push(Effect::Confetti);
    } else {
        progression::record_consumption(&mut session.gamification, intake, today);
        push_feedback(
            session,
            FeedbackItem::ok(
                "Hazard Detected",
                format!("You consumed ~{intake:.1}g of sugar."),
            ),
            &mut effects,
        );
    }

    progression::update_streak(&mut session.gamification, &session.config, today);
    effects.push(schedule_save(session));
    effects
}

/// Grant XP; a crossed level boundary queues the LEVEL UP notification
/// (ahead of the triggering action's own feedback) and its audio cue.
pub fn grant_xp(session: &mut Session, amount: f64, effects: &mut Vec<Effect>) {
    if let Some(up) = progression::add_xp(&mut session.gamification, &session.config, amount) {
        effects.push(Effect::play_sound("jackpot_win.mp3"));
        push_feedback(
            session,
            FeedbackItem::ok("LEVEL UP!", format!("You are now Level {}!", up.level)),
            effects,
        );
    }
}

/// Enqueue a feedback item; if it became visible immediately, tell the
/// host to show it.
pub fn push_feedback(session: &mut Session, item: FeedbackItem, effects: &mut Vec<Effect>) {
    if let Some(shown) = session.feedback.enqueue(item) {
        effects.push(Effect::show_feedback(&shown));
    }
}

/// Arm (or re-arm) the debounced save.
pub fn schedule_save(session: &mut Session) -> Effect {
    Effect::StartTimer {
        timer: TimerKind::Save,
        generation: session.saves.schedule(),
        delay_ms: session.config.save_debounce_ms,
    }
}
