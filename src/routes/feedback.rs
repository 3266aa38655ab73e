//! `/app/feedback/*` — overlay acknowledgement and transition timing.
//!
//! `ack` runs when the user presses OK/Confirm/Cancel: the overlay
//! starts hiding, a deferred confirm action (if any) executes inside the
//! same request, and the host arms the transition timer. `advance` is
//! that timer's callback and promotes the next queued item to visible.

use crate::effects::{Effect, Reply, TimerKind, error_reply};
use crate::feedback::{Ack, ConfirmAction};
use crate::routes::log::apply_product;
use crate::routes::util::{form_params, require};
use crate::session::with_session_mut;

/// Handle POST /app/feedback/ack
/// Body params: `action={ok|confirm|cancel}`
pub fn handle_ack_post(body: &str) -> String {
    let params = form_params(body);
    let ack = match require(&params, "action") {
        Ok("ok") => Ack::Ok,
        Ok("confirm") => Ack::Confirm,
        Ok("cancel") => Ack::Cancel,
        Ok(other) => return error_reply(&format!("unknown action: {other}")),
        Err(msg) => return error_reply(&msg),
    };

    with_session_mut(|session| {
        // Acknowledging with nothing visible (double-tap during the hide
        // transition) is a no-op.
        let Some(outcome) = session.feedback.acknowledge(ack) else {
            return Reply::default().to_json();
        };

        let mut effects = vec![
            Effect::HideFeedback,
            Effect::StartTimer {
                timer: TimerKind::Feedback,
                generation: outcome.generation,
                delay_ms: session.config.feedback_transition_ms,
            },
        ];
        if let Some(ConfirmAction::LogProduct { barcode, today }) = outcome.action {
            effects.extend(apply_product(session, &barcode, &today));
        }
        Reply::with_stats(session.stats(), effects).to_json()
    })
}

/// Handle POST /app/feedback/advance
/// Body params: `generation={n}` — the transition timer's generation.
pub fn handle_advance_post(body: &str) -> String {
    let params = form_params(body);
    let generation: u64 = match require(&params, "generation").map(str::parse) {
        Ok(Ok(g)) => g,
        _ => return error_reply("missing or invalid generation"),
    };

    with_session_mut(|session| {
        let mut effects = Vec::new();
        if let Some(next) = session.feedback.advance(generation) {
            effects.push(Effect::show_feedback(&next));
        }
        Reply::effects(effects).to_json()
    })
}
