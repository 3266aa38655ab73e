//! Host effect protocol — the engine never performs I/O itself.
//!
//! Every command reply carries an ordered list of effects for the page
//! to execute: overlay transitions, timers to arm, URLs to fetch, the
//! persistence payload, presentation cues. The page runs them in order
//! and calls back into the engine where an effect says to (timer fires,
//! fetched responses).

use serde::Serialize;

use crate::feedback::{FeedbackItem, FeedbackKind};
use crate::session::{SessionData, StatsView};

/// Which host-armed timer an effect refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Feedback hide-transition window; echo into `/app/feedback/advance`.
    Feedback,
    /// Save debounce window; echo into `/app/save/fire`.
    Save,
}

/// One instruction for the host, executed in reply order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Put the feedback overlay up with this content.
    ShowFeedback {
        title: String,
        text: String,
        kind: FeedbackKind,
    },
    /// Begin the overlay hide transition.
    HideFeedback,
    /// Arm a timer; call the matching route back with this generation.
    StartTimer {
        timer: TimerKind,
        generation: u64,
        delay_ms: u32,
    },
    /// GET this URL and POST the body to `/app/product`.
    FetchProduct { barcode: String, url: String },
    /// POST this payload to the user data store.
    PersistState { data: SessionData },
    /// Fire-and-forget audio cue.
    PlaySound { file: String },
    /// Fire-and-forget confetti burst.
    Confetti,
}

impl Effect {
    /// Show effect for a freshly displayed feedback item.
    pub fn show_feedback(item: &FeedbackItem) -> Self {
        Effect::ShowFeedback {
            title: item.title.clone(),
            text: item.text.clone(),
            kind: item.kind,
        }
    }

    pub fn play_sound(file: &str) -> Self {
        Effect::PlaySound {
            file: file.to_string(),
        }
    }
}

/// Reply envelope for every `/app/*` command.
#[derive(Debug, Default, Serialize)]
pub struct Reply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsView>,
    pub effects: Vec<Effect>,
}

impl Reply {
    pub fn effects(effects: Vec<Effect>) -> Self {
        Self {
            stats: None,
            effects,
        }
    }

    pub fn with_stats(stats: StatsView, effects: Vec<Effect>) -> Self {
        Self {
            stats: Some(stats),
            effects,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"effects":[]}"#.to_string())
    }
}

/// Error reply for malformed commands (missing params, bad JSON).
pub fn error_reply(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effects_serialize_tagged_snake_case() {
        let json = serde_json::to_string(&Effect::StartTimer {
            timer: TimerKind::Save,
            generation: 3,
            delay_ms: 2000,
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"type":"start_timer","timer":"save","generation":3,"delay_ms":2000}"#
        );

        let json = serde_json::to_string(&Effect::Confetti).unwrap();
        assert_eq!(json, r#"{"type":"confetti"}"#);
    }

    #[test]
    fn show_feedback_carries_kind() {
        let item = FeedbackItem::ok("LEVEL UP!", "You are now Level 2!");
        let json = serde_json::to_string(&Effect::show_feedback(&item)).unwrap();
        assert!(json.contains(r#""kind":"ok""#));
        assert!(json.contains("LEVEL UP!"));
    }

    #[test]
    fn reply_omits_stats_when_absent() {
        let reply = Reply::effects(vec![Effect::HideFeedback]);
        let json = reply.to_json();
        assert!(!json.contains("stats"));
        assert!(json.contains("hide_feedback"));
    }

    #[test]
    fn error_reply_shape() {
        assert_eq!(error_reply("missing barcode"), r#"{"error":"missing barcode"}"#);
    }
}
