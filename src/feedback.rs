//! Feedback queue — serializes pop-up notifications so at most one is
//! visible at a time.
//!
//! State machine: `Idle → Showing → Hiding → Idle`. Acknowledgement puts
//! the overlay into its hide transition; the host arms a timer for the
//! transition window and calls `advance` when it fires, at which point
//! the next queued item (strict FIFO, no priorities, no de-duplication)
//! begins showing. A generation counter guards `advance` so a stale
//! timer callback cannot cut a later transition short.
//!
//! A CONFIRM item carries its deferred operation as data on the item
//! itself; `acknowledge` hands that action back to the caller to execute
//! — confirming runs it, OK/Cancel never do.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    /// Informational, one OK button.
    Ok,
    /// Asks for confirmation, Confirm/Cancel buttons.
    Confirm,
}

/// Deferred operation attached to a CONFIRM item, executed by the
/// command layer when the user confirms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ConfirmAction {
    /// Log the already-cached product for `barcode`.
    LogProduct { barcode: String, today: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub title: String,
    pub text: String,
    pub kind: FeedbackKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_confirm: Option<ConfirmAction>,
}

impl FeedbackItem {
    pub fn ok(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            kind: FeedbackKind::Ok,
            on_confirm: None,
        }
    }

    pub fn confirm(
        title: impl Into<String>,
        text: impl Into<String>,
        action: ConfirmAction,
    ) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            kind: FeedbackKind::Confirm,
            on_confirm: Some(action),
        }
    }
}

/// How the user dismissed the visible item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    Ok,
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Showing,
    Hiding,
}

/// Result of acknowledging the visible item: the confirm action to run
/// (if any) and the transition generation the host's timer must echo.
#[derive(Debug, Clone, PartialEq)]
pub struct AckOutcome {
    pub action: Option<ConfirmAction>,
    pub generation: u64,
}

/// Single-producer single-consumer FIFO of notifications, long-lived for
/// the session.
#[derive(Debug)]
pub struct FeedbackQueue {
    queue: VecDeque<FeedbackItem>,
    current: Option<FeedbackItem>,
    phase: Phase,
    generation: u64,
}

impl Default for FeedbackQueue {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            current: None,
            phase: Phase::Idle,
            generation: 0,
        }
    }
}

impl FeedbackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item; if nothing is showing or hiding, it becomes
    /// visible immediately and is returned for the host to display.
    pub fn enqueue(&mut self, item: FeedbackItem) -> Option<FeedbackItem> {
        self.queue.push_back(item);
        if self.phase == Phase::Idle {
            let next = self.queue.pop_front();
            self.current = next.clone();
            self.phase = Phase::Showing;
            return next;
        }
        None
    }

    /// Acknowledge the visible item. No-op unless an item is showing.
    ///
    /// Confirming a CONFIRM item yields its deferred action; OK and
    /// Cancel never do. The overlay enters its hide transition either
    /// way, and the returned generation must come back via [`advance`]
    /// when the transition window elapses.
    ///
    /// [`advance`]: FeedbackQueue::advance
    pub fn acknowledge(&mut self, ack: Ack) -> Option<AckOutcome> {
        if self.phase != Phase::Showing {
            return None;
        }
        let item = self.current.take()?;
        let action = match (ack, item.kind) {
            (Ack::Confirm, FeedbackKind::Confirm) => item.on_confirm,
            _ => None,
        };
        self.phase = Phase::Hiding;
        self.generation += 1;
        Some(AckOutcome {
            action,
            generation: self.generation,
        })
    }

    /// Transition-window timer callback. Ignores stale generations.
    /// Returns the next item to display, if any is queued.
    pub fn advance(&mut self, generation: u64) -> Option<FeedbackItem> {
        if self.phase != Phase::Hiding || generation != self.generation {
            return None;
        }
        self.phase = Phase::Idle;
        let next = self.queue.pop_front()?;
        self.current = Some(next.clone());
        self.phase = Phase::Showing;
        Some(next)
    }

    /// The item currently on screen, if the overlay is up.
    pub fn visible(&self) -> Option<&FeedbackItem> {
        match self.phase {
            Phase::Showing => self.current.as_ref(),
            _ => None,
        }
    }

    /// Items waiting behind the visible one.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}
