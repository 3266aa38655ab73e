//! Debounced persistence — a cancellable scheduled task.
//!
//! Every mutation that should be persisted calls [`SaveScheduler::schedule`],
//! which supersedes any pending save by bumping the generation and asking
//! the host to arm a fresh timer. When a timer fires, the host echoes its
//! generation back; only the newest one still counts, so a burst of
//! mutations inside the debounce window collapses into a single
//! persistence request carrying the full session state.
//!
//! A failed persistence is logged and dropped: no retry, no user-facing
//! notice. At most one debounce window of progress is at risk.

/// Arm/fire/cancel bookkeeping for the debounced save.
#[derive(Debug, Default)]
pub struct SaveScheduler {
    generation: u64,
    armed: bool,
}

impl SaveScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersede any pending save and arm a new one. Returns the
    /// generation the host's timer must echo on fire.
    pub fn schedule(&mut self) -> u64 {
        self.generation += 1;
        self.armed = true;
        self.generation
    }

    /// Timer callback. True exactly when this fire is the newest armed
    /// one — the caller should then emit one persistence request.
    pub fn fire(&mut self, generation: u64) -> bool {
        if self.armed && generation == self.generation {
            self.armed = false;
            return true;
        }
        false
    }

    /// Drop any pending save (logout). Bumps the generation so a timer
    /// already in flight can never fire against the next session.
    pub fn cancel(&mut self) {
        self.armed = false;
        self.generation += 1;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_last_schedule_in_window_fires() {
        let mut saves = SaveScheduler::new();
        let g1 = saves.schedule();
        let g2 = saves.schedule();
        let g3 = saves.schedule();
        assert!(!saves.fire(g1));
        assert!(!saves.fire(g2));
        assert!(saves.fire(g3));
    }

    #[test]
    fn fire_disarms() {
        let mut saves = SaveScheduler::new();
        let g = saves.schedule();
        assert!(saves.fire(g));
        // Same timer firing twice must not persist twice.
        assert!(!saves.fire(g));
        assert!(!saves.is_armed());
    }

    #[test]
    fn cancel_invalidates_pending_fire() {
        let mut saves = SaveScheduler::new();
        let g = saves.schedule();
        saves.cancel();
        assert!(!saves.fire(g));
    }

    #[test]
    fn schedule_after_cancel_uses_fresh_generation() {
        let mut saves = SaveScheduler::new();
        let stale = saves.schedule();
        saves.cancel();
        let fresh = saves.schedule();
        assert_ne!(stale, fresh);
        assert!(!saves.fire(stale));
        assert!(saves.fire(fresh));
    }
}
