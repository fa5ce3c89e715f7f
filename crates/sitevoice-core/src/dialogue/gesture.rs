//! One-shot gesture subscription bookkeeping.
//!
//! When autoplay policy blocks the page-load greeting, the widget
//! registers listeners for the first click, scroll, or keydown anywhere
//! on the host page. The first gesture retries the greeting exactly once;
//! all listeners are then removed. This type owns the register ->
//! fire-once -> auto-unsubscribe discipline so the orchestrator never
//! tracks raw listener state.

/// Tracks the armed/used lifecycle of the autoplay-retry gesture hook.
#[derive(Debug, Default, Clone, Copy)]
pub struct OneShotGesture {
    armed: bool,
    used: bool,
}

impl OneShotGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the hook. No-op once the single retry has been consumed.
    pub fn arm(&mut self) {
        if !self.used {
            self.armed = true;
        }
    }

    /// Disarm without consuming the retry.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Consume the gesture. Returns true exactly once: the first fire
    /// while armed. Every later call returns false.
    pub fn fire(&mut self) -> bool {
        if self.armed && !self.used {
            self.armed = false;
            self.used = true;
            true
        } else {
            self.armed = false;
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}
