//! Render state tracking for the interactive preview.
//!
//! The menu is only repainted when something changed:
//!
//! | Trigger | Source |
//! |---------|--------|
//! | First frame | start-up |
//! | Cursor / submenu change | [`NavOutcome::needs_redraw`] |
//! | Popup shown | [`NavOutcome::Invoke`] |
//! | Popup expired | [`RenderState::tick`] |
//! | Tree edited | [`RenderState::mark_dirty`] |
//!
//! Time is passed in explicitly so expiry can be tested without sleeping.

use std::time::{Duration, Instant};

use menu_common::NavOutcome;

use crate::config::POPUP_DURATION;

/// "RUN <callback>" popup with its start time.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Popup {
    callback: String,
    started: Instant,
}

impl Popup {
    pub fn new(
        callback: impl Into<String>,
        started: Instant,
    ) -> Self {
        Self {
            callback: callback.into(),
            started,
        }
    }

    #[inline]
    pub fn callback(&self) -> &str { &self.callback }

    #[inline]
    pub fn is_expired_at(
        &self,
        now: Instant,
        duration: Duration,
    ) -> bool {
        now.saturating_duration_since(self.started) >= duration
    }
}

pub struct RenderState {
    popup: Option<Popup>,
    popup_duration: Duration,
    dirty: bool,
    first_frame: bool,
}

impl RenderState {
    pub const fn new() -> Self { Self::with_popup_duration(POPUP_DURATION) }

    pub const fn with_popup_duration(popup_duration: Duration) -> Self {
        Self {
            popup: None,
            popup_duration,
            dirty: false,
            first_frame: true,
        }
    }

    #[inline]
    pub const fn popup(&self) -> Option<&Popup> { self.popup.as_ref() }

    #[inline]
    pub const fn mark_dirty(&mut self) { self.dirty = true; }

    /// Fold a navigation result into the frame state.
    pub fn record(
        &mut self,
        outcome: &NavOutcome,
        now: Instant,
    ) {
        if let NavOutcome::Invoke { callback, .. } = outcome {
            self.popup = Some(Popup::new(callback.as_str(), now));
        } else if outcome.needs_redraw() {
            // Moving away dismisses the popup
            self.popup = None;
        }
        if outcome.needs_redraw() {
            self.dirty = true;
        }
    }

    /// Expire the popup. Call once per frame before drawing.
    pub fn tick(
        &mut self,
        now: Instant,
    ) {
        if self.popup.as_ref().is_some_and(|popup| popup.is_expired_at(now, self.popup_duration)) {
            self.popup = None;
            self.dirty = true;
        }
    }

    #[inline]
    pub const fn needs_redraw(&self) -> bool { self.dirty || self.first_frame }

    /// Call at end of frame to reset per-frame state.
    pub const fn end_frame(&mut self) {
        self.first_frame = false;
        self.dirty = false;
    }
}

impl Default for RenderState {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use menu_common::MenuTree;

    fn invoke(callback: &str) -> NavOutcome {
        NavOutcome::Invoke {
            node: MenuTree::new("Main").root(),
            callback: callback.into(),
        }
    }

    #[test]
    fn test_first_frame_draws_once() {
        let mut state = RenderState::new();
        assert!(state.needs_redraw());
        state.end_frame();
        assert!(!state.needs_redraw());
    }

    #[test]
    fn test_unchanged_outcome_skips_redraw() {
        let mut state = RenderState::new();
        state.end_frame();
        state.record(&NavOutcome::Unchanged, Instant::now());
        assert!(!state.needs_redraw());
        state.record(&NavOutcome::Moved, Instant::now());
        assert!(state.needs_redraw());
    }

    #[test]
    fn test_popup_expires_and_redraws() {
        let start = Instant::now();
        let mut state = RenderState::with_popup_duration(Duration::from_millis(100));
        state.record(&invoke("on_save"), start);
        assert_eq!(state.popup().map(Popup::callback), Some("on_save"));
        state.end_frame();

        state.tick(start + Duration::from_millis(50));
        assert!(state.popup().is_some());
        assert!(!state.needs_redraw());

        state.tick(start + Duration::from_millis(100));
        assert!(state.popup().is_none());
        assert!(state.needs_redraw());
    }

    #[test]
    fn test_navigation_dismisses_popup() {
        let now = Instant::now();
        let mut state = RenderState::new();
        state.record(&invoke("on_save"), now);
        state.record(&NavOutcome::Moved, now);
        assert!(state.popup().is_none());

        state.record(&invoke("on_save"), now);
        state.record(&NavOutcome::Unchanged, now);
        assert!(state.popup().is_some());
    }
}
