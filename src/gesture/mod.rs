//! User gestures that may have changed the text selection.
//!
//! Selection ranges settle asynchronously after the input event, so a
//! gesture is only a hint to sample the selection a little later; see
//! [`SelectionCapture`](crate::selection::SelectionCapture).
//!
//! With the `desktop` feature, [`GestureListener`] observes these gestures
//! globally through `rdev` on a dedicated OS thread.

use std::time::{Duration, Instant};

#[cfg(feature = "desktop")]
pub mod listener;

#[cfg(feature = "desktop")]
pub use listener::GestureListener;

// ---------------------------------------------------------------------------
// Gesture
// ---------------------------------------------------------------------------

/// A qualifying selection gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Primary pointer button released (end of a drag-select).
    PointerRelease,
    /// Shift or an arrow key released (keyboard selection).
    NavigationKey,
    /// Double click (word selection).
    DoubleClick,
}

// ---------------------------------------------------------------------------
// DoubleClickDetector
// ---------------------------------------------------------------------------

/// Recognises two primary-button presses within `window` as a double click.
#[derive(Debug, Clone)]
pub struct DoubleClickDetector {
    window: Duration,
    last_press: Option<Instant>,
}

impl DoubleClickDetector {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_press: None,
        }
    }

    /// Record a press at `at`; returns `true` when it completes a double click.
    ///
    /// A completed double click resets the detector, so a third quick press
    /// starts a new pair.
    pub fn press(&mut self, at: Instant) -> bool {
        match self.last_press {
            Some(prev) if at.saturating_duration_since(prev) <= self.window => {
                self.last_press = None;
                true
            }
            _ => {
                self.last_press = Some(at);
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_quick_presses_are_a_double_click() {
        let mut det = DoubleClickDetector::new(Duration::from_millis(400));
        let t0 = Instant::now();
        assert!(!det.press(t0));
        assert!(det.press(t0 + Duration::from_millis(150)));
    }

    #[test]
    fn slow_presses_are_not() {
        let mut det = DoubleClickDetector::new(Duration::from_millis(400));
        let t0 = Instant::now();
        assert!(!det.press(t0));
        assert!(!det.press(t0 + Duration::from_millis(900)));
        // ...but the second press starts a new window.
        assert!(det.press(t0 + Duration::from_millis(1000)));
    }

    #[test]
    fn third_press_starts_a_new_pair() {
        let mut det = DoubleClickDetector::new(Duration::from_millis(400));
        let t0 = Instant::now();
        det.press(t0);
        assert!(det.press(t0 + Duration::from_millis(100)));
        assert!(!det.press(t0 + Duration::from_millis(200)));
    }
}
