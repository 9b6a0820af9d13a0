//! Dedicated OS-thread gesture listener using `rdev::listen`.
//!
//! `rdev::listen` is a blocking call that must live on its own OS thread.
//! [`GestureListener`] owns that thread and a stop flag; dropping it sets the
//! flag so the callback silently ignores further events.
//!
//! `rdev::listen` has no graceful shutdown API.  The OS thread stays blocked
//! in the rdev event loop until the process exits.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use super::{DoubleClickDetector, Gesture};

/// Keys whose release may end a keyboard selection.
fn is_navigation_key(key: rdev::Key) -> bool {
    matches!(
        key,
        rdev::Key::ShiftLeft
            | rdev::Key::ShiftRight
            | rdev::Key::LeftArrow
            | rdev::Key::RightArrow
            | rdev::Key::UpArrow
            | rdev::Key::DownArrow
    )
}

/// Map one raw rdev event to a gesture, updating the double-click detector.
fn classify(event: &rdev::EventType, clicks: &mut DoubleClickDetector) -> Option<Gesture> {
    match event {
        rdev::EventType::ButtonPress(rdev::Button::Left) => clicks
            .press(Instant::now())
            .then_some(Gesture::DoubleClick),
        rdev::EventType::ButtonRelease(rdev::Button::Left) => Some(Gesture::PointerRelease),
        rdev::EventType::KeyRelease(key) if is_navigation_key(*key) => {
            Some(Gesture::NavigationKey)
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// GestureListener
// ---------------------------------------------------------------------------

/// Handle to a running gesture listener thread.  Drop it to stop forwarding.
pub struct GestureListener {
    stop: Arc<AtomicBool>,
    _thread: std::thread::JoinHandle<()>,
}

impl GestureListener {
    /// Spawn the listener thread, forwarding qualifying gestures on `tx`.
    ///
    /// Uses `try_send`: when the consumer lags, gestures are dropped rather
    /// than stalling the OS input hook.
    pub fn start(double_click: Duration, tx: mpsc::Sender<Gesture>) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_clone = Arc::clone(&stop);

        let thread = std::thread::Builder::new()
            .name("gesture-listener".into())
            .spawn(move || {
                let mut clicks = DoubleClickDetector::new(double_click);
                let result = rdev::listen(move |event| {
                    if stop_clone.load(Ordering::Relaxed) {
                        return;
                    }
                    if let Some(gesture) = classify(&event.event_type, &mut clicks) {
                        let _ = tx.try_send(gesture);
                    }
                });

                if let Err(e) = result {
                    log::error!("gesture-listener: rdev::listen exited with error: {:?}", e);
                }
            })?;

        Ok(Self {
            stop,
            _thread: thread,
        })
    }
}

impl Drop for GestureListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
