//! Selection capture: turn gestures into deduplicated store publishes.
//!
//! Each qualifying gesture waits for the settle delay, samples the host
//! selection, trims it, and publishes it only when it is non-empty and
//! differs from the last value this capture published.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::store::{SelectionRecord, SelectionStore};
use super::SelectionSource;
use crate::gesture::Gesture;

/// Publishes the host's current selection to a [`SelectionStore`].
pub struct SelectionCapture {
    source: Arc<dyn SelectionSource>,
    store: SelectionStore,
    settle: Duration,
    last_published: Option<String>,
}

impl SelectionCapture {
    pub fn new(source: Arc<dyn SelectionSource>, store: SelectionStore, settle: Duration) -> Self {
        Self {
            source,
            store,
            settle,
            last_published: None,
        }
    }

    /// Consume gestures until the channel closes.
    pub async fn run(mut self, mut gestures: mpsc::Receiver<Gesture>) {
        while let Some(gesture) = gestures.recv().await {
            log::trace!("selection: {gesture:?}");
            if !self.settle.is_zero() {
                tokio::time::sleep(self.settle).await;
            }
            self.on_qualifying_gesture().await;
        }
        log::info!("selection: gesture channel closed, capture shutting down");
    }

    /// Sample the selection now and publish it if it qualifies.
    ///
    /// Returns `true` when a record was published.
    pub async fn on_qualifying_gesture(&mut self) -> bool {
        let source = Arc::clone(&self.source);
        let raw = match tokio::task::spawn_blocking(move || source.read_selection()).await {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("selection: read task failed: {e}");
                None
            }
        };
        self.accept(raw.as_deref())
    }

    /// Apply the trim / non-empty / distinct rules to a sampled selection.
    pub fn accept(&mut self, raw: Option<&str>) -> bool {
        let Some(record) = raw.and_then(SelectionRecord::new) else {
            return false;
        };
        if self.last_published.as_deref() == Some(record.text()) {
            return false;
        }
        self.last_published = Some(record.text().to_string());
        self.store.publish(record);
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
