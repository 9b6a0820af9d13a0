//! Single-slot shared store for the latest captured selection.
//!
//! Backed by a `tokio::sync::watch` channel: one retained value, overwritten
//! by every publish, with change notification to any number of subscribers.
//! Writers are not coordinated beyond last-write-wins.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::watch;

// ---------------------------------------------------------------------------
// SelectionRecord
// ---------------------------------------------------------------------------

/// One captured selection.  Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRecord {
    text: String,
    captured_at: SystemTime,
}

impl SelectionRecord {
    /// Build a record from raw selection text.
    ///
    /// Returns `None` when the trimmed text is empty.
    pub fn new(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            captured_at: SystemTime::now(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn captured_at(&self) -> SystemTime {
        self.captured_at
    }
}

// ---------------------------------------------------------------------------
// SelectionStore
// ---------------------------------------------------------------------------

/// Cheap-to-clone handle to the shared selection slot.
#[derive(Clone)]
pub struct SelectionStore {
    tx: Arc<watch::Sender<Option<SelectionRecord>>>,
    writes: Arc<AtomicU64>,
}

impl SelectionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            tx: Arc::new(tx),
            writes: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Overwrite the slot and notify subscribers.
    pub fn publish(&self, record: SelectionRecord) {
        log::debug!("selection: publish ({} chars)", record.text().chars().count());
        self.tx.send_replace(Some(record));
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    /// The retained value, if anything was ever published.
    pub fn latest(&self) -> Option<SelectionRecord> {
        self.tx.borrow().clone()
    }

    /// Subscribe to change notifications.
    ///
    /// The value present at subscription time counts as already seen; use
    /// [`latest`](Self::latest) (or [`SelectionSync`](super::SelectionSync))
    /// to pick it up.
    pub fn subscribe(&self) -> watch::Receiver<Option<SelectionRecord>> {
        self.tx.subscribe()
    }

    /// Number of publishes since creation.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_trims_and_rejects_blank() {
        assert!(SelectionRecord::new("   \n\t").is_none());
        let rec = SelectionRecord::new("  Hello world \n").unwrap();
        assert_eq!(rec.text(), "Hello world");
    }

    #[test]
    fn latest_is_last_write() {
        let store = SelectionStore::new();
        assert!(store.latest().is_none());

        store.publish(SelectionRecord::new("first").unwrap());
        store.publish(SelectionRecord::new("second").unwrap());

        assert_eq!(store.latest().unwrap().text(), "second");
        assert_eq!(store.writes(), 2);
    }

    #[tokio::test]
    async fn subscriber_is_notified_on_publish() {
        let store = SelectionStore::new();
        let mut rx = store.subscribe();

        store.publish(SelectionRecord::new("Hello").unwrap());

        rx.changed().await.unwrap();
        let value = rx.borrow_and_update().clone();
        assert_eq!(value.unwrap().text(), "Hello");
    }

    #[test]
    fn clones_share_the_slot() {
        let store = SelectionStore::new();
        let other = store.clone();
        other.publish(SelectionRecord::new("shared").unwrap());
        assert_eq!(store.latest().unwrap().text(), "shared");
        assert_eq!(store.writes(), 1);
    }
}
