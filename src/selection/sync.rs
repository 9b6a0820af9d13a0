//! Selection sync: load published selections into the input field.
//!
//! Runs once at startup (a value may have been published before the
//! subscriber existed) and then on every store change.  Each front-end owns
//! its own sync and its own input field.

use tokio::sync::watch;

use super::store::{SelectionRecord, SelectionStore};
use crate::pipeline::SharedState;

/// Subscriber that mirrors the selection store into an input field.
pub struct SelectionSync {
    rx: watch::Receiver<Option<SelectionRecord>>,
    primed: bool,
}

impl SelectionSync {
    pub fn new(store: &SelectionStore) -> Self {
        Self {
            rx: store.subscribe(),
            primed: false,
        }
    }

    /// Non-blocking check for a selection the caller has not seen yet.
    ///
    /// The first call returns the value already in the store, if any.
    /// Suited to frame-driven UIs that poll.
    pub fn poll(&mut self) -> Option<SelectionRecord> {
        if !self.primed {
            self.primed = true;
            return self.rx.borrow_and_update().clone();
        }
        match self.rx.has_changed() {
            Ok(true) => self.rx.borrow_and_update().clone(),
            _ => None,
        }
    }

    /// Apply any pending selection to `state`.  Returns `true` if the input
    /// field was overwritten.
    pub fn sync_into(&mut self, state: &SharedState) -> bool {
        match self.poll() {
            Some(record) => {
                apply(state, &record);
                true
            }
            None => false,
        }
    }

    /// Mirror the store into `state` until the store is dropped.
    pub async fn run(mut self, state: SharedState) {
        self.sync_into(&state);
        while self.rx.changed().await.is_ok() {
            let latest = self.rx.borrow_and_update().clone();
            if let Some(record) = latest {
                apply(&state, &record);
            }
        }
        log::info!("selection: store closed, sync shutting down");
    }
}

fn apply(state: &SharedState, record: &SelectionRecord) {
    let mut st = state.lock();
    st.input.set_text(record.text());
    log::debug!(
        "selection: input field updated ({})",
        st.input.char_count_label()
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::pipeline::new_shared_state;

    fn record(text: &str) -> SelectionRecord {
        SelectionRecord::new(text).unwrap()
    }

    #[test]
    fn first_poll_catches_value_published_before_subscribing() {
        let store = SelectionStore::new();
        store.publish(record("early"));

        let mut sync = SelectionSync::new(&store);
        assert_eq!(sync.poll().unwrap().text(), "early");
        assert!(sync.poll().is_none());
    }

    #[test]
    fn first_poll_on_empty_store_is_none() {
        let store = SelectionStore::new();
        let mut sync = SelectionSync::new(&store);
        assert!(sync.poll().is_none());
    }

    #[test]
    fn later_publishes_are_picked_up_once() {
        let store = SelectionStore::new();
        let mut sync = SelectionSync::new(&store);
        assert!(sync.poll().is_none());

        store.publish(record("one"));
        store.publish(record("two"));
        assert_eq!(sync.poll().unwrap().text(), "two");
        assert!(sync.poll().is_none());
    }

    #[test]
    fn sync_into_overwrites_input_and_recomputes_counters() {
        let config = AppConfig::default();
        let state = new_shared_state(&config);
        state.lock().input.set_text("typed by hand");

        let store = SelectionStore::new();
        let mut sync = SelectionSync::new(&store);
        store.publish(record("Hello world"));

        assert!(sync.sync_into(&state));
        let st = state.lock();
        assert_eq!(st.input.text(), "Hello world");
        assert_eq!(st.input.char_count_label(), "11/500");
        assert!(st.input.show_clear());
    }

    #[tokio::test]
    async fn run_applies_startup_value_and_changes() {
        let config = AppConfig::default();
        let state = new_shared_state(&config);
        let store = SelectionStore::new();
        store.publish(record("before"));

        let sync = SelectionSync::new(&store);
        let handle = tokio::spawn(sync.run(state.clone()));

        for _ in 0..100 {
            if state.lock().input.text() == "before" {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(state.lock().input.text(), "before");

        store.publish(record("after"));
        for _ in 0..100 {
            if state.lock().input.text() == "after" {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(state.lock().input.text(), "after");

        drop(store);
        handle.await.unwrap();
    }
}
