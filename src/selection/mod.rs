//! Text-selection capture and propagation.
//!
//! ```text
//! Gesture (mpsc) ──▶ SelectionCapture::run
//!                      │  settle delay, read SelectionSource, trim, dedup
//!                      ▼
//!                 SelectionStore  (single slot, last write wins, watch channel)
//!                      │  change notification
//!                      ▼
//!                 SelectionSync  ──▶ InputField in SharedState
//! ```
//!
//! The capture side and the consuming UI never talk directly; the store is
//! the only thing they share, and it keeps no history.

pub mod capture;
pub mod store;
pub mod sync;

#[cfg(feature = "desktop")]
pub mod clipboard;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use capture::SelectionCapture;
pub use store::{SelectionRecord, SelectionStore};
pub use sync::SelectionSync;

#[cfg(feature = "desktop")]
pub use clipboard::PrimarySelection;

// ---------------------------------------------------------------------------
// SelectionSource
// ---------------------------------------------------------------------------

/// Reads whatever text the user currently has selected on the host.
///
/// Implementations may block briefly (clipboard round-trips), so
/// [`SelectionCapture`] calls them from `spawn_blocking`.
pub trait SelectionSource: Send + Sync {
    /// The raw current selection, or `None` when nothing is selected or the
    /// host cannot be queried.
    fn read_selection(&self) -> Option<String>;
}
