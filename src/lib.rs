//! Voice translator: select, type or speak text, get it translated by a
//! remote service, optionally hear the result.
//!
//! The library holds everything the two front-ends share; see
//! [`pipeline`] for the orchestrator and [`selection`] for selection capture.

#[cfg(feature = "gui")]
pub mod app;
pub mod audio;
pub mod config;
pub mod direction;
pub mod gesture;
pub mod pipeline;
pub mod selection;
pub mod speech;
pub mod translate;
