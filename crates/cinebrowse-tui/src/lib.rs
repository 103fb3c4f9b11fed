//! Browsing state machines and terminal UI for cinebrowse.
//!
//! Every component is driven by explicit `Instant` values and emits
//! [`dispatch::Request`] values instead of performing I/O itself.

/// Top-level screen state machine.
pub mod app;
/// Banner carousel.
pub mod carousel;
/// Shared image base and banner list.
pub mod context;
/// Details aggregator and trailer modal.
pub mod details;
/// Request execution and delivery.
pub mod dispatch;
/// Display formatting helpers.
pub mod format;
/// Request generation tokens.
pub mod generation;
/// Home screen rows.
pub mod home;
/// Category listing loader.
pub mod listing;
/// Three-state fetch wrapper.
pub mod loadable;
/// Generic paged query.
pub mod paging;
/// Route parsing.
pub mod route;
/// Terminal event loop.
pub mod runner;
/// Debounced search controller.
pub mod search;
/// Scroll cursor and end-of-list sentinel.
pub mod sentinel;
/// Cancellable scheduled tasks.
pub mod timer;
mod ui;

pub use app::{App, AppSettings};
pub use runner::run_browser;
