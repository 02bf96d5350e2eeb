//! Interactive task board.
//!
//! A ratatui list over the client-held task view. Each key intent
//! dispatches one repository call; on success the matching reconciliation
//! rule patches the local view, on failure the view is left untouched and
//! the error lands in the status line.

mod app;
mod view;

pub use app::run;
