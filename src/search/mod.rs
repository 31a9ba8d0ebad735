//! Incremental search: a debounced, cancelable query pipeline.
//!
//! [`state::SearchState`] is the synchronous state machine; every query change
//! re-arms a single debounce timer, and every fired timer mints a new
//! [`state::RequestToken`]. Only the response carrying the active token may
//! replace the results, so the last query wins even when responses arrive out
//! of order. [`controller::SearchController`] runs the machine inside a tokio
//! task and performs its timer and network effects.

pub mod controller;
pub mod state;

#[cfg(test)]
mod tests;

pub use controller::{SearchController, SearchHandle, SearchSettings, SearchSnapshot};
pub use state::{Effect, Outcome, Phase, RequestToken, SearchState, TimerHandle};
