//! Selection state machine
//!
//! The controller is the only writer of [`state::SelectionState`]; results of
//! asynchronous work pass the [`guard::SyncGuard`] before they touch it.

pub mod controller;
pub mod guard;
pub mod state;

pub use controller::SelectionController;
pub use guard::{SelectionGeneration, SyncGuard};
pub use state::{SelectionPhase, SelectionState};
