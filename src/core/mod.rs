//! Core state machine vocabulary.
//!
//! This module contains the pure building blocks every game session uses:
//! - Phase definitions via the `State` trait and the `state_enum!` macro
//! - Guard predicates for move control
//! - Immutable phase history
//!
//! Nothing in here performs I/O.

mod guard;
mod history;
mod macros;
mod state;

pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use state::State;
