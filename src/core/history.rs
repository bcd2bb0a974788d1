//! Phase transition history.
//!
//! A session records every phase change it goes through. For a hangman game
//! that is at most one entry (`InProgress` to `Won` or `Lost`), but the type
//! is generic so any [`State`] can be tracked.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of a single phase change.
///
/// # Example
///
/// ```rust
/// use hangman::core::StateTransition;
/// use hangman::session::Phase;
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: Phase::InProgress,
///     to: Phase::Won,
///     timestamp: Utc::now(),
///     turn: 4,
/// };
/// assert_eq!(transition.turn, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// Phase being left
    pub from: S,
    /// Phase being entered
    pub to: S,
    /// When the change happened
    pub timestamp: DateTime<Utc>,
    /// Number of accepted guesses when the change happened
    pub turn: usize,
}

/// Ordered, append-only history of phase changes.
///
/// `record` returns a new history and leaves the original untouched.
///
/// # Example
///
/// ```rust
/// use hangman::core::{StateHistory, StateTransition};
/// use hangman::session::Phase;
/// use chrono::Utc;
///
/// let history = StateHistory::new();
/// let history = history.record(StateTransition {
///     from: Phase::InProgress,
///     to: Phase::Lost,
///     timestamp: Utc::now(),
///     turn: 6,
/// });
///
/// assert_eq!(history.last().map(|t| t.to), Some(Phase::Lost));
/// assert_eq!(history.last().map(|t| t.turn), Some(6));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.last()
    }

    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
