//! State trait shared by every phase enum in the crate.
//!
//! A state is a small value describing where a game stands. All methods are
//! pure so a renderer, the score ledger and the checkpoint code can inspect a
//! state without touching the session that owns it.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for game phases.
///
/// # Required Traits
///
/// - `Clone` + `PartialEq`: phases are recorded and compared in history
/// - `Debug`: for diagnostics and tracing fields
/// - `Serialize` + `Deserialize`: phases travel inside checkpoints
///
/// # Example
///
/// ```rust
/// use hangman::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Round {
///     Guessing,
///     Solved,
///     Hanged,
/// }
///
/// impl State for Round {
///     fn name(&self) -> &str {
///         match self {
///             Self::Guessing => "Guessing",
///             Self::Solved => "Solved",
///             Self::Hanged => "Hanged",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Solved | Self::Hanged)
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Hanged)
///     }
/// }
///
/// assert!(Round::Hanged.is_final());
/// assert!(!Round::Solved.is_error());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Name used for display and log fields.
    fn name(&self) -> &str;

    /// Whether the phase is terminal. No further moves are accepted once a
    /// terminal phase is reached.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Whether the phase is a losing outcome.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}
