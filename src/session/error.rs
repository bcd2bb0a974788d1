//! Session errors.

use thiserror::Error;

/// Errors raised by session creation and hint purchases.
///
/// None of these change session state; the caller re-prompts or shows a
/// message and carries on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Word must contain at least 2 letters A-Z after normalization (got {normalized:?})")]
    InvalidWord { normalized: String },

    #[error("Mistake limit must be at least 1")]
    InvalidMistakeLimit,

    #[error("Secret word not specified. Call .word(raw) before .build()")]
    MissingWord,

    #[error("Not enough points for a hint: costs {cost}, balance is {balance}")]
    InsufficientFunds { cost: u32, balance: u32 },
}
