//! Hangman: a pure word-guessing game core.
//!
//! The crate follows a "pure core, imperative shell" layout. A [`Session`]
//! is a plain value that accepts guesses and hint requests and reports what
//! changed as a [`Step`]. It never touches storage or the screen. The
//! [`Game`] host owns the live session, the word bank and the persistent
//! score ledger, and is the only place side effects happen.
//!
//! # Core Concepts
//!
//! - **Session**: secret word, reveal mask, used letters, mistakes, hints
//! - **Phase**: `InProgress` moving to the terminal `Won` or `Lost`
//! - **Step**: description of a single transition, for any renderer
//! - **Settlement**: score/streak update applied once per finished game
//!
//! # Example
//!
//! ```rust
//! use hangman::session::{Event, Mode, Phase, Session};
//!
//! let mut session = Session::new("Gato", Mode::Friend, Vec::<String>::new(), 6).unwrap();
//!
//! let step = session.guess("g");
//! assert!(matches!(step.event, Event::Revealed { letter: 'G', .. }));
//! assert_eq!(session.masked(), "G _ _ _");
//!
//! for letter in ["a", "t", "o"] {
//!     session.guess(letter);
//! }
//! assert_eq!(session.phase(), Phase::Won);
//! ```

pub mod checkpoint;
pub mod config;
pub mod core;
pub mod difficulty;
pub mod game;
pub mod normalize;
pub mod scoring;
pub mod session;
pub mod store;
pub mod theme;
pub mod words;

// Re-export commonly used types
pub use crate::core::{Guard, State, StateHistory, StateTransition};
pub use game::{Game, GameError, Observer};
pub use session::{Event, Mode, Phase, Session, SessionError, Step};
