//! Guard predicates for gating moves.
//!
//! A guard is a pure boolean function over some subject (usually a
//! [`Session`](crate::session::Session)). Sessions use guards to decide
//! whether a guess or a hint request may proceed before mutating anything.

use std::fmt;

/// Pure predicate that decides whether a move can run.
///
/// # Example
///
/// ```rust
/// use hangman::core::Guard;
/// use hangman::session::{Mode, Session};
///
/// let in_play = Guard::named("in play", |s: &Session| !s.is_over());
/// let session = Session::new("sol", Mode::Friend, Vec::<String>::new(), 6).unwrap();
///
/// assert!(in_play.check(&session));
/// assert_eq!(in_play.name(), "in play");
/// ```
pub struct Guard<T: ?Sized> {
    name: &'static str,
    predicate: Box<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T: ?Sized> Guard<T> {
    /// Create a guard with a name that shows up in logs.
    pub fn named<F>(name: &'static str, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Guard {
            name,
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the predicate.
    pub fn check(&self, subject: &T) -> bool {
        (self.predicate)(subject)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: ?Sized> fmt::Debug for Guard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").field("name", &self.name).finish()
    }
}
