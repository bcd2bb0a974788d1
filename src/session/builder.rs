//! Builder for constructing sessions.

use crate::core::StateHistory;
use crate::normalize::normalize_word;
use crate::session::error::SessionError;
use crate::session::{HintPolicy, Mode, Phase, Session, MAX_HINTS, MIN_WORD_LEN};
use tracing::debug;

/// Default mistake limit when none is given (the classic six-part gallows).
pub const DEFAULT_MISTAKE_LIMIT: u32 = 6;

/// Fluent builder for [`Session`].
///
/// # Example
///
/// ```
/// use hangman::session::{HintPolicy, Mode, SessionBuilder};
///
/// let session = SessionBuilder::new()
///     .word("Murciélago")
///     .mode(Mode::Random)
///     .hints(["Flies at night", "Sleeps upside down"])
///     .hint_policy(HintPolicy::Cost(15))
///     .mistake_limit(8)
///     .build()
///     .unwrap();
///
/// assert_eq!(session.secret(), "MURCIELAGO");
/// assert_eq!(session.hints_available(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    word: Option<String>,
    mode: Mode,
    hints: Vec<String>,
    mistake_limit: u32,
    hint_policy: Option<HintPolicy>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            word: None,
            mode: Mode::Random,
            hints: Vec::new(),
            mistake_limit: DEFAULT_MISTAKE_LIMIT,
            hint_policy: None,
        }
    }

    /// Set the raw secret word (required). Normalized on build.
    pub fn word(mut self, raw: impl Into<String>) -> Self {
        self.word = Some(raw.into());
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set hint texts. Blank hints are dropped and at most three are kept.
    pub fn hints<I, H>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: Into<String>,
    {
        self.hints = hints.into_iter().map(Into::into).collect();
        self
    }

    pub fn mistake_limit(mut self, limit: u32) -> Self {
        self.mistake_limit = limit;
        self
    }

    /// Set how hints are paid for. Random sessions default to
    /// [`HintPolicy::Free`]; friend sessions always use
    /// [`HintPolicy::Disabled`].
    pub fn hint_policy(mut self, policy: HintPolicy) -> Self {
        self.hint_policy = Some(policy);
        self
    }

    /// Build the session in the `InProgress` phase.
    pub fn build(self) -> Result<Session, SessionError> {
        let raw = self.word.ok_or(SessionError::MissingWord)?;
        let secret = normalize_word(&raw);

        if secret.len() < MIN_WORD_LEN {
            return Err(SessionError::InvalidWord { normalized: secret });
        }
        if self.mistake_limit == 0 {
            return Err(SessionError::InvalidMistakeLimit);
        }

        let (hint_policy, hints) = match self.mode {
            Mode::Friend => (HintPolicy::Disabled, Vec::new()),
            Mode::Random => {
                let hints: Vec<String> = self
                    .hints
                    .into_iter()
                    .map(|hint| hint.trim().to_string())
                    .filter(|hint| !hint.is_empty())
                    .take(MAX_HINTS)
                    .collect();
                (self.hint_policy.unwrap_or(HintPolicy::Free), hints)
            }
        };

        debug!(
            mode = %self.mode,
            letters = secret.len(),
            mistake_limit = self.mistake_limit,
            hints = hints.len(),
            "session created"
        );

        Ok(Session {
            revealed: vec![None; secret.len()],
            secret,
            used_letters: Vec::new(),
            mistakes: 0,
            mistake_limit: self.mistake_limit,
            mode: self.mode,
            hint_policy,
            hints,
            hints_used: Vec::new(),
            phase: Phase::InProgress,
            history: StateHistory::new(),
            turns: 0,
        })
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
