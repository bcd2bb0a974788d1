//! The game session state machine.
//!
//! A [`Session`] owns one secret word and everything that happens to it:
//! the reveal mask, used letters, mistakes and purchased hints. Every
//! operation returns a [`Step`] describing what changed so any renderer can
//! redraw from it. Sessions never perform I/O; paying for hints and updating
//! the score ledger is the host's job.

mod builder;
mod error;

pub use builder::{SessionBuilder, DEFAULT_MISTAKE_LIMIT};
pub use error::SessionError;

use crate::core::{Guard, State, StateHistory, StateTransition};
use crate::normalize::normalize_letter;
use crate::state_enum;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Shortest secret a session accepts.
pub const MIN_WORD_LEN: usize = 2;

/// Most hints a word can carry.
pub const MAX_HINTS: usize = 3;

state_enum! {
    /// Where a session stands.
    pub enum Phase {
        InProgress,
        Won,
        Lost,
    }
    final: [Won, Lost]
    error: [Lost]
}

/// How the secret was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Picked from the word bank; hints allowed.
    Random,
    /// Typed in by another player; no hints.
    Friend,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Random => f.write_str("random"),
            Mode::Friend => f.write_str("friend"),
        }
    }
}

/// How hints are paid for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintPolicy {
    Disabled,
    Free,
    /// Each hint costs this many points from the score ledger.
    Cost(u32),
}

impl HintPolicy {
    /// Points charged per hint.
    pub fn cost(&self) -> u32 {
        match self {
            HintPolicy::Cost(cost) => *cost,
            HintPolicy::Disabled | HintPolicy::Free => 0,
        }
    }
}

/// Why a call left the session untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ignored {
    /// Input did not normalize to exactly one letter.
    NotALetter,
    AlreadyUsed,
    GameOver,
    HintsDisabled,
    HintsExhausted,
}

/// What a single call did to the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Ignored(Ignored),
    /// Letter is in the secret; `positions` are every slot it filled.
    Revealed { letter: char, positions: Vec<usize> },
    /// Letter is not in the secret.
    Missed { letter: char, mistakes: u32 },
    /// Hint number `index` was revealed; the host owes `cost` points.
    HintRevealed {
        index: usize,
        text: String,
        cost: u32,
    },
}

/// Result of one session operation.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub event: Event,
    /// Set when this call ended the game.
    pub transition: Option<StateTransition<Phase>>,
}

impl Step {
    fn ignored(reason: Ignored) -> Self {
        Step {
            event: Event::Ignored(reason),
            transition: None,
        }
    }

    /// Whether the call changed any state.
    pub fn changed(&self) -> bool {
        !matches!(self.event, Event::Ignored(_))
    }

    /// Terminal phase reached by this call, if any.
    pub fn outcome(&self) -> Option<Phase> {
        self.transition.as_ref().map(|t| t.to)
    }
}

/// Read-only view of a session for renderers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: Mode,
    pub phase: Phase,
    /// Word with unknown letters as `_`, separated by spaces.
    pub masked: String,
    pub slots: Vec<Option<char>>,
    pub used_letters: Vec<char>,
    pub mistakes: u32,
    pub mistake_limit: u32,
    pub revealed_hints: Vec<String>,
    pub hints_remaining: usize,
    pub hint_cost: u32,
    /// The secret, only once the game is over.
    pub secret: Option<String>,
}

/// A single game of hangman.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub(crate) secret: String,
    pub(crate) revealed: Vec<Option<char>>,
    pub(crate) used_letters: Vec<char>,
    pub(crate) mistakes: u32,
    pub(crate) mistake_limit: u32,
    pub(crate) mode: Mode,
    pub(crate) hint_policy: HintPolicy,
    pub(crate) hints: Vec<String>,
    pub(crate) hints_used: Vec<usize>,
    pub(crate) phase: Phase,
    pub(crate) history: StateHistory<Phase>,
    pub(crate) turns: usize,
}

fn in_play() -> Guard<Session> {
    Guard::named("in play", |s: &Session| !s.phase.is_final())
}

fn hints_enabled() -> Guard<Session> {
    Guard::named("hints enabled", |s: &Session| {
        s.hint_policy != HintPolicy::Disabled
    })
}

fn hints_left() -> Guard<Session> {
    Guard::named("hints left", |s: &Session| {
        s.hints_used.len() < s.hints_available()
    })
}

impl Session {
    /// Create a session; see [`SessionBuilder`] for the full set of options.
    pub fn new<I, H>(
        raw: &str,
        mode: Mode,
        hints: I,
        mistake_limit: u32,
    ) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = H>,
        H: Into<String>,
    {
        SessionBuilder::new()
            .word(raw)
            .mode(mode)
            .hints(hints)
            .mistake_limit(mistake_limit)
            .build()
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Guess a letter from raw input such as a key name or a typed string.
    ///
    /// Input that does not normalize to exactly one letter is ignored, as are
    /// repeats and guesses after the game ended.
    pub fn guess(&mut self, raw: &str) -> Step {
        match normalize_letter(raw) {
            Some(letter) => self.guess_char(letter),
            None => Step::ignored(Ignored::NotALetter),
        }
    }

    /// Guess a single character.
    pub fn guess_char(&mut self, letter: char) -> Step {
        let letter = letter.to_ascii_uppercase();
        if !letter.is_ascii_uppercase() {
            return Step::ignored(Ignored::NotALetter);
        }
        if !in_play().check(self) {
            return Step::ignored(Ignored::GameOver);
        }
        if self.used_letters.contains(&letter) {
            return Step::ignored(Ignored::AlreadyUsed);
        }

        self.used_letters.push(letter);
        self.turns += 1;

        let positions: Vec<usize> = self
            .secret
            .char_indices()
            .filter(|(_, c)| *c == letter)
            .map(|(i, _)| i)
            .collect();

        let event = if positions.is_empty() {
            self.mistakes += 1;
            Event::Missed {
                letter,
                mistakes: self.mistakes,
            }
        } else {
            for &i in &positions {
                self.revealed[i] = Some(letter);
            }
            Event::Revealed { letter, positions }
        };

        debug!(%letter, turn = self.turns, mistakes = self.mistakes, "guess accepted");

        Step {
            event,
            transition: self.resolve(),
        }
    }

    /// Reveal the next hint.
    ///
    /// `balance` is the player's current score. Calls that cannot reveal
    /// anything (hints disabled, none left, game over) are ignored. With a
    /// cost-gated policy, a balance below the cost fails with
    /// [`SessionError::InsufficientFunds`] and nothing changes. On success
    /// the returned event carries the cost the caller must debit.
    pub fn request_hint(&mut self, balance: u32) -> Result<Step, SessionError> {
        if !hints_enabled().check(self) {
            return Ok(Step::ignored(Ignored::HintsDisabled));
        }
        if !hints_left().check(self) {
            return Ok(Step::ignored(Ignored::HintsExhausted));
        }
        if !in_play().check(self) {
            return Ok(Step::ignored(Ignored::GameOver));
        }

        let cost = self.hint_policy.cost();
        if balance < cost {
            return Err(SessionError::InsufficientFunds { cost, balance });
        }

        let index = self.hints_used.len();
        self.hints_used.push(index);
        debug!(index, cost, "hint revealed");

        Ok(Step {
            event: Event::HintRevealed {
                index,
                text: self.hints[index].clone(),
                cost,
            },
            transition: None,
        })
    }

    // Won is checked before Lost.
    fn resolve(&mut self) -> Option<StateTransition<Phase>> {
        let next = if self.is_solved() {
            Phase::Won
        } else if self.mistakes >= self.mistake_limit {
            Phase::Lost
        } else {
            return None;
        };

        let transition = StateTransition {
            from: self.phase,
            to: next,
            timestamp: Utc::now(),
            turn: self.turns,
        };
        self.history = self.history.record(transition.clone());
        self.phase = next;

        debug!(phase = %next, turn = self.turns, "session finished");
        Some(transition)
    }

    fn is_solved(&self) -> bool {
        self.revealed
            .iter()
            .zip(self.secret.chars())
            .all(|(slot, c)| *slot == Some(c))
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn slots(&self) -> &[Option<char>] {
        &self.revealed
    }

    /// The word with unknown letters shown as `_`.
    pub fn masked(&self) -> String {
        self.revealed
            .iter()
            .map(|slot| slot.unwrap_or('_').to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn used_letters(&self) -> &[char] {
        &self.used_letters
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn mistake_limit(&self) -> u32 {
        self.mistake_limit
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn hint_policy(&self) -> HintPolicy {
        self.hint_policy
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_final()
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    pub fn history(&self) -> &StateHistory<Phase> {
        &self.history
    }

    /// Hints this session can ever reveal.
    pub fn hints_available(&self) -> usize {
        self.hints.len().min(MAX_HINTS)
    }

    pub fn hints_revealed(&self) -> usize {
        self.hints_used.len()
    }

    /// Indices of purchased hints, in purchase order.
    pub fn hints_used(&self) -> &[usize] {
        &self.hints_used
    }

    /// Texts of hints already paid for; re-reading them is free.
    pub fn revealed_hints(&self) -> Vec<&str> {
        self.hints_used
            .iter()
            .filter_map(|&i| self.hints.get(i).map(String::as_str))
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            phase: self.phase,
            masked: self.masked(),
            slots: self.revealed.clone(),
            used_letters: self.used_letters.clone(),
            mistakes: self.mistakes,
            mistake_limit: self.mistake_limit,
            revealed_hints: self
                .revealed_hints()
                .into_iter()
                .map(String::from)
                .collect(),
            hints_remaining: self.hints_available() - self.hints_revealed(),
            hint_cost: self.hint_policy.cost(),
            secret: self.is_over().then(|| self.secret.clone()),
        }
    }

    /// Check the structural invariants a deserialized session must hold.
    ///
    /// The reveal mask, mistake count, turn count and phase are rebuilt from
    /// the secret and the used letters and must match what is stored.
    pub fn validate(&self) -> Result<(), String> {
        if self.secret.len() < MIN_WORD_LEN
            || !self.secret.bytes().all(|b| b.is_ascii_uppercase())
        {
            return Err(format!("secret {:?} is not a normalized word", self.secret));
        }
        if self.mistake_limit == 0 {
            return Err("mistake limit is zero".to_string());
        }

        let mut seen = Vec::with_capacity(self.used_letters.len());
        for &letter in &self.used_letters {
            if !letter.is_ascii_uppercase() {
                return Err(format!("used letter {letter:?} is not A-Z"));
            }
            if seen.contains(&letter) {
                return Err(format!("letter {letter} used twice"));
            }
            seen.push(letter);
        }
        if self.turns != self.used_letters.len() {
            return Err("turn count differs from used letters".to_string());
        }

        let mask: Vec<Option<char>> = self
            .secret
            .chars()
            .map(|c| self.used_letters.contains(&c).then_some(c))
            .collect();
        if mask != self.revealed {
            return Err("reveal mask does not match guesses".to_string());
        }
        let misses = self
            .used_letters
            .iter()
            .filter(|&&l| !self.secret.contains(l))
            .count();
        if u32::try_from(misses).ok() != Some(self.mistakes) {
            return Err(format!(
                "mistakes {} do not match {misses} missed letters",
                self.mistakes
            ));
        }
        if self.mistakes > self.mistake_limit {
            return Err("mistakes exceed limit".to_string());
        }

        if self.mode == Mode::Friend
            && (self.hint_policy != HintPolicy::Disabled || !self.hints.is_empty())
        {
            return Err("friend sessions cannot carry hints".to_string());
        }
        if self.hints.len() > MAX_HINTS || self.hints_used.len() > self.hints.len() {
            return Err("hint ledger out of range".to_string());
        }
        if self.hints_used.iter().enumerate().any(|(pos, &i)| pos != i) {
            return Err("hint ledger out of order".to_string());
        }

        let expected = if self.is_solved() {
            Phase::Won
        } else if self.mistakes >= self.mistake_limit {
            Phase::Lost
        } else {
            Phase::InProgress
        };
        if expected != self.phase {
            return Err(format!(
                "phase {} does not match board ({})",
                self.phase, expected
            ));
        }
        let recorded = self.history.last().map(|t| t.to);
        let consistent = match self.phase {
            Phase::InProgress => self.history.is_empty(),
            phase => recorded == Some(phase) && self.history.transitions().len() == 1,
        };
        if !consistent {
            return Err("history does not match phase".to_string());
        }
        Ok(())
    }
}
