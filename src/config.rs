//! Game configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file is valid.
//! Validation reports every problem in one pass rather than stopping at the
//! first one.
//!
//! ```toml
//! hint_cost = 15
//! free_hints = false
//! words_path = "words.json"
//! store_path = "scores.json"
//!
//! [difficulty.hard]
//! mistake_limit = 3
//! min_len = 7
//! max_len = 20
//! ```

use crate::difficulty::{Difficulty, DifficultyProfile, DifficultyTable};
use crate::session::{HintPolicy, MIN_WORD_LEN};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Points charged per hint unless configured otherwise.
pub const DEFAULT_HINT_COST: u32 = 15;

/// A single problem found while validating a config.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("{tier}: mistake limit must be at least 1")]
    ZeroMistakeLimit { tier: Difficulty },

    #[error("{tier}: minimum word length {min_len} is below {}", MIN_WORD_LEN)]
    MinLenTooShort { tier: Difficulty, min_len: usize },

    #[error("{tier}: minimum word length {min_len} exceeds maximum {max_len}")]
    EmptyLengthRange {
        tier: Difficulty,
        min_len: usize,
        max_len: usize,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {}", Violations(.0))]
    Invalid(Vec<ConfigViolation>),
}

struct Violations<'a>(&'a [ConfigViolation]);

impl fmt::Display for Violations<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub hint_cost: u32,
    /// When set, hints are free and the score is never debited.
    pub free_hints: bool,
    pub difficulty: DifficultyTable,
    /// Word/hint dataset. The built-in list is used when unset or unreadable.
    pub words_path: Option<PathBuf>,
    /// Score ledger file. Counters live in memory when unset.
    pub store_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hint_cost: DEFAULT_HINT_COST,
            free_hints: false,
            difficulty: DifficultyTable::default(),
            words_path: None,
            store_path: None,
        }
    }
}

impl GameConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn hint_policy(&self) -> HintPolicy {
        if self.free_hints {
            HintPolicy::Free
        } else {
            HintPolicy::Cost(self.hint_cost)
        }
    }

    pub fn profile(&self, tier: Difficulty) -> DifficultyProfile {
        self.difficulty.profile(tier)
    }

    /// Check every tier, accumulating all violations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = self
            .difficulty
            .iter()
            .flat_map(|(tier, profile)| check_profile(tier, profile))
            .collect();

        match Validation::all_vec(checks).map(|_| ()) {
            Validation::Success(()) => Ok(()),
            Validation::Failure(errors) => Err(ConfigError::Invalid(
                errors.iter().cloned().collect(),
            )),
        }
    }
}

fn check_profile(
    tier: Difficulty,
    profile: DifficultyProfile,
) -> Vec<Validation<(), NonEmptyVec<ConfigViolation>>> {
    let check = |ok: bool, violation: ConfigViolation| {
        if ok {
            Validation::success(())
        } else {
            Validation::fail(violation)
        }
    };

    vec![
        check(
            profile.mistake_limit > 0,
            ConfigViolation::ZeroMistakeLimit { tier },
        ),
        check(
            profile.min_len >= MIN_WORD_LEN,
            ConfigViolation::MinLenTooShort {
                tier,
                min_len: profile.min_len,
            },
        ),
        check(
            profile.min_len <= profile.max_len,
            ConfigViolation::EmptyLengthRange {
                tier,
                min_len: profile.min_len,
                max_len: profile.max_len,
            },
        ),
    ]
}
