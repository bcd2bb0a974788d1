//! Difficulty tiers.
//!
//! A tier decides how many mistakes a player may make and which words from
//! the bank are eligible.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown difficulty {0:?}, expected easy, normal or hard")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(UnknownDifficulty(s.to_string())),
        }
    }
}

/// Rules for one tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub mistake_limit: u32,
    /// Shortest eligible word, in normalized letters.
    pub min_len: usize,
    /// Longest eligible word, in normalized letters.
    pub max_len: usize,
}

impl DifficultyProfile {
    pub const fn new(mistake_limit: u32, min_len: usize, max_len: usize) -> Self {
        Self {
            mistake_limit,
            min_len,
            max_len,
        }
    }

    /// Whether a normalized word of `len` letters fits this tier.
    pub fn accepts(&self, len: usize) -> bool {
        (self.min_len..=self.max_len).contains(&len)
    }
}

/// Profiles for every tier. Missing tiers in a config file fall back to the
/// built-in defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTable {
    pub easy: DifficultyProfile,
    pub normal: DifficultyProfile,
    pub hard: DifficultyProfile,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: DifficultyProfile::new(8, 2, 5),
            normal: DifficultyProfile::new(6, 4, 8),
            hard: DifficultyProfile::new(4, 6, 32),
        }
    }
}

impl DifficultyTable {
    pub fn profile(&self, tier: Difficulty) -> DifficultyProfile {
        match tier {
            Difficulty::Easy => self.easy,
            Difficulty::Normal => self.normal,
            Difficulty::Hard => self.hard,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Difficulty, DifficultyProfile)> + '_ {
        Difficulty::ALL.into_iter().map(|tier| (tier, self.profile(tier)))
    }
}
