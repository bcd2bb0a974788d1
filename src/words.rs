//! Word/hint dataset.
//!
//! The bank is loaded once at startup from a JSON document and is immutable
//! afterwards. A missing or broken document never stops the game: the
//! built-in list takes over so random games stay playable offline.
//!
//! Accepted document shapes:
//!
//! ```json
//! [{ "word": "faro", "hints": ["Near the sea", "Has a light"] }]
//! ```
//!
//! ```json
//! { "words": [{ "word": "faro", "hints": [] }] }
//! ```

use crate::difficulty::DifficultyProfile;
use crate::normalize::normalize_word;
use crate::session::MIN_WORD_LEN;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    #[serde(default)]
    pub hints: Vec<String>,
}

impl WordEntry {
    pub fn new<I, H>(word: impl Into<String>, hints: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: Into<String>,
    {
        Self {
            word: word.into(),
            hints: hints.into_iter().map(Into::into).collect(),
        }
    }

    /// Length of the word once normalized.
    pub fn letters(&self) -> usize {
        normalize_word(&self.word).len()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    List(Vec<WordEntry>),
    Wrapped { words: Vec<WordEntry> },
}

#[derive(Debug, Error)]
pub enum WordsError {
    #[error("Failed to read word list {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse word list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Word list contains no playable words")]
    Empty,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordBank {
    entries: Vec<WordEntry>,
}

impl WordBank {
    /// Keep only entries that normalize to a playable word.
    pub fn from_entries(entries: Vec<WordEntry>) -> Result<Self, WordsError> {
        let total = entries.len();
        let entries: Vec<WordEntry> = entries
            .into_iter()
            .filter(|entry| entry.letters() >= MIN_WORD_LEN)
            .collect();

        if entries.len() < total {
            warn!(dropped = total - entries.len(), "skipped unplayable words");
        }
        if entries.is_empty() {
            return Err(WordsError::Empty);
        }
        Ok(Self { entries })
    }

    pub fn from_json(source: &str) -> Result<Self, WordsError> {
        let entries = match serde_json::from_str(source)? {
            Document::List(entries) => entries,
            Document::Wrapped { words } => words,
        };
        Self::from_entries(entries)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, WordsError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| WordsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let bank = Self::from_json(&source)?;
        debug!(path = %path.display(), words = bank.len(), "word list loaded");
        Ok(bank)
    }

    /// Load `path` if given, falling back to [`WordBank::builtin`] on any
    /// failure.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::builtin();
        };
        match Self::load(path) {
            Ok(bank) => bank,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "using built-in word list");
                Self::builtin()
            }
        }
    }

    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN
                .iter()
                .map(|(word, hints)| WordEntry::new(*word, hints.iter().copied()))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose length fits the tier.
    pub fn eligible(&self, profile: &DifficultyProfile) -> Vec<&WordEntry> {
        self.entries
            .iter()
            .filter(|entry| profile.accepts(entry.letters()))
            .collect()
    }

    /// Pick a random entry for the tier. When nothing fits, any entry is
    /// picked instead so the game can still start.
    pub fn pick<R: Rng + ?Sized>(
        &self,
        profile: &DifficultyProfile,
        rng: &mut R,
    ) -> Option<&WordEntry> {
        let eligible = self.eligible(profile);
        if eligible.is_empty() {
            warn!(
                min_len = profile.min_len,
                max_len = profile.max_len,
                "no word fits the tier, picking from the whole list"
            );
            return self.entries.choose(rng);
        }
        eligible.choose(rng).copied()
    }
}

const BUILTIN: &[(&str, &[&str])] = &[
    ("GATO", &["Purrs", "Chases mice", "Has whiskers"]),
    ("PERRO", &["Barks", "Loyal companion", "Wags its tail"]),
    ("FARO", &["Stands by the sea", "Sends light to ships"]),
    ("VENTANA", &["Made of glass", "Lets the light in", "You can open it"]),
    ("JUEGO", &["Something you play", "Has rules"]),
    ("NUBE", &["Floats in the sky", "Brings rain", "White and fluffy"]),
    ("LLAVE", &["Opens doors", "Hangs on a ring"]),
    ("CAMINO", &["You walk along it", "Leads somewhere"]),
    ("PLANTA", &["Needs water", "Grows in a pot", "Green"]),
    ("BOTELLA", &["Holds liquid", "Has a cap"]),
    ("CARRO", &["Has four wheels", "Needs fuel"]),
    ("CASA", &["Where you live", "Has a roof"]),
    ("LUNA", &["Shines at night", "Has phases", "Orbits the earth"]),
    ("SOL", &["A star", "Hot and bright"]),
    ("RATON", &["Small rodent", "Also a computer device"]),
    ("LIBRO", &["Has pages", "You read it"]),
    ("SILLA", &["You sit on it", "Has four legs"]),
    ("MESA", &["You eat at it", "Flat top"]),
    ("MONO", &["Climbs trees", "Loves bananas"]),
    ("PIEDRA", &["Hard", "Found on the ground"]),
    ("MAR", &["Salty water", "Has waves"]),
    ("RIO", &["Flows to the sea", "Fresh water"]),
    ("BOSQUE", &["Full of trees", "Animals live there"]),
    ("CAMISA", &["You wear it", "Has buttons"]),
    ("ZAPATO", &["Goes on your foot", "Has laces"]),
    ("TEXTO", &["Made of words", "You are reading one"]),
    ("FUEGO", &["Hot", "Burns", "Needs oxygen"]),
    ("TIEMPO", &["Clocks measure it", "Flies when you have fun"]),
    ("FIESTA", &["Music and dancing", "A celebration"]),
    ("PAN", &["Baked", "Made from flour"]),
];
