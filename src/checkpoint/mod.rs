//! Save and resume a game in progress.
//!
//! A checkpoint wraps a [`Session`] with a format version, an id and a
//! timestamp. JSON is readable and good for debugging; the binary form is
//! compact. Restoring validates the session so a hand-edited file cannot
//! produce an impossible board.

use crate::difficulty::Difficulty;
use crate::session::Session;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When the checkpoint was taken
    pub timestamp: DateTime<Utc>,

    /// Tier the session was started with, used by "play again"
    pub difficulty: Difficulty,

    pub session: Session,
}

impl Checkpoint {
    pub fn new(session: Session, difficulty: Difficulty) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            difficulty,
            session,
        }
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Checkpoint = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Checkpoint = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }

    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        self.session
            .validate()
            .map_err(CheckpointError::ValidationFailed)
    }

    pub fn into_session(self) -> Session {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Event, Mode, Phase};
    use serde_json::{json, Value};

    fn played_session() -> Session {
        let mut session = Session::new("ventana", Mode::Random, ["Glass", "Opens"], 6).unwrap();
        session.guess("v");
        session.guess("x");
        session.request_hint(0).unwrap();
        session
    }

    #[test]
    fn json_round_trip_keeps_playing() {
        let checkpoint = Checkpoint::new(played_session(), Difficulty::Normal);
        let json = checkpoint.to_json().unwrap();

        let mut session = Checkpoint::from_json(&json).unwrap().into_session();
        assert_eq!(session.masked(), "V _ _ _ _ _ _");
        assert_eq!(session.mistakes(), 1);
        assert_eq!(session.revealed_hints(), vec!["Glass"]);

        for letter in ["e", "n", "t", "a"] {
            session.guess(letter);
        }
        assert_eq!(session.phase(), Phase::Won);
    }

    #[test]
    fn binary_round_trip_preserves_everything() {
        let checkpoint = Checkpoint::new(played_session(), Difficulty::Hard);
        let bytes = checkpoint.to_bytes().unwrap();

        let restored = Checkpoint::from_bytes(&bytes).unwrap();
        assert_eq!(restored, checkpoint);
    }

    #[test]
    fn rejects_future_versions() {
        let mut checkpoint = Checkpoint::new(played_session(), Difficulty::Easy);
        checkpoint.version = CHECKPOINT_VERSION + 1;

        let json = checkpoint.to_json().unwrap();
        assert!(matches!(
            Checkpoint::from_json(&json),
            Err(CheckpointError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn rejects_tampered_sessions() {
        let checkpoint = Checkpoint::new(played_session(), Difficulty::Normal);
        let json = checkpoint
            .to_json()
            .unwrap()
            .replace("\"mistakes\": 1", "\"mistakes\": 9");

        assert!(matches!(
            Checkpoint::from_json(&json),
            Err(CheckpointError::ValidationFailed(_))
        ));
    }

    fn restore_edited(
        session: Session,
        edit: impl FnOnce(&mut Value),
    ) -> Result<Checkpoint, CheckpointError> {
        let json = Checkpoint::new(session, Difficulty::Normal).to_json().unwrap();
        let mut value: Value = serde_json::from_str(&json).unwrap();
        edit(&mut value["session"]);
        Checkpoint::from_json(&value.to_string())
    }

    #[test]
    fn rejects_guessed_letter_left_hidden() {
        let session = Session::new("gato", Mode::Random, Vec::<String>::new(), 6).unwrap();

        let result = restore_edited(session, |s| {
            s["used_letters"] = json!(["G"]);
            s["turns"] = json!(1);
        });

        assert!(matches!(result, Err(CheckpointError::ValidationFailed(_))));
    }

    #[test]
    fn rejects_friend_session_with_hints() {
        let session = Session::new("gato", Mode::Friend, Vec::<String>::new(), 6).unwrap();

        let result = restore_edited(session, |s| {
            s["hint_policy"] = json!("Free");
            s["hints"] = json!(["x"]);
        });

        assert!(matches!(result, Err(CheckpointError::ValidationFailed(_))));
    }

    #[test]
    fn rejects_mistakes_that_do_not_match_misses() {
        let mut session = Session::new("gato", Mode::Random, Vec::<String>::new(), 6).unwrap();
        session.guess("x");

        let result = restore_edited(session, |s| s["mistakes"] = json!(0));

        assert!(matches!(result, Err(CheckpointError::ValidationFailed(_))));
    }

    #[test]
    fn rejects_repeated_or_foreign_letters() {
        let mut session = Session::new("gato", Mode::Random, Vec::<String>::new(), 6).unwrap();
        session.guess("x");

        let repeated = restore_edited(session.clone(), |s| {
            s["used_letters"] = json!(["X", "X"]);
            s["turns"] = json!(2);
            s["mistakes"] = json!(2);
        });
        assert!(matches!(repeated, Err(CheckpointError::ValidationFailed(_))));

        let foreign = restore_edited(session, |s| s["used_letters"] = json!(["1"]));
        assert!(matches!(foreign, Err(CheckpointError::ValidationFailed(_))));
    }

    #[test]
    fn finished_games_restore_frozen() {
        let mut session = Session::new("sol", Mode::Friend, Vec::<String>::new(), 6).unwrap();
        for letter in ["s", "o", "l"] {
            session.guess(letter);
        }

        let mut restored = restore_edited(session, |_| {}).unwrap().into_session();
        assert_eq!(restored.phase(), Phase::Won);
        assert!(!restored.guess("x").changed());
    }

    #[test]
    fn restored_session_is_still_winnable() {
        let mut session = Session::new("gato", Mode::Random, Vec::<String>::new(), 6).unwrap();
        session.guess("g");

        let mut restored = restore_edited(session, |_| {}).unwrap().into_session();
        let mut last = None;
        for letter in ["a", "t", "o"] {
            last = Some(restored.guess(letter).event);
        }

        assert!(matches!(last, Some(Event::Revealed { letter: 'O', .. })));
        assert_eq!(restored.phase(), Phase::Won);
    }

    #[test]
    fn garbage_is_a_deserialization_error() {
        assert!(matches!(
            Checkpoint::from_bytes(&[1, 2, 3]),
            Err(CheckpointError::DeserializationFailed(_))
        ));
    }

    #[test]
    fn ids_are_unique() {
        let a = Checkpoint::new(played_session(), Difficulty::Normal);
        let b = Checkpoint::new(played_session(), Difficulty::Normal);
        assert_ne!(a.id, b.id);
    }
}
