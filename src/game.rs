//! Host application around a session.
//!
//! [`Game`] is the imperative shell: it owns the configuration, the word
//! bank, the score ledger and the one live [`Session`]. It forwards player
//! input to the session, charges for hints, settles the ledger when a game
//! ends and tells observers what happened.

use crate::checkpoint::{Checkpoint, CheckpointError};
use crate::config::GameConfig;
use crate::difficulty::Difficulty;
use crate::scoring::{ScoreBoard, Settlement, Totals};
use crate::session::{Event, Mode, Session, SessionError, Snapshot, Step};
use crate::store::{CounterStore, StoreError};
use crate::words::WordBank;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Error)]
pub enum GameError {
    #[error("No game in progress")]
    NoSession,

    #[error("Word list is empty")]
    NoWords,

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

/// Receives every state-changing step together with the session as it looks
/// afterwards.
pub trait Observer {
    fn on_step(&mut self, snapshot: &Snapshot, outcome: &Outcome);
}

impl<F> Observer for F
where
    F: FnMut(&Snapshot, &Outcome),
{
    fn on_step(&mut self, snapshot: &Snapshot, outcome: &Outcome) {
        self(snapshot, outcome)
    }
}

/// Result of a host operation.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    /// `None` for operations that replace the session (new game, resume).
    pub step: Option<Step>,
    /// Set when this operation finished the game.
    pub settlement: Option<Settlement>,
}

impl Outcome {
    pub fn is_finished(&self) -> bool {
        self.settlement.is_some()
    }
}

pub struct Game<S: CounterStore> {
    config: GameConfig,
    words: WordBank,
    scores: ScoreBoard<S>,
    session: Option<Session>,
    difficulty: Difficulty,
    observers: Vec<Box<dyn Observer>>,
}

impl<S: CounterStore> Game<S> {
    pub fn new(config: GameConfig, words: WordBank, store: S) -> Self {
        Self {
            config,
            words,
            scores: ScoreBoard::new(store),
            session: None,
            difficulty: Difficulty::default(),
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: impl Observer + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.session.as_ref().map(Session::snapshot)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn totals(&self) -> Totals {
        self.scores.totals()
    }

    pub fn scores(&self) -> &ScoreBoard<S> {
        &self.scores
    }

    pub fn scores_mut(&mut self) -> &mut ScoreBoard<S> {
        &mut self.scores
    }

    /// Start a game with a random word for the tier.
    #[instrument(skip(self, rng))]
    pub fn start_random<R: Rng + ?Sized>(
        &mut self,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<Snapshot, GameError> {
        let profile = self.config.profile(difficulty);
        let entry = self.words.pick(&profile, rng).ok_or(GameError::NoWords)?;

        let session = Session::builder()
            .word(entry.word.as_str())
            .mode(Mode::Random)
            .hints(entry.hints.iter().map(String::as_str))
            .hint_policy(self.config.hint_policy())
            .mistake_limit(profile.mistake_limit)
            .build()?;

        info!(letters = session.secret().len(), "random game started");
        Ok(self.replace(session, difficulty))
    }

    /// Start a game with a word typed in by another player. On
    /// [`SessionError::InvalidWord`] the current session is left alone so the
    /// caller can re-prompt.
    #[instrument(skip(self, raw))]
    pub fn start_friend(
        &mut self,
        raw: &str,
        difficulty: Difficulty,
    ) -> Result<Snapshot, GameError> {
        let session = Session::builder()
            .word(raw)
            .mode(Mode::Friend)
            .mistake_limit(self.config.profile(difficulty).mistake_limit)
            .build()?;

        info!(letters = session.secret().len(), "friend game started");
        Ok(self.replace(session, difficulty))
    }

    /// Start over with the same mode and tier. Friend games return `None`;
    /// someone has to type a new word.
    pub fn play_again<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Option<Snapshot>, GameError> {
        match self.session.as_ref().map(Session::mode) {
            Some(Mode::Friend) => Ok(None),
            _ => self.start_random(self.difficulty, rng).map(Some),
        }
    }

    /// Back to the menu; the session is discarded.
    pub fn end(&mut self) {
        if self.session.take().is_some() {
            debug!("session discarded");
        }
    }

    /// Guess a letter. If settling a finished game fails to persist, the
    /// guess is not applied and can be retried.
    #[instrument(skip(self))]
    pub fn guess(&mut self, raw: &str) -> Result<Outcome, GameError> {
        let mut next = self.session.clone().ok_or(GameError::NoSession)?;
        let step = next.guess(raw);
        self.commit(next, step)
    }

    /// Buy the next hint. Fails with [`SessionError::InsufficientFunds`]
    /// when the score cannot cover it. Nothing is revealed unless the cost
    /// was debited.
    #[instrument(skip(self))]
    pub fn request_hint(&mut self) -> Result<Outcome, GameError> {
        let balance = self.scores.score();
        let mut next = self.session.clone().ok_or(GameError::NoSession)?;
        let step = next.request_hint(balance)?;

        if let Event::HintRevealed { cost, .. } = step.event {
            if cost > 0 {
                let left = self.scores.debit(cost)?;
                debug!(cost, left, "hint charged");
            }
        }
        self.commit(next, step)
    }

    pub fn checkpoint(&self) -> Result<Checkpoint, GameError> {
        let session = self.session.clone().ok_or(GameError::NoSession)?;
        Ok(Checkpoint::new(session, self.difficulty))
    }

    /// Replace the current session with a saved one.
    pub fn resume(&mut self, checkpoint: Checkpoint) -> Result<Snapshot, GameError> {
        checkpoint.validate()?;
        let difficulty = checkpoint.difficulty;
        info!(id = %checkpoint.id, "game resumed");
        Ok(self.replace(checkpoint.into_session(), difficulty))
    }

    fn replace(&mut self, session: Session, difficulty: Difficulty) -> Snapshot {
        let snapshot = session.snapshot();
        self.session = Some(session);
        self.difficulty = difficulty;
        self.notify(
            &snapshot,
            &Outcome {
                step: None,
                settlement: None,
            },
        );
        snapshot
    }

    // Sessions only report a transition once, so settling here cannot double
    // count. The updated session replaces the live one only after the ledger
    // accepted the settlement.
    fn commit(&mut self, next: Session, step: Step) -> Result<Outcome, GameError> {
        let settlement = match step.outcome() {
            Some(phase) => Some(self.scores.record(phase, next.hints_revealed())?),
            None => None,
        };
        let snapshot = next.snapshot();
        self.session = Some(next);
        let outcome = Outcome {
            step: Some(step),
            settlement,
        };

        if outcome.step.as_ref().is_some_and(Step::changed) {
            self.notify(&snapshot, &outcome);
        }
        Ok(outcome)
    }

    fn notify(&mut self, snapshot: &Snapshot, outcome: &Outcome) {
        for observer in &mut self.observers {
            observer.on_step(snapshot, outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Ignored, Phase};
    use crate::store::testing::FlakyStore;
    use crate::store::{write_counter, MemoryStore, SCORE_KEY};
    use crate::words::WordEntry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn game_with(word: &str, hints: &[&str]) -> Game<MemoryStore> {
        let entry = WordEntry::new(word, hints.iter().copied());
        Game::new(
            GameConfig::default(),
            WordBank::from_entries(vec![entry]).unwrap(),
            MemoryStore::new(),
        )
    }

    #[test]
    fn actions_need_a_session() {
        let mut game = game_with("gato", &[]);
        assert!(matches!(game.guess("a"), Err(GameError::NoSession)));
        assert!(matches!(game.request_hint(), Err(GameError::NoSession)));
    }

    #[test]
    fn win_settles_once() {
        let mut game = game_with("gato", &[]);
        let mut rng = StdRng::seed_from_u64(3);
        game.start_random(Difficulty::Normal, &mut rng).unwrap();

        let mut settlements = Vec::new();
        for letter in ["g", "a", "t", "o", "o", "x"] {
            let outcome = game.guess(letter).unwrap();
            settlements.extend(outcome.settlement);
        }

        assert_eq!(settlements.len(), 1);
        assert_eq!(settlements[0].points, 100);
        assert_eq!(game.totals().played, 1);
        assert_eq!(game.totals().score, 100);
    }

    #[test]
    fn invalid_friend_word_keeps_current_game() {
        let mut game = game_with("gato", &[]);
        game.start_friend("perro", Difficulty::Normal).unwrap();

        let err = game.start_friend("¡!", Difficulty::Normal).unwrap_err();
        assert!(matches!(
            err,
            GameError::Session(SessionError::InvalidWord { .. })
        ));
        assert_eq!(game.session().unwrap().secret(), "PERRO");
    }

    #[test]
    fn hint_is_charged_to_the_score() {
        let mut game = game_with("faro", &["Near the sea"]);
        write_counter(game.scores_mut().store_mut(), SCORE_KEY, 20).unwrap();
        game.start_random(Difficulty::Easy, &mut StdRng::seed_from_u64(0))
            .unwrap();

        let outcome = game.request_hint().unwrap();
        assert!(matches!(
            outcome.step.unwrap().event,
            Event::HintRevealed { cost: 15, .. }
        ));
        assert_eq!(game.totals().score, 5);
    }

    #[test]
    fn insufficient_funds_changes_nothing() {
        let mut game = game_with("faro", &["Near the sea"]);
        game.start_random(Difficulty::Easy, &mut StdRng::seed_from_u64(0))
            .unwrap();

        let err = game.request_hint().unwrap_err();
        assert!(matches!(
            err,
            GameError::Session(SessionError::InsufficientFunds {
                cost: 15,
                balance: 0
            })
        ));
        assert_eq!(game.session().unwrap().hints_revealed(), 0);
        assert_eq!(game.totals().score, 0);
    }

    #[test]
    fn observers_see_changes_only() {
        let mut game = game_with("sol", &[]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        game.subscribe(move |snapshot: &Snapshot, _: &Outcome| {
            sink.borrow_mut().push(snapshot.masked.clone());
        });

        game.start_friend("sol", Difficulty::Normal).unwrap();
        game.guess("s").unwrap();
        game.guess("s").unwrap();
        game.guess("7").unwrap();

        assert_eq!(*seen.borrow(), vec!["_ _ _", "S _ _"]);
    }

    #[test]
    fn play_again_in_friend_mode_needs_a_word() {
        let mut game = game_with("gato", &[]);
        game.start_friend("luna", Difficulty::Hard).unwrap();

        let next = game.play_again(&mut StdRng::seed_from_u64(9)).unwrap();
        assert!(next.is_none());
    }

    #[test]
    fn play_again_keeps_the_tier() {
        let mut game = game_with("gato", &[]);
        game.start_random(Difficulty::Hard, &mut StdRng::seed_from_u64(9))
            .unwrap();

        let next = game
            .play_again(&mut StdRng::seed_from_u64(10))
            .unwrap()
            .unwrap();
        assert_eq!(next.mistake_limit, 4);
        assert_eq!(game.difficulty(), Difficulty::Hard);
    }

    #[test]
    fn loss_resets_streak() {
        let mut game = game_with("mar", &[]);
        game.start_friend("mar", Difficulty::Hard).unwrap();
        for letter in ["m", "a", "r"] {
            game.guess(letter).unwrap();
        }
        assert_eq!(game.totals().streak, 1);

        game.start_friend("mar", Difficulty::Hard).unwrap();
        let mut last = None;
        for letter in ["x", "y", "z", "w"] {
            last = Some(game.guess(letter).unwrap());
        }

        let settlement = last.unwrap().settlement.unwrap();
        assert_eq!(settlement.outcome, Phase::Lost);
        assert_eq!(settlement.totals.streak, 0);
        assert_eq!(settlement.totals.played, 2);
    }

    #[test]
    fn checkpoint_resume_continues_the_game() {
        let mut game = game_with("gato", &[]);
        game.start_friend("camisa", Difficulty::Easy).unwrap();
        game.guess("a").unwrap();
        let saved = game.checkpoint().unwrap();

        game.end();
        assert!(game.session().is_none());

        let snapshot = game.resume(saved).unwrap();
        assert_eq!(snapshot.masked, "_ A _ _ _ A");
        assert_eq!(game.difficulty(), Difficulty::Easy);
        assert_eq!(
            game.guess("a").unwrap().step.unwrap().event,
            Event::Ignored(Ignored::AlreadyUsed)
        );
    }

    fn flaky_game(word: &str, hints: &[&str], score: u32) -> Game<FlakyStore> {
        let entry = WordEntry::new(word, hints.iter().copied());
        let mut game = Game::new(
            GameConfig::default(),
            WordBank::from_entries(vec![entry]).unwrap(),
            FlakyStore::default(),
        );
        write_counter(game.scores_mut().store_mut(), SCORE_KEY, score).unwrap();
        game.start_random(Difficulty::Easy, &mut StdRng::seed_from_u64(0))
            .unwrap();
        game
    }

    #[test]
    fn hint_is_not_revealed_when_charging_fails() {
        let mut game = flaky_game("faro", &["Near the sea", "Has a light"], 100);
        game.scores_mut().store_mut().failing = true;

        assert!(matches!(game.request_hint(), Err(GameError::Store(_))));
        assert_eq!(game.session().unwrap().hints_revealed(), 0);
        assert_eq!(game.totals().score, 100);

        game.scores_mut().store_mut().failing = false;
        let outcome = game.request_hint().unwrap();
        assert!(matches!(
            outcome.step.unwrap().event,
            Event::HintRevealed { index: 0, cost: 15, .. }
        ));
        assert_eq!(game.totals().score, 85);
    }

    #[test]
    fn failed_settlement_keeps_the_game_open() {
        let mut game = flaky_game("sol", &[], 0);
        game.guess("s").unwrap();
        game.guess("o").unwrap();
        game.scores_mut().store_mut().failing = true;

        assert!(matches!(game.guess("l"), Err(GameError::Store(_))));
        let snapshot = game.snapshot().unwrap();
        assert_eq!(snapshot.phase, Phase::InProgress);
        assert_eq!(snapshot.masked, "S O _");
        assert_eq!(game.totals().played, 0);

        game.scores_mut().store_mut().failing = false;
        let outcome = game.guess("l").unwrap();
        assert_eq!(outcome.settlement.unwrap().outcome, Phase::Won);
        assert_eq!(game.totals().played, 1);
        assert_eq!(game.totals().score, 100);
    }
}
