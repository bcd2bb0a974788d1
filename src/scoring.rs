//! Score, streak and play-count ledger.
//!
//! Applied once per finished game. Stars go down with every hint used and
//! map to a fixed points table; a loss scores nothing and breaks the streak.

use crate::core::State;
use crate::session::Phase;
use crate::store::{
    read_counter, write_counter, CounterStore, StoreError, BEST_STREAK_KEY, PLAYED_KEY, SCORE_KEY,
    STREAK_KEY,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Stars a hint-free win earns.
pub const MAX_STARS: u32 = 3;

/// Points awarded for a win, indexed by stars.
pub const POINTS_BY_STARS: [u32; 4] = [10, 40, 70, 100];

/// Stars for a win after using `hints_used` hints.
pub fn stars_for(hints_used: usize) -> u32 {
    MAX_STARS.saturating_sub(u32::try_from(hints_used).unwrap_or(u32::MAX))
}

pub fn points_for(stars: u32) -> u32 {
    POINTS_BY_STARS[stars.min(MAX_STARS) as usize]
}

/// Counter values after a settlement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub score: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub played: u32,
}

/// What a finished game did to the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub outcome: Phase,
    pub stars: u32,
    pub points: u32,
    pub totals: Totals,
}

/// Score ledger over a counter store.
#[derive(Debug)]
pub struct ScoreBoard<S> {
    store: S,
}

impl<S: CounterStore> ScoreBoard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn score(&self) -> u32 {
        read_counter(&self.store, SCORE_KEY)
    }

    pub fn streak(&self) -> u32 {
        read_counter(&self.store, STREAK_KEY)
    }

    pub fn best_streak(&self) -> u32 {
        read_counter(&self.store, BEST_STREAK_KEY)
    }

    pub fn played(&self) -> u32 {
        read_counter(&self.store, PLAYED_KEY)
    }

    pub fn totals(&self) -> Totals {
        Totals {
            score: self.score(),
            streak: self.streak(),
            best_streak: self.best_streak(),
            played: self.played(),
        }
    }

    /// Apply a finished game. `outcome` must be terminal; an in-progress
    /// phase is treated as a loss. The counters are written together, so a
    /// failed write leaves the ledger as it was.
    pub fn record(&mut self, outcome: Phase, hints_used: usize) -> Result<Settlement, StoreError> {
        let mut totals = self.totals();
        let won = outcome.is_final() && !outcome.is_error();

        let (stars, points) = if won {
            let stars = stars_for(hints_used);
            (stars, points_for(stars))
        } else {
            (0, 0)
        };

        totals.played = totals.played.saturating_add(1);
        if won {
            totals.score = totals.score.saturating_add(points);
            totals.streak = totals.streak.saturating_add(1);
            totals.best_streak = totals.best_streak.max(totals.streak);
        } else {
            totals.streak = 0;
        }

        self.store.set_all(&[
            (SCORE_KEY, totals.score.to_string()),
            (STREAK_KEY, totals.streak.to_string()),
            (BEST_STREAK_KEY, totals.best_streak.to_string()),
            (PLAYED_KEY, totals.played.to_string()),
        ])?;

        info!(
            outcome = %outcome,
            stars,
            points,
            score = totals.score,
            streak = totals.streak,
            "game settled"
        );

        Ok(Settlement {
            outcome,
            stars,
            points,
            totals,
        })
    }

    /// Take `amount` points from the score, never going below zero.
    pub fn debit(&mut self, amount: u32) -> Result<u32, StoreError> {
        let score = self.score().saturating_sub(amount);
        write_counter(&mut self.store, SCORE_KEY, score)?;
        Ok(score)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::FlakyStore;
    use crate::store::MemoryStore;

    #[test]
    fn stars_drop_with_hints() {
        assert_eq!(stars_for(0), 3);
        assert_eq!(stars_for(1), 2);
        assert_eq!(stars_for(3), 0);
        assert_eq!(stars_for(10), 0);
    }

    #[test]
    fn points_follow_table() {
        assert_eq!(points_for(0), 10);
        assert_eq!(points_for(1), 40);
        assert_eq!(points_for(2), 70);
        assert_eq!(points_for(3), 100);
    }

    #[test]
    fn win_adds_points_and_streak() {
        let mut board = ScoreBoard::new(MemoryStore::new());

        let settlement = board.record(Phase::Won, 0).unwrap();

        assert_eq!(settlement.stars, 3);
        assert_eq!(settlement.points, 100);
        assert_eq!(
            settlement.totals,
            Totals {
                score: 100,
                streak: 1,
                best_streak: 1,
                played: 1
            }
        );
    }

    #[test]
    fn loss_resets_streak_but_counts_play() {
        let mut board = ScoreBoard::new(MemoryStore::new());
        board.record(Phase::Won, 1).unwrap();
        board.record(Phase::Won, 2).unwrap();

        let settlement = board.record(Phase::Lost, 0).unwrap();

        assert_eq!(settlement.points, 0);
        assert_eq!(settlement.stars, 0);
        assert_eq!(settlement.totals.streak, 0);
        assert_eq!(settlement.totals.best_streak, 2);
        assert_eq!(settlement.totals.played, 3);
        assert_eq!(settlement.totals.score, 40 + 70);
    }

    #[test]
    fn malformed_counters_start_from_zero() {
        let store: MemoryStore = [(SCORE_KEY, "NaN"), (PLAYED_KEY, "")].into_iter().collect();
        let mut board = ScoreBoard::new(store);

        let settlement = board.record(Phase::Won, 3).unwrap();
        assert_eq!(settlement.totals.score, 10);
        assert_eq!(settlement.totals.played, 1);
    }

    #[test]
    fn debit_saturates_at_zero() {
        let mut board = ScoreBoard::new(MemoryStore::new());
        board.record(Phase::Won, 0).unwrap();

        assert_eq!(board.debit(15).unwrap(), 85);
        assert_eq!(board.debit(500).unwrap(), 0);
        assert_eq!(board.score(), 0);
    }

    #[test]
    fn failed_record_leaves_ledger_untouched() {
        let mut board = ScoreBoard::new(FlakyStore::default());
        board.store_mut().fail_write = Some(2);

        assert!(board.record(Phase::Won, 0).is_err());
        assert_eq!(board.totals(), Totals::default());

        let settlement = board.record(Phase::Won, 0).unwrap();
        assert_eq!(settlement.totals.played, 1);
        assert_eq!(settlement.totals.score, 100);
    }
}
