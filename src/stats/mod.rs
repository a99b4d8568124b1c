use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::wordle::GuessesLimit;

mod migration;
pub use migration::{GameRestore, MigrationError, MigrationRecord};

/// Aggregate statistics over every finished latest-puzzle game of an installation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameStats {
    games_played: u32,
    games_won: u32,
    current_streak: u32,
    max_streak: u32,
    /// Wins keyed by the attempt they finished on.
    distribution: BTreeMap<usize, u32>,
    losses: u32,
}

/// Which current streak survives [`GameStats::import_foreign`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StreakPolicy {
    #[default]
    PreferLarger,
    Local,
    Foreign,
}

impl GameStats {
    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn games_won(&self) -> u32 {
        self.games_won
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn max_streak(&self) -> u32 {
        self.max_streak
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn distribution(&self) -> &BTreeMap<usize, u32> {
        &self.distribution
    }

    pub fn wins_at(&self, attempts: usize) -> u32 {
        self.distribution.get(&attempts).copied().unwrap_or_default()
    }

    /// Percentage of played games that were won, rounded to the nearest whole number.
    pub fn success_rate(&self) -> u32 {
        if self.games_played == 0 {
            return 0;
        }

        let rate = f64::from(self.games_won) * 100.0 / f64::from(self.games_played);
        rate.round() as u32
    }

    #[instrument(level = "debug", skip(self))]
    pub fn record_win(&mut self, attempts: usize) {
        self.games_played = self.games_played.saturating_add(1);
        self.games_won = self.games_won.saturating_add(1);
        self.current_streak = self.current_streak.saturating_add(1);
        self.max_streak = self.max_streak.max(self.current_streak);
        let wins = self.distribution.entry(attempts).or_default();
        *wins = wins.saturating_add(1);

        debug!(streak = self.current_streak, "recorded win");
    }

    #[instrument(level = "debug", skip(self))]
    pub fn record_loss(&mut self) {
        self.games_played = self.games_played.saturating_add(1);
        self.current_streak = 0;
        self.losses = self.losses.saturating_add(1);

        debug!("recorded loss");
    }

    /// Adds a foreign record's counters onto these ones.
    ///
    /// Nothing marks a record as already imported: importing the same one twice counts
    /// it twice. Counters stop at `u32::MAX` instead of wrapping.
    #[instrument(level = "debug", skip(self, foreign))]
    pub fn import_foreign(&mut self, foreign: &ForeignStats, policy: StreakPolicy) {
        for (index, wins) in foreign.win_distribution.iter().enumerate() {
            if *wins > 0 {
                let entry = self.distribution.entry(index + 1).or_default();
                *entry = entry.saturating_add(*wins);
            }
        }

        self.games_won = self.games_won.saturating_add(foreign.games_won());
        self.games_played = self.games_played.saturating_add(foreign.total_games);
        self.losses = self.losses.saturating_add(foreign.games_failed);

        self.current_streak = match policy {
            StreakPolicy::PreferLarger => self.current_streak.max(foreign.current_streak),
            StreakPolicy::Local => self.current_streak,
            StreakPolicy::Foreign => foreign.current_streak,
        };
        self.max_streak = self
            .max_streak
            .max(foreign.best_streak)
            .max(self.current_streak);

        debug!(
            played = self.games_played,
            streak = self.current_streak,
            "imported foreign stats"
        );
    }

    /// These stats in the exchange format, with one distribution bucket per attempt.
    pub fn to_foreign(&self, limit: GuessesLimit) -> ForeignStats {
        let buckets = self
            .distribution
            .keys()
            .next_back()
            .copied()
            .unwrap_or_default()
            .max(limit.get());

        ForeignStats {
            win_distribution: (1..=buckets).map(|attempts| self.wins_at(attempts)).collect(),
            games_failed: self.losses,
            current_streak: self.current_streak,
            best_streak: self.max_streak,
            total_games: self.games_played,
            success_rate: self.success_rate(),
        }
    }
}

/// Statistics in the format other installs exchange them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForeignStats {
    /// Index `i` holds the wins that took `i + 1` attempts.
    pub win_distribution: Vec<u32>,
    pub games_failed: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub total_games: u32,
    pub success_rate: u32,
}

impl ForeignStats {
    pub fn games_won(&self) -> u32 {
        self.win_distribution
            .iter()
            .copied()
            .fold(0, u32::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{ForeignStats, GameStats, StreakPolicy};
    use crate::wordle::GuessesLimit;

    #[test]
    fn wins_build_a_streak() {
        let mut stats = GameStats::default();
        stats.record_win(3);
        stats.record_win(4);

        assert_eq!(stats.games_played(), 2);
        assert_eq!(stats.games_won(), 2);
        assert_eq!(stats.current_streak(), 2);
        assert!(stats.max_streak() >= 2);
        assert_eq!(stats.wins_at(3), 1);
        assert_eq!(stats.wins_at(4), 1);
        assert_eq!(stats.wins_at(5), 0);
    }

    #[test]
    fn loss_resets_streak_only() {
        let mut stats = GameStats::default();
        stats.record_win(2);
        stats.record_win(5);
        stats.record_loss();

        assert_eq!(stats.current_streak(), 0);
        assert_eq!(stats.max_streak(), 2);
        assert_eq!(stats.losses(), 1);
        assert_eq!(stats.games_played(), 3);
        assert_eq!(stats.success_rate(), 67);
    }

    #[test]
    fn success_rate_without_games() {
        assert_eq!(GameStats::default().success_rate(), 0);
    }

    fn foreign() -> ForeignStats {
        ForeignStats {
            win_distribution: vec![0, 1, 2, 0, 0, 0],
            games_failed: 1,
            current_streak: 3,
            best_streak: 4,
            total_games: 4,
            success_rate: 75,
        }
    }

    #[test]
    fn import_sums_counters() {
        let mut stats = GameStats::default();
        stats.record_win(2);
        stats.import_foreign(&foreign(), StreakPolicy::default());

        assert_eq!(stats.games_played(), 5);
        assert_eq!(stats.games_won(), 4);
        assert_eq!(stats.losses(), 1);
        assert_eq!(stats.wins_at(2), 2);
        assert_eq!(stats.wins_at(3), 2);
        assert_eq!(stats.current_streak(), 3);
        assert_eq!(stats.max_streak(), 4);
    }

    #[test]
    fn streak_policy_picks_the_current_streak() {
        let mut local = GameStats::default();
        for _ in 0..5 {
            local.record_win(4);
        }

        let mut prefer = local.clone();
        prefer.import_foreign(&foreign(), StreakPolicy::PreferLarger);
        assert_eq!(prefer.current_streak(), 5);

        let mut theirs = local.clone();
        theirs.import_foreign(&foreign(), StreakPolicy::Foreign);
        assert_eq!(theirs.current_streak(), 3);
        assert_eq!(theirs.max_streak(), 5);

        let mut ours = local;
        ours.import_foreign(&foreign(), StreakPolicy::Local);
        assert_eq!(ours.current_streak(), 5);
    }

    #[test]
    fn importing_twice_counts_twice() {
        let mut stats = GameStats::default();
        stats.import_foreign(&foreign(), StreakPolicy::default());
        stats.import_foreign(&foreign(), StreakPolicy::default());

        assert_eq!(stats.games_played(), 8);
        assert_eq!(stats.games_won(), 6);
        assert_eq!(stats.losses(), 2);
        assert_eq!(stats.max_streak(), 4);
    }

    #[test]
    fn huge_foreign_counters_saturate() {
        let huge = ForeignStats {
            win_distribution: vec![u32::MAX, 1],
            games_failed: u32::MAX,
            current_streak: u32::MAX,
            best_streak: u32::MAX,
            total_games: u32::MAX,
            success_rate: 100,
        };
        assert_eq!(huge.games_won(), u32::MAX);

        let mut stats = GameStats::default();
        stats.record_win(1);
        stats.record_loss();
        stats.import_foreign(&huge, StreakPolicy::default());

        assert_eq!(stats.games_played(), u32::MAX);
        assert_eq!(stats.games_won(), u32::MAX);
        assert_eq!(stats.losses(), u32::MAX);
        assert_eq!(stats.wins_at(1), u32::MAX);
        assert_eq!(stats.wins_at(2), 1);
        assert_eq!(stats.max_streak(), u32::MAX);

        stats.record_win(1);
        assert_eq!(stats.games_played(), u32::MAX);
        assert_eq!(stats.current_streak(), u32::MAX);
    }

    #[test]
    fn exchange_format_has_a_bucket_per_attempt() {
        let mut stats = GameStats::default();
        stats.record_win(1);
        stats.record_win(3);
        stats.record_loss();

        assert_eq!(
            stats.to_foreign(GuessesLimit::default()),
            ForeignStats {
                win_distribution: vec![1, 0, 1, 0, 0, 0],
                games_failed: 1,
                current_streak: 0,
                best_streak: 2,
                total_games: 3,
                success_rate: 67,
            }
        );
    }
}
