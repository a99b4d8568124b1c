use std::fmt::Display;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::{
    core::{AsEmoji, Guess, GuessSlice, Guesses, LengthMismatch, LetterStates, Palette},
    daily::DailyPuzzle,
    hard_mode::{validate as validate_hard_mode, HardModeViolation},
};
use crate::{
    stats::GameStats,
    store::{GameSnapshot, PersistenceGateway, Preferences, SnapshotSlot, StoreError},
};

pub const DEFAULT_MAX_ATTEMPTS: usize = 6;

/// How many guesses a game allows. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GuessesLimit(usize);

impl GuessesLimit {
    /// # Panics
    /// If `limit` is zero.
    pub fn new(limit: usize) -> Self {
        Self::try_new(limit).expect("guesses limit should be greater than zero")
    }

    pub fn try_new(limit: usize) -> Option<Self> {
        (limit > 0).then_some(Self(limit))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for GuessesLimit {
    fn default() -> Self {
        Self(DEFAULT_MAX_ATTEMPTS)
    }
}

impl PartialEq<usize> for GuessesLimit {
    fn eq(&self, other: &usize) -> bool {
        self.0 == *other
    }
}

impl Display for GuessesLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("guess has {found} letters, it needs {expected}")]
    WrongLength { expected: usize, found: usize },

    #[error("the game is already over after {attempts} guesses")]
    TooManyAttempts { attempts: usize },

    #[error("hard mode: {0}")]
    HardModeViolation(#[from] HardModeViolation),

    #[error("hard mode can't be changed once guessing has started")]
    HardModeLocked,

    #[error(transparent)]
    LengthMismatch(#[from] LengthMismatch),
}

/// Why a saved game couldn't be picked up again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StaleSnapshot {
    #[error("snapshot is for `{stored}`, not today's solution")]
    DifferentSolution { stored: String },

    #[error("saved guess `{0}` doesn't fit the solution")]
    WrongLength(String),

    #[error("snapshot has {count} guesses, more than {limit} allowed")]
    TooManyGuesses { count: usize, limit: GuessesLimit },

    #[error("snapshot continues after the game was over")]
    GuessAfterEnd,
}

/// One puzzle's guesses. The outcome is always derived from them, so the two can't
/// disagree.
#[derive(Debug, Clone)]
pub struct GameState {
    puzzle: DailyPuzzle,
    guesses: Guesses,
}

impl GameState {
    pub fn new(puzzle: DailyPuzzle, limit: GuessesLimit) -> Self {
        Self {
            puzzle,
            guesses: Guesses::new(limit),
        }
    }

    /// Rebuilds a game from its snapshot, scoring every saved guess again.
    pub fn replay(
        puzzle: &DailyPuzzle,
        limit: GuessesLimit,
        snapshot: &GameSnapshot,
    ) -> Result<Self, StaleSnapshot> {
        if !puzzle.answer().matches(&snapshot.solution) {
            return Err(StaleSnapshot::DifferentSolution {
                stored: snapshot.solution.clone(),
            });
        }

        if snapshot.guesses.len() > limit.get() {
            return Err(StaleSnapshot::TooManyGuesses {
                count: snapshot.guesses.len(),
                limit,
            });
        }

        let mut state = Self::new(puzzle.clone(), limit);
        for raw in &snapshot.guesses {
            if state.outcome().is_terminal() {
                return Err(StaleSnapshot::GuessAfterEnd);
            }

            let guess = puzzle
                .answer()
                .evaluate(raw)
                .map_err(|_| StaleSnapshot::WrongLength(raw.clone()))?;
            state.guesses.push(guess);
        }

        Ok(state)
    }

    pub fn puzzle(&self) -> &DailyPuzzle {
        &self.puzzle
    }

    pub fn guesses(&self) -> &Guesses {
        &self.guesses
    }

    pub fn attempts(&self) -> usize {
        self.guesses.count()
    }

    pub fn outcome(&self) -> Outcome {
        if self.guesses.latest_is_solved() {
            Outcome::Won
        } else if self.guesses.limit_reached() {
            Outcome::Lost
        } else if self.guesses.count() == 0 {
            Outcome::NotStarted
        } else {
            Outcome::InProgress
        }
    }

    /// Scores and appends `raw`, leaving the state untouched if it is rejected.
    pub fn submit(&mut self, raw: &str, hard_mode: bool) -> Result<Guess, GameError> {
        let expected = self.puzzle.answer().len();
        let found = raw.chars().count();
        if found != expected {
            return Err(GameError::WrongLength { expected, found });
        }

        if self.outcome().is_terminal() {
            return Err(GameError::TooManyAttempts {
                attempts: self.attempts(),
            });
        }

        if hard_mode {
            validate_hard_mode(raw, self.guesses.as_slice())?;
        }

        let guess = self.puzzle.answer().evaluate(raw)?;
        if !self.guesses.push(guess.clone()) {
            return Err(GameError::TooManyAttempts {
                attempts: self.attempts(),
            });
        }

        Ok(guess)
    }

    pub fn snapshot(&self, hard_mode: bool) -> GameSnapshot {
        GameSnapshot {
            solution: self.puzzle.answer().to_string(),
            guesses: self.guesses.words(),
            hard_mode,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GameOptions {
    pub limit: GuessesLimit,
    /// Only the latest puzzle touches statistics.
    pub is_latest: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            limit: GuessesLimit::default(),
            is_latest: true,
        }
    }
}

/// Store writes that failed during an operation. Gameplay carries on regardless.
#[derive(Debug, Default)]
pub struct PersistReport {
    failures: Vec<StoreError>,
}

impl PersistReport {
    fn record(&mut self, record: &'static str, result: Result<(), StoreError>) {
        if let Err(err) = result {
            warn!(record, %err, "failed to persist");
            self.failures.push(err);
        }
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[StoreError] {
        &self.failures
    }
}

#[derive(Debug)]
pub struct Submission {
    pub guess: Guess,
    pub outcome: Outcome,
    /// The finished outcome, if this guess ended the game and the stats took it.
    pub stats_recorded: Option<Outcome>,
    pub persist: PersistReport,
}

/// A game bound to a store: every accepted guess is saved straight away.
#[derive(Debug)]
pub struct Game<S> {
    state: GameState,
    /// Fixed once the first guess is in, whatever the preferences say later.
    hard_mode: bool,
    preferences: Preferences,
    is_latest: bool,
    store: S,
}

impl<S: PersistenceGateway> Game<S> {
    /// Picks up the saved game for `puzzle` if there is one that still fits it.
    ///
    /// A started game keeps the hard mode it was saved with. Anything else takes it from
    /// the preferences.
    #[instrument(skip_all, fields(number = puzzle.number, is_latest = options.is_latest))]
    pub fn load(puzzle: DailyPuzzle, options: GameOptions, store: S) -> Result<Self, StoreError> {
        let slot = SnapshotSlot::for_latest(options.is_latest);
        let preferences = store.load_preferences()?.unwrap_or_default();

        let (state, hard_mode) = match store.load_game(slot)? {
            Some(snapshot) => match GameState::replay(&puzzle, options.limit, &snapshot) {
                Ok(state) if state.attempts() > 0 => (state, snapshot.hard_mode),
                Ok(state) => (state, preferences.hard_mode),
                Err(stale) => {
                    debug!(%stale, "discarding saved game");
                    (GameState::new(puzzle, options.limit), preferences.hard_mode)
                }
            },
            None => (GameState::new(puzzle, options.limit), preferences.hard_mode),
        };

        debug!(attempts = state.attempts(), hard_mode, "loaded game");

        Ok(Self {
            state,
            hard_mode,
            preferences,
            is_latest: options.is_latest,
            store,
        })
    }

    #[instrument(skip(self, stats), fields(number = self.state.puzzle.number))]
    pub fn submit_guess(
        &mut self,
        raw: &str,
        stats: &mut GameStats,
    ) -> Result<Submission, GameError> {
        let guess = self.state.submit(raw, self.hard_mode)?;
        let outcome = self.state.outcome();

        let mut persist = PersistReport::default();
        let mut stats_recorded = None;

        if outcome.is_terminal() {
            info!(?outcome, attempts = self.state.attempts(), "game over");

            if self.is_latest {
                match outcome {
                    Outcome::Won => stats.record_win(self.state.attempts()),
                    _ => stats.record_loss(),
                }

                stats_recorded = Some(outcome);
                persist.record("stats", self.store.save_stats(stats));
            } else {
                debug!("back-dated puzzle, stats untouched");
            }
        }

        persist.record(
            "game",
            self.store
                .save_game(self.slot(), &self.state.snapshot(self.hard_mode)),
        );

        Ok(Submission {
            guess,
            outcome,
            stats_recorded,
            persist,
        })
    }

    /// Turns hard mode on or off for this game, and for games started after it. Only
    /// allowed before the first guess, unless nothing would change.
    ///
    /// Other games that already have guesses keep their own setting.
    pub fn set_hard_mode(&mut self, enabled: bool) -> Result<PersistReport, GameError> {
        if enabled != self.hard_mode && self.state.attempts() > 0 {
            return Err(GameError::HardModeLocked);
        }

        self.hard_mode = enabled;
        self.preferences.hard_mode = enabled;
        Ok(self.save_preferences())
    }

    pub fn set_high_contrast(&mut self, enabled: bool) -> PersistReport {
        self.preferences.high_contrast = enabled;
        self.save_preferences()
    }

    fn save_preferences(&mut self) -> PersistReport {
        let mut persist = PersistReport::default();
        persist.record("preferences", self.store.save_preferences(&self.preferences));

        persist
    }
}

impl<S> Game<S> {
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn outcome(&self) -> Outcome {
        self.state.outcome()
    }

    pub fn hard_mode(&self) -> bool {
        self.hard_mode
    }

    pub fn palette(&self) -> Palette {
        if self.preferences.high_contrast {
            Palette::HighContrast
        } else {
            Palette::Standard
        }
    }

    pub fn is_latest(&self) -> bool {
        self.is_latest
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Best state seen for each letter guessed so far, for colouring a keyboard.
    pub fn letter_states(&self) -> LetterStates {
        self.state.guesses.letter_states()
    }

    pub fn emoji_grid(&self) -> String {
        self.state.guesses.emoji(self.palette()).into_owned()
    }

    /// Spoiler-free summary of the game, e.g. `Guessle 12 4/6*` above the emoji grid.
    pub fn share_text(&self) -> String {
        let attempts = match self.outcome() {
            Outcome::Lost => "X".to_owned(),
            _ => self.state.attempts().to_string(),
        };

        format!(
            "Guessle {} {}/{}{}\n\n{}",
            self.state.puzzle.number,
            attempts,
            self.state.guesses.limit(),
            if self.hard_mode() { "*" } else { "" },
            self.emoji_grid()
        )
    }

    fn slot(&self) -> SnapshotSlot {
        SnapshotSlot::for_latest(self.is_latest)
    }
}
