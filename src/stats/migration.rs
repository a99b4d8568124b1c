use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument};

use super::ForeignStats;
use crate::{
    store::{GameSnapshot, PersistenceGateway, SnapshotSlot, StoreError},
    wordle::{DailyPuzzle, GameState, GuessesLimit, Outcome},
};

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("migration code is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("migration code does not hold a stats record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything moved between installs: the stats and, optionally, the game in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationRecord {
    pub statistics: ForeignStats,
    #[serde(default)]
    pub game_state: Option<GameSnapshot>,
}

/// What [`MigrationRecord::restore_game`] did with the record's game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameRestore {
    /// The record carried no game.
    Absent,
    Restored,
    /// Today's local game already has guesses, so the record's game was dropped.
    KeptLocal,
}

impl MigrationRecord {
    /// Saves the record's game as the latest one, unless the latest game saved locally
    /// has already started on `today`'s puzzle.
    ///
    /// Overwriting a started game would throw away its guesses, or let a finished one
    /// be played and counted a second time.
    #[instrument(level = "debug", skip_all, fields(number = today.number))]
    pub fn restore_game<S: PersistenceGateway>(
        &self,
        store: &mut S,
        today: &DailyPuzzle,
        limit: GuessesLimit,
    ) -> Result<GameRestore, StoreError> {
        let Some(ref game) = self.game_state else {
            return Ok(GameRestore::Absent);
        };

        let local = store
            .load_game(SnapshotSlot::Latest)?
            .and_then(|local| GameState::replay(today, limit, &local).ok())
            .map_or(Outcome::NotStarted, |state| state.outcome());

        if local != Outcome::NotStarted {
            info!(?local, "keeping the local game");
            return Ok(GameRestore::KeptLocal);
        }

        store.save_game(SnapshotSlot::Latest, game)?;
        debug!(guesses = game.guesses.len(), "restored game");

        Ok(GameRestore::Restored)
    }

    /// Base64 of the record's JSON, short enough to paste between devices.
    pub fn encode(&self) -> Result<String, MigrationError> {
        Ok(STANDARD.encode(serde_json::to_vec(self)?))
    }

    #[instrument(level = "debug", skip(code), fields(len = code.len()))]
    pub fn decode(code: &str) -> Result<Self, MigrationError> {
        let bytes = STANDARD.decode(code.trim())?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
