use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stats::GameStats;

mod json_file;
pub use json_file::JsonFileStore;

mod memory;
pub use memory::MemoryStore;

/// What gets saved of a game: the solution it belongs to and the raw guesses made so
/// far. Letter states are worked out again on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub solution: String,
    pub guesses: Vec<String>,
    /// Whether this game is being played in hard mode.
    #[serde(default)]
    pub hard_mode: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Picked up by games that haven't had a guess yet.
    pub hard_mode: bool,
    pub high_contrast: bool,
}

/// Today's game and back-dated games are saved separately, so playing an old puzzle
/// doesn't clobber today's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotSlot {
    Latest,
    Archive,
}

impl SnapshotSlot {
    pub fn for_latest(is_latest: bool) -> Self {
        if is_latest {
            Self::Latest
        } else {
            Self::Archive
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),

    /// For stores backed by something other than files.
    #[error("store error: {0}")]
    Other(String),
}

pub trait PersistenceGateway {
    fn load_game(&self, slot: SnapshotSlot) -> Result<Option<GameSnapshot>, StoreError>;
    fn save_game(&mut self, slot: SnapshotSlot, snapshot: &GameSnapshot) -> Result<(), StoreError>;

    fn load_stats(&self) -> Result<Option<GameStats>, StoreError>;
    fn save_stats(&mut self, stats: &GameStats) -> Result<(), StoreError>;

    fn load_preferences(&self) -> Result<Option<Preferences>, StoreError>;
    fn save_preferences(&mut self, preferences: &Preferences) -> Result<(), StoreError>;
}

impl<T: PersistenceGateway + ?Sized> PersistenceGateway for &mut T {
    fn load_game(&self, slot: SnapshotSlot) -> Result<Option<GameSnapshot>, StoreError> {
        (**self).load_game(slot)
    }

    fn save_game(&mut self, slot: SnapshotSlot, snapshot: &GameSnapshot) -> Result<(), StoreError> {
        (**self).save_game(slot, snapshot)
    }

    fn load_stats(&self) -> Result<Option<GameStats>, StoreError> {
        (**self).load_stats()
    }

    fn save_stats(&mut self, stats: &GameStats) -> Result<(), StoreError> {
        (**self).save_stats(stats)
    }

    fn load_preferences(&self) -> Result<Option<Preferences>, StoreError> {
        (**self).load_preferences()
    }

    fn save_preferences(&mut self, preferences: &Preferences) -> Result<(), StoreError> {
        (**self).save_preferences(preferences)
    }
}
