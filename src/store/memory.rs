use std::collections::HashMap;

use super::{GameSnapshot, PersistenceGateway, Preferences, SnapshotSlot, StoreError};
use crate::stats::GameStats;

/// Keeps every record in memory. Useful for embedding and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    games: HashMap<SnapshotSlot, GameSnapshot>,
    stats: Option<GameStats>,
    preferences: Option<Preferences>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistenceGateway for MemoryStore {
    fn load_game(&self, slot: SnapshotSlot) -> Result<Option<GameSnapshot>, StoreError> {
        Ok(self.games.get(&slot).cloned())
    }

    fn save_game(&mut self, slot: SnapshotSlot, snapshot: &GameSnapshot) -> Result<(), StoreError> {
        self.games.insert(slot, snapshot.clone());
        Ok(())
    }

    fn load_stats(&self) -> Result<Option<GameStats>, StoreError> {
        Ok(self.stats.clone())
    }

    fn save_stats(&mut self, stats: &GameStats) -> Result<(), StoreError> {
        self.stats = Some(stats.clone());
        Ok(())
    }

    fn load_preferences(&self) -> Result<Option<Preferences>, StoreError> {
        Ok(self.preferences)
    }

    fn save_preferences(&mut self, preferences: &Preferences) -> Result<(), StoreError> {
        self.preferences = Some(*preferences);
        Ok(())
    }
}
