use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument};

use super::{GameSnapshot, PersistenceGateway, Preferences, SnapshotSlot, StoreError};
use crate::stats::GameStats;

/// Stores each record as a JSON file in one directory.
///
/// Writes go to a temporary file that is renamed over the old one, so a crash mid-write
/// leaves the previous record intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    #[instrument]
    pub fn open(dir: impl AsRef<Path> + std::fmt::Debug) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        debug!("opened store");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError> {
        match fs::read(self.path(name)) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        let path = self.path(name);
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, serde_json::to_vec_pretty(value)?)?;
        fs::rename(&tmp, &path)?;

        debug!(path = %path.display(), "wrote record");
        Ok(())
    }
}

fn game_record(slot: SnapshotSlot) -> &'static str {
    match slot {
        SnapshotSlot::Latest => "game-latest",
        SnapshotSlot::Archive => "game-archive",
    }
}

impl PersistenceGateway for JsonFileStore {
    fn load_game(&self, slot: SnapshotSlot) -> Result<Option<GameSnapshot>, StoreError> {
        self.read(game_record(slot))
    }

    fn save_game(&mut self, slot: SnapshotSlot, snapshot: &GameSnapshot) -> Result<(), StoreError> {
        self.write(game_record(slot), snapshot)
    }

    fn load_stats(&self) -> Result<Option<GameStats>, StoreError> {
        self.read("stats")
    }

    fn save_stats(&mut self, stats: &GameStats) -> Result<(), StoreError> {
        self.write("stats", stats)
    }

    fn load_preferences(&self) -> Result<Option<Preferences>, StoreError> {
        self.read("preferences")
    }

    fn save_preferences(&mut self, preferences: &Preferences) -> Result<(), StoreError> {
        self.write("preferences", preferences)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        path::PathBuf,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use pretty_assertions::assert_eq;

    use super::JsonFileStore;
    use crate::{
        stats::GameStats,
        store::{GameSnapshot, PersistenceGateway, Preferences, SnapshotSlot, StoreError},
    };

    fn temp_dir() -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);

        std::env::temp_dir().join(format!(
            "guessle-store-{}-{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ))
    }

    #[test]
    fn missing_records_are_none() {
        let dir = temp_dir();
        let store = JsonFileStore::open(&dir).unwrap();

        assert_eq!(store.load_game(SnapshotSlot::Latest).unwrap(), None);
        assert_eq!(store.load_stats().unwrap(), None);
        assert_eq!(store.load_preferences().unwrap(), None);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn records_survive_reopening() {
        let dir = temp_dir();
        let snapshot = GameSnapshot {
            solution: "crane".to_owned(),
            guesses: vec!["ghost".to_owned()],
            hard_mode: true,
        };
        let mut stats = GameStats::default();
        stats.record_win(3);

        {
            let mut store = JsonFileStore::open(&dir).unwrap();
            store.save_game(SnapshotSlot::Archive, &snapshot).unwrap();
            store.save_stats(&stats).unwrap();
            store
                .save_preferences(&Preferences {
                    hard_mode: true,
                    high_contrast: false,
                })
                .unwrap();
        }

        let store = JsonFileStore::open(&dir).unwrap();
        assert_eq!(store.load_game(SnapshotSlot::Archive).unwrap(), Some(snapshot));
        assert_eq!(store.load_game(SnapshotSlot::Latest).unwrap(), None);
        assert_eq!(store.load_stats().unwrap(), Some(stats));
        assert!(store.load_preferences().unwrap().unwrap().hard_mode);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn corrupt_records_are_errors() {
        let dir = temp_dir();
        let store = JsonFileStore::open(&dir).unwrap();
        fs::write(dir.join("stats.json"), "{ not json").unwrap();

        assert!(matches!(store.load_stats(), Err(StoreError::Json(_))));

        fs::remove_dir_all(dir).unwrap();
    }
}
