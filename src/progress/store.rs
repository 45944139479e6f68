use std::io;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::slot::SaveSlot;
use super::snapshot;
use super::state::{Completion, LevelStatus, ProgressionState};
use crate::course::{CourseCatalog, LevelId};

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("level {0} not found")]
    UnknownLevel(LevelId),

    #[error("level {0} is locked")]
    LevelLocked(LevelId),

    #[error("failed to save progress: {0}")]
    Storage(#[from] io::Error),
}

/// Sole owner of the learner's progression. Every mutation is written to the
/// save slot before it becomes visible in memory.
pub struct ProgressStore<S: SaveSlot> {
    catalog: Arc<CourseCatalog>,
    slot: S,
    state: ProgressionState,
}

impl<S: SaveSlot> ProgressStore<S> {
    /// Opens the store, restoring whatever the slot holds.
    pub fn open(catalog: Arc<CourseCatalog>, slot: S) -> Self {
        let mut store = ProgressStore {
            catalog,
            slot,
            state: ProgressionState::default(),
        };
        store.state = store.load_progress();
        store
    }

    /// Reads the slot. Never fails: an empty, unreadable or invalid save
    /// yields the fresh-start state.
    pub fn load_progress(&self) -> ProgressionState {
        let contents = match self.slot.read() {
            Ok(Some(contents)) => contents,
            Ok(None) => {
                debug!("no saved progress, starting fresh");
                return ProgressionState::default();
            }
            Err(e) => {
                warn!(error = %e, "could not read saved progress, starting fresh");
                return ProgressionState::default();
            }
        };

        match snapshot::decode(&contents, &self.catalog) {
            Ok(state) => {
                info!(
                    completed = state.completed.len(),
                    wealth = state.wealth,
                    "restored saved progress"
                );
                state
            }
            Err(e) => {
                warn!(error = %e, "discarding corrupt save, starting fresh");
                ProgressionState::default()
            }
        }
    }

    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    pub fn catalog(&self) -> &CourseCatalog {
        &self.catalog
    }

    pub fn status(&self, id: LevelId) -> LevelStatus {
        self.state.status(id)
    }

    /// Records a correct answer for `id`: rewards the first completion and
    /// unlocks the following level. Unknown and locked levels are rejected
    /// without touching state or storage.
    pub fn complete_level(&mut self, id: LevelId) -> Result<Completion, ProgressError> {
        if !self.catalog.level_exists(id) {
            debug!(level = id, "rejecting completion of unknown level");
            return Err(ProgressError::UnknownLevel(id));
        }
        if !self.state.is_unlocked(id) {
            debug!(level = id, "rejecting completion of locked level");
            return Err(ProgressError::LevelLocked(id));
        }

        let mut next = self.state.clone();
        let completion = next.complete(id, &self.catalog);
        self.commit(next)?;

        if completion.first_time {
            info!(
                level = id,
                reward = completion.reward,
                wealth = self.state.wealth,
                unlocked = ?completion.unlocked,
                "level completed"
            );
        }
        Ok(completion)
    }

    pub fn reset_progress(&mut self) -> Result<(), ProgressError> {
        self.commit(ProgressionState::default())?;
        info!("progress reset");
        Ok(())
    }

    fn commit(&mut self, next: ProgressionState) -> Result<(), ProgressError> {
        let contents = snapshot::encode(&next).map_err(io::Error::from)?;
        self.slot.write(&contents)?;
        self.state = next;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn slot(&self) -> &S {
        &self.slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::catalog::test_support::catalog;
    use crate::progress::slot::MemorySlot;
    use std::collections::BTreeSet;

    fn fresh(levels: u32) -> ProgressStore<MemorySlot> {
        ProgressStore::open(Arc::new(catalog(levels)), MemorySlot::default())
    }

    /// Accepts reads, fails every write.
    struct ReadOnlySlot(Option<String>);

    impl SaveSlot for ReadOnlySlot {
        fn read(&self) -> io::Result<Option<String>> {
            Ok(self.0.clone())
        }

        fn write(&mut self, _: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    /// Fails every read.
    struct BrokenSlot;

    impl SaveSlot for BrokenSlot {
        fn read(&self) -> io::Result<Option<String>> {
            Err(io::Error::other("disk on fire"))
        }

        fn write(&mut self, _: &str) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn first_completion() {
        let mut store = fresh(12);
        let completion = store.complete_level(1).unwrap();
        assert_eq!(completion.reward, 1000);
        assert_eq!(store.state().completed_levels(), &BTreeSet::from([1]));
        assert_eq!(store.state().unlocked_levels(), &BTreeSet::from([1, 2]));
        assert_eq!(store.state().wealth(), 1000);
    }

    #[test]
    fn repeat_completion_is_idempotent() {
        let mut store = fresh(12);
        store.complete_level(1).unwrap();
        let after_first = store.state().clone();
        let second = store.complete_level(1).unwrap();
        assert!(!second.first_time);
        assert_eq!(store.state(), &after_first);
        assert_eq!(store.state().wealth(), 1000);
    }

    #[test]
    fn last_level_unlocks_nothing() {
        let mut store = fresh(2);
        store.complete_level(1).unwrap();
        let completion = store.complete_level(2).unwrap();
        assert_eq!(completion.unlocked, None);
        assert_eq!(store.state().unlocked_levels(), &BTreeSet::from([1, 2]));
        assert_eq!(store.state().wealth(), 2000);
    }

    #[test]
    fn unknown_and_locked_levels_are_rejected() {
        let mut store = fresh(3);
        assert!(matches!(
            store.complete_level(0),
            Err(ProgressError::UnknownLevel(0))
        ));
        assert!(matches!(
            store.complete_level(4),
            Err(ProgressError::UnknownLevel(4))
        ));
        assert!(matches!(
            store.complete_level(2),
            Err(ProgressError::LevelLocked(2))
        ));
        assert_eq!(store.state(), &ProgressionState::default());
        assert_eq!(store.slot().contents(), None);
    }

    #[test]
    fn every_mutation_is_persisted() {
        let mut store = fresh(3);
        store.complete_level(1).unwrap();
        assert_eq!(&store.load_progress(), store.state());

        store.complete_level(2).unwrap();
        assert_eq!(&store.load_progress(), store.state());
    }

    #[test]
    fn reset_after_completions() {
        let mut store = fresh(5);
        for id in 1..=3 {
            store.complete_level(id).unwrap();
        }
        store.reset_progress().unwrap();
        assert_eq!(store.state(), &ProgressionState::default());
        assert_eq!(store.load_progress(), ProgressionState::default());
        assert!(store.state().is_unlocked(1));
    }

    #[test]
    fn reopening_restores_progress() {
        let catalog = Arc::new(catalog(4));
        let mut store = ProgressStore::open(catalog.clone(), MemorySlot::default());
        store.complete_level(1).unwrap();
        store.complete_level(2).unwrap();

        let slot = store.slot().clone();
        let reopened = ProgressStore::open(catalog, slot);
        assert_eq!(reopened.state(), &ProgressionState::new([1, 2, 3], [1, 2], 2000));
    }

    #[test]
    fn corrupt_save_starts_fresh() {
        let store = ProgressStore::open(
            Arc::new(catalog(3)),
            MemorySlot::with_contents(r#"{"wealth": "a lot"}"#),
        );
        assert_eq!(store.state(), &ProgressionState::default());

        let store = ProgressStore::open(Arc::new(catalog(3)), BrokenSlot);
        assert_eq!(store.state(), &ProgressionState::default());
    }

    #[test]
    fn failed_write_leaves_state_untouched() {
        let mut store = ProgressStore::open(Arc::new(catalog(3)), ReadOnlySlot(None));
        assert!(matches!(
            store.complete_level(1),
            Err(ProgressError::Storage(_))
        ));
        assert_eq!(store.state(), &ProgressionState::default());

        let saved = r#"{"unlockedLevels":[1,2],"completedLevels":[1],"wealth":1000}"#;
        let mut store = ProgressStore::open(Arc::new(catalog(3)), ReadOnlySlot(Some(saved.into())));
        assert!(store.reset_progress().is_err());
        assert_eq!(store.state().wealth(), 1000);
    }

    #[test]
    fn status_tracks_progress() {
        let mut store = fresh(3);
        assert_eq!(store.status(1), LevelStatus::Available);
        assert_eq!(store.status(2), LevelStatus::Locked);
        store.complete_level(1).unwrap();
        assert_eq!(store.status(1), LevelStatus::Completed);
        assert_eq!(store.status(2), LevelStatus::Available);
    }
}
