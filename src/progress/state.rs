use std::collections::BTreeSet;

use thiserror::Error;

use crate::course::{CourseCatalog, LevelId};

/// Wealth granted the first time a level is completed.
pub const COMPLETION_REWARD: u64 = 1000;

/// The learner's save state. Only the progress store mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionState {
    pub(crate) unlocked: BTreeSet<LevelId>,
    pub(crate) completed: BTreeSet<LevelId>,
    pub(crate) wealth: u64,
}

impl Default for ProgressionState {
    fn default() -> Self {
        ProgressionState {
            unlocked: BTreeSet::from([1]),
            completed: BTreeSet::new(),
            wealth: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStatus {
    Locked,
    /// Unlocked but not yet completed.
    Available,
    Completed,
}

/// What a successful completion changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub level: LevelId,
    pub first_time: bool,
    pub reward: u64,
    pub unlocked: Option<LevelId>,
}

/// A broken state invariant. Reported when a loaded snapshot is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidState {
    #[error("level 1 is not unlocked")]
    FirstLevelLocked,

    #[error("level {0} is not in the course")]
    UnknownLevel(LevelId),

    #[error("level {0} is completed but not unlocked")]
    CompletedWhileLocked(LevelId),

    #[error("level {0} is unlocked but its predecessor is not completed")]
    UnlockedOutOfOrder(LevelId),

    #[error("level {0} is completed but the level after it is locked")]
    SuccessorLocked(LevelId),

    #[error("wealth {wealth} does not match {completed} completed levels")]
    WealthMismatch { wealth: u64, completed: usize },
}

impl ProgressionState {
    pub fn new(
        unlocked: impl IntoIterator<Item = LevelId>,
        completed: impl IntoIterator<Item = LevelId>,
        wealth: u64,
    ) -> Self {
        ProgressionState {
            unlocked: unlocked.into_iter().collect(),
            completed: completed.into_iter().collect(),
            wealth,
        }
    }

    pub fn unlocked_levels(&self) -> &BTreeSet<LevelId> {
        &self.unlocked
    }

    pub fn completed_levels(&self) -> &BTreeSet<LevelId> {
        &self.completed
    }

    pub fn wealth(&self) -> u64 {
        self.wealth
    }

    pub fn is_unlocked(&self, id: LevelId) -> bool {
        self.unlocked.contains(&id)
    }

    pub fn is_completed(&self, id: LevelId) -> bool {
        self.completed.contains(&id)
    }

    pub fn status(&self, id: LevelId) -> LevelStatus {
        if self.is_completed(id) {
            LevelStatus::Completed
        } else if self.is_unlocked(id) {
            LevelStatus::Available
        } else {
            LevelStatus::Locked
        }
    }

    /// Completed share of the course, in `0.0..=1.0`.
    pub fn completion_ratio(&self, total_levels: usize) -> f64 {
        if total_levels == 0 {
            return 0.0;
        }
        self.completed.len() as f64 / total_levels as f64
    }

    /// Applies a completion of `id`. The caller has already checked that
    /// `id` exists and is unlocked.
    pub(crate) fn complete(&mut self, id: LevelId, catalog: &CourseCatalog) -> Completion {
        debug_assert!(catalog.level_exists(id), "completing unknown level {id}");
        debug_assert!(self.is_unlocked(id), "completing locked level {id}");

        let first_time = self.completed.insert(id);
        let reward = if first_time { COMPLETION_REWARD } else { 0 };
        self.wealth += reward;

        let mut unlocked = None;
        if let Some(next) = catalog.next_level_id(id) {
            if self.unlocked.insert(next) {
                unlocked = Some(next);
            }
        }

        Completion {
            level: id,
            first_time,
            reward,
            unlocked,
        }
    }

    /// Checks every progression invariant against `catalog`.
    pub fn validate(&self, catalog: &CourseCatalog) -> Result<(), InvalidState> {
        if !self.unlocked.contains(&1) {
            return Err(InvalidState::FirstLevelLocked);
        }
        if let Some(&id) = self
            .unlocked
            .iter()
            .chain(&self.completed)
            .find(|id| !catalog.level_exists(**id))
        {
            return Err(InvalidState::UnknownLevel(id));
        }
        if let Some(&id) = self.completed.difference(&self.unlocked).next() {
            return Err(InvalidState::CompletedWhileLocked(id));
        }
        if let Some(&id) = self
            .unlocked
            .iter()
            .find(|&&id| id != 1 && !self.completed.contains(&(id - 1)))
        {
            return Err(InvalidState::UnlockedOutOfOrder(id));
        }
        if let Some(&id) = self.completed.iter().find(|&&id| {
            catalog
                .next_level_id(id)
                .is_some_and(|next| !self.unlocked.contains(&next))
        }) {
            return Err(InvalidState::SuccessorLocked(id));
        }
        if self.wealth != COMPLETION_REWARD * self.completed.len() as u64 {
            return Err(InvalidState::WealthMismatch {
                wealth: self.wealth,
                completed: self.completed.len(),
            });
        }
        Ok(())
    }
}
