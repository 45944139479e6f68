use thiserror::Error;
use tracing::debug;

use super::slot::SaveSlot;
use super::state::Completion;
use super::store::{ProgressError, ProgressStore};
use crate::course::{CatalogError, LevelId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    Locked,
    Unlocked,
    Answering,
    /// Transient: the next submission or `retry` returns to `Answering`.
    WrongAnswer(usize),
    /// Terminal for this attempt.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Wrong,
    Correct(Completion),
    /// Submission after completion; nothing changed.
    Ignored,
}

#[derive(Debug, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// One pass through a level's quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelAttempt {
    level: LevelId,
    phase: AttemptPhase,
}

impl LevelAttempt {
    /// Starts an attempt. A level completed in an earlier session can be
    /// replayed; it starts `Unlocked` like any other open level.
    pub fn start<S: SaveSlot>(
        store: &ProgressStore<S>,
        level: LevelId,
    ) -> Result<Self, CatalogError> {
        store.catalog().level(level)?;
        let phase = if store.state().is_unlocked(level) {
            AttemptPhase::Unlocked
        } else {
            AttemptPhase::Locked
        };
        Ok(LevelAttempt { level, phase })
    }

    pub fn level(&self) -> LevelId {
        self.level
    }

    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    /// Unlocked -> Answering. No-op in any other phase.
    pub fn begin(&mut self) {
        if self.phase == AttemptPhase::Unlocked {
            self.phase = AttemptPhase::Answering;
        }
    }

    /// WrongAnswer -> Answering.
    pub fn retry(&mut self) {
        if let AttemptPhase::WrongAnswer(_) = self.phase {
            self.phase = AttemptPhase::Answering;
        }
    }

    /// Checks `option` and, if it is correct, completes the level in `store`.
    /// On error the phase is left as it was.
    pub fn submit<S: SaveSlot>(
        &mut self,
        store: &mut ProgressStore<S>,
        option: usize,
    ) -> Result<AttemptOutcome, AttemptError> {
        match self.phase {
            AttemptPhase::Completed => {
                debug!(level = self.level, option, "ignoring answer after completion");
                return Ok(AttemptOutcome::Ignored);
            }
            AttemptPhase::Locked => {
                return Err(ProgressError::LevelLocked(self.level).into());
            }
            AttemptPhase::Unlocked | AttemptPhase::Answering | AttemptPhase::WrongAnswer(_) => {}
        }

        if !store.catalog().check_answer(self.level, option)? {
            self.phase = AttemptPhase::WrongAnswer(option);
            return Ok(AttemptOutcome::Wrong);
        }

        let completion = store.complete_level(self.level)?;
        self.phase = AttemptPhase::Completed;
        Ok(AttemptOutcome::Correct(completion))
    }
}
