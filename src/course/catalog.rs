use thiserror::Error;

use super::types::{Act, ActId, Level, LevelId};

/// Problems with the course dataset itself, found when the catalog is built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CourseError {
    #[error("course has no levels")]
    Empty,

    #[error("level ids must run 1..={expected_last} without gaps, found {found:?}")]
    NonContiguousIds {
        expected_last: LevelId,
        found: Vec<LevelId>,
    },

    #[error("level {0} has a quiz with no options")]
    NoOptions(LevelId),

    #[error("level {level} quiz must have exactly one correct option, found {correct}")]
    CorrectOptionCount { level: LevelId, correct: usize },

    #[error("level {level} belongs to unknown act {act}")]
    UnknownAct { level: LevelId, act: ActId },
}

/// Failed lookups against a valid catalog.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CatalogError {
    #[error("level {0} not found")]
    UnknownLevel(LevelId),

    #[error("option {index} out of range for level {level} ({len} options)")]
    OptionOutOfRange {
        level: LevelId,
        index: usize,
        len: usize,
    },
}

/// Ordered, read-only set of levels. Construction guarantees ids are exactly
/// `1..=N` and every quiz has one correct option.
#[derive(Debug, Clone)]
pub struct CourseCatalog {
    levels: Vec<Level>,
    acts: Vec<Act>,
}

impl CourseCatalog {
    pub fn new(mut levels: Vec<Level>, acts: Vec<Act>) -> Result<Self, CourseError> {
        if levels.is_empty() {
            return Err(CourseError::Empty);
        }

        levels.sort_by_key(Level::id);
        let contiguous = levels
            .iter()
            .enumerate()
            .all(|(i, l)| l.id() as usize == i + 1);
        if !contiguous {
            return Err(CourseError::NonContiguousIds {
                expected_last: levels.len() as LevelId,
                found: levels.iter().map(Level::id).collect(),
            });
        }

        for level in &levels {
            if level.quiz.options.is_empty() {
                return Err(CourseError::NoOptions(level.id()));
            }
            let correct = level.quiz.options.iter().filter(|o| o.correct).count();
            if correct != 1 {
                return Err(CourseError::CorrectOptionCount {
                    level: level.id(),
                    correct,
                });
            }
            if !acts.iter().any(|a| a.id == level.act()) {
                return Err(CourseError::UnknownAct {
                    level: level.id(),
                    act: level.act(),
                });
            }
        }

        let mut acts = acts;
        acts.sort_by_key(|a| a.id);

        Ok(CourseCatalog { levels, acts })
    }

    pub fn level_exists(&self, id: LevelId) -> bool {
        id >= 1 && (id as usize) <= self.levels.len()
    }

    pub fn level(&self, id: LevelId) -> Result<&Level, CatalogError> {
        if !self.level_exists(id) {
            return Err(CatalogError::UnknownLevel(id));
        }
        Ok(&self.levels[id as usize - 1])
    }

    /// `None` means `id` is the last level (or unknown): the course is complete.
    pub fn next_level_id(&self, id: LevelId) -> Option<LevelId> {
        let next = id.checked_add(1)?;
        self.level_exists(next).then_some(next)
    }

    pub fn total_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn is_last_level(&self, id: LevelId) -> bool {
        id as usize == self.levels.len()
    }

    pub fn check_answer(
        &self,
        level_id: LevelId,
        option_index: usize,
    ) -> Result<bool, CatalogError> {
        let level = self.level(level_id)?;
        let option = level
            .quiz
            .options
            .get(option_index)
            .ok_or(CatalogError::OptionOutOfRange {
                level: level_id,
                index: option_index,
                len: level.quiz.options.len(),
            })?;
        Ok(option.correct)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn acts(&self) -> &[Act] {
        &self.acts
    }

    pub fn act(&self, id: ActId) -> Option<&Act> {
        self.acts.iter().find(|a| a.id == id)
    }

    pub fn levels_in_act(&self, act: ActId) -> impl Iterator<Item = &Level> {
        self.levels.iter().filter(move |l| l.act() == act)
    }
}
