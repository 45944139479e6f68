pub mod attempt;
pub mod slot;
pub mod snapshot;
pub mod state;
pub mod store;

pub use attempt::{AttemptError, AttemptOutcome, AttemptPhase, LevelAttempt};
pub use slot::{FileSlot, MemorySlot, SaveSlot};
pub use state::{Completion, LevelStatus, ProgressionState, COMPLETION_REWARD};
pub use store::{ProgressError, ProgressStore};
