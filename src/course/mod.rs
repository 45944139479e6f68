pub mod catalog;
pub mod loader;
pub mod types;

pub use catalog::{CatalogError, CourseCatalog, CourseError};
pub use loader::load_course;
pub use types::{Act, ActId, Level, LevelId, Quiz, QuizOption};
