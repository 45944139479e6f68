//! Money Quest: a gamified personal-finance course.
//!
//! [`course`] holds the read-only level catalog; [`progress`] owns the
//! learner's save state and its persistence. The terminal front-end in the
//! binary is one consumer of these; any other view layer can drive the same
//! store.

pub mod app;
pub mod config;
pub mod course;
pub mod logging;
pub mod progress;
pub mod ui;
