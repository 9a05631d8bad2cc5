#![forbid(unsafe_code)]

//! Core domain model for the workout builder.
//!
//! This crate provides:
//! - The `Workout -> Interval -> Exercise` tree and its training methods
//! - Duration estimation
//! - Decomposed storage records and a JSON-file store with cascade delete
//! - The built-in exercise library
//! - CSV export, configuration and logging setup

pub mod error;
pub mod tempo;
pub mod method;
pub mod exercise;
pub mod interval;
pub mod workout;
pub mod duration;
pub mod library;
pub mod store;
pub mod export;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result, ValidationError};
pub use tempo::Tempo;
pub use method::{decompose, reconstruct, MethodRecord, TrainingMethod};
pub use exercise::{Exercise, ExerciseRecord};
pub use interval::{Interval, IntervalRecord};
pub use workout::{Workout, WorkoutRecord, DEFAULT_WORKOUT_NAME};
pub use duration::estimate_total_seconds;
pub use library::{default_library, LibraryEntry, MuscleGroup};
pub use store::{JsonFileStore, Tables, WorkoutRepository};
pub use export::{export_workout_csv, export_workout_csv_to};
pub use config::Config;
