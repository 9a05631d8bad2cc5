//! Error types for the workout_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for workout_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A training method was rejected at a boundary that chose to validate it
    #[error("Invalid training method: {0}")]
    Validation(#[from] ValidationError),

    /// No entity with the given id (or id prefix) exists
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// An id prefix matched more than one entity
    #[error("{kind} prefix '{prefix}' is ambiguous")]
    Ambiguous { kind: &'static str, prefix: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Why a training method failed its validity predicate.
///
/// The domain model never produces this on its own; it is only returned by
/// [`crate::TrainingMethod::validate`] for callers that want to block a save.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("rep counts must be positive (got {min_reps}-{max_reps})")]
    NonPositiveReps { min_reps: i32, max_reps: i32 },

    #[error("minimum reps {min_reps} exceed maximum reps {max_reps}")]
    InvertedRepRange { min_reps: i32, max_reps: i32 },

    #[error("rest-pause target must be positive (got {target_total})")]
    NonPositiveTarget { target_total: i32 },

    #[error("rest-pause target {target_total} is below the rep ceiling {max_reps}")]
    TargetBelowMax { target_total: i32, max_reps: i32 },

    #[error("timed hold must last a positive number of seconds (got {seconds})")]
    NonPositiveSeconds { seconds: i32 },
}
