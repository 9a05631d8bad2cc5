//! Training methods and their decomposed storage form.
//!
//! `TrainingMethod` is a closed set of execution styles. Storage layers that
//! cannot persist an enum with payloads go through [`MethodRecord`] instead,
//! via [`decompose`] and [`reconstruct`].

use crate::ValidationError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const STANDARD_TAG: &str = "standard";
pub const REST_PAUSE_TAG: &str = "rest_pause";
pub const TIMED_TAG: &str = "timed";

/// Reps used when a record cannot be decoded at all.
pub const FALLBACK_REPS: i32 = 10;

const DEFAULT_REST_PAUSE_TARGET: i32 = 50;
const DEFAULT_REST_PAUSE_MIN: i32 = 5;
const DEFAULT_REST_PAUSE_MAX: i32 = 10;
const DEFAULT_TIMED_SECONDS: i32 = 30;

/// How an exercise is performed.
///
/// Values are not checked on construction; use [`TrainingMethod::is_valid`]
/// or [`TrainingMethod::validate`] before trusting one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrainingMethod {
    /// Straight sets within a rep range
    Standard { min_reps: i32, max_reps: i32 },
    /// Mini-sets to near failure until a cumulative rep target is reached
    RestPause {
        target_total: i32,
        min_reps: i32,
        max_reps: i32,
    },
    /// Isometric or conditioning hold for a fixed time
    Timed { seconds: i32 },
}

impl Default for TrainingMethod {
    fn default() -> Self {
        TrainingMethod::Standard {
            min_reps: FALLBACK_REPS,
            max_reps: FALLBACK_REPS,
        }
    }
}

impl TrainingMethod {
    pub fn standard(min_reps: i32, max_reps: i32) -> Self {
        TrainingMethod::Standard { min_reps, max_reps }
    }

    pub fn rest_pause(target_total: i32, min_reps: i32, max_reps: i32) -> Self {
        TrainingMethod::RestPause {
            target_total,
            min_reps,
            max_reps,
        }
    }

    pub fn timed(seconds: i32) -> Self {
        TrainingMethod::Timed { seconds }
    }

    /// Storage tag for this variant
    pub fn tag(&self) -> &'static str {
        match self {
            TrainingMethod::Standard { .. } => STANDARD_TAG,
            TrainingMethod::RestPause { .. } => REST_PAUSE_TAG,
            TrainingMethod::Timed { .. } => TIMED_TAG,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check the per-variant validity rule, reporting the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match *self {
            TrainingMethod::Standard { min_reps, max_reps } => check_rep_range(min_reps, max_reps),
            TrainingMethod::RestPause {
                target_total,
                min_reps,
                max_reps,
            } => {
                if target_total <= 0 {
                    return Err(ValidationError::NonPositiveTarget { target_total });
                }
                check_rep_range(min_reps, max_reps)?;
                if target_total < max_reps {
                    return Err(ValidationError::TargetBelowMax {
                        target_total,
                        max_reps,
                    });
                }
                Ok(())
            }
            TrainingMethod::Timed { seconds } => {
                if seconds > 0 {
                    Ok(())
                } else {
                    Err(ValidationError::NonPositiveSeconds { seconds })
                }
            }
        }
    }

    /// Rep count a duration estimate should assume for rep-based methods.
    ///
    /// Standard sets use the midpoint of the range; rest-pause uses the
    /// cumulative target. Timed holds have no reps.
    pub fn representative_reps(&self) -> Option<f64> {
        match *self {
            TrainingMethod::Standard { min_reps, max_reps } => {
                Some((min_reps as f64 + max_reps as f64) / 2.0)
            }
            TrainingMethod::RestPause { target_total, .. } => Some(target_total as f64),
            TrainingMethod::Timed { .. } => None,
        }
    }
}

fn check_rep_range(min_reps: i32, max_reps: i32) -> Result<(), ValidationError> {
    if min_reps <= 0 || max_reps <= 0 {
        return Err(ValidationError::NonPositiveReps { min_reps, max_reps });
    }
    if min_reps > max_reps {
        return Err(ValidationError::InvertedRepRange { min_reps, max_reps });
    }
    Ok(())
}

impl fmt::Display for TrainingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingMethod::Standard { min_reps, max_reps } if min_reps == max_reps => {
                write!(f, "{} reps", min_reps)
            }
            TrainingMethod::Standard { min_reps, max_reps } => {
                write!(f, "{}-{} reps", min_reps, max_reps)
            }
            TrainingMethod::RestPause {
                target_total,
                min_reps,
                max_reps,
            } => write!(
                f,
                "rest-pause {} total ({}-{} per set)",
                target_total, min_reps, max_reps
            ),
            TrainingMethod::Timed { seconds } => write!(f, "{}s hold", seconds),
        }
    }
}

// ============================================================================
// Decomposed storage
// ============================================================================

/// Flat, fixed-width projection of a [`TrainingMethod`].
///
/// Fields a variant does not use are left `None`. Decoding never fails on a
/// damaged column: a non-string `kind` becomes an empty (unknown) tag and a
/// non-integer count becomes `None`, leaving the decision to [`reconstruct`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodRecord {
    #[serde(default, deserialize_with = "lenient_tag")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub min_reps: Option<i32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub max_reps: Option<i32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub seconds: Option<i32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub target_total: Option<i32>,
}

fn lenient_tag<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(tag) => Ok(tag),
        other => {
            tracing::warn!("Malformed training method tag {}, treating as unknown", other);
            Ok(String::new())
        }
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match value.as_i64().and_then(|n| i32::try_from(n).ok()) {
        Some(n) => Ok(Some(n)),
        None => {
            tracing::warn!("Malformed training method column {}, using default", value);
            Ok(None)
        }
    }
}

/// Project a method into its storage record.
pub fn decompose(method: &TrainingMethod) -> MethodRecord {
    let mut record = MethodRecord {
        kind: method.tag().to_string(),
        ..MethodRecord::default()
    };

    match *method {
        TrainingMethod::Standard { min_reps, max_reps } => {
            record.min_reps = Some(min_reps);
            record.max_reps = Some(max_reps);
        }
        TrainingMethod::RestPause {
            target_total,
            min_reps,
            max_reps,
        } => {
            record.target_total = Some(target_total);
            record.min_reps = Some(min_reps);
            record.max_reps = Some(max_reps);
        }
        TrainingMethod::Timed { seconds } => {
            record.seconds = Some(seconds);
        }
    }

    record
}

/// Rebuild a method from its storage record.
///
/// Missing fields take per-tag defaults. An unrecognised tag does not fail:
/// it decodes to `Standard { 10, 10 }` and logs a warning, so a damaged row
/// loses its method rather than the whole workout.
pub fn reconstruct(record: &MethodRecord) -> TrainingMethod {
    match record.kind.as_str() {
        STANDARD_TAG => TrainingMethod::Standard {
            min_reps: record.min_reps.unwrap_or(FALLBACK_REPS),
            max_reps: record.max_reps.unwrap_or(FALLBACK_REPS),
        },
        REST_PAUSE_TAG => TrainingMethod::RestPause {
            target_total: record.target_total.unwrap_or(DEFAULT_REST_PAUSE_TARGET),
            min_reps: record.min_reps.unwrap_or(DEFAULT_REST_PAUSE_MIN),
            max_reps: record.max_reps.unwrap_or(DEFAULT_REST_PAUSE_MAX),
        },
        TIMED_TAG => TrainingMethod::Timed {
            seconds: record.seconds.unwrap_or(DEFAULT_TIMED_SECONDS),
        },
        other => {
            tracing::warn!(
                "Unknown training method tag '{}', falling back to standard {}x{}",
                other,
                FALLBACK_REPS,
                FALLBACK_REPS
            );
            TrainingMethod::default()
        }
    }
}

impl From<&TrainingMethod> for MethodRecord {
    fn from(method: &TrainingMethod) -> Self {
        decompose(method)
    }
}

impl From<&MethodRecord> for TrainingMethod {
    fn from(record: &MethodRecord) -> Self {
        reconstruct(record)
    }
}
