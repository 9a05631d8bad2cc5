//! A single movement inside an interval.

use crate::method::{self, MethodRecord};
use crate::{Tempo, TrainingMethod};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Effort assigned to a newly created exercise (RPE-style, nominally 1-10)
pub const DEFAULT_EFFORT: i32 = 7;

/// One movement instance owned by an [`crate::Interval`].
///
/// Fields are written directly by the caller and are not validated here:
/// an inverted rep range or an effort of 15 is representable.
#[derive(Clone, Debug)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub training_method: TrainingMethod,
    pub effort: i32,
    pub weight: Option<f64>,
    pub rest_after_seconds: Option<i32>,
    pub tempo: Option<Tempo>,
    pub notes: Option<String>,
    /// Position key assigned by the owning interval
    pub order_index: i64,
    pub last_used_at: Option<DateTime<Utc>>,
    pub use_count: u32,
}

impl Exercise {
    pub fn new(name: impl Into<String>, training_method: TrainingMethod) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            training_method,
            effort: DEFAULT_EFFORT,
            weight: None,
            rest_after_seconds: None,
            tempo: None,
            notes: None,
            order_index: 0,
            last_used_at: None,
            use_count: 0,
        }
    }

    /// Record that this exercise was just used.
    pub fn update_usage_stats(&mut self) {
        self.last_used_at = Some(Utc::now());
        self.use_count += 1;
    }

    /// Case-folded name for filtering
    pub fn search_text(&self) -> String {
        self.name.to_lowercase()
    }

    /// Display ordering: hardest first, then by name.
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        other
            .effort
            .cmp(&self.effort)
            .then_with(|| self.name.cmp(&other.name))
    }

    pub fn to_record(&self, interval_id: Uuid, position: usize) -> ExerciseRecord {
        ExerciseRecord {
            id: self.id,
            interval_id,
            position,
            order_index: self.order_index,
            name: self.name.clone(),
            method: method::decompose(&self.training_method),
            effort: self.effort,
            weight: self.weight,
            rest_after_seconds: self.rest_after_seconds,
            tempo: self.tempo,
            notes: self.notes.clone(),
            last_used_at: self.last_used_at,
            use_count: self.use_count,
        }
    }

    pub fn from_record(record: &ExerciseRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            training_method: method::reconstruct(&record.method),
            effort: record.effort,
            weight: record.weight,
            rest_after_seconds: record.rest_after_seconds,
            tempo: record.tempo,
            notes: record.notes.clone(),
            order_index: record.order_index,
            last_used_at: record.last_used_at,
            use_count: record.use_count,
        }
    }
}

/// Sort exercises into display order (stable).
pub fn sort_for_display(exercises: &mut [Exercise]) {
    exercises.sort_by(|a, b| a.display_cmp(b));
}

/// Compares the user-editable attributes and identity. Usage stats and the
/// order key are bookkeeping and do not take part.
impl PartialEq for Exercise {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.training_method == other.training_method
            && self.effort == other.effort
            && self.weight == other.weight
            && self.rest_after_seconds == other.rest_after_seconds
            && self.tempo == other.tempo
            && self.notes == other.notes
    }
}

/// Identity only, so the hash survives in-place edits.
impl Hash for Exercise {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Storage row for an exercise; the training method is flattened into
/// primitive columns.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub id: Uuid,
    pub interval_id: Uuid,
    pub position: usize,
    pub order_index: i64,
    pub name: String,
    #[serde(flatten)]
    pub method: MethodRecord,
    pub effort: i32,
    pub weight: Option<f64>,
    pub rest_after_seconds: Option<i32>,
    pub tempo: Option<Tempo>,
    pub notes: Option<String>,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub use_count: u32,
}
