//! The workout aggregate.

use crate::{duration, Interval};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

pub const DEFAULT_WORKOUT_NAME: &str = "Untitled Workout";

/// Root of the `Workout -> Interval -> Exercise` tree.
///
/// `total_duration_seconds` is stored, not derived on read. The mutators on
/// this type refresh it; code that edits intervals or exercises some other
/// way must call [`Workout::refresh_duration`] afterwards.
#[derive(Clone, Debug)]
pub struct Workout {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub total_duration_seconds: f64,
    intervals: Vec<Interval>,
}

impl Default for Workout {
    fn default() -> Self {
        Self::new()
    }
}

impl Workout {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: DEFAULT_WORKOUT_NAME.to_string(),
            created_at: Utc::now(),
            total_duration_seconds: 0.0,
            intervals: Vec::new(),
        }
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::new()
        }
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn interval(&self, id: Uuid) -> Option<&Interval> {
        self.intervals.iter().find(|i| i.id == id)
    }

    pub fn add_interval(&mut self, interval: Interval) {
        tracing::debug!("Added interval {} to workout {}", interval.id, self.id);
        self.intervals.push(interval);
        self.refresh_duration();
    }

    /// Remove an interval along with every exercise it owns.
    pub fn remove_interval(&mut self, id: Uuid) -> Option<Interval> {
        let position = self.intervals.iter().position(|i| i.id == id)?;
        let removed = self.intervals.remove(position);
        self.refresh_duration();
        Some(removed)
    }

    /// Edit one interval in place, then refresh the stored duration.
    ///
    /// Returns `None` if no interval has that id.
    pub fn update_interval<F, T>(&mut self, id: Uuid, f: F) -> Option<T>
    where
        F: FnOnce(&mut Interval) -> T,
    {
        let interval = self.intervals.iter_mut().find(|i| i.id == id)?;
        let out = f(interval);
        self.refresh_duration();
        Some(out)
    }

    /// Find the interval that owns an exercise
    pub fn interval_of_exercise(&self, exercise_id: Uuid) -> Option<&Interval> {
        self.intervals
            .iter()
            .find(|i| i.exercise(exercise_id).is_some())
    }

    /// Recompute and store the duration estimate.
    pub fn refresh_duration(&mut self) -> f64 {
        self.total_duration_seconds = duration::estimate_total_seconds(self);
        self.total_duration_seconds
    }

    pub fn exercise_count(&self) -> usize {
        self.intervals.iter().map(Interval::exercise_count).sum()
    }

    /// Describe every exercise whose training method fails validation.
    ///
    /// Returns an empty Vec when the whole workout is valid. The model accepts
    /// invalid methods; this is for callers deciding whether to allow a save.
    pub fn validation_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        for (i, interval) in self.intervals.iter().enumerate() {
            let label = interval
                .name
                .clone()
                .unwrap_or_else(|| format!("Interval {}", i + 1));
            for exercise in interval.exercises_in_order() {
                if let Err(e) = exercise.training_method.validate() {
                    issues.push(format!("{} / {}: {}", label, exercise.name, e));
                }
            }
        }
        issues
    }

    /// Most recent first. Workouts created at the same instant compare equal.
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        other.created_at.cmp(&self.created_at)
    }

    pub fn to_record(&self) -> WorkoutRecord {
        WorkoutRecord {
            id: self.id,
            name: self.name.clone(),
            created_at: self.created_at,
            total_duration_seconds: self.total_duration_seconds,
        }
    }

    /// Rebuild a workout from its row and decoded intervals. The stored
    /// duration is kept as-is.
    pub fn from_record(record: &WorkoutRecord, intervals: Vec<Interval>) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            created_at: record.created_at,
            total_duration_seconds: record.total_duration_seconds,
            intervals,
        }
    }
}

pub fn sort_for_display(workouts: &mut [Workout]) {
    workouts.sort_by(|a, b| a.display_cmp(b));
}

/// Shallow: scalar fields and interval count only.
impl PartialEq for Workout {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.created_at == other.created_at
            && self.total_duration_seconds == other.total_duration_seconds
            && self.intervals.len() == other.intervals.len()
    }
}

impl Hash for Workout {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Storage row for a workout
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub total_duration_seconds: f64,
}
