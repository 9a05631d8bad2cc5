//! Built-in exercise library used to seed a fresh store.
//!
//! Every seed entry derives its id from its slug, so seeding the same store
//! twice inserts nothing the second time.

use crate::method::{self, MethodRecord};
use crate::{Exercise, TrainingMethod};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Namespace for seed ids (UUID v5)
pub const LIBRARY_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a4e_93b7_4d58_a0e2_5c71_b8d3_0f46);

/// Muscle group a library exercise primarily trains
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Legs,
    Push,
    Pull,
    Core,
    FullBody,
}

/// A reusable exercise template
#[derive(Clone, Debug, PartialEq)]
pub struct LibraryEntry {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub muscle_group: MuscleGroup,
    pub default_method: TrainingMethod,
    pub last_used_at: Option<DateTime<Utc>>,
    pub use_count: u32,
}

impl LibraryEntry {
    fn seed(slug: &str, name: &str, muscle_group: MuscleGroup, method: TrainingMethod) -> Self {
        Self {
            id: seed_id(slug),
            slug: slug.into(),
            name: name.into(),
            muscle_group,
            default_method: method,
            last_used_at: None,
            use_count: 0,
        }
    }

    pub fn update_usage_stats(&mut self) {
        self.last_used_at = Some(Utc::now());
        self.use_count += 1;
    }

    /// Create a new exercise from this template. The exercise gets its own
    /// id; the template's usage stats are bumped.
    pub fn instantiate(&mut self) -> Exercise {
        self.update_usage_stats();
        Exercise::new(self.name.clone(), self.default_method)
    }

    pub fn to_record(&self) -> LibraryRecord {
        LibraryRecord {
            id: self.id,
            slug: self.slug.clone(),
            name: self.name.clone(),
            muscle_group: self.muscle_group,
            method: method::decompose(&self.default_method),
            last_used_at: self.last_used_at,
            use_count: self.use_count,
        }
    }

    pub fn from_record(record: &LibraryRecord) -> Self {
        Self {
            id: record.id,
            slug: record.slug.clone(),
            name: record.name.clone(),
            muscle_group: record.muscle_group,
            default_method: method::reconstruct(&record.method),
            last_used_at: record.last_used_at,
            use_count: record.use_count,
        }
    }
}

/// Storage row for a library entry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LibraryRecord {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub muscle_group: MuscleGroup,
    #[serde(flatten)]
    pub method: MethodRecord,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub use_count: u32,
}

/// Stable id for a seed slug
pub fn seed_id(slug: &str) -> Uuid {
    Uuid::new_v5(&LIBRARY_NAMESPACE, slug.as_bytes())
}

static DEFAULT_LIBRARY: Lazy<Vec<LibraryEntry>> = Lazy::new(|| {
    use MuscleGroup::*;
    vec![
        LibraryEntry::seed("back_squat", "Back Squat", Legs, TrainingMethod::standard(5, 8)),
        LibraryEntry::seed("romanian_deadlift", "Romanian Deadlift", Legs, TrainingMethod::standard(8, 12)),
        LibraryEntry::seed("walking_lunge", "Walking Lunge", Legs, TrainingMethod::standard(10, 12)),
        LibraryEntry::seed("wall_sit", "Wall Sit", Legs, TrainingMethod::timed(45)),
        LibraryEntry::seed("bench_press", "Bench Press", Push, TrainingMethod::standard(6, 10)),
        LibraryEntry::seed("overhead_press", "Overhead Press", Push, TrainingMethod::standard(6, 10)),
        LibraryEntry::seed("push_up", "Push-up", Push, TrainingMethod::rest_pause(50, 8, 15)),
        LibraryEntry::seed("pull_up", "Pull-up", Pull, TrainingMethod::rest_pause(30, 3, 8)),
        LibraryEntry::seed("barbell_row", "Barbell Row", Pull, TrainingMethod::standard(8, 12)),
        LibraryEntry::seed("dead_hang", "Dead Hang", Pull, TrainingMethod::timed(30)),
        LibraryEntry::seed("plank", "Plank", Core, TrainingMethod::timed(60)),
        LibraryEntry::seed("hanging_knee_raise", "Hanging Knee Raise", Core, TrainingMethod::standard(10, 15)),
        LibraryEntry::seed("burpee", "Burpee", FullBody, TrainingMethod::timed(40)),
        LibraryEntry::seed("kettlebell_swing", "Kettlebell Swing", FullBody, TrainingMethod::standard(15, 20)),
    ]
});

/// The built-in seed table
pub fn default_library() -> &'static [LibraryEntry] {
    &DEFAULT_LIBRARY
}

/// Check a library for consistency.
///
/// Returns a list of problems, or an empty Vec if the library is usable.
pub fn validate(entries: &[LibraryEntry]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();
    let mut slugs = HashSet::new();

    for entry in entries {
        if entry.slug.is_empty() {
            errors.push(format!("Library entry {} has empty slug", entry.id));
        }
        if entry.name.is_empty() {
            errors.push(format!("Library entry '{}' has empty name", entry.slug));
        }
        if !ids.insert(entry.id) {
            errors.push(format!("Duplicate library id {}", entry.id));
        }
        if !slugs.insert(entry.slug.as_str()) {
            errors.push(format!("Duplicate library slug '{}'", entry.slug));
        }
        if let Err(e) = entry.default_method.validate() {
            errors.push(format!("Library entry '{}': {}", entry.slug, e));
        }
    }

    errors
}
