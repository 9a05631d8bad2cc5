//! Repeatable groups of exercises.

use crate::Exercise;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// An ordered group of exercises performed for a number of rounds.
///
/// The interval exclusively owns its exercises; dropping or removing it
/// removes them too.
#[derive(Clone, Debug)]
pub struct Interval {
    pub id: Uuid,
    pub name: Option<String>,
    /// Nominally at least 1; rest-pause work conventionally uses a single round
    pub rounds: i32,
    pub rest_between_rounds_seconds: Option<i32>,
    pub rest_after_interval_seconds: Option<i32>,
    exercises: Vec<Exercise>,
}

impl Default for Interval {
    fn default() -> Self {
        Self::new()
    }
}

impl Interval {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: None,
            rounds: 1,
            rest_between_rounds_seconds: None,
            rest_after_interval_seconds: None,
            exercises: Vec::new(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new()
        }
    }

    /// Append an exercise and return the order index it was given.
    ///
    /// Without a hint the index is one past the current maximum (0 for an
    /// empty interval). A hint is stored as-is, so equal indices are possible;
    /// [`Interval::exercises_in_order`] keeps those in insertion order.
    pub fn add_exercise(&mut self, mut exercise: Exercise, order_hint: Option<i64>) -> i64 {
        let order_index = order_hint.unwrap_or_else(|| self.next_order_index());
        exercise.order_index = order_index;
        tracing::debug!(
            "Added exercise '{}' to interval {} at order {}",
            exercise.name,
            self.id,
            order_index
        );
        self.exercises.push(exercise);
        order_index
    }

    fn next_order_index(&self) -> i64 {
        self.exercises
            .iter()
            .map(|e| e.order_index)
            .max()
            .map_or(0, |max| max + 1)
    }

    /// Exercises sorted by order index; ties keep insertion order.
    pub fn exercises_in_order(&self) -> Vec<&Exercise> {
        let mut ordered: Vec<&Exercise> = self.exercises.iter().collect();
        ordered.sort_by_key(|e| e.order_index);
        ordered
    }

    /// Remove an exercise by id. Remaining order indices are left untouched.
    pub fn remove_exercise(&mut self, id: Uuid) -> Option<Exercise> {
        let position = self.exercises.iter().position(|e| e.id == id)?;
        Some(self.exercises.remove(position))
    }

    /// Exercises in insertion order
    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn exercise(&self, id: Uuid) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn exercise_mut(&mut self, id: Uuid) -> Option<&mut Exercise> {
        self.exercises.iter_mut().find(|e| e.id == id)
    }

    pub fn exercise_count(&self) -> usize {
        self.exercises.len()
    }

    /// Display ordering: named intervals alphabetically, then unnamed ones.
    ///
    /// Equal names and unnamed intervals fall back to the id. `Uuid` byte
    /// order matches the order of the hyphenated lowercase strings.
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        let by_name = match (&self.name, &other.name) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_name.then_with(|| self.id.cmp(&other.id))
    }

    pub fn to_record(&self, workout_id: Uuid, position: usize) -> IntervalRecord {
        IntervalRecord {
            id: self.id,
            workout_id,
            position,
            name: self.name.clone(),
            rounds: self.rounds,
            rest_between_rounds_seconds: self.rest_between_rounds_seconds,
            rest_after_interval_seconds: self.rest_after_interval_seconds,
        }
    }

    /// Rebuild an interval from its row and its already-decoded exercises,
    /// given in insertion order.
    pub fn from_record(record: &IntervalRecord, exercises: Vec<Exercise>) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            rounds: record.rounds,
            rest_between_rounds_seconds: record.rest_between_rounds_seconds,
            rest_after_interval_seconds: record.rest_after_interval_seconds,
            exercises,
        }
    }
}

/// Sort intervals into display order.
pub fn sort_for_display(intervals: &mut [Interval]) {
    intervals.sort_by(|a, b| a.display_cmp(b));
}

/// Shallow comparison: scalar fields plus the number of exercises. The
/// exercises themselves are never compared, so two intervals with different
/// contents of the same length are equal.
impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.rounds == other.rounds
            && self.rest_between_rounds_seconds == other.rest_between_rounds_seconds
            && self.rest_after_interval_seconds == other.rest_after_interval_seconds
            && self.exercises.len() == other.exercises.len()
    }
}

impl Hash for Interval {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Storage row for an interval
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntervalRecord {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub position: usize,
    pub name: Option<String>,
    pub rounds: i32,
    pub rest_between_rounds_seconds: Option<i32>,
    pub rest_after_interval_seconds: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrainingMethod;

    fn squat() -> Exercise {
        Exercise::new("Squat", TrainingMethod::standard(5, 5))
    }

    #[test]
    fn test_add_assigns_sequential_indices() {
        let mut interval = Interval::new();
        assert_eq!(interval.add_exercise(squat(), None), 0);
        assert_eq!(interval.add_exercise(squat(), None), 1);
        assert_eq!(interval.add_exercise(squat(), None), 2);
    }

    #[test]
    fn test_add_after_gap_uses_max_plus_one() {
        let mut interval = Interval::new();
        interval.add_exercise(squat(), Some(7));
        assert_eq!(interval.add_exercise(squat(), None), 8);
    }

    #[test]
    fn test_remove_leaves_gaps() {
        let mut interval = Interval::new();
        let first = squat();
        let middle = squat();
        let middle_id = middle.id;
        interval.add_exercise(first, None);
        interval.add_exercise(middle, None);
        interval.add_exercise(squat(), None);

        let removed = interval.remove_exercise(middle_id).unwrap();
        assert_eq!(removed.id, middle_id);

        let indices: Vec<i64> = interval
            .exercises_in_order()
            .iter()
            .map(|e| e.order_index)
            .collect();
        assert_eq!(indices, vec![0, 2]);
        assert!(interval.remove_exercise(middle_id).is_none());
    }

    #[test]
    fn test_exercises_in_order_is_stable() {
        let mut interval = Interval::new();
        let late = Exercise::new("Late", TrainingMethod::timed(20));
        let tie_a = Exercise::new("Tie A", TrainingMethod::timed(20));
        let tie_b = Exercise::new("Tie B", TrainingMethod::timed(20));
        interval.add_exercise(late, Some(5));
        interval.add_exercise(tie_a, Some(1));
        interval.add_exercise(tie_b, Some(1));

        let names: Vec<&str> = interval
            .exercises_in_order()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["Tie A", "Tie B", "Late"]);
    }

    #[test]
    fn test_shallow_equality_same_count() {
        let mut a = Interval::named("Superset");
        a.add_exercise(squat(), None);
        let mut b = a.clone();

        let old_id = b.exercises()[0].id;
        b.remove_exercise(old_id);
        b.add_exercise(Exercise::new("Lunge", TrainingMethod::timed(40)), None);

        assert_eq!(a, b);
    }

    #[test]
    fn test_shallow_equality_different_count() {
        let mut a = Interval::named("Superset");
        a.add_exercise(squat(), None);
        let mut b = a.clone();
        b.add_exercise(squat(), None);

        assert_ne!(a, b);
    }

    #[test]
    fn test_display_order_named_before_unnamed() {
        let mut intervals = vec![Interval::new(), Interval::named("B"), Interval::named("A")];
        sort_for_display(&mut intervals);
        let names: Vec<Option<&str>> = intervals.iter().map(|i| i.name.as_deref()).collect();
        assert_eq!(names, vec![Some("A"), Some("B"), None]);
    }

    #[test]
    fn test_unnamed_intervals_ordered_by_id_string() {
        let mut intervals = vec![Interval::new(), Interval::new(), Interval::new()];
        sort_for_display(&mut intervals);
        let ids: Vec<String> = intervals.iter().map(|i| i.id.to_string()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_record_round_trip() {
        let mut interval = Interval::named("Finisher");
        interval.rounds = 4;
        interval.rest_between_rounds_seconds = Some(45);
        let workout_id = Uuid::new_v4();

        let record = interval.to_record(workout_id, 1);
        assert_eq!(record.workout_id, workout_id);

        let restored = Interval::from_record(&record, Vec::new());
        assert_eq!(restored, interval);
    }
}
