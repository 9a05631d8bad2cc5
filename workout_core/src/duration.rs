//! Elapsed-time estimate for a workout.
//!
//! Rep-based work is costed with a flat [`SECONDS_PER_REP`] heuristic. This is
//! an approximation for planning, not a measurement: it ignores tempo, load
//! and the mini-set rests inside a rest-pause cluster.

use crate::{Exercise, Interval, TrainingMethod, Workout};

/// Assumed time per repetition for rep-based methods
pub const SECONDS_PER_REP: f64 = 3.0;

/// Working time of one pass through an exercise, excluding rest.
pub fn exercise_seconds(exercise: &Exercise) -> f64 {
    match exercise.training_method {
        TrainingMethod::Timed { seconds } => seconds as f64,
        ref method => method
            .representative_reps()
            .map_or(0.0, |reps| reps * SECONDS_PER_REP),
    }
}

/// Total time for an interval:
/// `rounds * (sum(work + rest_after)) + (rounds - 1) * rest_between + rest_after_interval`.
///
/// Missing rests count as zero. A non-positive round count contributes no
/// rounds and no between-round rest.
pub fn interval_seconds(interval: &Interval) -> f64 {
    let rounds = interval.rounds.max(0) as f64;
    let between = interval.rounds.saturating_sub(1).max(0) as f64;

    let per_round: f64 = interval
        .exercises()
        .iter()
        .map(|e| exercise_seconds(e) + e.rest_after_seconds.unwrap_or(0) as f64)
        .sum();

    rounds * per_round
        + between * interval.rest_between_rounds_seconds.unwrap_or(0) as f64
        + interval.rest_after_interval_seconds.unwrap_or(0) as f64
}

/// Sum of [`interval_seconds`] over every interval.
pub fn estimate_total_seconds(workout: &Workout) -> f64 {
    workout.intervals().iter().map(interval_seconds).sum()
}
