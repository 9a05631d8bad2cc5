//! CSV export of a workout, one row per exercise.
//!
//! The training method is written in its decomposed form (a kind column plus
//! one column per parameter), the same shape the store uses.

use crate::{method, Result, Workout};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    workout: &'a str,
    interval: String,
    rounds: i32,
    rest_between_rounds: Option<i32>,
    exercise: &'a str,
    order: i64,
    method: String,
    min_reps: Option<i32>,
    max_reps: Option<i32>,
    seconds: Option<i32>,
    target_total: Option<i32>,
    effort: i32,
    weight: Option<f64>,
    rest_after: Option<i32>,
    tempo: Option<String>,
    notes: Option<&'a str>,
}

/// Write the workout as CSV (with a header row) to `writer`.
///
/// Returns the number of exercise rows written. Intervals are written in
/// workout order, exercises in their interval's order.
pub fn export_workout_csv<W: Write>(workout: &Workout, writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut rows = 0;

    for (i, interval) in workout.intervals().iter().enumerate() {
        let interval_name = interval
            .name
            .clone()
            .unwrap_or_else(|| format!("Interval {}", i + 1));

        for exercise in interval.exercises_in_order() {
            let decomposed = method::decompose(&exercise.training_method);
            csv_writer.serialize(CsvRow {
                workout: &workout.name,
                interval: interval_name.clone(),
                rounds: interval.rounds,
                rest_between_rounds: interval.rest_between_rounds_seconds,
                exercise: &exercise.name,
                order: exercise.order_index,
                method: decomposed.kind,
                min_reps: decomposed.min_reps,
                max_reps: decomposed.max_reps,
                seconds: decomposed.seconds,
                target_total: decomposed.target_total,
                effort: exercise.effort,
                weight: exercise.weight,
                rest_after: exercise.rest_after_seconds,
                tempo: exercise.tempo.map(|t| t.notation()),
                notes: exercise.notes.as_deref(),
            })?;
            rows += 1;
        }
    }

    csv_writer.flush()?;
    Ok(rows)
}

/// Export to a file, creating parent directories and syncing before return.
pub fn export_workout_csv_to(workout: &Workout, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let rows = export_workout_csv(workout, &file)?;
    file.sync_all()?;

    tracing::info!("Exported {} rows for workout {} to {:?}", rows, workout.id, path);
    Ok(rows)
}
