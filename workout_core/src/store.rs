//! Decomposed-record persistence for workouts.
//!
//! Workouts are flattened into three tables of plain rows (workouts,
//! intervals, exercises) plus the exercise library. Children point at their
//! owner by id; deleting a workout explicitly deletes its intervals and their
//! exercises.
//!
//! [`JsonFileStore`] keeps the tables in a single JSON file, read under a
//! shared lock and replaced atomically under an exclusive one.

use crate::library::{self, LibraryEntry, LibraryRecord};
use crate::{
    Error, Exercise, ExerciseRecord, Interval, IntervalRecord, Result, Workout, WorkoutRecord,
};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Persistence boundary for the workout aggregate
pub trait WorkoutRepository {
    /// Insert or replace a workout and its whole subtree.
    fn save_workout(&mut self, workout: &Workout) -> Result<()>;

    fn load_workout(&self, id: Uuid) -> Result<Option<Workout>>;

    /// Delete a workout, its intervals and their exercises.
    ///
    /// Returns `false` if there was nothing to delete.
    fn delete_workout(&mut self, id: Uuid) -> Result<bool>;

    /// All workouts, most recent first
    fn list_workouts(&self) -> Result<Vec<Workout>>;

    /// Look up a workout by full id or unique id prefix.
    fn find_workout(&self, prefix: &str) -> Result<Workout> {
        let prefix = prefix.trim().to_lowercase();
        let mut matches: Vec<Workout> = self
            .list_workouts()?
            .into_iter()
            .filter(|w| w.id.to_string().starts_with(&prefix))
            .collect();

        match matches.len() {
            0 => Err(Error::NotFound {
                kind: "Workout",
                id: prefix,
            }),
            1 => Ok(matches.remove(0)),
            _ => Err(Error::Ambiguous {
                kind: "Workout",
                prefix,
            }),
        }
    }
}

/// In-memory decomposed tables
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Tables {
    #[serde(default)]
    pub workouts: BTreeMap<Uuid, WorkoutRecord>,
    #[serde(default)]
    pub intervals: BTreeMap<Uuid, IntervalRecord>,
    #[serde(default)]
    pub exercises: BTreeMap<Uuid, ExerciseRecord>,
    #[serde(default)]
    pub library: BTreeMap<Uuid, LibraryRecord>,
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delete every interval (and its exercises) owned by a workout.
    /// Returns `(intervals, exercises)` removed.
    fn delete_children(&mut self, workout_id: Uuid) -> (usize, usize) {
        let interval_ids: HashSet<Uuid> = self
            .intervals
            .values()
            .filter(|r| r.workout_id == workout_id)
            .map(|r| r.id)
            .collect();

        let before = self.exercises.len();
        self.exercises
            .retain(|_, r| !interval_ids.contains(&r.interval_id));
        let exercises_removed = before - self.exercises.len();

        for id in &interval_ids {
            self.intervals.remove(id);
        }

        (interval_ids.len(), exercises_removed)
    }

    fn assemble(&self, record: &WorkoutRecord) -> Workout {
        let mut interval_rows: Vec<&IntervalRecord> = self
            .intervals
            .values()
            .filter(|r| r.workout_id == record.id)
            .collect();
        interval_rows.sort_by_key(|r| r.position);

        let intervals = interval_rows
            .into_iter()
            .map(|interval_row| {
                let mut exercise_rows: Vec<&ExerciseRecord> = self
                    .exercises
                    .values()
                    .filter(|r| r.interval_id == interval_row.id)
                    .collect();
                exercise_rows.sort_by_key(|r| r.position);

                let exercises = exercise_rows.into_iter().map(Exercise::from_record).collect();
                Interval::from_record(interval_row, exercises)
            })
            .collect();

        Workout::from_record(record, intervals)
    }

    /// Rows whose owner no longer exists.
    pub fn orphans(&self) -> Vec<String> {
        let mut issues = Vec::new();
        for interval in self.intervals.values() {
            if !self.workouts.contains_key(&interval.workout_id) {
                issues.push(format!(
                    "Interval {} references missing workout {}",
                    interval.id, interval.workout_id
                ));
            }
        }
        for exercise in self.exercises.values() {
            if !self.intervals.contains_key(&exercise.interval_id) {
                issues.push(format!(
                    "Exercise {} references missing interval {}",
                    exercise.id, exercise.interval_id
                ));
            }
        }
        issues
    }

    /// Insert any built-in library entries that are not already present.
    ///
    /// Seed ids are fixed, so existing entries (and their usage stats) are
    /// left alone. Returns the number inserted.
    pub fn seed_library(&mut self) -> usize {
        let mut inserted = 0;
        for entry in library::default_library() {
            if !self.library.contains_key(&entry.id) {
                self.library.insert(entry.id, entry.to_record());
                inserted += 1;
            }
        }
        if inserted > 0 {
            tracing::info!("Seeded {} library exercises", inserted);
        }
        inserted
    }

    /// Library entries sorted by name
    pub fn library_entries(&self) -> Vec<LibraryEntry> {
        let mut entries: Vec<LibraryEntry> =
            self.library.values().map(LibraryEntry::from_record).collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// Look up a library entry by slug
    pub fn library_entry(&self, slug: &str) -> Option<LibraryEntry> {
        self.library
            .values()
            .find(|r| r.slug == slug)
            .map(LibraryEntry::from_record)
    }

    pub fn put_library_entry(&mut self, entry: &LibraryEntry) {
        self.library.insert(entry.id, entry.to_record());
    }
}

impl WorkoutRepository for Tables {
    fn save_workout(&mut self, workout: &Workout) -> Result<()> {
        self.delete_children(workout.id);
        self.workouts.insert(workout.id, workout.to_record());

        for (position, interval) in workout.intervals().iter().enumerate() {
            self.intervals
                .insert(interval.id, interval.to_record(workout.id, position));
            for (position, exercise) in interval.exercises().iter().enumerate() {
                self.exercises
                    .insert(exercise.id, exercise.to_record(interval.id, position));
            }
        }

        tracing::debug!(
            "Saved workout {} ({} intervals, {} exercises)",
            workout.id,
            workout.intervals().len(),
            workout.exercise_count()
        );
        Ok(())
    }

    fn load_workout(&self, id: Uuid) -> Result<Option<Workout>> {
        Ok(self.workouts.get(&id).map(|record| self.assemble(record)))
    }

    fn delete_workout(&mut self, id: Uuid) -> Result<bool> {
        if self.workouts.remove(&id).is_none() {
            return Ok(false);
        }
        let (intervals, exercises) = self.delete_children(id);
        tracing::info!(
            "Deleted workout {} with {} intervals and {} exercises",
            id,
            intervals,
            exercises
        );
        Ok(true)
    }

    fn list_workouts(&self) -> Result<Vec<Workout>> {
        let mut workouts: Vec<Workout> = self
            .workouts
            .values()
            .map(|record| self.assemble(record))
            .collect();
        crate::workout::sort_for_display(&mut workouts);
        Ok(workouts)
    }
}

// ============================================================================
// JSON file store
// ============================================================================

/// [`Tables`] persisted to a JSON file after every mutation
pub struct JsonFileStore {
    path: PathBuf,
    tables: Tables,
}

impl JsonFileStore {
    /// Open the store at `path`.
    ///
    /// A missing file gives an empty store. An unreadable or corrupt file is
    /// moved aside to `<path>.corrupt` and an empty store is returned.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tables = load_tables(&path)?;
        Ok(Self { path, tables })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    /// Apply a change to the tables and write them out.
    ///
    /// Holds an exclusive lock on `<path>.lock` while the file is reloaded,
    /// changed and written, so writes from another process since `open`
    /// are kept rather than overwritten.
    pub fn update<F, T>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Tables) -> Result<T>,
    {
        let lock = self.lock_file()?;
        lock.lock_exclusive()?;

        let result = load_tables(&self.path).and_then(|tables| {
            self.tables = tables;
            let out = f(&mut self.tables)?;
            self.flush()?;
            Ok(out)
        });

        lock.unlock()?;
        result
    }

    fn lock_file(&self) -> Result<File> {
        let mut lock_path = self.path.as_os_str().to_owned();
        lock_path.push(".lock");
        let lock_path = PathBuf::from(lock_path);
        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        Ok(file)
    }

    /// Write the tables atomically:
    /// 1. Write to a temp file in the same directory
    /// 2. Sync to disk
    /// 3. Rename over the original
    pub fn flush(&self) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let temp = NamedTempFile::new_in(&parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(&self.tables)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Wrote store to {:?}", self.path);
        Ok(())
    }
}

fn load_tables(path: &Path) -> Result<Tables> {
    if !path.exists() {
        tracing::info!("No store found at {:?}, starting empty", path);
        return Ok(Tables::default());
    }

    let mut contents = String::new();
    let read = {
        let file = File::open(path)?;
        file.lock_shared()?;
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read
    };

    if let Err(e) = read {
        tracing::warn!("Failed to read store {:?}: {}", path, e);
        quarantine(path)?;
        return Ok(Tables::default());
    }

    match serde_json::from_str::<Tables>(&contents) {
        Ok(tables) => {
            tracing::debug!(
                "Loaded {} workouts from {:?}",
                tables.workouts.len(),
                path
            );
            Ok(tables)
        }
        Err(e) => {
            tracing::warn!("Failed to parse store {:?}: {}", path, e);
            quarantine(path)?;
            Ok(Tables::default())
        }
    }
}

fn quarantine(path: &Path) -> Result<()> {
    let mut target = path.as_os_str().to_owned();
    target.push(".corrupt");
    let target = PathBuf::from(target);
    std::fs::rename(path, &target)?;
    tracing::warn!("Moved unreadable store aside to {:?}", target);
    Ok(())
}

impl WorkoutRepository for JsonFileStore {
    fn save_workout(&mut self, workout: &Workout) -> Result<()> {
        self.update(|t| t.save_workout(workout))
    }

    fn load_workout(&self, id: Uuid) -> Result<Option<Workout>> {
        self.tables.load_workout(id)
    }

    fn delete_workout(&mut self, id: Uuid) -> Result<bool> {
        self.update(|t| t.delete_workout(id))
    }

    fn list_workouts(&self) -> Result<Vec<Workout>> {
        self.tables.list_workouts()
    }
}
