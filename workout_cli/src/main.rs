use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;
use workout_core::config::DataConfig;
use workout_core::*;

#[derive(Parser)]
#[command(name = "wob")]
#[command(about = "Interval workout builder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty workout
    New {
        /// Workout name (defaults to "Untitled Workout")
        #[arg(long)]
        name: Option<String>,
    },

    /// List workouts, most recent first
    List,

    /// Show a workout with its intervals and exercises
    Show {
        /// Workout id or id prefix
        workout: String,
    },

    /// Append an interval to a workout
    AddInterval {
        workout: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        rounds: Option<i32>,

        /// Rest between rounds, in seconds
        #[arg(long)]
        rest_between: Option<i32>,

        /// Rest after the interval, in seconds
        #[arg(long)]
        rest_after: Option<i32>,
    },

    /// Append an exercise to an interval
    AddExercise {
        workout: String,

        /// Interval position (1-based) or id prefix
        interval: String,

        /// Exercise name
        #[arg(long, required_unless_present = "from")]
        name: Option<String>,

        /// Start from a library exercise (by slug)
        #[arg(long, conflicts_with = "name")]
        from: Option<String>,

        /// Training method: "8-12", "rp:50:5-10" or "30s"
        #[arg(long)]
        method: Option<String>,

        #[arg(long)]
        effort: Option<i32>,

        #[arg(long)]
        weight: Option<f64>,

        /// Rest after the exercise, in seconds
        #[arg(long)]
        rest_after: Option<i32>,

        /// Tempo notation, e.g. "3-1-X"
        #[arg(long)]
        tempo: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// Explicit order index instead of appending
        #[arg(long)]
        order: Option<i64>,
    },

    /// Remove an exercise from a workout
    RemoveExercise {
        workout: String,

        /// Exercise id or id prefix
        exercise: String,
    },

    /// Remove an interval and all of its exercises
    RemoveInterval {
        workout: String,

        /// Interval position (1-based) or id prefix
        interval: String,
    },

    /// Delete a workout and everything in it
    Delete { workout: String },

    /// List the exercise library
    Library,

    /// Export a workout to CSV
    Export {
        workout: String,

        #[arg(long)]
        out: PathBuf,
    },

    /// Report invalid training methods and orphaned records
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    workout_core::logging::init_with_level(workout_core::logging::level_for_verbosity(
        cli.verbose,
    ));

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let mut store = JsonFileStore::open(DataConfig::store_path(&data_dir))?;
    tracing::debug!("Using store at {:?}", store.path());

    if config.builder.seed_library && store.tables().library.is_empty() {
        store.update(|t| Ok(t.seed_library()))?;
    }

    match cli.command {
        Commands::New { name } => cmd_new(&mut store, name),
        Commands::List => cmd_list(&store),
        Commands::Show { workout } => cmd_show(&store, &workout),
        Commands::AddInterval {
            workout,
            name,
            rounds,
            rest_between,
            rest_after,
        } => {
            let mut interval = Interval::new();
            interval.name = name;
            interval.rounds = rounds.unwrap_or(config.builder.default_rounds);
            interval.rest_between_rounds_seconds =
                rest_between.or(config.builder.default_rest_between_rounds_seconds);
            interval.rest_after_interval_seconds = rest_after;
            cmd_add_interval(&mut store, &workout, interval)
        }
        Commands::AddExercise {
            workout,
            interval,
            name,
            from,
            method,
            effort,
            weight,
            rest_after,
            tempo,
            notes,
            order,
        } => {
            let draft = ExerciseDraft {
                name,
                from,
                method,
                effort: effort.unwrap_or(config.builder.default_effort),
                weight,
                rest_after,
                tempo,
                notes,
                order,
            };
            cmd_add_exercise(&mut store, &workout, &interval, draft)
        }
        Commands::RemoveExercise { workout, exercise } => {
            cmd_remove_exercise(&mut store, &workout, &exercise)
        }
        Commands::RemoveInterval { workout, interval } => {
            cmd_remove_interval(&mut store, &workout, &interval)
        }
        Commands::Delete { workout } => cmd_delete(&mut store, &workout),
        Commands::Library => cmd_library(&store),
        Commands::Export { workout, out } => cmd_export(&store, &workout, &out),
        Commands::Check => cmd_check(&store),
    }
}

fn cmd_new(store: &mut JsonFileStore, name: Option<String>) -> Result<()> {
    let workout = match name {
        Some(name) => Workout::with_name(name),
        None => Workout::new(),
    };
    store.save_workout(&workout)?;

    println!("✓ Created workout \"{}\"", workout.name);
    println!("  id: {}", workout.id);
    Ok(())
}

fn cmd_list(store: &JsonFileStore) -> Result<()> {
    let workouts = store.list_workouts()?;
    if workouts.is_empty() {
        println!("No workouts yet. Create one with `wob new`.");
        return Ok(());
    }

    for workout in &workouts {
        println!(
            "{}  {:<28} {:>2} intervals  {:>3} exercises  ~{}  ({})",
            short_id(workout.id),
            workout.name,
            workout.intervals().len(),
            workout.exercise_count(),
            format_duration(workout.total_duration_seconds),
            workout.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

fn cmd_show(store: &JsonFileStore, workout: &str) -> Result<()> {
    let workout = store.find_workout(workout)?;

    println!("\n{}", workout.name);
    println!("  id: {}", workout.id);
    println!(
        "  Estimated duration: ~{}",
        format_duration(workout.total_duration_seconds)
    );

    if workout.intervals().is_empty() {
        println!("\n  (no intervals)");
    }

    for (i, interval) in workout.intervals().iter().enumerate() {
        println!();
        println!(
            "  [{}] {}  ×{} rounds  ({})",
            i + 1,
            interval.name.as_deref().unwrap_or("Unnamed interval"),
            interval.rounds,
            short_id(interval.id)
        );
        if let Some(rest) = interval.rest_between_rounds_seconds {
            println!("      rest between rounds: {}s", rest);
        }
        if let Some(rest) = interval.rest_after_interval_seconds {
            println!("      rest after interval: {}s", rest);
        }

        for exercise in interval.exercises_in_order() {
            let mut line = format!(
                "      → {}  {}  effort {}",
                exercise.name, exercise.training_method, exercise.effort
            );
            if let Some(weight) = exercise.weight {
                line.push_str(&format!("  @ {}", weight));
            }
            if let Some(tempo) = exercise.tempo {
                line.push_str(&format!("  tempo {}", tempo));
            }
            if let Some(rest) = exercise.rest_after_seconds {
                line.push_str(&format!("  rest {}s", rest));
            }
            line.push_str(&format!("  ({})", short_id(exercise.id)));
            println!("{}", line);

            if let Some(ref notes) = exercise.notes {
                println!("        {}", notes);
            }
        }
    }

    println!();
    Ok(())
}

fn cmd_add_interval(store: &mut JsonFileStore, workout: &str, interval: Interval) -> Result<()> {
    let mut workout = store.find_workout(workout)?;
    let interval_id = interval.id;
    workout.add_interval(interval);
    store.save_workout(&workout)?;

    println!(
        "✓ Added interval {} to \"{}\"",
        short_id(interval_id),
        workout.name
    );
    println!(
        "  Estimated duration: ~{}",
        format_duration(workout.total_duration_seconds)
    );
    Ok(())
}

/// Exercise fields gathered from the command line
struct ExerciseDraft {
    name: Option<String>,
    from: Option<String>,
    method: Option<String>,
    effort: i32,
    weight: Option<f64>,
    rest_after: Option<i32>,
    tempo: Option<String>,
    notes: Option<String>,
    order: Option<i64>,
}

fn cmd_add_exercise(
    store: &mut JsonFileStore,
    workout: &str,
    interval: &str,
    draft: ExerciseDraft,
) -> Result<()> {
    let mut workout = store.find_workout(workout)?;
    let interval_id = resolve_interval(&workout, interval)?;

    let mut library_entry = None;
    let mut exercise = match (&draft.from, &draft.name) {
        (Some(slug), _) => {
            let mut entry = store.tables().library_entry(slug).ok_or_else(|| Error::NotFound {
                kind: "Library exercise",
                id: slug.clone(),
            })?;
            let exercise = entry.instantiate();
            library_entry = Some(entry);
            exercise
        }
        (None, Some(name)) => Exercise::new(name.clone(), TrainingMethod::default()),
        (None, None) => return Err(Error::Other("Either --name or --from is required".into())),
    };

    if let Some(ref text) = draft.method {
        exercise.training_method = parse_method(text)?;
    }
    // Boundary check: the model accepts invalid methods, the CLI does not.
    exercise.training_method.validate()?;

    exercise.effort = draft.effort;
    exercise.weight = draft.weight;
    exercise.rest_after_seconds = draft.rest_after;
    exercise.tempo = draft.tempo.as_deref().map(str::parse::<Tempo>).transpose()?;
    exercise.notes = draft.notes;

    let exercise_id = exercise.id;
    let exercise_name = exercise.name.clone();
    let order = workout
        .update_interval(interval_id, |i| i.add_exercise(exercise, draft.order))
        .ok_or_else(|| Error::NotFound {
            kind: "Interval",
            id: interval_id.to_string(),
        })?;

    store.update(|t| {
        t.save_workout(&workout)?;
        if let Some(ref entry) = library_entry {
            t.put_library_entry(entry);
        }
        Ok(())
    })?;

    println!(
        "✓ Added \"{}\" ({}) at position {}",
        exercise_name,
        short_id(exercise_id),
        order
    );
    println!(
        "  Estimated duration: ~{}",
        format_duration(workout.total_duration_seconds)
    );
    Ok(())
}

fn cmd_remove_exercise(store: &mut JsonFileStore, workout: &str, exercise: &str) -> Result<()> {
    let mut workout = store.find_workout(workout)?;
    let exercise_id = resolve_exercise(&workout, exercise)?;
    let interval_id = workout
        .interval_of_exercise(exercise_id)
        .map(|i| i.id)
        .ok_or_else(|| Error::NotFound {
            kind: "Exercise",
            id: exercise.to_string(),
        })?;

    let removed = workout
        .update_interval(interval_id, |i| i.remove_exercise(exercise_id))
        .flatten()
        .ok_or_else(|| Error::NotFound {
            kind: "Exercise",
            id: exercise.to_string(),
        })?;
    store.save_workout(&workout)?;

    println!("✓ Removed \"{}\"", removed.name);
    Ok(())
}

fn cmd_remove_interval(store: &mut JsonFileStore, workout: &str, interval: &str) -> Result<()> {
    let mut workout = store.find_workout(workout)?;
    let interval_id = resolve_interval(&workout, interval)?;
    let removed = workout
        .remove_interval(interval_id)
        .ok_or_else(|| Error::NotFound {
            kind: "Interval",
            id: interval.to_string(),
        })?;
    store.save_workout(&workout)?;

    println!(
        "✓ Removed interval {} and {} exercises",
        short_id(removed.id),
        removed.exercise_count()
    );
    Ok(())
}

fn cmd_delete(store: &mut JsonFileStore, workout: &str) -> Result<()> {
    let workout = store.find_workout(workout)?;
    store.delete_workout(workout.id)?;

    println!(
        "✓ Deleted \"{}\" ({} intervals, {} exercises)",
        workout.name,
        workout.intervals().len(),
        workout.exercise_count()
    );
    Ok(())
}

fn cmd_library(store: &JsonFileStore) -> Result<()> {
    let entries = store.tables().library_entries();
    if entries.is_empty() {
        println!("Library is empty.");
        return Ok(());
    }

    for entry in entries {
        println!(
            "{:<20} {:<22} {:<10} {}  (used {}×)",
            entry.slug,
            entry.name,
            format!("{:?}", entry.muscle_group),
            entry.default_method,
            entry.use_count
        );
    }
    Ok(())
}

fn cmd_export(store: &JsonFileStore, workout: &str, out: &std::path::Path) -> Result<()> {
    let workout = store.find_workout(workout)?;
    let rows = export_workout_csv_to(&workout, out)?;

    println!("✓ Exported {} exercises", rows);
    println!("  CSV: {}", out.display());
    Ok(())
}

fn cmd_check(store: &JsonFileStore) -> Result<()> {
    let mut problems = 0;

    for workout in store.list_workouts()? {
        for issue in workout.validation_issues() {
            println!("{}: {}", workout.name, issue);
            problems += 1;
        }
    }
    for orphan in store.tables().orphans() {
        println!("{}", orphan);
        problems += 1;
    }

    if problems == 0 {
        println!("✓ No problems found");
    } else {
        println!("{} problem(s) found", problems);
    }
    Ok(())
}

/// Parse "8-12" / "10", "rp:50:5-10", or "30s".
fn parse_method(text: &str) -> Result<TrainingMethod> {
    let text = text.trim().to_lowercase();
    let invalid = || Error::Other(format!("Invalid method '{}'", text));

    if let Some(seconds) = text.strip_suffix('s') {
        let seconds = seconds.parse().map_err(|_| invalid())?;
        return Ok(TrainingMethod::timed(seconds));
    }

    if let Some(rest) = text.strip_prefix("rp:") {
        let (target, range) = rest.split_once(':').ok_or_else(invalid)?;
        let target = target.parse().map_err(|_| invalid())?;
        let (min_reps, max_reps) = parse_rep_range(range).ok_or_else(invalid)?;
        return Ok(TrainingMethod::rest_pause(target, min_reps, max_reps));
    }

    let (min_reps, max_reps) = parse_rep_range(&text).ok_or_else(invalid)?;
    Ok(TrainingMethod::standard(min_reps, max_reps))
}

fn parse_rep_range(text: &str) -> Option<(i32, i32)> {
    match text.split_once('-') {
        Some((min, max)) => Some((min.parse().ok()?, max.parse().ok()?)),
        None => {
            let reps = text.parse().ok()?;
            Some((reps, reps))
        }
    }
}

/// Accept a 1-based position or an id prefix
fn resolve_interval(workout: &Workout, key: &str) -> Result<Uuid> {
    if let Ok(position) = key.parse::<usize>() {
        if let Some(interval) = position
            .checked_sub(1)
            .and_then(|i| workout.intervals().get(i))
        {
            return Ok(interval.id);
        }
    }

    let key = key.to_lowercase();
    let matches: Vec<Uuid> = workout
        .intervals()
        .iter()
        .map(|i| i.id)
        .filter(|id| id.to_string().starts_with(&key))
        .collect();
    single_match("Interval", key, matches)
}

fn resolve_exercise(workout: &Workout, key: &str) -> Result<Uuid> {
    let key = key.to_lowercase();
    let matches: Vec<Uuid> = workout
        .intervals()
        .iter()
        .flat_map(|i| i.exercises())
        .map(|e| e.id)
        .filter(|id| id.to_string().starts_with(&key))
        .collect();
    single_match("Exercise", key, matches)
}

fn single_match(kind: &'static str, key: String, matches: Vec<Uuid>) -> Result<Uuid> {
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(Error::NotFound { kind, id: key }),
        _ => Err(Error::Ambiguous { kind, prefix: key }),
    }
}

fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

fn format_duration(seconds: f64) -> String {
    let total = seconds.round().max(0.0) as u64;
    format!("{}m {:02}s", total / 60, total % 60)
}
