use clap::{Parser, Subcommand, ValueEnum};
use coach_core::*;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "formcoach")]
#[command(about = "Pose-scored workout session coach", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a workout session (default)
    Start {
        /// Exercise id from the catalog
        #[arg(long, conflicts_with = "plan")]
        exercise: Option<String>,

        /// Plan id from the catalog
        #[arg(long)]
        plan: Option<String>,

        /// Non-interactive mode (for testing): simulated frames and reps,
        /// ticks run without wall-clock pacing
        #[arg(long)]
        auto: bool,
    },

    /// Show aggregate statistics, streaks, and achievements
    Stats {
        /// Time window to report over
        #[arg(long, value_enum, default_value_t = RangeArg::Week)]
        range: RangeArg,
    },

    /// List catalog exercises and plans
    List,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RangeArg {
    Week,
    Month,
    Year,
    All,
}

impl From<RangeArg> for TimeRange {
    fn from(arg: RangeArg) -> Self {
        match arg {
            RangeArg::Week => TimeRange::Week,
            RangeArg::Month => TimeRange::Month,
            RangeArg::Year => TimeRange::Year,
            RangeArg::All => TimeRange::AllTime,
        }
    }
}

fn main() -> Result<()> {
    coach_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Some(Commands::Start {
            exercise,
            plan,
            auto,
        }) => cmd_start(data_dir, exercise, plan, auto, &config),
        Some(Commands::Stats { range }) => cmd_stats(data_dir, range.into()),
        Some(Commands::List) => cmd_list(),
        None => cmd_start(data_dir, None, None, false, &config),
    }
}

/// Resolve a session target from the catalog (default: squats)
fn resolve_target(exercise: Option<String>, plan: Option<String>) -> Result<SessionTarget> {
    let catalog = get_default_catalog();

    if let Some(plan_id) = plan {
        let plan = catalog
            .plans
            .get(&plan_id)
            .ok_or_else(|| Error::CatalogValidation(format!("unknown plan '{}'", plan_id)))?;
        return Ok(SessionTarget::Plan(plan.clone()));
    }

    let exercise_id = exercise.unwrap_or_else(|| "squats".into());
    let exercise = catalog.exercises.get(&exercise_id).ok_or_else(|| {
        Error::CatalogValidation(format!("unknown exercise '{}'", exercise_id))
    })?;
    Ok(SessionTarget::Single(exercise.clone()))
}

fn cmd_start(
    data_dir: PathBuf,
    exercise: Option<String>,
    plan: Option<String>,
    auto: bool,
    config: &Config,
) -> Result<()> {
    let target = resolve_target(exercise, plan)?;
    let mut machine = WorkoutSessionMachine::new(
        target,
        config.scoring.clone(),
        config.capture.frame_stride,
    )?;

    display_target(&machine);

    let result = if auto {
        run_auto(&mut machine)
    } else {
        run_interactive(&mut machine)
    };

    let result = match result {
        Some(result) => result,
        // Already finalized by the machine (plan ran to completion)
        None => machine
            .result()
            .cloned()
            .ok_or_else(|| Error::Other("session ended without a result".into()))?,
    };

    display_result(&result);

    let log_path = data_dir.join("sessions.jsonl");
    let mut store = JsonlResultStore::new(&log_path);
    store.append(&result)?;
    println!("\n✓ Session logged to {}", log_path.display());

    Ok(())
}

/// Drive the session without wall-clock pacing: every tick also submits a
/// synthetic well-aligned pose frame, and rep-based exercises get one rep per
/// tick. Used by integration tests.
fn run_auto(machine: &mut WorkoutSessionMachine) -> Option<SessionResult> {
    machine.play();

    // Bound the loop defensively; the catalog content finishes far earlier.
    for _ in 0..100_000u32 {
        if machine.status() == SessionStatus::Completed {
            break;
        }

        // Enough submissions that at least one frame per tick clears the
        // configured throttle stride
        for _ in 0..3 {
            machine.submit_frame(&simulated_frame());
        }
        if machine.status() == SessionStatus::Running
            && machine.current_exercise().reps.is_some()
        {
            machine.rep_completed();
        }
        machine.tick();
    }

    machine.stop()
}

/// A full-body frame with level shoulders and hips
fn simulated_frame() -> KeypointFrame {
    KeypointFrame::new()
        .with(BodyJoint::LeftShoulder, Landmark::new_2d(0.3, 0.4, 0.95))
        .with(BodyJoint::RightShoulder, Landmark::new_2d(0.7, 0.4, 0.95))
        .with(BodyJoint::LeftHip, Landmark::new_2d(0.35, 0.6, 0.95))
        .with(BodyJoint::RightHip, Landmark::new_2d(0.65, 0.6, 0.95))
        .with(BodyJoint::LeftKnee, Landmark::new_2d(0.35, 0.8, 0.95))
        .with(BodyJoint::RightKnee, Landmark::new_2d(0.65, 0.8, 0.95))
}

/// Interactive 1 Hz loop.
///
/// A reader thread forwards stdin lines over a channel; the main loop is the
/// single owner of the machine, folding in commands between ticks so events
/// and clock advances never race.
fn run_interactive(machine: &mut WorkoutSessionMachine) -> Option<SessionResult> {
    println!("Commands: Enter = rep done, p = pause, r = resume, s = skip, q = stop\n");

    let (tx, rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });

    machine.play();
    let tick_interval = Duration::from_secs(1);

    loop {
        if machine.status() == SessionStatus::Completed {
            return None;
        }

        match rx.recv_timeout(tick_interval) {
            Ok(line) => match line.trim() {
                "q" => return machine.stop(),
                "p" => machine.pause(),
                "r" => machine.resume(),
                "s" => machine.skip(),
                _ => {
                    machine.rep_completed();
                    if let Some(assessment) = machine.current_assessment() {
                        println!("  {}", assessment.feedback.message());
                    }
                }
            },
            Err(mpsc::RecvTimeoutError::Timeout) => {
                machine.tick();
                display_tick(machine);
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                // stdin closed: keep ticking on wall-clock pace
                std::thread::sleep(tick_interval);
                machine.tick();
                display_tick(machine);
            }
        }
    }
}

fn display_target(machine: &WorkoutSessionMachine) {
    let exercise = machine.current_exercise();
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  WORKOUT SESSION");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", exercise.name);
    if !exercise.description.is_empty() {
        println!("  {}", exercise.description);
    }
    println!("  Duration: {}s per set", exercise.duration_seconds);
    if let (Some(reps), Some(sets)) = (exercise.reps, exercise.sets) {
        println!("  Target: {} reps × {} sets", reps, sets);
    }
    println!();
    for (i, instruction) in exercise.instructions.iter().enumerate() {
        println!("  {}. {}", i + 1, instruction);
    }
    println!();
}

fn display_tick(machine: &WorkoutSessionMachine) {
    match machine.status() {
        SessionStatus::Resting => {
            println!(
                "  Rest {} (next: set {})",
                machine.rest_timer_display(),
                machine.current_set()
            );
        }
        SessionStatus::Running => {
            println!(
                "  [{}] {} | set {} rep {} | form {:.0}%",
                machine.timer_display(),
                machine.current_exercise().name,
                machine.current_set(),
                machine.current_rep(),
                machine.average_form_score() * 100.0
            );
        }
        _ => {}
    }
}

fn display_result(result: &SessionResult) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  SESSION COMPLETE");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", result.target_name);
    println!(
        "  Exercises: {}/{}",
        result.exercises_completed, result.exercises_planned
    );
    println!("  Total reps: {}", result.total_reps_completed);
    println!("  Duration: {}s", result.total_duration_seconds);
    println!("  Average form: {:.0}%", result.average_form_score * 100.0);
    println!("  Calories: ~{}", result.calories_burned);
}

fn cmd_stats(data_dir: PathBuf, range: TimeRange) -> Result<()> {
    let log_path = data_dir.join("sessions.jsonl");
    let results = store::read_results(&log_path)?;

    if results.is_empty() {
        println!("No sessions recorded yet.");
        return Ok(());
    }

    let now = chrono::Utc::now();
    let stats = aggregate(&results, range, now);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  STATISTICS");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Sessions: {}", stats.total_sessions);
    println!("  Minutes: {}", stats.total_minutes);
    println!("  Calories: {}", stats.total_calories);
    println!("  Average form: {:.0}%", stats.average_form_score * 100.0);
    println!(
        "  Streak: {} day(s) (longest {})",
        stats.current_streak, stats.longest_streak
    );

    println!("\n  Last 7 days:");
    for day in stats::daily_breakdown(&results, now, 7) {
        let bar = "█".repeat((day.minutes as usize).min(40));
        println!(
            "    {} {:>3} min {:>2} session(s) {}",
            day.date.format("%a"),
            day.minutes,
            day.session_count,
            bar
        );
    }

    let achievements = evaluate_achievements(&stats);
    if !achievements.is_empty() {
        println!("\n  Achievements:");
        for achievement in achievements {
            println!("    ★ {} — {}", achievement.name, achievement.description);
        }
    }
    println!();

    Ok(())
}

fn cmd_list() -> Result<()> {
    let catalog = get_default_catalog();

    println!("\nExercises:");
    let mut exercises: Vec<_> = catalog.exercises.values().collect();
    exercises.sort_by(|a, b| a.id.cmp(&b.id));
    for exercise in exercises {
        let targets = match (exercise.reps, exercise.sets) {
            (Some(reps), Some(sets)) => format!("{} reps × {} sets", reps, sets),
            _ => format!("{}s timed", exercise.duration_seconds),
        };
        println!(
            "  {:<15} {} ({:?}, {})",
            exercise.id, exercise.name, exercise.difficulty, targets
        );
    }

    println!("\nPlans:");
    let mut plans: Vec<_> = catalog.plans.values().collect();
    plans.sort_by(|a, b| a.id.cmp(&b.id));
    for plan in plans {
        println!(
            "  {:<22} {} ({} exercises, ~{} min)",
            plan.id,
            plan.name,
            plan.exercises.len(),
            plan.estimated_duration_minutes
        );
    }
    println!();

    Ok(())
}
