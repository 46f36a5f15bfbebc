use coach_core::journal::{recent_summaries, JOURNAL_FILE};
use coach_core::*;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "repcoach")]
#[command(about = "Companion workout coach: rep counting and coaching cues", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded stream of pose samples through a workout
    Replay {
        /// JSONL file of pose samples
        file: PathBuf,

        /// Exercise name or description (squat, arm raise, jumping jacks...)
        #[arg(long)]
        exercise: Option<String>,

        /// Target number of reps
        #[arg(long)]
        target: Option<u32>,

        /// Dry run - print the workout without recording it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show recorded workouts, newest first
    History {
        /// Maximum number of workouts to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

/// Longest replay accepted, one day
const MAX_REPLAY_SECS: f64 = 86_400.0;

/// One line of a replay file: a pose frame stamped with seconds since start
#[derive(Debug, Deserialize)]
struct ReplaySample {
    t: f64,
    #[serde(flatten)]
    frame: PoseFrame,
}

fn main() -> Result<()> {
    coach_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Commands::Replay {
            file,
            exercise,
            target,
            dry_run,
        } => cmd_replay(&file, exercise, target, dry_run, &data_dir, &config),
        Commands::History { limit } => cmd_history(&data_dir, limit),
    }
}

fn parse_exercise(name: &str) -> Result<ExerciseType> {
    name.parse::<ExerciseType>()
        .or_else(|e| match_exercise(name).ok_or(e))
}

/// Samples paired with their offset from the start of the workout
fn read_samples(path: &Path) -> Result<Vec<(Duration, PoseFrame)>> {
    let reader = BufReader::new(File::open(path)?);
    let mut samples = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        let sample: ReplaySample = serde_json::from_str(&line).map_err(|e| {
            Error::Other(format!("{}:{}: {}", path.display(), line_num + 1, e))
        })?;
        let offset = Duration::try_from_secs_f64(sample.t)
            .ok()
            .filter(|_| sample.t <= MAX_REPLAY_SECS)
            .ok_or_else(|| {
                Error::Other(format!(
                    "{}:{}: sample time must be a non-negative number of seconds up to {}, got {}",
                    path.display(),
                    line_num + 1,
                    MAX_REPLAY_SECS,
                    sample.t
                ))
            })?;
        samples.push((offset, sample.frame));
    }

    tracing::debug!("Read {} samples from {:?}", samples.len(), path);
    Ok(samples)
}

fn cmd_replay(
    file: &Path,
    exercise: Option<String>,
    target: Option<u32>,
    dry_run: bool,
    data_dir: &Path,
    config: &Config,
) -> Result<()> {
    let samples = read_samples(file)?;

    let start = Instant::now();
    let mut session = WorkoutSession::from_config(config, start);
    if let Some(name) = exercise {
        session.set_exercise(parse_exercise(&name)?);
    }
    if let Some(target) = target {
        session.set_target_reps(target);
    }

    let mut phrases = PhraseBook::new();
    for cue in session.start(start) {
        say(0.0, &mut phrases, &cue);
    }

    let mut pose_lost = false;
    let mut elapsed = Duration::ZERO;

    for (offset, frame) in &samples {
        // Replay clock never runs backwards
        elapsed = elapsed.max(*offset);
        let now = start + elapsed;
        let last_t = elapsed.as_secs_f64();

        match session.process_frame(frame, now) {
            FrameOutcome::NoPose { confidence } => {
                if !pose_lost {
                    println!(
                        "[{:6.1}s] No pose detected (confidence {:.2})",
                        last_t, confidence
                    );
                    pose_lost = true;
                }
            }
            FrameOutcome::Inactive => {}
            FrameOutcome::Tracked(report) => {
                pose_lost = false;
                let counted = report
                    .events
                    .iter()
                    .any(|e| matches!(e, TrackerEvent::RepCompleted { .. }));
                for event in &report.events {
                    match event {
                        TrackerEvent::PhaseChanged { to, .. } if !counted => {
                            println!("[{:6.1}s] {:<9} {}", last_t, to, report.feedback);
                        }
                        TrackerEvent::PhaseChanged { .. } => {}
                        TrackerEvent::RepAborted => {}
                        TrackerEvent::RepCompleted { rep_count, .. } => {
                            println!(
                                "[{:6.1}s] Rep {}/{}  {}",
                                last_t, rep_count, report.target_reps, report.feedback
                            );
                        }
                        TrackerEvent::TargetReached { rep_count } => {
                            println!("[{:6.1}s] ★ Target reached: {} reps", last_t, rep_count);
                        }
                    }
                }
                for cue in &report.cues {
                    say(last_t, &mut phrases, cue);
                }
            }
        }
    }

    let Some(summary) = session.stop(start + elapsed) else {
        return Err(Error::Session("workout was not running".into()));
    };
    say(elapsed.as_secs_f64(), &mut phrases, &summary.finish_cue());

    display_summary(&summary);

    if dry_run {
        println!("\n[Dry run - not recording workout]");
        return Ok(());
    }

    let mut journal = JsonlJournal::in_data_dir(data_dir);
    journal.record(&summary)?;
    println!("\n✓ Workout recorded!");
    println!("  Journal: {}", journal.path().display());

    Ok(())
}

fn say(t: f64, phrases: &mut PhraseBook, cue: &Cue) {
    println!("[{:6.1}s] Coach: \"{}\"", t, phrases.render(cue));
}

fn display_summary(summary: &WorkoutSummary) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  WORKOUT SUMMARY");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Exercise: {}", summary.exercise.display_name());
    println!("  Reps: {}/{}", summary.rep_count, summary.target_reps);
    println!("  Duration: {:.1}s", summary.duration_secs);
    println!("  Teases: {}", summary.teases);
    if summary.target_reached {
        println!("  ✓ Target reached");
    }
}

fn cmd_history(data_dir: &Path, limit: usize) -> Result<()> {
    let path = data_dir.join(JOURNAL_FILE);
    let summaries = recent_summaries(&path, limit)?;

    if summaries.is_empty() {
        println!("No workouts recorded yet.");
        return Ok(());
    }

    for summary in &summaries {
        println!(
            "{}  {:<14} {:>3}/{:<3} {:>6.0}s{}",
            summary.finished_at.format("%Y-%m-%d %H:%M"),
            summary.exercise.display_name(),
            summary.rep_count,
            summary.target_reps,
            summary.duration_secs,
            if summary.target_reached { "  ✓" } else { "" }
        );
    }

    Ok(())
}
