use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use lift_core::coverage::CoverageReport;
use lift_core::overload::suggest_for_exercise;
use lift_core::stats::{peak_one_rep_max, total_session_volume};
use lift_core::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "lift")]
#[command(about = "Muscle coverage and training analytics for logged workouts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Snapshot file (defaults to <data-dir>/snapshot.json)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Config file (defaults to the XDG config path)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reference time for weekly and trend figures (RFC 3339)
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Muscle coverage of a session against its split
    Coverage {
        /// Session id (defaults to the most recent session)
        #[arg(long)]
        session: Option<Uuid>,
    },

    /// Per-session volume and peak estimated 1RM
    Stats {
        /// Show only the most recent N sessions
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Progress toward the weekly session target
    Weekly,

    /// Rule-based training tips (default)
    Insights,

    /// Progressive overload suggestion for an exercise
    Suggest {
        /// Exercise name (case-insensitive)
        #[arg(long)]
        exercise: String,
    },

    /// Dashboard trends: split usage, strength trend, last 7 days
    Trends,

    /// Export every logged set to CSV
    ExportCsv {
        /// Output path
        #[arg(long)]
        out: PathBuf,
    },

    /// Validate the reference library (built-in plus custom exercises)
    Validate,
}

/// Everything a command needs, loaded once
struct Context {
    config: Config,
    library: Library,
    sessions: Vec<WorkoutSession>,
    now: DateTime<Utc>,
    week: WeekDefinition,
    json: bool,
}

fn main() -> ExitCode {
    lift_core::logging::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    let snapshot_path = cli
        .snapshot
        .clone()
        .unwrap_or_else(|| data_dir.join("snapshot.json"));

    let library = build_library(&config);
    let sessions = load_sessions(&snapshot_path, &library)?;
    let week = config.weekly.week_definition()?;

    let ctx = Context {
        config,
        library,
        sessions,
        now: cli.now.unwrap_or_else(Utc::now),
        week,
        json: cli.json,
    };

    match cli.command.unwrap_or(Commands::Insights) {
        Commands::Coverage { session } => cmd_coverage(&ctx, session),
        Commands::Stats { limit } => cmd_stats(&ctx, limit),
        Commands::Weekly => cmd_weekly(&ctx),
        Commands::Insights => cmd_insights(&ctx),
        Commands::Suggest { exercise } => cmd_suggest(&ctx, &exercise),
        Commands::Trends => cmd_trends(&ctx),
        Commands::ExportCsv { out } => cmd_export_csv(&ctx, &out),
        Commands::Validate => cmd_validate(&ctx),
    }
}

fn build_library(config: &Config) -> Library {
    let mut library = build_default_library();
    for seed in &config.library.custom_exercises {
        library.add_exercise(seed);
    }
    library
}

fn load_sessions(path: &Path, library: &Library) -> Result<Vec<WorkoutSession>> {
    if !path.exists() {
        tracing::info!("No snapshot found at {:?}, starting with empty history", path);
        return Ok(Vec::new());
    }
    let bundle = load_bundle(path)?;
    import_bundle(&bundle, library)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn progress_bar(progress: f64) -> String {
    const WIDTH: usize = 10;
    let filled = (progress.clamp(0.0, 1.0) * WIDTH as f64).round() as usize;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(WIDTH - filled))
}

fn cmd_coverage(ctx: &Context, session_id: Option<Uuid>) -> Result<()> {
    let session = match session_id {
        Some(id) => ctx.sessions.iter().find(|s| s.id == id),
        None => ctx.sessions.iter().max_by_key(|s| s.started_at),
    }
    .ok_or_else(|| Error::Other("No matching session found".into()))?;

    let split = session
        .workout_type_id
        .and_then(|id| ctx.library.split(id))
        .ok_or_else(|| Error::Other(format!("Session {} has no known split", session.id)))?;

    let report = build_report(session, split, &ctx.library, &ctx.config.coverage);

    if ctx.json {
        return print_json(&report);
    }
    display_coverage(&report);
    Ok(())
}

fn display_coverage(report: &CoverageReport) {
    println!("\n{} coverage {}", report.split_name, progress_bar(report.overall_progress()));
    println!();

    for group in &report.groups {
        println!(
            "  {:<10} {} {:>3.0}%  ({}/{} regions)",
            group.name,
            progress_bar(group.progress),
            group.progress * 100.0,
            group.touched_regions,
            group.total_regions
        );
        for region in &group.regions {
            let mark = if region.covered { "✓" } else if region.touched { "·" } else { " " };
            println!(
                "    {} {:<12} {:>3.0}%  {} sets  {}",
                mark,
                region.name,
                region.progress * 100.0,
                region.working_set_count,
                region.contributing_exercises.join(", ")
            );
        }
    }
    println!();
}

fn cmd_stats(ctx: &Context, limit: usize) -> Result<()> {
    let mut recent: Vec<&WorkoutSession> = ctx.sessions.iter().collect();
    recent.sort_by(|a, b| b.started_at.cmp(&a.started_at));
    recent.truncate(limit);

    #[derive(serde::Serialize)]
    struct SessionStats {
        id: Uuid,
        started_at: DateTime<Utc>,
        split: String,
        volume: f64,
        peak_one_rm: f64,
        active: bool,
    }

    let rows: Vec<SessionStats> = recent
        .iter()
        .map(|s| SessionStats {
            id: s.id,
            started_at: s.started_at,
            split: s
                .workout_type_id
                .and_then(|id| ctx.library.split(id))
                .map(|w| w.name.clone())
                .unwrap_or_else(|| "Unknown".into()),
            volume: total_session_volume(s),
            peak_one_rm: peak_one_rep_max(s),
            active: s.is_active(),
        })
        .collect();

    if ctx.json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        println!("No sessions logged yet.");
        return Ok(());
    }

    for row in rows {
        println!(
            "  {}  {:<10} volume {:>8.0}  e1RM {:>6.1}{}",
            row.started_at.format("%Y-%m-%d %H:%M"),
            row.split,
            row.volume,
            row.peak_one_rm,
            if row.active { "  (active)" } else { "" }
        );
    }
    Ok(())
}

fn cmd_weekly(ctx: &Context) -> Result<()> {
    let summary = weekly_consistency(
        &ctx.sessions,
        ctx.config.weekly.target_sessions,
        ctx.now,
        &ctx.week,
    );

    if ctx.json {
        #[derive(serde::Serialize)]
        struct WeeklyOutput {
            completed: i32,
            target: i32,
            remaining: i32,
            progress: f64,
        }
        return print_json(&WeeklyOutput {
            completed: summary.completed,
            target: summary.target,
            remaining: summary.remaining(),
            progress: summary.progress(),
        });
    }

    println!(
        "Week: {}/{} sessions {} ({} remaining)",
        summary.completed,
        summary.target,
        progress_bar(summary.progress()),
        summary.remaining()
    );
    if summary.target_met() {
        println!("✓ Weekly target reached");
    }
    Ok(())
}

fn cmd_insights(ctx: &Context) -> Result<()> {
    let tips = tips_for_sessions(
        &ctx.sessions,
        ctx.config.weekly.target_sessions,
        ctx.now,
        &ctx.week,
    );

    if ctx.json {
        return print_json(&tips);
    }

    for tip in tips {
        println!("• {}", tip.title);
        println!("  {}", tip.message);
    }
    Ok(())
}

fn cmd_suggest(ctx: &Context, exercise_name: &str) -> Result<()> {
    let exercise = ctx
        .library
        .exercise_by_name(exercise_name)
        .ok_or_else(|| Error::Other(format!("Unknown exercise: {}", exercise_name)))?;

    let suggestion = suggest_for_exercise(&ctx.sessions, exercise, &ctx.config.overload);

    if ctx.json {
        return print_json(&suggestion);
    }

    let Some(suggestion) = suggestion else {
        println!("No working sets logged for {} yet.", exercise.name);
        return Ok(());
    };

    println!("{}", exercise.name);
    println!("  {}", suggestion.message);
    if let Some(one_rm) = suggestion.estimated_one_rm {
        println!("  Estimated 1RM: {:.1}", one_rm);
    }
    for rec in &suggestion.recommendations {
        println!("    {:>2} reps → {}", rec.reps, rec.weight);
    }
    Ok(())
}

fn cmd_trends(ctx: &Context) -> Result<()> {
    let offset = ctx.week.offset;
    let distribution = trends::split_distribution(&ctx.sessions, &ctx.library, 6);
    let strength = trends::strength_trend(&ctx.sessions, 8);
    let delta = trends::strength_delta_percent(&ctx.sessions, ctx.now);
    let last_7_days = trends::consistency_last_7_days(&ctx.sessions, ctx.now, offset);
    let today_volume = trends::volume_on_day(
        &ctx.sessions,
        ctx.now.with_timezone(&offset).date_naive(),
        offset,
    );

    if ctx.json {
        #[derive(serde::Serialize)]
        struct TrendsOutput {
            today_volume: f64,
            split_distribution: Vec<trends::SplitCount>,
            strength_trend: Vec<trends::TrendPoint>,
            strength_delta_percent: f64,
            last_7_days: [bool; 7],
        }
        return print_json(&TrendsOutput {
            today_volume,
            split_distribution: distribution,
            strength_trend: strength,
            strength_delta_percent: delta,
            last_7_days,
        });
    }

    println!("Today's volume: {:.0}", today_volume);
    println!(
        "Last 7 days:    {}",
        last_7_days
            .iter()
            .map(|trained| if *trained { "■" } else { "□" })
            .collect::<Vec<_>>()
            .join(" ")
    );
    println!("Strength delta: {:+.1}%", delta);

    println!("\nRecent splits:");
    for entry in &distribution {
        println!("  {:<10} {}", entry.name, entry.count);
    }

    println!("\nPeak e1RM by session:");
    for point in &strength {
        println!("  {}  {:.1}", point.started_at.format("%Y-%m-%d"), point.value);
    }
    Ok(())
}

fn cmd_export_csv(ctx: &Context, out: &Path) -> Result<()> {
    let rows = csv_export::export_sets_csv(&ctx.sessions, &ctx.library, out)?;
    println!("✓ Exported {} sets to {}", rows, out.display());
    Ok(())
}

fn cmd_validate(ctx: &Context) -> Result<()> {
    let errors = ctx.library.validate();
    if errors.is_empty() {
        println!(
            "✓ Library OK: {} exercises, {} muscle groups, {} splits",
            ctx.library.exercises.len(),
            ctx.library.groups.len(),
            ctx.library.splits.len()
        );
        return Ok(());
    }

    eprintln!("Library validation errors:");
    for error in &errors {
        eprintln!("  - {}", error);
    }
    Err(Error::LibraryValidation(format!("{} problems found", errors.len())))
}
