use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use liftrs::config::AppConfig;
use liftrs::logging::{init_logging, LogLevel};
use liftrs::models::{SetPerformance, WeightUnit};
use liftrs::one_rep_max::{calculate_1rm, estimated_rep_maxes, get_rpe_percentage, get_weight_for_rpe};
use liftrs::progression::{calculate_weight_suggestion, get_weight_from_history, ChangeType, WeightSuggestion};
use liftrs::recovery::{
    calculate_full_body_recovery, calculate_readiness_score, get_training_recommendation,
    MuscleRecoveryStatus, RecoveryStatus,
};
use liftrs::{input, LiftRsError};

/// liftrs - Strength Training Load & Recovery CLI
///
/// Estimates per-muscle recovery from recent training volume and suggests the
/// next working weight for an exercise from your last performance.
#[derive(Parser)]
#[command(name = "liftrs")]
#[command(version)]
#[command(about = "Strength training load and recovery CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of log output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show per-muscle recovery, readiness and a training recommendation
    Recovery {
        /// JSON file with per-session muscle volume
        #[arg(long, value_name = "FILE")]
        history: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Suggest the next weight for an exercise from its logged history
    Suggest {
        /// JSON file with per-exercise set history
        #[arg(long, value_name = "FILE")]
        history: PathBuf,

        /// Exercise name as logged
        #[arg(short, long)]
        exercise: String,

        /// Rep target (defaults to the configured target)
        #[arg(short = 'r', long)]
        target_reps: Option<u32>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Suggest the next weight from a single working set
    Set {
        /// Weight lifted
        #[arg(short, long)]
        weight: f64,

        /// Reps completed
        #[arg(short, long)]
        reps: u32,

        /// RPE of the set (defaults to 7)
        #[arg(long)]
        rpe: Option<f64>,

        /// Exercise name, used to pick the increment
        #[arg(short, long)]
        exercise: String,

        /// Rep target (defaults to the configured target)
        #[arg(short, long)]
        target_reps: Option<u32>,
    },

    /// Estimate a one-rep max and rep maxes from a set
    OneRm {
        /// Weight lifted
        #[arg(short, long)]
        weight: f64,

        /// Reps completed
        #[arg(short, long)]
        reps: u32,
    },

    /// Working weight for a rep target at a given RPE
    Rpe {
        /// Current one-rep max
        #[arg(long)]
        one_rm: f64,

        /// Target RPE (7 to 10 in half steps)
        #[arg(long)]
        rpe: f64,

        /// Target reps
        #[arg(short, long)]
        reps: u32,
    },

    /// Show or initialise the configuration file
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Tabled)]
struct RecoveryRow {
    #[tabled(rename = "Muscle")]
    muscle: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Recovery %")]
    recovery_percent: u8,
    #[tabled(rename = "Hours left")]
    hours_until_recovered: u32,
    #[tabled(rename = "Last worked")]
    last_worked: String,
    #[tabled(rename = "Sets")]
    sets: u32,
}

impl From<&MuscleRecoveryStatus> for RecoveryRow {
    fn from(status: &MuscleRecoveryStatus) -> Self {
        RecoveryRow {
            muscle: status.muscle.to_string(),
            status: status.status.to_string(),
            recovery_percent: status.recovery_percent,
            hours_until_recovered: status.hours_until_recovered,
            last_worked: status
                .last_worked_date
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
            sets: status.volume_score,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match (&cli.command, cli.config.as_deref()) {
        // `config --init --config FILE` creates FILE
        (Commands::Config { init: true }, Some(path)) if !path.exists() => AppConfig::default(),
        (_, path) => AppConfig::load_or_default(path)?,
    };
    if let Some(level) = LogLevel::from_verbosity(cli.verbose) {
        config.logging.level = level;
    }
    init_logging(&config.logging).context("Failed to initialise logging")?;

    if !config.display.color {
        colored::control::set_override(false);
    }

    run(cli.command, cli.config, &mut config).map_err(|err| match err.downcast::<LiftRsError>() {
        Ok(lift_err) => {
            tracing::error!(severity = ?lift_err.severity(), "{}", lift_err);
            anyhow::anyhow!(lift_err.user_message())
        }
        Err(err) => err,
    })
}

fn run(command: Commands, config_path: Option<PathBuf>, config: &mut AppConfig) -> Result<()> {
    let units = config.display.units;

    match command {
        Commands::Recovery { history, json } => {
            let records = input::load_volume_history(&history)?;
            let statuses = calculate_full_body_recovery(&records);
            let readiness = calculate_readiness_score(&statuses);
            let recommendation = get_training_recommendation(&statuses);

            if json {
                let output = serde_json::json!({
                    "readiness_score": readiness,
                    "muscles": statuses,
                    "recommendation": recommendation,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
                return Ok(());
            }

            let rows: Vec<RecoveryRow> = statuses.iter().map(RecoveryRow::from).collect();
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{}", table);
            println!();
            println!(
                "Readiness: {}",
                paint_status(&format!("{}/100", readiness), RecoveryStatus::from_recovery_percent(readiness))
            );
            println!("{}", recommendation.recommendation.bold());
            if !recommendation.avoid_muscles.is_empty() {
                let avoid: Vec<String> = recommendation.avoid_muscles.iter().map(|m| m.to_string()).collect();
                println!("  Avoid: {}", avoid.join(", ").red());
            }
        }

        Commands::Suggest {
            history,
            exercise,
            target_reps,
            json,
        } => {
            let entries = input::load_exercise_history(&history)?;
            let suggestion = get_weight_from_history(&entries, &exercise, target_reps, &config.progression);

            if json {
                println!("{}", serde_json::to_string_pretty(&suggestion)?);
                return Ok(());
            }

            match suggestion {
                Some(suggestion) => print_suggestion(&exercise, &suggestion, units),
                None => println!(
                    "{}",
                    format!("No working sets logged for {} yet", exercise).yellow()
                ),
            }
        }

        Commands::Set {
            weight,
            reps,
            rpe,
            exercise,
            target_reps,
        } => {
            validate_weight("weight", weight)?;
            validate_reps(reps)?;
            if let Some(rpe) = rpe {
                validate_rpe(rpe)?;
            }

            let last_set = SetPerformance::new(weight, reps, rpe);
            let target = target_reps.unwrap_or(config.progression.target_reps);
            let suggestion = calculate_weight_suggestion(&last_set, target, &exercise, &config.progression);
            print_suggestion(&exercise, &suggestion, units);
        }

        Commands::OneRm { weight, reps } => {
            validate_weight("weight", weight)?;
            validate_reps(reps)?;

            let one_rm = calculate_1rm(weight, reps);
            println!("{} {} {}", "Estimated 1RM:".bold(), one_rm, units);
            for (reps, weight) in estimated_rep_maxes(one_rm) {
                println!("  {:>2} reps  {} {}", reps, weight, units);
            }
        }

        Commands::Rpe { one_rm, rpe, reps } => {
            validate_weight("one-rm", one_rm)?;
            validate_reps(reps)?;
            validate_rpe(rpe)?;

            match (get_rpe_percentage(rpe, reps), get_weight_for_rpe(one_rm, rpe, reps)) {
                (Some(percentage), Some(weight)) => println!(
                    "{} reps @ RPE {}: {} {} {}",
                    reps,
                    rpe,
                    weight,
                    units,
                    format!("({}% of 1RM)", percentage).dimmed()
                ),
                _ => println!(
                    "{}",
                    format!("No RPE chart row for RPE {} (use 7 to 10 in half steps)", rpe).yellow()
                ),
            }
        }

        Commands::Config { init } => {
            let path = config_path.unwrap_or_else(AppConfig::default_config_path);
            if init {
                if path.exists() {
                    println!("Config already exists at {}", path.display());
                } else {
                    config.save_to_file(&path)?;
                    println!("{} {}", "✓ Wrote default config to".green(), path.display());
                }
            } else {
                println!("# {}", path.display().to_string().dimmed());
                println!("{}", toml::to_string_pretty(&*config)?);
            }
        }
    }

    Ok(())
}

fn print_suggestion(exercise: &str, suggestion: &WeightSuggestion, units: WeightUnit) {
    let headline = format!(
        "{}: {} {} ({:+})",
        exercise, suggestion.suggested_weight, units, suggestion.change
    );
    let headline = match suggestion.change_type {
        ChangeType::Increase => headline.green().bold(),
        ChangeType::Maintain => headline.yellow().bold(),
        ChangeType::Deload => headline.red().bold(),
    };
    println!("{}", headline);
    println!("  {}", suggestion.reason);
    println!("  Confidence: {}", suggestion.confidence);
}

fn paint_status(text: &str, status: RecoveryStatus) -> ColoredString {
    match status {
        RecoveryStatus::Recovered => text.green(),
        RecoveryStatus::Recovering => text.yellow(),
        RecoveryStatus::Fatigued => text.red(),
    }
}

fn validate_weight(name: &str, weight: f64) -> liftrs::Result<()> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(LiftRsError::invalid_argument(name, weight, "must be a positive number"));
    }
    Ok(())
}

fn validate_reps(reps: u32) -> liftrs::Result<()> {
    if reps == 0 {
        return Err(LiftRsError::invalid_argument("reps", reps, "must be at least 1"));
    }
    Ok(())
}

fn validate_rpe(rpe: f64) -> liftrs::Result<()> {
    if !(1.0..=10.0).contains(&rpe) {
        return Err(LiftRsError::invalid_argument("rpe", rpe, "must be between 1 and 10"));
    }
    Ok(())
}
