use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::clients::fact_writer;
use crate::config::Config;
use crate::services::canonicalizer::ExerciseAliases;
use crate::services::output_formatter;
use crate::services::pipeline::TrainingPipeline;

mod clients;
mod config;
mod errors;
mod services;

/// Reshapes the training and bodyweight logs into a per-set fact table.
#[derive(Parser)]
#[command(name = "training-log-pipeline", version)]
struct Cli {
    /// Training log (one row per session and exercise, `set N` cells)
    #[arg(long, env = "TRAINING_LOG_PATH")]
    training_log: PathBuf,

    /// Bodyweight log with `Date` and `Weight (kg)` columns
    #[arg(long, env = "BODYWEIGHT_LOG_PATH")]
    bodyweight_log: PathBuf,

    /// Where to write the joined fact table
    #[arg(long, env = "FACT_TABLE_PATH")]
    output: PathBuf,

    #[arg(long, env = "WEEKLY_OUTPUT_PATH")]
    weekly_output: Option<PathBuf>,

    #[arg(long, env = "MONTHLY_OUTPUT_PATH")]
    monthly_output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let aliases = match &config.exercise_aliases_path {
        Some(path) => ExerciseAliases::from_path(path)
            .with_context(|| format!("loading exercise aliases from {}", path.display()))?,
        None => ExerciseAliases::builtin()?,
    };
    if aliases.is_empty() {
        tracing::warn!("exercise_aliases.empty");
    }
    tracing::info!(aliases = aliases.len(), "exercise_aliases.loaded");

    let unit = config.tonnage_unit;
    let pipeline = TrainingPipeline::new(config, aliases);
    let output = pipeline.run_files(&cli.training_log, &cli.bodyweight_log)?;

    output.report.log();
    tracing::info!(
        summary = %output_formatter::format_exercise_summary(&output.summary),
        "exercises.summary"
    );

    fact_writer::write_fact_table(&cli.output, output.fact_table())?;

    if let Some(path) = &cli.weekly_output {
        fact_writer::write_period_table(path, &output.weekly)?;
    }
    if let Some(path) = &cli.monthly_output {
        fact_writer::write_period_table(path, &output.monthly)?;
    }

    for line in output_formatter::format_period_lines(&output.monthly, unit) {
        tracing::debug!(%line, "tonnage.monthly");
    }

    tracing::info!(
        rows = output.fact_table().len(),
        path = %cli.output.display(),
        "fact_table.written"
    );
    Ok(())
}
