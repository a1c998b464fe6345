use std::path::Path;

use crate::clients::models::common::{PeriodTonnage, TrainingFact};
use crate::clients::models::raw::RawTable;
use crate::clients::table;
use crate::config::Config;
use crate::errors::{ParseReport, PipelineError, RowError};
use crate::services::canonicalizer::{self, ExerciseAliases, ExerciseSummary};
use crate::services::resample::{self, Period};
use crate::services::{bodyweight, derivation, normalizer};

const SUMMARY_TOP_EXERCISES: usize = 10;

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub facts: Vec<TrainingFact>,
    pub weekly: Vec<PeriodTonnage>,
    pub monthly: Vec<PeriodTonnage>,
    pub summary: ExerciseSummary,
    pub report: ParseReport,
}

impl PipelineOutput {
    /// The final joined fact table, as consumed by reporting.
    pub fn fact_table(&self) -> &[TrainingFact] {
        &self.facts
    }
}

#[derive(Debug, Clone)]
pub struct TrainingPipeline {
    config: Config,
    aliases: ExerciseAliases,
}

impl TrainingPipeline {
    pub fn new(config: Config, aliases: ExerciseAliases) -> Self {
        Self { config, aliases }
    }

    pub fn run_files(
        &self,
        training_path: &Path,
        bodyweight_path: &Path,
    ) -> Result<PipelineOutput, PipelineError> {
        let training = table::read_table(training_path, self.config.training_delimiter)?;
        tracing::info!(rows = training.rows.len(), "training_log.loaded");

        let bodyweight = table::read_table(bodyweight_path, self.config.bodyweight_delimiter)?;
        tracing::info!(rows = bodyweight.rows.len(), "bodyweight_log.loaded");

        self.run(&training, &bodyweight)
    }

    /// Recomputes the whole fact table from the two raw logs.
    pub fn run(
        &self,
        training: &RawTable,
        bodyweight_log: &RawTable,
    ) -> Result<PipelineOutput, PipelineError> {
        let layout = self.config.layout();
        let locale = self.config.number_locale;
        let mut report = ParseReport::default();

        if training.rows.is_empty() {
            tracing::warn!(path = %training.path.display(), "training_log.empty");
        }
        if bodyweight_log.rows.is_empty() {
            tracing::warn!(path = %bodyweight_log.path.display(), "bodyweight_log.empty");
        }
        for &line in training
            .undecodable_lines
            .iter()
            .chain(&bodyweight_log.undecodable_lines)
        {
            report.record_row(RowError::NotUtf8 { line });
        }

        let sessions = training.session_rows(&layout)?;
        let sets = normalizer::normalize_sessions(sessions, locale, &mut report);
        let sets = canonicalizer::canonicalize(
            sets,
            &self.aliases,
            self.config.min_sets_per_exercise,
        );

        let summary = canonicalizer::summarize(&sets, SUMMARY_TOP_EXERCISES);

        let weigh_ins = bodyweight_log.bodyweight_rows(&layout)?;
        let daily = bodyweight::normalize_bodyweight(weigh_ins, locale, &mut report);

        let facts = derivation::derive_fact_table(sets, &daily, &self.config.derivation());
        if facts.is_empty() {
            tracing::warn!("fact_table.empty");
        }

        let weekly = resample::resample(&facts, Period::Week);
        let monthly = resample::resample(&facts, Period::Month);

        Ok(PipelineOutput {
            facts,
            weekly,
            monthly,
            summary,
            report,
        })
    }
}
