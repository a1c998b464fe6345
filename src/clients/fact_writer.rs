use std::path::Path;

use serde::Serialize;

use crate::clients::models::common::{PeriodTonnage, TrainingFact};
use crate::errors::PipelineError;

const FACT_COLUMNS: [&str; 8] = [
    "date",
    "exercise",
    "set_number",
    "reps",
    "weight",
    "bodyweight",
    "tonnage",
    "tonnage_avg",
];

const PERIOD_COLUMNS: [&str; 4] = ["period_end", "sets", "total_tonnage", "mean_tonnage"];

pub fn write_fact_table(path: &Path, facts: &[TrainingFact]) -> Result<(), PipelineError> {
    write_rows(path, &FACT_COLUMNS, facts)
}

pub fn write_period_table(path: &Path, periods: &[PeriodTonnage]) -> Result<(), PipelineError> {
    write_rows(path, &PERIOD_COLUMNS, periods)
}

/// The header is written explicitly so an empty table still yields a valid file.
fn write_rows<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<(), PipelineError> {
    let csv_error = |source: csv::Error| PipelineError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_error)?;

    writer.write_record(header).map_err(csv_error)?;
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), rows = rows.len(), "table.written");
    Ok(())
}
