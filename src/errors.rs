use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} has no column named '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("invalid exercise alias table: {0}")]
    AliasTable(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A row that cannot be placed in the timeline. Collected, never fatal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error("line {line}: unparseable date '{value}'")]
    UnparseableDate { line: u64, value: String },

    #[error("line {line}: no date on this row or any row before it")]
    MissingDate { line: u64 },

    #[error("line {line}: blank exercise name")]
    MissingExercise { line: u64 },

    #[error("line {line}: unparseable bodyweight '{value}'")]
    UnparseableBodyweight { line: u64, value: String },

    #[error("line {line}: not valid UTF-8")]
    NotUtf8 { line: u64 },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CellError {
    #[error("malformed set cell '{raw}'")]
    Malformed { raw: String },
}

const SAMPLE_LIMIT: usize = 5;

/// Parse failures collected over a run and reported once at the end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub rows_skipped: usize,
    pub cells_skipped: usize,
    pub zero_rep_sets: usize,
    pub header_rows_dropped: usize,
    pub row_error_samples: Vec<RowError>,
    pub cell_error_samples: Vec<CellError>,
}

impl ParseReport {
    pub fn record_row(&mut self, error: RowError) {
        tracing::debug!(error = %error, "row.skipped");
        self.rows_skipped += 1;
        if self.row_error_samples.len() < SAMPLE_LIMIT {
            self.row_error_samples.push(error);
        }
    }

    pub fn record_cell(&mut self, error: CellError) {
        tracing::debug!(error = %error, "cell.skipped");
        self.cells_skipped += 1;
        if self.cell_error_samples.len() < SAMPLE_LIMIT {
            self.cell_error_samples.push(error);
        }
    }

    pub fn has_errors(&self) -> bool {
        self.rows_skipped > 0 || self.cells_skipped > 0
    }

    pub fn log(&self) {
        if !self.has_errors() {
            tracing::info!("parse_report.clean");
        }
        if self.rows_skipped > 0 {
            let samples: Vec<String> = self
                .row_error_samples
                .iter()
                .map(ToString::to_string)
                .collect();
            tracing::warn!(
                rows_skipped = self.rows_skipped,
                samples = ?samples,
                "parse_report.rows_skipped"
            );
        }
        if self.cells_skipped > 0 {
            let samples: Vec<String> = self
                .cell_error_samples
                .iter()
                .map(ToString::to_string)
                .collect();
            tracing::warn!(
                cells_skipped = self.cells_skipped,
                samples = ?samples,
                "parse_report.cells_skipped"
            );
        }
        tracing::info!(
            zero_rep_sets = self.zero_rep_sets,
            header_rows_dropped = self.header_rows_dropped,
            "parse_report.summary"
        );
    }
}
