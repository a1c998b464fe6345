use std::path::PathBuf;

use crate::errors::PipelineError;

/// A delimited file as read from disk, untouched apart from trimming headers.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    /// Lines skipped because they were not valid UTF-8.
    pub undecodable_lines: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub line: u64,
    pub cells: Vec<String>,
}

/// One training-day entry as typed by hand. Blank cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSessionRow {
    pub line: u64,
    pub date: Option<String>,
    pub exercise: Option<String>,
    pub sets: Vec<Option<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawBodyweightRow {
    pub line: u64,
    pub date: Option<String>,
    pub weight: Option<String>,
}

/// Which columns of the raw files the pipeline keeps.
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    pub date: String,
    pub exercise: Vec<String>,
    pub set_prefix: String,
    pub set_slots: usize,
    pub bodyweight_date: String,
    pub bodyweight: String,
}

impl ColumnLayout {
    pub fn with_set_slots(set_slots: usize) -> Self {
        Self {
            set_slots,
            ..Self::default()
        }
    }

    pub fn set_column(&self, slot: usize) -> String {
        format!("{} {}", self.set_prefix, slot)
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            date: "Date".to_string(),
            exercise: vec!["exercise".to_string(), "excercise".to_string()],
            set_prefix: "set".to_string(),
            set_slots: 4,
            bodyweight_date: "Date".to_string(),
            bodyweight: "Weight (kg)".to_string(),
        }
    }
}

impl RawTable {
    /// A 0-byte file: no header row and nothing under it.
    pub fn is_blank(&self) -> bool {
        self.headers.iter().all(|header| header.is_empty())
            && self.rows.is_empty()
            && self.undecodable_lines.is_empty()
    }

    /// Position of the first header matching any of `names`, ignoring case and padding.
    pub fn column_index<S: AsRef<str>>(&self, names: &[S]) -> Option<usize> {
        names.iter().find_map(|name| {
            let wanted = name.as_ref().trim();
            self.headers
                .iter()
                .position(|header| header.trim().eq_ignore_ascii_case(wanted))
        })
    }

    fn require_column<S: AsRef<str>>(&self, names: &[S]) -> Result<usize, PipelineError> {
        self.column_index(names)
            .ok_or_else(|| PipelineError::MissingColumn {
                path: self.path.clone(),
                column: names
                    .first()
                    .map(|name| name.as_ref().to_string())
                    .unwrap_or_default(),
            })
    }

    /// Projects the table onto the training-log layout. Set columns absent
    /// from the file read as empty slots.
    pub fn session_rows(&self, layout: &ColumnLayout) -> Result<Vec<RawSessionRow>, PipelineError> {
        if self.is_blank() {
            return Ok(Vec::new());
        }
        let date_idx = self.require_column(&[layout.date.as_str()])?;
        let exercise_idx = self.require_column(&layout.exercise)?;
        let set_indices: Vec<Option<usize>> = (1..=layout.set_slots)
            .map(|slot| self.column_index(&[layout.set_column(slot)]))
            .collect();

        Ok(self
            .rows
            .iter()
            .map(|row| RawSessionRow {
                line: row.line,
                date: row.cell(date_idx),
                exercise: row.cell(exercise_idx),
                sets: set_indices
                    .iter()
                    .map(|idx| idx.and_then(|i| row.cell(i)))
                    .collect(),
            })
            .collect())
    }

    pub fn bodyweight_rows(
        &self,
        layout: &ColumnLayout,
    ) -> Result<Vec<RawBodyweightRow>, PipelineError> {
        if self.is_blank() {
            return Ok(Vec::new());
        }
        let date_idx = self.require_column(&[layout.bodyweight_date.as_str()])?;
        let weight_idx = self.require_column(&[layout.bodyweight.as_str()])?;

        Ok(self
            .rows
            .iter()
            .map(|row| RawBodyweightRow {
                line: row.line,
                date: row.cell(date_idx),
                weight: row.cell(weight_idx),
            })
            .collect())
    }
}

impl RawRow {
    /// Cell text, or `None` when the cell is missing or only whitespace.
    pub fn cell(&self, idx: usize) -> Option<String> {
        self.cells
            .get(idx)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }
}
