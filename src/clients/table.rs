use std::fs::File;
use std::path::Path;

use crate::clients::models::raw::{RawRow, RawTable};
use crate::errors::PipelineError;

/// Reads a delimited file with a header row into memory. Ragged rows are
/// kept as-is; short rows simply have fewer cells. Rows that are not valid
/// UTF-8 are left out and their line numbers kept in `undecodable_lines`.
pub fn read_table(path: &Path, delimiter: u8) -> Result<RawTable, PipelineError> {
    let file = File::open(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let csv_error = |source: csv::Error| PipelineError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .byte_headers()
        .map_err(csv_error)?
        .iter()
        .map(|header| {
            String::from_utf8_lossy(header)
                .trim_start_matches('\u{feff}')
                .trim()
                .to_string()
        })
        .collect();

    let mut rows = Vec::new();
    let mut undecodable_lines = Vec::new();
    for record in reader.byte_records() {
        let record = record.map_err(csv_error)?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        match csv::StringRecord::from_byte_record(record) {
            Ok(record) => rows.push(RawRow {
                line,
                cells: record.iter().map(str::to_string).collect(),
            }),
            Err(err) => {
                tracing::debug!(line, error = %err.utf8_error(), "table.row_not_utf8");
                undecodable_lines.push(line);
            }
        }
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "table.read");

    Ok(RawTable {
        path: path.to_path_buf(),
        headers,
        rows,
        undecodable_lines,
    })
}
