use crate::clients::models::common::SetFact;
use crate::clients::models::raw::RawSessionRow;
use crate::errors::{ParseReport, RowError};
use crate::services::cell_parser::{self, NumberLocale};

/// Date cell value of a header row pasted back into the middle of the log.
pub const HEADER_PLACEHOLDER: &str = "Date";

/// Left-to-right scan giving every blank date the most recent non-blank
/// date above it. Rows before the first date stay blank.
pub fn carry_forward_dates(rows: Vec<RawSessionRow>) -> Vec<RawSessionRow> {
    let mut last_date: Option<String> = None;

    rows.into_iter()
        .map(|mut row| {
            match &row.date {
                Some(date) => last_date = Some(date.clone()),
                None => row.date = last_date.clone(),
            }
            row
        })
        .collect()
}

/// Fans every session row out into one `SetFact` per filled set slot.
///
/// Dates are carried forward first, so blank rows under a stray header row
/// inherit the placeholder and are dropped together with it. Zero-rep sets
/// are logged-but-not-performed work and never become facts.
pub fn normalize_sessions(
    rows: Vec<RawSessionRow>,
    locale: NumberLocale,
    report: &mut ParseReport,
) -> Vec<SetFact> {
    let mut facts = Vec::new();

    for row in carry_forward_dates(rows) {
        if row.date.as_deref() == Some(HEADER_PLACEHOLDER) {
            tracing::debug!(line = row.line, "normalizer.header_row_dropped");
            report.header_rows_dropped += 1;
            continue;
        }

        if is_spacer(&row) {
            continue;
        }

        let date = match row.date.as_deref() {
            Some(raw) => match cell_parser::parse_calendar_date(raw) {
                Some(date) => date,
                None => {
                    report.record_row(RowError::UnparseableDate {
                        line: row.line,
                        value: raw.to_string(),
                    });
                    continue;
                }
            },
            None => {
                report.record_row(RowError::MissingDate { line: row.line });
                continue;
            }
        };

        let exercise = match &row.exercise {
            Some(exercise) => exercise.trim().to_lowercase(),
            None => {
                report.record_row(RowError::MissingExercise { line: row.line });
                continue;
            }
        };

        for (slot, cell) in row.sets.iter().enumerate() {
            let parsed = match cell_parser::parse_set_cell(cell.as_deref(), locale) {
                Ok(Some(parsed)) => parsed,
                Ok(None) => continue,
                Err(e) => {
                    report.record_cell(e);
                    continue;
                }
            };

            if parsed.reps == 0 {
                report.zero_rep_sets += 1;
                continue;
            }

            facts.push(SetFact {
                date,
                exercise: exercise.clone(),
                set_number: (slot + 1) as u8,
                reps: parsed.reps,
                weight: parsed.weight,
            });
        }
    }

    tracing::info!(facts = facts.len(), "normalizer.completed");
    facts
}

fn is_spacer(row: &RawSessionRow) -> bool {
    row.exercise.is_none() && row.sets.iter().all(Option::is_none)
}
