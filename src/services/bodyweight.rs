use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::clients::models::common::BodyweightRecord;
use crate::clients::models::raw::RawBodyweightRow;
use crate::errors::{ParseReport, RowError};
use crate::services::cell_parser::{self, NumberLocale};

/// Parses the bodyweight log and collapses it to one mean value per day.
pub fn normalize_bodyweight(
    rows: Vec<RawBodyweightRow>,
    locale: NumberLocale,
    report: &mut ParseReport,
) -> Vec<BodyweightRecord> {
    let mut entries = Vec::with_capacity(rows.len());

    for row in rows {
        let (raw_date, raw_weight) = match (row.date, row.weight) {
            (None, None) => continue,
            (Some(date), weight) => (date, weight.unwrap_or_default()),
            (None, _) => {
                report.record_row(RowError::MissingDate { line: row.line });
                continue;
            }
        };

        let Some(date) = cell_parser::parse_calendar_date(&raw_date) else {
            report.record_row(RowError::UnparseableDate {
                line: row.line,
                value: raw_date,
            });
            continue;
        };

        let Some(weight) = cell_parser::parse_decimal(&raw_weight, locale) else {
            report.record_row(RowError::UnparseableBodyweight {
                line: row.line,
                value: raw_weight,
            });
            continue;
        };

        entries.push((date, weight));
    }

    let records = average_by_day(entries);
    tracing::info!(days = records.len(), "bodyweight.normalized");
    records
}

/// Arithmetic mean per calendar day, ascending by date.
pub fn average_by_day<I>(entries: I) -> Vec<BodyweightRecord>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for (date, weight) in entries {
        let (sum, count) = days.entry(date).or_insert((0.0, 0));
        *sum += weight;
        *count += 1;
    }

    days.into_iter()
        .map(|(date, (sum, count))| BodyweightRecord {
            date,
            bodyweight: sum / count as f64,
        })
        .collect()
}
