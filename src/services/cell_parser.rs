use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use crate::errors::CellError;

static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[xX*×]").expect("valid separator regex"));
static LETTERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]").expect("valid letters regex"));

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%m/%d/%Y", "%d.%m.%Y"];
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Placeholders spreadsheets export for an empty cell.
const EMPTY_MARKERS: [&str; 3] = ["none", "nan", "null"];

/// Which decimal separator numeric cells may use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberLocale {
    /// Either `.` or `,`, but not both in one value.
    #[default]
    Auto,
    Dot,
    Comma,
}

impl FromStr for NumberLocale {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "dot" => Ok(Self::Dot),
            "comma" => Ok(Self::Comma),
            other => Err(format!("Unknown number locale: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedCell {
    pub reps: u32,
    pub weight: Option<f64>,
}

/// Parses a "reps x weight" cell.
///
/// `Ok(None)` means no set was performed in this slot (blank cell or an
/// exported placeholder such as `None`). The cell is split on every
/// `x`/`*`: the first piece is the rep count, the second the weight, and
/// anything after a further separator is ignored. Without a separator the
/// whole text is the rep count.
pub fn parse_set_cell(raw: Option<&str>, locale: NumberLocale) -> Result<Option<ParsedCell>, CellError> {
    let text = match raw.map(str::trim) {
        Some(text) if !is_empty_marker(text) => text,
        _ => return Ok(None),
    };

    let malformed = || CellError::Malformed {
        raw: text.to_string(),
    };

    let mut pieces = SEPARATOR_RE.splitn(text, 3);
    let reps_text = pieces.next().unwrap_or_default();
    let weight_text = pieces.next();

    let reps = parse_reps(reps_text).ok_or_else(malformed)?;

    let weight = match weight_text.map(strip_letters) {
        Some(weight) if !weight.is_empty() => {
            Some(parse_decimal(&weight, locale).ok_or_else(malformed)?)
        }
        _ => None,
    };

    Ok(Some(ParsedCell { reps, weight }))
}

/// Rep counts are whole numbers; `"8.0"` from a float-typed export is accepted.
pub fn parse_reps(text: &str) -> Option<u32> {
    let cleaned = strip_letters(text);
    if let Ok(reps) = cleaned.parse::<u32>() {
        return Some(reps);
    }

    parse_decimal(&cleaned, NumberLocale::Auto)
        .filter(|value| *value >= 0.0 && value.fract() == 0.0 && *value <= u32::MAX as f64)
        .map(|value| value as u32)
}

/// Parses a decimal number honouring `locale`. Grouping separators are not
/// supported, so a value carrying both `.` and `,` is rejected.
pub fn parse_decimal(text: &str, locale: NumberLocale) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let commas = text.matches(',').count();
    let dots = text.matches('.').count();

    let normalized = match (locale, commas, dots) {
        (_, 0, _) if locale != NumberLocale::Comma || dots == 0 => text.to_string(),
        (NumberLocale::Auto | NumberLocale::Comma, 1, 0) => text.replacen(',', ".", 1),
        _ => return None,
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parses a calendar date, ignoring a trailing time-of-day if one is present.
pub fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let (date_part, time_part) = match text.split_once([' ', 'T']) {
        Some((date, time)) => (date, Some(time.trim())),
        None => (text, None),
    };

    if let Some(time) = time_part {
        let valid_time = TIME_FORMATS
            .iter()
            .any(|format| NaiveTime::parse_from_str(time, format).is_ok());
        if !valid_time {
            return None;
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

fn strip_letters(text: &str) -> String {
    LETTERS_RE.replace_all(text, "").trim().to_string()
}

fn is_empty_marker(text: &str) -> bool {
    text.is_empty()
        || EMPTY_MARKERS
            .iter()
            .any(|marker| text.eq_ignore_ascii_case(marker))
}
