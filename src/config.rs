use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use crate::clients::models::raw::ColumnLayout;
use crate::errors::PipelineError;
use crate::services::cell_parser::NumberLocale;
use crate::services::derivation::{DerivationConfig, TonnageMode, TonnageUnit};

#[derive(Debug, Clone)]
pub struct Config {
    pub training_delimiter: u8,
    pub bodyweight_delimiter: u8,
    pub set_slots: usize,
    pub min_sets_per_exercise: usize,
    pub rolling_window: usize,
    pub rolling_strict: bool,
    pub tonnage_mode: TonnageMode,
    pub tonnage_unit: TonnageUnit,
    pub number_locale: NumberLocale,
    pub exercise_aliases_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            training_delimiter: b';',
            bodyweight_delimiter: b',',
            set_slots: 4,
            min_sets_per_exercise: 4,
            rolling_window: 100,
            rolling_strict: false,
            tonnage_mode: TonnageMode::SetCount,
            tonnage_unit: TonnageUnit::Kilograms,
            number_locale: NumberLocale::Auto,
            exercise_aliases_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let config = Self {
            training_delimiter: parse_delimiter(
                &env_or("CSV_DELIMITER", ";".to_string())?,
            )?,
            bodyweight_delimiter: parse_delimiter(
                &env_or("BODYWEIGHT_DELIMITER", ",".to_string())?,
            )?,
            set_slots: env_or("SET_SLOTS", defaults.set_slots)?,
            min_sets_per_exercise: env_or("MIN_SETS_PER_EXERCISE", defaults.min_sets_per_exercise)?,
            rolling_window: env_or("ROLLING_WINDOW", defaults.rolling_window)?,
            rolling_strict: env_or("ROLLING_STRICT", defaults.rolling_strict)?,
            tonnage_mode: env_or("TONNAGE_MODE", defaults.tonnage_mode)?,
            tonnage_unit: env_or("TONNAGE_UNIT", defaults.tonnage_unit)?,
            number_locale: env_or("NUMBER_LOCALE", defaults.number_locale)?,
            exercise_aliases_path: env::var("EXERCISE_ALIASES_PATH").ok().map(PathBuf::from),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.set_slots == 0 || self.set_slots > u8::MAX as usize {
            return Err(PipelineError::InvalidConfig(format!(
                "SET_SLOTS must be between 1 and {}, got {}",
                u8::MAX,
                self.set_slots
            )));
        }
        if self.rolling_window == 0 {
            return Err(PipelineError::InvalidConfig(
                "ROLLING_WINDOW must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn layout(&self) -> ColumnLayout {
        ColumnLayout::with_set_slots(self.set_slots)
    }

    pub fn derivation(&self) -> DerivationConfig {
        DerivationConfig {
            mode: self.tonnage_mode,
            unit: self.tonnage_unit,
            rolling_window: self.rolling_window,
            rolling_strict: self.rolling_strict,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{}: {}", key, e)),
        _ => Ok(default),
    }
}

fn parse_delimiter(value: &str) -> anyhow::Result<u8> {
    let delimiter = match value {
        "\\t" | "tab" => b'\t',
        other => {
            let bytes = other.as_bytes();
            if bytes.len() != 1 {
                anyhow::bail!("delimiter must be a single ASCII character, got '{}'", other);
            }
            bytes[0]
        }
    };
    Ok(delimiter)
}
