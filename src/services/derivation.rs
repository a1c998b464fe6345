use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::clients::models::common::{BodyweightRecord, SetFact, TrainingFact};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TonnageMode {
    /// `weight * reps * sets logged for that exercise that day`.
    #[default]
    SetCount,
    /// `weight * reps`; summing a session's rows gives its true volume.
    PerSet,
}

impl FromStr for TonnageMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "set_count" => Ok(Self::SetCount),
            "per_set" => Ok(Self::PerSet),
            other => Err(format!("Unknown tonnage mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TonnageUnit {
    #[default]
    Kilograms,
    Tonnes,
}

impl TonnageUnit {
    fn divisor(self) -> f64 {
        match self {
            Self::Kilograms => 1.0,
            Self::Tonnes => 1000.0,
        }
    }
}

impl FromStr for TonnageUnit {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kg" | "kilograms" => Ok(Self::Kilograms),
            "t" | "tonnes" => Ok(Self::Tonnes),
            other => Err(format!("Unknown tonnage unit: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivationConfig {
    pub mode: TonnageMode,
    pub unit: TonnageUnit,
    pub rolling_window: usize,
    /// Emit no average until the window is full.
    pub rolling_strict: bool,
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            mode: TonnageMode::default(),
            unit: TonnageUnit::default(),
            rolling_window: 100,
            rolling_strict: false,
        }
    }
}

/// Left-joins bodyweight onto the set facts and derives the tonnage columns.
///
/// Output is ordered by date, then exercise, then set number. Training days
/// without a weigh-in keep `bodyweight = None`; weigh-ins without training
/// are dropped.
pub fn derive_fact_table(
    mut facts: Vec<SetFact>,
    bodyweight: &[BodyweightRecord],
    config: &DerivationConfig,
) -> Vec<TrainingFact> {
    facts.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.exercise.cmp(&b.exercise))
            .then_with(|| a.set_number.cmp(&b.set_number))
    });

    let by_day: HashMap<NaiveDate, f64> = bodyweight
        .iter()
        .map(|record| (record.date, record.bodyweight))
        .collect();

    let factors: Vec<f64> = match config.mode {
        TonnageMode::SetCount => {
            let counts = session_set_counts(&facts);
            facts
                .iter()
                .map(|set| {
                    counts
                        .get(&(set.date, set.exercise.as_str()))
                        .copied()
                        .unwrap_or(1) as f64
                })
                .collect()
        }
        TonnageMode::PerSet => vec![1.0; facts.len()],
    };

    let mut table: Vec<TrainingFact> = facts
        .into_iter()
        .zip(factors)
        .map(|(set, factor)| {
            let tonnage = set
                .weight
                .map(|weight| weight * set.reps as f64 * factor / config.unit.divisor());
            let bodyweight = by_day.get(&set.date).copied();
            TrainingFact::from_set(set, bodyweight, tonnage)
        })
        .collect();

    let tonnage: Vec<Option<f64>> = table.iter().map(|fact| fact.tonnage).collect();
    let averages = rolling_mean(&tonnage, config.rolling_window, config.rolling_strict);
    for (fact, average) in table.iter_mut().zip(averages) {
        fact.tonnage_avg = average;
    }

    let unmatched = table.iter().filter(|fact| fact.bodyweight.is_none()).count();
    tracing::info!(rows = table.len(), without_bodyweight = unmatched, "derivation.completed");
    table
}

/// Rows per (date, exercise), i.e. the sets logged for that exercise that day.
fn session_set_counts(facts: &[SetFact]) -> HashMap<(NaiveDate, &str), usize> {
    let mut counts = HashMap::new();
    for fact in facts {
        *counts.entry((fact.date, fact.exercise.as_str())).or_insert(0) += 1;
    }
    counts
}

/// Trailing mean over the last `window` rows, skipping missing values.
///
/// Missing values still occupy a slot in the window. A window holding no
/// values yields `None`, and so does every row before the window fills when
/// `strict` is set.
pub fn rolling_mean(values: &[Option<f64>], window: usize, strict: bool) -> Vec<Option<f64>> {
    let window = window.max(1);

    (0..values.len())
        .map(|i| {
            if strict && i + 1 < window {
                return None;
            }
            let start = (i + 1).saturating_sub(window);
            let present: Vec<f64> = values[start..=i].iter().flatten().copied().collect();
            if present.is_empty() {
                None
            } else {
                Some(present.iter().sum::<f64>() / present.len() as f64)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 2, d).unwrap()
    }

    fn set(d: u32, exercise: &str, set_number: u8, reps: u32, weight: Option<f64>) -> SetFact {
        SetFact {
            date: day(d),
            exercise: exercise.to_string(),
            set_number,
            reps,
            weight,
        }
    }

    #[test]
    fn test_left_join_keeps_days_without_weigh_in() {
        let facts = vec![
            set(1, "squats", 1, 5, Some(100.0)),
            set(2, "squats", 1, 5, Some(100.0)),
        ];
        let bodyweight = [
            BodyweightRecord {
                date: day(1),
                bodyweight: 81.0,
            },
            BodyweightRecord {
                date: day(3),
                bodyweight: 80.0,
            },
        ];

        let table = derive_fact_table(facts, &bodyweight, &DerivationConfig::default());

        assert_eq!(table.len(), 2);
        assert_eq!(table[0].bodyweight, Some(81.0));
        assert_eq!(table[1].bodyweight, None);
    }

    #[test]
    fn test_set_count_tonnage() {
        let facts = vec![
            set(1, "squats", 1, 5, Some(100.0)),
            set(1, "squats", 2, 5, Some(100.0)),
            set(1, "squats", 3, 4, Some(100.0)),
            set(1, "pull ups", 1, 8, None),
        ];

        let table = derive_fact_table(facts, &[], &DerivationConfig::default());

        let tonnage: Vec<Option<f64>> = table.iter().map(|f| f.tonnage).collect();
        // pull ups sort before squats
        assert_eq!(tonnage, vec![None, Some(1500.0), Some(1500.0), Some(1200.0)]);
    }

    #[test]
    fn test_per_set_tonnage_in_tonnes() {
        let config = DerivationConfig {
            mode: TonnageMode::PerSet,
            unit: TonnageUnit::Tonnes,
            ..DerivationConfig::default()
        };
        let facts = vec![
            set(1, "squats", 1, 5, Some(100.0)),
            set(1, "squats", 2, 5, Some(100.0)),
        ];

        let table = derive_fact_table(facts, &[], &config);

        assert_eq!(table[0].tonnage, Some(0.5));
        let session_total: f64 = table.iter().filter_map(|f| f.tonnage).sum();
        assert_eq!(session_total, 1.0);
    }

    #[test]
    fn test_output_order_is_date_exercise_set() {
        let facts = vec![
            set(2, "bench press", 1, 5, Some(60.0)),
            set(1, "squats", 2, 5, Some(100.0)),
            set(1, "squats", 1, 5, Some(100.0)),
            set(1, "bench press", 1, 5, Some(60.0)),
        ];

        let table = derive_fact_table(facts, &[], &DerivationConfig::default());

        let keys: Vec<(u32, &str, u8)> = table
            .iter()
            .map(|f| (chrono::Datelike::day(&f.date), f.exercise.as_str(), f.set_number))
            .collect();
        assert_eq!(
            keys,
            vec![
                (1, "bench press", 1),
                (1, "squats", 1),
                (1, "squats", 2),
                (2, "bench press", 1),
            ]
        );
    }

    #[test]
    fn test_rolling_mean_partial_window() {
        let values = [Some(10.0), Some(20.0), None, Some(30.0), Some(40.0)];

        let averages = rolling_mean(&values, 3, false);

        assert_eq!(
            averages,
            vec![Some(10.0), Some(15.0), Some(15.0), Some(25.0), Some(35.0)]
        );
    }

    #[test]
    fn test_rolling_mean_strict_window() {
        let values = [Some(10.0), Some(20.0), Some(30.0), Some(40.0)];

        let averages = rolling_mean(&values, 3, true);

        assert_eq!(averages, vec![None, None, Some(20.0), Some(30.0)]);
    }

    #[test]
    fn test_rolling_mean_all_missing_window() {
        let averages = rolling_mean(&[None, None, Some(6.0)], 2, false);
        assert_eq!(averages, vec![None, None, Some(6.0)]);
    }

    #[test]
    fn test_empty_fact_table() {
        let table = derive_fact_table(Vec::new(), &[], &DerivationConfig::default());
        assert!(table.is_empty());
    }
}
