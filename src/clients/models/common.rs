use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetFact {
    pub date: NaiveDate,
    pub exercise: String,
    pub set_number: u8, // 1..=set slots
    pub reps: u32,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyweightRecord {
    pub date: NaiveDate,
    pub bodyweight: f64,
}

/// One row of the final fact table handed to reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingFact {
    pub date: NaiveDate,
    pub exercise: String,
    pub set_number: u8,
    pub reps: u32,
    pub weight: Option<f64>,
    pub bodyweight: Option<f64>,
    pub tonnage: Option<f64>,
    pub tonnage_avg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodTonnage {
    pub period_end: NaiveDate,
    pub sets: usize,
    pub total_tonnage: f64,
    pub mean_tonnage: Option<f64>,
}

impl TrainingFact {
    pub fn from_set(set: SetFact, bodyweight: Option<f64>, tonnage: Option<f64>) -> Self {
        Self {
            date: set.date,
            exercise: set.exercise,
            set_number: set.set_number,
            reps: set.reps,
            weight: set.weight,
            bodyweight,
            tonnage,
            tonnage_avg: None, // filled by the rolling pass
        }
    }
}
