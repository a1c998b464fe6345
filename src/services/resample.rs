use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::clients::models::common::{PeriodTonnage, TrainingFact};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Monday through Sunday, labelled by the Sunday.
    Week,
    /// Labelled by the last day of the month.
    Month,
}

pub fn period_end(date: NaiveDate, period: Period) -> NaiveDate {
    match period {
        Period::Week => {
            let to_sunday = 6 - date.weekday().num_days_from_monday() as u64;
            date.checked_add_days(Days::new(to_sunday)).unwrap_or(date)
        }
        Period::Month => date
            .checked_add_months(Months::new(1))
            .and_then(|next| next.with_day(1))
            .and_then(|first| first.pred_opt())
            .unwrap_or(date),
    }
}

/// Buckets the fact table by period. Periods without training are omitted.
pub fn resample(facts: &[TrainingFact], period: Period) -> Vec<PeriodTonnage> {
    #[derive(Default)]
    struct Bucket {
        sets: usize,
        total: f64,
        weighted: usize,
    }

    let mut buckets: BTreeMap<NaiveDate, Bucket> = BTreeMap::new();
    for fact in facts {
        let bucket = buckets.entry(period_end(fact.date, period)).or_default();
        bucket.sets += 1;
        if let Some(tonnage) = fact.tonnage {
            bucket.total += tonnage;
            bucket.weighted += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(period_end, bucket)| PeriodTonnage {
            period_end,
            sets: bucket.sets,
            total_tonnage: bucket.total,
            mean_tonnage: (bucket.weighted > 0).then(|| bucket.total / bucket.weighted as f64),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fact(date: NaiveDate, tonnage: Option<f64>) -> TrainingFact {
        TrainingFact {
            date,
            exercise: "squats".to_string(),
            set_number: 1,
            reps: 5,
            weight: tonnage.map(|t| t / 5.0),
            bodyweight: None,
            tonnage,
            tonnage_avg: None,
        }
    }

    #[test]
    fn test_week_ends_on_sunday() {
        // 2023-02-01 is a Wednesday
        assert_eq!(period_end(day(2023, 2, 1), Period::Week), day(2023, 2, 5));
        assert_eq!(period_end(day(2023, 2, 5), Period::Week), day(2023, 2, 5));
        assert_eq!(period_end(day(2023, 2, 6), Period::Week), day(2023, 2, 12));
    }

    #[test]
    fn test_month_end() {
        assert_eq!(period_end(day(2023, 1, 31), Period::Month), day(2023, 1, 31));
        assert_eq!(period_end(day(2024, 2, 10), Period::Month), day(2024, 2, 29));
        assert_eq!(period_end(day(2023, 12, 1), Period::Month), day(2023, 12, 31));
    }

    #[test]
    fn test_weekly_totals_and_means() {
        let facts = vec![
            fact(day(2023, 2, 1), Some(500.0)),
            fact(day(2023, 2, 3), Some(300.0)),
            fact(day(2023, 2, 3), None),
            fact(day(2023, 2, 14), Some(100.0)),
        ];

        let weekly = resample(&facts, Period::Week);

        assert_eq!(
            weekly,
            vec![
                PeriodTonnage {
                    period_end: day(2023, 2, 5),
                    sets: 3,
                    total_tonnage: 800.0,
                    mean_tonnage: Some(400.0),
                },
                PeriodTonnage {
                    period_end: day(2023, 2, 19),
                    sets: 1,
                    total_tonnage: 100.0,
                    mean_tonnage: Some(100.0),
                },
            ]
        );
    }

    #[test]
    fn test_monthly_bucket_without_weights() {
        let monthly = resample(&[fact(day(2023, 3, 9), None)], Period::Month);

        assert_eq!(monthly.len(), 1);
        assert_eq!(monthly[0].period_end, day(2023, 3, 31));
        assert_eq!(monthly[0].mean_tonnage, None);
        assert_eq!(monthly[0].total_tonnage, 0.0);
    }
}
