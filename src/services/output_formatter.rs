use crate::clients::models::common::PeriodTonnage;
use crate::services::canonicalizer::ExerciseSummary;
use crate::services::derivation::TonnageUnit;

pub fn format_exercise_summary(summary: &ExerciseSummary) -> String {
    let mut lines = vec![format!(
        "{} distinct exercises",
        summary.distinct_exercises
    )];

    if !summary.top_by_sets.is_empty() {
        lines.push(format!("Top {} by sets:", summary.top_by_sets.len()));
        for (rank, (exercise, sets)) in summary.top_by_sets.iter().enumerate() {
            lines.push(format!("{:>2}. {} ({} sets)", rank + 1, exercise, sets));
        }
    }

    lines.join("\n")
}

/// One line per period, e.g. `2023-02-05: 12 sets, 4.2t`.
pub fn format_period_lines(periods: &[PeriodTonnage], unit: TonnageUnit) -> Vec<String> {
    periods
        .iter()
        .map(|period| {
            format!(
                "{}: {} sets, {}",
                period.period_end,
                period.sets,
                format_tonnage(period.total_tonnage, unit)
            )
        })
        .collect()
}

fn format_tonnage(value: f64, unit: TonnageUnit) -> String {
    if unit == TonnageUnit::Tonnes {
        format!("{:.2}t", value)
    } else if value >= 1000.0 {
        format!("{:.1}t", value / 1000.0)
    } else if (value.fract()).abs() < f64::EPSILON {
        format!("{:.0}kg", value)
    } else {
        format!("{:.1}kg", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_exercise_summary_lines() {
        let summary = ExerciseSummary {
            distinct_exercises: 14,
            top_by_sets: vec![("squats".to_string(), 120), ("pull ups".to_string(), 96)],
        };

        assert_eq!(
            format_exercise_summary(&summary),
            "14 distinct exercises\nTop 2 by sets:\n 1. squats (120 sets)\n 2. pull ups (96 sets)"
        );
    }

    #[test]
    fn test_empty_summary() {
        let summary = ExerciseSummary {
            distinct_exercises: 0,
            top_by_sets: Vec::new(),
        };

        assert_eq!(format_exercise_summary(&summary), "0 distinct exercises");
    }

    #[test]
    fn test_period_lines() {
        let periods = vec![
            PeriodTonnage {
                period_end: NaiveDate::from_ymd_opt(2023, 2, 5).unwrap(),
                sets: 12,
                total_tonnage: 4200.0,
                mean_tonnage: Some(350.0),
            },
            PeriodTonnage {
                period_end: NaiveDate::from_ymd_opt(2023, 2, 12).unwrap(),
                sets: 3,
                total_tonnage: 312.5,
                mean_tonnage: Some(104.2),
            },
        ];

        assert_eq!(
            format_period_lines(&periods, TonnageUnit::Kilograms),
            vec!["2023-02-05: 12 sets, 4.2t", "2023-02-12: 3 sets, 312.5kg"]
        );
        assert_eq!(
            format_period_lines(&periods[..1], TonnageUnit::Tonnes),
            vec!["2023-02-05: 12 sets, 4200.00t"]
        );
    }
}
