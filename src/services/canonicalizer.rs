use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::clients::models::common::SetFact;
use crate::errors::PipelineError;

const BUILTIN_ALIASES: &str = include_str!("../../data/exercise_aliases.json");

/// Exercises containing this word are band-resisted and carry no usable weight.
pub const BAND_MARKER: &str = "band";

/// Immutable alias -> canonical exercise name table. Chains such as
/// `a -> b`, `b -> c` are flattened when the table is built, so every
/// value is a canonical name; a chain that loops back on itself is rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>")]
pub struct ExerciseAliases {
    aliases: BTreeMap<String, String>,
}

impl TryFrom<BTreeMap<String, String>> for ExerciseAliases {
    type Error = String;

    fn try_from(raw: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let direct: BTreeMap<String, String> = raw
            .into_iter()
            .map(|(alias, canonical)| (normalize_name(&alias), normalize_name(&canonical)))
            .filter(|(alias, canonical)| alias != canonical)
            .collect();

        let mut aliases = BTreeMap::new();
        for alias in direct.keys() {
            let mut seen = HashSet::from([alias.as_str()]);
            let mut target = &direct[alias];
            while let Some(next) = direct.get(target) {
                if !seen.insert(target.as_str()) {
                    return Err(format!("alias cycle through '{}'", alias));
                }
                target = next;
            }
            aliases.insert(alias.clone(), target.clone());
        }
        Ok(Self { aliases })
    }
}

impl ExerciseAliases {
    pub fn builtin() -> Result<Self, PipelineError> {
        Self::from_json(BUILTIN_ALIASES)
    }

    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, PipelineError> {
        let json = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Canonical name for `name`; unknown names pass through unchanged.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Renames aliases, then drops band-resisted exercises and exercises with
/// `min_sets` or fewer sets. Row order is preserved.
pub fn canonicalize(
    facts: Vec<SetFact>,
    aliases: &ExerciseAliases,
    min_sets: usize,
) -> Vec<SetFact> {
    let renamed: Vec<SetFact> = facts
        .into_iter()
        .map(|mut fact| {
            let canonical = aliases.resolve(&fact.exercise).to_string();
            if canonical != fact.exercise {
                tracing::debug!(from = %fact.exercise, to = %canonical, "canonicalizer.renamed");
                fact.exercise = canonical;
            }
            fact
        })
        .filter(|fact| !fact.exercise.to_lowercase().contains(BAND_MARKER))
        .collect();

    let frequent: HashSet<String> = set_counts(&renamed)
        .into_iter()
        .filter(|(_, count)| *count > min_sets)
        .map(|(name, _)| name.to_string())
        .collect();

    let retained: Vec<SetFact> = renamed
        .into_iter()
        .filter(|fact| frequent.contains(fact.exercise.as_str()))
        .collect();

    tracing::info!(
        facts = retained.len(),
        exercises = set_counts(&retained).len(),
        "canonicalizer.completed"
    );
    retained
}

fn set_counts(facts: &[SetFact]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for fact in facts {
        *counts.entry(fact.exercise.as_str()).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseSummary {
    pub distinct_exercises: usize,
    pub top_by_sets: Vec<(String, usize)>,
}

/// Distinct exercise count plus the `top` most-logged exercises by set count.
pub fn summarize(facts: &[SetFact], top: usize) -> ExerciseSummary {
    let mut ranked: Vec<(String, usize)> = set_counts(facts)
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let distinct_exercises = ranked.len();
    ranked.truncate(top);

    ExerciseSummary {
        distinct_exercises,
        top_by_sets: ranked,
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn facts(exercise: &str, count: usize) -> Vec<SetFact> {
        (0..count)
            .map(|i| SetFact {
                date: NaiveDate::from_ymd_opt(2023, 1, 1 + i as u32).unwrap(),
                exercise: exercise.to_string(),
                set_number: 1,
                reps: 5,
                weight: Some(50.0),
            })
            .collect()
    }

    #[test]
    fn test_builtin_table_loads() {
        let aliases = ExerciseAliases::builtin().unwrap();

        assert_eq!(aliases.len(), 35);
        assert_eq!(aliases.resolve("pullups"), "pull ups");
        assert_eq!(aliases.resolve("militärpress"), "overhead press");
        assert_eq!(aliases.resolve("squats"), "squats");
    }

    #[test]
    fn test_aliases_merge_into_canonical_group() {
        let aliases = ExerciseAliases::builtin().unwrap();
        let mut input = facts("pullups", 3);
        input.extend(facts("pull ups", 2));

        let output = canonicalize(input, &aliases, 4);

        assert_eq!(output.len(), 5);
        assert!(output.iter().all(|f| f.exercise == "pull ups"));
        assert!(output.iter().all(|f| aliases.resolve(&f.exercise) == f.exercise));
    }

    #[test]
    fn test_threshold_is_strictly_greater() {
        let aliases = ExerciseAliases::default();
        let mut input = facts("squats", 5);
        input.extend(facts("curls", 4));

        let output = canonicalize(input, &aliases, 4);

        assert_eq!(output.len(), 5);
        assert!(output.iter().all(|f| f.exercise == "squats"));
    }

    #[test]
    fn test_band_exercises_are_dropped() {
        let aliases = ExerciseAliases::default();
        let mut input = facts("band pull aparts", 10);
        input.extend(facts("Banded squats", 10));
        input.extend(facts("squats", 10));

        let output = canonicalize(input, &aliases, 4);

        assert_eq!(output.len(), 10);
        assert!(output.iter().all(|f| !f.exercise.contains(BAND_MARKER)));
    }

    #[test]
    fn test_unknown_names_pass_through_in_order() {
        let aliases = ExerciseAliases::from_json(r#"{"Back Squat": "Squats"}"#).unwrap();
        let mut input = facts("back squat", 3);
        input.extend(facts("zercher carry", 6));
        input.extend(facts("squats", 3));

        let output = canonicalize(input, &aliases, 4);

        let names: Vec<&str> = output.iter().map(|f| f.exercise.as_str()).collect();
        assert_eq!(&names[..3], ["squats"; 3]);
        assert_eq!(&names[3..9], ["zercher carry"; 6]);
        assert_eq!(&names[9..], ["squats"; 3]);
    }

    #[test]
    fn test_alias_chains_resolve_to_the_final_name() {
        let aliases = ExerciseAliases::from_json(
            r#"{"bw pullups": "pullups", "pullups": "pull ups", "Squats": "squats"}"#,
        )
        .unwrap();

        assert_eq!(aliases.resolve("bw pullups"), "pull ups");
        assert_eq!(aliases.resolve("pullups"), "pull ups");
        assert_eq!(aliases.len(), 2);

        let output = canonicalize(facts("bw pullups", 5), &aliases, 4);
        assert!(output.iter().all(|f| f.exercise == "pull ups"));
    }

    #[test]
    fn test_alias_cycle_is_an_error() {
        let err = ExerciseAliases::from_json(r#"{"a": "b", "b": "c", "c": "a"}"#).unwrap_err();

        assert!(matches!(err, PipelineError::AliasTable(_)));
        assert!(err.to_string().contains("alias cycle"));
    }

    #[test]
    fn test_bad_alias_json_is_an_error() {
        let err = ExerciseAliases::from_json(r#"["not", "a", "map"]"#).unwrap_err();
        assert!(matches!(err, PipelineError::AliasTable(_)));
    }

    #[test]
    fn test_summary_ranks_by_set_count() {
        let mut input = facts("squats", 6);
        input.extend(facts("bench press", 8));
        input.extend(facts("deadlifts", 6));

        let summary = summarize(&input, 2);

        assert_eq!(summary.distinct_exercises, 3);
        assert_eq!(
            summary.top_by_sets,
            vec![("bench press".to_string(), 8), ("deadlifts".to_string(), 6)]
        );
    }
}
