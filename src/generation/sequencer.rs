// ABOUTME: Reorders one workout's exercises by movement category
// ABOUTME: Primary before secondary before isolation, other last; ties keep the proposed order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_program_core::models::ExerciseSpec;

/// Sort exercises ascending by category rank
///
/// The sort is stable, so exercises of the same category keep the order the
/// service proposed them in, and sequencing an already sequenced list is a
/// no-op.
#[must_use]
pub fn sequence_exercises(mut exercises: Vec<ExerciseSpec>) -> Vec<ExerciseSpec> {
    exercises.sort_by_key(|exercise| exercise.category.rank());
    exercises
}

#[cfg(test)]
mod tests {
    use super::*;
    use pierre_program_core::models::{ExerciseCategory, Measure};

    fn spec(name: &str, category: ExerciseCategory) -> ExerciseSpec {
        ExerciseSpec {
            name: name.to_owned(),
            sets: 3,
            category,
            environment: "gym".to_owned(),
            measure: Measure::reps(10.0),
            rest_period: 90.0,
            equipment: Vec::new(),
            alternatives: Vec::new(),
            intensity: None,
            notes: None,
            instructions: Vec::new(),
        }
    }

    fn names(exercises: &[ExerciseSpec]) -> Vec<&str> {
        exercises.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_primary_runs_first() {
        let sequenced = sequence_exercises(vec![
            spec("Bicep Curl", ExerciseCategory::Isolation),
            spec("Rower", ExerciseCategory::Other),
            spec("Back Squat", ExerciseCategory::Primary),
            spec("Split Squat", ExerciseCategory::Secondary),
        ]);

        assert_eq!(
            names(&sequenced),
            vec!["Back Squat", "Split Squat", "Bicep Curl", "Rower"]
        );
    }

    #[test]
    fn test_ties_keep_proposed_order() {
        let sequenced = sequence_exercises(vec![
            spec("Leg Curl", ExerciseCategory::Isolation),
            spec("Bench Press", ExerciseCategory::Primary),
            spec("Lateral Raise", ExerciseCategory::Isolation),
            spec("Deadlift", ExerciseCategory::Primary),
        ]);

        assert_eq!(
            names(&sequenced),
            vec!["Bench Press", "Deadlift", "Leg Curl", "Lateral Raise"]
        );
    }

    #[test]
    fn test_sequencing_is_idempotent() {
        let once = sequence_exercises(vec![
            spec("Plank", ExerciseCategory::Other),
            spec("Row", ExerciseCategory::Secondary),
            spec("Press", ExerciseCategory::Primary),
        ]);
        let twice = sequence_exercises(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_ranks_never_decrease() {
        let sequenced = sequence_exercises(vec![
            spec("a", ExerciseCategory::Other),
            spec("b", ExerciseCategory::Isolation),
            spec("c", ExerciseCategory::Secondary),
            spec("d", ExerciseCategory::Primary),
            spec("e", ExerciseCategory::Other),
            spec("f", ExerciseCategory::Primary),
        ]);
        assert!(sequenced
            .windows(2)
            .all(|pair| pair[0].category.rank() <= pair[1].category.rank()));
    }

    #[test]
    fn test_unknown_category_sorts_last() {
        let parsed: Vec<ExerciseSpec> = serde_json::from_str(
            r#"[
                {"name": "Jump Rope", "sets": 1, "category": "cardio",
                 "measure": {"type": "time", "value": 3, "unit": "minutes"}, "restPeriod": 60},
                {"name": "Pull-Up", "sets": 3, "category": "compound",
                 "measure": {"type": "reps", "value": 8}, "restPeriod": 120}
            ]"#,
        )
        .unwrap();

        let sequenced = sequence_exercises(parsed);
        assert_eq!(names(&sequenced), vec!["Pull-Up", "Jump Rope"]);
        assert_eq!(sequenced[1].category, ExerciseCategory::Other);
    }

    #[test]
    fn test_category_labels_decode_in_any_case() {
        let parsed: Vec<ExerciseSpec> = serde_json::from_str(
            r#"[
                {"name": "Leg Curl", "sets": 3, "category": "isolation",
                 "measure": {"type": "reps", "value": 12}, "restPeriod": 60},
                {"name": "Hack Squat", "sets": 3, "category": "SECONDARY",
                 "measure": {"type": "reps", "value": 10}, "restPeriod": 90},
                {"name": "Back Squat", "sets": 5, "category": "Primary",
                 "measure": {"type": "reps", "value": 5}, "restPeriod": 180}
            ]"#,
        )
        .unwrap();

        let sequenced = sequence_exercises(parsed);
        assert_eq!(
            names(&sequenced),
            vec!["Back Squat", "Hack Squat", "Leg Curl"]
        );
        assert_eq!(sequenced[0].category, ExerciseCategory::Primary);
        assert_eq!(sequenced[1].category, ExerciseCategory::Secondary);
    }

    #[test]
    fn test_empty_list() {
        assert!(sequence_exercises(Vec::new()).is_empty());
    }
}
