// ABOUTME: Hand-authored fallback values substituted when a stage cannot use the service's answer
// ABOUTME: Generic single-phase program, 3-day strength week, bodyweight session, 2000 kcal nutrition
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Every default is valid on its own: it passes validation unchanged and
//! persists without error, so a run where every call fails still produces a
//! usable program.

use pierre_program_core::constants::program::DEFAULT_PHASE_WEEKS;
use pierre_program_core::models::{
    ExerciseCategory, ExerciseSelectionRules, ExerciseSpec, FinalReview, Macros, Measure,
    MeasureType, PhaseDetail, PhaseNutrition, ProgramStructure, SessionBlock,
    TrainingEnvironment, WorkoutFocus, WorkoutStructure, WorkoutStyle,
};

/// Program name used when the structure stage falls back
pub const DEFAULT_PROGRAM_NAME: &str = "Foundation Fitness Program";
/// Training style used when none is given
pub const DEFAULT_WORKOUT_STYLE: &str = "strength";
/// Split recorded on a phase without a generated one
pub const DEFAULT_SPLIT_TYPE: &str = "Full Body";
/// Focus of a default training day
pub const DEFAULT_FOCUS: &str = "Full Body";
/// Session format of a default training day
pub const DEFAULT_STRUCTURE_TYPE: &str = "straight_sets";
/// Days per week in the default weekly layout
pub const DEFAULT_DAYS_PER_WEEK: u32 = 3;
/// Session length in minutes in the default weekly layout
pub const DEFAULT_SESSION_MINUTES: u32 = 60;
/// Exercises per workout in the default weekly layout
pub const DEFAULT_EXERCISES_PER_WORKOUT: u32 = 6;
/// Rest between sets in seconds in the default weekly layout
pub const DEFAULT_REST_SECONDS: u32 = 90;
/// Warmup and cooldown length of a default training day
pub const DEFAULT_BLOCK_MINUTES: u32 = 5;
/// Default daily calories
pub const DEFAULT_DAILY_CALORIES: u32 = 2000;
/// Default macros in grams
pub const DEFAULT_MACROS: Macros = Macros {
    protein: 150,
    carbs: 200,
    fats: 70,
};

/// One phase of four weeks
#[must_use]
pub fn program_structure() -> ProgramStructure {
    ProgramStructure {
        name: DEFAULT_PROGRAM_NAME.to_owned(),
        description: "A balanced full-body program building strength, work capacity and \
                      consistent training habits."
            .to_owned(),
        phase_count: 1,
        phase_durations: vec![DEFAULT_PHASE_WEEKS],
        phase_progression: vec!["Foundation".to_owned()],
        overall_goals: vec![
            "Build general strength".to_owned(),
            "Establish a consistent training routine".to_owned(),
        ],
    }
}

/// Three 60-minute strength sessions per week
#[must_use]
pub fn workout_structure() -> WorkoutStructure {
    WorkoutStructure {
        days_per_week: DEFAULT_DAYS_PER_WEEK,
        session_duration: DEFAULT_SESSION_MINUTES,
        workout_style: WorkoutStyle::primary(DEFAULT_WORKOUT_STYLE),
        workout_distribution: Vec::new(),
        exercise_selection_rules: ExerciseSelectionRules {
            exercises_per_workout: DEFAULT_EXERCISES_PER_WORKOUT,
            default_rest_period: DEFAULT_REST_SECONDS,
            preferred_measure_type: Some(MeasureType::Reps),
        },
    }
}

/// Full-body day at `day_number`
#[must_use]
pub fn workout_focus(day_number: u32, workout: &WorkoutStructure) -> WorkoutFocus {
    WorkoutFocus {
        name: format!("Day {day_number} {DEFAULT_FOCUS}"),
        focus: DEFAULT_FOCUS.to_owned(),
        warmup: SessionBlock {
            duration: DEFAULT_BLOCK_MINUTES,
            activities: vec![
                "Light cardio".to_owned(),
                "Dynamic mobility".to_owned(),
            ],
        },
        cooldown: SessionBlock {
            duration: DEFAULT_BLOCK_MINUTES,
            activities: vec!["Easy walk".to_owned(), "Static stretching".to_owned()],
        },
        day_number,
        target_exercise_count: workout.exercise_selection_rules.exercises_per_workout,
        structure_type: DEFAULT_STRUCTURE_TYPE.to_owned(),
    }
}

fn bodyweight(
    name: &str,
    category: ExerciseCategory,
    measure: Measure,
    environment: TrainingEnvironment,
    rest_seconds: u32,
    instructions: &[&str],
) -> ExerciseSpec {
    ExerciseSpec {
        name: name.to_owned(),
        sets: 3,
        category,
        environment: environment.as_str().to_owned(),
        measure,
        rest_period: f64::from(rest_seconds),
        equipment: Vec::new(),
        alternatives: Vec::new(),
        intensity: None,
        notes: None,
        instructions: instructions.iter().map(|s| (*s).to_owned()).collect(),
    }
}

/// Bodyweight session that works in every environment, already in session order
#[must_use]
pub fn exercise_set(environment: TrainingEnvironment, rules: &ExerciseSelectionRules) -> Vec<ExerciseSpec> {
    let rest = rules.default_rest_period;
    vec![
        bodyweight(
            "Bodyweight Squat",
            ExerciseCategory::Primary,
            Measure::reps(12.0),
            environment,
            rest,
            &["Feet shoulder width apart", "Sit back and down", "Drive through the heels"],
        ),
        bodyweight(
            "Push-Up",
            ExerciseCategory::Secondary,
            Measure::reps(10.0),
            environment,
            rest,
            &["Hands under shoulders", "Keep a straight line from head to heels"],
        ),
        bodyweight(
            "Glute Bridge",
            ExerciseCategory::Isolation,
            Measure::reps(15.0),
            environment,
            rest,
            &["Squeeze the glutes at the top", "Keep ribs down"],
        ),
        bodyweight(
            "Plank",
            ExerciseCategory::Other,
            Measure::time(30.0, "seconds"),
            environment,
            rest,
            &["Elbows under shoulders", "Brace the core"],
        ),
    ]
}

/// Generic phase narrative
#[must_use]
pub fn phase_detail() -> PhaseDetail {
    PhaseDetail {
        phase_explanation: "Build a base of strength and movement quality.".to_owned(),
        phase_expectations: "Steady progress in load and confidence with the main lifts."
            .to_owned(),
        phase_key_points: vec![
            "Prioritize technique over load".to_owned(),
            "Train consistently".to_owned(),
        ],
        split_type: DEFAULT_SPLIT_TYPE.to_owned(),
    }
}

/// 2000 kcal with 150 g protein, 200 g carbs, 70 g fat
#[must_use]
pub const fn phase_nutrition() -> PhaseNutrition {
    PhaseNutrition {
        daily_calories: DEFAULT_DAILY_CALORIES,
        macros: DEFAULT_MACROS,
    }
}

/// Review with every flag unset; a defaulted review asserts nothing
#[must_use]
pub fn final_review() -> FinalReview {
    FinalReview::default()
}
