// ABOUTME: Bounds and normalization pass applied to every generated stage value before acceptance
// ABOUTME: Clamps counts, durations and nutrition, fills blank names, cleans equipment lists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain rules in the prompts are advisory. This pass makes the accepted
//! values structurally safe: the phase-count invariant always holds, day
//! numbers match the requested day, and numeric fields stay inside the
//! ranges storage and clients expect. Defaults are never run through here.

use pierre_program_core::constants::{nutrition, program, training};
use pierre_program_core::models::{
    ExerciseSelectionRules, ExerciseSpec, PhaseDetail, PhaseNutrition, ProgramStructure,
    TrainingEnvironment, WorkoutFocus, WorkoutStructure,
};

use super::defaults;
use super::outcome::DefaultReason;

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn or_default(value: String, fallback: impl FnOnce() -> String) -> String {
    if is_blank(&value) {
        fallback()
    } else {
        value.trim().to_owned()
    }
}

/// Force `phase_durations.len() == phase_count` within the phase bounds
#[must_use]
pub fn program_structure(mut structure: ProgramStructure) -> ProgramStructure {
    structure.name = or_default(structure.name, || defaults::DEFAULT_PROGRAM_NAME.to_owned());

    let count = if structure.phase_count == 0 && !structure.phase_durations.is_empty() {
        u32::try_from(structure.phase_durations.len()).unwrap_or(program::MAX_PHASES)
    } else {
        structure.phase_count
    };
    let count = count.clamp(program::MIN_PHASES, program::MAX_PHASES);

    structure.phase_durations.resize(count as usize, program::DEFAULT_PHASE_WEEKS);
    for weeks in &mut structure.phase_durations {
        *weeks = (*weeks).clamp(program::MIN_PHASE_WEEKS, program::MAX_PHASE_WEEKS);
    }
    structure.phase_count = count;
    structure
}

/// Clamp the weekly layout and selection rules
#[must_use]
pub fn workout_structure(mut workout: WorkoutStructure) -> WorkoutStructure {
    workout.days_per_week = workout
        .days_per_week
        .clamp(training::MIN_DAYS_PER_WEEK, training::MAX_DAYS_PER_WEEK);
    workout.session_duration = workout
        .session_duration
        .clamp(training::MIN_SESSION_MINUTES, training::MAX_SESSION_MINUTES);
    workout.workout_style.primary = or_default(workout.workout_style.primary, || {
        defaults::DEFAULT_WORKOUT_STYLE.to_owned()
    });

    let rules = &mut workout.exercise_selection_rules;
    rules.exercises_per_workout = rules.exercises_per_workout.clamp(
        training::MIN_EXERCISES_PER_WORKOUT,
        training::MAX_EXERCISES_PER_WORKOUT,
    );
    rules.default_rest_period = rules
        .default_rest_period
        .min(training::MAX_REST_SECONDS as u32);
    workout
}

/// Pin the day number and fill blank fields
#[must_use]
pub fn workout_focus(
    mut focus: WorkoutFocus,
    day_number: u32,
    rules: &ExerciseSelectionRules,
) -> WorkoutFocus {
    focus.day_number = day_number;
    focus.focus = or_default(focus.focus, || defaults::DEFAULT_FOCUS.to_owned());
    focus.name = or_default(focus.name, || format!("Day {day_number}"));
    focus.structure_type = or_default(focus.structure_type, || {
        defaults::DEFAULT_STRUCTURE_TYPE.to_owned()
    });

    if focus.target_exercise_count == 0 {
        focus.target_exercise_count = rules.exercises_per_workout;
    }
    focus.target_exercise_count = focus.target_exercise_count.clamp(
        training::MIN_EXERCISES_PER_WORKOUT,
        training::MAX_EXERCISES_PER_WORKOUT,
    );
    focus.warmup.duration = focus.warmup.duration.min(training::MAX_WARMUP_MINUTES);
    focus.cooldown.duration = focus.cooldown.duration.min(training::MAX_WARMUP_MINUTES);
    focus
}

fn clean_equipment(equipment: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(equipment.len());
    for item in equipment {
        let item = item.trim().to_lowercase();
        if !item.is_empty() && !cleaned.contains(&item) {
            cleaned.push(item);
        }
    }
    cleaned
}

fn exercise(
    mut spec: ExerciseSpec,
    environment: TrainingEnvironment,
    rules: &ExerciseSelectionRules,
) -> ExerciseSpec {
    spec.name = spec.name.trim().to_owned();
    spec.sets = spec.sets.clamp(training::MIN_SETS, training::MAX_SETS);
    spec.rest_period = if spec.rest_period.is_finite() {
        spec.rest_period.clamp(0.0, training::MAX_REST_SECONDS)
    } else {
        f64::from(rules.default_rest_period)
    };
    spec.measure.value = if spec.measure.value.is_finite() {
        spec.measure.value.max(0.0)
    } else {
        0.0
    };
    spec.environment = or_default(spec.environment, || environment.as_str().to_owned());
    spec.equipment = clean_equipment(spec.equipment);
    spec.alternatives.retain(|alt| !is_blank(alt));
    spec.instructions.retain(|step| !is_blank(step));
    spec.instructions.truncate(training::MAX_INSTRUCTIONS);
    spec
}

/// Normalize each exercise and drop unnamed ones
///
/// # Errors
///
/// Returns [`DefaultReason::MalformedOutput`] when no named exercise remains,
/// since a workout without exercises cannot be sequenced or persisted.
pub fn exercises(
    specs: Vec<ExerciseSpec>,
    environment: TrainingEnvironment,
    rules: &ExerciseSelectionRules,
) -> Result<Vec<ExerciseSpec>, DefaultReason> {
    let mut accepted: Vec<ExerciseSpec> = specs
        .into_iter()
        .filter(|spec| !is_blank(&spec.name))
        .map(|spec| exercise(spec, environment, rules))
        .collect();
    accepted.truncate(training::MAX_EXERCISES_PER_WORKOUT as usize);

    if accepted.is_empty() {
        return Err(DefaultReason::malformed("no named exercises in response"));
    }
    Ok(accepted)
}

/// Fill a blank split type
#[must_use]
pub fn phase_detail(mut detail: PhaseDetail) -> PhaseDetail {
    detail.split_type = or_default(detail.split_type, || defaults::DEFAULT_SPLIT_TYPE.to_owned());
    detail.phase_key_points.retain(|point| !is_blank(point));
    detail
}

/// Clamp calories and macros
#[must_use]
pub fn phase_nutrition(mut plan: PhaseNutrition) -> PhaseNutrition {
    plan.daily_calories = plan
        .daily_calories
        .clamp(nutrition::MIN_DAILY_CALORIES, nutrition::MAX_DAILY_CALORIES);
    plan.macros.protein = plan.macros.protein.min(nutrition::MAX_PROTEIN_GRAMS);
    plan.macros.carbs = plan.macros.carbs.min(nutrition::MAX_CARB_GRAMS);
    plan.macros.fats = plan.macros.fats.min(nutrition::MAX_FAT_GRAMS);
    plan
}
