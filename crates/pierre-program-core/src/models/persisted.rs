// ABOUTME: Persistable program tree and the records read back from storage
// ABOUTME: ProgramDraft (input to the persister) and PersistedProgram (its output)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::measure::MeasureUnit;
use super::program::{
    ExerciseCategory, ExerciseSpec, MeasureType, PhaseDetail, PhaseNutrition, SessionBlock,
    WorkoutFocus,
};

/// Flags set on a newly created program
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgramFlags {
    /// Program can be cloned by coaches
    pub is_template: bool,
    /// Program is the client's current one
    pub is_active: bool,
}

impl Default for ProgramFlags {
    fn default() -> Self {
        Self {
            is_template: false,
            is_active: true,
        }
    }
}

/// One training day and its sequenced exercises
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutDraft {
    /// Day layout
    pub focus: WorkoutFocus,
    /// Exercises in session order
    pub exercises: Vec<ExerciseSpec>,
}

/// One phase of the program
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhaseDraft {
    /// 1-based phase number
    pub phase: u32,
    /// Phase length in weeks
    pub duration_weeks: u32,
    /// Narrative for the phase
    pub detail: PhaseDetail,
    /// Nutrition targets for the phase
    pub nutrition: PhaseNutrition,
    /// Weekly workouts
    pub workouts: Vec<WorkoutDraft>,
}

/// Complete program ready to persist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgramDraft {
    /// Program name, must not be blank
    pub name: String,
    /// Description
    pub description: String,
    /// Author identity, must not be blank
    pub created_by: String,
    /// Template/active flags
    pub flags: ProgramFlags,
    /// Phases in order
    pub phases: Vec<PhaseDraft>,
}

/// Shared exercise library row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseLibraryEntry {
    /// Row id
    pub id: Uuid,
    /// Unique exercise name
    pub name: String,
    /// Category recorded by the first writer
    pub category: ExerciseCategory,
}

/// Exercise row as stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedExercise {
    /// Row id
    pub id: Uuid,
    /// Library entry this exercise refers to
    pub exercise_library_id: Uuid,
    /// Name copied from the spec
    pub name: String,
    /// Working sets
    pub sets: u32,
    /// Rest between sets in whole seconds
    pub rest_period: i64,
    /// Measure kind
    pub measure_type: MeasureType,
    /// Normalized measure value
    pub measure_value: f64,
    /// Normalized measure unit
    pub measure_unit: Option<MeasureUnit>,
    /// Legacy integer reps, derived from the measure when read
    pub reps: i64,
    /// Intensity and notes combined
    pub notes: Option<String>,
    /// Position within the workout
    pub sort_order: u32,
    /// Environment the exercise suits
    pub environment: String,
    /// Equipment needed
    pub equipment: Vec<String>,
    /// Substitutes
    pub alternatives: Vec<String>,
    /// Form cues
    pub instructions: Vec<String>,
}

/// Workout row as stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedWorkout {
    /// Row id
    pub id: Uuid,
    /// Workout name
    pub name: String,
    /// 1-based day within the week
    pub day_number: u32,
    /// Focus description
    pub focus: String,
    /// Session format
    pub structure_type: String,
    /// Warmup block
    pub warmup: SessionBlock,
    /// Cooldown block
    pub cooldown: SessionBlock,
    /// Exercises ordered by `sort_order`
    pub exercises: Vec<PersistedExercise>,
}

/// Workout plan row (one per phase) as stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedWorkoutPlan {
    /// Row id
    pub id: Uuid,
    /// Author the plan was created for
    pub user_id: String,
    /// 1-based phase number
    pub phase: u32,
    /// Phase length in weeks
    pub duration_weeks: u32,
    /// Split used during the phase
    pub split_type: String,
    /// Starting body fat estimate
    pub body_fat_percentage: f64,
    /// Starting muscle mass distribution
    pub muscle_mass_distribution: String,
    /// Daily calorie target
    pub daily_calories: u32,
    /// Protein grams per day
    pub protein_grams: u32,
    /// Carbohydrate grams per day
    pub carb_grams: u32,
    /// Fat grams per day
    pub fat_grams: u32,
    /// Training days per week
    pub days_per_week: u32,
    /// Phase purpose
    pub phase_explanation: String,
    /// Phase expectations
    pub phase_expectations: String,
    /// Key points
    pub phase_key_points: Vec<String>,
    /// Workouts ordered by day number
    pub workouts: Vec<PersistedWorkout>,
}

/// Program tree as stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedProgram {
    /// Row id
    pub id: Uuid,
    /// Program name
    pub name: String,
    /// Description
    pub description: String,
    /// Author identity
    pub created_by: String,
    /// Template flag
    pub is_template: bool,
    /// Active flag
    pub is_active: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Plans ordered by phase
    pub workout_plans: Vec<PersistedWorkoutPlan>,
}

impl PersistedProgram {
    /// Total number of exercise rows in the tree
    #[must_use]
    pub fn exercise_count(&self) -> usize {
        self.workout_plans
            .iter()
            .flat_map(|plan| &plan.workouts)
            .map(|workout| workout.exercises.len())
            .sum()
    }
}
