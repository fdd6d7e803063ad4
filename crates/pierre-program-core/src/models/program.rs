// ABOUTME: Stage-shaped structures produced by the generation pipeline
// ABOUTME: Program/workout structure, workout focus, exercise spec, phase detail, nutrition, review
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Every structure here is produced by exactly one stage and never mutated
//! after the validation pass accepts it. Field names follow the camelCase
//! JSON contract given to the reasoning service.

use serde::{Deserialize, Serialize};

use super::intake::WorkoutStyle;

/// Overall shape of the program (stage 1)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgramStructure {
    /// Program name shown to the client
    pub name: String,
    /// Short description
    pub description: String,
    /// Number of phases; always equals `phase_durations.len()` once validated
    pub phase_count: u32,
    /// Length of each phase in weeks
    pub phase_durations: Vec<u32>,
    /// Emphasis of each phase in order
    #[serde(default)]
    pub phase_progression: Vec<String>,
    /// Goals across the whole program
    #[serde(default)]
    pub overall_goals: Vec<String>,
}

/// Per-workout selection constraints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSelectionRules {
    /// Target exercise count per workout
    pub exercises_per_workout: u32,
    /// Rest between sets in seconds
    pub default_rest_period: u32,
    /// Preferred way of measuring volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_measure_type: Option<MeasureType>,
}

/// Weekly training layout (stage 2)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutStructure {
    /// Training days per week
    pub days_per_week: u32,
    /// Session length in minutes
    pub session_duration: u32,
    /// Style of training
    pub workout_style: WorkoutStyle,
    /// Focus of each training day, in day order
    #[serde(default)]
    pub workout_distribution: Vec<String>,
    /// Exercise selection constraints
    pub exercise_selection_rules: ExerciseSelectionRules,
}

/// Warmup or cooldown block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionBlock {
    /// Duration in minutes
    pub duration: u32,
    /// Activities performed
    #[serde(default)]
    pub activities: Vec<String>,
}

/// One training day (stage 3)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutFocus {
    /// Workout name
    pub name: String,
    /// Muscle groups or qualities trained
    pub focus: String,
    /// Warmup block
    #[serde(default)]
    pub warmup: SessionBlock,
    /// Cooldown block
    #[serde(default)]
    pub cooldown: SessionBlock,
    /// 1-based day within the week
    pub day_number: u32,
    /// Exercises requested for this day
    pub target_exercise_count: u32,
    /// Session format (straight sets, supersets, circuit)
    #[serde(default)]
    pub structure_type: String,
}

/// Movement category used to order a workout
///
/// Decoding goes through [`ExerciseCategory::parse`], so any casing of a
/// known label is accepted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ExerciseCategory {
    /// Compound lifts
    Primary,
    /// Variations and supporting compounds
    Secondary,
    /// Accessory and single-joint work
    Isolation,
    /// Cardio, mobility, and anything unrecognized
    Other,
}

impl ExerciseCategory {
    /// Sort rank, lower runs earlier in the session
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Primary => 1,
            Self::Secondary => 2,
            Self::Isolation => 3,
            Self::Other => 4,
        }
    }

    /// String form stored on the exercise library
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Isolation => "isolation",
            Self::Other => "other",
        }
    }

    /// Parse a stored category; unrecognized values are `Other`
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "primary" | "compound" => Self::Primary,
            "secondary" => Self::Secondary,
            "isolation" | "accessory" => Self::Isolation,
            _ => Self::Other,
        }
    }
}

impl From<String> for ExerciseCategory {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

/// How an exercise's volume is specified
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MeasureType {
    /// Repetitions
    Reps,
    /// Duration
    Time,
    /// Distance covered
    Distance,
}

impl MeasureType {
    /// Enumerated column value
    #[must_use]
    pub const fn as_db_str(&self) -> &'static str {
        match self {
            Self::Reps => "REPS",
            Self::Time => "TIME",
            Self::Distance => "DISTANCE",
        }
    }

    /// Parse the enumerated column value
    #[must_use]
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "REPS" => Some(Self::Reps),
            "TIME" => Some(Self::Time),
            "DISTANCE" => Some(Self::Distance),
            _ => None,
        }
    }
}

/// Generalized {type, value, unit} volume description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Measure {
    /// Kind of measure
    #[serde(rename = "type")]
    pub measure_type: MeasureType,
    /// Amount in `unit`
    pub value: f64,
    /// Unit as proposed by the service (seconds, minutes, meters, km, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Measure {
    /// Repetition measure
    #[must_use]
    pub const fn reps(value: f64) -> Self {
        Self {
            measure_type: MeasureType::Reps,
            value,
            unit: None,
        }
    }

    /// Time measure with an explicit unit
    #[must_use]
    pub fn time(value: f64, unit: impl Into<String>) -> Self {
        Self {
            measure_type: MeasureType::Time,
            value,
            unit: Some(unit.into()),
        }
    }

    /// Distance measure with an explicit unit
    #[must_use]
    pub fn distance(value: f64, unit: impl Into<String>) -> Self {
        Self {
            measure_type: MeasureType::Distance,
            value,
            unit: Some(unit.into()),
        }
    }
}

/// Proposed description of one exercise (stage 4)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSpec {
    /// Exercise name, also the exercise library key
    pub name: String,
    /// Working sets
    pub sets: u32,
    /// Movement category
    pub category: ExerciseCategory,
    /// Environment the exercise suits
    #[serde(default)]
    pub environment: String,
    /// Volume per set
    pub measure: Measure,
    /// Rest between sets in seconds
    pub rest_period: f64,
    /// Equipment needed
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Substitutes when equipment is missing
    #[serde(default)]
    pub alternatives: Vec<String>,
    /// Effort guidance (RPE 8, tempo 3-1-1, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<String>,
    /// Coaching notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Short form cues
    #[serde(default)]
    pub instructions: Vec<String>,
}

/// Wire shape of the exercise stage response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseSet {
    /// Exercises in the order proposed
    pub exercises: Vec<ExerciseSpec>,
}

/// Narrative for one phase (stage 5)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PhaseDetail {
    /// What the phase is for
    pub phase_explanation: String,
    /// What the client should expect
    pub phase_expectations: String,
    /// Key points to remember
    #[serde(default)]
    pub phase_key_points: Vec<String>,
    /// Split used during the phase
    pub split_type: String,
}

/// Daily macronutrient targets in grams
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Macros {
    /// Protein grams
    pub protein: u32,
    /// Carbohydrate grams
    pub carbs: u32,
    /// Fat grams
    pub fats: u32,
}

/// Nutrition targets for one phase (stage 6)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PhaseNutrition {
    /// Daily calorie target
    pub daily_calories: u32,
    /// Macro split
    pub macros: Macros,
}

/// Safety and completeness review of the assembled program (stage 7)
///
/// Informational only; never blocks or alters persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FinalReview {
    /// Every phase and day is present
    pub is_complete: bool,
    /// No unsafe loading or contraindicated exercises
    pub is_safe: bool,
    /// Matches the intake goals and constraints
    pub meets_client_needs: bool,
    /// Recommended tweaks
    #[serde(default)]
    pub suggested_adjustments: Vec<String>,
    /// Safety warnings
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Closing recommendations
    #[serde(default)]
    pub final_recommendations: Vec<String>,
}
