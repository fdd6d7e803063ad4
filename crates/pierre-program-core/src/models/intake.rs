// ABOUTME: Intake questionnaire snapshot consumed by every generation stage
// ABOUTME: IntakeRecord with environment, equipment, style, and experience definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Client's self-reported training experience
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    /// New to structured training
    #[default]
    Beginner,
    /// Trained consistently for some time
    Intermediate,
    /// Years of structured training
    Advanced,
}

impl ExperienceLevel {
    /// String form used in prompts
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

/// Where the client trains
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrainingEnvironment {
    /// Commercial or well equipped gym
    #[default]
    Gym,
    /// Home setup
    Home,
    /// Hotel rooms and other temporary locations
    Travel,
    /// Parks, tracks, trails
    Outdoors,
}

impl TrainingEnvironment {
    /// String form used in prompts and on exercise rows
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gym => "gym",
            Self::Home => "home",
            Self::Travel => "travel",
            Self::Outdoors => "outdoors",
        }
    }
}

/// Primary and optional secondary training environment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentPreference {
    /// Main place the client trains
    pub primary: TrainingEnvironment,
    /// Occasional alternative location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<TrainingEnvironment>,
    /// Constraints of the environment (no jumping, low ceiling, ...)
    #[serde(default)]
    pub limitations: Vec<String>,
}

/// Broad class of equipment access
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EquipmentType {
    /// Everything a commercial gym offers
    #[default]
    FullGym,
    /// A few dumbbells or bands
    Minimal,
    /// No equipment
    Bodyweight,
    /// Only the listed items
    Specific,
}

/// Equipment the client can use
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct EquipmentAccess {
    /// Access class
    #[serde(rename = "type", default)]
    pub access_type: EquipmentType,
    /// Specific items available
    #[serde(default)]
    pub available: Vec<String>,
}

/// Training style preference, shared by intake and generated workout structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutStyle {
    /// Dominant style (strength, yoga, cardio, hybrid)
    pub primary: String,
    /// Supporting style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
}

impl WorkoutStyle {
    /// Style with only a primary component
    #[must_use]
    pub fn primary(style: impl Into<String>) -> Self {
        Self {
            primary: style.into(),
            secondary: None,
        }
    }
}

/// Immutable snapshot of a client's questionnaire answers
///
/// Read-only input to every generation stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IntakeRecord {
    /// Stated training goal (hypertrophy, fat loss, general fitness, ...)
    pub training_goal: String,
    /// Experience level
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    /// Preferred training days per week
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_available: Option<u32>,
    /// Preferred session length in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_per_session: Option<u32>,
    /// Where the client trains
    #[serde(default)]
    pub environment: EnvironmentPreference,
    /// What the client can train with
    #[serde(default)]
    pub equipment: EquipmentAccess,
    /// Style preference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<WorkoutStyle>,
    /// Free-form training preferences
    #[serde(default)]
    pub preferences: Vec<String>,
    /// Injuries or movement restrictions
    #[serde(default)]
    pub injuries: Vec<String>,
    /// Biological sex as reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    /// Age in years
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Body weight in pounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Height in inches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Anything else the client wanted to share
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl IntakeRecord {
    /// Create an intake with a goal and default answers elsewhere
    #[must_use]
    pub fn new(training_goal: impl Into<String>) -> Self {
        Self {
            training_goal: training_goal.into(),
            ..Self::default()
        }
    }

    /// Set preferred days per week
    #[must_use]
    pub const fn with_days_available(mut self, days: u32) -> Self {
        self.days_available = Some(days);
        self
    }

    /// Set the primary training environment
    #[must_use]
    pub const fn with_environment(mut self, environment: TrainingEnvironment) -> Self {
        self.environment.primary = environment;
        self
    }

    /// Set experience level
    #[must_use]
    pub const fn with_experience(mut self, level: ExperienceLevel) -> Self {
        self.experience_level = level;
        self
    }
}
