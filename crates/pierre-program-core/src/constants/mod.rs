// ABOUTME: Constants for program generation organized by domain
// ABOUTME: Accepted value ranges for generated structures, unit conversion, and persistence defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Ranges here bound what the validation pass accepts from the reasoning
//! service. Values outside them are clamped, never rejected.

/// Accepted ranges for training structure fields
pub mod training {
    /// Minimum sets per exercise
    pub const MIN_SETS: u32 = 1;
    /// Maximum sets per exercise
    pub const MAX_SETS: u32 = 10;
    /// Maximum rest between sets in seconds (10 minutes)
    pub const MAX_REST_SECONDS: f64 = 600.0;
    /// Maximum warmup or cooldown duration in minutes
    pub const MAX_WARMUP_MINUTES: u32 = 30;
    /// Minimum training days per week
    pub const MIN_DAYS_PER_WEEK: u32 = 1;
    /// Maximum training days per week
    pub const MAX_DAYS_PER_WEEK: u32 = 7;
    /// Minimum session duration in minutes
    pub const MIN_SESSION_MINUTES: u32 = 15;
    /// Maximum session duration in minutes
    pub const MAX_SESSION_MINUTES: u32 = 180;
    /// Minimum exercises per workout
    pub const MIN_EXERCISES_PER_WORKOUT: u32 = 1;
    /// Maximum exercises per workout
    pub const MAX_EXERCISES_PER_WORKOUT: u32 = 15;
    /// Maximum form cues kept per exercise
    pub const MAX_INSTRUCTIONS: usize = 5;
}

/// Accepted ranges for program structure fields
pub mod program {
    /// Minimum number of phases
    pub const MIN_PHASES: u32 = 1;
    /// Maximum number of phases
    pub const MAX_PHASES: u32 = 6;
    /// Minimum phase length in weeks
    pub const MIN_PHASE_WEEKS: u32 = 1;
    /// Maximum phase length in weeks
    pub const MAX_PHASE_WEEKS: u32 = 12;
    /// Phase length used when the service omits one
    pub const DEFAULT_PHASE_WEEKS: u32 = 4;
}

/// Accepted ranges for nutrition targets
pub mod nutrition {
    /// Minimum daily calories
    pub const MIN_DAILY_CALORIES: u32 = 1000;
    /// Maximum daily calories
    pub const MAX_DAILY_CALORIES: u32 = 10_000;
    /// Maximum protein grams per day
    pub const MAX_PROTEIN_GRAMS: u32 = 500;
    /// Maximum carbohydrate grams per day
    pub const MAX_CARB_GRAMS: u32 = 1000;
    /// Maximum fat grams per day
    pub const MAX_FAT_GRAMS: u32 = 500;
}

/// Unit conversion
pub mod units {
    /// Seconds in a minute
    pub const SECONDS_PER_MINUTE: f64 = 60.0;
}

/// Column values written for fields the pipeline does not generate yet
pub mod persistence {
    /// Body fat percentage recorded on a new workout plan
    pub const INITIAL_BODY_FAT_PERCENTAGE: f64 = 0.0;
    /// Muscle mass distribution recorded on a new workout plan
    pub const INITIAL_MUSCLE_MASS_DISTRIBUTION: &str = "Balanced";
}
