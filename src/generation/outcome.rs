// ABOUTME: Tagged stage results distinguishing generated values from defaults
// ABOUTME: StageOutcome, Provenance, DefaultReason, and the Stage identifier
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::errors::{AppError, ErrorCode};
use crate::llm::TokenUsage;

/// Generation stage identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Overall program shape
    ProgramStructure,
    /// Weekly layout
    WorkoutStructure,
    /// One training day
    WorkoutFocus,
    /// Exercises for one day
    Exercises,
    /// Narrative for one phase
    PhaseDetails,
    /// Nutrition for one phase
    PhaseNutrition,
    /// Review of the assembled program
    FinalReview,
}

impl Stage {
    /// Stable name used in logs and metadata
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ProgramStructure => "program_structure",
            Self::WorkoutStructure => "workout_structure",
            Self::WorkoutFocus => "workout_focus",
            Self::Exercises => "exercises",
            Self::PhaseDetails => "phase_details",
            Self::PhaseNutrition => "phase_nutrition",
            Self::FinalReview => "final_review",
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Why a stage fell back to its default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DefaultReason {
    /// The reasoning service call failed
    GenerationUnavailable {
        /// Error code reported by the client
        code: ErrorCode,
        /// Error message
        message: String,
    },
    /// The response carried no text block
    NoTextContent,
    /// The text did not decode into the stage's shape
    MalformedOutput {
        /// Decoder message
        message: String,
    },
}

impl DefaultReason {
    /// Malformed output with a message
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedOutput {
            message: message.into(),
        }
    }
}

impl From<AppError> for DefaultReason {
    fn from(error: AppError) -> Self {
        Self::GenerationUnavailable {
            code: error.code,
            message: error.message,
        }
    }
}

impl Display for DefaultReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::GenerationUnavailable { code, message } => {
                write!(f, "generation unavailable ({code:?}): {message}")
            }
            Self::NoTextContent => f.write_str("response had no text content"),
            Self::MalformedOutput { message } => write!(f, "malformed output: {message}"),
        }
    }
}

/// Where a stage value came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Provenance {
    /// Produced by the reasoning service and accepted by validation
    Generated,
    /// Replaced by the stage's hand-authored default
    Defaulted(DefaultReason),
}

/// Value returned by every stage
///
/// Stages never fail; a failed call or undecodable answer yields the stage
/// default tagged with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutcome<T> {
    /// Stage value, generated or default
    pub value: T,
    /// Origin of `value`
    pub provenance: Provenance,
    /// Tokens spent on the call, when the service reported them
    pub usage: Option<TokenUsage>,
}

impl<T> StageOutcome<T> {
    /// Value produced by the service
    #[must_use]
    pub const fn generated(value: T, usage: Option<TokenUsage>) -> Self {
        Self {
            value,
            provenance: Provenance::Generated,
            usage,
        }
    }

    /// Default substituted for a failed stage
    #[must_use]
    pub const fn defaulted(value: T, reason: DefaultReason, usage: Option<TokenUsage>) -> Self {
        Self {
            value,
            provenance: Provenance::Defaulted(reason),
            usage,
        }
    }

    /// Whether the value came from the service
    #[must_use]
    pub const fn is_generated(&self) -> bool {
        matches!(self.provenance, Provenance::Generated)
    }

    /// Default reason, `None` for generated values
    #[must_use]
    pub const fn default_reason(&self) -> Option<&DefaultReason> {
        match &self.provenance {
            Provenance::Generated => None,
            Provenance::Defaulted(reason) => Some(reason),
        }
    }

    /// Drop the tag and keep the value
    pub fn into_value(self) -> T {
        self.value
    }
}
