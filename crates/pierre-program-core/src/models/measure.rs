// ABOUTME: Normalization of exercise measures into their persisted form
// ABOUTME: Converts minutes to seconds, maps unit strings, derives the legacy reps projection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::program::{Measure, MeasureType};
use crate::constants::units::SECONDS_PER_MINUTE;

/// Unit stored on an exercise row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeasureUnit {
    /// Seconds
    Seconds,
    /// Meters
    Meters,
    /// Kilometers
    Kilometers,
}

impl MeasureUnit {
    /// Enumerated column value
    #[must_use]
    pub const fn as_db_str(&self) -> &'static str {
        match self {
            Self::Seconds => "SECONDS",
            Self::Meters => "METERS",
            Self::Kilometers => "KILOMETERS",
        }
    }

    /// Parse the enumerated column value
    #[must_use]
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "SECONDS" => Some(Self::Seconds),
            "METERS" => Some(Self::Meters),
            "KILOMETERS" => Some(Self::Kilometers),
            _ => None,
        }
    }
}

/// Measure after unit normalization, ready to persist
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NormalizedMeasure {
    /// Kind of measure
    pub measure_type: MeasureType,
    /// Amount in `unit`
    pub value: f64,
    /// Enumerated unit, `None` when the proposed unit is not recognized
    pub unit: Option<MeasureUnit>,
}

/// Normalize a proposed measure
///
/// Minutes become seconds (value multiplied by 60) so no persisted unit is
/// ever minutes. `seconds`, `meters` and `km` map one to one; any other unit
/// string, including none at all, maps to no unit.
#[must_use]
pub fn normalize_measure(measure: &Measure) -> NormalizedMeasure {
    let raw_unit = measure
        .unit
        .as_deref()
        .map(|u| u.trim().to_lowercase())
        .unwrap_or_default();

    let (value, unit) = match raw_unit.as_str() {
        "minutes" => (measure.value * SECONDS_PER_MINUTE, Some(MeasureUnit::Seconds)),
        "seconds" => (measure.value, Some(MeasureUnit::Seconds)),
        "meters" => (measure.value, Some(MeasureUnit::Meters)),
        "km" => (measure.value, Some(MeasureUnit::Kilometers)),
        _ => (measure.value, None),
    };

    NormalizedMeasure {
        measure_type: measure.measure_type,
        value,
        unit,
    }
}

/// Integer reps for readers that predate structured measures
///
/// The rounded value for rep-based measures, zero otherwise.
#[must_use]
pub fn legacy_reps(measure_type: MeasureType, value: f64) -> i64 {
    match measure_type {
        MeasureType::Reps if value.is_finite() => value.round() as i64,
        _ => 0,
    }
}
