// ABOUTME: Classification of sqlx failures into structured persistence diagnostics
// ABOUTME: Maps driver errors onto violation kinds and the constraint they tripped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use sqlx::error::ErrorKind;

use super::AppError;

/// Category of a failed transactional write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// UNIQUE constraint
    UniqueViolation,
    /// FOREIGN KEY constraint (missing reference)
    ForeignKeyViolation,
    /// NOT NULL constraint
    NotNullViolation,
    /// CHECK constraint
    CheckViolation,
    /// Statement aborted by the engine (trigger, RAISE, busy)
    Aborted,
    /// Pool exhausted, connection dropped or I/O failure
    Connectivity,
    /// Anything else the driver reported
    Other,
}

impl ViolationKind {
    /// Stable string used in logs and error details
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UniqueViolation => "unique_violation",
            Self::ForeignKeyViolation => "foreign_key_violation",
            Self::NotNullViolation => "not_null_violation",
            Self::CheckViolation => "check_violation",
            Self::Aborted => "aborted",
            Self::Connectivity => "connectivity",
            Self::Other => "other",
        }
    }
}

/// Diagnostics extracted from a driver error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceDiagnostics {
    /// What went wrong
    pub kind: ViolationKind,
    /// Constraint or column named by the driver, when it reports one
    pub constraint: Option<String>,
    /// Raw driver message
    pub message: String,
}

/// Classify a sqlx error for structured logging
#[must_use]
pub fn classify_sqlx_error(error: &sqlx::Error) -> PersistenceDiagnostics {
    match error {
        sqlx::Error::Database(db_error) => {
            let message = db_error.message().to_owned();
            let kind = match db_error.kind() {
                ErrorKind::UniqueViolation => ViolationKind::UniqueViolation,
                ErrorKind::ForeignKeyViolation => ViolationKind::ForeignKeyViolation,
                ErrorKind::NotNullViolation => ViolationKind::NotNullViolation,
                ErrorKind::CheckViolation => ViolationKind::CheckViolation,
                _ => classify_message(&message),
            };
            // SQLite reports the constraint only inside the message text
            let constraint = db_error
                .constraint()
                .map(ToOwned::to_owned)
                .or_else(|| {
                    message
                        .split_once("failed: ")
                        .map(|(_, rest)| rest.trim().to_owned())
                });
            PersistenceDiagnostics {
                kind,
                constraint,
                message,
            }
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            PersistenceDiagnostics {
                kind: ViolationKind::Connectivity,
                constraint: None,
                message: error.to_string(),
            }
        }
        other => PersistenceDiagnostics {
            kind: ViolationKind::Other,
            constraint: None,
            message: other.to_string(),
        },
    }
}

fn classify_message(message: &str) -> ViolationKind {
    let lower = message.to_lowercase();
    if lower.contains("unique constraint") {
        ViolationKind::UniqueViolation
    } else if lower.contains("foreign key constraint") {
        ViolationKind::ForeignKeyViolation
    } else if lower.contains("not null constraint") {
        ViolationKind::NotNullViolation
    } else if lower.contains("check constraint") {
        ViolationKind::CheckViolation
    } else if lower.contains("locked") || lower.contains("busy") || lower.contains("abort") {
        ViolationKind::Aborted
    } else {
        ViolationKind::Other
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        let diagnostics = classify_sqlx_error(&error);
        Self::database(diagnostics.message.clone())
            .with_details(serde_json::json!({
                "kind": diagnostics.kind.as_str(),
                "constraint": diagnostics.constraint,
            }))
            .with_source(error)
    }
}
