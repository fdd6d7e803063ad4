// ABOUTME: Unified error handling for the program generation pipeline
// ABOUTME: Defines ErrorCode, AppError with structured context, and persistence diagnostics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling
//!
//! Every fallible operation in the workspace returns [`AppResult`]. Generation
//! stages never surface their errors to callers (they degrade to defaults), so
//! in practice the codes that escape the pipeline are `InvalidInput`,
//! `MissingRequiredField` and `DatabaseError`.

#[cfg(feature = "database-errors")]
mod database;

#[cfg(feature = "database-errors")]
pub use database::{classify_sqlx_error, PersistenceDiagnostics, ViolationKind};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Caller input failed validation
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// A required field is absent or blank
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,

    // Resource Management (4000-4999)
    /// Requested resource does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,

    // External Services (5000-5999)
    /// The reasoning service returned an error
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// The reasoning service could not be reached
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,
    /// The reasoning service rejected our credentials
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed = 5002,
    /// The reasoning service throttled the request
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited = 5003,

    // Configuration (6000-6999)
    /// Configuration could not be used
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Transactional write or read failed
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    /// JSON encoding or decoding failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ExternalServiceError => "The reasoning service encountered an error",
            Self::ExternalServiceUnavailable => "The reasoning service is currently unavailable",
            Self::ExternalAuthFailed => "Authentication with the reasoning service failed",
            Self::ExternalRateLimited => "The reasoning service rate limit was exceeded",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }

    /// Whether this code originates from the reasoning service boundary
    #[must_use]
    pub const fn is_external(&self) -> bool {
        matches!(
            self,
            Self::ExternalServiceError
                | Self::ExternalServiceUnavailable
                | Self::ExternalAuthFailed
                | Self::ExternalRateLimited
        )
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Identity of the caller the failing operation ran for
    pub caller: Option<String>,
    /// Resource the error concerns (program id, table name, ...)
    pub resource_id: Option<String>,
    /// Additional key-value context
    pub details: serde_json::Value,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            caller: None,
            resource_id: None,
            details: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// Unified error type for the workspace
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add the caller identity to the error context
    #[must_use]
    pub fn with_caller(mut self, caller: impl Into<String>) -> Self {
        self.context.caller = Some(caller.into());
        self
    }

    /// Add a resource ID to the error context
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Add details to the error context
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Required field missing or blank
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("Required field '{field}' is missing or blank"),
        )
        .with_details(serde_json::json!({ "field": field }))
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// External service error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External service could not be reached
    pub fn external_unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceUnavailable,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Transactional write violated a constraint or lost connectivity
    ///
    /// The `kind`, `target` and `constraint` diagnostics are placed in the
    /// error details so callers and log pipelines can filter on them.
    pub fn persistence(kind: &str, target: &str, constraint: Option<&str>) -> Self {
        let message = constraint.map_or_else(
            || format!("{kind} while writing {target}"),
            |c| format!("{kind} while writing {target} ({c})"),
        );
        Self::new(ErrorCode::DatabaseError, message).with_details(serde_json::json!({
            "kind": kind,
            "target": target,
            "constraint": constraint,
        }))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_error_carries_diagnostics() {
        let error = AppError::persistence("unique_violation", "exercise_library", Some("name"));

        assert_eq!(error.code, ErrorCode::DatabaseError);
        assert_eq!(error.context.details["kind"], "unique_violation");
        assert_eq!(error.context.details["target"], "exercise_library");
        assert_eq!(error.context.details["constraint"], "name");
        assert!(error.to_string().contains("exercise_library"));
    }

    #[test]
    fn test_missing_field_names_the_field() {
        let error = AppError::missing_field("name").with_caller("user-1");

        assert_eq!(error.code, ErrorCode::MissingRequiredField);
        assert_eq!(error.context.details["field"], "name");
        assert_eq!(error.context.caller.as_deref(), Some("user-1"));
    }

    #[test]
    fn test_external_codes() {
        assert!(ErrorCode::ExternalRateLimited.is_external());
        assert!(!ErrorCode::DatabaseError.is_external());
    }
}
