// ABOUTME: Error types used throughout the pipeline crate
// ABOUTME: Re-exports the unified AppError from pierre-program-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use pierre_program_core::errors::{
    classify_sqlx_error, AppError, AppResult, ErrorCode, ErrorContext, PersistenceDiagnostics,
    ViolationKind,
};
