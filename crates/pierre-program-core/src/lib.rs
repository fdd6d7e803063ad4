// ABOUTME: Core types and constants for the Pierre program generation pipeline
// ABOUTME: Foundation crate with error handling, domain models, and generation constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Program Core
//!
//! Foundation crate providing shared types for program generation. It holds no
//! I/O and changes infrequently, so the pipeline crate recompiles on its own.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Accepted value ranges and persistence defaults
//! - **models**: Intake, stage structures, measure normalization, persisted records

/// Unified error handling system with standard error codes
pub mod errors;

/// Constants organized by domain
pub mod constants;

/// Domain models for generation and persistence
pub mod models;
