// ABOUTME: Database configuration for the program store
// ABOUTME: Type-safe SQLite URL parsing with in-memory support
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

use crate::errors::{AppError, AppResult};

/// Environment variable holding the database URL
pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";

/// Default on-disk database location
const DEFAULT_DATABASE_PATH: &str = "./data/programs.db";

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to `SQLite` database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// # Errors
    ///
    /// Returns an error for non-SQLite URLs or an empty path
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let s = s.trim();
        if s.starts_with("postgres://") || s.starts_with("postgresql://") {
            return Err(AppError::config(
                "Only SQLite databases are supported by the program store",
            ));
        }
        let path_str = s.strip_prefix("sqlite://").or_else(|| s.strip_prefix("sqlite:")).unwrap_or(s);
        match path_str {
            "" => Err(AppError::config("Database path is empty")),
            ":memory:" => Ok(Self::Memory),
            path => Ok(Self::SQLite {
                path: PathBuf::from(path),
            }),
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
        }
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Database configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
}

impl DatabaseConfig {
    /// Load database configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is set but invalid
    pub fn from_env() -> AppResult<Self> {
        let url = match env::var(DATABASE_URL_ENV_VAR) {
            Ok(raw) => DatabaseUrl::parse_url(&raw)?,
            Err(_) => DatabaseUrl::default(),
        };
        Ok(Self { url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sqlite_urls() {
        assert_eq!(DatabaseUrl::parse_url("sqlite::memory:").unwrap(), DatabaseUrl::Memory);
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/programs.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("./data/programs.db")
            }
        );
        assert_eq!(
            DatabaseUrl::parse_url("/tmp/p.db").unwrap().to_connection_string(),
            "sqlite:/tmp/p.db"
        );
    }

    #[test]
    fn test_rejects_postgres() {
        assert!(DatabaseUrl::parse_url("postgres://localhost/db").is_err());
        assert!(DatabaseUrl::parse_url("sqlite:").is_err());
    }
}
