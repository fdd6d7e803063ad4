// ABOUTME: RAII transaction guard that rolls back unless explicitly committed
// ABOUTME: Wraps an sqlx Transaction so every early return inside a program write aborts it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! ```text
//! let mut guard = TransactionGuard::new(pool.begin().await?);
//! sqlx::query("INSERT INTO programs ...").execute(guard.executor()?).await?;
//! sqlx::query("INSERT INTO workout_plans ...").execute(guard.executor()?).await?;
//! guard.commit().await?;
//! ```
//!
//! If any statement fails the `?` drops the guard and `SQLx` rolls the
//! transaction back, so a program tree is written whole or not at all.

use sqlx::{Database, Transaction};
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};

/// Transaction wrapper with rollback on drop
pub struct TransactionGuard<'c, DB: Database> {
    transaction: Option<Transaction<'c, DB>>,
    committed: bool,
}

impl<'c, DB: Database> TransactionGuard<'c, DB> {
    /// Wrap a transaction obtained from `pool.begin()`
    #[must_use]
    pub fn new(transaction: Transaction<'c, DB>) -> Self {
        debug!("Transaction opened; rolls back unless committed");
        Self {
            transaction: Some(transaction),
            committed: false,
        }
    }

    /// Commit and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails or the transaction was already
    /// consumed.
    pub async fn commit(mut self) -> AppResult<()> {
        let tx = self
            .transaction
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed - cannot commit"))?;
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Transaction commit failed: {e}")))?;
        self.committed = true;
        debug!("Transaction committed");
        Ok(())
    }

    /// Roll back and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails or the transaction was already
    /// consumed.
    pub async fn rollback(mut self) -> AppResult<()> {
        let tx = self
            .transaction
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed - cannot rollback"))?;
        tx.rollback()
            .await
            .map_err(|e| AppError::database(format!("Transaction rollback failed: {e}")))?;
        debug!("Transaction rolled back");
        Ok(())
    }

    /// Whether `commit` succeeded
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        self.committed
    }

    /// Connection to run statements on
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction was already consumed.
    pub fn executor(&mut self) -> AppResult<&mut <DB as Database>::Connection> {
        self.transaction
            .as_deref_mut()
            .ok_or_else(|| AppError::internal("Transaction already consumed"))
    }
}

impl<DB: Database> Drop for TransactionGuard<'_, DB> {
    fn drop(&mut self) {
        if self.transaction.is_some() && !self.committed {
            warn!("Transaction dropped without commit; rolling back");
        }
    }
}

/// Guard over a `SQLite` transaction
pub type SqliteTransactionGuard<'c> = TransactionGuard<'c, sqlx::Sqlite>;

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::{Row, SqlitePool};

    async fn pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("CREATE TABLE t (v INTEGER)")
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    async fn count(pool: &SqlitePool) -> i64 {
        sqlx::query("SELECT COUNT(*) AS n FROM t")
            .fetch_one(pool)
            .await
            .unwrap()
            .get("n")
    }

    #[tokio::test]
    async fn test_commit_persists() {
        let pool = pool().await;
        let mut guard = SqliteTransactionGuard::new(pool.begin().await.unwrap());
        sqlx::query("INSERT INTO t (v) VALUES (1)")
            .execute(guard.executor().unwrap())
            .await
            .unwrap();
        guard.commit().await.unwrap();

        assert_eq!(count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_drop_rolls_back() {
        let pool = pool().await;
        {
            let mut guard = SqliteTransactionGuard::new(pool.begin().await.unwrap());
            sqlx::query("INSERT INTO t (v) VALUES (1)")
                .execute(guard.executor().unwrap())
                .await
                .unwrap();
            assert!(!guard.is_committed());
        }

        assert_eq!(count(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_explicit_rollback() {
        let pool = pool().await;
        let mut guard = SqliteTransactionGuard::new(pool.begin().await.unwrap());
        sqlx::query("INSERT INTO t (v) VALUES (1)")
            .execute(guard.executor().unwrap())
            .await
            .unwrap();
        guard.rollback().await.unwrap();

        assert_eq!(count(&pool).await, 0);
    }
}
