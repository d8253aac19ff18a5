//! Unique code assignment
//!
//! Candidates are drawn with [`shared::candidate_code`] for the current
//! month and checked against the store. Every code-bearing table carries a
//! `UNIQUE (unique_code)` constraint, so two concurrent creates that pass the
//! existence check with the same candidate still cannot both commit: the
//! loser's insert returns no row and the generator retries with a fresh code.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use sqlx::PgPool;
use std::future::Future;

use crate::error::{AppError, AppResult};
use shared::{candidate_code, EntityKind};

/// Existence check for codes of one entity kind
#[async_trait]
pub trait CodeLookup: Send + Sync {
    async fn exists_code(&self, kind: EntityKind, code: &str) -> AppResult<bool>;
}

#[async_trait]
impl CodeLookup for PgPool {
    async fn exists_code(&self, kind: EntityKind, code: &str) -> AppResult<bool> {
        // Table names come from a closed enum, never from input
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE unique_code = $1)",
            kind.table()
        );
        let exists = sqlx::query_scalar::<_, bool>(&sql)
            .bind(code)
            .fetch_one(self)
            .await?;
        Ok(exists)
    }
}

/// Generates `PREFIX-MMRRR` codes with a bounded number of attempts
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator {
    max_attempts: u32,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(crate::config::CodesConfig::default().max_attempts)
    }
}

impl CodeGenerator {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Draw one candidate for the current month without checking the store
    pub fn candidate(&self, kind: EntityKind) -> String {
        let month = Utc::now().month();
        candidate_code(kind, month, &mut rand::thread_rng())
    }

    /// Find a code that does not exist for `kind` at the moment of the check
    pub async fn generate<L>(&self, kind: EntityKind, lookup: &L) -> AppResult<String>
    where
        L: CodeLookup + ?Sized,
    {
        for attempt in 1..=self.max_attempts {
            let code = self.candidate(kind);
            if !lookup.exists_code(kind, &code).await? {
                return Ok(code);
            }
            tracing::debug!(%kind, %code, attempt, "Code candidate already taken");
        }

        tracing::error!(%kind, attempts = self.max_attempts, "Unique code space exhausted");
        Err(AppError::CodeSpaceExhausted {
            kind,
            attempts: self.max_attempts,
        })
    }

    /// Generate a code and hand it to `insert`.
    ///
    /// `insert` returns `Ok(None)` when the store rejected the code as a
    /// duplicate at commit time (e.g. `ON CONFLICT (unique_code) DO NOTHING`
    /// returned no row); the generator then retries with a new candidate.
    /// Pre-check misses and commit-time collisions share one attempt budget.
    pub async fn assign<T, L, F, Fut>(
        &self,
        kind: EntityKind,
        lookup: &L,
        mut insert: F,
    ) -> AppResult<T>
    where
        L: CodeLookup + ?Sized,
        F: FnMut(String) -> Fut,
        Fut: Future<Output = AppResult<Option<T>>>,
    {
        for attempt in 1..=self.max_attempts {
            let code = self.candidate(kind);
            if lookup.exists_code(kind, &code).await? {
                tracing::debug!(%kind, %code, attempt, "Code candidate already taken");
                continue;
            }

            match insert(code.clone()).await {
                Ok(Some(record)) => {
                    tracing::debug!(%kind, %code, attempt, "Assigned unique code");
                    return Ok(record);
                }
                Ok(None) | Err(AppError::DuplicateCode { .. }) => {
                    tracing::warn!(%kind, %code, attempt, "Unique code collided at commit");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::error!(%kind, attempts = self.max_attempts, "Unique code space exhausted");
        Err(AppError::CodeSpaceExhausted {
            kind,
            attempts: self.max_attempts,
        })
    }
}
