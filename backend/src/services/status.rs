//! Product status management service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{validate_name, EntityKind, Lifecycle, ListQuery};
use crate::services::CodeGenerator;

/// Status service for the product status catalogue (in stock, in use, ...)
#[derive(Clone)]
pub struct StatusService {
    db: PgPool,
    codes: CodeGenerator,
}

/// Product status record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Status {
    pub id: Uuid,
    pub unique_code: String,
    pub name: String,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a status
#[derive(Debug, Deserialize)]
pub struct CreateStatusInput {
    pub name: String,
}

/// Input for updating a status
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStatusInput {
    pub name: Option<String>,
    pub lifecycle: Option<Lifecycle>,
}

impl StatusService {
    pub fn new(db: PgPool, codes: CodeGenerator) -> Self {
        Self { db, codes }
    }

    /// List statuses ordered by name
    pub async fn list(&self, query: &ListQuery) -> AppResult<Vec<Status>> {
        let statuses = sqlx::query_as::<_, Status>(
            r#"
            SELECT id, unique_code, name, lifecycle, created_at, updated_at
            FROM statuses
            WHERE ($1::VARCHAR IS NULL OR lifecycle = $1)
            ORDER BY name
            "#,
        )
        .bind(query.lifecycle())
        .fetch_all(&self.db)
        .await?;

        Ok(statuses)
    }

    pub async fn get(&self, status_id: Uuid) -> AppResult<Status> {
        sqlx::query_as::<_, Status>(
            r#"
            SELECT id, unique_code, name, lifecycle, created_at, updated_at
            FROM statuses
            WHERE id = $1
            "#,
        )
        .bind(status_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Status".to_string()))
    }

    pub async fn create(&self, input: CreateStatusInput) -> AppResult<Status> {
        validate_name(&input.name).map_err(|m| AppError::validation("name", m))?;

        let name = input.name.trim();
        let status = self
            .codes
            .assign(EntityKind::Status, &self.db, move |code| self.insert(code, name))
            .await?;

        tracing::info!(status_id = %status.id, code = %status.unique_code, "Status created");
        Ok(status)
    }

    async fn insert(&self, code: String, name: &str) -> AppResult<Option<Status>> {
        let status = sqlx::query_as::<_, Status>(
            r#"
            INSERT INTO statuses (unique_code, name)
            VALUES ($1, $2)
            ON CONFLICT (unique_code) DO NOTHING
            RETURNING id, unique_code, name, lifecycle, created_at, updated_at
            "#,
        )
        .bind(&code)
        .bind(name)
        .fetch_optional(&self.db)
        .await
        .map_err(AppError::unique_violation("name"))?;

        Ok(status)
    }

    pub async fn update(&self, status_id: Uuid, input: UpdateStatusInput) -> AppResult<Status> {
        let existing = self.get(status_id).await?;

        let name = input.name.unwrap_or(existing.name);
        validate_name(&name).map_err(|m| AppError::validation("name", m))?;
        let lifecycle = input.lifecycle.unwrap_or(existing.lifecycle);

        let status = sqlx::query_as::<_, Status>(
            r#"
            UPDATE statuses
            SET name = $1, lifecycle = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING id, unique_code, name, lifecycle, created_at, updated_at
            "#,
        )
        .bind(name.trim())
        .bind(lifecycle)
        .bind(status_id)
        .fetch_one(&self.db)
        .await
        .map_err(AppError::unique_violation("name"))?;

        Ok(status)
    }

    pub async fn deactivate(&self, status_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE statuses SET lifecycle = 'deactivated', updated_at = NOW() WHERE id = $1",
        )
        .bind(status_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Status".to_string()));
        }

        tracing::info!(%status_id, "Status deactivated");
        Ok(())
    }
}
