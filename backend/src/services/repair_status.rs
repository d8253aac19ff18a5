//! Repair status management service
//!
//! A repair status may map to a product status; updating a repair log to
//! that repair status moves the product into the mapped status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{nullable, validate_name, Lifecycle, ListQuery};

/// Repair status service
#[derive(Clone)]
pub struct RepairStatusService {
    db: PgPool,
}

/// Repair status with the name of its mapped product status
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RepairStatus {
    pub id: Uuid,
    pub name: String,
    pub product_status_id: Option<Uuid>,
    pub product_status_name: Option<String>,
    pub is_final: bool,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a repair status
#[derive(Debug, Deserialize)]
pub struct CreateRepairStatusInput {
    pub name: String,
    pub product_status_id: Option<Uuid>,
    #[serde(default)]
    pub is_final: bool,
}

/// Input for updating a repair status
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRepairStatusInput {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub product_status_id: Option<Option<Uuid>>,
    pub is_final: Option<bool>,
    pub lifecycle: Option<Lifecycle>,
}

const REPAIR_STATUS_SELECT: &str = r#"
    SELECT rs.id, rs.name, rs.product_status_id, s.name AS product_status_name,
           rs.is_final, rs.lifecycle, rs.created_at, rs.updated_at
    FROM repair_statuses rs
    LEFT JOIN statuses s ON s.id = rs.product_status_id
"#;

/// Name collisions become `DuplicateEntry`, bad status references a
/// field validation error
fn write_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            AppError::reference_violation("repair_statuses")(err)
        }
        _ => AppError::unique_violation("name")(err),
    }
}

impl RepairStatusService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List repair statuses ordered by name
    pub async fn list(&self, query: &ListQuery) -> AppResult<Vec<RepairStatus>> {
        let sql = format!(
            r#"{REPAIR_STATUS_SELECT}
            WHERE ($1::VARCHAR IS NULL OR rs.lifecycle = $1)
            ORDER BY rs.name
            "#
        );

        let statuses = sqlx::query_as::<_, RepairStatus>(&sql)
            .bind(query.lifecycle())
            .fetch_all(&self.db)
            .await?;

        Ok(statuses)
    }

    pub async fn get(&self, repair_status_id: Uuid) -> AppResult<RepairStatus> {
        let sql = format!("{REPAIR_STATUS_SELECT} WHERE rs.id = $1");

        sqlx::query_as::<_, RepairStatus>(&sql)
            .bind(repair_status_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Repair status".to_string()))
    }

    pub async fn create(&self, input: CreateRepairStatusInput) -> AppResult<RepairStatus> {
        validate_name(&input.name).map_err(|m| AppError::validation("name", m))?;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO repair_statuses (name, product_status_id, is_final)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(input.name.trim())
        .bind(input.product_status_id)
        .bind(input.is_final)
        .fetch_one(&self.db)
        .await
        .map_err(write_error)?;

        tracing::info!(repair_status_id = %id, "Repair status created");
        self.get(id).await
    }

    pub async fn update(
        &self,
        repair_status_id: Uuid,
        input: UpdateRepairStatusInput,
    ) -> AppResult<RepairStatus> {
        let existing = self.get(repair_status_id).await?;

        let name = input.name.unwrap_or(existing.name);
        validate_name(&name).map_err(|m| AppError::validation("name", m))?;

        sqlx::query(
            r#"
            UPDATE repair_statuses
            SET name = $1, product_status_id = $2, is_final = $3, lifecycle = $4,
                updated_at = NOW()
            WHERE id = $5
            "#,
        )
        .bind(name.trim())
        .bind(
            input
                .product_status_id
                .unwrap_or(existing.product_status_id),
        )
        .bind(input.is_final.unwrap_or(existing.is_final))
        .bind(input.lifecycle.unwrap_or(existing.lifecycle))
        .bind(repair_status_id)
        .execute(&self.db)
        .await
        .map_err(write_error)?;

        self.get(repair_status_id).await
    }

    pub async fn deactivate(&self, repair_status_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE repair_statuses SET lifecycle = 'deactivated', updated_at = NOW() WHERE id = $1",
        )
        .bind(repair_status_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Repair status".to_string()));
        }

        tracing::info!(%repair_status_id, "Repair status deactivated");
        Ok(())
    }
}
