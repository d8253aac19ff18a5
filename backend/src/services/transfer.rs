//! Transfer log service
//!
//! A transfer records a product moving between departments. Creating one
//! moves the product to the destination in the same transaction.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::StatusPropagator;

/// Transfer service
#[derive(Clone)]
pub struct TransferService {
    db: PgPool,
    propagator: StatusPropagator,
}

/// Transfer log entry with display names
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TransferLog {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub from_department_id: Option<Uuid>,
    pub to_department_id: Option<Uuid>,
    pub transfer_date: NaiveDate,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub product_code: Option<String>,
    pub product_name: Option<String>,
    pub from_department_name: Option<String>,
    pub to_department_name: Option<String>,
}

/// Input for recording a transfer
#[derive(Debug, Deserialize)]
pub struct CreateTransferInput {
    pub product_id: Option<Uuid>,
    /// Defaults to the product's current department
    pub from_department_id: Option<Uuid>,
    pub to_department_id: Option<Uuid>,
    /// Defaults to today
    pub transfer_date: Option<NaiveDate>,
    pub note: Option<String>,
}

const TRANSFER_SELECT: &str = r#"
    SELECT t.id, t.product_id, t.from_department_id, t.to_department_id,
           t.transfer_date, t.note, t.created_at,
           p.unique_code AS product_code, p.name AS product_name,
           fd.name AS from_department_name, td.name AS to_department_name
    FROM transfer_logs t
    LEFT JOIN products p ON p.id = t.product_id
    LEFT JOIN departments fd ON fd.id = t.from_department_id
    LEFT JOIN departments td ON td.id = t.to_department_id
"#;

impl TransferService {
    pub fn new(db: PgPool) -> Self {
        Self {
            db,
            propagator: StatusPropagator,
        }
    }

    /// List transfers, newest first, optionally for one product
    pub async fn list(&self, product_id: Option<Uuid>) -> AppResult<Vec<TransferLog>> {
        let sql = format!(
            r#"{TRANSFER_SELECT}
            WHERE ($1::UUID IS NULL OR t.product_id = $1)
            ORDER BY t.created_at DESC
            "#
        );

        let transfers = sqlx::query_as::<_, TransferLog>(&sql)
            .bind(product_id)
            .fetch_all(&self.db)
            .await?;

        Ok(transfers)
    }

    pub async fn get(&self, transfer_id: Uuid) -> AppResult<TransferLog> {
        let sql = format!("{TRANSFER_SELECT} WHERE t.id = $1");

        sqlx::query_as::<_, TransferLog>(&sql)
            .bind(transfer_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Transfer".to_string()))
    }

    /// Record a transfer and move the product to its destination.
    ///
    /// `from_department_id` is stored as given and not checked against the
    /// product's current department.
    pub async fn create(&self, input: CreateTransferInput) -> AppResult<TransferLog> {
        let transfer_date = input
            .transfer_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let mut tx = self.db.begin().await?;

        let from_department_id = match (input.from_department_id, input.product_id) {
            (Some(from), _) => Some(from),
            (None, Some(product_id)) => sqlx::query_scalar::<_, Option<Uuid>>(
                "SELECT current_department_id FROM products WHERE id = $1 FOR UPDATE",
            )
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?,
            (None, None) => None,
        };

        let transfer_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO transfer_logs (
                product_id, from_department_id, to_department_id, transfer_date, note
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(input.product_id)
        .bind(from_department_id)
        .bind(input.to_department_id)
        .bind(transfer_date)
        .bind(&input.note)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::reference_violation("transfer_logs"))?;

        self.propagator
            .on_transfer_created(&mut *tx, input.product_id, input.to_department_id)
            .await?;

        tx.commit().await?;

        tracing::info!(
            %transfer_id,
            product_id = ?input.product_id,
            to_department_id = ?input.to_department_id,
            "Transfer recorded"
        );

        self.get(transfer_id).await
    }
}
