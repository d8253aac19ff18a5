//! Repair log service
//!
//! Repair logs track a product sent out for repair. Every update reasserts
//! the product status mapped from the log's repair status, and every change
//! of repair status is appended to the movement history.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{nullable, validate_amount, validate_repair_dates};
use crate::services::StatusPropagator;

/// Repair service
#[derive(Clone)]
pub struct RepairService {
    db: PgPool,
    propagator: StatusPropagator,
}

/// Repair log with display names
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RepairLog {
    pub id: Uuid,
    pub product_id: Uuid,
    pub fault_description: String,
    pub repair_vendor_id: Option<Uuid>,
    pub sent_date: NaiveDate,
    pub received_date: Option<NaiveDate>,
    pub repair_cost: Option<Decimal>,
    pub status_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub product_code: Option<String>,
    pub product_name: Option<String>,
    pub vendor_name: Option<String>,
    pub status_name: Option<String>,
}

/// One repair status assignment in a repair's history
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RepairMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub repair_id: Uuid,
    pub status_id: Option<Uuid>,
    pub status_name: Option<String>,
    pub from_department_id: Option<Uuid>,
    pub from_department_name: Option<String>,
    pub to_vendor_id: Option<Uuid>,
    pub to_vendor_name: Option<String>,
    pub changed_at: DateTime<Utc>,
}

/// Input for opening a repair log
#[derive(Debug, Deserialize)]
pub struct CreateRepairInput {
    pub product_id: Uuid,
    pub fault_description: String,
    pub repair_vendor_id: Option<Uuid>,
    /// Defaults to today
    pub sent_date: Option<NaiveDate>,
    pub received_date: Option<NaiveDate>,
    pub repair_cost: Option<Decimal>,
    pub status_id: Option<Uuid>,
}

/// Input for updating a repair log
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRepairInput {
    pub fault_description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub repair_vendor_id: Option<Option<Uuid>>,
    pub sent_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "nullable")]
    pub received_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub repair_cost: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "nullable")]
    pub status_id: Option<Option<Uuid>>,
}

/// Stored columns of a repair log, read under a row lock
#[derive(Debug, FromRow)]
struct RepairRow {
    product_id: Uuid,
    fault_description: String,
    repair_vendor_id: Option<Uuid>,
    sent_date: NaiveDate,
    received_date: Option<NaiveDate>,
    repair_cost: Option<Decimal>,
    status_id: Option<Uuid>,
}

fn check_repair(
    fault_description: &str,
    sent_date: NaiveDate,
    received_date: Option<NaiveDate>,
    repair_cost: Option<Decimal>,
) -> AppResult<()> {
    if fault_description.trim().is_empty() {
        return Err(AppError::validation(
            "fault_description",
            "Fault description is required",
        ));
    }
    validate_repair_dates(sent_date, received_date)
        .map_err(|m| AppError::validation("received_date", m))?;
    if let Some(cost) = repair_cost {
        validate_amount(cost).map_err(|m| AppError::validation("repair_cost", m))?;
    }
    Ok(())
}

const REPAIR_SELECT: &str = r#"
    SELECT r.id, r.product_id, r.fault_description, r.repair_vendor_id,
           r.sent_date, r.received_date, r.repair_cost, r.status_id,
           r.created_at, r.updated_at,
           p.unique_code AS product_code, p.name AS product_name,
           v.name AS vendor_name, rs.name AS status_name
    FROM repair_logs r
    LEFT JOIN products p ON p.id = r.product_id
    LEFT JOIN vendors v ON v.id = r.repair_vendor_id
    LEFT JOIN repair_statuses rs ON rs.id = r.status_id
"#;

impl RepairService {
    pub fn new(db: PgPool) -> Self {
        Self {
            db,
            propagator: StatusPropagator,
        }
    }

    /// List repair logs, newest first, optionally for one product
    pub async fn list(&self, product_id: Option<Uuid>) -> AppResult<Vec<RepairLog>> {
        let sql = format!(
            r#"{REPAIR_SELECT}
            WHERE ($1::UUID IS NULL OR r.product_id = $1)
            ORDER BY r.sent_date DESC, r.created_at DESC
            "#
        );

        let repairs = sqlx::query_as::<_, RepairLog>(&sql)
            .bind(product_id)
            .fetch_all(&self.db)
            .await?;

        Ok(repairs)
    }

    pub async fn get(&self, repair_id: Uuid) -> AppResult<RepairLog> {
        let sql = format!("{REPAIR_SELECT} WHERE r.id = $1");

        sqlx::query_as::<_, RepairLog>(&sql)
            .bind(repair_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Repair".to_string()))
    }

    /// Open a repair log. An initial status is recorded as the first
    /// movement; the product status is only changed by updates.
    pub async fn create(&self, input: CreateRepairInput) -> AppResult<RepairLog> {
        let sent_date = input.sent_date.unwrap_or_else(|| Utc::now().date_naive());
        check_repair(
            &input.fault_description,
            sent_date,
            input.received_date,
            input.repair_cost,
        )?;

        let mut tx = self.db.begin().await?;

        let repair_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO repair_logs (
                product_id, fault_description, repair_vendor_id,
                sent_date, received_date, repair_cost, status_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(input.product_id)
        .bind(input.fault_description.trim())
        .bind(input.repair_vendor_id)
        .bind(sent_date)
        .bind(input.received_date)
        .bind(input.repair_cost)
        .bind(input.status_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::reference_violation("repair_logs"))?;

        if input.status_id.is_some() {
            record_movement(
                &mut *tx,
                repair_id,
                input.product_id,
                input.status_id,
                input.repair_vendor_id,
            )
            .await?;
        }

        tx.commit().await?;

        tracing::info!(%repair_id, product_id = %input.product_id, "Repair log opened");
        self.get(repair_id).await
    }

    /// Update a repair log and propagate its mapped product status.
    ///
    /// Propagation runs on every update, so repeating an update leaves the
    /// product in the same state. When the status maps to a product status,
    /// a missing or deactivated product fails the whole update.
    pub async fn update(&self, repair_id: Uuid, input: UpdateRepairInput) -> AppResult<RepairLog> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, RepairRow>(
            r#"
            SELECT product_id, fault_description, repair_vendor_id,
                   sent_date, received_date, repair_cost, status_id
            FROM repair_logs
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(repair_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Repair".to_string()))?;

        let fault_description = input
            .fault_description
            .unwrap_or(existing.fault_description);
        let repair_vendor_id = input.repair_vendor_id.unwrap_or(existing.repair_vendor_id);
        let sent_date = input.sent_date.unwrap_or(existing.sent_date);
        let received_date = input.received_date.unwrap_or(existing.received_date);
        let repair_cost = input.repair_cost.unwrap_or(existing.repair_cost);
        let status_id = input.status_id.unwrap_or(existing.status_id);
        check_repair(&fault_description, sent_date, received_date, repair_cost)?;

        sqlx::query(
            r#"
            UPDATE repair_logs
            SET fault_description = $1, repair_vendor_id = $2, sent_date = $3,
                received_date = $4, repair_cost = $5, status_id = $6, updated_at = NOW()
            WHERE id = $7
            "#,
        )
        .bind(fault_description.trim())
        .bind(repair_vendor_id)
        .bind(sent_date)
        .bind(received_date)
        .bind(repair_cost)
        .bind(status_id)
        .bind(repair_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::reference_violation("repair_logs"))?;

        if status_id != existing.status_id {
            record_movement(
                &mut *tx,
                repair_id,
                existing.product_id,
                status_id,
                repair_vendor_id,
            )
            .await?;
        }

        self.propagator
            .on_repair_updated(&mut *tx, Some(existing.product_id), status_id)
            .await?;

        tx.commit().await?;

        tracing::info!(%repair_id, ?status_id, "Repair log updated");
        self.get(repair_id).await
    }

    /// Status history of a repair, newest first
    pub async fn movements(&self, repair_id: Uuid) -> AppResult<Vec<RepairMovement>> {
        // Distinguish an unknown repair from one without history
        self.get(repair_id).await?;

        let movements = sqlx::query_as::<_, RepairMovement>(
            r#"
            SELECT m.id, m.product_id, m.repair_id, m.status_id, rs.name AS status_name,
                   m.from_department_id, d.name AS from_department_name,
                   m.to_vendor_id, v.name AS to_vendor_name, m.changed_at
            FROM repair_movements m
            LEFT JOIN repair_statuses rs ON rs.id = m.status_id
            LEFT JOIN departments d ON d.id = m.from_department_id
            LEFT JOIN vendors v ON v.id = m.to_vendor_id
            WHERE m.repair_id = $1
            ORDER BY m.changed_at DESC
            "#,
        )
        .bind(repair_id)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }
}

/// Append a movement row, taking the product's current department as origin
async fn record_movement(
    conn: &mut PgConnection,
    repair_id: Uuid,
    product_id: Uuid,
    status_id: Option<Uuid>,
    to_vendor_id: Option<Uuid>,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO repair_movements (
            product_id, repair_id, status_id, from_department_id, to_vendor_id
        )
        SELECT p.id, $2, $3, p.current_department_id, $4
        FROM products p
        WHERE p.id = $1
        "#,
    )
    .bind(product_id)
    .bind(repair_id)
    .bind(status_id)
    .bind(to_vendor_id)
    .execute(&mut *conn)
    .await?;

    tracing::debug!(%repair_id, ?status_id, "Repair movement recorded");
    Ok(())
}
