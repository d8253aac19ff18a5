//! Applies cross-entity effects of transfers and repair updates to products
//!
//! Callers run these inside the transaction of the triggering write, so a
//! failed product update rolls the trigger back with it.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{repair_effect, transfer_effect, ProductEffect, ProductPlacement};

/// Stateless propagator; all work happens on the caller's connection
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusPropagator;

impl StatusPropagator {
    /// Move the product to the transfer's destination department.
    /// Returns `None` when the transfer has no product or no destination.
    pub async fn on_transfer_created(
        &self,
        conn: &mut PgConnection,
        product_id: Option<Uuid>,
        to_department_id: Option<Uuid>,
    ) -> AppResult<Option<ProductPlacement>> {
        match transfer_effect(product_id, to_department_id) {
            Some(effect) => self.apply(conn, effect).await.map(Some),
            None => {
                tracing::debug!("Transfer has no product or destination, nothing to propagate");
                Ok(None)
            }
        }
    }

    /// Reassert the product status mapped from the repair's status.
    /// Returns `None` when the repair status carries no product status.
    pub async fn on_repair_updated(
        &self,
        conn: &mut PgConnection,
        product_id: Option<Uuid>,
        repair_status_id: Option<Uuid>,
    ) -> AppResult<Option<ProductPlacement>> {
        let mapped = match repair_status_id {
            Some(id) => sqlx::query_scalar::<_, Option<Uuid>>(
                "SELECT product_status_id FROM repair_statuses WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Repair status".to_string()))?,
            None => None,
        };

        match repair_effect(product_id, mapped) {
            Some(effect) => self.apply(conn, effect).await.map(Some),
            None => {
                tracing::debug!(?repair_status_id, "Repair status has no product status mapping");
                Ok(None)
            }
        }
    }

    /// Lock the product row, apply `effect` and write the result back
    pub async fn apply(
        &self,
        conn: &mut PgConnection,
        effect: ProductEffect,
    ) -> AppResult<ProductPlacement> {
        let product_id = effect.product_id();

        let (current_department_id, status_id) = sqlx::query_as::<_, (Option<Uuid>, Option<Uuid>)>(
            r#"
            SELECT current_department_id, status_id
            FROM products
            WHERE id = $1 AND lifecycle = 'active'
            FOR UPDATE
            "#,
        )
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let mut placement = ProductPlacement {
            current_department_id,
            status_id,
        };
        placement.apply(&effect);

        sqlx::query(
            r#"
            UPDATE products
            SET current_department_id = $1, status_id = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(placement.current_department_id)
        .bind(placement.status_id)
        .bind(product_id)
        .execute(&mut *conn)
        .await
        .map_err(AppError::reference_violation("products"))?;

        tracing::info!(%product_id, ?effect, "Propagated change to product");

        Ok(placement)
    }
}
