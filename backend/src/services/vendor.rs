//! Vendor management service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{nullable, validate_email, validate_name, EntityKind, Lifecycle, ListQuery};
use crate::services::CodeGenerator;

/// Vendor service for managing suppliers and repair vendors
#[derive(Clone)]
pub struct VendorService {
    db: PgPool,
    codes: CodeGenerator,
}

/// Vendor record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Vendor {
    pub id: Uuid,
    pub unique_code: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a vendor
#[derive(Debug, Deserialize)]
pub struct CreateVendorInput {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Input for updating a vendor
#[derive(Debug, Default, Deserialize)]
pub struct UpdateVendorInput {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub address: Option<Option<String>>,
    pub lifecycle: Option<Lifecycle>,
}

fn check_email(email: Option<&str>) -> AppResult<()> {
    match email {
        Some(email) if !email.is_empty() => {
            validate_email(email).map_err(|m| AppError::validation("email", m))
        }
        _ => Ok(()),
    }
}

impl VendorService {
    /// Create a new VendorService instance
    pub fn new(db: PgPool, codes: CodeGenerator) -> Self {
        Self { db, codes }
    }

    /// List vendors, newest first
    pub async fn list(&self, query: &ListQuery) -> AppResult<Vec<Vendor>> {
        let vendors = sqlx::query_as::<_, Vendor>(
            r#"
            SELECT id, unique_code, name, phone, email, address, lifecycle, created_at, updated_at
            FROM vendors
            WHERE ($1::VARCHAR IS NULL OR lifecycle = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(query.lifecycle())
        .fetch_all(&self.db)
        .await?;

        Ok(vendors)
    }

    /// Get a vendor by ID
    pub async fn get(&self, vendor_id: Uuid) -> AppResult<Vendor> {
        sqlx::query_as::<_, Vendor>(
            r#"
            SELECT id, unique_code, name, phone, email, address, lifecycle, created_at, updated_at
            FROM vendors
            WHERE id = $1
            "#,
        )
        .bind(vendor_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Vendor".to_string()))
    }

    /// Create a vendor and assign its unique code
    pub async fn create(&self, input: CreateVendorInput) -> AppResult<Vendor> {
        validate_name(&input.name).map_err(|m| AppError::validation("name", m))?;
        check_email(input.email.as_deref())?;

        let input = &input;
        let vendor = self
            .codes
            .assign(EntityKind::Vendor, &self.db, move |code| self.insert(code, input))
            .await?;

        tracing::info!(vendor_id = %vendor.id, code = %vendor.unique_code, "Vendor created");
        Ok(vendor)
    }

    async fn insert(&self, code: String, input: &CreateVendorInput) -> AppResult<Option<Vendor>> {
        let vendor = sqlx::query_as::<_, Vendor>(
            r#"
            INSERT INTO vendors (unique_code, name, phone, email, address)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (unique_code) DO NOTHING
            RETURNING id, unique_code, name, phone, email, address, lifecycle, created_at, updated_at
            "#,
        )
        .bind(&code)
        .bind(input.name.trim())
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .fetch_optional(&self.db)
        .await?;

        Ok(vendor)
    }

    /// Update a vendor. The unique code is never touched.
    pub async fn update(&self, vendor_id: Uuid, input: UpdateVendorInput) -> AppResult<Vendor> {
        let existing = self.get(vendor_id).await?;

        let name = input.name.unwrap_or(existing.name);
        validate_name(&name).map_err(|m| AppError::validation("name", m))?;
        let phone = input.phone.unwrap_or(existing.phone);
        let email = input.email.unwrap_or(existing.email);
        check_email(email.as_deref())?;
        let address = input.address.unwrap_or(existing.address);
        let lifecycle = input.lifecycle.unwrap_or(existing.lifecycle);

        let vendor = sqlx::query_as::<_, Vendor>(
            r#"
            UPDATE vendors
            SET name = $1, phone = $2, email = $3, address = $4, lifecycle = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING id, unique_code, name, phone, email, address, lifecycle, created_at, updated_at
            "#,
        )
        .bind(name.trim())
        .bind(&phone)
        .bind(&email)
        .bind(&address)
        .bind(lifecycle)
        .bind(vendor_id)
        .fetch_one(&self.db)
        .await?;

        Ok(vendor)
    }

    /// Deactivate a vendor
    pub async fn deactivate(&self, vendor_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE vendors SET lifecycle = 'deactivated', updated_at = NOW() WHERE id = $1",
        )
        .bind(vendor_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Vendor".to_string()));
        }

        tracing::info!(%vendor_id, "Vendor deactivated");
        Ok(())
    }
}
