//! Product management service
//!
//! Products carry a `PRD-` unique code and a warranty end date derived from
//! purchase date and warranty length on every save.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    compute_warranty_end, nullable, validate_amount, validate_name, validate_quantity,
    validate_warranty_years, EntityKind, Lifecycle, ProductFilter,
};
use crate::services::CodeGenerator;

/// Product service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
    codes: CodeGenerator,
}

/// Product with the display names of its references
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub unique_code: String,
    pub name: String,
    pub model_number: Option<String>,
    pub serial_number: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub current_department_id: Option<Uuid>,
    pub status_id: Option<Uuid>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_years: Option<i32>,
    pub warranty_end_date: Option<NaiveDate>,
    pub quantity: i32,
    pub price: Decimal,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub vendor_name: Option<String>,
    pub department_name: Option<String>,
    pub category_name: Option<String>,
    pub status_name: Option<String>,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub model_number: Option<String>,
    pub serial_number: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub current_department_id: Option<Uuid>,
    pub status_id: Option<Uuid>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_years: Option<i32>,
    pub quantity: Option<i32>,
    pub price: Option<Decimal>,
}

/// Input for updating a product. Nullable fields accept an explicit `null`
/// to clear the stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub model_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub serial_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub category_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    pub vendor_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    pub current_department_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    pub status_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    pub purchase_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub warranty_years: Option<Option<i32>>,
    pub quantity: Option<i32>,
    pub price: Option<Decimal>,
    pub lifecycle: Option<Lifecycle>,
}

/// Validated warranty input and its derived end date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarrantyTerms {
    pub purchase_date: Option<NaiveDate>,
    pub warranty_years: Option<i32>,
    pub warranty_end_date: Option<NaiveDate>,
}

impl WarrantyTerms {
    /// Validate `warranty_years` and derive the end date
    pub fn derive(
        purchase_date: Option<NaiveDate>,
        warranty_years: Option<i32>,
    ) -> AppResult<Self> {
        let years = warranty_years
            .map(validate_warranty_years)
            .transpose()
            .map_err(|m| AppError::validation("warranty_years", m))?;

        Ok(Self {
            purchase_date,
            warranty_years,
            warranty_end_date: compute_warranty_end(purchase_date, years),
        })
    }
}

/// Stored columns of a product, read under a row lock
#[derive(Debug, FromRow)]
struct ProductRow {
    name: String,
    model_number: Option<String>,
    serial_number: Option<String>,
    description: Option<String>,
    category_id: Option<Uuid>,
    vendor_id: Option<Uuid>,
    current_department_id: Option<Uuid>,
    status_id: Option<Uuid>,
    purchase_date: Option<NaiveDate>,
    warranty_years: Option<i32>,
    quantity: i32,
    price: Decimal,
    lifecycle: Lifecycle,
}

fn check_stock(quantity: i32, price: Decimal) -> AppResult<()> {
    validate_quantity(quantity).map_err(|m| AppError::validation("quantity", m))?;
    validate_amount(price).map_err(|m| AppError::validation("price", m))?;
    Ok(())
}

const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.unique_code, p.name, p.model_number, p.serial_number, p.description,
           p.category_id, p.vendor_id, p.current_department_id, p.status_id,
           p.purchase_date, p.warranty_years, p.warranty_end_date, p.quantity, p.price,
           p.lifecycle, p.created_at, p.updated_at,
           v.name AS vendor_name, d.name AS department_name,
           c.name AS category_name, s.name AS status_name
    FROM products p
    LEFT JOIN vendors v ON v.id = p.vendor_id
    LEFT JOIN departments d ON d.id = p.current_department_id
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN statuses s ON s.id = p.status_id
"#;

impl ProductService {
    pub fn new(db: PgPool, codes: CodeGenerator) -> Self {
        Self { db, codes }
    }

    /// List products, newest first, with optional filters
    pub async fn list(&self, filter: &ProductFilter) -> AppResult<Vec<Product>> {
        let sql = format!(
            r#"{PRODUCT_SELECT}
            WHERE ($1::VARCHAR IS NULL OR p.lifecycle = $1)
              AND ($2::UUID IS NULL OR p.status_id = $2)
              AND ($3::UUID IS NULL OR p.category_id = $3)
              AND ($4::UUID IS NULL OR p.current_department_id = $4)
              AND ($5::UUID IS NULL OR p.vendor_id = $5)
              AND ($6::TEXT IS NULL OR p.name ILIKE $6 OR p.model_number ILIKE $6)
            ORDER BY p.created_at DESC
            "#
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(filter.lifecycle())
            .bind(filter.status_id)
            .bind(filter.category_id)
            .bind(filter.department_id)
            .bind(filter.vendor_id)
            .bind(filter.search_pattern())
            .fetch_all(&self.db)
            .await?;

        Ok(products)
    }

    /// Get a product by ID
    pub async fn get(&self, product_id: Uuid) -> AppResult<Product> {
        let sql = format!("{PRODUCT_SELECT} WHERE p.id = $1");

        sqlx::query_as::<_, Product>(&sql)
            .bind(product_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    /// Create a product, assigning its code and warranty end date
    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        validate_name(&input.name).map_err(|m| AppError::validation("name", m))?;
        let quantity = input.quantity.unwrap_or(0);
        let price = input.price.unwrap_or(Decimal::ZERO);
        check_stock(quantity, price)?;
        let warranty = WarrantyTerms::derive(input.purchase_date, input.warranty_years)?;

        let input = &input;
        let product_id = self
            .codes
            .assign(EntityKind::Product, &self.db, move |code| {
                self.insert(code, input, warranty, quantity, price)
            })
            .await?;

        let product = self.get(product_id).await?;
        tracing::info!(
            product_id = %product.id,
            code = %product.unique_code,
            warranty_end_date = ?product.warranty_end_date,
            "Product created"
        );
        Ok(product)
    }

    async fn insert(
        &self,
        code: String,
        input: &CreateProductInput,
        warranty: WarrantyTerms,
        quantity: i32,
        price: Decimal,
    ) -> AppResult<Option<Uuid>> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO products (
                unique_code, name, model_number, serial_number, description,
                category_id, vendor_id, current_department_id, status_id,
                purchase_date, warranty_years, warranty_end_date, quantity, price
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (unique_code) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&code)
        .bind(input.name.trim())
        .bind(&input.model_number)
        .bind(&input.serial_number)
        .bind(&input.description)
        .bind(input.category_id)
        .bind(input.vendor_id)
        .bind(input.current_department_id)
        .bind(input.status_id)
        .bind(warranty.purchase_date)
        .bind(warranty.warranty_years)
        .bind(warranty.warranty_end_date)
        .bind(quantity)
        .bind(price)
        .fetch_optional(&self.db)
        .await
        .map_err(AppError::reference_violation("products"))?;

        Ok(id)
    }

    /// Update a product. The warranty end date is recomputed from the
    /// resulting purchase date and warranty length, so clearing either
    /// clears it.
    ///
    /// The row is locked with `FOR UPDATE`, so fields the input leaves out
    /// keep the value a concurrent transfer or repair just propagated.
    pub async fn update(&self, product_id: Uuid, input: UpdateProductInput) -> AppResult<Product> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT name, model_number, serial_number, description,
                   category_id, vendor_id, current_department_id, status_id,
                   purchase_date, warranty_years, quantity, price, lifecycle
            FROM products
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let name = input.name.unwrap_or(existing.name);
        validate_name(&name).map_err(|m| AppError::validation("name", m))?;
        let quantity = input.quantity.unwrap_or(existing.quantity);
        let price = input.price.unwrap_or(existing.price);
        check_stock(quantity, price)?;
        let warranty = WarrantyTerms::derive(
            input.purchase_date.unwrap_or(existing.purchase_date),
            input.warranty_years.unwrap_or(existing.warranty_years),
        )?;

        sqlx::query(
            r#"
            UPDATE products
            SET name = $1, model_number = $2, serial_number = $3, description = $4,
                category_id = $5, vendor_id = $6, current_department_id = $7, status_id = $8,
                purchase_date = $9, warranty_years = $10, warranty_end_date = $11,
                quantity = $12, price = $13, lifecycle = $14, updated_at = NOW()
            WHERE id = $15
            "#,
        )
        .bind(name.trim())
        .bind(input.model_number.unwrap_or(existing.model_number))
        .bind(input.serial_number.unwrap_or(existing.serial_number))
        .bind(input.description.unwrap_or(existing.description))
        .bind(input.category_id.unwrap_or(existing.category_id))
        .bind(input.vendor_id.unwrap_or(existing.vendor_id))
        .bind(
            input
                .current_department_id
                .unwrap_or(existing.current_department_id),
        )
        .bind(input.status_id.unwrap_or(existing.status_id))
        .bind(warranty.purchase_date)
        .bind(warranty.warranty_years)
        .bind(warranty.warranty_end_date)
        .bind(quantity)
        .bind(price)
        .bind(input.lifecycle.unwrap_or(existing.lifecycle))
        .bind(product_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::reference_violation("products"))?;

        tx.commit().await?;

        self.get(product_id).await
    }

    /// Deactivate a product. Deactivated products drop out of listings and
    /// no longer accept transfers or repair propagation.
    pub async fn deactivate(&self, product_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE products SET lifecycle = 'deactivated', updated_at = NOW() WHERE id = $1",
        )
        .bind(product_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        tracing::info!(%product_id, "Product deactivated");
        Ok(())
    }
}
