//! Reporting service for the dashboard and data export

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Headline totals
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct DashboardSummary {
    pub total_products: i64,
    pub total_repairs: i64,
    pub total_transfers: i64,
    pub total_vendors: i64,
    pub total_departments: i64,
    pub total_categories: i64,
    /// Sum of price times quantity over active products
    pub total_product_value: Decimal,
    pub total_repair_cost: Decimal,
}

/// Count of records grouped under one related record. `id` and `name` are
/// null for the "unassigned" group.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct GroupCount {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub count: i64,
}

/// Dashboard metrics
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub summary: DashboardSummary,
    pub department_products: Vec<GroupCount>,
    pub product_status_counts: Vec<GroupCount>,
    pub product_category_counts: Vec<GroupCount>,
    pub product_vendor_counts: Vec<GroupCount>,
    pub repair_status_counts: Vec<GroupCount>,
}

/// Flat product row for CSV export
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ProductExportRow {
    pub unique_code: String,
    pub name: String,
    pub model_number: Option<String>,
    pub serial_number: Option<String>,
    pub category: Option<String>,
    pub vendor: Option<String>,
    pub department: Option<String>,
    pub status: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_years: Option<i32>,
    pub warranty_end_date: Option<NaiveDate>,
    pub quantity: i32,
    pub price: Decimal,
}

/// Related tables products are grouped by on the dashboard
#[derive(Debug, Clone, Copy)]
enum ProductGrouping {
    Department,
    Status,
    Category,
    Vendor,
}

impl ProductGrouping {
    fn join(self) -> (&'static str, &'static str) {
        match self {
            ProductGrouping::Department => ("departments", "current_department_id"),
            ProductGrouping::Status => ("statuses", "status_id"),
            ProductGrouping::Category => ("categories", "category_id"),
            ProductGrouping::Vendor => ("vendors", "vendor_id"),
        }
    }
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get dashboard metrics. Product figures cover active products only.
    pub async fn get_dashboard(&self) -> AppResult<Dashboard> {
        let summary = sqlx::query_as::<_, DashboardSummary>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM products WHERE lifecycle = 'active') AS total_products,
                (SELECT COUNT(*) FROM repair_logs) AS total_repairs,
                (SELECT COUNT(*) FROM transfer_logs) AS total_transfers,
                (SELECT COUNT(*) FROM vendors WHERE lifecycle = 'active') AS total_vendors,
                (SELECT COUNT(*) FROM departments WHERE lifecycle = 'active') AS total_departments,
                (SELECT COUNT(*) FROM categories WHERE lifecycle = 'active') AS total_categories,
                (SELECT COALESCE(SUM(price * quantity), 0)
                    FROM products WHERE lifecycle = 'active') AS total_product_value,
                (SELECT COALESCE(SUM(repair_cost), 0) FROM repair_logs) AS total_repair_cost
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let repair_status_counts = sqlx::query_as::<_, GroupCount>(
            r#"
            SELECT rs.id, rs.name, COUNT(r.id) AS count
            FROM repair_logs r
            LEFT JOIN repair_statuses rs ON rs.id = r.status_id
            GROUP BY rs.id, rs.name
            ORDER BY count DESC, rs.name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(Dashboard {
            summary,
            department_products: self.product_counts(ProductGrouping::Department).await?,
            product_status_counts: self.product_counts(ProductGrouping::Status).await?,
            product_category_counts: self.product_counts(ProductGrouping::Category).await?,
            product_vendor_counts: self.product_counts(ProductGrouping::Vendor).await?,
            repair_status_counts,
        })
    }

    async fn product_counts(&self, grouping: ProductGrouping) -> AppResult<Vec<GroupCount>> {
        let (table, column) = grouping.join();
        // Table and column come from a closed enum, never from input
        let sql = format!(
            r#"
            SELECT g.id, g.name, COUNT(p.id) AS count
            FROM products p
            LEFT JOIN {table} g ON g.id = p.{column}
            WHERE p.lifecycle = 'active'
            GROUP BY g.id, g.name
            ORDER BY count DESC, g.name
            "#
        );

        let counts = sqlx::query_as::<_, GroupCount>(&sql)
            .fetch_all(&self.db)
            .await?;

        Ok(counts)
    }

    /// Active products with related names, ordered by code
    pub async fn product_export_rows(&self) -> AppResult<Vec<ProductExportRow>> {
        let rows = sqlx::query_as::<_, ProductExportRow>(
            r#"
            SELECT p.unique_code, p.name, p.model_number, p.serial_number,
                   c.name AS category, v.name AS vendor, d.name AS department,
                   s.name AS status, p.purchase_date, p.warranty_years,
                   p.warranty_end_date, p.quantity, p.price
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            LEFT JOIN vendors v ON v.id = p.vendor_id
            LEFT JOIN departments d ON d.id = p.current_department_id
            LEFT JOIN statuses s ON s.id = p.status_id
            WHERE p.lifecycle = 'active'
            ORDER BY p.unique_code
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn row(code: &str, department: Option<&str>) -> ProductExportRow {
        ProductExportRow {
            unique_code: code.to_string(),
            name: "Laptop".to_string(),
            model_number: Some("X1".to_string()),
            serial_number: None,
            category: Some("IT".to_string()),
            vendor: None,
            department: department.map(str::to_string),
            status: Some("In use".to_string()),
            purchase_date: NaiveDate::from_ymd_opt(2024, 2, 29),
            warranty_years: Some(1),
            warranty_end_date: NaiveDate::from_ymd_opt(2025, 2, 28),
            quantity: 2,
            price: Decimal::from_str("1250.50").unwrap(),
        }
    }

    #[test]
    fn test_csv_export_writes_header_and_rows() {
        let csv = ReportingService::export_to_csv(&[
            row("PRD-02001", Some("Finance")),
            row("PRD-02002", None),
        ])
        .unwrap();

        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some(
                "unique_code,name,model_number,serial_number,category,vendor,department,\
                 status,purchase_date,warranty_years,warranty_end_date,quantity,price"
            )
        );
        assert_eq!(
            lines.next(),
            Some("PRD-02001,Laptop,X1,,IT,,Finance,In use,2024-02-29,1,2025-02-28,2,1250.50")
        );
        assert_eq!(
            lines.next(),
            Some("PRD-02002,Laptop,X1,,IT,,,In use,2024-02-29,1,2025-02-28,2,1250.50")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_export_empty() {
        let rows: Vec<ProductExportRow> = Vec::new();
        assert_eq!(ReportingService::export_to_csv(&rows).unwrap(), "");
    }

    #[test]
    fn test_product_groupings_use_product_columns() {
        assert_eq!(
            ProductGrouping::Department.join(),
            ("departments", "current_department_id")
        );
        assert_eq!(ProductGrouping::Vendor.join(), ("vendors", "vendor_id"));
    }
}
