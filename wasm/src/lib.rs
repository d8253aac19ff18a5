//! WebAssembly module for the Asset Inventory Platform
//!
//! Provides client-side computation for:
//! - Warranty end date previews
//! - Unique code checks
//! - Category slugs
//! - Offline product form validation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::codes::*;
pub use shared::types::*;
pub use shared::validation::*;
pub use shared::warranty::*;

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date {}: {}", value, e))
}

fn warranty_end(purchase_date: &str, warranty_years: i32) -> Result<Option<String>, String> {
    if purchase_date.trim().is_empty() {
        return Ok(None);
    }
    let purchase = parse_date(purchase_date)?;
    let years = validate_warranty_years(warranty_years).map_err(str::to_string)?;
    Ok(compute_warranty_end(Some(purchase), Some(years)).map(|d| d.to_string()))
}

/// Preview the warranty end date (`YYYY-MM-DD`) the server will store.
/// An empty purchase date yields no end date.
#[wasm_bindgen]
pub fn preview_warranty_end(
    purchase_date: &str,
    warranty_years: i32,
) -> Result<Option<String>, JsValue> {
    warranty_end(purchase_date, warranty_years).map_err(|e| JsValue::from_str(&e))
}

/// Whether a product is still covered on `today`
#[wasm_bindgen]
pub fn is_covered(warranty_end_date: &str, today: &str) -> Result<bool, JsValue> {
    let today = parse_date(today).map_err(|e| JsValue::from_str(&e))?;
    let end = match warranty_end_date.trim() {
        "" => None,
        value => Some(parse_date(value).map_err(|e| JsValue::from_str(&e))?),
    };
    Ok(is_under_warranty(end, today))
}

/// Check that `code` is a well-formed unique code for any entity kind
#[wasm_bindgen]
pub fn is_valid_unique_code(code: &str) -> bool {
    UniqueCode::parse(code).is_ok()
}

/// Entity prefix of a well-formed code, e.g. `PRD` for `PRD-03042`
#[wasm_bindgen]
pub fn code_prefix(code: &str) -> Option<String> {
    UniqueCode::parse(code)
        .ok()
        .map(|c| c.kind.prefix().to_string())
}

/// Slug the server will derive for a category name
#[wasm_bindgen]
pub fn category_slug(name: &str) -> String {
    slugify(name)
}

/// Product form fields checked before submission
#[derive(Debug, Default, Deserialize)]
struct ProductForm {
    #[serde(default)]
    name: String,
    quantity: Option<i32>,
    warranty_years: Option<i32>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct FieldError {
    field: &'static str,
    message: &'static str,
}

fn product_form_errors(form: &ProductForm) -> Vec<FieldError> {
    let checks = [
        ("name", validate_name(&form.name)),
        ("quantity", form.quantity.map_or(Ok(()), validate_quantity)),
        (
            "warranty_years",
            form.warranty_years
                .map_or(Ok(()), |y| validate_warranty_years(y).map(|_| ())),
        ),
    ];

    checks
        .into_iter()
        .filter_map(|(field, result)| result.err().map(|message| FieldError { field, message }))
        .collect()
}

/// Validate a product form given as JSON. Returns a JSON array of
/// `{field, message}` objects, empty when the form is valid.
#[wasm_bindgen]
pub fn validate_product_form(form_json: &str) -> Result<String, JsValue> {
    let form: ProductForm = serde_json::from_str(form_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid product JSON: {}", e)))?;

    serde_json::to_string(&product_form_errors(&form))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warranty_preview() {
        assert_eq!(warranty_end("2024-01-31", 1), Ok(Some("2025-01-31".to_string())));
        assert_eq!(warranty_end("2024-02-29", 1), Ok(Some("2025-02-28".to_string())));
        assert_eq!(warranty_end("", 3), Ok(None));
        assert!(warranty_end("2024-02-30", 1).is_err());
        assert!(warranty_end("2024-01-01", -1).is_err());
    }

    #[test]
    fn test_unique_code_checks() {
        assert!(is_valid_unique_code("VND-01000"));
        assert!(is_valid_unique_code("DEPT-12999"));
        assert!(!is_valid_unique_code("PRD-13000"));
        assert!(!is_valid_unique_code("XYZ-01001"));
        assert_eq!(code_prefix("CAT-07123"), Some("CAT".to_string()));
        assert_eq!(code_prefix("CAT07123"), None);
    }

    #[test]
    fn test_category_slug() {
        assert_eq!(category_slug("Office Equipment"), "office-equipment");
    }

    #[test]
    fn test_product_form_errors() {
        let form: ProductForm =
            serde_json::from_str(r#"{"name": " ", "quantity": -1, "warranty_years": 2}"#).unwrap();
        let fields: Vec<_> = product_form_errors(&form).iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "quantity"]);

        let form: ProductForm = serde_json::from_str(r#"{"name": "Printer"}"#).unwrap();
        assert!(product_form_errors(&form).is_empty());
    }
}
