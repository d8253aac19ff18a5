//! Validation utilities for the Asset Inventory Platform
//!
//! Validators return a static message; callers attach the offending field.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::warranty::MAX_WARRANTY_YEARS;

// ============================================================================
// Product Validations
// ============================================================================

/// Validate warranty duration and convert it to an unsigned year count
pub fn validate_warranty_years(years: i32) -> Result<u32, &'static str> {
    if years < 0 {
        return Err("Warranty years cannot be negative");
    }
    let years = years as u32;
    if years > MAX_WARRANTY_YEARS {
        return Err("Warranty years must be at most 100");
    }
    Ok(years)
}

/// Validate stock quantity
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity < 0 {
        return Err("Quantity cannot be negative");
    }
    Ok(())
}

/// Validate a monetary amount (price, repair cost)
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    Ok(())
}

// ============================================================================
// Repair Validations
// ============================================================================

/// A repair cannot come back before it was sent
pub fn validate_repair_dates(
    sent_date: NaiveDate,
    received_date: Option<NaiveDate>,
) -> Result<(), &'static str> {
    match received_date {
        Some(received) if received < sent_date => {
            Err("Received date cannot be earlier than sent date")
        }
        _ => Ok(()),
    }
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate a required display name
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name is required");
    }
    if trimmed.chars().count() > 200 {
        return Err("Name must be at most 200 characters");
    }
    Ok(())
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Build a URL slug from a display name: lowercase alphanumerics
/// separated by single hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_warranty_years() {
        assert_eq!(validate_warranty_years(0), Ok(0));
        assert_eq!(validate_warranty_years(3), Ok(3));
        assert!(validate_warranty_years(-1).is_err());
        assert!(validate_warranty_years(101).is_err());
    }

    #[test]
    fn test_amounts() {
        assert!(validate_amount(Decimal::ZERO).is_ok());
        assert!(validate_amount(Decimal::new(1999, 2)).is_ok());
        assert!(validate_amount(Decimal::new(-1, 2)).is_err());
        assert!(validate_quantity(-5).is_err());
    }

    #[test]
    fn test_repair_dates() {
        assert!(validate_repair_dates(date(2024, 3, 1), None).is_ok());
        assert!(validate_repair_dates(date(2024, 3, 1), Some(date(2024, 3, 1))).is_ok());
        assert!(validate_repair_dates(date(2024, 3, 1), Some(date(2024, 2, 28))).is_err());
    }

    #[test]
    fn test_name() {
        assert!(validate_name("Laptop").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("it@example.com").is_ok());
        assert!(validate_email("nope").is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Office Furniture"), "office-furniture");
        assert_eq!(slugify("  IT -- Hardware & Network "), "it-hardware-network");
        assert_eq!(slugify("Printers"), "printers");
        assert_eq!(slugify("!!!"), "");
    }
}
