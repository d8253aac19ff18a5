//! Warranty end date derivation

use chrono::{Months, NaiveDate};

/// Longest warranty accepted from clients, in years
pub const MAX_WARRANTY_YEARS: u32 = 100;

/// Advance `purchase_date` by `warranty_years` calendar years.
///
/// The day of month is kept where it exists and clamped to the last day of
/// the month otherwise, so 2024-02-29 plus one year is 2025-02-28. Returns
/// `None` when either input is missing.
pub fn compute_warranty_end(
    purchase_date: Option<NaiveDate>,
    warranty_years: Option<u32>,
) -> Option<NaiveDate> {
    let purchase_date = purchase_date?;
    let months = warranty_years?.checked_mul(12)?;
    purchase_date.checked_add_months(Months::new(months))
}

/// Whether a warranty is still running on `today`. The end date itself is covered.
pub fn is_under_warranty(warranty_end_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    warranty_end_date.is_some_and(|end| today <= end)
}
