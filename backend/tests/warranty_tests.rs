//! Warranty derivation tests
//!
//! Covers the validated warranty terms stored on every product save.

use asset_inventory::error::AppError;
use asset_inventory::services::product::{UpdateProductInput, WarrantyTerms};
use chrono::NaiveDate;
use proptest::prelude::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_one_year_keeps_day_of_month() {
        let terms = WarrantyTerms::derive(Some(date(2024, 1, 31)), Some(1)).unwrap();
        assert_eq!(terms.warranty_end_date, Some(date(2025, 1, 31)));
    }

    #[test]
    fn test_leap_day_clamps_to_february_28() {
        let terms = WarrantyTerms::derive(Some(date(2024, 2, 29)), Some(1)).unwrap();
        assert_eq!(terms.warranty_end_date, Some(date(2025, 2, 28)));

        // Four years later February has a 29th again
        let terms = WarrantyTerms::derive(Some(date(2024, 2, 29)), Some(4)).unwrap();
        assert_eq!(terms.warranty_end_date, Some(date(2028, 2, 29)));
    }

    #[test]
    fn test_zero_years_ends_on_purchase_date() {
        let terms = WarrantyTerms::derive(Some(date(2023, 6, 15)), Some(0)).unwrap();
        assert_eq!(terms.warranty_end_date, Some(date(2023, 6, 15)));
    }

    #[test]
    fn test_missing_input_clears_end_date() {
        let terms = WarrantyTerms::derive(None, Some(2)).unwrap();
        assert_eq!(terms.warranty_end_date, None);
        assert_eq!(terms.warranty_years, Some(2));

        let terms = WarrantyTerms::derive(Some(date(2023, 6, 15)), None).unwrap();
        assert_eq!(terms.warranty_end_date, None);
        assert_eq!(terms.purchase_date, Some(date(2023, 6, 15)));
    }

    #[test]
    fn test_negative_years_rejected_on_field() {
        let err = WarrantyTerms::derive(Some(date(2024, 1, 1)), Some(-1)).unwrap_err();
        match err {
            AppError::Validation { field, .. } => assert_eq!(field, "warranty_years"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_years_rejected_without_purchase_date() {
        assert!(matches!(
            WarrantyTerms::derive(None, Some(-3)),
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn test_update_input_distinguishes_null_from_absent() {
        let input: UpdateProductInput =
            serde_json::from_str(r#"{"purchase_date": null, "name": "Desk"}"#).unwrap();
        assert_eq!(input.purchase_date, Some(None));
        assert_eq!(input.warranty_years, None);
        assert_eq!(input.name.as_deref(), Some("Desk"));

        let input: UpdateProductInput =
            serde_json::from_str(r#"{"warranty_years": 3, "purchase_date": "2024-02-29"}"#)
                .unwrap();
        assert_eq!(input.warranty_years, Some(Some(3)));
        assert_eq!(input.purchase_date, Some(Some(date(2024, 2, 29))));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn purchase_strategy() -> impl Strategy<Value = Option<NaiveDate>> {
        prop::option::of((1990i32..2060, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| date(y, m, d)))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// The end date is null exactly when an input is null
        #[test]
        fn prop_end_date_null_iff_input_null(
            purchase in purchase_strategy(),
            years in prop::option::of(0i32..=100)
        ) {
            let terms = WarrantyTerms::derive(purchase, years).unwrap();
            prop_assert_eq!(
                terms.warranty_end_date.is_none(),
                purchase.is_none() || years.is_none()
            );
        }

        /// The end date never precedes the purchase date
        #[test]
        fn prop_end_date_not_before_purchase(
            purchase in purchase_strategy(),
            years in 0i32..=100
        ) {
            let terms = WarrantyTerms::derive(purchase, Some(years)).unwrap();
            if let (Some(start), Some(end)) = (purchase, terms.warranty_end_date) {
                prop_assert!(end >= start);
            }
        }

        /// Any negative length is a validation error
        #[test]
        fn prop_negative_years_rejected(
            purchase in purchase_strategy(),
            years in i32::MIN..0
        ) {
            prop_assert!(WarrantyTerms::derive(purchase, Some(years)).is_err());
        }
    }
}
