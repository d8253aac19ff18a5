//! Query model tests
//!
//! List filters, lifecycle defaults and partial update inputs.

use asset_inventory::models::{Lifecycle, ListQuery, ProductFilter};
use asset_inventory::services::repair::UpdateRepairInput;
use asset_inventory::services::repair_status::UpdateRepairStatusInput;
use uuid::Uuid;

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_lists_default_to_active() {
        let query: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.lifecycle(), Some(Lifecycle::Active));

        let query: ListQuery = serde_json::from_str(r#"{"include_inactive": true}"#).unwrap();
        assert_eq!(query.lifecycle(), None);
    }

    #[test]
    fn test_product_filter_lifecycle() {
        let filter = ProductFilter::default();
        assert_eq!(filter.lifecycle(), Some(Lifecycle::Active));

        let filter = ProductFilter {
            include_inactive: true,
            ..Default::default()
        };
        assert_eq!(filter.lifecycle(), None);
    }

    #[test]
    fn test_search_pattern_trims_and_wraps() {
        let filter = ProductFilter {
            search: Some("  thinkpad ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.search_pattern().as_deref(), Some("%thinkpad%"));
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        let filter = ProductFilter {
            search: Some("50%_off\\".to_string()),
            ..Default::default()
        };
        assert_eq!(
            filter.search_pattern().as_deref(),
            Some("%50\\%\\_off\\\\%")
        );
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let filter = ProductFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.search_pattern(), None);
    }

    #[test]
    fn test_repair_update_can_clear_status() {
        let input: UpdateRepairInput = serde_json::from_str(r#"{"status_id": null}"#).unwrap();
        assert_eq!(input.status_id, Some(None));
        assert_eq!(input.received_date, None);

        let id = Uuid::new_v4();
        let input: UpdateRepairInput =
            serde_json::from_str(&format!(r#"{{"status_id": "{}"}}"#, id)).unwrap();
        assert_eq!(input.status_id, Some(Some(id)));
    }

    #[test]
    fn test_repair_status_update_lifecycle() {
        let input: UpdateRepairStatusInput =
            serde_json::from_str(r#"{"lifecycle": "active", "product_status_id": null}"#).unwrap();
        assert_eq!(input.lifecycle, Some(Lifecycle::Active));
        assert_eq!(input.product_status_id, Some(None));
    }
}
