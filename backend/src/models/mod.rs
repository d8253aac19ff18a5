//! Models for the Asset Inventory Platform
//!
//! Re-exports domain types from the shared crate and adds query types used
//! by the list endpoints.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

pub use shared::*;

/// Query parameters accepted by every list endpoint of a soft-deletable resource
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Include deactivated records
    #[serde(default)]
    pub include_inactive: bool,
}

impl ListQuery {
    /// Lifecycle filter for SQL: `None` means no filter
    pub fn lifecycle(&self) -> Option<Lifecycle> {
        if self.include_inactive {
            None
        } else {
            Some(Lifecycle::Active)
        }
    }
}

/// Product list filters
#[derive(Debug, Default, Deserialize)]
pub struct ProductFilter {
    #[serde(default)]
    pub include_inactive: bool,
    pub status_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    /// Case-insensitive match on name or model number
    pub search: Option<String>,
}

impl ProductFilter {
    pub fn lifecycle(&self) -> Option<Lifecycle> {
        ListQuery {
            include_inactive: self.include_inactive,
        }
        .lifecycle()
    }

    /// `search` as an ILIKE pattern, ignoring blank input
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                let escaped = s
                    .replace('\\', "\\\\")
                    .replace('%', "\\%")
                    .replace('_', "\\_");
                format!("%{}%", escaped)
            })
    }
}

/// Deserialize a field that distinguishes "absent" from "null".
///
/// Use with `#[serde(default, deserialize_with = "nullable")]` on an
/// `Option<Option<T>>`: a missing key stays `None` (keep the stored value),
/// an explicit `null` becomes `Some(None)` (clear it).
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
