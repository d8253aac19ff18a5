//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Entity kinds that carry a human-readable unique code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Vendor,
    Department,
    Status,
    Category,
    Product,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Vendor,
        EntityKind::Department,
        EntityKind::Status,
        EntityKind::Category,
        EntityKind::Product,
    ];

    /// Fixed code prefix for this kind
    pub fn prefix(&self) -> &'static str {
        match self {
            EntityKind::Vendor => "VND",
            EntityKind::Department => "DEPT",
            EntityKind::Status => "STAT",
            EntityKind::Category => "CAT",
            EntityKind::Product => "PRD",
        }
    }

    /// Backing table name
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Vendor => "vendors",
            EntityKind::Department => "departments",
            EntityKind::Status => "statuses",
            EntityKind::Category => "categories",
            EntityKind::Product => "products",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.prefix() == prefix)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Vendor => write!(f, "Vendor"),
            EntityKind::Department => write!(f, "Department"),
            EntityKind::Status => write!(f, "Status"),
            EntityKind::Category => write!(f, "Category"),
            EntityKind::Product => write!(f, "Product"),
        }
    }
}

/// Logical lifecycle of a record. Records are deactivated, never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "VARCHAR", rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    #[default]
    Active,
    Deactivated,
}

impl Lifecycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Active => "active",
            Lifecycle::Deactivated => "deactivated",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Lifecycle::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_unique() {
        let mut prefixes: Vec<_> = EntityKind::ALL.iter().map(|k| k.prefix()).collect();
        prefixes.sort();
        prefixes.dedup();
        assert_eq!(prefixes.len(), EntityKind::ALL.len());
    }

    #[test]
    fn prefix_round_trips_to_kind() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_prefix(kind.prefix()), Some(kind));
        }
        assert_eq!(EntityKind::from_prefix("XYZ"), None);
    }

    #[test]
    fn lifecycle_defaults_to_active() {
        assert_eq!(Lifecycle::default(), Lifecycle::Active);
        assert!(!Lifecycle::Deactivated.is_active());
        assert_eq!(
            serde_json::to_string(&Lifecycle::Deactivated).unwrap(),
            "\"deactivated\""
        );
    }
}
