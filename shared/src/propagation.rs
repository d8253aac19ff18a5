//! Cross-entity propagation rules
//!
//! Creating a transfer moves the product to the destination department.
//! Updating a repair log reasserts the product status mapped from the
//! repair status. The rules here decide *what* changes; the backend applies
//! them to the stored product inside the trigger's transaction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A change to apply to a product as a consequence of another write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum ProductEffect {
    MoveToDepartment { product_id: Uuid, department_id: Uuid },
    SetStatus { product_id: Uuid, status_id: Uuid },
}

impl ProductEffect {
    pub fn product_id(&self) -> Uuid {
        match self {
            ProductEffect::MoveToDepartment { product_id, .. }
            | ProductEffect::SetStatus { product_id, .. } => *product_id,
        }
    }
}

/// The product fields propagation is allowed to touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductPlacement {
    pub current_department_id: Option<Uuid>,
    pub status_id: Option<Uuid>,
}

impl ProductPlacement {
    pub fn apply(&mut self, effect: &ProductEffect) {
        match *effect {
            ProductEffect::MoveToDepartment { department_id, .. } => {
                self.current_department_id = Some(department_id);
            }
            ProductEffect::SetStatus { status_id, .. } => {
                self.status_id = Some(status_id);
            }
        }
    }
}

/// Effect of a newly created transfer. A transfer without a product or a
/// destination stands alone.
pub fn transfer_effect(
    product_id: Option<Uuid>,
    to_department_id: Option<Uuid>,
) -> Option<ProductEffect> {
    Some(ProductEffect::MoveToDepartment {
        product_id: product_id?,
        department_id: to_department_id?,
    })
}

/// Effect of an updated repair log, given the `product_status` mapped from
/// its repair status. An unmapped repair status leaves the product alone.
pub fn repair_effect(
    product_id: Option<Uuid>,
    mapped_product_status_id: Option<Uuid>,
) -> Option<ProductEffect> {
    Some(ProductEffect::SetStatus {
        product_id: product_id?,
        status_id: mapped_product_status_id?,
    })
}
