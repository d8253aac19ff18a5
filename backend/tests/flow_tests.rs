//! Transfer, repair and product update flows against PostgreSQL
//!
//! Each test gets a fresh database with `migrations/` applied, created from
//! `DATABASE_URL`.

use asset_inventory::error::AppError;
use asset_inventory::models::Lifecycle;
use asset_inventory::services::category::CreateCategoryInput;
use asset_inventory::services::department::CreateDepartmentInput;
use asset_inventory::services::product::{CreateProductInput, Product, UpdateProductInput};
use asset_inventory::services::repair::{CreateRepairInput, UpdateRepairInput};
use asset_inventory::services::repair_status::CreateRepairStatusInput;
use asset_inventory::services::status::CreateStatusInput;
use asset_inventory::services::transfer::CreateTransferInput;
use asset_inventory::services::{
    CategoryService, CodeGenerator, DepartmentService, ProductService, RepairService,
    RepairStatusService, StatusPropagator, StatusService, TransferService,
};
use chrono::NaiveDate;
use shared::ProductEffect;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

async fn department(pool: &PgPool, name: &str) -> Uuid {
    DepartmentService::new(pool.clone(), CodeGenerator::default())
        .create(CreateDepartmentInput {
            name: name.to_string(),
            location: None,
            responsible_person: None,
        })
        .await
        .unwrap()
        .id
}

async fn status(pool: &PgPool, name: &str) -> Uuid {
    StatusService::new(pool.clone(), CodeGenerator::default())
        .create(CreateStatusInput {
            name: name.to_string(),
        })
        .await
        .unwrap()
        .id
}

async fn repair_status(pool: &PgPool, name: &str, product_status_id: Option<Uuid>) -> Uuid {
    RepairStatusService::new(pool.clone())
        .create(CreateRepairStatusInput {
            name: name.to_string(),
            product_status_id,
            is_final: false,
        })
        .await
        .unwrap()
        .id
}

async fn product(pool: &PgPool, department_id: Uuid, status_id: Option<Uuid>) -> Product {
    products(pool)
        .create(CreateProductInput {
            name: "Laptop".to_string(),
            model_number: None,
            serial_number: Some("SN-001".to_string()),
            description: None,
            category_id: None,
            vendor_id: None,
            current_department_id: Some(department_id),
            status_id,
            purchase_date: NaiveDate::from_ymd_opt(2024, 1, 31),
            warranty_years: Some(1),
            quantity: Some(1),
            price: None,
        })
        .await
        .unwrap()
}

fn products(pool: &PgPool) -> ProductService {
    ProductService::new(pool.clone(), CodeGenerator::default())
}

fn transfer(product_id: Uuid, to_department_id: Option<Uuid>) -> CreateTransferInput {
    CreateTransferInput {
        product_id: Some(product_id),
        from_department_id: None,
        to_department_id,
        transfer_date: NaiveDate::from_ymd_opt(2024, 6, 1),
        note: None,
    }
}

fn repair(product_id: Uuid, status_id: Option<Uuid>) -> CreateRepairInput {
    CreateRepairInput {
        product_id,
        fault_description: "Screen flickers".to_string(),
        repair_vendor_id: None,
        sent_date: NaiveDate::from_ymd_opt(2024, 6, 1),
        received_date: None,
        repair_cost: None,
        status_id,
    }
}

fn set_repair_status(status_id: Option<Uuid>) -> UpdateRepairInput {
    UpdateRepairInput {
        status_id: Some(status_id),
        ..Default::default()
    }
}

// ============================================================================
// Transfer Tests
// ============================================================================

#[cfg(test)]
mod transfer_tests {
    use super::*;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_transfer_moves_product(pool: PgPool) {
        let warehouse = department(&pool, "Warehouse").await;
        let office = department(&pool, "Office").await;
        let laptop = product(&pool, warehouse, None).await;

        let log = TransferService::new(pool.clone())
            .create(transfer(laptop.id, Some(office)))
            .await
            .unwrap();

        assert_eq!(log.from_department_id, Some(warehouse));
        assert_eq!(log.to_department_id, Some(office));

        let moved = products(&pool).get(laptop.id).await.unwrap();
        assert_eq!(moved.current_department_id, Some(office));
        assert_eq!(moved.department_name.as_deref(), Some("Office"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_transfer_without_destination_keeps_department(pool: PgPool) {
        let warehouse = department(&pool, "Warehouse").await;
        let laptop = product(&pool, warehouse, None).await;

        let log = TransferService::new(pool.clone())
            .create(transfer(laptop.id, None))
            .await
            .unwrap();

        assert_eq!(log.to_department_id, None);
        let unchanged = products(&pool).get(laptop.id).await.unwrap();
        assert_eq!(unchanged.current_department_id, Some(warehouse));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_transfer_of_deactivated_product_is_rolled_back(pool: PgPool) {
        let warehouse = department(&pool, "Warehouse").await;
        let office = department(&pool, "Office").await;
        let laptop = product(&pool, warehouse, None).await;
        products(&pool).deactivate(laptop.id).await.unwrap();

        let transfers = TransferService::new(pool.clone());
        let result = transfers.create(transfer(laptop.id, Some(office))).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(transfers.list(Some(laptop.id)).await.unwrap().is_empty());
    }
}

// ============================================================================
// Repair Tests
// ============================================================================

#[cfg(test)]
mod repair_tests {
    use super::*;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_repair_update_sets_mapped_status(pool: PgPool) {
        let warehouse = department(&pool, "Warehouse").await;
        let in_use = status(&pool, "In use").await;
        let broken = status(&pool, "Broken").await;
        let sent = repair_status(&pool, "Sent to vendor", Some(broken)).await;
        let laptop = product(&pool, warehouse, Some(in_use)).await;

        let repairs = RepairService::new(pool.clone());
        let log = repairs.create(repair(laptop.id, None)).await.unwrap();

        // Creating a repair never touches the product
        let before = products(&pool).get(laptop.id).await.unwrap();
        assert_eq!(before.status_id, Some(in_use));

        repairs
            .update(log.id, set_repair_status(Some(sent)))
            .await
            .unwrap();
        let after = products(&pool).get(laptop.id).await.unwrap();
        assert_eq!(after.status_id, Some(broken));

        // Repeating the update leaves the product where it is
        repairs
            .update(log.id, set_repair_status(Some(sent)))
            .await
            .unwrap();
        let again = products(&pool).get(laptop.id).await.unwrap();
        assert_eq!(again.status_id, Some(broken));
        assert_eq!(again.current_department_id, Some(warehouse));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unmapped_repair_status_keeps_product_status(pool: PgPool) {
        let warehouse = department(&pool, "Warehouse").await;
        let in_use = status(&pool, "In use").await;
        let diagnosing = repair_status(&pool, "Diagnosing", None).await;
        let laptop = product(&pool, warehouse, Some(in_use)).await;

        let repairs = RepairService::new(pool.clone());
        let log = repairs.create(repair(laptop.id, None)).await.unwrap();
        let updated = repairs
            .update(log.id, set_repair_status(Some(diagnosing)))
            .await
            .unwrap();

        assert_eq!(updated.status_id, Some(diagnosing));
        let unchanged = products(&pool).get(laptop.id).await.unwrap();
        assert_eq!(unchanged.status_id, Some(in_use));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_mapped_update_of_deactivated_product_fails(pool: PgPool) {
        let warehouse = department(&pool, "Warehouse").await;
        let broken = status(&pool, "Broken").await;
        let sent = repair_status(&pool, "Sent to vendor", Some(broken)).await;
        let laptop = product(&pool, warehouse, None).await;

        let repairs = RepairService::new(pool.clone());
        let log = repairs.create(repair(laptop.id, None)).await.unwrap();
        products(&pool).deactivate(laptop.id).await.unwrap();

        let result = repairs.update(log.id, set_repair_status(Some(sent))).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let kept = repairs.get(log.id).await.unwrap();
        assert_eq!(kept.status_id, None);
        assert!(repairs.movements(log.id).await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_status_changes_are_recorded_as_movements(pool: PgPool) {
        let warehouse = department(&pool, "Warehouse").await;
        let received = repair_status(&pool, "Received", None).await;
        let fixed = repair_status(&pool, "Fixed", None).await;
        let laptop = product(&pool, warehouse, None).await;

        let repairs = RepairService::new(pool.clone());
        let log = repairs
            .create(repair(laptop.id, Some(received)))
            .await
            .unwrap();
        repairs
            .update(log.id, set_repair_status(Some(fixed)))
            .await
            .unwrap();
        // Same status again: no new movement
        repairs
            .update(log.id, set_repair_status(Some(fixed)))
            .await
            .unwrap();

        let movements = repairs.movements(log.id).await.unwrap();
        assert_eq!(movements.len(), 2);
        let statuses: Vec<_> = movements.iter().map(|m| m.status_id).collect();
        assert!(statuses.contains(&Some(received)));
        assert!(statuses.contains(&Some(fixed)));
        assert!(movements
            .iter()
            .all(|m| m.from_department_id == Some(warehouse) && m.product_id == laptop.id));
    }
}

// ============================================================================
// Product Update Tests
// ============================================================================

#[cfg(test)]
mod product_update_tests {
    use super::*;

    /// A rename that waits on a propagation keeps the propagated department
    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_waits_for_concurrent_transfer(pool: PgPool) {
        let warehouse = department(&pool, "Warehouse").await;
        let office = department(&pool, "Office").await;
        let laptop = product(&pool, warehouse, None).await;

        let mut tx = pool.begin().await.unwrap();
        StatusPropagator
            .apply(
                &mut *tx,
                ProductEffect::MoveToDepartment {
                    product_id: laptop.id,
                    department_id: office,
                },
            )
            .await
            .unwrap();

        let service = products(&pool);
        let rename = tokio::spawn(async move {
            service
                .update(
                    laptop.id,
                    UpdateProductInput {
                        name: Some("Laptop 2".to_string()),
                        ..Default::default()
                    },
                )
                .await
        });

        // Let the update reach the row lock before the move commits
        tokio::time::sleep(Duration::from_millis(200)).await;
        tx.commit().await.unwrap();

        let renamed = rename.await.unwrap().unwrap();
        assert_eq!(renamed.name, "Laptop 2");
        assert_eq!(renamed.current_department_id, Some(office));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_partial_update_keeps_other_fields(pool: PgPool) {
        let warehouse = department(&pool, "Warehouse").await;
        let laptop = product(&pool, warehouse, None).await;

        let updated = products(&pool)
            .update(
                laptop.id,
                UpdateProductInput {
                    warranty_years: Some(Some(2)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Laptop");
        assert_eq!(updated.serial_number.as_deref(), Some("SN-001"));
        assert_eq!(updated.current_department_id, Some(warehouse));
        assert_eq!(updated.warranty_end_date, NaiveDate::from_ymd_opt(2026, 1, 31));
        assert_eq!(updated.unique_code, laptop.unique_code);
        assert_eq!(updated.lifecycle, Lifecycle::Active);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_of_missing_product(pool: PgPool) {
        let result = products(&pool)
            .update(Uuid::new_v4(), UpdateProductInput::default())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}

// ============================================================================
// Category Tests
// ============================================================================

#[cfg(test)]
mod category_tests {
    use super::*;

    fn category(name: &str) -> CreateCategoryInput {
        CreateCategoryInput {
            name: name.to_string(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_colliding_slug_names_slug_field(pool: PgPool) {
        let categories = CategoryService::new(pool.clone(), CodeGenerator::default());
        categories.create(category("Office Gear")).await.unwrap();

        let result = categories.create(category("office gear")).await;
        assert!(matches!(result, Err(AppError::DuplicateEntry(ref f)) if f == "slug"));

        let result = categories.create(category("Office Gear")).await;
        assert!(matches!(result, Err(AppError::DuplicateEntry(ref f)) if f == "name"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_rename_onto_existing_slug(pool: PgPool) {
        let categories = CategoryService::new(pool.clone(), CodeGenerator::default());
        categories.create(category("Office Gear")).await.unwrap();
        let tools = categories.create(category("Tools")).await.unwrap();

        let result = categories
            .update(
                tools.id,
                asset_inventory::services::category::UpdateCategoryInput {
                    name: Some("OFFICE GEAR".to_string()),
                    lifecycle: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::DuplicateEntry(ref f)) if f == "slug"));
    }
}
