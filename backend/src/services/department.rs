//! Department management service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{nullable, validate_name, EntityKind, Lifecycle, ListQuery};
use crate::services::CodeGenerator;

/// Department service
#[derive(Clone)]
pub struct DepartmentService {
    db: PgPool,
    codes: CodeGenerator,
}

/// Department record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Department {
    pub id: Uuid,
    pub unique_code: String,
    pub name: String,
    pub location: Option<String>,
    pub responsible_person: Option<String>,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a department
#[derive(Debug, Deserialize)]
pub struct CreateDepartmentInput {
    pub name: String,
    pub location: Option<String>,
    pub responsible_person: Option<String>,
}

/// Input for updating a department
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDepartmentInput {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub responsible_person: Option<Option<String>>,
    pub lifecycle: Option<Lifecycle>,
}

impl DepartmentService {
    pub fn new(db: PgPool, codes: CodeGenerator) -> Self {
        Self { db, codes }
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<Vec<Department>> {
        let departments = sqlx::query_as::<_, Department>(
            r#"
            SELECT id, unique_code, name, location, responsible_person, lifecycle,
                   created_at, updated_at
            FROM departments
            WHERE ($1::VARCHAR IS NULL OR lifecycle = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(query.lifecycle())
        .fetch_all(&self.db)
        .await?;

        Ok(departments)
    }

    pub async fn get(&self, department_id: Uuid) -> AppResult<Department> {
        sqlx::query_as::<_, Department>(
            r#"
            SELECT id, unique_code, name, location, responsible_person, lifecycle,
                   created_at, updated_at
            FROM departments
            WHERE id = $1
            "#,
        )
        .bind(department_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Department".to_string()))
    }

    pub async fn create(&self, input: CreateDepartmentInput) -> AppResult<Department> {
        validate_name(&input.name).map_err(|m| AppError::validation("name", m))?;

        let input = &input;
        let department = self
            .codes
            .assign(EntityKind::Department, &self.db, move |code| {
                self.insert(code, input)
            })
            .await?;

        tracing::info!(
            department_id = %department.id,
            code = %department.unique_code,
            "Department created"
        );
        Ok(department)
    }

    async fn insert(
        &self,
        code: String,
        input: &CreateDepartmentInput,
    ) -> AppResult<Option<Department>> {
        let department = sqlx::query_as::<_, Department>(
            r#"
            INSERT INTO departments (unique_code, name, location, responsible_person)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (unique_code) DO NOTHING
            RETURNING id, unique_code, name, location, responsible_person, lifecycle,
                      created_at, updated_at
            "#,
        )
        .bind(&code)
        .bind(input.name.trim())
        .bind(&input.location)
        .bind(&input.responsible_person)
        .fetch_optional(&self.db)
        .await?;

        Ok(department)
    }

    pub async fn update(
        &self,
        department_id: Uuid,
        input: UpdateDepartmentInput,
    ) -> AppResult<Department> {
        let existing = self.get(department_id).await?;

        let name = input.name.unwrap_or(existing.name);
        validate_name(&name).map_err(|m| AppError::validation("name", m))?;
        let location = input.location.unwrap_or(existing.location);
        let responsible_person = input
            .responsible_person
            .unwrap_or(existing.responsible_person);
        let lifecycle = input.lifecycle.unwrap_or(existing.lifecycle);

        let department = sqlx::query_as::<_, Department>(
            r#"
            UPDATE departments
            SET name = $1, location = $2, responsible_person = $3, lifecycle = $4,
                updated_at = NOW()
            WHERE id = $5
            RETURNING id, unique_code, name, location, responsible_person, lifecycle,
                      created_at, updated_at
            "#,
        )
        .bind(name.trim())
        .bind(&location)
        .bind(&responsible_person)
        .bind(lifecycle)
        .bind(department_id)
        .fetch_one(&self.db)
        .await?;

        Ok(department)
    }

    pub async fn deactivate(&self, department_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE departments SET lifecycle = 'deactivated', updated_at = NOW() WHERE id = $1",
        )
        .bind(department_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Department".to_string()));
        }

        tracing::info!(%department_id, "Department deactivated");
        Ok(())
    }
}
