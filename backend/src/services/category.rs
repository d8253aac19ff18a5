//! Category management service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{slugify, validate_name, EntityKind, Lifecycle, ListQuery};
use crate::services::CodeGenerator;

/// Category service
#[derive(Clone)]
pub struct CategoryService {
    db: PgPool,
    codes: CodeGenerator,
}

/// Category record. `slug` is derived from `name` and read-only.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub unique_code: String,
    pub name: String,
    pub slug: String,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a category
#[derive(Debug, Deserialize)]
pub struct CreateCategoryInput {
    pub name: String,
}

/// Input for updating a category
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    pub lifecycle: Option<Lifecycle>,
}

/// Two names can differ yet share a slug; report whichever unique
/// constraint was hit
fn name_or_slug_violation(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err)
            if db_err.is_unique_violation()
                && db_err.constraint() == Some("categories_slug_key") =>
        {
            AppError::DuplicateEntry("slug".to_string())
        }
        _ => AppError::unique_violation("name")(err),
    }
}

fn category_slug(name: &str) -> AppResult<String> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(AppError::validation(
            "name",
            "Name must contain at least one letter or digit",
        ));
    }
    Ok(slug)
}

impl CategoryService {
    pub fn new(db: PgPool, codes: CodeGenerator) -> Self {
        Self { db, codes }
    }

    /// List categories ordered by name
    pub async fn list(&self, query: &ListQuery) -> AppResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, unique_code, name, slug, lifecycle, created_at, updated_at
            FROM categories
            WHERE ($1::VARCHAR IS NULL OR lifecycle = $1)
            ORDER BY name
            "#,
        )
        .bind(query.lifecycle())
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }

    pub async fn get(&self, category_id: Uuid) -> AppResult<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, unique_code, name, slug, lifecycle, created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(category_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))
    }

    pub async fn create(&self, input: CreateCategoryInput) -> AppResult<Category> {
        validate_name(&input.name).map_err(|m| AppError::validation("name", m))?;
        let name = input.name.trim();
        let slug = category_slug(name)?;

        let slug = slug.as_str();
        let category = self
            .codes
            .assign(EntityKind::Category, &self.db, move |code| {
                self.insert(code, name, slug)
            })
            .await?;

        tracing::info!(
            category_id = %category.id,
            code = %category.unique_code,
            slug = %category.slug,
            "Category created"
        );
        Ok(category)
    }

    async fn insert(&self, code: String, name: &str, slug: &str) -> AppResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (unique_code, name, slug)
            VALUES ($1, $2, $3)
            ON CONFLICT (unique_code) DO NOTHING
            RETURNING id, unique_code, name, slug, lifecycle, created_at, updated_at
            "#,
        )
        .bind(&code)
        .bind(name)
        .bind(slug)
        .fetch_optional(&self.db)
        .await
        .map_err(name_or_slug_violation)?;

        Ok(category)
    }

    /// Update a category; renaming recomputes the slug
    pub async fn update(
        &self,
        category_id: Uuid,
        input: UpdateCategoryInput,
    ) -> AppResult<Category> {
        let existing = self.get(category_id).await?;

        let name = input.name.unwrap_or(existing.name);
        validate_name(&name).map_err(|m| AppError::validation("name", m))?;
        let name = name.trim();
        let slug = category_slug(name)?;
        let lifecycle = input.lifecycle.unwrap_or(existing.lifecycle);

        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $1, slug = $2, lifecycle = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING id, unique_code, name, slug, lifecycle, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(&slug)
        .bind(lifecycle)
        .bind(category_id)
        .fetch_one(&self.db)
        .await
        .map_err(name_or_slug_violation)?;

        Ok(category)
    }

    pub async fn deactivate(&self, category_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE categories SET lifecycle = 'deactivated', updated_at = NOW() WHERE id = $1",
        )
        .bind(category_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category".to_string()));
        }

        tracing::info!(%category_id, "Category deactivated");
        Ok(())
    }
}
