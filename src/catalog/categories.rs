use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Category;

use super::slugify;

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub main_image: Option<String>,
    #[serde(default)]
    pub industries: Vec<String>,
}

/// All categories, ordered by display name
pub async fn list(pool: &PgPool) -> Result<Vec<Category>, DatabaseError> {
    let rows = sqlx::query_as::<_, Category>(
        "SELECT id, name, slug, main_image, industries FROM categories ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Category>, DatabaseError> {
    let row = sqlx::query_as::<_, Category>(
        "SELECT id, name, slug, main_image, industries FROM categories WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Categories whose denormalized industry set contains the given
/// industry display name
pub async fn list_for_industry(
    pool: &PgPool,
    industry_name: &str,
) -> Result<Vec<Category>, DatabaseError> {
    let rows = sqlx::query_as::<_, Category>(
        "SELECT id, name, slug, main_image, industries FROM categories \
         WHERE $1 = ANY(industries) ORDER BY name",
    )
    .bind(industry_name)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &PgPool, input: &CategoryInput) -> Result<Category, DatabaseError> {
    let row = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (id, name, slug, main_image, industries) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, name, slug, main_image, industries",
    )
    .bind(Uuid::new_v4())
    .bind(&input.name)
    .bind(slugify(&input.name))
    .bind(&input.main_image)
    .bind(&input.industries)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Rename/update a category; the slug is re-derived from the new name
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &CategoryInput,
) -> Result<Category, DatabaseError> {
    let row = sqlx::query_as::<_, Category>(
        "UPDATE categories SET name = $2, slug = $3, main_image = $4, industries = $5 \
         WHERE id = $1 \
         RETURNING id, name, slug, main_image, industries",
    )
    .bind(id)
    .bind(&input.name)
    .bind(slugify(&input.name))
    .bind(&input.main_image)
    .bind(&input.industries)
    .fetch_optional(pool)
    .await?;

    row.ok_or_else(|| DatabaseError::NotFound("Category not found".to_string()))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), DatabaseError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1").bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound("Category not found".to_string()));
    }
    Ok(())
}
