use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Brand;

use super::slugify;

#[derive(Debug, Clone, Deserialize)]
pub struct BrandInput {
    pub category_id: Uuid,
    pub name: String,
    pub logo: Option<String>,
}

pub async fn list_for_category(
    pool: &PgPool,
    category_id: Uuid,
) -> Result<Vec<Brand>, DatabaseError> {
    let rows = sqlx::query_as::<_, Brand>(
        "SELECT id, category_id, name, slug, logo FROM brands \
         WHERE category_id = $1 ORDER BY name",
    )
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Brand by slug within its parent category (slugs are unique per category,
/// not globally)
pub async fn get_by_slug(
    pool: &PgPool,
    category_id: Uuid,
    slug: &str,
) -> Result<Option<Brand>, DatabaseError> {
    let row = sqlx::query_as::<_, Brand>(
        "SELECT id, category_id, name, slug, logo FROM brands \
         WHERE category_id = $1 AND slug = $2",
    )
    .bind(category_id)
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &PgPool, input: &BrandInput) -> Result<Brand, DatabaseError> {
    let row = sqlx::query_as::<_, Brand>(
        "INSERT INTO brands (id, category_id, name, slug, logo) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, category_id, name, slug, logo",
    )
    .bind(Uuid::new_v4())
    .bind(input.category_id)
    .bind(&input.name)
    .bind(slugify(&input.name))
    .bind(&input.logo)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update(pool: &PgPool, id: Uuid, input: &BrandInput) -> Result<Brand, DatabaseError> {
    let row = sqlx::query_as::<_, Brand>(
        "UPDATE brands SET category_id = $2, name = $3, slug = $4, logo = $5 \
         WHERE id = $1 \
         RETURNING id, category_id, name, slug, logo",
    )
    .bind(id)
    .bind(input.category_id)
    .bind(&input.name)
    .bind(slugify(&input.name))
    .bind(&input.logo)
    .fetch_optional(pool)
    .await?;

    row.ok_or_else(|| DatabaseError::NotFound("Brand not found".to_string()))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), DatabaseError> {
    let result = sqlx::query("DELETE FROM brands WHERE id = $1").bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound("Brand not found".to_string()));
    }
    Ok(())
}
