use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Subcategory;

use super::slugify;

#[derive(Debug, Clone, Deserialize)]
pub struct SubcategoryInput {
    pub category_id: Uuid,
    pub brand_id: Uuid,
    pub name: String,
    pub page_url: Option<String>,
    pub image: Option<String>,
}

const COLUMNS: &str = "id, category_id, brand_id, name, slug, page_url, image";

pub async fn list_for_category(
    pool: &PgPool,
    category_id: Uuid,
) -> Result<Vec<Subcategory>, DatabaseError> {
    let rows = sqlx::query_as::<_, Subcategory>(&format!(
        "SELECT {COLUMNS} FROM subcategories WHERE category_id = $1 ORDER BY name"
    ))
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_for_brand(
    pool: &PgPool,
    brand_id: Uuid,
) -> Result<Vec<Subcategory>, DatabaseError> {
    let rows = sqlx::query_as::<_, Subcategory>(&format!(
        "SELECT {COLUMNS} FROM subcategories WHERE brand_id = $1 ORDER BY name"
    ))
    .bind(brand_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_by_slug(
    pool: &PgPool,
    category_id: Uuid,
    slug: &str,
) -> Result<Option<Subcategory>, DatabaseError> {
    let row = sqlx::query_as::<_, Subcategory>(&format!(
        "SELECT {COLUMNS} FROM subcategories WHERE category_id = $1 AND slug = $2"
    ))
    .bind(category_id)
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Insert fails if the referenced category or brand does not exist
/// (enforced by foreign keys)
pub async fn create(pool: &PgPool, input: &SubcategoryInput) -> Result<Subcategory, DatabaseError> {
    let row = sqlx::query_as::<_, Subcategory>(&format!(
        "INSERT INTO subcategories (id, category_id, brand_id, name, slug, page_url, image) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(input.category_id)
    .bind(input.brand_id)
    .bind(&input.name)
    .bind(slugify(&input.name))
    .bind(&input.page_url)
    .bind(&input.image)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &SubcategoryInput,
) -> Result<Subcategory, DatabaseError> {
    let row = sqlx::query_as::<_, Subcategory>(&format!(
        "UPDATE subcategories \
         SET category_id = $2, brand_id = $3, name = $4, slug = $5, page_url = $6, image = $7 \
         WHERE id = $1 \
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(input.category_id)
    .bind(input.brand_id)
    .bind(&input.name)
    .bind(slugify(&input.name))
    .bind(&input.page_url)
    .bind(&input.image)
    .fetch_optional(pool)
    .await?;

    row.ok_or_else(|| DatabaseError::NotFound("Subcategory not found".to_string()))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), DatabaseError> {
    let result =
        sqlx::query("DELETE FROM subcategories WHERE id = $1").bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound("Subcategory not found".to_string()));
    }
    Ok(())
}
