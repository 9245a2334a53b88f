use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Product;

use super::slugify;

/// Filters for product listing; all optional and combined with AND.
/// `exclude_id` supports the "related products" strip, which lists
/// siblings of a product without the product itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub brand: Option<String>,
    pub exclude_id: Option<Uuid>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub title: String,
    pub description: Option<String>,
    pub brand: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub order_number: Option<String>,
    pub code_number: Option<String>,
    #[serde(default)]
    pub details: Value,
    #[serde(default)]
    pub images: Vec<String>,
}

const COLUMNS: &str = "id, slug, title, description, brand, category, subcategory, \
                       order_number, code_number, details, images, created_at";

pub async fn list(pool: &PgPool, filter: &ProductFilter) -> Result<Vec<Product>, DatabaseError> {
    // Fixed filter set, so positional params are written out rather than
    // built dynamically
    let rows = sqlx::query_as::<_, Product>(&format!(
        "SELECT {COLUMNS} FROM products \
         WHERE ($1::text IS NULL OR category = $1) \
           AND ($2::text IS NULL OR subcategory = $2) \
           AND ($3::text IS NULL OR brand = $3) \
           AND ($4::uuid IS NULL OR id <> $4) \
         ORDER BY created_at DESC \
         LIMIT $5"
    ))
    .bind(&filter.category)
    .bind(&filter.subcategory)
    .bind(&filter.brand)
    .bind(filter.exclude_id)
    .bind(filter.limit.unwrap_or(200))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Product>, DatabaseError> {
    let row =
        sqlx::query_as::<_, Product>(&format!("SELECT {COLUMNS} FROM products WHERE slug = $1"))
            .bind(slug)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

pub async fn create(pool: &PgPool, input: &ProductInput) -> Result<Product, DatabaseError> {
    let row = sqlx::query_as::<_, Product>(&format!(
        "INSERT INTO products \
         (id, slug, title, description, brand, category, subcategory, \
          order_number, code_number, details, images, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, now()) \
         RETURNING {COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(slugify(&input.title))
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.brand)
    .bind(&input.category)
    .bind(&input.subcategory)
    .bind(&input.order_number)
    .bind(&input.code_number)
    .bind(&input.details)
    .bind(&input.images)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &ProductInput,
) -> Result<Product, DatabaseError> {
    let row = sqlx::query_as::<_, Product>(&format!(
        "UPDATE products \
         SET slug = $2, title = $3, description = $4, brand = $5, category = $6, \
             subcategory = $7, order_number = $8, code_number = $9, details = $10, images = $11 \
         WHERE id = $1 \
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(slugify(&input.title))
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.brand)
    .bind(&input.category)
    .bind(&input.subcategory)
    .bind(&input.order_number)
    .bind(&input.code_number)
    .bind(&input.details)
    .bind(&input.images)
    .fetch_optional(pool)
    .await?;

    row.ok_or_else(|| DatabaseError::NotFound("Product not found".to_string()))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), DatabaseError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1").bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound("Product not found".to_string()));
    }
    Ok(())
}
