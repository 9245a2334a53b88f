use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Industry;

use super::slugify;

#[derive(Debug, Clone, Deserialize)]
pub struct IndustryInput {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

pub async fn list(pool: &PgPool) -> Result<Vec<Industry>, DatabaseError> {
    let rows = sqlx::query_as::<_, Industry>(
        "SELECT id, name, slug, description, image FROM industries ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Industry>, DatabaseError> {
    let row = sqlx::query_as::<_, Industry>(
        "SELECT id, name, slug, description, image FROM industries WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &PgPool, input: &IndustryInput) -> Result<Industry, DatabaseError> {
    let row = sqlx::query_as::<_, Industry>(
        "INSERT INTO industries (id, name, slug, description, image) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, name, slug, description, image",
    )
    .bind(Uuid::new_v4())
    .bind(&input.name)
    .bind(slugify(&input.name))
    .bind(&input.description)
    .bind(&input.image)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Renaming an industry does not rewrite category industry sets; the
/// category association is by name containment and goes stale on rename.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &IndustryInput,
) -> Result<Industry, DatabaseError> {
    let row = sqlx::query_as::<_, Industry>(
        "UPDATE industries SET name = $2, slug = $3, description = $4, image = $5 \
         WHERE id = $1 \
         RETURNING id, name, slug, description, image",
    )
    .bind(id)
    .bind(&input.name)
    .bind(slugify(&input.name))
    .bind(&input.description)
    .bind(&input.image)
    .fetch_optional(pool)
    .await?;

    row.ok_or_else(|| DatabaseError::NotFound("Industry not found".to_string()))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), DatabaseError> {
    let result = sqlx::query("DELETE FROM industries WHERE id = $1").bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound("Industry not found".to_string()));
    }
    Ok(())
}
