use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Category, ExternalRef, Product, Subcategory};

/// Per-kind candidate supplier for the search aggregator. Each method
/// returns the full candidate list in storage read order; filtering and
/// truncation happen in the aggregator. The seam exists so tests can
/// substitute in-memory data and count storage calls.
#[async_trait]
pub trait SearchSource: Send + Sync {
    async fn products(&self) -> Result<Vec<Product>, DatabaseError>;
    async fn categories(&self) -> Result<Vec<Category>, DatabaseError>;
    async fn subcategories(&self) -> Result<Vec<Subcategory>, DatabaseError>;
    async fn external_refs(&self) -> Result<Vec<ExternalRef>, DatabaseError>;
}

/// Production source reading straight from the catalog database on
/// every call. No caching; the catalog is small and admin-curated.
pub struct PgSearchSource {
    pool: PgPool,
}

impl PgSearchSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SearchSource for PgSearchSource {
    async fn products(&self) -> Result<Vec<Product>, DatabaseError> {
        let rows = sqlx::query_as::<_, Product>(
            "SELECT id, slug, title, description, brand, category, subcategory, \
                    order_number, code_number, details, images, created_at \
             FROM products ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let rows = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, main_image, industries FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn subcategories(&self) -> Result<Vec<Subcategory>, DatabaseError> {
        let rows = sqlx::query_as::<_, Subcategory>(
            "SELECT id, category_id, brand_id, name, slug, page_url, image \
             FROM subcategories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn external_refs(&self) -> Result<Vec<ExternalRef>, DatabaseError> {
        let rows =
            sqlx::query_as::<_, ExternalRef>("SELECT id, name, code, url FROM external_refs")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }
}
