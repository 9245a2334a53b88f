use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Always references exactly one category and one brand
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subcategory {
    pub id: Uuid,
    pub category_id: Uuid,
    pub brand_id: Uuid,
    pub name: String,
    pub slug: String,
    pub page_url: Option<String>,
    pub image: Option<String>,
}
