use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A brand scoped to one category; slug is unique within that category
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Brand {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
    pub logo: Option<String>,
}
