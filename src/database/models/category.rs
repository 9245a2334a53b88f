use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub main_image: Option<String>,
    /// Industry display names this category serves. Denormalized: matched
    /// against Industry.name by containment, not by foreign key.
    pub industries: Vec<String>,
}
