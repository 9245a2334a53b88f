use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A catalog product. Read paths never mutate; writes go through the
/// admin accessors only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    /// Brand display name
    pub brand: String,
    /// Parent category slug
    pub category: String,
    /// Parent subcategory slug
    pub subcategory: Option<String>,
    pub order_number: Option<String>,
    pub code_number: Option<String>,
    /// Structured detail attributes (spec sheet key/values)
    pub details: Value,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Shown when a product carries no image of its own
pub const PLACEHOLDER_IMAGE: &str = "/images/product-placeholder.svg";

impl Product {
    /// First image URL, falling back to the shared placeholder
    pub fn primary_image(&self) -> &str {
        self.images.first().map(String::as_str).unwrap_or(PLACEHOLDER_IMAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(images: Vec<String>) -> Product {
        Product {
            id: Uuid::new_v4(),
            slug: "eaton-mcb-32a".to_string(),
            title: "Eaton MCB Breaker 32A".to_string(),
            description: None,
            brand: "Eaton".to_string(),
            category: "circuit-protection".to_string(),
            subcategory: None,
            order_number: None,
            code_number: None,
            details: serde_json::json!({}),
            images,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_primary_image_prefers_first() {
        let p = product(vec!["/a.jpg".to_string(), "/b.jpg".to_string()]);
        assert_eq!(p.primary_image(), "/a.jpg");
    }

    #[test]
    fn test_primary_image_falls_back_to_placeholder() {
        let p = product(vec![]);
        assert_eq!(p.primary_image(), PLACEHOLDER_IMAGE);
    }
}
