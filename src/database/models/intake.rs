use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Customer contact message. Write-once from the public side; admins may
/// toggle the read marker or delete.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Quote-cart submission; `items` is the submitted cart as JSON
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuotationRequest {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub items: Value,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Bill-of-quantities request referencing an uploaded file
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BoqRequest {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub file_url: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
