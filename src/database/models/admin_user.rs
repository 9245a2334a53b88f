use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Allow-list row for the admin area. Existence of a row for a provider
/// user id is what grants admin access; an empty table means first-run
/// setup has not completed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminUser {
    pub id: Uuid,
    /// Identity-provider user id (one-to-one)
    pub provider_user_id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}
