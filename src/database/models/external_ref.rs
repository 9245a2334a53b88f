use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Entry in the external stock reference list. Searched alongside the
/// catalog but links out to a supplier page rather than a product page.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExternalRef {
    pub id: Uuid,
    pub name: String,
    pub code: Option<String>,
    pub url: Option<String>,
}
