use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{BoqRequest, ContactMessage, QuotationRequest};

#[derive(Debug, Error)]
pub enum IntakeError {
    /// Per-field validation failures, surfaced before any write
    #[error("invalid intake payload")]
    Invalid(HashMap<String, String>),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for IntakeError {
    fn from(err: sqlx::Error) -> Self {
        IntakeError::Database(DatabaseError::Sqlx(err))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuotationItem {
    pub product: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuotationPayload {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub items: Vec<QuotationItem>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoqPayload {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub file_url: String,
    pub notes: Option<String>,
}

fn require(errors: &mut HashMap<String, String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), "This field is required".to_string());
    }
}

fn require_email(errors: &mut HashMap<String, String>, field: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field.to_string(), "This field is required".to_string());
    } else if !looks_like_email(value) {
        errors.insert(field.to_string(), "Must be a valid email address".to_string());
    }
}

/// Shape check only; deliverability is the mail system's problem
pub fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

impl ContactPayload {
    pub fn validate(&self) -> Result<(), IntakeError> {
        let mut errors = HashMap::new();
        require(&mut errors, "name", &self.name);
        require_email(&mut errors, "email", &self.email);
        require(&mut errors, "message", &self.message);

        if errors.is_empty() { Ok(()) } else { Err(IntakeError::Invalid(errors)) }
    }
}

impl QuotationPayload {
    pub fn validate(&self) -> Result<(), IntakeError> {
        let mut errors = HashMap::new();
        require(&mut errors, "name", &self.name);
        require_email(&mut errors, "email", &self.email);

        if self.items.is_empty() {
            errors.insert("items".to_string(), "At least one item is required".to_string());
        }
        for (i, item) in self.items.iter().enumerate() {
            if item.product.trim().is_empty() {
                errors.insert(format!("items[{i}].product"), "This field is required".to_string());
            }
            if item.quantity == 0 {
                errors.insert(format!("items[{i}].quantity"), "Must be at least 1".to_string());
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(IntakeError::Invalid(errors)) }
    }
}

impl BoqPayload {
    pub fn validate(&self) -> Result<(), IntakeError> {
        let mut errors = HashMap::new();
        require(&mut errors, "name", &self.name);
        require_email(&mut errors, "email", &self.email);
        require(&mut errors, "file_url", &self.file_url);

        if errors.is_empty() { Ok(()) } else { Err(IntakeError::Invalid(errors)) }
    }
}

// Writers validate first, then attempt the insert once; a storage
// failure is terminal (no retry).

pub async fn submit_contact(
    pool: &PgPool,
    payload: &ContactPayload,
) -> Result<ContactMessage, IntakeError> {
    payload.validate()?;

    let row = sqlx::query_as::<_, ContactMessage>(
        "INSERT INTO contact_messages (id, name, email, phone, subject, message, read, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, false, now()) \
         RETURNING id, name, email, phone, subject, message, read, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(payload.name.trim())
    .bind(payload.email.trim())
    .bind(&payload.phone)
    .bind(&payload.subject)
    .bind(&payload.message)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn submit_quotation(
    pool: &PgPool,
    payload: &QuotationPayload,
) -> Result<QuotationRequest, IntakeError> {
    payload.validate()?;

    let items = json!(payload
        .items
        .iter()
        .map(|i| json!({ "product": i.product, "quantity": i.quantity }))
        .collect::<Vec<_>>());

    let row = sqlx::query_as::<_, QuotationRequest>(
        "INSERT INTO quotation_requests (id, name, email, phone, company, items, notes, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, now()) \
         RETURNING id, name, email, phone, company, items, notes, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(payload.name.trim())
    .bind(payload.email.trim())
    .bind(&payload.phone)
    .bind(&payload.company)
    .bind(items)
    .bind(&payload.notes)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn submit_boq(pool: &PgPool, payload: &BoqPayload) -> Result<BoqRequest, IntakeError> {
    payload.validate()?;

    let row = sqlx::query_as::<_, BoqRequest>(
        "INSERT INTO boq_requests (id, name, email, phone, company, file_url, notes, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, now()) \
         RETURNING id, name, email, phone, company, file_url, notes, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(payload.name.trim())
    .bind(payload.email.trim())
    .bind(&payload.phone)
    .bind(&payload.company)
    .bind(&payload.file_url)
    .bind(&payload.notes)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

// Admin-side reads and mutations. Customers never reach these; the
// admin gate fronts every route that calls them.

pub async fn list_contact_messages(pool: &PgPool) -> Result<Vec<ContactMessage>, IntakeError> {
    let rows = sqlx::query_as::<_, ContactMessage>(
        "SELECT id, name, email, phone, subject, message, read, created_at \
         FROM contact_messages ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn set_contact_read(
    pool: &PgPool,
    id: Uuid,
    read: bool,
) -> Result<ContactMessage, IntakeError> {
    let row = sqlx::query_as::<_, ContactMessage>(
        "UPDATE contact_messages SET read = $2 WHERE id = $1 \
         RETURNING id, name, email, phone, subject, message, read, created_at",
    )
    .bind(id)
    .bind(read)
    .fetch_optional(pool)
    .await?;

    row.ok_or_else(|| DatabaseError::NotFound("Message not found".to_string()).into())
}

pub async fn delete_contact_message(pool: &PgPool, id: Uuid) -> Result<(), IntakeError> {
    let result =
        sqlx::query("DELETE FROM contact_messages WHERE id = $1").bind(id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound("Message not found".to_string()).into());
    }
    Ok(())
}

pub async fn list_quotations(pool: &PgPool) -> Result<Vec<QuotationRequest>, IntakeError> {
    let rows = sqlx::query_as::<_, QuotationRequest>(
        "SELECT id, name, email, phone, company, items, notes, created_at \
         FROM quotation_requests ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn delete_quotation(pool: &PgPool, id: Uuid) -> Result<(), IntakeError> {
    let result =
        sqlx::query("DELETE FROM quotation_requests WHERE id = $1").bind(id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound("Quotation not found".to_string()).into());
    }
    Ok(())
}

pub async fn list_boq_requests(pool: &PgPool) -> Result<Vec<BoqRequest>, IntakeError> {
    let rows = sqlx::query_as::<_, BoqRequest>(
        "SELECT id, name, email, phone, company, file_url, notes, created_at \
         FROM boq_requests ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn delete_boq_request(pool: &PgPool, id: Uuid) -> Result<(), IntakeError> {
    let result =
        sqlx::query("DELETE FROM boq_requests WHERE id = $1").bind(id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound("BOQ request not found".to_string()).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> ContactPayload {
        ContactPayload {
            name: "Asha Verma".to_string(),
            email: "asha@example.com".to_string(),
            phone: None,
            subject: None,
            message: "Looking for 32A breakers".to_string(),
        }
    }

    #[test]
    fn test_contact_valid() {
        assert!(contact().validate().is_ok());
    }

    #[test]
    fn test_contact_missing_fields_reported_per_field() {
        let payload = ContactPayload {
            name: "  ".to_string(),
            email: String::new(),
            phone: None,
            subject: None,
            message: String::new(),
        };

        match payload.validate() {
            Err(IntakeError::Invalid(errors)) => {
                assert!(errors.contains_key("name"));
                assert!(errors.contains_key("email"));
                assert!(errors.contains_key("message"));
            }
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn test_contact_rejects_bad_email() {
        let mut payload = contact();
        payload.email = "not-an-email".to_string();

        match payload.validate() {
            Err(IntakeError::Invalid(errors)) => assert!(errors.contains_key("email")),
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn test_quotation_requires_items() {
        let payload = QuotationPayload {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: None,
            company: None,
            items: vec![],
            notes: None,
        };

        match payload.validate() {
            Err(IntakeError::Invalid(errors)) => assert!(errors.contains_key("items")),
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn test_quotation_rejects_zero_quantity() {
        let payload = QuotationPayload {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: None,
            company: None,
            items: vec![QuotationItem { product: "eaton-mcb-32a".to_string(), quantity: 0 }],
            notes: None,
        };

        match payload.validate() {
            Err(IntakeError::Invalid(errors)) => {
                assert!(errors.contains_key("items[0].quantity"));
            }
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn test_email_shape() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a@.co"));
        assert!(!looks_like_email("plain"));
    }
}
