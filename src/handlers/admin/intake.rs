use axum::{
    extract::{Json, Path},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{BoqRequest, ContactMessage, QuotationRequest};
use crate::error::ApiError;
use crate::intake;
use crate::middleware::response::ApiResponse;

/// GET /api/admin/messages
pub async fn messages_get() -> Result<ApiResponse<Vec<ContactMessage>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::success(intake::list_contact_messages(&pool).await?))
}

#[derive(Debug, Deserialize)]
pub struct ReadMarker {
    #[serde(default = "default_read")]
    pub read: bool,
}

fn default_read() -> bool {
    true
}

/// PUT /api/admin/messages/:id/read - toggle the read marker, the only
/// mutation contact messages ever receive
pub async fn message_read_put(
    Path(id): Path<Uuid>,
    Json(marker): Json<ReadMarker>,
) -> Result<ApiResponse<ContactMessage>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::success(intake::set_contact_read(&pool, id, marker.read).await?))
}

/// DELETE /api/admin/messages/:id
pub async fn message_delete(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    intake::delete_contact_message(&pool, id).await?;
    Ok(ApiResponse::success(json!({ "deleted": id })))
}

/// GET /api/admin/quotations
pub async fn quotations_get() -> Result<ApiResponse<Vec<QuotationRequest>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::success(intake::list_quotations(&pool).await?))
}

/// DELETE /api/admin/quotations/:id
pub async fn quotation_delete(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    intake::delete_quotation(&pool, id).await?;
    Ok(ApiResponse::success(json!({ "deleted": id })))
}

/// GET /api/admin/boq
pub async fn boq_get() -> Result<ApiResponse<Vec<BoqRequest>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::success(intake::list_boq_requests(&pool).await?))
}

/// DELETE /api/admin/boq/:id
pub async fn boq_delete(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    intake::delete_boq_request(&pool, id).await?;
    Ok(ApiResponse::success(json!({ "deleted": id })))
}
