use axum::{extract::Json, response::IntoResponse};
use serde_json::json;

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::intake::{self, BoqPayload, ContactPayload, QuotationPayload};
use crate::middleware::response::ApiResponse;

/// POST /api/contact
pub async fn contact_post(
    Json(payload): Json<ContactPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let message = intake::submit_contact(&pool, &payload).await?;

    tracing::info!("contact message received: {}", message.id);
    Ok(ApiResponse::created(json!({ "id": message.id })))
}

/// POST /api/quotations
pub async fn quotation_post(
    Json(payload): Json<QuotationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let request = intake::submit_quotation(&pool, &payload).await?;

    tracing::info!("quotation request received: {}", request.id);
    Ok(ApiResponse::created(json!({ "id": request.id })))
}

/// POST /api/boq
pub async fn boq_post(Json(payload): Json<BoqPayload>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let request = intake::submit_boq(&pool, &payload).await?;

    tracing::info!("BOQ request received: {}", request.id);
    Ok(ApiResponse::created(json!({ "id": request.id })))
}
