use axum::{
    extract::{Json, Path},
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::catalog::industries::{self, IndustryInput};
use crate::database::manager::DatabaseManager;
use crate::database::models::Industry;
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;

/// GET /api/admin/industries
pub async fn list_get() -> Result<ApiResponse<Vec<Industry>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::success(industries::list(&pool).await?))
}

/// POST /api/admin/industries
pub async fn create_post(Json(input): Json<IndustryInput>) -> Result<impl IntoResponse, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }

    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::created(industries::create(&pool, &input).await?))
}

/// PUT /api/admin/industries/:id
pub async fn update_put(
    Path(id): Path<Uuid>,
    Json(input): Json<IndustryInput>,
) -> Result<ApiResponse<Industry>, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }

    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::success(industries::update(&pool, id, &input).await?))
}

/// DELETE /api/admin/industries/:id
pub async fn delete_delete(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    industries::delete(&pool, id).await?;
    Ok(ApiResponse::success(json!({ "deleted": id })))
}
