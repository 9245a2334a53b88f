use axum::{
    extract::{Json, Path, Query},
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::catalog::products::{self, ProductFilter, ProductInput};
use crate::database::manager::DatabaseManager;
use crate::database::models::Product;
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;

/// GET /api/admin/products/list
pub async fn list_get(
    Query(filter): Query<ProductFilter>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::success(products::list(&pool, &filter).await?))
}

/// POST /api/admin/products
pub async fn create_post(Json(input): Json<ProductInput>) -> Result<impl IntoResponse, ApiError> {
    validate(&input)?;

    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::created(products::create(&pool, &input).await?))
}

/// PUT /api/admin/products/:id
pub async fn update_put(
    Path(id): Path<Uuid>,
    Json(input): Json<ProductInput>,
) -> Result<ApiResponse<Product>, ApiError> {
    validate(&input)?;

    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::success(products::update(&pool, id, &input).await?))
}

/// DELETE /api/admin/products/:id
pub async fn delete_delete(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    products::delete(&pool, id).await?;
    Ok(ApiResponse::success(json!({ "deleted": id })))
}

fn validate(input: &ProductInput) -> Result<(), ApiError> {
    if input.title.trim().is_empty() {
        return Err(ApiError::bad_request("title is required"));
    }
    if input.brand.trim().is_empty() || input.category.trim().is_empty() {
        return Err(ApiError::bad_request("brand and category are required"));
    }
    Ok(())
}
