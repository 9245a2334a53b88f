use axum::{
    extract::{Json, Path},
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::catalog::brands::{self, BrandInput};
use crate::catalog::categories::{self, CategoryInput};
use crate::catalog::subcategories::{self, SubcategoryInput};
use crate::database::manager::DatabaseManager;
use crate::database::models::{Brand, Category, Subcategory};
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;

// Categories

/// GET /api/admin/categories
pub async fn list_get() -> Result<ApiResponse<Vec<Category>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::success(categories::list(&pool).await?))
}

/// POST /api/admin/categories
pub async fn create_post(
    Json(input): Json<CategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }

    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::created(categories::create(&pool, &input).await?))
}

/// PUT /api/admin/categories/:id
pub async fn update_put(
    Path(id): Path<Uuid>,
    Json(input): Json<CategoryInput>,
) -> Result<ApiResponse<Category>, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }

    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::success(categories::update(&pool, id, &input).await?))
}

/// DELETE /api/admin/categories/:id
pub async fn delete_delete(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    categories::delete(&pool, id).await?;
    Ok(ApiResponse::success(json!({ "deleted": id })))
}

// Brands (scoped to a category)

/// GET /api/admin/categories/:id/brands
pub async fn brands_get(Path(category_id): Path<Uuid>) -> Result<ApiResponse<Vec<Brand>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::success(brands::list_for_category(&pool, category_id).await?))
}

/// POST /api/admin/brands
pub async fn brand_post(Json(input): Json<BrandInput>) -> Result<impl IntoResponse, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }

    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::created(brands::create(&pool, &input).await?))
}

/// PUT /api/admin/brands/:id
pub async fn brand_put(
    Path(id): Path<Uuid>,
    Json(input): Json<BrandInput>,
) -> Result<ApiResponse<Brand>, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }

    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::success(brands::update(&pool, id, &input).await?))
}

/// DELETE /api/admin/brands/:id
pub async fn brand_delete(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    brands::delete(&pool, id).await?;
    Ok(ApiResponse::success(json!({ "deleted": id })))
}

// Subcategories

/// GET /api/admin/categories/:id/subcategories
pub async fn subcategories_get(
    Path(category_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<Subcategory>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::success(subcategories::list_for_category(&pool, category_id).await?))
}

/// POST /api/admin/subcategories
pub async fn subcategory_post(
    Json(input): Json<SubcategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }

    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::created(subcategories::create(&pool, &input).await?))
}

/// PUT /api/admin/subcategories/:id
pub async fn subcategory_put(
    Path(id): Path<Uuid>,
    Json(input): Json<SubcategoryInput>,
) -> Result<ApiResponse<Subcategory>, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }

    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::success(subcategories::update(&pool, id, &input).await?))
}

/// DELETE /api/admin/subcategories/:id
pub async fn subcategory_delete(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    subcategories::delete(&pool, id).await?;
    Ok(ApiResponse::success(json!({ "deleted": id })))
}
