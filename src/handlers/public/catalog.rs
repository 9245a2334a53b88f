use axum::extract::{Path, Query};
use serde::Serialize;

use crate::catalog::{brands, categories, industries, products, subcategories};
use crate::catalog::products::ProductFilter;
use crate::database::manager::DatabaseManager;
use crate::database::models::{Brand, Category, Industry, Product, Subcategory};
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;

/// GET /api/categories
pub async fn categories_get() -> Result<ApiResponse<Vec<Category>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::success(categories::list(&pool).await?))
}

#[derive(Debug, Serialize)]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: Category,
    pub brands: Vec<Brand>,
    pub subcategories: Vec<Subcategory>,
}

/// GET /api/categories/:slug - category with its brands and subcategories
pub async fn category_get(Path(slug): Path<String>) -> Result<ApiResponse<CategoryDetail>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let category = categories::get_by_slug(&pool, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;

    let brands = brands::list_for_category(&pool, category.id).await?;
    let subcategories = subcategories::list_for_category(&pool, category.id).await?;

    Ok(ApiResponse::success(CategoryDetail { category, brands, subcategories }))
}

/// GET /api/products - filterable product listing
pub async fn products_get(
    Query(filter): Query<ProductFilter>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::success(products::list(&pool, &filter).await?))
}

/// GET /api/products/:slug
pub async fn product_get(Path(slug): Path<String>) -> Result<ApiResponse<Product>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    products::get_by_slug(&pool, &slug)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("Product not found"))
}

/// GET /api/products/:slug/related - siblings from the same category,
/// excluding the product itself
pub async fn related_products_get(
    Path(slug): Path<String>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let product = products::get_by_slug(&pool, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    let filter = ProductFilter {
        category: Some(product.category.clone()),
        subcategory: product.subcategory.clone(),
        exclude_id: Some(product.id),
        limit: Some(8),
        ..ProductFilter::default()
    };
    Ok(ApiResponse::success(products::list(&pool, &filter).await?))
}

/// GET /api/industries
pub async fn industries_get() -> Result<ApiResponse<Vec<Industry>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(ApiResponse::success(industries::list(&pool).await?))
}

#[derive(Debug, Serialize)]
pub struct IndustryDetail {
    #[serde(flatten)]
    pub industry: Industry,
    /// Categories whose industry set names this industry
    pub categories: Vec<Category>,
}

/// GET /api/industries/:slug
pub async fn industry_get(Path(slug): Path<String>) -> Result<ApiResponse<IndustryDetail>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let industry = industries::get_by_slug(&pool, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Industry not found"))?;

    let categories = categories::list_for_industry(&pool, &industry.name).await?;
    Ok(ApiResponse::success(IndustryDetail { industry, categories }))
}
