use axum::{
    body::Bytes,
    extract::{Json, Query, State},
    http::HeaderMap,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::response::ApiResponse;
use crate::state::AppState;
use crate::storage::StoredObject;

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: String,
}

/// The filename becomes a single object-path segment under the random
/// prefix; separators inside it are flattened so it cannot nest or climb
fn object_name(filename: &str) -> String {
    filename.trim().replace(['/', '\\'], "_")
}

/// POST /api/uploads?filename= - proxy a raw body into object storage.
/// Stored under a random prefix so repeated uploads of the same filename
/// never collide.
pub async fn upload_post(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    if query.filename.trim().is_empty() {
        return Err(ApiError::bad_request("filename is required"));
    }
    if body.is_empty() {
        return Err(ApiError::bad_request("empty upload"));
    }

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    let path = format!("{}/{}", Uuid::new_v4(), object_name(&query.filename));
    let url = state.storage.upload(&path, body.to_vec(), content_type).await?;

    Ok(ApiResponse::created(json!({ "path": path, "url": url })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub path: String,
}

/// POST /api/uploads/delete
pub async fn delete_post(
    State(state): State<AppState>,
    Json(payload): Json<DeleteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.path.trim().is_empty() {
        return Err(ApiError::bad_request("path is required"));
    }

    state.storage.delete(payload.path.trim()).await?;
    Ok(ApiResponse::success(json!({ "deleted": payload.path })))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub prefix: String,
}

/// GET /api/uploads/list
pub async fn list_get(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<ApiResponse<Vec<StoredObject>>, ApiError> {
    Ok(ApiResponse::success(state.storage.list(&query.prefix).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_name_keeps_ordinary_filenames() {
        assert_eq!(object_name(" BOQ final.xlsx "), "BOQ final.xlsx");
    }

    #[test]
    fn test_object_name_flattens_separators() {
        assert_eq!(object_name("a/b.pdf"), "a_b.pdf");
        assert_eq!(object_name("..\\..\\boot.ini"), ".._.._boot.ini");
    }
}
