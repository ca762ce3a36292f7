use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap},
};

use super::AppState;
use crate::api::response::{ApiResponse, ApiResult};
use crate::database::Store;
use crate::services::file_metadata::FileMetadata;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// POST /api/files/:filename - record metadata for the raw request body
pub async fn upload_file<S: Store>(
    State(state): State<AppState<S>>,
    Path(filename): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<FileMetadata> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE);

    let metadata = state.files.save(&filename, content_type, &body).await?;
    Ok(ApiResponse::created(metadata))
}

/// GET /api/files
pub async fn list_files<S: Store>(State(state): State<AppState<S>>) -> ApiResult<Vec<FileMetadata>> {
    Ok(ApiResponse::success(state.files.list().await))
}

/// GET /api/files/:id
pub async fn get_file<S: Store>(State(state): State<AppState<S>>, Path(id): Path<i64>) -> ApiResult<FileMetadata> {
    Ok(ApiResponse::success(state.files.get(id).await?))
}

/// DELETE /api/files/:id
pub async fn delete_file<S: Store>(State(state): State<AppState<S>>, Path(id): Path<i64>) -> ApiResult<FileMetadata> {
    Ok(ApiResponse::success(state.files.delete(id).await?))
}
