//! Image store passthrough: multipart upload, raw download, delete.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use market_db::MediaRecord;

use crate::error::ApiError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload", post(upload_image))
        .route("/download/{id}", get(download_image))
        .route("/delete/{id}", delete(delete_image))
}

/// `POST /image/upload`
///
/// Takes the first multipart part carrying a file. Anything that is not
/// an image is rejected before touching the store.
async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed multipart body: {}", e)))?
        .ok_or_else(|| ApiError::Validation("No file provided".to_string()))?;

    let content_type = field.content_type().unwrap_or_default().to_string();
    if !content_type.starts_with("image/") {
        return Err(ApiError::Validation("Invalid image file".to_string()));
    }

    let original_name = field.file_name().unwrap_or("upload").to_string();
    let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::Validation(format!("Failed to read upload: {}", e)))?;

    let id = Uuid::new_v4().to_string();
    let record = MediaRecord {
        filename: format!("{}_{}", id, original_name),
        id,
        content_type,
        data: data.to_vec(),
        uploaded_at: Utc::now(),
    };

    state.db.media().insert(&record).await?;

    info!(id = %record.id, size = record.data.len(), "Image uploaded");
    Ok(Json(json!({
        "message": "Image uploaded successfully",
        "file_id": record.id,
    })))
}

/// `GET /image/download/{id}` - raw bytes.
async fn download_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .db
        .media()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("File not found".to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        record.data,
    ))
}

/// `DELETE /image/delete/{id}`
async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.media().delete(&id).await.map_err(|e| match e {
        market_db::DbError::NotFound { .. } => {
            ApiError::NotFound("File not found".to_string())
        }
        other => other.into(),
    })?;

    Ok(Json(json!({
        "message": format!("File {} deleted successfully", id),
    })))
}
