//! Public serving route for stored images.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;

use crate::errors::AppError;
use crate::media::{content_type_for_extension, is_safe_rel_path};
use crate::AppState;

/// GET /media/*path - Serve a stored image with long-lived cache headers.
pub async fn serve_media(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    if !is_safe_rel_path(&path) {
        return Err(AppError::Validation("Invalid media path".to_string()));
    }

    let data = state
        .media
        .read(&path)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Media object {} not found", path)))?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for_extension(&path))
        .header(header::CONTENT_LENGTH, data.len().to_string())
        .header(
            header::CACHE_CONTROL,
            "public, max-age=31536000, immutable",
        )
        .body(Body::from(data))
        .unwrap())
}
