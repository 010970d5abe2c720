//! Video byte server with HTTP range support.
//!
//! The whole object is buffered before any bytes go out, which bounds this
//! route to small/medium files.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{self, HeaderMap};
use axum::http::StatusCode;
use axum::response::Response;

use crate::errors::AppError;
use crate::media::{content_type_for_extension, is_safe_file_name};
use crate::AppState;

/// Cache policy for full video responses: stored objects never change under
/// a given name.
const IMMUTABLE_CACHE: &str = "public, max-age=31536000, immutable";

/// GET /api/video/:filename - Serve a stored video, honouring Range requests.
pub async fn stream_video(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if !is_safe_file_name(&filename) {
        return Err(AppError::Validation("Invalid video name".to_string()));
    }

    // The directory listing gives a precise 404, distinct from read failures.
    if !state.media.video_exists(&filename).await? {
        return Err(AppError::NotFound(format!("Video {} not found", filename)));
    }

    let data = state.media.read_video(&filename).await?;
    let total = data.len() as u64;
    let content_type = content_type_for_extension(&filename);

    if let Some(range_value) = headers.get(header::RANGE) {
        let range_str = range_value
            .to_str()
            .map_err(|_| AppError::Validation("Invalid Range header".to_string()))?;

        if let Some((start, end)) = parse_range_header(range_str) {
            let end = end
                .unwrap_or_else(|| total.saturating_sub(1))
                .min(total.saturating_sub(1));

            if total == 0 || start >= total || start > end {
                return Ok(Response::builder()
                    .status(StatusCode::RANGE_NOT_SATISFIABLE)
                    .header(header::CONTENT_RANGE, format!("bytes */{total}"))
                    .body(Body::empty())
                    .unwrap());
            }

            let length = end - start + 1;
            let slice = data[start as usize..=end as usize].to_vec();

            return Ok(Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CONTENT_LENGTH, length.to_string())
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {start}-{end}/{total}"),
                )
                .header(header::ACCEPT_RANGES, "bytes")
                .body(Body::from(slice))
                .unwrap());
        }
    }

    // No Range header: full body with long-lived caching.
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, total.to_string())
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CACHE_CONTROL, IMMUTABLE_CACHE)
        .header(header::ETAG, format!("\"{filename}\""))
        .body(Body::from(data))
        .unwrap())
}

/// Parse a `Range: bytes=START-END` header value.
/// Returns `(start, optional_end)`; the end defaults to the last byte.
fn parse_range_header(range: &str) -> Option<(u64, Option<u64>)> {
    let range = range.strip_prefix("bytes=")?;
    let parts: Vec<&str> = range.splitn(2, '-').collect();
    if parts.len() != 2 {
        return None;
    }
    let start = parts[0].parse::<u64>().ok()?;
    let end = if parts[1].is_empty() {
        None
    } else {
        Some(parts[1].parse::<u64>().ok()?)
    };
    Some((start, end))
}
