//! Portfolio project endpoints.

use std::collections::HashSet;

use axum::extract::{Multipart, Path, State};
use axum::Json;
use tokio::task::JoinSet;

use super::{created, success, ApiResult};
use crate::auth::RequireAdmin;
use crate::errors::{AppError, BatchItemError};
use crate::models::{NewProject, Project, ReorderRequest, ReorderResult};
use crate::AppState;

/// Media namespace for project images.
const PROJECT_IMAGE_KIND: &str = "project";

/// GET /api/projects - List all projects, sorted by rank ascending.
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Vec<Project>> {
    success(state.repo.list_projects().await?)
}

/// POST /api/projects - Create a project from a multipart form.
///
/// The image upload is reserved first; a failed database insert triggers the
/// compensating delete so no orphan is left behind on the happy-path failure.
pub async fn create_project(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Project> {
    let mut title = None;
    let mut categories_raw = None;
    let mut description = None;
    let mut link = None;
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "title" => title = Some(read_text_field(field).await?),
            "categories" => categories_raw = Some(read_text_field(field).await?),
            "description" => description = Some(read_text_field(field).await?),
            "link" => link = Some(read_text_field(field).await?),
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid file upload: {}", e)))?;
                file = Some((file_name, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let title = title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Title is required".to_string()))?;
    let description = description
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Description is required".to_string()))?;
    let categories: Vec<String> = match categories_raw {
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|_| AppError::Validation("Categories must be a JSON array".to_string()))?,
        None => Vec::new(),
    };
    let (file_name, content_type, bytes) =
        file.ok_or_else(|| AppError::Validation("Image file is required".to_string()))?;

    let pending = state
        .media
        .reserve_image(PROJECT_IMAGE_KIND, &file_name, &content_type, &bytes)
        .await?;

    let new = NewProject {
        title,
        categories,
        description,
        image_url: Some(pending.object().url.clone()),
        image_path: Some(pending.object().file_path.clone()),
        link: link.filter(|l| !l.trim().is_empty()),
    };

    match state.repo.create_project(&new).await {
        Ok(project) => {
            pending.commit();
            created(project)
        }
        Err(e) => {
            // abort() reports Compensated vs Orphaned and logs either way
            pending.abort().await;
            Err(e)
        }
    }
}

/// PUT /api/projects/reorder - Rewrite every listed project's rank to its
/// index in the submitted list.
///
/// Per-item updates run concurrently; failures are collected and reported
/// while sibling updates complete. Commit order across items is not defined.
pub async fn reorder_projects(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<ReorderRequest>,
) -> ApiResult<ReorderResult> {
    let ids = request.project_ids;
    if ids.is_empty() {
        return Err(AppError::Validation(
            "projectIds must be a non-empty array".to_string(),
        ));
    }
    if ids.iter().any(|id| id.trim().is_empty()) {
        return Err(AppError::Validation(
            "projectIds must not contain empty identifiers".to_string(),
        ));
    }
    let unique: HashSet<&String> = ids.iter().collect();
    if unique.len() != ids.len() {
        return Err(AppError::Validation(
            "projectIds must not contain duplicates".to_string(),
        ));
    }

    let mut tasks = JoinSet::new();
    for (index, id) in ids.iter().enumerate() {
        let repo = state.repo.clone();
        let id = id.clone();
        tasks.spawn(async move {
            let result = repo.set_order_position(&id, index as i64).await;
            (id, result)
        });
    }

    let mut updated = 0;
    let mut failures = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(()))) => updated += 1,
            Ok((id, Err(e))) => failures.push(BatchItemError {
                id,
                message: e.message(),
            }),
            Err(e) => failures.push(BatchItemError {
                id: String::new(),
                message: format!("Update task failed: {}", e),
            }),
        }
    }

    if failures.is_empty() {
        success(ReorderResult {
            message: format!("Reordered {} projects", updated),
            updated,
        })
    } else {
        Err(AppError::BatchFailure {
            message: format!("{} of {} reorder updates failed", failures.len(), ids.len()),
            failures,
        })
    }
}

/// DELETE /api/projects/:id - Delete a project and best-effort delete its
/// stored image. Remaining ranks keep their gaps.
pub async fn delete_project(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let project = state.repo.delete_project(&id).await?;

    if let Some(image_path) = project.image_path {
        state.media.remove(&image_path).await;
    }

    success(())
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart field: {}", e)))
}
