//! Hero slot endpoints: the landing-page configuration.

use axum::extract::{Multipart, State};
use axum::Json;

use super::{success, ApiResult};
use crate::auth::RequireAdmin;
use crate::errors::AppError;
use crate::media::StoredObject;
use crate::models::{HeroSlot, SaveHeroRequest, MAX_SLOT_DESCRIPTIONS};
use crate::AppState;

/// Accepted kind discriminators for hero asset uploads.
const HERO_ASSET_KINDS: &[&str] = &["background", "navigation"];

/// GET /api/hero-projects - Current hero configuration, sorted by position.
pub async fn get_hero_slots(State(state): State<AppState>) -> ApiResult<Vec<HeroSlot>> {
    success(state.repo.list_hero_slots().await?)
}

/// POST /api/hero-projects - Replace the whole slot set.
///
/// Validation runs before any store access, so a rejected save leaves the
/// existing configuration untouched.
pub async fn save_hero_slots(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<SaveHeroRequest>,
) -> ApiResult<Vec<HeroSlot>> {
    let slots = request.hero_projects;
    let cap = state.config.hero_slot_cap;

    if slots.len() > cap {
        return Err(AppError::Validation(format!(
            "At most {} hero projects are allowed",
            cap
        )));
    }
    for slot in &slots {
        if slot.project_id.trim().is_empty() {
            return Err(AppError::Validation(
                "Each hero project needs a projectId".to_string(),
            ));
        }
        if slot.descriptions.len() > MAX_SLOT_DESCRIPTIONS {
            return Err(AppError::Validation(format!(
                "A hero project carries at most {} descriptions",
                MAX_SLOT_DESCRIPTIONS
            )));
        }
    }

    success(state.repo.replace_hero_slots(&slots).await?)
}

/// DELETE /api/hero-projects - Clear every slot.
pub async fn clear_hero_slots(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AppState>,
) -> ApiResult<()> {
    state.repo.clear_hero_slots().await?;
    success(())
}

/// POST /api/hero-projects/upload - Store a hero asset image.
///
/// Multipart fields: `file` (the image) and `type` (background | navigation).
pub async fn upload_hero_asset(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<StoredObject> {
    let mut kind = None;
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "type" => {
                kind = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Invalid multipart field: {}", e))
                })?)
            }
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

    let kind = kind.ok_or_else(|| AppError::Validation("Upload type is required".to_string()))?;
    if !HERO_ASSET_KINDS.contains(&kind.as_str()) {
        return Err(AppError::Validation(format!(
            "Upload type must be one of: {}",
            HERO_ASSET_KINDS.join(", ")
        )));
    }
    let (file_name, content_type, bytes) =
        file.ok_or_else(|| AppError::Validation("Image file is required".to_string()))?;

    success(
        state
            .media
            .store_image(&kind, &file_name, &content_type, &bytes)
            .await?,
    )
}
