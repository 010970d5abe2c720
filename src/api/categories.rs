//! Service category endpoints.

use axum::extract::State;
use axum::Json;

use super::{success, ApiResult};
use crate::auth::RequireAdmin;
use crate::errors::AppError;
use crate::models::{ServiceCategory, SetCategoryImagesRequest, MAX_CATEGORY_IMAGES};
use crate::AppState;

/// GET /api/service-categories - List the seeded categories.
pub async fn list_service_categories(
    State(state): State<AppState>,
) -> ApiResult<Vec<ServiceCategory>> {
    success(state.repo.list_service_categories().await?)
}

/// PUT /api/service-categories - Replace a category's showcase references.
pub async fn set_category_images(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<SetCategoryImagesRequest>,
) -> ApiResult<ServiceCategory> {
    if request.slug.trim().is_empty() {
        return Err(AppError::Validation("Slug is required".to_string()));
    }
    if request.images.len() > MAX_CATEGORY_IMAGES {
        return Err(AppError::Validation(format!(
            "A service category holds at most {} images",
            MAX_CATEGORY_IMAGES
        )));
    }

    success(
        state
            .repo
            .set_category_images(&request.slug, &request.images)
            .await?,
    )
}
