//! Contact form endpoints.

use axum::extract::{Path, State};
use axum::Json;

use super::{created, is_valid_email, sanitize_text, success, ApiResult};
use crate::auth::RequireAdmin;
use crate::errors::AppError;
use crate::models::{ContactRequest, ContactSubmission};
use crate::AppState;

/// POST /api/contact - Public contact form intake.
///
/// Validation and sanitization run before the row is written. Email dispatch
/// is best-effort: failures are logged and the submission still succeeds.
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> ApiResult<ContactSubmission> {
    let request = ContactRequest {
        name: sanitize_text(&request.name),
        email: sanitize_text(&request.email),
        phone: request.phone.as_deref().map(sanitize_text),
        company: request.company.as_deref().map(sanitize_text),
        message: sanitize_text(&request.message),
        privacy_consent: request.privacy_consent,
        marketing_consent: request.marketing_consent,
    };

    if request.name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if !is_valid_email(&request.email) {
        return Err(AppError::Validation(
            "A valid email address is required".to_string(),
        ));
    }
    if request.message.is_empty() {
        return Err(AppError::Validation("Message is required".to_string()));
    }
    if !request.privacy_consent {
        return Err(AppError::Validation(
            "Privacy consent is required".to_string(),
        ));
    }

    let submission = state.repo.create_contact(&request).await?;

    if let Some(mailer) = &state.mailer {
        if let Err(e) = mailer.send_contact_confirmation(&submission).await {
            tracing::warn!(error = %e, "Failed to send contact confirmation email");
        }
        if let Err(e) = mailer.notify_inbox_contact(&submission).await {
            tracing::warn!(error = %e, "Failed to send contact notification email");
        }
    }

    created(submission)
}

/// GET /api/contacts - Admin review of contact submissions, newest first.
pub async fn list_contacts(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AppState>,
) -> ApiResult<Vec<ContactSubmission>> {
    success(state.repo.list_contacts().await?)
}

/// DELETE /api/contacts/:id - Delete one contact submission.
pub async fn delete_contact(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.repo.delete_contact(&id).await?;
    success(())
}
