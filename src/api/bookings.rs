//! Booking inquiry endpoints.

use axum::extract::{Path, State};
use axum::Json;
use tokio::task::JoinSet;

use super::{created, is_valid_email, sanitize_text, success, ApiResult};
use crate::auth::RequireAdmin;
use crate::errors::{AppError, BatchItemError};
use crate::models::{Booking, BookingRequest, BulkDeleteRequest, BulkDeleteResult};
use crate::AppState;

/// POST /api/bookings - Public booking inquiry intake.
pub async fn submit_booking(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> ApiResult<Booking> {
    let request = BookingRequest {
        name: sanitize_text(&request.name),
        email: sanitize_text(&request.email),
        phone: request.phone.as_deref().map(sanitize_text),
        company: request.company.as_deref().map(sanitize_text),
        service: request.service.as_deref().map(sanitize_text),
        preferred_date: request.preferred_date.as_deref().map(sanitize_text),
        preferred_time: request.preferred_time.as_deref().map(sanitize_text),
        budget: request.budget.as_deref().map(sanitize_text),
        message: request.message.as_deref().map(sanitize_text),
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
    if !request.privacy_consent {
        return Err(AppError::Validation(
            "Privacy consent is required".to_string(),
        ));
    }

    let booking = state.repo.create_booking(&request).await?;

    if let Some(mailer) = &state.mailer {
        if let Err(e) = mailer.send_booking_confirmation(&booking).await {
            tracing::warn!(error = %e, "Failed to send booking confirmation email");
        }
        if let Err(e) = mailer.notify_inbox_booking(&booking).await {
            tracing::warn!(error = %e, "Failed to send booking notification email");
        }
    }

    created(booking)
}

/// GET /api/bookings - Admin review of booking inquiries, newest first.
pub async fn list_bookings(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AppState>,
) -> ApiResult<Vec<Booking>> {
    success(state.repo.list_bookings().await?)
}

/// DELETE /api/bookings/:id - Delete one booking.
pub async fn delete_booking(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.repo.delete_booking(&id).await?;
    success(())
}

/// DELETE /api/bookings - Bulk delete.
///
/// Per-id deletes run concurrently; failures are collected and reported while
/// sibling deletes complete.
pub async fn bulk_delete_bookings(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<BulkDeleteRequest>,
) -> ApiResult<BulkDeleteResult> {
    let ids = request.ids;
    if ids.is_empty() {
        return Err(AppError::Validation(
            "ids must be a non-empty array".to_string(),
        ));
    }

    let mut tasks = JoinSet::new();
    for id in &ids {
        let repo = state.repo.clone();
        let id = id.clone();
        tasks.spawn(async move {
            let result = repo.delete_booking(&id).await;
            (id, result)
        });
    }

    let mut deleted = 0;
    let mut failures = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(()))) => deleted += 1,
            Ok((id, Err(e))) => failures.push(BatchItemError {
                id,
                message: e.message(),
            }),
            Err(e) => failures.push(BatchItemError {
                id: String::new(),
                message: format!("Delete task failed: {}", e),
            }),
        }
    }

    if failures.is_empty() {
        success(BulkDeleteResult {
            message: format!("Deleted {} bookings", deleted),
            deleted,
        })
    } else {
        Err(AppError::BatchFailure {
            message: format!("{} of {} booking deletes failed", failures.len(), ids.len()),
            failures,
        })
    }
}
