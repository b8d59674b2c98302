//! Toast API endpoints.
//!
//! - GET /api/notifications - Visible toasts, oldest first
//! - DELETE /api/notifications/:id - Dismiss a toast

use crate::app::MarketplaceAction;
use crate::notifications::{NotificationsAction, Toast};
use crate::server::state::AppState;
use artistly_web::AppError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// Visible toasts.
pub async fn list_toasts(State(state): State<AppState>) -> Json<Vec<Toast>> {
    Json(state.read(|s| s.notifications.toasts.clone()).await)
}

/// Dismiss a toast before it expires.
pub async fn dismiss_toast(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    let visible = state
        .read(|s| s.notifications.toasts.iter().any(|toast| toast.id == id))
        .await;
    if !visible {
        return Err(AppError::not_found("Toast", id));
    }

    state
        .dispatch(MarketplaceAction::Notifications(
            NotificationsAction::DismissToast { id },
        ))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
