//! Artist onboarding API endpoints.
//!
//! - GET /api/onboarding - Current step, progress, draft and errors
//! - PATCH /api/onboarding - Edit draft fields
//! - POST /api/onboarding/next, /back, /submit, /reset - Navigation
//! - POST /api/onboarding/categories/:category - Toggle a category
//! - POST /api/onboarding/languages/:language - Toggle a language
//! - POST/DELETE /api/onboarding/image - Upload or remove the image

use super::field_errors;
use crate::app::{MarketplaceAction, MarketplaceState};
use crate::domain::{Artist, ArtistId, Category};
use crate::onboarding::{
    FieldError, FormStep, ImageRejection, OnboardingAction, ProfileDraft, StepInput,
};
use crate::server::state::AppState;
use artistly_web::AppError;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

/// Snapshot of the form.
#[derive(Debug, Serialize)]
pub struct OnboardingView {
    /// Current step
    pub step: FormStep,
    /// 1-based step number
    pub step_number: u8,
    /// Progress bar value
    pub progress_percent: u8,
    /// Entered data
    pub draft: ProfileDraft,
    /// Field errors from the last failed validation
    pub errors: Vec<FieldError>,
    /// Why the last image was refused
    pub image_rejection: Option<ImageRejection>,
    /// An image is still being encoded
    pub is_uploading: bool,
    /// Id of the created artist once submitted
    pub created_artist: Option<ArtistId>,
}

impl OnboardingView {
    fn of(state: &MarketplaceState) -> Self {
        let onboarding = &state.onboarding;
        Self {
            step: onboarding.step,
            step_number: onboarding.step.number(),
            progress_percent: onboarding.progress_percent(),
            draft: onboarding.draft.clone(),
            errors: onboarding.errors.clone(),
            image_rejection: onboarding.image_rejection.clone(),
            is_uploading: onboarding.is_uploading(),
            created_artist: onboarding.created_artist.clone(),
        }
    }
}

async fn view(state: &AppState) -> Json<OnboardingView> {
    Json(state.read(OnboardingView::of).await)
}

/// Sends an edit and returns the resulting form.
///
/// Edits are ignored by the reducer once the form is submitted and cannot
/// submit it themselves, so a submitted form after the edit means it was
/// already submitted before.
async fn edit(state: &AppState, action: OnboardingAction) -> Result<Json<OnboardingView>, AppError> {
    let view = state
        .dispatch_and_read(MarketplaceAction::Onboarding(action), OnboardingView::of)
        .await?;
    if view.step == FormStep::Submitted {
        return Err(already_submitted());
    }
    Ok(Json(view))
}

async fn step(state: &AppState) -> FormStep {
    state.read(|s| s.onboarding.step).await
}

fn already_submitted() -> AppError {
    AppError::conflict("Profile already submitted; reset to start over")
}

/// Current form snapshot.
pub async fn get_onboarding(State(state): State<AppState>) -> Json<OnboardingView> {
    view(&state).await
}

/// Edit fields of any step.
///
/// ```bash
/// curl -X PATCH http://localhost:8080/api/onboarding \
///   -H "Content-Type: application/json" \
///   -d '{"step":"identity","name":"Ava Brooks"}'
/// ```
pub async fn update_step(
    State(state): State<AppState>,
    Json(input): Json<StepInput>,
) -> Result<Json<OnboardingView>, AppError> {
    edit(&state, OnboardingAction::UpdateStep { input }).await
}

/// Select or deselect a category.
pub async fn toggle_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<OnboardingView>, AppError> {
    let category: Category = category
        .parse()
        .map_err(|_| AppError::bad_request(format!("Unknown category: {category}")))?;
    edit(&state, OnboardingAction::ToggleCategory { category }).await
}

/// Select or deselect a language.
pub async fn toggle_language(
    State(state): State<AppState>,
    Path(language): Path<String>,
) -> Result<Json<OnboardingView>, AppError> {
    edit(&state, OnboardingAction::ToggleLanguage { language }).await
}

/// Validate the current step and advance.
///
/// Answers 422 with the field errors when the step does not validate.
pub async fn next_step(State(state): State<AppState>) -> Result<Json<OnboardingView>, AppError> {
    match step(&state).await {
        FormStep::Image => return Err(AppError::conflict("Last step reached; submit instead")),
        FormStep::Submitted => return Err(already_submitted()),
        FormStep::Identity | FormStep::Categories | FormStep::Details => {},
    }

    let snapshot = state
        .dispatch_and_read(
            MarketplaceAction::Onboarding(OnboardingAction::NextStep),
            OnboardingView::of,
        )
        .await?;
    if !snapshot.errors.is_empty() {
        return Err(field_errors(&snapshot.errors));
    }
    Ok(Json(snapshot))
}

/// Go back one step. Earlier entries are kept.
pub async fn previous_step(
    State(state): State<AppState>,
) -> Result<Json<OnboardingView>, AppError> {
    edit(&state, OnboardingAction::PreviousStep).await
}

/// Validate every step and add the artist to the catalog.
///
/// Answers 201 with the created artist.
pub async fn submit(State(state): State<AppState>) -> Result<(StatusCode, Json<Artist>), AppError> {
    match step(&state).await {
        FormStep::Image => {},
        FormStep::Submitted => return Err(already_submitted()),
        FormStep::Identity | FormStep::Categories | FormStep::Details => {
            return Err(AppError::conflict("Complete every step before submitting"));
        },
    }

    let outcome = state
        .dispatch_and_read(MarketplaceAction::Onboarding(OnboardingAction::Submit), |s| {
            if !s.onboarding.errors.is_empty() {
                return Err(field_errors(&s.onboarding.errors));
            }
            match &s.onboarding.created_artist {
                Some(id) => s
                    .catalog
                    .artist(id)
                    .cloned()
                    .ok_or_else(|| AppError::not_found("Artist", id)),
                None => Err(s.catalog.last_error.clone().map_or_else(
                    || AppError::internal("Profile was not added to the catalog"),
                    AppError::from,
                )),
            }
        })
        .await??;

    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Start over with an empty form.
pub async fn reset(State(state): State<AppState>) -> Result<Json<OnboardingView>, AppError> {
    let view = state
        .dispatch_and_read(
            MarketplaceAction::Onboarding(OnboardingAction::Reset),
            OnboardingView::of,
        )
        .await?;
    Ok(Json(view))
}

/// Upload the profile image as the raw request body.
///
/// Answers 202 while the image is encoded, 413 when it is too large and 415
/// when it is not an image.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/onboarding/image \
///   -H "Content-Type: image/png" --data-binary @portrait.png
/// ```
pub async fn upload_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<OnboardingView>), AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let Json(snapshot) = edit(
        &state,
        OnboardingAction::SelectImage {
            content_type,
            bytes: Arc::from(body.as_ref()),
        },
    )
    .await?;

    if let Some(rejection) = snapshot.image_rejection {
        return Err(rejection.into());
    }
    Ok((StatusCode::ACCEPTED, Json(snapshot)))
}

/// Clear the profile image.
pub async fn remove_image(
    State(state): State<AppState>,
) -> Result<Json<OnboardingView>, AppError> {
    edit(&state, OnboardingAction::RemoveImage).await
}
