//! JSON API endpoints.
//!
//! Handlers translate requests into [`MarketplaceAction`]s, send them
//! through the store and answer with a snapshot of the affected state.
//! Failures recorded by the reducers are mapped to HTTP errors here.
//!
//! [`MarketplaceAction`]: crate::app::MarketplaceAction

pub mod bookings;
pub mod catalog;
pub mod notifications;
pub mod onboarding;

use crate::bookings::BookingError;
use crate::catalog::CatalogError;
use crate::onboarding::{FieldError, ImageRejection};
use artistly_web::AppError;

impl From<CatalogError> for AppError {
    fn from(error: CatalogError) -> Self {
        match &error {
            CatalogError::ArtistNotFound { id } => Self::not_found("Artist", id),
            CatalogError::MissingCategory => {
                Self::validation(error.to_string()).with_details(&error)
            },
            CatalogError::IdExhausted { .. } => Self::internal(error.to_string()),
        }
    }
}

impl From<BookingError> for AppError {
    fn from(error: BookingError) -> Self {
        match &error {
            BookingError::NotFound { id } => Self::not_found("Booking", id),
            BookingError::InvalidTransition { .. } => {
                Self::conflict(error.to_string()).with_details(&error)
            },
            BookingError::InvalidInitialStatus { .. } => {
                Self::validation(error.to_string()).with_details(&error)
            },
            BookingError::IdExhausted { .. } => Self::internal(error.to_string()),
        }
    }
}

impl From<ImageRejection> for AppError {
    fn from(rejection: ImageRejection) -> Self {
        let message = rejection.to_string();
        match &rejection {
            ImageRejection::TooLarge { .. } => Self::payload_too_large(message),
            ImageRejection::UnsupportedType { .. } => Self::unsupported_media_type(message),
        }
        .with_details(&rejection)
    }
}

/// 422 carrying the per-field messages
fn field_errors(errors: &[FieldError]) -> AppError {
    AppError::validation("Please fix the highlighted fields").with_details(errors)
}
