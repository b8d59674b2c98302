//! Booking API endpoints.
//!
//! - GET /api/dashboard - Statistics plus every booking
//! - GET /api/bookings - List bookings
//! - POST /api/bookings - Add a booking
//! - POST /api/bookings/:id/accept - Confirm a pending booking
//! - POST /api/bookings/:id/decline - Reject a pending booking

use crate::app::MarketplaceAction;
use crate::bookings::BookingsAction;
use crate::dashboard::DashboardStats;
use crate::domain::{Booking, BookingId, NewBooking};
use crate::server::state::AppState;
use artistly_web::AppError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

/// Dashboard content.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Aggregates over every booking
    pub stats: DashboardStats,
    /// Bookings, oldest first
    pub bookings: Vec<Booking>,
}

/// Statistics plus the booking list.
///
/// ```bash
/// curl http://localhost:8080/api/dashboard
/// ```
pub async fn dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let response = state
        .read(|s| DashboardResponse {
            stats: DashboardStats::from_bookings(&s.bookings.bookings),
            bookings: s.bookings.bookings.clone(),
        })
        .await;
    Json(response)
}

/// Every booking, oldest first.
pub async fn list_bookings(State(state): State<AppState>) -> Json<Vec<Booking>> {
    Json(state.read(|s| s.bookings.bookings.clone()).await)
}

/// Add a booking. New bookings must be pending.
pub async fn add_booking(
    State(state): State<AppState>,
    Json(booking): Json<NewBooking>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let added = state
        .dispatch_and_read(
            MarketplaceAction::Bookings(BookingsAction::AddBooking { booking }),
            |s| match &s.bookings.last_error {
                Some(error) => Err(AppError::from(error.clone())),
                None => s
                    .bookings
                    .bookings
                    .last()
                    .cloned()
                    .ok_or_else(|| AppError::internal("Booking was not recorded")),
            },
        )
        .await??;

    Ok((StatusCode::CREATED, Json(added)))
}

/// Confirm a pending booking.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/bookings/2/accept
/// ```
pub async fn accept_booking(
    State(state): State<AppState>,
    Path(id): Path<BookingId>,
) -> Result<Json<Booking>, AppError> {
    decide(&state, BookingsAction::AcceptBooking { id: id.clone() }, &id).await
}

/// Reject a pending booking.
pub async fn decline_booking(
    State(state): State<AppState>,
    Path(id): Path<BookingId>,
) -> Result<Json<Booking>, AppError> {
    decide(&state, BookingsAction::DeclineBooking { id: id.clone() }, &id).await
}

async fn decide(
    state: &AppState,
    action: BookingsAction,
    id: &BookingId,
) -> Result<Json<Booking>, AppError> {
    state
        .dispatch_and_read(MarketplaceAction::Bookings(action), |s| {
            match &s.bookings.last_error {
                Some(error) => Err(AppError::from(error.clone())),
                None => s
                    .bookings
                    .get(id)
                    .cloned()
                    .ok_or_else(|| AppError::not_found("Booking", id)),
            }
        })
        .await?
        .map(Json)
}
