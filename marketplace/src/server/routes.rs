//! Router configuration for the marketplace.
//!
//! Builds the complete Axum router with all endpoints.

use super::state::AppState;
use crate::api::{bookings, catalog, notifications, onboarding};
use crate::app::{MarketplaceAction, MarketplaceReducer, MarketplaceState};
use crate::environment::MarketplaceEnvironment;
use artistly_web::{
    correlation_id_layer,
    handlers::{health_check, health_check_with_store},
};
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Slack above the image limit so oversized uploads reach the reducer and
/// get a JSON 413 instead of the transport's plain one.
const UPLOAD_SLACK_BYTES: usize = 1024 * 1024;

/// Build the complete Axum router.
///
/// Health probes live at the root; everything else is nested under `/api`.
/// Every response carries `X-Correlation-ID`.
pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.store.environment().settings.max_image_bytes + UPLOAD_SLACK_BYTES;

    let api_routes = Router::new()
        // Browsing
        .route("/home", get(catalog::home))
        .route("/artists", get(catalog::list_artists))
        .route("/artists/:id", get(catalog::get_artist))
        .route("/artists/:id/quote", post(catalog::request_quote))
        .route(
            "/filters",
            get(catalog::get_filters)
                .patch(catalog::update_filters)
                .delete(catalog::clear_filters),
        )
        .route("/filters/categories/:category", post(catalog::toggle_category))
        // Bookings
        .route("/dashboard", get(bookings::dashboard))
        .route(
            "/bookings",
            get(bookings::list_bookings).post(bookings::add_booking),
        )
        .route("/bookings/:id/accept", post(bookings::accept_booking))
        .route("/bookings/:id/decline", post(bookings::decline_booking))
        // Onboarding
        .route(
            "/onboarding",
            get(onboarding::get_onboarding).patch(onboarding::update_step),
        )
        .route("/onboarding/next", post(onboarding::next_step))
        .route("/onboarding/back", post(onboarding::previous_step))
        .route("/onboarding/submit", post(onboarding::submit))
        .route("/onboarding/reset", post(onboarding::reset))
        .route(
            "/onboarding/categories/:category",
            post(onboarding::toggle_category),
        )
        .route(
            "/onboarding/languages/:language",
            post(onboarding::toggle_language),
        )
        .route(
            "/onboarding/image",
            post(onboarding::upload_image)
                .delete(onboarding::remove_image)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Notifications
        .route("/notifications", get(notifications::list_toasts))
        .route("/notifications/:id", delete(notifications::dismiss_toast));

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/health/ready",
            get(
                health_check_with_store::<
                    MarketplaceState,
                    MarketplaceAction,
                    MarketplaceEnvironment,
                    MarketplaceReducer,
                >,
            ),
        )
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
}
