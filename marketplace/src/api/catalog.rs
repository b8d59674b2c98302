//! Browsing API endpoints.
//!
//! - GET /api/home - Categories, price ranges and filter choices
//! - GET /api/artists - Filtered listing
//! - GET /api/artists/:id - Artist profile
//! - POST /api/artists/:id/quote - Request a quote
//! - GET/PATCH/DELETE /api/filters - Inspect, change or clear filters
//! - POST /api/filters/categories/:category - Toggle one category

use crate::app::{MarketplaceAction, MarketplaceState};
use crate::catalog::{CatalogAction, FilterState};
use crate::domain::{Artist, ArtistId, Booking, Category, PriceRange, QuoteRequest};
use crate::seed::{LANGUAGES, LOCATIONS};
use crate::server::state::AppState;
use artistly_web::AppError;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// A category card on the home page.
#[derive(Debug, Serialize)]
pub struct CategorySummary {
    /// Category
    pub id: Category,
    /// Display name
    pub name: &'static str,
    /// Emoji icon
    pub icon: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Artists listed under this category
    pub artist_count: usize,
}

/// A selectable price range.
#[derive(Debug, Serialize)]
pub struct PriceRangeOption {
    /// Wire value, e.g. `"1000-2500"`
    pub value: PriceRange,
    /// Display label
    pub label: &'static str,
}

/// Home page content.
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    /// Category cards
    pub categories: Vec<CategorySummary>,
    /// Price range choices
    pub price_ranges: Vec<PriceRangeOption>,
    /// Location choices
    pub locations: Vec<&'static str>,
    /// Language choices
    pub languages: Vec<&'static str>,
}

/// Query parameters for the listing.
#[derive(Debug, Deserialize)]
pub struct ListArtistsQuery {
    /// Preselect exactly this category
    pub category: Option<String>,
}

/// Current filter selections.
#[derive(Debug, Serialize)]
pub struct FiltersResponse {
    /// Selections
    pub filters: FilterState,
    /// Number of active filters
    pub active_count: usize,
}

/// Filtered listing.
#[derive(Debug, Serialize)]
pub struct ArtistsResponse {
    /// Artists passing every filter, in collection order
    pub artists: Vec<Artist>,
    /// Size of the whole collection
    pub total: usize,
    /// Filters that produced this listing
    #[serde(flatten)]
    pub filters: FiltersResponse,
}

/// Partial filter update. Absent fields are left alone; an empty string or
/// `"all"` clears the location or price range.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateFiltersRequest {
    /// Free-text search
    pub search: Option<String>,
    /// Category selection, replacing the current one
    pub categories: Option<Vec<Category>>,
    /// Location, matched exactly
    pub location: Option<String>,
    /// Price range value
    pub price_range: Option<String>,
}

fn unless_all(value: String) -> Option<String> {
    let cleared = value.is_empty() || value.eq_ignore_ascii_case("all");
    (!cleared).then_some(value)
}

fn parse_category(value: &str) -> Result<Category, AppError> {
    value
        .parse()
        .map_err(|_| AppError::bad_request(format!("Unknown category: {value}")))
}

fn filters_of(s: &MarketplaceState) -> FiltersResponse {
    FiltersResponse {
        filters: s.catalog.filters.clone(),
        active_count: s.catalog.active_filter_count(),
    }
}

fn listing_of(s: &MarketplaceState) -> ArtistsResponse {
    ArtistsResponse {
        artists: s.catalog.filtered.clone(),
        total: s.catalog.artists.len(),
        filters: filters_of(s),
    }
}

fn catalog(action: CatalogAction) -> MarketplaceAction {
    MarketplaceAction::Catalog(action)
}

// ============================================================================
// Handlers
// ============================================================================

/// Home page: categories with artist counts and every filter choice.
///
/// ```bash
/// curl http://localhost:8080/api/home
/// ```
pub async fn home(State(state): State<AppState>) -> Json<HomeResponse> {
    let categories = state
        .read(|s| {
            Category::ALL
                .iter()
                .map(|&category| CategorySummary {
                    id: category,
                    name: category.name(),
                    icon: category.icon(),
                    description: category.description(),
                    artist_count: s.catalog.count_in(category),
                })
                .collect()
        })
        .await;

    Json(HomeResponse {
        categories,
        price_ranges: PriceRange::ALL
            .iter()
            .map(|&range| PriceRangeOption {
                value: range,
                label: range.label(),
            })
            .collect(),
        locations: LOCATIONS.to_vec(),
        languages: LANGUAGES.to_vec(),
    })
}

/// Filtered listing. A `category` parameter replaces the category
/// selection with exactly that category before listing.
///
/// ```bash
/// curl http://localhost:8080/api/artists?category=djs
/// ```
pub async fn list_artists(
    State(state): State<AppState>,
    Query(query): Query<ListArtistsQuery>,
) -> Result<Json<ArtistsResponse>, AppError> {
    let response = match query.category.as_deref() {
        Some(category) => {
            let categories = vec![parse_category(category)?];
            state
                .dispatch_and_read(
                    catalog(CatalogAction::SetSelectedCategories { categories }),
                    listing_of,
                )
                .await?
        },
        None => state.read(listing_of).await,
    };
    Ok(Json(response))
}

/// Single artist profile.
pub async fn get_artist(
    State(state): State<AppState>,
    Path(id): Path<ArtistId>,
) -> Result<Json<Artist>, AppError> {
    state
        .read(|s| s.catalog.artist(&id).cloned())
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("Artist", &id))
}

/// Request a quote; creates a pending booking for the artist.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/artists/1/quote \
///   -H "Content-Type: application/json" \
///   -d '{"event_title":"Gala","event_date":"2025-03-01","location":"New York, NY","client_name":"Acme"}'
/// ```
pub async fn request_quote(
    State(state): State<AppState>,
    Path(artist_id): Path<ArtistId>,
    Json(request): Json<QuoteRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = state
        .dispatch_and_read(
            MarketplaceAction::RequestQuote {
                artist_id: artist_id.clone(),
                request,
            },
            |s| {
                if s.catalog.artist(&artist_id).is_none() {
                    return Err(AppError::not_found("Artist", &artist_id));
                }
                match &s.bookings.last_error {
                    Some(error) => Err(AppError::from(error.clone())),
                    None => s
                        .bookings
                        .bookings
                        .last()
                        .cloned()
                        .ok_or_else(|| AppError::internal("Quote did not produce a booking")),
                }
            },
        )
        .await??;

    tracing::info!(booking_id = %booking.id, %artist_id, "Quote requested");
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Current filter selections.
pub async fn get_filters(State(state): State<AppState>) -> Json<FiltersResponse> {
    Json(state.read(filters_of).await)
}

/// Apply any subset of filter changes.
///
/// ```bash
/// curl -X PATCH http://localhost:8080/api/filters \
///   -H "Content-Type: application/json" \
///   -d '{"search":"jazz","price_range":"1000-2500"}'
/// ```
pub async fn update_filters(
    State(state): State<AppState>,
    Json(request): Json<UpdateFiltersRequest>,
) -> Result<Json<FiltersResponse>, AppError> {
    // Parse everything before touching state so a bad value changes nothing
    let price_range = request
        .price_range
        .map(|value| {
            unless_all(value)
                .map(|value| {
                    value.parse::<PriceRange>().map_err(|_| {
                        AppError::bad_request(format!("Unknown price range: {value}"))
                    })
                })
                .transpose()
        })
        .transpose()?;

    let mut actions = Vec::new();
    if let Some(query) = request.search {
        actions.push(CatalogAction::SetSearchQuery { query });
    }
    if let Some(categories) = request.categories {
        actions.push(CatalogAction::SetSelectedCategories { categories });
    }
    if let Some(location) = request.location {
        actions.push(CatalogAction::SetLocation {
            location: unless_all(location),
        });
    }
    if let Some(price_range) = price_range {
        actions.push(CatalogAction::SetPriceRange { price_range });
    }

    let Some(last) = actions.pop() else {
        return Ok(Json(state.read(filters_of).await));
    };
    for action in actions {
        state.dispatch(catalog(action)).await?;
    }
    Ok(Json(state.dispatch_and_read(catalog(last), filters_of).await?))
}

/// Toggle one category in the selection.
pub async fn toggle_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<FiltersResponse>, AppError> {
    let category = parse_category(&category)?;
    let filters = state
        .dispatch_and_read(catalog(CatalogAction::ToggleCategory { category }), filters_of)
        .await?;
    Ok(Json(filters))
}

/// Reset every filter.
pub async fn clear_filters(
    State(state): State<AppState>,
) -> Result<Json<FiltersResponse>, AppError> {
    let filters = state
        .dispatch_and_read(catalog(CatalogAction::ClearFilters), filters_of)
        .await?;
    Ok(Json(filters))
}
