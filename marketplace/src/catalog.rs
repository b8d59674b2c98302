//! Artist catalog: the full collection, the active filter selections and the
//! filtered view derived from them.
//!
//! The filtered view is recomputed from scratch after every change to either
//! the collection or the selections. Filters combine with AND across
//! dimensions and OR within the category dimension.

use crate::domain::{Artist, ArtistId, Category, NewArtist, PriceRange};
use crate::environment::{MarketplaceEnvironment, MAX_ID_ATTEMPTS};
use artistly_core::{effect::Effect, reducer::Reducer, SmallVec};
use serde::Serialize;

/// Current filter selections
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    /// Free-text search over name and bio; empty means inactive
    pub search: String,
    /// Selected categories; empty means inactive
    pub categories: Vec<Category>,
    /// Location substring; `None` or empty means inactive
    pub location: Option<String>,
    /// Exact price bucket; `None` means inactive
    pub price_range: Option<PriceRange>,
}

impl FilterState {
    /// Whether `artist` satisfies every active filter
    #[must_use]
    pub fn matches(&self, artist: &Artist) -> bool {
        self.matches_search(artist)
            && self.matches_category(artist)
            && self.matches_location(artist)
            && self.matches_price(artist)
    }

    fn matches_search(&self, artist: &Artist) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        artist.name.to_lowercase().contains(&needle) || artist.bio.to_lowercase().contains(&needle)
    }

    fn matches_category(&self, artist: &Artist) -> bool {
        self.categories.is_empty()
            || artist
                .category
                .iter()
                .any(|category| self.categories.contains(category))
    }

    fn matches_location(&self, artist: &Artist) -> bool {
        match self.location.as_deref() {
            None | Some("") => true,
            Some(location) => artist.location.contains(location),
        }
    }

    fn matches_price(&self, artist: &Artist) -> bool {
        self.price_range
            .is_none_or(|range| artist.price_range == range)
    }

    /// Number of active selections (search text is not counted)
    #[must_use]
    pub fn active_count(&self) -> usize {
        let location = self.location.as_deref().is_some_and(|l| !l.is_empty());
        self.categories.len() + usize::from(location) + usize::from(self.price_range.is_some())
    }

    /// Whether no filter is active, search included
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.active_count() == 0
    }
}

/// Returns the artists matching `filters`, preserving collection order
#[must_use]
pub fn apply_filters(artists: &[Artist], filters: &FilterState) -> Vec<Artist> {
    artists
        .iter()
        .filter(|artist| filters.matches(artist))
        .cloned()
        .collect()
}

/// Catalog failures, recorded in [`CatalogState::last_error`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogError {
    /// No artist has this id
    #[error("Artist with ID {id} not found")]
    ArtistNotFound {
        /// Requested id
        id: ArtistId,
    },
    /// Artists must be listed under at least one category
    #[error("Artist must have at least one category")]
    MissingCategory,
    /// Every drawn id candidate was already in use
    #[error("Could not allocate an unused artist id after {attempts} attempts")]
    IdExhausted {
        /// Candidates drawn
        attempts: usize,
    },
}

/// State of the artist catalog
#[derive(Clone, Debug, Default, Serialize)]
pub struct CatalogState {
    /// Every artist, in insertion order
    pub artists: Vec<Artist>,
    /// Artists matching `filters`, in insertion order
    pub filtered: Vec<Artist>,
    /// Current selections
    pub filters: FilterState,
    /// Last validation error (if any)
    pub last_error: Option<CatalogError>,
}

impl CatalogState {
    /// Creates a catalog holding `artists` with no filters applied
    #[must_use]
    pub fn with_artists(artists: Vec<Artist>) -> Self {
        Self {
            filtered: artists.clone(),
            artists,
            filters: FilterState::default(),
            last_error: None,
        }
    }

    /// Returns an artist by ID
    #[must_use]
    pub fn artist(&self, id: &ArtistId) -> Option<&Artist> {
        self.artists.iter().find(|artist| &artist.id == id)
    }

    /// Checks if an artist exists
    #[must_use]
    pub fn exists(&self, id: &str) -> bool {
        self.artists.iter().any(|artist| artist.id.as_str() == id)
    }

    /// Number of active filter selections
    #[must_use]
    pub fn active_filter_count(&self) -> usize {
        self.filters.active_count()
    }

    /// Number of artists listed under `category`
    #[must_use]
    pub fn count_in(&self, category: Category) -> usize {
        self.artists
            .iter()
            .filter(|artist| artist.has_category(category))
            .count()
    }

    fn recompute(&mut self) {
        self.filtered = apply_filters(&self.artists, &self.filters);
    }
}

/// Commands and events for the catalog
#[derive(Clone, Debug, PartialEq)]
pub enum CatalogAction {
    // ========== Commands ==========
    /// Command: Replace the search text
    SetSearchQuery {
        /// New search text
        query: String,
    },
    /// Command: Replace the category selection
    SetSelectedCategories {
        /// New selection
        categories: Vec<Category>,
    },
    /// Command: Select a category, or deselect it when already selected
    ToggleCategory {
        /// Category to flip
        category: Category,
    },
    /// Command: Replace the location selection
    SetLocation {
        /// New location, `None` to clear
        location: Option<String>,
    },
    /// Command: Replace the price selection
    SetPriceRange {
        /// New bucket, `None` to clear
        price_range: Option<PriceRange>,
    },
    /// Command: Reset every selection
    ClearFilters,
    /// Command: Add a new artist to the collection
    AddArtist {
        /// Artist record without an id
        artist: NewArtist,
    },

    // ========== Events ==========
    /// Event: An artist was added
    ArtistAdded {
        /// The stored artist
        artist: Artist,
    },
    /// Event: A command was rejected
    ValidationFailed {
        /// Why
        error: CatalogError,
    },
}

/// Reducer for the artist catalog
#[derive(Clone, Debug, Default)]
pub struct CatalogReducer;

impl CatalogReducer {
    /// Creates a new `CatalogReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates an `AddArtist` command
    fn validate_add_artist(artist: &NewArtist) -> Result<(), CatalogError> {
        if artist.category.is_empty() {
            return Err(CatalogError::MissingCategory);
        }
        Ok(())
    }

    /// Applies an event to state
    fn apply_event(state: &mut CatalogState, action: &CatalogAction) {
        match action {
            CatalogAction::ArtistAdded { artist } => {
                state.artists.push(artist.clone());
                state.recompute();
                state.last_error = None;
            },
            CatalogAction::ValidationFailed { error } => {
                state.last_error = Some(error.clone());
            },
            // Commands are not applied to state
            CatalogAction::SetSearchQuery { .. }
            | CatalogAction::SetSelectedCategories { .. }
            | CatalogAction::ToggleCategory { .. }
            | CatalogAction::SetLocation { .. }
            | CatalogAction::SetPriceRange { .. }
            | CatalogAction::ClearFilters
            | CatalogAction::AddArtist { .. } => {},
        }
    }

    fn reject(state: &mut CatalogState, error: CatalogError) {
        tracing::warn!(%error, "Catalog command rejected");
        metrics::counter!("marketplace.validation.failed", "feature" => "catalog").increment(1);
        Self::apply_event(state, &CatalogAction::ValidationFailed { error });
    }
}

impl Reducer for CatalogReducer {
    type State = CatalogState;
    type Action = CatalogAction;
    type Environment = MarketplaceEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            CatalogAction::SetSearchQuery { query } => {
                state.filters.search = query;
                state.recompute();
            },
            CatalogAction::SetSelectedCategories { categories } => {
                state.filters.categories = categories;
                state.recompute();
            },
            CatalogAction::ToggleCategory { category } => {
                let selected = &mut state.filters.categories;
                if let Some(index) = selected.iter().position(|c| *c == category) {
                    selected.remove(index);
                } else {
                    selected.push(category);
                }
                state.recompute();
            },
            CatalogAction::SetLocation { location } => {
                state.filters.location = location;
                state.recompute();
            },
            CatalogAction::SetPriceRange { price_range } => {
                state.filters.price_range = price_range;
                state.recompute();
            },
            CatalogAction::ClearFilters => {
                state.filters = FilterState::default();
                state.recompute();
            },
            CatalogAction::AddArtist { artist } => {
                if let Err(error) = Self::validate_add_artist(&artist) {
                    Self::reject(state, error);
                    return SmallVec::new();
                }

                let Some(id) = env.fresh_id(|candidate| state.exists(candidate)) else {
                    Self::reject(
                        state,
                        CatalogError::IdExhausted {
                            attempts: MAX_ID_ATTEMPTS,
                        },
                    );
                    return SmallVec::new();
                };

                let artist = Artist::from_new(ArtistId::new(id), artist);
                tracing::info!(artist_id = %artist.id, name = %artist.name, "Artist added");
                metrics::counter!("marketplace.artists.added").increment(1);

                Self::apply_event(state, &CatalogAction::ArtistAdded { artist });
            },

            // ========== Events ==========
            CatalogAction::ArtistAdded { .. } | CatalogAction::ValidationFailed { .. } => {
                Self::apply_event(state, &action);
            },
        }

        SmallVec::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::Rating;
    use crate::environment::MarketplaceSettings;
    use crate::seed::sample_artists;
    use artistly_testing::{
        assertions, properties, test_clock, ConstantIdGenerator, ReducerTest,
        SequentialIdGenerator,
    };
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn test_env() -> MarketplaceEnvironment {
        MarketplaceEnvironment::new(
            Arc::new(test_clock()),
            Arc::new(SequentialIdGenerator::new("")),
            MarketplaceSettings::default(),
        )
    }

    fn names(artists: &[Artist]) -> Vec<&str> {
        artists.iter().map(|artist| artist.name.as_str()).collect()
    }

    fn new_artist(category: Vec<Category>) -> NewArtist {
        NewArtist {
            name: "Nina Park".to_string(),
            category,
            bio: "Classical violinist performing weddings, galas and private recitals".to_string(),
            price_range: PriceRange::From1000To2500,
            location: "Houston, TX".to_string(),
            languages: vec!["English".to_string(), "Korean".to_string()],
            image: "https://example.com/nina.jpg".to_string(),
            rating: Rating::MAX,
            review_count: 0,
            verified: false,
            availability: "Available".to_string(),
        }
    }

    #[test]
    fn search_jazz_finds_sarah_johnson() {
        ReducerTest::new(CatalogReducer::new())
            .with_env(test_env())
            .given_state(CatalogState::with_artists(sample_artists()))
            .when_action(CatalogAction::SetSearchQuery {
                query: "JaZz".to_string(),
            })
            .then_state(|state| assert_eq!(names(&state.filtered), vec!["Sarah Johnson"]))
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn category_djs_finds_alex_rivera() {
        ReducerTest::new(CatalogReducer::new())
            .with_env(test_env())
            .given_state(CatalogState::with_artists(sample_artists()))
            .when_action(CatalogAction::SetSelectedCategories {
                categories: vec![Category::Djs],
            })
            .then_state(|state| assert_eq!(names(&state.filtered), vec!["DJ Alex Rivera"]))
            .run();
    }

    #[test]
    fn category_filter_matches_any_listed_category() {
        ReducerTest::new(CatalogReducer::new())
            .with_env(test_env())
            .given_state(CatalogState::with_artists(sample_artists()))
            .when_action(CatalogAction::ToggleCategory {
                category: Category::Singers,
            })
            .then_state(|state| {
                assert_eq!(
                    names(&state.filtered),
                    vec!["Sarah Johnson", "Marcus Thompson"]
                );
            })
            .run();
    }

    #[test]
    fn filters_combine_with_and() {
        ReducerTest::new(CatalogReducer::new())
            .with_env(test_env())
            .given_state(CatalogState::with_artists(sample_artists()))
            .when_actions([
                CatalogAction::SetPriceRange {
                    price_range: Some(PriceRange::From2500To5000),
                },
                CatalogAction::SetLocation {
                    location: Some("WA".to_string()),
                },
            ])
            .then_state(|state| {
                assert_eq!(names(&state.filtered), vec!["Emily Chen"]);
                assert_eq!(state.active_filter_count(), 2);
            })
            .run();
    }

    #[test]
    fn location_match_is_case_sensitive() {
        ReducerTest::new(CatalogReducer::new())
            .with_env(test_env())
            .given_state(CatalogState::with_artists(sample_artists()))
            .when_action(CatalogAction::SetLocation {
                location: Some("miami".to_string()),
            })
            .then_state(|state| assert!(state.filtered.is_empty()))
            .run();
    }

    #[test]
    fn toggle_twice_and_clear_restore_everything() {
        ReducerTest::new(CatalogReducer::new())
            .with_env(test_env())
            .given_state(CatalogState::with_artists(sample_artists()))
            .when_actions([
                CatalogAction::ToggleCategory {
                    category: Category::Bands,
                },
                CatalogAction::ToggleCategory {
                    category: Category::Bands,
                },
                CatalogAction::SetSearchQuery {
                    query: "nothing matches this".to_string(),
                },
                CatalogAction::ClearFilters,
            ])
            .then_state(|state| {
                assert_eq!(state.filtered, state.artists);
                assert!(state.filters.is_empty());
            })
            .run();
    }

    #[test]
    fn add_artist_assigns_unused_id_and_recomputes() {
        ReducerTest::new(CatalogReducer::new())
            .with_env(test_env())
            .given_state(CatalogState::with_artists(sample_artists()))
            .when_actions([
                CatalogAction::SetSelectedCategories {
                    categories: vec![Category::Djs],
                },
                CatalogAction::AddArtist {
                    artist: new_artist(vec![Category::Singers]),
                },
            ])
            .then_state(|state| {
                assert_eq!(state.artists.len(), 7);
                let added = state.artists.last().unwrap();
                // Sequential ids 1..=6 collide with the sample data.
                assert_eq!(added.id.as_str(), "7");
                // Not a DJ, so it stays out of the filtered view.
                assert_eq!(names(&state.filtered), vec!["DJ Alex Rivera"]);
                assert!(state.last_error.is_none());
            })
            .run();
    }

    #[test]
    fn add_artist_without_category_is_rejected() {
        ReducerTest::new(CatalogReducer::new())
            .with_env(test_env())
            .given_state(CatalogState::with_artists(sample_artists()))
            .when_action(CatalogAction::AddArtist {
                artist: new_artist(Vec::new()),
            })
            .then_state(|state| {
                assert_eq!(state.artists.len(), 6);
                assert_eq!(state.last_error, Some(CatalogError::MissingCategory));
            })
            .run();
    }

    #[test]
    fn add_artist_gives_up_when_every_id_is_taken() {
        let env = MarketplaceEnvironment::new(
            Arc::new(test_clock()),
            Arc::new(ConstantIdGenerator("3".to_string())),
            MarketplaceSettings::default(),
        );

        ReducerTest::new(CatalogReducer::new())
            .with_env(env)
            .given_state(CatalogState::with_artists(sample_artists()))
            .when_action(CatalogAction::AddArtist {
                artist: new_artist(vec![Category::Bands]),
            })
            .then_state(|state| {
                assert_eq!(state.artists.len(), 6);
                assert!(matches!(
                    state.last_error,
                    Some(CatalogError::IdExhausted { .. })
                ));
            })
            .run();
    }

    fn category_set() -> impl Strategy<Value = Vec<Category>> {
        proptest::sample::subsequence(Category::ALL.to_vec(), 0..=Category::ALL.len())
    }

    fn price_range() -> impl Strategy<Value = Option<PriceRange>> {
        proptest::option::of(proptest::sample::select(PriceRange::ALL.to_vec()))
    }

    fn filters() -> impl Strategy<Value = FilterState> {
        (
            properties::search_query(),
            category_set(),
            properties::location(),
            price_range(),
        )
            .prop_map(|(search, categories, location, price_range)| FilterState {
                search,
                categories,
                location,
                price_range,
            })
    }

    /// Positions passing every filter, built as the intersection of one
    /// position set per criterion.
    fn expected_positions(artists: &[Artist], filters: &FilterState) -> BTreeSet<usize> {
        let all: BTreeSet<usize> = (0..artists.len()).collect();
        let keep = |test: &dyn Fn(&Artist) -> bool| -> BTreeSet<usize> {
            all.iter().copied().filter(|&i| test(&artists[i])).collect()
        };

        let needle = filters.search.to_lowercase();
        let by_search = keep(&|a: &Artist| {
            needle.is_empty()
                || a.name.to_lowercase().contains(&needle)
                || a.bio.to_lowercase().contains(&needle)
        });
        let by_category = keep(&|a: &Artist| {
            filters.categories.is_empty()
                || filters.categories.iter().any(|c| a.category.contains(c))
        });
        let by_location = keep(&|a: &Artist| match &filters.location {
            Some(location) if !location.is_empty() => a.location.contains(location.as_str()),
            _ => true,
        });
        let by_price = keep(&|a: &Artist| filters.price_range.is_none_or(|p| p == a.price_range));

        [by_category, by_location, by_price]
            .iter()
            .fold(by_search, |acc, set| acc.intersection(set).copied().collect())
    }

    proptest! {
        #[test]
        fn filtered_view_is_exactly_the_matching_subset(filters in filters()) {
            let artists = sample_artists();
            let filtered = apply_filters(&artists, &filters);

            let expected: Vec<Artist> = expected_positions(&artists, &filters)
                .into_iter()
                .map(|i| artists[i].clone())
                .collect();
            prop_assert_eq!(&filtered, &expected);

            if filters.is_empty() {
                prop_assert_eq!(&filtered, &artists);
            }
        }

        #[test]
        fn selecting_first_category_never_grows_the_result(
            filters in filters(),
            category in proptest::sample::select(Category::ALL.to_vec()),
        ) {
            let artists = sample_artists();
            let unfiltered = FilterState { categories: Vec::new(), ..filters };
            let narrowed = FilterState { categories: vec![category], ..unfiltered.clone() };

            prop_assert!(
                apply_filters(&artists, &narrowed).len() <= apply_filters(&artists, &unfiltered).len()
            );
        }

        #[test]
        fn removing_active_category_never_shrinks_the_result(
            filters in filters(),
            category in proptest::sample::select(Category::ALL.to_vec()),
        ) {
            let artists = sample_artists();
            let mut with = filters.clone();
            if !with.categories.contains(&category) {
                with.categories.push(category);
            }
            let mut without = with.clone();
            without.categories.retain(|c| *c != category);

            prop_assert!(
                apply_filters(&artists, &without).len() >= apply_filters(&artists, &with).len()
            );
        }

        #[test]
        fn clearing_after_any_sequence_restores_collection(
            steps in proptest::collection::vec((filters(), proptest::sample::select(Category::ALL.to_vec())), 1..6),
        ) {
            let reducer = CatalogReducer::new();
            let env = test_env();
            let mut state = CatalogState::with_artists(sample_artists());

            for (filters, category) in steps {
                reducer.reduce(&mut state, CatalogAction::SetSearchQuery { query: filters.search }, &env);
                reducer.reduce(&mut state, CatalogAction::SetSelectedCategories { categories: filters.categories }, &env);
                reducer.reduce(&mut state, CatalogAction::ToggleCategory { category }, &env);
                reducer.reduce(&mut state, CatalogAction::SetLocation { location: filters.location }, &env);
                reducer.reduce(&mut state, CatalogAction::SetPriceRange { price_range: filters.price_range }, &env);
            }
            reducer.reduce(&mut state, CatalogAction::ClearFilters, &env);

            prop_assert_eq!(&state.filtered, &state.artists);
        }
    }
}
