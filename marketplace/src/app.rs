//! The composed marketplace reducer.
//!
//! Each feature reducer is scoped to its slice of [`MarketplaceState`] and
//! its arm of [`MarketplaceAction`], and the scoped reducers are combined
//! into one. [`MarketplaceReducer`] wraps that combination and coordinates
//! the features: after a feature has handled an action it inspects the
//! outcome and dispatches follow-up actions in the same reduction, so every
//! consequence of a request is visible when `Store::send` returns.
//!
//! | Trigger | Follow-up |
//! |---|---|
//! | onboarding submitted | catalog `AddArtist`, success toast |
//! | catalog refused the profile | form back at the image step, error toast |
//! | image refused | error toast |
//! | booking accepted / declined | success toast |
//! | `RequestQuote` | bookings `AddBooking`, success toast |

use crate::bookings::{BookingsAction, BookingsReducer, BookingsState};
use crate::catalog::{CatalogAction, CatalogError, CatalogReducer, CatalogState};
use crate::domain::{ArtistId, BookingStatus, NewBooking, QuoteRequest};
use crate::environment::MarketplaceEnvironment;
use crate::notifications::{
    NotificationsAction, NotificationsReducer, NotificationsState, BOOKING_ACCEPTED,
    BOOKING_DECLINED, PROFILE_CREATED, QUOTE_REQUESTED,
};
use crate::onboarding::{
    FieldError, FormStep, OnboardingAction, OnboardingReducer, OnboardingState,
};
use crate::seed::{sample_artists, sample_bookings};
use artistly_core::{
    composition::{combine_reducers, scope_reducer, BoxedReducer, CombinedReducer},
    effect::Effect,
    reducer::Reducer,
    SmallVec,
};
use serde::Serialize;

/// Everything one marketplace session holds
#[derive(Clone, Debug, Default, Serialize)]
pub struct MarketplaceState {
    /// Artists and filters
    pub catalog: CatalogState,
    /// Booking requests
    pub bookings: BookingsState,
    /// Profile creation form
    pub onboarding: OnboardingState,
    /// Visible toasts
    pub notifications: NotificationsState,
}

impl MarketplaceState {
    /// Empty marketplace
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marketplace holding the sample artists and bookings
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            catalog: CatalogState::with_artists(sample_artists()),
            bookings: BookingsState::with_bookings(sample_bookings()),
            ..Self::default()
        }
    }

    fn catalog_mut(&mut self) -> &mut CatalogState {
        &mut self.catalog
    }

    fn bookings_mut(&mut self) -> &mut BookingsState {
        &mut self.bookings
    }

    fn onboarding_mut(&mut self) -> &mut OnboardingState {
        &mut self.onboarding
    }

    fn notifications_mut(&mut self) -> &mut NotificationsState {
        &mut self.notifications
    }
}

/// Every action the marketplace accepts
#[derive(Clone, Debug, PartialEq)]
pub enum MarketplaceAction {
    /// Catalog actions
    Catalog(CatalogAction),
    /// Booking actions
    Bookings(BookingsAction),
    /// Onboarding actions
    Onboarding(OnboardingAction),
    /// Toast actions
    Notifications(NotificationsAction),
    /// Request a quote from a listed artist, creating a pending booking
    RequestQuote {
        /// Artist being asked
        artist_id: ArtistId,
        /// Event details
        request: QuoteRequest,
    },
}

impl MarketplaceAction {
    fn into_catalog(self) -> Option<CatalogAction> {
        match self {
            Self::Catalog(action) => Some(action),
            _ => None,
        }
    }

    fn into_bookings(self) -> Option<BookingsAction> {
        match self {
            Self::Bookings(action) => Some(action),
            _ => None,
        }
    }

    fn into_onboarding(self) -> Option<OnboardingAction> {
        match self {
            Self::Onboarding(action) => Some(action),
            _ => None,
        }
    }

    fn into_notifications(self) -> Option<NotificationsAction> {
        match self {
            Self::Notifications(action) => Some(action),
            _ => None,
        }
    }
}

/// Outcomes the coordinator checks after the features have run
#[derive(Clone, Copy, Debug)]
enum Trigger {
    Nothing,
    Submit,
    ImageSelected,
    BookingDecision(BookingStatus),
}

impl Trigger {
    const fn of(action: &MarketplaceAction) -> Self {
        match action {
            MarketplaceAction::Onboarding(OnboardingAction::Submit) => Self::Submit,
            MarketplaceAction::Onboarding(OnboardingAction::SelectImage { .. }) => {
                Self::ImageSelected
            },
            MarketplaceAction::Bookings(BookingsAction::AcceptBooking { .. }) => {
                Self::BookingDecision(BookingStatus::Confirmed)
            },
            MarketplaceAction::Bookings(BookingsAction::DeclineBooking { .. }) => {
                Self::BookingDecision(BookingStatus::Rejected)
            },
            MarketplaceAction::Bookings(BookingsAction::UpdateBookingStatus { status, .. }) => {
                Self::BookingDecision(*status)
            },
            _ => Self::Nothing,
        }
    }
}

type Effects = SmallVec<[Effect<MarketplaceAction>; 4]>;

/// Root reducer of the marketplace
pub struct MarketplaceReducer {
    features: CombinedReducer<MarketplaceState, MarketplaceAction, MarketplaceEnvironment>,
}

impl MarketplaceReducer {
    /// Creates the reducer with every feature wired in
    #[must_use]
    pub fn new() -> Self {
        let features: Vec<BoxedReducer<MarketplaceState, MarketplaceAction, MarketplaceEnvironment>> = vec![
            Box::new(scope_reducer(
                CatalogReducer::new(),
                MarketplaceState::catalog_mut,
                MarketplaceAction::into_catalog,
                MarketplaceAction::Catalog,
            )),
            Box::new(scope_reducer(
                BookingsReducer::new(),
                MarketplaceState::bookings_mut,
                MarketplaceAction::into_bookings,
                MarketplaceAction::Bookings,
            )),
            Box::new(scope_reducer(
                OnboardingReducer::new(),
                MarketplaceState::onboarding_mut,
                MarketplaceAction::into_onboarding,
                MarketplaceAction::Onboarding,
            )),
            Box::new(scope_reducer(
                NotificationsReducer::new(),
                MarketplaceState::notifications_mut,
                MarketplaceAction::into_notifications,
                MarketplaceAction::Notifications,
            )),
        ];

        Self {
            features: combine_reducers(features),
        }
    }

    fn toast(
        &self,
        state: &mut MarketplaceState,
        toast: NotificationsAction,
        env: &MarketplaceEnvironment,
    ) -> Effects {
        self.reduce(state, MarketplaceAction::Notifications(toast), env)
    }

    fn request_quote(
        &self,
        state: &mut MarketplaceState,
        artist_id: ArtistId,
        request: QuoteRequest,
        env: &MarketplaceEnvironment,
    ) -> Effects {
        let Some(artist) = state.catalog.artist(&artist_id) else {
            tracing::warn!(%artist_id, "Quote requested for unknown artist");
            let error = CatalogError::ArtistNotFound { id: artist_id };
            return self.reduce(
                state,
                MarketplaceAction::Catalog(CatalogAction::ValidationFailed { error }),
                env,
            );
        };

        let booking = NewBooking {
            artist_name: artist.name.clone(),
            fee: request.fee.unwrap_or_else(|| artist.price_range.min_fee()),
            artist_id,
            event_title: request.event_title,
            event_date: request.event_date,
            location: request.location,
            client_name: request.client_name,
            status: BookingStatus::Pending,
        };

        let mut effects = self.reduce(
            state,
            MarketplaceAction::Bookings(BookingsAction::AddBooking { booking }),
            env,
        );
        if state.bookings.last_error.is_none() {
            effects.extend(self.toast(state, NotificationsAction::success(QUOTE_REQUESTED), env));
        }
        effects
    }

    fn react(
        &self,
        state: &mut MarketplaceState,
        trigger: Trigger,
        was_submitted: bool,
        env: &MarketplaceEnvironment,
    ) -> Effects {
        match trigger {
            Trigger::Submit if !was_submitted && state.onboarding.step == FormStep::Submitted => {
                self.add_submitted_artist(state, env)
            },
            Trigger::ImageSelected if !was_submitted => {
                match state.onboarding.image_rejection.as_ref() {
                    Some(rejection) => {
                        let message = rejection.to_string();
                        self.toast(state, NotificationsAction::error(message), env)
                    },
                    None => SmallVec::new(),
                }
            },
            Trigger::BookingDecision(status) if state.bookings.last_error.is_none() => {
                let message = match status {
                    BookingStatus::Confirmed => BOOKING_ACCEPTED,
                    BookingStatus::Rejected => BOOKING_DECLINED,
                    BookingStatus::Pending => return SmallVec::new(),
                };
                self.toast(state, NotificationsAction::success(message), env)
            },
            Trigger::Nothing
            | Trigger::Submit
            | Trigger::ImageSelected
            | Trigger::BookingDecision(_) => SmallVec::new(),
        }
    }

    fn add_submitted_artist(
        &self,
        state: &mut MarketplaceState,
        env: &MarketplaceEnvironment,
    ) -> Effects {
        let Some(artist) = state.onboarding.submitted.clone() else {
            return SmallVec::new();
        };

        let mut effects = self.reduce(
            state,
            MarketplaceAction::Catalog(CatalogAction::AddArtist { artist }),
            env,
        );

        let outcome = match state.catalog.last_error.clone() {
            Some(error) => {
                let field = match error {
                    CatalogError::MissingCategory => "category",
                    CatalogError::ArtistNotFound { .. } | CatalogError::IdExhausted { .. } => {
                        "form"
                    },
                };
                let errors = vec![FieldError::new(field, &error.to_string())];
                effects.extend(self.reduce(
                    state,
                    MarketplaceAction::Onboarding(OnboardingAction::ProfileRejected { errors }),
                    env,
                ));
                NotificationsAction::error(error.to_string())
            },
            None => {
                state.onboarding.created_artist =
                    state.catalog.artists.last().map(|artist| artist.id.clone());
                NotificationsAction::success(PROFILE_CREATED)
            },
        };
        effects.extend(self.toast(state, outcome, env));
        effects
    }
}

impl Default for MarketplaceReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for MarketplaceReducer {
    type State = MarketplaceState;
    type Action = MarketplaceAction;
    type Environment = MarketplaceEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if let MarketplaceAction::RequestQuote { artist_id, request } = action {
            return self.request_quote(state, artist_id, request, env);
        }

        let trigger = Trigger::of(&action);
        let was_submitted = state.onboarding.step == FormStep::Submitted;

        let mut effects = self.features.reduce(state, action, env);
        effects.extend(self.react(state, trigger, was_submitted, env));
        effects
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::bookings::BookingError;
    use crate::domain::{BookingId, Category, PriceRange};
    use crate::environment::MarketplaceSettings;
    use crate::notifications::ToastKind;
    use crate::onboarding::{ImageSlot, StepInput};
    use artistly_runtime::Store;
    use artistly_testing::{
        assertions, test_clock, ConstantIdGenerator, ReducerTest, SequentialIdGenerator,
    };
    use chrono::NaiveDate;
    use std::sync::Arc;
    use std::time::Duration;

    fn test_env() -> MarketplaceEnvironment {
        MarketplaceEnvironment::new(
            Arc::new(test_clock()),
            Arc::new(SequentialIdGenerator::new("")),
            MarketplaceSettings::default(),
        )
    }

    fn onboarding(action: OnboardingAction) -> MarketplaceAction {
        MarketplaceAction::Onboarding(action)
    }

    fn completed_profile() -> Vec<MarketplaceAction> {
        vec![
            onboarding(OnboardingAction::UpdateStep {
                input: StepInput::Identity {
                    name: Some("Ava Brooks".to_string()),
                    bio: Some(
                        "Soul and gospel singer fronting a six-piece horn section since 2012"
                            .to_string(),
                    ),
                },
            }),
            onboarding(OnboardingAction::NextStep),
            onboarding(OnboardingAction::ToggleCategory {
                category: Category::Singers,
            }),
            onboarding(OnboardingAction::NextStep),
            onboarding(OnboardingAction::UpdateStep {
                input: StepInput::Details {
                    languages: Some(vec!["English".to_string()]),
                    price_range: Some(PriceRange::From1000To2500),
                    location: Some("Nashville, TN".to_string()),
                },
            }),
            onboarding(OnboardingAction::NextStep),
            onboarding(OnboardingAction::Submit),
        ]
    }

    fn quote(artist_id: &str) -> MarketplaceAction {
        MarketplaceAction::RequestQuote {
            artist_id: ArtistId::new(artist_id),
            request: QuoteRequest {
                event_title: "Charity Auction".to_string(),
                event_date: NaiveDate::from_ymd_opt(2025, 9, 12).unwrap(),
                location: "Austin, TX".to_string(),
                client_name: "Hope Foundation".to_string(),
                fee: None,
            },
        }
    }

    #[test]
    fn submitted_profile_joins_the_catalog() {
        ReducerTest::new(MarketplaceReducer::new())
            .with_env(test_env())
            .given_state(MarketplaceState::seeded())
            .when_actions(completed_profile())
            .then_state(|state| {
                assert_eq!(state.catalog.artists.len(), 7);
                let added = state.catalog.artists.last().unwrap();
                assert_eq!(added.name, "Ava Brooks");
                assert_eq!(added.id.as_str(), "7");
                assert_eq!(state.onboarding.created_artist, Some(added.id.clone()));
                assert_eq!(state.catalog.filtered.len(), 7);

                let toast = state.notifications.toasts.last().unwrap();
                assert_eq!(toast.kind, ToastKind::Success);
                assert_eq!(toast.message, PROFILE_CREATED);
            })
            .then_effects(|effects| {
                assert_eq!(assertions::delayed_actions(effects).len(), 1);
            })
            .run();
    }

    #[test]
    fn repeated_submit_adds_only_once() {
        let mut actions = completed_profile();
        actions.push(onboarding(OnboardingAction::Submit));

        ReducerTest::new(MarketplaceReducer::new())
            .with_env(test_env())
            .given_state(MarketplaceState::seeded())
            .when_actions(actions)
            .then_state(|state| assert_eq!(state.catalog.artists.len(), 7))
            .run();
    }

    #[test]
    fn refused_profile_reopens_the_form() {
        // Every drawn id collides with a seeded artist
        let env = MarketplaceEnvironment::new(
            Arc::new(test_clock()),
            Arc::new(ConstantIdGenerator("1".to_string())),
            MarketplaceSettings::default(),
        );

        ReducerTest::new(MarketplaceReducer::new())
            .with_env(env)
            .given_state(MarketplaceState::seeded())
            .when_actions(completed_profile())
            .then_state(|state| {
                assert_eq!(state.catalog.artists.len(), 6);
                assert_eq!(state.onboarding.step, FormStep::Image);
                assert!(state.onboarding.submitted.is_none());
                assert!(state.onboarding.created_artist.is_none());
                assert_eq!(state.onboarding.errors.len(), 1);
                assert_eq!(state.onboarding.errors[0].field, "form");

                let toast = state.notifications.toasts.last().unwrap();
                assert_eq!(toast.kind, ToastKind::Error);
            })
            .run();
    }

    #[test]
    fn quote_request_creates_pending_booking() {
        ReducerTest::new(MarketplaceReducer::new())
            .with_env(test_env())
            .given_state(MarketplaceState::seeded())
            .when_action(quote("6"))
            .then_state(|state| {
                let booking = state.bookings.bookings.last().unwrap();
                assert_eq!(booking.artist_name, "Carlos Martinez");
                assert_eq!(booking.status, BookingStatus::Pending);
                assert_eq!(booking.fee, 500);
                assert_eq!(state.notifications.toasts[0].message, QUOTE_REQUESTED);
            })
            .run();
    }

    #[test]
    fn quote_for_unknown_artist_fails_validation() {
        ReducerTest::new(MarketplaceReducer::new())
            .with_env(test_env())
            .given_state(MarketplaceState::seeded())
            .when_action(quote("404"))
            .then_state(|state| {
                assert_eq!(state.bookings.bookings.len(), 4);
                assert_eq!(
                    state.catalog.last_error,
                    Some(CatalogError::ArtistNotFound {
                        id: ArtistId::new("404")
                    })
                );
                assert!(state.notifications.toasts.is_empty());
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn accepting_a_booking_raises_toast() {
        ReducerTest::new(MarketplaceReducer::new())
            .with_env(test_env())
            .given_state(MarketplaceState::seeded())
            .when_action(MarketplaceAction::Bookings(BookingsAction::AcceptBooking {
                id: BookingId::new("2"),
            }))
            .then_state(|state| {
                assert_eq!(state.notifications.toasts[0].message, BOOKING_ACCEPTED);
            })
            .run();
    }

    #[test]
    fn failed_decision_raises_no_toast() {
        ReducerTest::new(MarketplaceReducer::new())
            .with_env(test_env())
            .given_state(MarketplaceState::seeded())
            .when_action(MarketplaceAction::Bookings(BookingsAction::DeclineBooking {
                id: BookingId::new("3"),
            }))
            .then_state(|state| {
                assert!(matches!(
                    state.bookings.last_error,
                    Some(BookingError::InvalidTransition { .. })
                ));
                assert!(state.notifications.toasts.is_empty());
            })
            .run();
    }

    #[test]
    fn refused_image_raises_error_toast() {
        ReducerTest::new(MarketplaceReducer::new())
            .with_env(test_env())
            .given_state(MarketplaceState::seeded())
            .when_action(onboarding(OnboardingAction::SelectImage {
                content_type: "text/plain".to_string(),
                bytes: Arc::from(&b"hello"[..]),
            }))
            .then_state(|state| {
                let toast = &state.notifications.toasts[0];
                assert_eq!(toast.kind, ToastKind::Error);
                assert_eq!(toast.message, "Only image files are supported");
            })
            .run();
    }

    #[tokio::test]
    async fn store_feeds_encoded_image_back() {
        let store = Store::new(MarketplaceState::seeded(), MarketplaceReducer::new(), test_env());

        let loaded = store
            .send_and_wait_for(
                onboarding(OnboardingAction::SelectImage {
                    content_type: "image/png".to_string(),
                    bytes: Arc::from(&b"png"[..]),
                }),
                |action| {
                    matches!(
                        action,
                        MarketplaceAction::Onboarding(OnboardingAction::ImageLoaded { .. })
                    )
                },
                Duration::from_secs(1),
            )
            .await
            .unwrap();
        assert!(matches!(
            loaded,
            MarketplaceAction::Onboarding(OnboardingAction::ImageLoaded { upload: 1, .. })
        ));
    }

    #[tokio::test]
    async fn image_slot_is_ready_once_effects_settle() {
        let store = Store::new(MarketplaceState::seeded(), MarketplaceReducer::new(), test_env());

        let mut handle = store
            .send(onboarding(OnboardingAction::SelectImage {
                content_type: "image/png".to_string(),
                bytes: Arc::from(&b"png"[..]),
            }))
            .await
            .unwrap();
        handle.wait().await;

        let slot = store.state(|s| s.onboarding.draft.image.image.clone()).await;
        assert_eq!(
            slot,
            ImageSlot::Ready {
                data_url: "data:image/png;base64,cG5n".to_string()
            }
        );
    }

    #[tokio::test]
    async fn toasts_expire_through_the_store() {
        let env = MarketplaceEnvironment::new(
            Arc::new(test_clock()),
            Arc::new(SequentialIdGenerator::new("")),
            MarketplaceSettings {
                toast_ttl: Duration::from_millis(20),
                ..MarketplaceSettings::default()
            },
        );
        let store = Store::new(MarketplaceState::seeded(), MarketplaceReducer::new(), env);

        let mut handle = store.send(quote("1")).await.unwrap();
        assert_eq!(store.state(|s| s.notifications.toasts.len()).await, 1);

        handle.wait().await;
        assert!(store.state(|s| s.notifications.toasts.is_empty()).await);
        assert_eq!(store.state(|s| s.bookings.bookings.len()).await, 5);
    }
}
