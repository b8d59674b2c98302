//! Booking requests and their status lifecycle.
//!
//! Bookings enter as `pending` and move at most once, to `confirmed` or
//! `rejected`. Rejected commands leave the collection untouched and record a
//! [`BookingError`] in `last_error`.

use crate::domain::{Booking, BookingId, BookingStatus, NewBooking};
use crate::environment::{MarketplaceEnvironment, MAX_ID_ATTEMPTS};
use artistly_core::{effect::Effect, reducer::Reducer, SmallVec};
use serde::Serialize;

/// Booking failures
#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BookingError {
    /// No booking has this id
    #[error("Booking with ID {id} not found")]
    NotFound {
        /// Requested id
        id: BookingId,
    },
    /// Only pending bookings can be confirmed or rejected
    #[error("Booking {id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Booking id
        id: BookingId,
        /// Current status
        from: BookingStatus,
        /// Requested status
        to: BookingStatus,
    },
    /// New bookings always start out pending
    #[error("New bookings must start as pending, not {status}")]
    InvalidInitialStatus {
        /// Supplied status
        status: BookingStatus,
    },
    /// Every drawn id candidate was already in use
    #[error("Could not allocate an unused booking id after {attempts} attempts")]
    IdExhausted {
        /// Candidates drawn
        attempts: usize,
    },
}

/// State of the booking collection
#[derive(Clone, Debug, Default, Serialize)]
pub struct BookingsState {
    /// All bookings, in insertion order
    pub bookings: Vec<Booking>,
    /// Last validation error (if any)
    pub last_error: Option<BookingError>,
}

impl BookingsState {
    /// Creates a state holding `bookings`
    #[must_use]
    pub const fn with_bookings(bookings: Vec<Booking>) -> Self {
        Self {
            bookings,
            last_error: None,
        }
    }

    /// Returns a booking by ID
    #[must_use]
    pub fn get(&self, id: &BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|booking| &booking.id == id)
    }

    /// Checks if a booking exists
    #[must_use]
    pub fn exists(&self, id: &str) -> bool {
        self.bookings.iter().any(|booking| booking.id.as_str() == id)
    }
}

/// Commands and events for bookings
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingsAction {
    // ========== Commands ==========
    /// Command: Add a booking request
    AddBooking {
        /// Booking without id or creation date
        booking: NewBooking,
    },
    /// Command: Move a booking to a new status
    UpdateBookingStatus {
        /// Booking to update
        id: BookingId,
        /// Target status
        status: BookingStatus,
    },
    /// Command: Confirm a pending booking
    AcceptBooking {
        /// Booking to confirm
        id: BookingId,
    },
    /// Command: Reject a pending booking
    DeclineBooking {
        /// Booking to reject
        id: BookingId,
    },

    // ========== Events ==========
    /// Event: A booking was added
    BookingAdded {
        /// The stored booking
        booking: Booking,
    },
    /// Event: A booking changed status
    BookingStatusChanged {
        /// Booking id
        id: BookingId,
        /// New status
        status: BookingStatus,
    },
    /// Event: A command was rejected
    ValidationFailed {
        /// Why
        error: BookingError,
    },
}

/// Reducer for bookings
#[derive(Clone, Debug, Default)]
pub struct BookingsReducer;

impl BookingsReducer {
    /// Creates a new `BookingsReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates an `AddBooking` command
    const fn validate_add_booking(booking: &NewBooking) -> Result<(), BookingError> {
        if !matches!(booking.status, BookingStatus::Pending) {
            return Err(BookingError::InvalidInitialStatus {
                status: booking.status,
            });
        }
        Ok(())
    }

    /// Validates an `UpdateBookingStatus` command
    fn validate_transition(
        state: &BookingsState,
        id: &BookingId,
        status: BookingStatus,
    ) -> Result<(), BookingError> {
        let Some(booking) = state.get(id) else {
            return Err(BookingError::NotFound { id: id.clone() });
        };

        if !booking.status.can_transition_to(status) {
            return Err(BookingError::InvalidTransition {
                id: id.clone(),
                from: booking.status,
                to: status,
            });
        }

        Ok(())
    }

    /// Applies an event to state
    fn apply_event(state: &mut BookingsState, action: &BookingsAction) {
        match action {
            BookingsAction::BookingAdded { booking } => {
                state.bookings.push(booking.clone());
                state.last_error = None;
            },
            BookingsAction::BookingStatusChanged { id, status } => {
                if let Some(booking) = state.bookings.iter_mut().find(|b| &b.id == id) {
                    booking.status = *status;
                }
                state.last_error = None;
            },
            BookingsAction::ValidationFailed { error } => {
                state.last_error = Some(error.clone());
            },
            // Commands are not applied to state
            BookingsAction::AddBooking { .. }
            | BookingsAction::UpdateBookingStatus { .. }
            | BookingsAction::AcceptBooking { .. }
            | BookingsAction::DeclineBooking { .. } => {},
        }
    }

    fn reject(state: &mut BookingsState, error: BookingError) {
        tracing::warn!(%error, "Booking command rejected");
        metrics::counter!("marketplace.validation.failed", "feature" => "bookings").increment(1);
        Self::apply_event(state, &BookingsAction::ValidationFailed { error });
    }

    fn update_status(state: &mut BookingsState, id: BookingId, status: BookingStatus) {
        if let Err(error) = Self::validate_transition(state, &id, status) {
            Self::reject(state, error);
            return;
        }

        tracing::info!(booking_id = %id, %status, "Booking status changed");
        metrics::counter!("marketplace.bookings.status_changed", "status" => status.to_string())
            .increment(1);

        Self::apply_event(state, &BookingsAction::BookingStatusChanged { id, status });
    }
}

impl Reducer for BookingsReducer {
    type State = BookingsState;
    type Action = BookingsAction;
    type Environment = MarketplaceEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            BookingsAction::AddBooking { booking } => {
                if let Err(error) = Self::validate_add_booking(&booking) {
                    Self::reject(state, error);
                    return SmallVec::new();
                }

                let Some(id) = env.fresh_id(|candidate| state.exists(candidate)) else {
                    Self::reject(
                        state,
                        BookingError::IdExhausted {
                            attempts: MAX_ID_ATTEMPTS,
                        },
                    );
                    return SmallVec::new();
                };

                let created_at = env.clock.now().date_naive();
                let booking = Booking::from_new(BookingId::new(id), created_at, booking);
                tracing::info!(
                    booking_id = %booking.id,
                    artist_id = %booking.artist_id,
                    fee = booking.fee,
                    "Booking added"
                );
                metrics::counter!("marketplace.bookings.added").increment(1);

                Self::apply_event(state, &BookingsAction::BookingAdded { booking });
            },
            BookingsAction::UpdateBookingStatus { id, status } => {
                Self::update_status(state, id, status);
            },
            BookingsAction::AcceptBooking { id } => {
                Self::update_status(state, id, BookingStatus::Confirmed);
            },
            BookingsAction::DeclineBooking { id } => {
                Self::update_status(state, id, BookingStatus::Rejected);
            },

            // ========== Events ==========
            BookingsAction::BookingAdded { .. }
            | BookingsAction::BookingStatusChanged { .. }
            | BookingsAction::ValidationFailed { .. } => {
                Self::apply_event(state, &action);
            },
        }

        SmallVec::new()
    }
}
