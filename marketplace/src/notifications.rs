//! Transient toast notifications.
//!
//! Every toast schedules its own dismissal with `Effect::Delay`; dismissing
//! early is allowed and a late timer for a gone toast is a no-op.

use crate::environment::MarketplaceEnvironment;
use artistly_core::{delay, effect::Effect, reducer::Reducer, smallvec, DateTime, SmallVec, Utc};
use serde::Serialize;

/// Shown after a quote request creates a booking
pub const QUOTE_REQUESTED: &str = "Quote request sent! The artist will respond within 24 hours.";
/// Shown after a booking is accepted
pub const BOOKING_ACCEPTED: &str = "Booking accepted! The client has been notified.";
/// Shown after a booking is declined
pub const BOOKING_DECLINED: &str = "Booking declined. The client has been notified.";
/// Shown after onboarding adds the new artist
pub const PROFILE_CREATED: &str = "Your artist profile has been created successfully!";

/// Toast severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    /// Confirmation of a completed action
    Success,
    /// A rejected action
    Error,
}

/// A notification shown until dismissed or expired
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Toast {
    /// Identifier, unique within the session
    pub id: u64,
    /// Severity
    pub kind: ToastKind,
    /// Text shown to the user
    pub message: String,
    /// When the toast was raised
    pub created_at: DateTime<Utc>,
}

/// Visible toasts, oldest first
#[derive(Clone, Debug, Default, Serialize)]
pub struct NotificationsState {
    /// Toasts currently shown
    pub toasts: Vec<Toast>,
    #[serde(skip)]
    next_id: u64,
}

/// Toast actions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotificationsAction {
    /// Raise a toast
    Show {
        /// Severity
        kind: ToastKind,
        /// Text
        message: String,
    },
    /// Remove a toast, explicitly or when its timer fires
    DismissToast {
        /// Toast to remove
        id: u64,
    },
}

impl NotificationsAction {
    /// Shorthand for a success toast
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::Show {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    /// Shorthand for an error toast
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Show {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

/// Reducer for toasts
#[derive(Clone, Debug, Default)]
pub struct NotificationsReducer;

impl NotificationsReducer {
    /// Creates a new `NotificationsReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for NotificationsReducer {
    type State = NotificationsState;
    type Action = NotificationsAction;
    type Environment = MarketplaceEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            NotificationsAction::Show { kind, message } => {
                state.next_id += 1;
                let id = state.next_id;
                tracing::debug!(toast_id = id, ?kind, %message, "Toast raised");

                state.toasts.push(Toast {
                    id,
                    kind,
                    message,
                    created_at: env.clock.now(),
                });
                record_active(state);

                smallvec![delay! {
                    duration: env.settings.toast_ttl,
                    action: NotificationsAction::DismissToast { id }
                }]
            },
            NotificationsAction::DismissToast { id } => {
                state.toasts.retain(|toast| toast.id != id);
                record_active(state);
                SmallVec::new()
            },
        }
    }
}

fn record_active(state: &NotificationsState) {
    // Precision loss acceptable for metrics (toast counts are tiny)
    #[allow(clippy::cast_precision_loss)]
    metrics::gauge!("marketplace.notifications.active").set(state.toasts.len() as f64);
}
