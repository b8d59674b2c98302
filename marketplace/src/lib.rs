//! Artistly marketplace: browse live performers, request quotes and manage
//! bookings.
//!
//! The whole session lives in one [`Store`](artistly_runtime::Store) built
//! from feature reducers:
//!
//! ```text
//!                 ┌──────────────────────┐
//!   HTTP ──────▶  │  MarketplaceReducer  │  coordinates follow-ups
//!                 └──────────┬───────────┘
//!        ┌──────────┬────────┴─────┬───────────────┐
//!        ▼          ▼              ▼               ▼
//!    catalog    bookings      onboarding     notifications
//!   (filters)  (requests)   (profile form)     (toasts)
//! ```
//!
//! Reducers are pure over `(state, action, environment)`; image encoding and
//! toast expiry run as effects that feed actions back into the store.

pub mod api;
pub mod app;
pub mod bookings;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod environment;
pub mod notifications;
pub mod onboarding;
pub mod seed;
pub mod server;

pub use app::{MarketplaceAction, MarketplaceReducer, MarketplaceState};
pub use config::Config;
pub use environment::{MarketplaceEnvironment, MarketplaceSettings};
