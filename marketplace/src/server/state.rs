//! Application state for the marketplace HTTP server.

use crate::app::{MarketplaceAction, MarketplaceReducer, MarketplaceState};
use crate::environment::MarketplaceEnvironment;
use artistly_runtime::Store;
use artistly_web::AppError;
use axum::extract::FromRef;
use std::sync::Arc;

/// The store every handler talks to
pub type MarketplaceStore =
    Store<MarketplaceState, MarketplaceAction, MarketplaceEnvironment, MarketplaceReducer>;

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply via Arc) for each request. Handlers never touch state
/// directly: they send actions and read snapshots through the store.
#[derive(Clone)]
pub struct AppState {
    /// The marketplace session
    pub store: Arc<MarketplaceStore>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub const fn new(store: Arc<MarketplaceStore>) -> Self {
        Self { store }
    }

    /// Send an action, waiting only for the reducer.
    ///
    /// # Errors
    ///
    /// Returns 503 once the store is shutting down.
    pub async fn dispatch(&self, action: MarketplaceAction) -> Result<(), AppError> {
        self.store.send(action).await?;
        Ok(())
    }

    /// Send an action and read the state it left behind.
    ///
    /// `f` runs under the same lock as the reducer, so the value reflects
    /// this action's outcome even while other requests are being served.
    ///
    /// # Errors
    ///
    /// Returns 503 once the store is shutting down.
    pub async fn dispatch_and_read<T>(
        &self,
        action: MarketplaceAction,
        f: impl FnOnce(&MarketplaceState) -> T,
    ) -> Result<T, AppError> {
        let (value, _) = self.store.send_and_read(action, f).await?;
        Ok(value)
    }

    /// Read a value out of the current state.
    pub async fn read<T>(&self, f: impl FnOnce(&MarketplaceState) -> T) -> T {
        self.store.state(f).await
    }
}

impl FromRef<AppState> for Arc<MarketplaceStore> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.store)
    }
}
