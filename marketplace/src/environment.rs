//! Dependencies injected into marketplace reducers.

use crate::seed::DEFAULT_ARTIST_IMAGE;
use artistly_core::environment::{Clock, IdGenerator};
use std::sync::Arc;
use std::time::Duration;

/// How many id candidates a reducer draws before giving up on a collision
pub const MAX_ID_ATTEMPTS: usize = 16;

/// Tunables that shape reducer behavior
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketplaceSettings {
    /// How long a toast stays before it is dismissed automatically
    pub toast_ttl: Duration,
    /// Largest accepted profile image, in bytes
    pub max_image_bytes: usize,
    /// Image used for profiles submitted without an upload
    pub default_artist_image: String,
}

impl Default for MarketplaceSettings {
    fn default() -> Self {
        Self {
            toast_ttl: Duration::from_secs(5),
            max_image_bytes: 2 * 1024 * 1024,
            default_artist_image: DEFAULT_ARTIST_IMAGE.to_string(),
        }
    }
}

/// Environment shared by every marketplace reducer
#[derive(Clone)]
pub struct MarketplaceEnvironment {
    /// Clock for creation dates and toast timestamps
    pub clock: Arc<dyn Clock>,
    /// Source of artist and booking id candidates
    pub ids: Arc<dyn IdGenerator>,
    /// Behavior settings
    pub settings: MarketplaceSettings,
}

impl MarketplaceEnvironment {
    /// Creates a new `MarketplaceEnvironment`
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        settings: MarketplaceSettings,
    ) -> Self {
        Self {
            clock,
            ids,
            settings,
        }
    }

    /// Draws id candidates until one is not `taken`.
    ///
    /// Returns `None` after [`MAX_ID_ATTEMPTS`] collisions.
    pub fn fresh_id(&self, taken: impl Fn(&str) -> bool) -> Option<String> {
        (0..MAX_ID_ATTEMPTS)
            .map(|_| self.ids.next_id())
            .find(|candidate| !taken(candidate))
    }
}

impl std::fmt::Debug for MarketplaceEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketplaceEnvironment")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Production id generator backed by random UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
