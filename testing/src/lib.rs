//! # Artistly Testing
//!
//! Testing utilities and helpers for the Artistly reducer architecture.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects
//! - proptest strategies shared by feature tests
//!
//! ## Example
//!
//! ```ignore
//! use artistly_testing::{test_clock, SequentialIdGenerator};
//!
//! let env = MarketplaceEnvironment::new(
//!     Arc::new(test_clock()),
//!     Arc::new(SequentialIdGenerator::new("artist")),
//!     MarketplaceSettings::default(),
//! );
//! ```

use artistly_core::environment::{Clock, IdGenerator};
use chrono::{DateTime, Utc};


/// Deterministic implementations of environment traits
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use artistly_testing::mocks::FixedClock;
    /// use artistly_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-15 09:30:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-15T09:30:00Z")
                .map(|time| time.with_timezone(&Utc))
                .unwrap_or_default(),
        )
    }

    /// Predictable ids: `prefix-1`, `prefix-2`, ...
    ///
    /// With an empty prefix the ids are bare numbers, which deliberately
    /// collide with the sample data ids `"1"` to `"6"`.
    #[derive(Debug)]
    pub struct SequentialIdGenerator {
        prefix: String,
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Start counting at 1 with the given prefix
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self::starting_at(prefix, 1)
        }

        /// Start counting at `first`
        #[must_use]
        pub fn starting_at(prefix: impl Into<String>, first: u64) -> Self {
            Self {
                prefix: prefix.into(),
                next: AtomicU64::new(first),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::SeqCst);
            if self.prefix.is_empty() {
                n.to_string()
            } else {
                format!("{}-{n}", self.prefix)
            }
        }
    }

    /// Always returns the same id; used to exercise collision handling.
    #[derive(Debug, Clone)]
    pub struct ConstantIdGenerator(pub String);

    impl IdGenerator for ConstantIdGenerator {
        fn next_id(&self) -> String {
            self.0.clone()
        }
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// Search strings drawn from words that occur in the sample catalog,
    /// mixed with casing variations and noise.
    pub fn search_query() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            Just("jazz".to_string()),
            Just("JAZZ".to_string()),
            Just("dj".to_string()),
            Just("speaker".to_string()),
            Just("band".to_string()),
            "[a-z]{1,6}",
        ]
    }

    /// Location selections, including ones matching no sample artist.
    pub fn location() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some("New York, NY".to_string())),
            Just(Some("Miami, FL".to_string())),
            Just(Some("TX".to_string())),
            Just(Some("Nashville, TN".to_string())),
        ]
    }
}

// Re-export commonly used items
pub use mocks::{ConstantIdGenerator, FixedClock, SequentialIdGenerator, test_clock};
pub use reducer_test::{assertions, ReducerTest};
