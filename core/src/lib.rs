//! # Artistly Core
//!
//! Core traits and types for the Artistly reducer architecture.
//!
//! Every feature of the marketplace is a pure reducer over owned state.
//! Side effects are returned as values and executed by the runtime crate.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer (commands and the facts they produce)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Example
//!
//! ```
//! use artistly_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct FilterState {
//!     search: String,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum FilterAction {
//!     SetSearch { query: String },
//! }
//!
//! struct FilterReducer;
//!
//! impl Reducer for FilterReducer {
//!     type State = FilterState;
//!     type Action = FilterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut FilterState,
//!         action: FilterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<FilterAction>; 4]> {
//!         match action {
//!             FilterAction::SetSearch { query } => state.search = query,
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let mut state = FilterState::default();
//! let effects = FilterReducer.reduce(
//!     &mut state,
//!     FilterAction::SetSearch { query: "jazz".to_string() },
//!     &(),
//! );
//! assert_eq!(state.search, "jazz");
//! assert!(effects.is_empty());
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, NaiveDate, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Reducer composition utilities (`combine_reducers`, `scope_reducer`)
pub mod composition;

/// Declarative macros for building effects
pub mod effect_macros;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// Most actions produce zero or one effect, so the returned
        /// collection stays on the stack for the common case.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable.
pub mod effect {
    use futures::FutureExt;
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (toast expiry, timeouts)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Returns `true` for [`Effect::None`]
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }

        /// Transform the action this effect eventually produces.
        ///
        /// Used when a child reducer's effects are lifted into a parent
        /// action type. The mapping is applied lazily for futures and
        /// eagerly for delayed actions.
        #[must_use]
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            Action: Send + 'static,
            B: Send + 'static,
            F: Fn(Action) -> B + Clone + Send + Sync + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => Effect::Parallel(
                    effects.into_iter().map(|e| e.map(f.clone())).collect(),
                ),
                Effect::Sequential(effects) => Effect::Sequential(
                    effects.into_iter().map(|e| e.map(f.clone())).collect(),
                ),
                Effect::Delay { duration, action } => Effect::Delay {
                    duration,
                    action: Box::new(f(*action)),
                },
                Effect::Future(fut) => {
                    Effect::Future(Box::pin(fut.map(move |action| action.map(f))))
                },
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Identifier source for newly created records
    ///
    /// Implementations need not guarantee global uniqueness; reducers check
    /// candidates against the ids they already hold and ask again on collision.
    pub trait IdGenerator: Send + Sync {
        /// Produce the next identifier candidate
        fn next_id(&self) -> String;
    }
}
