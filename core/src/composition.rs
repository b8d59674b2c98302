//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Focus a child reducer on a slice of parent state and
//!   a subset of parent actions
//!
//! # Example
//!
//! ```
//! use artistly_core::composition::{combine_reducers, scope_reducer};
//! use artistly_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Default)]
//! struct CounterState {
//!     count: i32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         _action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         state.count += 1;
//!         SmallVec::new()
//!     }
//! }
//!
//! #[derive(Clone, Default)]
//! struct AppState {
//!     left: CounterState,
//!     right: CounterState,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum AppAction {
//!     Left(CounterAction),
//!     Right(CounterAction),
//! }
//!
//! let app = combine_reducers(vec![
//!     Box::new(scope_reducer(
//!         CounterReducer,
//!         |s: &mut AppState| &mut s.left,
//!         |a: AppAction| match a {
//!             AppAction::Left(a) => Some(a),
//!             AppAction::Right(_) => None,
//!         },
//!         AppAction::Left,
//!     )),
//!     Box::new(scope_reducer(
//!         CounterReducer,
//!         |s: &mut AppState| &mut s.right,
//!         |a: AppAction| match a {
//!             AppAction::Right(a) => Some(a),
//!             AppAction::Left(_) => None,
//!         },
//!         AppAction::Right,
//!     )),
//! ]);
//!
//! let mut state = AppState::default();
//! let _ = app.reduce(&mut state, AppAction::Left(CounterAction::Increment), &());
//! assert_eq!(state.left.count, 1);
//! assert_eq!(state.right.count, 0);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;

/// Boxed reducer trait object used by [`combine_reducers`].
pub type BoxedReducer<S, A, E> = Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in order, and all effects are collected and concatenated.
/// Later reducers observe the state changes made by earlier ones.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<BoxedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Vec<BoxedReducer<S, A, E>>,
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects);
        }

        all_effects
    }
}

/// Scopes a child reducer to a slice of parent state and a subset of parent actions.
///
/// - `state`: lens from the parent state to the child's slice
/// - `extract`: returns the child action when the parent action targets this child
/// - `embed`: lifts child actions produced by effects back into the parent type
///
/// Parent actions for which `extract` returns `None` are ignored.
pub fn scope_reducer<S, SubS, A, SubA, E, R>(
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<SubA>,
    embed: fn(SubA) -> A,
) -> ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    ScopedReducer {
        reducer,
        state,
        extract,
        embed,
    }
}

/// A reducer focused on part of a larger state and action space.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<SubA>,
    embed: fn(SubA) -> A,
}

impl<S, SubS, A, SubA, E, R> ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    /// The wrapped child reducer
    pub const fn inner(&self) -> &R {
        &self.reducer
    }
}

impl<S, SubS, A, SubA, E, R> Reducer for ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
    A: Send + 'static,
    SubA: Send + 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let Some(child_action) = (self.extract)(action) else {
            return SmallVec::new();
        };

        let child_state = (self.state)(state);
        let embed = self.embed;

        self.reducer
            .reduce(child_state, child_action, env)
            .into_iter()
            .map(|effect| effect.map(embed))
            .collect()
    }
}
