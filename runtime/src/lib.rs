//! # Artistly Runtime
//!
//! Runtime implementation for the Artistly reducer architecture.
//!
//! This crate provides the [`Store`], which owns feature state, serializes
//! reducer execution and runs the effects reducers return.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Health**: Liveness/readiness signal derived from shutdown state and effect backlog
//!
//! ## Example
//!
//! ```ignore
//! use artistly_runtime::Store;
//!
//! let store = Store::new(initial_state, reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use artistly_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Prometheus metrics for observability
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

/// Health check status levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Component is fully operational
    Healthy,

    /// Component is operational but experiencing issues (e.g., large effect backlog)
    Degraded,

    /// Component is not operational
    Unhealthy,
}

impl HealthStatus {
    /// Check if status is healthy
    #[must_use]
    pub const fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Check if status is unhealthy
    #[must_use]
    pub const fn is_unhealthy(self) -> bool {
        matches!(self, Self::Unhealthy)
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded => write!(f, "degraded"),
            Self::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Health check result for a component
#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthCheck {
    /// Name of the component being checked
    pub component: String,

    /// Current health status
    pub status: HealthStatus,

    /// Optional message providing details
    pub message: Option<String>,

    /// Optional metadata (e.g., counters)
    pub metadata: Vec<(String, String)>,

    /// When the check was taken
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl HealthCheck {
    fn with_status(component: String, status: HealthStatus, message: Option<String>) -> Self {
        Self {
            component,
            status,
            message,
            metadata: Vec::new(),
            checked_at: chrono::Utc::now(),
        }
    }

    /// Create a healthy check result
    #[must_use]
    pub fn healthy(component: impl Into<String>) -> Self {
        Self::with_status(component.into(), HealthStatus::Healthy, None)
    }

    /// Create a degraded check result
    #[must_use]
    pub fn degraded(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(component.into(), HealthStatus::Degraded, Some(message.into()))
    }

    /// Create an unhealthy check result
    #[must_use]
    pub fn unhealthy(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(component.into(), HealthStatus::Unhealthy, Some(message.into()))
    }

    /// Add metadata to the health check
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }
}

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::watch;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use artistly_runtime::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_degraded_pending_effects(64)
///     .with_shutdown_timeout(Duration::from_secs(10));
/// assert_eq!(config.degraded_pending_effects, 64);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of effect-produced actions buffered for observers
    pub broadcast_capacity: usize,
    /// Pending effect count above which the store reports itself degraded
    pub degraded_pending_effects: usize,
    /// Default timeout for graceful shutdown
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Set the pending effect threshold for degraded health
    #[must_use]
    pub const fn with_degraded_pending_effects(mut self, threshold: usize) -> Self {
        self.degraded_pending_effects = threshold;
        self
    }

    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
            degraded_pending_effects: 1_000,
            default_shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects spawned by
/// that action, including the reduction of any action they feed back.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(OnboardingAction::SelectImage { .. }).await?;
/// handle.wait().await;
/// // The image has been encoded and applied to state
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Number of effects still running for this action
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                // Every tracker is gone, so nothing can still be running
                break;
            }
        }
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements both the per-action and the global
/// effect counters, even if the effect panics.
struct EffectGuard {
    tracking: EffectTracking,
    pending: Arc<AtomicUsize>,
}

impl Drop for EffectGuard {
    fn drop(&mut self) {
        self.pending.fetch_sub(1, Ordering::SeqCst);
        self.tracking.decrement();
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicUsize, Duration, Effect, EffectGuard, EffectHandle,
        EffectTracking, HealthCheck, Ordering, Reducer, RwLock, StoreConfig, StoreError,
    };
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        config: StoreConfig,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        /// Actions produced by effects are broadcast to observers so that
        /// request handlers can wait for a specific outcome.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                config,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                action_broadcast,
            }
        }

        /// Injected dependencies shared with the reducer
        #[must_use]
        pub fn environment(&self) -> &E {
            &self.environment
        }

        /// Number of effects currently running across all actions
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Perform a health check on the Store
        ///
        /// - Unhealthy once shutdown has started
        /// - Degraded while the effect backlog exceeds the configured threshold
        #[must_use]
        pub fn health(&self) -> HealthCheck {
            let pending = self.pending_effects();

            let check = if self.shutdown.load(Ordering::Acquire) {
                HealthCheck::unhealthy("store", "Store is shutting down")
            } else if pending > self.config.degraded_pending_effects {
                HealthCheck::degraded("store", format!("{pending} effects pending"))
            } else {
                HealthCheck::healthy("store")
            };

            check
                .with_metadata("pending_effects", pending.to_string())
                .with_metadata(
                    "degraded_threshold",
                    self.config.degraded_pending_effects.to_string(),
                )
        }

        /// Graceful shutdown using the configured default timeout
        ///
        /// # Errors
        ///
        /// See [`Store::shutdown`].
        pub async fn shutdown_default(&self) -> Result<(), StoreError> {
            self.shutdown(self.config.default_shutdown_timeout).await
        }

        /// Initiate graceful shutdown of the store
        ///
        /// Sets the shutdown flag (rejecting new actions), then waits for pending
        /// effects to complete or the timeout to expire.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(50);

            loop {
                let pending = self.pending_effects();

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    metrics::counter!("store.shutdown.completed").increment(1);
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timeout: {pending} effects still running");
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tracing::debug!(
                    pending_effects = pending,
                    elapsed_ms = start.elapsed().as_millis(),
                    "Waiting for effects to complete"
                );

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Executes returned effects asynchronously
        /// 4. Effects may produce more actions (feedback loop)
        ///
        /// `send()` returns once the reducer has run; state changes made by the
        /// reducer are visible to the next reader. Effects may still be running.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            let ((), handle) = self.send_and_read(action, |_| ()).await?;
            Ok(handle)
        }

        /// Send an action and read the state it produced
        ///
        /// `read` runs under the same write lock as the reducer, so it sees
        /// exactly the outcome of `action` and nothing sent by other callers
        /// afterwards.
        ///
        /// ```ignore
        /// let (outcome, _) = store
        ///     .send_and_read(action, |s| s.bookings.last_error.clone())
        ///     .await?;
        /// ```
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action, read), name = "store_send")]
        pub async fn send_and_read<F, T>(
            &self,
            action: A,
            read: F,
        ) -> Result<(T, EffectHandle), StoreError>
        where
            F: FnOnce(&S) -> T,
        {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!("Processing action");
            metrics::counter!("store.commands.total").increment(1);

            let (handle, tracking) = EffectHandle::new();

            let (effects, outcome) = {
                let mut state = self.state.write().await;

                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());

                // Precision loss acceptable for metrics (effect counts < 2^52)
                #[allow(clippy::cast_precision_loss)]
                metrics::histogram!("store.effects.count").record(effects.len() as f64);

                (effects, read(&*state))
            };

            for effect in effects {
                self.execute_effect(effect, tracking.clone());
            }

            Ok((outcome, handle))
        }

        /// Send an action and wait for a matching result action
        ///
        /// Subscribes to the action broadcast before sending, so no effect output
        /// can be missed, then returns the first effect-produced action matching
        /// `predicate`.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: Timeout expired before matching action received
        /// - [`StoreError::ChannelClosed`]: Action broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: Store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged, {skipped} actions skipped");
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to all actions produced by effects
        ///
        /// Actions sent directly through [`Store::send`] are not broadcast.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let artist_count = store.state(|s| s.catalog.artists.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        fn guard(&self, tracking: &EffectTracking) -> EffectGuard {
            tracking.increment();
            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            EffectGuard {
                tracking: tracking.clone(),
                pending: Arc::clone(&self.pending_effects),
            }
        }

        /// Feed an effect-produced action back into the store
        async fn feed_back(&self, action: A) {
            let _ = self.action_broadcast.send(action.clone());
            if let Err(error) = self.send(action).await {
                tracing::warn!(%error, "Dropped action produced by effect");
            }
        }

        /// Execute an effect with tracking
        ///
        /// - `None`: No-op
        /// - `Future`: Executes async computation, sends resulting action if `Some`
        /// - `Delay`: Waits for duration, then sends action
        /// - `Parallel`: Executes effects concurrently
        /// - `Sequential`: Executes effects in order, waiting for each to complete
        ///
        /// Effect failures are logged and never halt the store.
        #[allow(clippy::needless_pass_by_value)] // tracking is cloned into spawned tasks
        fn execute_effect(&self, effect: Effect<A>, tracking: EffectTracking) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);

                    let guard = self.guard(&tracking);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;
                        if let Some(action) = fut.await {
                            store.feed_back(action).await;
                        }
                    });
                },
                Effect::Delay { duration, action } => {
                    tracing::trace!(?duration, "Executing Effect::Delay");
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);

                    let guard = self.guard(&tracking);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;
                        tokio::time::sleep(duration).await;
                        store.feed_back(*action).await;
                    });
                },
                Effect::Parallel(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect(effect, tracking.clone());
                    }
                },
                Effect::Sequential(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);

                    let guard = self.guard(&tracking);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;
                        for effect in effects {
                            let (mut step, step_tracking) = EffectHandle::new();
                            store.execute_effect(effect, step_tracking);
                            step.wait().await;
                        }
                    });
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                config: self.config.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use error::StoreError;
pub use store::Store;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use artistly_core::{smallvec, SmallVec};

    #[derive(Debug, Clone)]
    struct TestState {
        value: i32,
    }

    #[derive(Debug, Clone)]
    enum TestAction {
        Increment,
        Decrement,
        NoOp,
        ProduceEffect,
        ProduceDelayedAction,
        ProduceParallelEffects,
        ProduceSequentialEffects,
        ProducePanickingEffect,
    }

    #[derive(Debug, Clone)]
    struct TestEnv;

    #[derive(Debug, Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    SmallVec::new()
                },
                TestAction::Decrement => {
                    state.value -= 1;
                    SmallVec::new()
                },
                TestAction::NoOp => smallvec![Effect::None],
                TestAction::ProduceEffect => {
                    smallvec![Effect::Future(Box::pin(async { Some(TestAction::Increment) }))]
                },
                TestAction::ProduceDelayedAction => {
                    smallvec![Effect::Delay {
                        duration: Duration::from_millis(10),
                        action: Box::new(TestAction::Increment),
                    }]
                },
                TestAction::ProduceParallelEffects => {
                    smallvec![Effect::Parallel(vec![
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    ])]
                },
                TestAction::ProduceSequentialEffects => {
                    smallvec![Effect::Sequential(vec![
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Decrement) })),
                    ])]
                },
                TestAction::ProducePanickingEffect => {
                    #[allow(clippy::panic)] // Intentional panic for testing error handling
                    {
                        smallvec![Effect::Future(Box::pin(async {
                            panic!("Intentional panic in effect for testing");
                        }))]
                    }
                },
            }
        }
    }

    fn store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState { value: 0 }, TestReducer, TestEnv)
    }

    #[tokio::test]
    async fn test_send_action() {
        let store = store();

        let _ = store.send(TestAction::Increment).await;
        let _ = store.send(TestAction::Increment).await;
        let _ = store.send(TestAction::Decrement).await;
        let _ = store.send(TestAction::NoOp).await;

        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_future_effect_feeds_back() {
        let store = store();

        let mut handle = store.send(TestAction::ProduceEffect).await.unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle.wait())
            .await
            .unwrap();

        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_delay_effect() {
        let store = store();

        let mut handle = store.send(TestAction::ProduceDelayedAction).await.unwrap();
        assert_eq!(store.state(|s| s.value).await, 0);

        handle.wait().await;
        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_parallel_effects() {
        let store = store();

        let mut handle = store.send(TestAction::ProduceParallelEffects).await.unwrap();
        handle.wait().await;

        assert_eq!(store.state(|s| s.value).await, 3);
    }

    #[tokio::test]
    async fn test_sequential_effects() {
        let store = store();

        let mut handle = store.send(TestAction::ProduceSequentialEffects).await.unwrap();
        handle.wait().await;

        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_panicking_effect_does_not_halt_store() {
        let store = store();

        let mut handle = store.send(TestAction::ProducePanickingEffect).await.unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle.wait())
            .await
            .unwrap();

        let _ = store.send(TestAction::Increment).await;
        assert_eq!(store.state(|s| s.value).await, 1);
        assert_eq!(store.pending_effects(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_actions() {
        let store = store();

        store.shutdown(Duration::from_secs(1)).await.unwrap();

        let result = store.send(TestAction::Increment).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
        assert!(store.health().status.is_unhealthy());
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_effects() {
        let store = store();

        let _ = store.send(TestAction::ProduceDelayedAction).await.unwrap();
        assert_eq!(store.pending_effects(), 1);

        store.shutdown(Duration::from_secs(1)).await.unwrap();
        assert_eq!(store.pending_effects(), 0);
    }

    #[tokio::test]
    async fn test_health_degrades_with_backlog() {
        let store = Store::with_config(
            TestState { value: 0 },
            TestReducer,
            TestEnv,
            StoreConfig::default().with_degraded_pending_effects(0),
        );
        assert!(store.health().status.is_healthy());

        let mut handle = store.send(TestAction::ProduceDelayedAction).await.unwrap();
        assert_eq!(store.health().status, HealthStatus::Degraded);

        handle.wait().await;
    }

    #[tokio::test]
    async fn test_send_and_read_sees_own_outcome() {
        let store = store();

        let (value, handle) = store
            .send_and_read(TestAction::Increment, |s| s.value)
            .await
            .unwrap();
        assert_eq!(value, 1);
        assert_eq!(handle.pending(), 0);
    }

    #[tokio::test]
    async fn test_send_and_read_is_atomic_under_contention() {
        let store = Arc::new(store());

        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .send_and_read(TestAction::Increment, |s| s.value)
                        .await
                        .unwrap()
                        .0
                })
            })
            .collect();

        let mut seen = Vec::new();
        for task in tasks {
            seen.push(task.await.unwrap());
        }
        seen.sort_unstable();

        // Every caller observed the value its own increment produced
        assert_eq!(seen, (1..=32).collect::<Vec<_>>());
    }
}
