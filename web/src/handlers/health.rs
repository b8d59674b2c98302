//! Health check endpoints.
//!
//! Liveness answers as long as the process serves requests; readiness
//! reflects the store's own health report.

use artistly_core::reducer::Reducer;
use artistly_runtime::{HealthCheck, HealthStatus, Store};
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

/// Liveness probe.
///
/// ```text
/// GET /health  ->  200 "ok"
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Readiness probe backed by [`Store::health`].
///
/// - 200 OK: healthy or degraded
/// - 503 Service Unavailable: unhealthy (e.g. shutting down)
///
/// ```text
/// GET /health/ready
/// ```
pub async fn health_check_with_store<S, A, E, R>(
    State(store): State<Arc<Store<S, A, E, R>>>,
) -> (StatusCode, Json<HealthCheck>)
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    S: Send + Sync + 'static,
    A: Send + Clone + 'static,
    E: Send + Sync + 'static,
{
    let health = store.health();

    let status = match health.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    if health.status.is_unhealthy() {
        tracing::warn!(component = %health.component, "Readiness check failed");
    }

    (status, Json(health))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use artistly_core::{effect::Effect, SmallVec};

    struct NoopReducer;

    impl Reducer for NoopReducer {
        type State = u32;
        type Action = ();
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            _action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            *state += 1;
            SmallVec::new()
        }
    }

    #[tokio::test]
    async fn test_simple_health_check() {
        let (status, body) = health_check().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_ready_when_store_running() {
        let store = Arc::new(Store::new(0, NoopReducer, ()));

        let (status, Json(health)) = health_check_with_store(State(store)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(health.status, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn test_unavailable_after_shutdown() {
        let store = Arc::new(Store::new(0, NoopReducer, ()));
        store.shutdown_default().await.unwrap();

        let (status, Json(health)) = health_check_with_store(State(Arc::clone(&store))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(health.status, HealthStatus::Unhealthy);
    }
}
