//! Prometheus metrics for observability and monitoring.
//!
//! The store records its own counters and histograms through the `metrics`
//! facade; this module installs the Prometheus recorder, serves the scrape
//! endpoint and describes every metric the workspace emits.
//!
//! # Example
//!
//! ```rust,no_run
//! use artistly_runtime::metrics::MetricsServer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = MetricsServer::new("0.0.0.0:9090".parse()?);
//! server.start()?;
//!
//! // Metrics available at http://localhost:9090/metrics
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use thiserror::Error;

// Re-export metrics macros for use in other crates
pub use metrics::{counter, gauge, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Prometheus metrics server.
///
/// Exposes metrics on an HTTP endpoint for Prometheus scraping.
#[derive(Debug, Clone, Copy)]
pub struct MetricsServer {
    addr: SocketAddr,
}

impl MetricsServer {
    /// Create a new metrics server.
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Address the scrape endpoint listens on.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Install the Prometheus recorder and start serving `/metrics`.
    ///
    /// Must be called from within a Tokio runtime: the scrape listener is
    /// spawned onto it.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or another recorder is
    /// already installed.
    pub fn start(&self) -> Result<(), MetricsError> {
        let (recorder, exporter) = PrometheusBuilder::new()
            .with_http_listener(self.addr)
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?
            .build()
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        metrics::set_global_recorder(recorder).map_err(|e| MetricsError::Install(e.to_string()))?;

        register_metrics();

        tokio::spawn(async move {
            // ExporterError carries no Debug or Display impl
            if exporter.await.is_err() {
                tracing::error!("Metrics exporter stopped");
            }
        });

        tracing::info!(addr = %self.addr, "Metrics server started - available at http://{}/metrics", self.addr);
        Ok(())
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    // Store
    describe_counter!("store.commands.total", "Total number of actions sent to stores");
    describe_histogram!(
        "store.reducer.duration_seconds",
        "Time taken to run a reducer for one action"
    );
    describe_histogram!("store.effects.count", "Number of effects returned per action");
    describe_counter!("store.effects.executed", "Effects executed, labelled by type");
    describe_counter!(
        "store.shutdown.rejected_actions",
        "Actions rejected because the store was shutting down"
    );

    // Marketplace
    describe_counter!("marketplace.artists.added", "Artist profiles added to the catalog");
    describe_counter!("marketplace.bookings.added", "Bookings created");
    describe_counter!(
        "marketplace.bookings.status_changed",
        "Booking status transitions, labelled by new status"
    );
    describe_counter!(
        "marketplace.validation.failed",
        "Commands rejected by validation, labelled by feature"
    );
    describe_gauge!("marketplace.notifications.active", "Toasts currently displayed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_keeps_its_address() {
        let addr = SocketAddr::from(([127, 0, 0, 1], 9090));
        assert_eq!(MetricsServer::new(addr).addr(), addr);
    }

    #[test]
    fn descriptions_register_without_a_recorder() {
        register_metrics();
    }
}
