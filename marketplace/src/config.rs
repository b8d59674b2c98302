//! Configuration management for the marketplace server.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::environment::MarketplaceSettings;
use crate::seed::DEFAULT_ARTIST_IMAGE;
use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Errors raised while turning configuration into runtime values
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A host/port pair is not a socket address
    #[error("Invalid {name} address {value}: {source}")]
    InvalidAddress {
        /// Which address
        name: &'static str,
        /// The offending `host:port`
        value: String,
        /// Parse failure
        source: std::net::AddrParseError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Marketplace behavior
    pub marketplace: MarketplaceConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Log level used when `RUST_LOG` is unset (trace, debug, info, warn, error)
    pub log_level: String,
    /// Whether to serve Prometheus metrics
    pub metrics_enabled: bool,
    /// Metrics server host (for Prometheus scraping)
    pub metrics_host: String,
    /// Metrics server port
    pub metrics_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

/// Marketplace configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    /// Seconds a toast stays visible
    pub toast_ttl_secs: u64,
    /// Largest accepted profile image in bytes
    pub max_image_bytes: usize,
    /// Start with the sample artists and bookings
    pub seed_sample_data: bool,
    /// Image for profiles submitted without one
    pub default_artist_image: String,
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key).and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn text(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            server: ServerConfig {
                host: text(&lookup, "HOST", "0.0.0.0"),
                port: parsed(&lookup, "PORT", 8080),
                log_level: text(&lookup, "LOG_LEVEL", "info"),
                metrics_enabled: parsed(&lookup, "METRICS_ENABLED", false),
                metrics_host: text(&lookup, "METRICS_HOST", "0.0.0.0"),
                metrics_port: parsed(&lookup, "METRICS_PORT", 9090),
                shutdown_timeout: parsed(&lookup, "SHUTDOWN_TIMEOUT", 30),
            },
            marketplace: MarketplaceConfig {
                toast_ttl_secs: parsed(&lookup, "TOAST_TTL_SECS", 5),
                max_image_bytes: parsed(&lookup, "MAX_IMAGE_BYTES", 2 * 1024 * 1024),
                seed_sample_data: parsed(&lookup, "SEED_SAMPLE_DATA", true),
                default_artist_image: text(&lookup, "DEFAULT_ARTIST_IMAGE", DEFAULT_ARTIST_IMAGE),
            },
        }
    }

    /// Address the HTTP server binds to
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddress`] when `host:port` does not parse.
    pub fn server_addr(&self) -> Result<SocketAddr, ConfigError> {
        socket_addr("server", &self.server.host, self.server.port)
    }

    /// Address the metrics exporter binds to
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddress`] when `host:port` does not parse.
    pub fn metrics_addr(&self) -> Result<SocketAddr, ConfigError> {
        socket_addr("metrics", &self.server.metrics_host, self.server.metrics_port)
    }

    /// Graceful shutdown budget
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout)
    }

    /// Settings handed to the reducers through the environment
    #[must_use]
    pub fn settings(&self) -> MarketplaceSettings {
        MarketplaceSettings {
            toast_ttl: Duration::from_secs(self.marketplace.toast_ttl_secs),
            max_image_bytes: self.marketplace.max_image_bytes,
            default_artist_image: self.marketplace.default_artist_image.clone(),
        }
    }
}

fn socket_addr(name: &'static str, host: &str, port: u16) -> Result<SocketAddr, ConfigError> {
    let value = format!("{host}:{port}");
    value
        .parse()
        .map_err(|source| ConfigError::InvalidAddress { name, value, source })
}
