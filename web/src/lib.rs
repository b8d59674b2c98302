//! Axum integration for Artistly stores.
//!
//! HTTP handlers are the imperative shell around pure reducers:
//!
//! 1. **Extract** data from the request (path, query, JSON, raw body)
//! 2. **Build** an action from it
//! 3. **Send** the action through the `Store`
//! 4. **Read** the resulting state and map it to a response
//!
//! This crate supplies the pieces every such handler shares: a JSON error
//! type, correlation-id tracking and health endpoints.

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use middleware::{correlation_id_layer, CORRELATION_ID_HEADER};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
