//! HTTP handlers shared by every Artistly service.

pub mod health;

pub use health::{health_check, health_check_with_store};
