//! Playtrust library crate
//!
//! Re-exports the scoring core and the service modules for integration tests
//! and external use.

pub mod api;
pub mod config;
pub mod error;
pub mod scoring;

// Re-export commonly used types
pub use config::Config;
pub use error::Result;
pub use scoring::*;
