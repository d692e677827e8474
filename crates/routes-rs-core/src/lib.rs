//! # routes-rs-core
//!
//! Shared foundation for the routes-rs crates: error types, settings, the
//! settings loader and logging setup. This crate contains no routing logic.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Mapper, route and resource configuration
//! - [`settings_loader`] - TOML/JSON loading with environment overrides
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{PatternError, RoutesError, RoutesResult};
pub use settings::Settings;
