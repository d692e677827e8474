//! # routes-rs-cli
//!
//! Management commands for routes-rs route tables.
//!
//! This crate provides a framework for defining and registering CLI
//! commands, plus built-in commands that load a route settings file:
//!
//! - `check` - compile the table and report problems
//! - `routes` - list the declared routes
//! - `match` - recognize a path and print the values
//! - `generate` - build a URL from `key=value` pairs
//!
//! ## Quick Start
//!
//! ```rust
//! use routes_rs_cli::command::CommandRegistry;
//! use routes_rs_cli::commands::register_builtin_commands;
//!
//! let mut registry = CommandRegistry::new();
//! register_builtin_commands(&mut registry);
//!
//! let names = registry.list_commands();
//! assert_eq!(names, vec!["check", "generate", "match", "routes"]);
//! ```

// - doc_markdown: backtick requirements for documentation items are too strict
// - module_name_repetitions: re-exports make module-prefixed names redundant
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod command;
pub mod commands;

pub use command::{CommandRegistry, ManagementCommand};
