//! # routes-rs
//!
//! A Routes-style URL mapper for Rust.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `routes-rs` to get everything, or depend on individual
//! crates for finer-grained control.
//!
//! ```
//! # #[cfg(feature = "http")]
//! # {
//! use routes_rs::{params, Mapper, RequestContext, RouteOptions};
//!
//! let mut m = Mapper::new();
//! m.connect(":controller/:action/:id", RouteOptions::new()).unwrap();
//! m.create_regs(&["blog"]).unwrap();
//!
//! let ctx = RequestContext::default();
//! let found = m.match_path("/blog/view/3", &ctx).unwrap().unwrap();
//! assert_eq!(found["action"].as_deref(), Some("view"));
//!
//! let url = m.generate(&params! {"controller" => "blog", "action" => "edit", "id" => 3}, &ctx);
//! assert_eq!(url.unwrap().as_deref(), Some("/blog/edit/3"));
//! # }
//! ```

/// Errors, settings, the settings loader, and logging setup.
pub use routes_rs_core as core;

pub use routes_rs_core::{RoutesError, RoutesResult, Settings};

/// Route recognition, URL generation, resources, and `url_for`.
#[cfg(feature = "http")]
pub use routes_rs_http as http;

#[cfg(feature = "http")]
pub use routes_rs_http::{
    params, Mapper, Params, RequestContext, ResourceOptions, Route, RouteMatch, RouteOptions,
};

/// Management commands (CLI).
#[cfg(feature = "cli")]
pub use routes_rs_cli as cli;
