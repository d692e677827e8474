//! # routes-rs-http
//!
//! Route recognition and URL generation. A [`Mapper`] holds an ordered list
//! of routes such as `:controller/:action/:id`; once compiled it maps request
//! paths to parameter sets and parameter sets back to paths.
//!
//! ## Modules
//!
//! - [`urls::pattern`] - Route pattern parsing
//! - [`urls::route`] - A single route and its options
//! - [`urls::mapper`] - The route list, compiled table, and matching
//! - [`urls::generate`] - URL generation from parameters and route names
//! - [`urls::resource`] - RESTful resource routes
//! - [`urls::url_for`] - Request-aware generation and redirects
//! - [`urls::context`] - Per-request inputs
//! - [`urls::params`] - Parameter maps and the [`params!`] macro

pub mod urls;

pub use urls::context::RequestContext;
pub use urls::mapper::{Mapper, RouteMatch};
pub use urls::params::Params;
pub use urls::resource::ResourceOptions;
pub use urls::route::{Route, RouteOptions};
