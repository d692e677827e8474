//! URL recognition and generation.
//!
//! - [`pattern`]: parses patterns like `archive/:year/:(month).html` and `hi/*file`
//! - [`route`]: a route with defaults, requirements and conditions
//! - [`mapper`]: the ordered route list and its compiled [`mapper::RouteTable`]
//! - [`generate`]: parameters (or a route name) to URL
//! - [`resource`]: the RESTful route set for a member/collection pair
//! - [`url_for`]: generation that knows about the current request
//!
//! # Examples
//!
//! ```
//! use routes_rs_http::params;
//! use routes_rs_http::urls::context::RequestContext;
//! use routes_rs_http::urls::mapper::Mapper;
//! use routes_rs_http::urls::route::RouteOptions;
//!
//! let mut m = Mapper::new();
//! m.connect("hi/*file", RouteOptions::new().defaults(params! {"controller" => "files"}))
//!     .unwrap();
//! m.connect(":controller/:action/:id", RouteOptions::new()).unwrap();
//! m.create_regs(&["content", "files"]).unwrap();
//!
//! let ctx = RequestContext::default();
//!
//! // Recognition
//! let result = m.match_path("/hi/books/learning_python.pdf", &ctx).unwrap().unwrap();
//! assert_eq!(result["file"].as_deref(), Some("books/learning_python.pdf"));
//!
//! // Generation
//! let url = m.generate(&params! {"controller" => "content", "action" => "view", "id" => 3}, &ctx).unwrap();
//! assert_eq!(url.as_deref(), Some("/content/view/3"));
//! ```

pub mod context;
pub mod generate;
pub mod mapper;
pub mod params;
pub mod pattern;
pub mod resource;
pub mod route;
pub mod url_for;
