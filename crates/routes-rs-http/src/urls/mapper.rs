//! The mapper: an ordered route list and its compiled table.
//!
//! Routes are registered with [`Mapper::connect`] (or [`Mapper::resource`])
//! and then compiled with [`Mapper::create_regs`], which builds an immutable
//! [`RouteTable`] holding every route's regular expression and the
//! generation index. The table is published through an atomic pointer, so
//! any number of threads can match and generate against a shared mapper
//! while a recompile swaps in a new table. Changing the route list or the
//! mapper settings drops the current table; matching before the next
//! `create_regs` fails with [`RoutesError::NotCompiled`].
//!
//! ```
//! use routes_rs_http::params;
//! use routes_rs_http::urls::context::RequestContext;
//! use routes_rs_http::urls::mapper::Mapper;
//! use routes_rs_http::urls::route::RouteOptions;
//!
//! let mut m = Mapper::new();
//! m.connect(
//!     "archive/:year/:month/:day",
//!     RouteOptions::new()
//!         .defaults(params! {"controller" => "blog", "action" => "view", "month" => None::<&str>, "day" => None::<&str>})
//!         .requirement("year", r"\d{4}"),
//! )
//! .unwrap();
//! m.connect(":controller/:action/:id", RouteOptions::new()).unwrap();
//! m.create_regs(&["blog", "content"]).unwrap();
//!
//! let ctx = RequestContext::default();
//! let result = m.match_path("/archive/2004/10", &ctx).unwrap().unwrap();
//! assert_eq!(result["year"].as_deref(), Some("2004"));
//! assert_eq!(result["day"], None);
//!
//! let url = m.generate(&params! {"controller" => "blog", "action" => "view", "year" => 2004}, &ctx).unwrap();
//! assert_eq!(url.as_deref(), Some("/archive/2004"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use regex::Regex;
use serde::Serialize;

use routes_rs_core::settings::{MapperSettings, RouteSpec, Settings, SubDomainSpec};
use routes_rs_core::{RoutesError, RoutesResult};

use super::context::RequestContext;
use super::generate::GenIndex;
use super::params::Params;
use super::resource::ResourceOptions;
use super::route::{MatchEnv, Route, RouteOptions, SubDomainCondition};

/// A successful match: the values and the route that produced them.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// Matched values merged with the route's defaults.
    pub params: Params,
    /// The matched route.
    pub route: Arc<Route>,
}

/// One route's outcome during a traced match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchLogEntry {
    /// The route pattern.
    pub path: String,
    /// The route name, if any.
    pub name: Option<String>,
    /// Static routes are listed but never tried.
    pub is_static: bool,
    /// Whether this route produced the match.
    pub matched: bool,
}

/// The result of [`Mapper::match_debug`].
#[derive(Debug, Clone)]
pub struct MatchTrace {
    /// The match, if any route accepted the path.
    pub result: Option<RouteMatch>,
    /// Every route considered, in order, up to and including the match.
    pub log: Vec<MatchLogEntry>,
}

#[derive(Debug)]
pub(crate) struct CompiledRoute {
    pub route: Arc<Route>,
    pub regex: Option<Regex>,
}

/// An immutable, compiled snapshot of a mapper's routes.
#[derive(Debug)]
pub struct RouteTable {
    pub(crate) settings: MapperSettings,
    pub(crate) routes: Vec<CompiledRoute>,
    pub(crate) gen_index: GenIndex,
    names: HashMap<String, usize>,
    controllers: Vec<String>,
    domain_regex: Regex,
}

impl RouteTable {
    fn build(
        settings: MapperSettings,
        routes: &[Arc<Route>],
        controllers: Vec<String>,
    ) -> RoutesResult<Self> {
        let mut compiled = Vec::with_capacity(routes.len());
        let mut names = HashMap::new();
        for (idx, route) in routes.iter().enumerate() {
            let regex = if route.is_static() {
                None
            } else {
                let source = route.regex_source(&controllers);
                let regex = Regex::new(&source).map_err(|e| {
                    RoutesError::ConfigurationError(format!(
                        "route '{}' compiled to an invalid expression '{source}': {e}",
                        route.path()
                    ))
                })?;
                Some(regex)
            };
            if let Some(name) = route.name() {
                names.insert(name.to_string(), idx);
            }
            compiled.push(CompiledRoute {
                route: Arc::clone(route),
                regex,
            });
        }

        let domain_regex = Regex::new(&format!(r"^(.+?)\.({})$", settings.domain_match))
            .map_err(|e| {
                RoutesError::ConfigurationError(format!(
                    "invalid domain_match '{}': {e}",
                    settings.domain_match
                ))
            })?;

        let gen_index = GenIndex::build(&compiled);

        Ok(Self {
            settings,
            routes: compiled,
            gen_index,
            names,
            controllers,
            domain_regex,
        })
    }

    /// Returns the number of routes in the table.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if the table has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Returns the controller list the table was compiled with.
    pub fn controllers(&self) -> &[String] {
        &self.controllers
    }

    /// Returns the settings the table was compiled with.
    pub const fn settings(&self) -> &MapperSettings {
        &self.settings
    }

    /// Looks up a route by name. A later route with the same name wins.
    pub fn named(&self, name: &str) -> Option<&Arc<Route>> {
        self.names.get(name).map(|&idx| &self.routes[idx].route)
    }

    /// Returns the compiled expression of the route at `idx`, if it is not static.
    pub fn regex(&self, idx: usize) -> Option<&Regex> {
        self.routes.get(idx).and_then(|c| c.regex.as_ref())
    }

    /// Splits a host (without port) into `(sub_domain, domain)`.
    pub(crate) fn split_host<'h>(&self, host: &'h str) -> Option<(&'h str, &'h str)> {
        let caps = self.domain_regex.captures(host)?;
        Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
    }

    /// Returns `true` if `sub_domain` counts as "no sub-domain".
    pub(crate) fn is_ignored_sub_domain(&self, sub_domain: &str) -> bool {
        self.settings
            .sub_domains_ignore
            .iter()
            .any(|ignored| ignored == sub_domain)
    }

    /// The sub-domain the request was made to, when sub-domain support is on.
    fn request_sub_domain<'c>(&self, ctx: &'c RequestContext) -> Option<&'c str> {
        if !self.settings.sub_domains {
            return None;
        }
        let host = strip_port(ctx.http_host()?).0;
        let (sub, _) = self.split_host(host)?;
        (!self.is_ignored_sub_domain(sub)).then_some(sub)
    }

    fn recognize(
        &self,
        path: &str,
        ctx: &RequestContext,
        mut log: Option<&mut Vec<MatchLogEntry>>,
    ) -> Option<RouteMatch> {
        let url = match self.settings.prefix.as_deref().filter(|p| !p.is_empty()) {
            Some(prefix) => match path.strip_prefix(prefix) {
                Some("") => "/",
                Some(rest) => rest,
                None => {
                    tracing::trace!(path, prefix, "Path outside of mapper prefix");
                    return None;
                }
            },
            None => path,
        };

        let env = MatchEnv {
            ctx,
            sub_domain: self.request_sub_domain(ctx),
            record_sub_domain: self.settings.sub_domains,
        };

        for compiled in &self.routes {
            let route = &compiled.route;
            let Some(regex) = &compiled.regex else {
                if let Some(log) = log.as_deref_mut() {
                    log.push(MatchLogEntry {
                        path: route.path().to_string(),
                        name: route.name().map(String::from),
                        is_static: true,
                        matched: false,
                    });
                }
                continue;
            };

            let result = route.recognize(regex, url, &env);
            tracing::trace!(route = route.path(), matched = result.is_some(), "Trying route");
            if let Some(log) = log.as_deref_mut() {
                log.push(MatchLogEntry {
                    path: route.path().to_string(),
                    name: route.name().map(String::from),
                    is_static: false,
                    matched: result.is_some(),
                });
            }
            if let Some(params) = result {
                tracing::debug!(path, route = route.path(), "Matched route");
                return Some(RouteMatch {
                    params,
                    route: Arc::clone(route),
                });
            }
        }
        tracing::debug!(path, "No route matched");
        None
    }
}

/// Splits `host:port` into the host and the `:port` suffix (possibly empty).
pub(crate) fn strip_port(host: &str) -> (&str, &str) {
    match host.find(':') {
        Some(idx) => host.split_at(idx),
        None => (host, ""),
    }
}

/// An ordered list of routes plus the compiled table used to serve them.
pub struct Mapper {
    settings: MapperSettings,
    routes: Vec<Arc<Route>>,
    table: ArcSwapOption<RouteTable>,
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("settings", &self.settings)
            .field("routes", &self.routes.len())
            .field("compiled", &self.is_compiled())
            .finish()
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new()
    }
}

impl Mapper {
    /// Creates an empty mapper with default settings.
    pub fn new() -> Self {
        Self::with_settings(MapperSettings::default())
    }

    /// Creates an empty mapper with the given settings.
    pub fn with_settings(settings: MapperSettings) -> Self {
        Self {
            settings,
            routes: Vec::new(),
            table: ArcSwapOption::empty(),
        }
    }

    /// Builds and compiles a mapper from a settings file's contents.
    ///
    /// Resources are registered first, then routes, each in file order.
    ///
    /// # Errors
    ///
    /// Returns the first pattern, requirement or compile error encountered.
    pub fn from_settings(settings: &Settings) -> RoutesResult<Self> {
        let mut mapper = Self::with_settings(settings.mapper.clone());
        for spec in &settings.resources {
            mapper.resource(&spec.member, &spec.collection, ResourceOptions::from(spec))?;
        }
        for spec in &settings.routes {
            mapper.connect(&spec.path, RouteOptions::from(spec))?;
        }
        mapper.create_regs(&settings.controllers)?;
        Ok(mapper)
    }

    /// Returns the mapper settings.
    pub const fn settings(&self) -> &MapperSettings {
        &self.settings
    }

    /// Returns the settings for modification. Drops the compiled table.
    pub fn settings_mut(&mut self) -> &mut MapperSettings {
        self.table.store(None);
        &mut self.settings
    }

    /// Returns the registered routes in order.
    pub fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }

    /// Registers a route at the end of the list. Drops the compiled table.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed pattern or an invalid requirement.
    pub fn connect(&mut self, path: &str, opts: RouteOptions) -> RoutesResult<Arc<Route>> {
        let name = opts.route_name().map(String::from);
        let route = Arc::new(Route::new(path, opts, self.settings.explicit)?);
        tracing::debug!(path, name = ?name, "Connected route");
        self.routes.push(Arc::clone(&route));
        self.table.store(None);
        Ok(route)
    }

    /// Compiles every route against `controllers` and publishes the table.
    ///
    /// Must be called before matching or generating, and again after the
    /// route list or settings change.
    ///
    /// # Errors
    ///
    /// Returns [`RoutesError::ConfigurationError`] if a route or the
    /// `domain_match` setting does not form a valid regular expression.
    pub fn create_regs<S: AsRef<str>>(&self, controllers: &[S]) -> RoutesResult<()> {
        let controllers: Vec<String> = controllers
            .iter()
            .map(|c| c.as_ref().to_string())
            .collect();
        let controller_count = controllers.len();
        let table = RouteTable::build(self.settings.clone(), &self.routes, controllers)?;
        tracing::debug!(
            routes = table.len(),
            controllers = controller_count,
            "Compiled route table"
        );
        self.table.store(Some(Arc::new(table)));
        Ok(())
    }

    /// Returns `true` if a compiled table is available.
    pub fn is_compiled(&self) -> bool {
        self.table.load().is_some()
    }

    /// Returns the current compiled table.
    ///
    /// # Errors
    ///
    /// Returns [`RoutesError::NotCompiled`] if `create_regs` has not been
    /// called since the last change.
    pub fn table(&self) -> RoutesResult<Arc<RouteTable>> {
        self.table.load_full().ok_or(RoutesError::NotCompiled)
    }

    /// Matches `path` and returns the resulting values.
    ///
    /// # Errors
    ///
    /// Returns [`RoutesError::EmptyPath`] for an empty path and
    /// [`RoutesError::NotCompiled`] before `create_regs`.
    pub fn match_path(&self, path: &str, ctx: &RequestContext) -> RoutesResult<Option<Params>> {
        Ok(self.route_match(path, ctx)?.map(|m| m.params))
    }

    /// Matches `path` and returns the values together with the matched route.
    ///
    /// With the `debug` setting on, the full per-route trace is logged.
    ///
    /// # Errors
    ///
    /// See [`Mapper::match_path`].
    pub fn route_match(&self, path: &str, ctx: &RequestContext) -> RoutesResult<Option<RouteMatch>> {
        if self.settings.debug {
            let trace = self.match_debug(path, ctx)?;
            tracing::debug!(path, log = ?trace.log, "Match trace");
            return Ok(trace.result);
        }
        if path.is_empty() {
            return Err(RoutesError::EmptyPath);
        }
        Ok(self.table()?.recognize(path, ctx, None))
    }

    /// Matches `path` and records which routes were considered.
    ///
    /// # Errors
    ///
    /// See [`Mapper::match_path`].
    pub fn match_debug(&self, path: &str, ctx: &RequestContext) -> RoutesResult<MatchTrace> {
        if path.is_empty() {
            return Err(RoutesError::EmptyPath);
        }
        let table = self.table()?;
        let mut log = Vec::new();
        let result = table.recognize(path, ctx, Some(&mut log));
        Ok(MatchTrace { result, log })
    }
}

impl From<&RouteSpec> for RouteOptions {
    fn from(spec: &RouteSpec) -> Self {
        let mut defaults: Params = spec
            .defaults
            .iter()
            .map(|(k, v)| (k.clone(), Some(v.clone())))
            .collect();
        for key in &spec.optional {
            defaults.insert(key.clone(), None);
        }

        let mut opts = Self::new()
            .defaults(defaults)
            .methods(&spec.methods)
            .is_static(spec.static_url)
            .absolute(spec.absolute);
        if let Some(name) = &spec.name {
            opts = opts.name(name);
        }
        for (key, regex) in &spec.requirements {
            opts = opts.requirement(key, regex);
        }
        match &spec.sub_domain {
            Some(SubDomainSpec::Any(true)) => opts = opts.sub_domain(SubDomainCondition::Any),
            Some(SubDomainSpec::OneOf(list)) => {
                opts = opts.sub_domain(SubDomainCondition::OneOf(list.clone()));
            }
            Some(SubDomainSpec::Any(false)) | None => {}
        }
        if let Some(explicit) = spec.explicit {
            opts = opts.explicit(explicit);
        }
        opts
    }
}
