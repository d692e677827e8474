//! A single route: pattern, defaults, requirements and conditions.
//!
//! A [`Route`] is built once from a pattern and a [`RouteOptions`] bag and is
//! immutable afterwards. It knows how to turn itself into a matching regular
//! expression for a given controller list, how to recognize a path against
//! that expression, and how to render itself back into a path from a set of
//! parameters.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use routes_rs_core::{RoutesError, RoutesResult};

use super::context::RequestContext;
use super::params::{self, Params};
use super::pattern::{self, Segment};
use super::resource::ResourceInfo;

/// A predicate that can veto a match after the pattern has matched.
///
/// Receives the request context and the tentative match result.
pub type ConditionFn = Arc<dyn Fn(&RequestContext, &Params) -> bool + Send + Sync>;

/// A transform applied to generation arguments before a named route is rendered.
pub type RouteFilter = Arc<dyn Fn(Params) -> Params + Send + Sync>;

/// A sub-domain restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubDomainCondition {
    /// Any sub-domain, but one must be present.
    Any,
    /// One of the listed sub-domains.
    OneOf(Vec<String>),
}

/// Conditions evaluated against the request context after the path matched.
#[derive(Clone, Default)]
pub struct Conditions {
    /// Accepted HTTP methods, upper-cased. `None` accepts any method.
    pub methods: Option<Vec<String>>,
    /// A required sub-domain.
    pub sub_domain: Option<SubDomainCondition>,
    /// An arbitrary predicate.
    pub function: Option<ConditionFn>,
}

impl fmt::Debug for Conditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conditions")
            .field("methods", &self.methods)
            .field("sub_domain", &self.sub_domain)
            .field("function", &self.function.is_some())
            .finish()
    }
}

impl Conditions {
    /// Returns `true` if no condition is set.
    pub const fn is_empty(&self) -> bool {
        self.methods.is_none() && self.sub_domain.is_none() && self.function.is_none()
    }
}

/// Options for [`Mapper::connect`](super::mapper::Mapper::connect).
///
/// # Examples
///
/// ```
/// use routes_rs_http::params;
/// use routes_rs_http::urls::route::RouteOptions;
///
/// let opts = RouteOptions::new()
///     .name("archive")
///     .defaults(params! {"controller" => "blog", "action" => "view"})
///     .requirement("year", r"\d{4}")
///     .method("GET");
/// ```
#[derive(Clone, Default)]
pub struct RouteOptions {
    name: Option<String>,
    defaults: Params,
    requirements: BTreeMap<String, String>,
    conditions: Conditions,
    is_static: bool,
    absolute: bool,
    explicit: Option<bool>,
    filter: Option<RouteFilter>,
    resource: Option<ResourceInfo>,
}

impl fmt::Debug for RouteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteOptions")
            .field("name", &self.name)
            .field("defaults", &self.defaults)
            .field("requirements", &self.requirements)
            .field("conditions", &self.conditions)
            .field("is_static", &self.is_static)
            .finish_non_exhaustive()
    }
}

impl RouteOptions {
    /// Creates an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the route for named generation.
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Adds default values. A null value makes the key optional with no value.
    #[must_use]
    pub fn defaults(mut self, defaults: Params) -> Self {
        self.defaults.extend(defaults);
        self
    }

    /// Restricts `key` to values matching `regex` in full.
    #[must_use]
    pub fn requirement(mut self, key: &str, regex: &str) -> Self {
        self.requirements.insert(key.to_string(), regex.to_string());
        self
    }

    /// Adds an accepted HTTP method.
    #[must_use]
    pub fn method(mut self, method: &str) -> Self {
        self.conditions
            .methods
            .get_or_insert_with(Vec::new)
            .push(method.to_uppercase());
        self
    }

    /// Adds several accepted HTTP methods.
    #[must_use]
    pub fn methods<I, S>(self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        methods
            .into_iter()
            .fold(self, |opts, m| opts.method(m.as_ref()))
    }

    /// Requires a sub-domain.
    #[must_use]
    pub fn sub_domain(mut self, condition: SubDomainCondition) -> Self {
        self.conditions.sub_domain = Some(condition);
        self
    }

    /// Adds a predicate that can veto a match.
    #[must_use]
    pub fn function<F>(mut self, function: F) -> Self
    where
        F: Fn(&RequestContext, &Params) -> bool + Send + Sync + 'static,
    {
        self.conditions.function = Some(Arc::new(function));
        self
    }

    /// Marks the route as static: never matched, generated only by name.
    #[must_use]
    pub const fn is_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Generated URLs skip the mapper prefix and script name.
    #[must_use]
    pub const fn absolute(mut self, absolute: bool) -> Self {
        self.absolute = absolute;
        self
    }

    /// Overrides the mapper's implicit-defaults switch for this route.
    #[must_use]
    pub const fn explicit(mut self, explicit: bool) -> Self {
        self.explicit = Some(explicit);
        self
    }

    /// Adds a transform applied to arguments before named generation.
    #[must_use]
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(Params) -> Params + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    #[must_use]
    pub(crate) fn resource(mut self, info: ResourceInfo) -> Self {
        self.resource = Some(info);
        self
    }

    pub(crate) fn route_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Request-level inputs shared by every route during one match call.
pub(crate) struct MatchEnv<'a> {
    pub ctx: &'a RequestContext,
    pub sub_domain: Option<&'a str>,
    pub record_sub_domain: bool,
}

/// A registered route.
pub struct Route {
    path: String,
    segments: Vec<Segment>,
    defaults: Params,
    requirements: BTreeMap<String, String>,
    requirement_regexes: BTreeMap<String, Regex>,
    conditions: Conditions,
    name: Option<String>,
    is_static: bool,
    absolute: bool,
    explicit: bool,
    filter: Option<RouteFilter>,
    resource: Option<ResourceInfo>,
    max_keys: BTreeSet<String>,
    min_keys: BTreeSet<String>,
    hard_coded: BTreeSet<String>,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("defaults", &self.defaults)
            .field("requirements", &self.requirements)
            .field("conditions", &self.conditions)
            .field("is_static", &self.is_static)
            .finish_non_exhaustive()
    }
}

impl Route {
    /// Builds a route from a pattern and options.
    ///
    /// `mapper_explicit` is used unless the options override it. Unless
    /// explicit, a route gets `controller = "content"` and `action = "index"`
    /// when neither the pattern nor the defaults mention them, and a pattern
    /// `:id` without a default becomes optional.
    ///
    /// # Errors
    ///
    /// Returns [`RoutesError::Pattern`] for a malformed pattern and
    /// [`RoutesError::InvalidRequirement`] for a requirement that is not a
    /// valid regular expression.
    pub fn new(path: &str, opts: RouteOptions, mapper_explicit: bool) -> RoutesResult<Self> {
        let explicit = opts.explicit.unwrap_or(mapper_explicit);

        let mut segments = if opts.is_static {
            vec![Segment::Static(path.to_string())]
        } else {
            pattern::compile(path)?
        };
        for segment in &mut segments {
            if let Segment::Dynamic { name, requirement } = segment {
                *requirement = opts.requirements.get(name.as_str()).cloned();
            }
        }

        let route_keys: BTreeSet<String> = segments
            .iter()
            .filter_map(Segment::name)
            .map(String::from)
            .collect();

        let mut requirement_regexes = BTreeMap::new();
        for (key, expr) in &opts.requirements {
            let regex = Regex::new(&format!("^(?:{expr})$")).map_err(|e| {
                RoutesError::InvalidRequirement {
                    name: key.clone(),
                    pattern: expr.clone(),
                    message: e.to_string(),
                }
            })?;
            requirement_regexes.insert(key.clone(), regex);
        }

        let defaults = implicit_defaults(opts.defaults, &route_keys, explicit);

        let max_keys: BTreeSet<String> = defaults
            .keys()
            .cloned()
            .chain(route_keys.iter().cloned())
            .collect();
        let min_keys = minimum_keys(&segments, &defaults);
        let hard_coded = max_keys
            .iter()
            .filter(|key| !route_keys.contains(*key) && params::has_value(&defaults, key))
            .cloned()
            .collect();

        Ok(Self {
            path: path.to_string(),
            segments,
            defaults,
            requirements: opts.requirements,
            requirement_regexes,
            conditions: opts.conditions,
            name: opts.name,
            is_static: opts.is_static,
            absolute: opts.absolute,
            explicit,
            filter: opts.filter,
            resource: opts.resource,
            max_keys,
            min_keys,
            hard_coded,
        })
    }

    /// Returns the pattern as registered.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the route's default values, including implicit ones.
    pub const fn defaults(&self) -> &Params {
        &self.defaults
    }

    /// Returns the requirement expressions.
    pub const fn requirements(&self) -> &BTreeMap<String, String> {
        &self.requirements
    }

    /// Returns the match conditions.
    pub const fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    /// Returns the route name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns `true` for static routes.
    pub const fn is_static(&self) -> bool {
        self.is_static
    }

    /// Returns `true` if generated URLs skip the prefix and script name.
    pub const fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Returns `true` if implicit defaults were disabled.
    pub const fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// Returns the generation filter, if any.
    pub const fn filter(&self) -> Option<&RouteFilter> {
        self.filter.as_ref()
    }

    /// Returns the resource this route was generated for, if any.
    pub const fn resource(&self) -> Option<&ResourceInfo> {
        self.resource.as_ref()
    }

    /// Every key this route can consume: pattern keys plus default keys.
    pub const fn max_keys(&self) -> &BTreeSet<String> {
        &self.max_keys
    }

    /// The keys that must be supplied to generate this route.
    pub const fn min_keys(&self) -> &BTreeSet<String> {
        &self.min_keys
    }

    /// Default keys absent from the pattern that carry a value.
    pub const fn hard_coded(&self) -> &BTreeSet<String> {
        &self.hard_coded
    }

    /// Builds the regular expression source used to recognize this route.
    ///
    /// `controllers` is the alternation used for a `:controller` part that
    /// has no explicit requirement.
    pub fn regex_source(&self, controllers: &[String]) -> String {
        let n = self.segments.len();
        let prior = if n >= 2 {
            match &self.segments[n - 2] {
                Segment::Static(text) => Some(text.as_str()),
                _ => None,
            }
        } else {
            None
        };

        // `noreqs`: nothing to the right requires text. `allblank`: everything
        // to the right may be empty.
        let mut reg = String::new();
        let mut noreqs = true;
        let mut allblank = true;

        for part in self.segments.iter().rev() {
            let rest = std::mem::take(&mut reg);
            reg = match part {
                Segment::Dynamic { name, requirement } => {
                    let has_default = self.defaults.contains_key(name);
                    let part_reg = if let Some(req) = requirement {
                        format!("(?P<{name}>{req})")
                    } else if name == "controller" {
                        let alternation: Vec<String> =
                            controllers.iter().map(|c| regex::escape(c)).collect();
                        format!("(?P<{name}>{})", alternation.join("|"))
                    } else if let Some(p @ ("/" | "#")) = prior {
                        format!("(?P<{name}>[^{p}]+?)")
                    } else if rest.is_empty() {
                        format!("(?P<{name}>[^/]+?)")
                    } else {
                        format!("(?P<{name}>[^/,;.#]+?)")
                    };

                    if requirement.is_some() {
                        noreqs = false;
                    }
                    if !has_default {
                        allblank = false;
                        noreqs = false;
                    }

                    if noreqs {
                        if matches!(prior, Some("," | ";" | ".")) {
                            format!("{part_reg}{rest}")
                        } else {
                            format!("{part_reg}?{rest}")
                        }
                    } else if allblank && has_default {
                        format!("({part_reg}{rest})?")
                    } else {
                        format!("{part_reg}{rest}")
                    }
                }
                Segment::Glob(name) => {
                    // A glob without a default must capture something.
                    if self.defaults.contains_key(name) {
                        format!("(?P<{name}>.*){rest}")
                    } else {
                        allblank = false;
                        noreqs = false;
                        format!("(?P<{name}>.+){rest}")
                    }
                }
                Segment::Static(text) if part.ends_with_split_char() => {
                    if allblank {
                        let split = text.len() - 1;
                        format!(
                            "{}({}{rest})?",
                            regex::escape(&text[..split]),
                            regex::escape(&text[split..])
                        )
                    } else {
                        format!("{}{rest}", regex::escape(text))
                    }
                }
                Segment::Static(text) => {
                    noreqs = false;
                    allblank = false;
                    format!("{}{rest}", regex::escape(text))
                }
            };
        }

        if reg.is_empty() {
            reg.push('/');
        }
        reg.push_str("(/)?$");
        if !reg.starts_with('/') {
            reg.insert(0, '/');
        }
        reg.insert(0, '^');
        reg
    }

    /// Recognizes `url` with this route's compiled expression.
    ///
    /// Returns the merged match values, or `None` if the path, a condition,
    /// or the function predicate rejects the request.
    pub(crate) fn recognize(&self, regex: &Regex, url: &str, env: &MatchEnv<'_>) -> Option<Params> {
        if self.is_static {
            return None;
        }

        let url = if url.len() > 1 {
            url.strip_suffix('/').unwrap_or(url)
        } else {
            url
        };
        let captures = regex.captures(url)?;

        if let Some(methods) = &self.conditions.methods {
            let method = env.ctx.method()?;
            if !methods.iter().any(|m| m == method) {
                return None;
            }
        }
        match &self.conditions.sub_domain {
            Some(SubDomainCondition::Any) if env.sub_domain.is_none() => return None,
            Some(SubDomainCondition::OneOf(allowed))
                if !env
                    .sub_domain
                    .is_some_and(|sub| allowed.iter().any(|a| a == sub)) =>
            {
                return None
            }
            _ => {}
        }

        let mut result = Params::new();
        for name in regex.capture_names().flatten() {
            let captured = captures.name(name).map(|m| {
                if name == "path_info" {
                    m.as_str().to_string()
                } else {
                    params::url_unquote(m.as_str())
                }
            });
            let value = match self.defaults.get(name) {
                Some(Some(default))
                    if !default.is_empty() && captured.as_deref().unwrap_or_default().is_empty() =>
                {
                    Some(default.clone())
                }
                _ => captured,
            };
            result.insert(name.to_string(), value);
        }
        for (key, default) in &self.defaults {
            result
                .entry(key.clone())
                .or_insert_with(|| default.clone());
        }

        if env.record_sub_domain {
            result.insert("sub_domain".to_string(), env.sub_domain.map(String::from));
        }

        if let Some(function) = &self.conditions.function {
            if !function(env.ctx, &result) {
                return None;
            }
        }

        Some(result)
    }

    /// Renders this route from `kargs`.
    ///
    /// Trailing parts whose values equal their defaults are left off. Keys
    /// this route cannot place in the path become a query string in key
    /// order. Returns `None` when a requirement fails, a `method` argument is
    /// not accepted, or a required part has no value.
    pub fn generate(&self, kargs: &Params, append_slash: bool) -> Option<String> {
        for (key, regex) in &self.requirement_regexes {
            if let Some(value) = params::value(kargs, key) {
                if !value.is_empty() && !regex.is_match(value) {
                    return None;
                }
            }
        }

        let mut kargs = kargs.clone();
        if let Some(method) = params::value(&kargs, "method").filter(|m| !m.is_empty()) {
            if let Some(methods) = &self.conditions.methods {
                let method = method.to_uppercase();
                if !methods.iter().any(|m| *m == method) {
                    return None;
                }
            }
            kargs.remove("method");
        }

        let mut url_list: Vec<String> = Vec::new();
        let mut gaps = false;
        for part in self.segments.iter().rev() {
            match part {
                Segment::Dynamic { name, .. } => {
                    let arg = kargs.get(name.as_str());
                    let default = self.defaults.get(name.as_str());

                    if !gaps {
                        match (arg, default) {
                            (None, Some(_)) => continue,
                            (Some(a), Some(d)) if params::loosely_equal(a.as_deref(), d.as_deref()) => {
                                continue
                            }
                            (Some(None), Some(_)) => continue,
                            _ => {}
                        }
                    }

                    let value = match (arg, default) {
                        (Some(a), _) => a.clone().unwrap_or_else(|| "null".to_string()),
                        (None, Some(Some(d))) if !d.is_empty() => d.clone(),
                        _ => return None,
                    };
                    // Controller names may contain `/` and match it literally.
                    if name == "controller" {
                        url_list.push(params::url_quote(&value));
                    } else {
                        url_list.push(params::url_quote_segment(&value));
                    }
                    kargs.remove(name.as_str());
                    gaps = true;
                }
                Segment::Glob(name) => {
                    if let Some(value) = params::value(&kargs, name).filter(|v| !v.is_empty()) {
                        url_list.push(params::url_quote(value));
                        gaps = true;
                    }
                }
                Segment::Static(text) if part.ends_with_split_char() => {
                    if !gaps && part.is_split_char() {
                        continue;
                    }
                    if gaps {
                        url_list.push(text.clone());
                    } else {
                        url_list.push(text[..text.len() - 1].to_string());
                    }
                    gaps = true;
                }
                Segment::Static(text) => {
                    url_list.push(text.clone());
                    gaps = true;
                }
            }
        }

        url_list.reverse();
        let mut url = url_list.concat();
        if !url.starts_with('/') {
            url.insert(0, '/');
        }

        let extras: Params = kargs
            .into_iter()
            .filter(|(key, _)| !self.max_keys.contains(key))
            .collect();
        let query = params::query_string(&extras);

        if append_slash && !url.ends_with('/') {
            url.push('/');
        }
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        Some(url)
    }
}

fn implicit_defaults(mut defaults: Params, route_keys: &BTreeSet<String>, explicit: bool) -> Params {
    if explicit {
        return defaults;
    }
    if !route_keys.contains("controller") && !defaults.contains_key("controller") {
        defaults.insert("controller".to_string(), Some("content".to_string()));
    }
    if !defaults.contains_key("action") {
        defaults.insert("action".to_string(), Some("index".to_string()));
    }
    if route_keys.contains("id") && !defaults.contains_key("id") {
        defaults.insert("id".to_string(), None);
    }
    defaults
}

/// Walks the segments backwards: a trailing part with a default is optional
/// until something that must be rendered appears to its right.
fn minimum_keys(segments: &[Segment], defaults: &Params) -> BTreeSet<String> {
    let mut min_keys = BTreeSet::new();
    let mut gaps = false;
    for part in segments.iter().rev() {
        match part.name() {
            None => {
                if !part.is_split_char() {
                    gaps = true;
                }
            }
            Some(key) => {
                if defaults.contains_key(key) && !gaps {
                    continue;
                }
                min_keys.insert(key.to_string());
                gaps = true;
            }
        }
    }
    min_keys
}
