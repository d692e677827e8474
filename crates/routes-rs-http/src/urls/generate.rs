//! URL generation.
//!
//! Generation runs in reverse of matching: given a set of parameters, find
//! the first route able to render them. Candidates come from an index keyed
//! by controller and action, are filtered by the keys they require, and are
//! ranked so that routes which can place more of the supplied keys in the
//! path are tried first. Anything a route cannot place becomes a query
//! string.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use routes_rs_core::{RoutesError, RoutesResult};

use super::context::RequestContext;
use super::mapper::{CompiledRoute, Mapper, RouteTable};
use super::params::{self, Params};
use super::route::Route;
use super::url_for::recall;

const WILDCARD: &str = "*";

/// Candidate routes for generation, keyed by controller then action.
///
/// A route whose controller (or action) is hard-coded is only listed under
/// that value; otherwise it is listed under every known value and under
/// the `*` wildcard.
#[derive(Debug, Default)]
pub(crate) struct GenIndex {
    by_controller: HashMap<String, HashMap<String, Vec<usize>>>,
}

impl GenIndex {
    pub(crate) fn build(routes: &[CompiledRoute]) -> Self {
        let mut controllers = vec![WILDCARD.to_string()];
        let mut actions = vec![WILDCARD.to_string()];
        for compiled in routes.iter().filter(|c| !c.route.is_static()) {
            let defaults = compiled.route.defaults();
            if let Some(c) = params::value(defaults, "controller") {
                if !controllers.iter().any(|x| x == c) {
                    controllers.push(c.to_string());
                }
            }
            if let Some(a) = params::value(defaults, "action") {
                if !actions.iter().any(|x| x == a) {
                    actions.push(a.to_string());
                }
            }
        }

        let mut index = Self::default();
        index
            .by_controller
            .entry(WILDCARD.to_string())
            .or_default();

        for (idx, compiled) in routes.iter().enumerate() {
            let route = &compiled.route;
            if route.is_static() {
                continue;
            }
            let route_controllers = hard_coded_or(route, "controller", &controllers);
            let route_actions = hard_coded_or(route, "action", &actions);
            for controller in &route_controllers {
                let by_action = index.by_controller.entry(controller.clone()).or_default();
                for action in &route_actions {
                    by_action.entry(action.clone()).or_default().push(idx);
                }
            }
        }
        index
    }

    /// Returns the candidate list for a controller/action pair.
    fn lookup(&self, controller: Option<&str>, action: Option<&str>) -> Option<&[usize]> {
        let by_action = controller
            .and_then(|c| self.by_controller.get(c))
            .or_else(|| self.by_controller.get(WILDCARD))?;
        action
            .and_then(|a| by_action.get(a))
            .or_else(|| by_action.get(WILDCARD))
            .map(Vec::as_slice)
    }
}

fn hard_coded_or(route: &Route, key: &str, all: &[String]) -> Vec<String> {
    match params::value(route.defaults(), key) {
        Some(value) if route.hard_coded().contains(key) => vec![value.to_string()],
        _ => all.to_vec(),
    }
}

/// Ranking key: routes that accept every supplied key first, then routes
/// with fewer unaccepted keys, larger key sets breaking ties.
fn rank(route: &Route, keys: &[&String]) -> (usize, Reverse<usize>) {
    let missing = keys
        .iter()
        .filter(|k| !route.max_keys().contains(k.as_str()))
        .count();
    if missing == 0 {
        (0, Reverse(0))
    } else {
        (missing, Reverse(route.max_keys().len()))
    }
}

/// A supplied hard-coded key must agree with the route's default.
fn hard_coded_agree(route: &Route, kargs: &Params) -> bool {
    route.hard_coded().iter().all(|key| {
        match params::value(kargs, key).filter(|v| !v.is_empty()) {
            Some(value) => params::loosely_equal(Some(value), params::value(route.defaults(), key)),
            None => true,
        }
    })
}

impl RouteTable {
    /// Adds the mapper prefix, then the script name unless `route` is absolute.
    fn finish(&self, route: &Route, path: String, ctx: &RequestContext) -> String {
        let mut url = path;
        if let Some(prefix) = self.settings.prefix.as_deref() {
            url.insert_str(0, prefix);
        }
        if !route.is_absolute() {
            url.insert_str(0, ctx.script_name());
        }
        url
    }

    /// Generates a URL from `kargs`, trying candidates in ranked order.
    pub fn generate(&self, kargs: &Params, ctx: &RequestContext) -> Option<String> {
        let mut kargs = kargs.clone();
        if !self.settings.explicit {
            kargs
                .entry("controller".to_string())
                .or_insert_with(|| Some("content".to_string()));
            kargs
                .entry("action".to_string())
                .or_insert_with(|| Some("index".to_string()));
        }

        let candidates = self.gen_index.lookup(
            params::value(&kargs, "controller"),
            params::value(&kargs, "action"),
        )?;

        let keys: Vec<&String> = kargs.keys().collect();
        let mut ranked: Vec<&Arc<Route>> = candidates
            .iter()
            .map(|&idx| &self.routes[idx].route)
            .filter(|route| route.min_keys().iter().all(|k| kargs.contains_key(k)))
            .collect();
        ranked.sort_by_key(|route| rank(route, &keys));

        for route in ranked {
            if !hard_coded_agree(route, &kargs) {
                tracing::trace!(route = route.path(), "Hard-coded value differs");
                continue;
            }
            if let Some(path) = route.generate(&kargs, self.settings.append_slash) {
                tracing::debug!(route = route.path(), %path, "Generated URL");
                return Some(self.finish(route, path, ctx));
            }
            tracing::trace!(route = route.path(), "Route cannot render arguments");
        }
        None
    }

    /// Merges a named route's defaults under `params` and runs its filter.
    pub(crate) fn named_args(route: &Route, params: Params) -> Params {
        let mut kargs = route.defaults().clone();
        kargs.extend(params);
        match route.filter() {
            Some(filter) => filter(kargs),
            None => kargs,
        }
    }

    /// Renders prepared arguments for a named route.
    ///
    /// The named route is used directly when it can place every supplied
    /// key; otherwise the arguments go through normal ranking.
    pub(crate) fn render_named(
        &self,
        route: &Route,
        kargs: &Params,
        ctx: &RequestContext,
    ) -> Option<String> {
        let accepts_all = kargs
            .keys()
            .all(|k| k == "method" || route.max_keys().contains(k));
        if accepts_all && hard_coded_agree(route, kargs) {
            if let Some(path) = route.generate(kargs, self.settings.append_slash) {
                tracing::debug!(route = route.path(), %path, "Generated URL from named route");
                return Some(self.finish(route, path, ctx));
            }
        }
        self.generate(kargs, ctx)
    }

    /// Generates a URL for the route registered as `name`.
    ///
    /// A static route always yields its literal URL. An unknown name is an
    /// error, not `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`RoutesError::UnknownRoute`] if no route has that name.
    pub fn generate_named(
        &self,
        name: &str,
        params: &Params,
        ctx: &RequestContext,
    ) -> RoutesResult<Option<String>> {
        let route = self
            .named(name)
            .ok_or_else(|| RoutesError::UnknownRoute(name.to_string()))?;
        if route.is_static() {
            return Ok(Some(route.path().to_string()));
        }
        let kargs = Self::named_args(route, params.clone());
        Ok(self.render_named(route, &kargs, ctx))
    }
}

impl Mapper {
    /// Generates a URL from parameters.
    ///
    /// Values remembered in the context fill in keys missing from `params`,
    /// the same way [`url_for`](Self::url_for) merges them; a null in
    /// `params` forgets the remembered value. With no memory `params` is used
    /// as given. Returns `Ok(None)` when no route can render the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RoutesError::NotCompiled`] before `create_regs`.
    pub fn generate(&self, params: &Params, ctx: &RequestContext) -> RoutesResult<Option<String>> {
        let table = self.table()?;
        if ctx.memory().is_empty() {
            return Ok(table.generate(params, ctx));
        }
        let kargs = recall(params.clone(), ctx.memory());
        Ok(table.generate(&kargs, ctx))
    }

    /// Generates a URL for a named route.
    ///
    /// Unlike [`generate`](Self::generate), a missing route is an error
    /// rather than `Ok(None)`: names are fixed by the route configuration,
    /// so an unknown one is a programming mistake. Remembered request values
    /// are not used.
    ///
    /// # Errors
    ///
    /// Returns [`RoutesError::NotCompiled`] before `create_regs` and
    /// [`RoutesError::UnknownRoute`] for a name that was never registered.
    pub fn generate_named(
        &self,
        name: &str,
        params: &Params,
        ctx: &RequestContext,
    ) -> RoutesResult<Option<String>> {
        self.table()?.generate_named(name, params, ctx)
    }
}
