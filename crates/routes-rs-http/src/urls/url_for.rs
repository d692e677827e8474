//! Request-aware URL generation.
//!
//! [`Mapper::url_for`] and [`Mapper::url_for_named`] build on plain
//! generation with what is known about the current request:
//!
//! - values matched for the current request (the context's memory) fill in
//!   whatever the caller leaves out;
//! - the script name is prepended to literal paths;
//! - sub-domain changes turn into a fully-qualified URL;
//! - the special `anchor`, `host`, `protocol` and `qualified` parameters
//!   control the final shape of the URL. To pass one of those names through
//!   as an ordinary parameter, suffix it with `_` (`host_ => "x"`).

use routes_rs_core::RoutesResult;

use super::context::RequestContext;
use super::mapper::{strip_port, Mapper, RouteTable};
use super::params::{self, Params};

/// The URL-shaping parameters removed before generation.
#[derive(Debug, Default)]
struct Special {
    anchor: Option<String>,
    host: Option<String>,
    protocol: Option<String>,
    qualified: bool,
}

impl Special {
    fn take(kargs: &mut Params) -> Self {
        let mut special = Self {
            qualified: params::is_truthy(kargs.remove("qualified").flatten().as_deref()),
            ..Self::default()
        };
        for (key, slot) in [
            ("anchor", &mut special.anchor),
            ("host", &mut special.host),
            ("protocol", &mut special.protocol),
        ] {
            *slot = kargs.remove(key).flatten().filter(|v| !v.is_empty());
            if let Some(escaped) = kargs.remove(&format!("{key}_")) {
                kargs.insert(key.to_string(), escaped);
            }
        }
        special
    }

    /// Picks up overrides a route filter placed in `_anchor`, `_host` or `_protocol`.
    fn absorb(&mut self, kargs: &mut Params) {
        for (key, slot) in [
            ("_anchor", &mut self.anchor),
            ("_host", &mut self.host),
            ("_protocol", &mut self.protocol),
        ] {
            if let Some(value) = kargs.remove(key).flatten().filter(|v| !v.is_empty()) {
                *slot = Some(value);
            }
        }
    }

    fn apply(self, path: String, ctx: &RequestContext) -> String {
        let mut url = path;
        if self.qualified || self.host.is_some() || self.protocol.is_some() {
            let only_protocol = self.protocol.is_some() && self.host.is_none() && !self.qualified;
            let host = self.host.or_else(|| {
                ctx.host().map(|h| {
                    if only_protocol {
                        strip_port(&h).0.to_string()
                    } else {
                        h
                    }
                })
            });
            if let Some(host) = host {
                let protocol = self.protocol.as_deref().unwrap_or(ctx.protocol());
                url = format!("{protocol}://{host}{url}");
            }
        }
        if let Some(anchor) = self.anchor {
            url.push('#');
            url.push_str(&params::url_quote(&anchor));
        }
        url
    }
}

/// Decides the host for a sub-domain change, consuming the `sub_domain` key.
///
/// Yields `sub.domain[:port]` when a different, non-ignored sub-domain is
/// requested, and `domain[:port]` when the request is on a sub-domain but
/// none (or an ignored one) is requested.
fn sub_domain_host(table: &RouteTable, kargs: &mut Params, ctx: &RequestContext) -> Option<String> {
    if !table.settings.sub_domains {
        return None;
    }
    let requested = kargs.remove("sub_domain").flatten();
    let full = ctx.host()?;
    let (host, port) = strip_port(&full);
    let (current, domain) = match table.split_host(host) {
        Some((sub, domain)) => (Some(sub), domain),
        None => (None, host),
    };

    match requested.as_deref() {
        Some(sub) if table.is_ignored_sub_domain(sub) => {
            (domain != host).then(|| format!("{domain}{port}"))
        }
        Some(sub) if !sub.is_empty() && current != Some(sub) => Some(format!("{sub}.{domain}{port}")),
        None if domain != host => Some(format!("{domain}{port}")),
        _ => None,
    }
}

/// Appends a query string and, for paths rooted at `/`, the script name.
fn literal_url(path: &str, kargs: &Params, ctx: &RequestContext) -> String {
    let mut url = if path.starts_with('/') {
        format!("{}{path}", ctx.script_name())
    } else {
        path.to_string()
    };
    let query = params::query_string(kargs);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }
    url
}

impl Mapper {
    /// Generates a URL from parameters, falling back on the values matched
    /// for the current request.
    ///
    /// A `controller` beginning with `/` ignores those values. A controller
    /// given without an action implies `action = "index"`. A null value
    /// removes the key from both the parameters and the remembered values.
    ///
    /// # Errors
    ///
    /// Returns [`RoutesError::NotCompiled`](routes_rs_core::RoutesError::NotCompiled)
    /// before `create_regs`.
    ///
    /// # Examples
    ///
    /// ```
    /// use routes_rs_http::params;
    /// use routes_rs_http::urls::context::RequestContext;
    /// use routes_rs_http::urls::mapper::Mapper;
    /// use routes_rs_http::urls::route::RouteOptions;
    ///
    /// let mut m = Mapper::new();
    /// m.connect(":controller/:action/:id", RouteOptions::new()).unwrap();
    /// m.create_regs(&["blog", "post"]).unwrap();
    ///
    /// let ctx = RequestContext::builder()
    ///     .http_host("www.example.com")
    ///     .memory(params! {"controller" => "blog", "action" => "view", "id" => 4})
    ///     .build();
    ///
    /// assert_eq!(m.url_for(&params! {"id" => 2}, &ctx).unwrap().as_deref(), Some("/blog/view/2"));
    /// assert_eq!(
    ///     m.url_for(&params! {"controller" => "post", "qualified" => "true"}, &ctx).unwrap().as_deref(),
    ///     Some("http://www.example.com/post/index/4")
    /// );
    /// ```
    pub fn url_for(&self, params: &Params, ctx: &RequestContext) -> RoutesResult<Option<String>> {
        let table = self.table()?;
        let mut kargs = params.clone();
        let mut special = Special::take(&mut kargs);

        let mut kargs = screen_args(&table, kargs, ctx, &mut special);
        special.absorb(&mut kargs);

        Ok(table
            .generate(&kargs, ctx)
            .map(|path| special.apply(path, ctx)))
    }

    /// Generates a URL for a named route, or uses `target` as a literal path
    /// when no route has that name.
    ///
    /// Static routes yield their literal URL. Extra parameters become a query
    /// string on literal and static URLs. Remembered request values are not
    /// used for named routes.
    ///
    /// # Errors
    ///
    /// Returns [`RoutesError::NotCompiled`](routes_rs_core::RoutesError::NotCompiled)
    /// before `create_regs`.
    pub fn url_for_named(
        &self,
        target: &str,
        params: &Params,
        ctx: &RequestContext,
    ) -> RoutesResult<Option<String>> {
        let table = self.table()?;
        let mut kargs = params.clone();
        let mut special = Special::take(&mut kargs);

        let path = match table.named(target) {
            Some(route) if route.is_static() => Some(literal_url(route.path(), &kargs, ctx)),
            Some(route) => {
                let mut kargs = RouteTable::named_args(route, kargs);
                special.absorb(&mut kargs);
                if let Some(host) = sub_domain_host(&table, &mut kargs, ctx) {
                    special.host = Some(host);
                }
                table.render_named(route, &kargs, ctx)
            }
            None => {
                tracing::trace!(target, "No route with this name, using it as a path");
                Some(literal_url(target, &kargs, ctx))
            }
        };
        Ok(path.map(|path| special.apply(path, ctx)))
    }

    /// Generates a URL like [`url_for_named`](Self::url_for_named) (when
    /// `target` is given) or [`url_for`](Self::url_for), and hands it to
    /// `redirect`.
    ///
    /// Returns `Ok(None)` without calling `redirect` when no URL could be
    /// generated.
    ///
    /// # Errors
    ///
    /// Propagates the errors of the underlying generation call.
    pub fn redirect_to<R, F>(
        &self,
        target: Option<&str>,
        params: &Params,
        ctx: &RequestContext,
        redirect: F,
    ) -> RoutesResult<Option<R>>
    where
        F: FnOnce(String) -> R,
    {
        let url = match target {
            Some(target) => self.url_for_named(target, params, ctx)?,
            None => self.url_for(params, ctx)?,
        };
        Ok(url.map(|url| {
            tracing::debug!(%url, "Redirecting");
            redirect(url)
        }))
    }
}

/// Merges the caller's parameters over the request memory.
fn screen_args(
    table: &RouteTable,
    mut kargs: Params,
    ctx: &RequestContext,
    special: &mut Special,
) -> Params {
    let settings = &table.settings;
    if settings.explicit && settings.sub_domains {
        if let Some(host) = sub_domain_host(table, &mut kargs, ctx) {
            special.host = Some(host);
        }
        return kargs;
    }

    let mut merged = recall(kargs, ctx.memory());
    if settings.sub_domains {
        if let Some(host) = sub_domain_host(table, &mut merged, ctx) {
            special.host = Some(host);
        }
    }
    merged
}

/// Lays `kargs` over the values remembered from the current request.
///
/// A `controller` beginning with `/` ignores the memory. A controller given
/// without an action implies `action = "index"`. A null value removes the
/// key from both maps.
pub(crate) fn recall(mut kargs: Params, memory: &Params) -> Params {
    if let Some(Some(controller)) = kargs.get_mut("controller") {
        if let Some(stripped) = controller.strip_prefix('/') {
            *controller = stripped.to_string();
            return kargs;
        }
    }
    if params::value(&kargs, "controller").is_some_and(|c| !c.is_empty())
        && !kargs.contains_key("action")
    {
        kargs.insert("action".to_string(), Some("index".to_string()));
    }

    let mut merged = memory.clone();
    kargs.retain(|key, value| {
        if value.is_none() {
            merged.remove(key);
            false
        } else {
            true
        }
    });
    merged.extend(kargs);
    merged
}
