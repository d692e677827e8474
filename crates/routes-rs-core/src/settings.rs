//! Settings for routes-rs.
//!
//! [`Settings`] holds everything needed to build a mapper from a configuration
//! file: mapper-wide switches, the controller list used when compiling, and
//! the route and resource declarations themselves. Every field has a default,
//! so a settings file only needs to mention what it changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The default expression used to split a host into sub-domain and domain.
pub const DEFAULT_DOMAIN_MATCH: &str = r"[^\.\/]+?\.[^\.\/]+";

/// Mapper-wide switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperSettings {
    /// A path prefix stripped before matching and prepended when generating.
    pub prefix: Option<String>,
    /// Disables the implicit `controller`/`action` defaults.
    pub explicit: bool,
    /// Appends a trailing `/` to generated URLs.
    pub append_slash: bool,
    /// Enables sub-domain recognition and generation.
    pub sub_domains: bool,
    /// Sub-domains treated as "no sub-domain" (e.g. `www`).
    pub sub_domains_ignore: Vec<String>,
    /// Regular expression matching the registrable domain part of a host.
    pub domain_match: String,
    /// Records a per-route trace of every match attempt.
    pub debug: bool,
}

impl Default for MapperSettings {
    fn default() -> Self {
        Self {
            prefix: None,
            explicit: false,
            append_slash: false,
            sub_domains: false,
            sub_domains_ignore: Vec::new(),
            domain_match: DEFAULT_DOMAIN_MATCH.to_string(),
            debug: false,
        }
    }
}

/// A sub-domain condition as written in a settings file.
///
/// `sub_domain = true` accepts any sub-domain; a list restricts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubDomainSpec {
    /// `true` means "any sub-domain"; `false` means no condition.
    Any(bool),
    /// An explicit list of accepted sub-domains.
    OneOf(Vec<String>),
}

/// One `connect` call as written in a settings file.
///
/// ```toml
/// [[routes]]
/// name = "archive"
/// path = "archive/:year/:month/:day"
/// defaults = { controller = "blog", action = "view", month = "1", day = "1" }
/// requirements = { year = '\d{4}' }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteSpec {
    /// The route name, if any.
    pub name: Option<String>,
    /// The route pattern, or the literal URL for static routes.
    pub path: String,
    /// Default values for route keys.
    pub defaults: BTreeMap<String, String>,
    /// Keys whose default is null (optional without a value).
    pub optional: Vec<String>,
    /// Regular expressions the named values must match in full.
    pub requirements: BTreeMap<String, String>,
    /// HTTP methods the route accepts. Empty means any.
    pub methods: Vec<String>,
    /// A sub-domain condition.
    pub sub_domain: Option<SubDomainSpec>,
    /// Marks the route as static: reachable only by name.
    #[serde(rename = "static")]
    pub static_url: bool,
    /// Generated URLs skip the prefix and script name.
    pub absolute: bool,
    /// Overrides the mapper's `explicit` switch for this route.
    pub explicit: Option<bool>,
}

/// The parent of a nested resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParentSpec {
    /// The parent's member name (e.g. `region`).
    pub member: String,
    /// The parent's collection name (e.g. `regions`).
    pub collection: String,
}

/// One `resource` call as written in a settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceSpec {
    /// Singular name, e.g. `message`.
    pub member: String,
    /// Plural name, e.g. `messages`.
    pub collection: String,
    /// Extra collection actions, action name to HTTP method.
    pub collection_actions: BTreeMap<String, String>,
    /// Extra member actions, action name to HTTP method.
    pub member_actions: BTreeMap<String, String>,
    /// Extra "new" actions, action name to HTTP method.
    pub new_actions: BTreeMap<String, String>,
    /// A path prepended to every generated route.
    pub path_prefix: Option<String>,
    /// A prefix prepended to every route name.
    pub name_prefix: Option<String>,
    /// The controller serving the resource. Defaults to the collection name.
    pub controller: Option<String>,
    /// Nests the resource under a parent collection.
    pub parent: Option<ParentSpec>,
}

/// Top-level settings.
///
/// # Examples
///
/// ```
/// use routes_rs_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.routes.is_empty());
/// assert_eq!(settings.log_level, "info");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Debug mode. Selects human-readable log output.
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level filter (e.g. "debug", "info", "routes_rs_http=trace").
    pub log_level: String,

    // ── Routing ──────────────────────────────────────────────────────

    /// Controller names known to the host, used to build the controller
    /// alternation in patterns containing `:controller`.
    pub controllers: Vec<String>,

    /// Mapper-wide switches.
    pub mapper: MapperSettings,

    /// Route declarations, connected in order.
    pub routes: Vec<RouteSpec>,

    /// Resource declarations, connected before `routes`.
    pub resources: Vec<ResourceSpec>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "info".to_string(),
            controllers: Vec::new(),
            mapper: MapperSettings::default(),
            routes: Vec::new(),
            resources: Vec::new(),
        }
    }
}
