//! RESTful resource routes.
//!
//! [`Mapper::resource`] expands a member/collection pair such as
//! `("message", "messages")` into the conventional set of routes:
//!
//! | Method   | Path                     | Action   | Name                  |
//! |----------|--------------------------|----------|-----------------------|
//! | `GET`    | `/messages`              | `index`  | `messages`            |
//! | `POST`   | `/messages`              | `create` |                       |
//! | `GET`    | `/messages/new`          | `new`    | `new_message`         |
//! | `GET`    | `/messages/:id`          | `show`   | `message`             |
//! | `GET`    | `/messages/:id/edit`     | `edit`   | `edit_message`        |
//! | `PUT`    | `/messages/:id`          | `update` |                       |
//! | `DELETE` | `/messages/:id`          | `delete` |                       |
//!
//! Every route also has a `.:(format)` variant, named with a `formatted_`
//! prefix where the base route is named.

use routes_rs_core::settings::ResourceSpec;
use routes_rs_core::RoutesResult;

use super::mapper::Mapper;
use super::route::RouteOptions;
use crate::params;

/// Requirement placed on the `id` of member routes.
const ID_REQUIREMENT: &str = r"[\w\-_]+";

/// The resource a nested resource belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentResource {
    /// Singular name, e.g. `"region"`.
    pub member_name: String,
    /// Plural name, e.g. `"regions"`.
    pub collection_name: String,
}

/// Resource metadata carried by every route a resource registers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceInfo {
    /// Singular name of the resource.
    pub member_name: String,
    /// Plural name of the resource, as given.
    pub collection_name: String,
    /// The enclosing resource, for nested resources.
    pub parent: Option<ParentResource>,
}

/// Options for [`Mapper::resource`].
///
/// Action maps are kept in insertion order; routes are registered in the
/// order the HTTP methods first appear.
#[derive(Debug, Clone, Default)]
pub struct ResourceOptions {
    collection: Vec<(String, String)>,
    member: Vec<(String, String)>,
    new: Vec<(String, String)>,
    path_prefix: Option<String>,
    name_prefix: Option<String>,
    controller: Option<String>,
    parent: Option<ParentResource>,
}

fn set_action(actions: &mut Vec<(String, String)>, action: &str, method: &str) {
    if let Some(entry) = actions.iter_mut().find(|(a, _)| a == action) {
        entry.1 = method.to_string();
    } else {
        actions.push((action.to_string(), method.to_string()));
    }
}

impl ResourceOptions {
    /// Creates an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an action operating on the whole collection, e.g. `rss => GET`.
    ///
    /// `method` may be `"any"` to accept every HTTP method.
    #[must_use]
    pub fn collection_action(mut self, action: &str, method: &str) -> Self {
        set_action(&mut self.collection, action, method);
        self
    }

    /// Adds an action operating on one member, e.g. `mark => PUT`.
    #[must_use]
    pub fn member_action(mut self, action: &str, method: &str) -> Self {
        set_action(&mut self.member, action, method);
        self
    }

    /// Adds an action operating on a new member, e.g. `preview => POST`.
    #[must_use]
    pub fn new_action(mut self, action: &str, method: &str) -> Self {
        set_action(&mut self.new, action, method);
        self
    }

    /// Prepends a path, which may contain dynamic parts, to every route.
    #[must_use]
    pub fn path_prefix(mut self, prefix: &str) -> Self {
        self.path_prefix = Some(prefix.to_string());
        self
    }

    /// Prepends a string to every route name.
    #[must_use]
    pub fn name_prefix(mut self, prefix: &str) -> Self {
        self.name_prefix = Some(prefix.to_string());
        self
    }

    /// Overrides the controller, which defaults to the collection name.
    #[must_use]
    pub fn controller(mut self, controller: &str) -> Self {
        self.controller = Some(controller.to_string());
        self
    }

    /// Nests the resource under a parent resource.
    ///
    /// Unless set explicitly, the path prefix becomes
    /// `{collection}/:{member}_id` and the name prefix `{member}_`.
    #[must_use]
    pub fn parent(mut self, member_name: &str, collection_name: &str) -> Self {
        self.parent = Some(ParentResource {
            member_name: member_name.to_string(),
            collection_name: collection_name.to_string(),
        });
        self
    }
}

impl From<&ResourceSpec> for ResourceOptions {
    fn from(spec: &ResourceSpec) -> Self {
        let mut opts = Self::new();
        for (action, method) in &spec.collection_actions {
            opts = opts.collection_action(action, method);
        }
        for (action, method) in &spec.member_actions {
            opts = opts.member_action(action, method);
        }
        for (action, method) in &spec.new_actions {
            opts = opts.new_action(action, method);
        }
        opts.path_prefix.clone_from(&spec.path_prefix);
        opts.name_prefix.clone_from(&spec.name_prefix);
        opts.controller.clone_from(&spec.controller);
        if let Some(parent) = &spec.parent {
            opts = opts.parent(&parent.member, &parent.collection);
        }
        opts
    }
}

/// Groups `action => method` pairs by upper-cased method, keeping first-seen order.
fn by_method(actions: &[(String, String)]) -> Vec<(String, Vec<String>)> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (action, method) in actions {
        let method = method.to_uppercase();
        match grouped.iter_mut().find(|(m, _)| *m == method) {
            Some((_, list)) => list.push(action.clone()),
            None => grouped.push((method, vec![action.clone()])),
        }
    }
    grouped
}

/// Puts `action` first in the list for `method`, creating the entry if needed.
fn unshift(grouped: &mut Vec<(String, Vec<String>)>, method: &str, action: &str) {
    match grouped.iter_mut().find(|(m, _)| m == method) {
        Some((_, list)) => list.insert(0, action.to_string()),
        None => grouped.push((method.to_string(), vec![action.to_string()])),
    }
}

fn strip_slashes(s: &str) -> &str {
    s.trim_matches('/')
}

fn is_any(method: &str) -> bool {
    method.eq_ignore_ascii_case("any")
}

/// Route options shared by every route of one resource.
struct ResourceBase {
    controller: String,
    info: ResourceInfo,
}

impl ResourceBase {
    fn options(&self, method: &str, action: &str) -> RouteOptions {
        let opts = RouteOptions::new()
            .defaults(params! {"controller" => &self.controller, "action" => action})
            .resource(self.info.clone());
        if is_any(method) {
            opts
        } else {
            opts.method(method)
        }
    }

    fn member_options(&self, method: &str, action: &str) -> RouteOptions {
        self.options(method, action).requirement("id", ID_REQUIREMENT)
    }
}

impl Mapper {
    /// Registers the RESTful routes for a resource.
    ///
    /// # Errors
    ///
    /// Returns an error if a generated pattern is malformed, which happens
    /// only when the collection name or path prefix contain invalid
    /// parameter syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use routes_rs_http::params;
    /// use routes_rs_http::urls::context::RequestContext;
    /// use routes_rs_http::urls::mapper::Mapper;
    /// use routes_rs_http::urls::resource::ResourceOptions;
    ///
    /// let mut m = Mapper::new();
    /// m.resource("message", "messages", ResourceOptions::new()).unwrap();
    /// m.create_regs(&["messages"]).unwrap();
    ///
    /// let put = RequestContext::builder().method("PUT").build();
    /// let result = m.match_path("/messages/42", &put).unwrap().unwrap();
    /// assert_eq!(result["action"].as_deref(), Some("update"));
    ///
    /// let ctx = RequestContext::default();
    /// let url = m.generate_named("edit_message", &params! {"id" => 1}, &ctx).unwrap();
    /// assert_eq!(url.as_deref(), Some("/messages/1/edit"));
    /// ```
    pub fn resource(
        &mut self,
        member_name: &str,
        collection_name: &str,
        opts: ResourceOptions,
    ) -> RoutesResult<()> {
        let ResourceOptions {
            collection,
            mut member,
            mut new,
            path_prefix,
            name_prefix,
            controller,
            parent,
        } = opts;

        let (path_prefix, np) = match &parent {
            Some(p) => (
                path_prefix
                    .unwrap_or_else(|| format!("{}/:{}_id", p.collection_name, p.member_name)),
                name_prefix.unwrap_or_else(|| format!("{}_", p.member_name)),
            ),
            None => (path_prefix.unwrap_or_default(), name_prefix.unwrap_or_default()),
        };

        set_action(&mut member, "edit", "GET");
        set_action(&mut new, "new", "GET");

        let mut collection_methods = by_method(&collection);
        let mut member_methods = by_method(&member);
        let new_methods = by_method(&new);
        unshift(&mut collection_methods, "POST", "create");
        unshift(&mut member_methods, "PUT", "update");
        unshift(&mut member_methods, "DELETE", "delete");

        let stripped = strip_slashes(collection_name);
        let path_prefix = strip_slashes(&path_prefix);
        let collection_path = if path_prefix.is_empty() {
            stripped.to_string()
        } else {
            format!("{path_prefix}/{stripped}")
        };
        let new_path = format!("{collection_path}/new");
        let member_path = format!("{collection_path}/:(id)");

        let base = ResourceBase {
            controller: controller.unwrap_or_else(|| stripped.to_string()),
            info: ResourceInfo {
                member_name: member_name.to_string(),
                collection_name: collection_name.to_string(),
                parent,
            },
        };

        tracing::debug!(
            member = member_name,
            collection = collection_name,
            path = %collection_path,
            "Registering resource"
        );

        for (method, mut actions) in collection_methods {
            let primary = if method == "GET" || is_any(&method) || actions.is_empty() {
                None
            } else {
                Some(actions.remove(0))
            };
            for action in &actions {
                let name = format!("{np}{action}_{collection_name}");
                let opts = base.options(&method, action);
                self.connect(
                    &format!("{collection_path}/{action}"),
                    opts.clone().name(&name),
                )?;
                self.connect(
                    &format!("{collection_path}/{action}.:(format)"),
                    opts.name(&format!("formatted_{name}")),
                )?;
            }
            if let Some(primary) = primary {
                let opts = base.options(&method, &primary);
                self.connect(&collection_path, opts.clone())?;
                self.connect(&format!("{collection_path}.:(format)"), opts)?;
            }
        }

        let index = base.options("GET", "index");
        self.connect(
            &collection_path,
            index.clone().name(&format!("{np}{collection_name}")),
        )?;
        self.connect(
            &format!("{collection_path}.:(format)"),
            index.name(&format!("formatted_{np}{collection_name}")),
        )?;

        for (method, actions) in &new_methods {
            for action in actions {
                let (path, name) = if action == "new" {
                    (new_path.clone(), format!("new_{member_name}"))
                } else {
                    (
                        format!("{new_path}/{action}"),
                        format!("{action}_new_{member_name}"),
                    )
                };
                let opts = base.options(method, action);
                self.connect(&path, opts.clone().name(&format!("{np}{name}")))?;
                self.connect(
                    &format!("{path}.:(format)"),
                    opts.name(&format!("formatted_{np}{name}")),
                )?;
            }
        }

        for (method, mut actions) in member_methods {
            let primary = if matches!(method.as_str(), "POST" | "GET")
                || is_any(&method)
                || actions.is_empty()
            {
                None
            } else {
                Some(actions.remove(0))
            };
            for action in &actions {
                let name = format!("{np}{action}_{member_name}");
                let opts = base.member_options(&method, action);
                self.connect(
                    &format!("{member_path}/{action}"),
                    opts.clone().name(&name),
                )?;
                self.connect(
                    &format!("{member_path}/{action}.:(format)"),
                    opts.name(&format!("formatted_{name}")),
                )?;
            }
            if let Some(primary) = primary {
                let opts = base.member_options(&method, &primary);
                self.connect(&member_path, opts.clone())?;
                self.connect(&format!("{member_path}.:(format)"), opts)?;
            }
        }

        let show = base.member_options("GET", "show");
        self.connect(
            &member_path,
            show.clone().name(&format!("{np}{member_name}")),
        )?;
        self.connect(
            &format!("{member_path}.:(format)"),
            show.name(&format!("formatted_{np}{member_name}")),
        )?;

        Ok(())
    }
}
