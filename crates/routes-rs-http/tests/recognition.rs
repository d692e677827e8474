//! Integration tests for path recognition.
//!
//! Tests cover: static and dynamic parts, defaults, requirements, globs,
//! controller alternation, split characters, mapper prefixes, sub-domains,
//! method conditions, RESTful resources and traced matching.

use routes_rs_core::RoutesError;
use routes_rs_http::params;
use routes_rs_http::urls::context::RequestContext;
use routes_rs_http::urls::mapper::Mapper;
use routes_rs_http::urls::route::{RouteOptions, SubDomainCondition};
use routes_rs_http::{Params, ResourceOptions};

fn ctx() -> RequestContext {
    RequestContext::default()
}

fn mapper(routes: &[(&str, RouteOptions)], controllers: &[&str]) -> Mapper {
    let mut m = Mapper::new();
    for (path, opts) in routes {
        m.connect(path, opts.clone()).unwrap();
    }
    m.create_regs(controllers).unwrap();
    m
}

fn matches(m: &Mapper, path: &str) -> Option<Params> {
    m.match_path(path, &ctx()).unwrap()
}

fn matches_with(m: &Mapper, path: &str, ctx: &RequestContext) -> Option<Params> {
    m.match_path(path, ctx).unwrap()
}

fn with_method(method: &str) -> RequestContext {
    RequestContext::builder().method(method).build()
}

const NO_CONTROLLERS: &[&str] = &[];

// ═════════════════════════════════════════════════════════════════════
// 1. Static paths and compile state
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_all_static() {
    let m = mapper(
        &[(
            "hello/world/how/are/you",
            RouteOptions::new().defaults(params! {"controller" => "content", "action" => "index"}),
        )],
        NO_CONTROLLERS,
    );
    assert_eq!(matches(&m, "/x"), None);
    assert_eq!(matches(&m, "/hello/world/how"), None);
    assert_eq!(matches(&m, "/hello/world/how/are"), None);
    assert_eq!(matches(&m, "/hello/world/how/are/you/today"), None);
    assert_eq!(
        matches(&m, "/hello/world/how/are/you"),
        Some(params! {"controller" => "content", "action" => "index"})
    );
}

#[test]
fn test_default_route() {
    let m = mapper(
        &[(
            "",
            RouteOptions::new().defaults(params! {"controller" => "content", "action" => "index"}),
        )],
        &["content"],
    );
    assert_eq!(matches(&m, "/x"), None);
    assert_eq!(matches(&m, "/hello/world"), None);
    assert_eq!(
        matches(&m, "/"),
        Some(params! {"controller" => "content", "action" => "index"})
    );
}

#[test]
fn test_match_requires_compiled_table() {
    let mut m = Mapper::new();
    m.connect(":controller/:action/:id", RouteOptions::new()).unwrap();
    assert!(matches!(
        m.match_path("/content/view", &ctx()),
        Err(RoutesError::NotCompiled)
    ));

    m.create_regs(&["content"]).unwrap();
    assert!(m.match_path("/content/view", &ctx()).unwrap().is_some());

    m.connect("other/:id", RouteOptions::new()).unwrap();
    assert!(!m.is_compiled());
}

#[test]
fn test_empty_path_is_rejected() {
    let m = mapper(&[(":controller", RouteOptions::new())], &["content"]);
    assert!(matches!(m.match_path("", &ctx()), Err(RoutesError::EmptyPath)));
}

// ═════════════════════════════════════════════════════════════════════
// 2. Dynamic parts and defaults
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_basic_dynamic() {
    for path in ["hi/:name", "hi/:(name)"] {
        let m = mapper(
            &[(path, RouteOptions::new().defaults(params! {"controller" => "content"}))],
            NO_CONTROLLERS,
        );
        assert_eq!(matches(&m, "/boo"), None);
        assert_eq!(matches(&m, "/boo/blah"), None);
        assert_eq!(matches(&m, "/hi"), None);
        assert_eq!(
            matches(&m, "/hi/index"),
            Some(params! {"controller" => "content", "action" => "index", "name" => "index"})
        );
        assert_eq!(
            matches(&m, "/hi/dude"),
            Some(params! {"controller" => "content", "action" => "index", "name" => "dude"})
        );
    }
}

#[test]
fn test_basic_dynamic_backwards() {
    let m = mapper(&[(":name/hi", RouteOptions::new())], NO_CONTROLLERS);
    assert_eq!(matches(&m, "/"), None);
    assert_eq!(matches(&m, "/hi"), None);
    assert_eq!(matches(&m, "/shop/walmart/hi"), None);
    assert_eq!(
        matches(&m, "/fred/hi"),
        Some(params! {"controller" => "content", "action" => "index", "name" => "fred"})
    );
}

#[test]
fn test_dynamic_with_default() {
    for path in ["hi/:action", "hi/:(action)"] {
        let m = mapper(
            &[(path, RouteOptions::new().defaults(params! {"controller" => "content"}))],
            NO_CONTROLLERS,
        );
        assert_eq!(matches(&m, "/boo"), None);
        assert_eq!(matches(&m, "/boo/blah"), None);
        assert_eq!(matches(&m, "/hi/dude/what"), None);
        let index = params! {"controller" => "content", "action" => "index"};
        assert_eq!(matches(&m, "/hi"), Some(index.clone()));
        assert_eq!(matches(&m, "/hi/index"), Some(index));
        assert_eq!(
            matches(&m, "/hi/dude"),
            Some(params! {"controller" => "content", "action" => "dude"})
        );
    }
}

#[test]
fn test_captured_values_are_unquoted() {
    let m = mapper(&[("hi/:name", RouteOptions::new())], NO_CONTROLLERS);
    let result = matches(&m, "/hi/list+people").unwrap();
    assert_eq!(result["name"].as_deref(), Some("list people"));
    let result = matches(&m, "/hi/a%26b").unwrap();
    assert_eq!(result["name"].as_deref(), Some("a&b"));
}

#[test]
fn test_dynamic_with_regexp_condition() {
    for path in ["hi/:name", "hi/:(name)"] {
        let m = mapper(
            &[(path, RouteOptions::new().requirement("name", "[a-z]+"))],
            NO_CONTROLLERS,
        );
        assert_eq!(matches(&m, "/boo"), None);
        assert_eq!(matches(&m, "/hi"), None);
        assert_eq!(matches(&m, "/hi/FOXY"), None);
        assert_eq!(matches(&m, "/hi/something_is_up"), None);
        assert_eq!(
            matches(&m, "/hi/abunchofcharacter"),
            Some(params! {
                "controller" => "content",
                "action" => "index",
                "name" => "abunchofcharacter",
            })
        );
    }
}

#[test]
fn test_dynamic_with_regexp_defaults_and_gaps() {
    let m = mapper(
        &[
            (
                "view/:id/:controller",
                RouteOptions::new()
                    .defaults(params! {"id" => 2, "action" => "view", "controller" => "blog"})
                    .requirement("id", r"\d{1,2}"),
            ),
            ("archive/:year/:month", RouteOptions::new()),
        ],
        &["post", "blog", "admin/user"],
    );
    assert_eq!(matches(&m, "/"), None);
    assert_eq!(matches(&m, "/view/blog"), None);
    assert_eq!(matches(&m, "/view/3/smiles"), None);
    let expected = params! {"controller" => "blog", "action" => "view", "id" => "2"};
    assert_eq!(matches(&m, "/view"), Some(expected.clone()));
    assert_eq!(matches(&m, "/view/2/blog"), Some(expected));
    assert_eq!(
        matches(&m, "/view/4/admin/user"),
        Some(params! {"controller" => "admin/user", "action" => "view", "id" => "4"})
    );
}

#[test]
fn test_dynamic_with_regexp_gaps_controllers() {
    for path in ["view/:id/:controller", "view/:(id)/:(controller)"] {
        let m = mapper(
            &[(
                path,
                RouteOptions::new()
                    .defaults(params! {"id" => 2, "action" => "view"})
                    .requirement("id", r"\d{1,2}"),
            )],
            &["post", "blog", "admin/user"],
        );
        assert_eq!(matches(&m, "/"), None);
        assert_eq!(matches(&m, "/view"), None);
        assert_eq!(matches(&m, "/view/blog"), None);
        assert_eq!(matches(&m, "/view/3"), None);
        assert_eq!(matches(&m, "/view/4/honker"), None);
        assert_eq!(
            matches(&m, "/view/2/blog"),
            Some(params! {"controller" => "blog", "action" => "view", "id" => "2"})
        );
    }
}

#[test]
fn test_dynamic_with_trailing_strings() {
    for path in ["view/:id/:controller/super", "view/:(id)/:(controller)/super"] {
        let m = mapper(
            &[(
                path,
                RouteOptions::new()
                    .defaults(params! {"controller" => "blog", "action" => "view", "id" => 2})
                    .requirement("id", r"\d{1,2}"),
            )],
            &["post", "blog", "admin/user"],
        );
        assert_eq!(matches(&m, "/"), None);
        assert_eq!(matches(&m, "/view"), None);
        assert_eq!(matches(&m, "/view/blah/blog/super"), None);
        assert_eq!(matches(&m, "/view/ha/super"), None);
        assert_eq!(matches(&m, "/view/super"), None);
        assert_eq!(matches(&m, "/view/4/super"), None);
        assert_eq!(
            matches(&m, "/view/2/blog/super"),
            Some(params! {"controller" => "blog", "action" => "view", "id" => "2"})
        );
        assert_eq!(
            matches(&m, "/view/4/admin/user/super"),
            Some(params! {"controller" => "admin/user", "action" => "view", "id" => "4"})
        );
    }
}

#[test]
fn test_dynamic_with_trailing_dynamic_defaults() {
    let m = mapper(
        &[(
            "archives/:action/:article",
            RouteOptions::new().defaults(params! {"controller" => "blog"}),
        )],
        &["blog"],
    );
    assert_eq!(matches(&m, "/"), None);
    assert_eq!(matches(&m, "/archives"), None);
    assert_eq!(matches(&m, "/archives/introduction"), None);
    assert_eq!(
        matches(&m, "/archives/view/introduction"),
        Some(params! {"controller" => "blog", "action" => "view", "article" => "introduction"})
    );
}

#[test]
fn test_multiroute() {
    let m = mapper(
        &[
            (
                "archive/:year/:month/:day",
                RouteOptions::new()
                    .defaults(params! {
                        "controller" => "blog",
                        "action" => "view",
                        "month" => None::<&str>,
                        "day" => None::<&str>,
                    })
                    .requirement("month", r"\d{1,2}")
                    .requirement("day", r"\d{1,2}"),
            ),
            (
                "viewpost/:id",
                RouteOptions::new().defaults(params! {"controller" => "post", "action" => "view"}),
            ),
            (":controller/:action/:id", RouteOptions::new()),
        ],
        &["post", "blog", "admin/user"],
    );
    assert_eq!(matches(&m, "/"), None);
    assert_eq!(matches(&m, "/archive"), None);
    assert_eq!(matches(&m, "/archive/2004/ab"), None);
    assert_eq!(
        matches(&m, "/blog/view"),
        Some(params! {"controller" => "blog", "action" => "view", "id" => None::<&str>})
    );
    assert_eq!(
        matches(&m, "/archive/2004"),
        Some(params! {
            "controller" => "blog",
            "action" => "view",
            "year" => "2004",
            "month" => None::<&str>,
            "day" => None::<&str>,
        })
    );
    assert_eq!(
        matches(&m, "/archive/2004/4"),
        Some(params! {
            "controller" => "blog",
            "action" => "view",
            "year" => "2004",
            "month" => "4",
            "day" => None::<&str>,
        })
    );
    assert_eq!(
        matches(&m, "/viewpost/3"),
        Some(params! {"controller" => "post", "action" => "view", "id" => "3"})
    );
}

// ═════════════════════════════════════════════════════════════════════
// 3. Globs
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_path() {
    for path in ["hi/*file", "hi/*(file)"] {
        let m = mapper(&[(path, RouteOptions::new())], NO_CONTROLLERS);
        assert_eq!(matches(&m, "/boo"), None);
        assert_eq!(matches(&m, "/boo/blah"), None);
        assert_eq!(matches(&m, "/hi"), None);
        assert_eq!(
            matches(&m, "/hi/books/learning_python.pdf"),
            Some(params! {
                "controller" => "content",
                "action" => "index",
                "file" => "books/learning_python.pdf",
            })
        );
        assert_eq!(
            matches(&m, "/hi/dude"),
            Some(params! {"controller" => "content", "action" => "index", "file" => "dude"})
        );
        assert_eq!(
            matches(&m, "/hi/dude/what"),
            Some(params! {"controller" => "content", "action" => "index", "file" => "dude/what"})
        );
    }
}

#[test]
fn test_required_glob_rejects_empty_text() {
    let m = mapper(&[("hi/*file", RouteOptions::new())], NO_CONTROLLERS);
    assert_eq!(matches(&m, "/hi/"), None);
    assert_eq!(matches(&m, "/hi//"), None);

    let m = mapper(
        &[("hi/*file", RouteOptions::new().defaults(params! {"file" => "index.html"}))],
        NO_CONTROLLERS,
    );
    assert_eq!(
        matches(&m, "/hi"),
        Some(params! {"controller" => "content", "action" => "index", "file" => "index.html"})
    );
}

#[test]
fn test_path_with_dynamic_and_default() {
    for path in [":controller/:action/*url", ":(controller)/:(action)/*(url)"] {
        let m = mapper(
            &[(
                path,
                RouteOptions::new().defaults(params! {
                    "controller" => "content",
                    "action" => "view",
                    "url" => None::<&str>,
                }),
            )],
            &["content", "admin/user"],
        );
        assert_eq!(matches(&m, "/goober/view/here"), None);
        let view = params! {"controller" => "content", "action" => "view", "url" => None::<&str>};
        assert_eq!(matches(&m, "/content"), Some(view.clone()));
        assert_eq!(matches(&m, "/content/"), Some(view.clone()));
        assert_eq!(matches(&m, "/content/view"), Some(view));
        assert_eq!(
            matches(&m, "/content/view/fred"),
            Some(params! {"controller" => "content", "action" => "view", "url" => "fred"})
        );
        let admin = params! {"controller" => "admin/user", "action" => "view", "url" => None::<&str>};
        assert_eq!(matches(&m, "/admin/user"), Some(admin.clone()));
        assert_eq!(matches(&m, "/admin/user/view"), Some(admin));
    }
}

#[test]
fn test_path_with_dynamic_and_default_backwards() {
    let m = mapper(
        &[(
            "*file/login",
            RouteOptions::new().defaults(params! {
                "controller" => "content",
                "action" => "index",
                "file" => None::<&str>,
            }),
        )],
        &["content"],
    );
    assert_eq!(matches(&m, "/boo"), None);
    assert_eq!(matches(&m, "/login"), None);
    assert_eq!(
        matches(&m, "//login"),
        Some(params! {"controller" => "content", "action" => "index", "file" => ""})
    );
    assert_eq!(
        matches(&m, "/fred/login"),
        Some(params! {"controller" => "content", "action" => "index", "file" => "fred"})
    );
}

#[test]
fn test_path_backwards_with_controller() {
    let m = mapper(
        &[
            (
                "*url/login",
                RouteOptions::new().defaults(params! {"controller" => "content", "action" => "check_access"}),
            ),
            (
                "*url/:controller",
                RouteOptions::new().defaults(params! {"action" => "view"}),
            ),
        ],
        &["content", "admin/user"],
    );
    assert_eq!(matches(&m, "/boo"), None);
    assert_eq!(matches(&m, "/boo/blah"), None);
    assert_eq!(matches(&m, "/admin/user"), None);
    assert_eq!(
        matches(&m, "/fred/login"),
        Some(params! {"controller" => "content", "action" => "check_access", "url" => "fred"})
    );
    assert_eq!(
        matches(&m, "/dude/admin/user"),
        Some(params! {"controller" => "admin/user", "action" => "view", "url" => "dude"})
    );
}

// ═════════════════════════════════════════════════════════════════════
// 4. Controllers
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_controller() {
    for path in ["hi/:controller", "hi/:(controller)"] {
        let m = mapper(
            &[(path, RouteOptions::new().defaults(params! {"action" => "hi"}))],
            &["content", "admin/user"],
        );
        assert_eq!(matches(&m, "/boo"), None);
        assert_eq!(matches(&m, "/hi/13870948"), None);
        assert_eq!(matches(&m, "/hi/content/dog"), None);
        assert_eq!(matches(&m, "/hi/admin/user/foo"), None);
        assert_eq!(matches(&m, "/hi/admin/user/foo/"), None);
        assert_eq!(
            matches(&m, "/hi/content"),
            Some(params! {"controller" => "content", "action" => "hi"})
        );
        assert_eq!(
            matches(&m, "/hi/admin/user"),
            Some(params! {"controller" => "admin/user", "action" => "hi"})
        );
    }
}

#[test]
fn test_standard_route() {
    let m = mapper(&[(":controller/:action/:id", RouteOptions::new())], &["content", "admin/user"]);
    let none = None::<&str>;
    assert_eq!(
        matches(&m, "/content"),
        Some(params! {"controller" => "content", "action" => "index", "id" => none})
    );
    assert_eq!(
        matches(&m, "/content/list"),
        Some(params! {"controller" => "content", "action" => "list", "id" => none})
    );
    assert_eq!(
        matches(&m, "/content/show/10"),
        Some(params! {"controller" => "content", "action" => "show", "id" => "10"})
    );
    assert_eq!(
        matches(&m, "/admin/user"),
        Some(params! {"controller" => "admin/user", "action" => "index", "id" => none})
    );
    assert_eq!(
        matches(&m, "/admin/user/show/bbangert"),
        Some(params! {"controller" => "admin/user", "action" => "show", "id" => "bbangert"})
    );
    assert_eq!(matches(&m, "/content/show/10/20"), None);
    assert_eq!(matches(&m, "/food"), None);
}

#[test]
fn test_standard_route_with_gaps_and_domains() {
    let m = mapper(
        &[
            (
                "manage/:domain.:ext",
                RouteOptions::new().defaults(params! {
                    "controller" => "admin/user",
                    "action" => "view",
                    "ext" => "html",
                }),
            ),
            (":controller/:action/:id", RouteOptions::new()),
        ],
        &["content", "admin/user"],
    );
    assert_eq!(
        matches(&m, "/manage/groovie"),
        Some(params! {
            "controller" => "admin/user",
            "action" => "view",
            "ext" => "html",
            "domain" => "groovie",
        })
    );
    assert_eq!(
        matches(&m, "/manage/groovie.xml"),
        Some(params! {
            "controller" => "admin/user",
            "action" => "view",
            "ext" => "xml",
            "domain" => "groovie",
        })
    );
    assert_eq!(
        matches(&m, "/content/show/www.groovie.org"),
        Some(params! {"controller" => "content", "action" => "show", "id" => "www.groovie.org"})
    );
}

#[test]
fn test_regexp_char_escaping() {
    let mut m = Mapper::new();
    m.connect(":controller/:(action).:(id)", RouteOptions::new()).unwrap();
    m.create_regs(&["content"]).unwrap();
    assert_eq!(matches(&m, "/content/view#2"), None);
    assert_eq!(
        matches(&m, "/content/view.2"),
        Some(params! {"controller" => "content", "action" => "view", "id" => "2"})
    );

    m.connect(":controller/:action/:id", RouteOptions::new()).unwrap();
    m.create_regs(&["content", "find.all"]).unwrap();
    assert_eq!(
        matches(&m, "/content/view#2"),
        Some(params! {"controller" => "content", "action" => "view#2", "id" => None::<&str>})
    );
    assert_eq!(
        matches(&m, "/find.all/view"),
        Some(params! {"controller" => "find.all", "action" => "view", "id" => None::<&str>})
    );
    assert_eq!(matches(&m, "/findzall/view"), None);
}

// ═════════════════════════════════════════════════════════════════════
// 5. Split characters
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_splits_with_extension() {
    let m = mapper(
        &[("hi/:(action).html", RouteOptions::new().defaults(params! {"controller" => "content"}))],
        NO_CONTROLLERS,
    );
    assert_eq!(matches(&m, "/boo"), None);
    assert_eq!(matches(&m, "/hi/dude/what"), None);
    assert_eq!(matches(&m, "/hi"), None);
    assert_eq!(
        matches(&m, "/hi/index.html"),
        Some(params! {"controller" => "content", "action" => "index"})
    );
    assert_eq!(
        matches(&m, "/hi/dude.html"),
        Some(params! {"controller" => "content", "action" => "dude"})
    );
}

#[test]
fn test_splits_with_dashes() {
    let m = mapper(
        &[(
            "archives/:(year)-:(month)-:(day).html",
            RouteOptions::new().defaults(params! {"controller" => "archives", "action" => "view"}),
        )],
        NO_CONTROLLERS,
    );
    assert_eq!(matches(&m, "/boo"), None);
    assert_eq!(matches(&m, "/archives"), None);
    assert_eq!(
        matches(&m, "/archives/2004-12-4.html"),
        Some(params! {
            "controller" => "archives",
            "action" => "view",
            "year" => "2004",
            "month" => "12",
            "day" => "4",
        })
    );
    assert_eq!(
        matches(&m, "/archives/2004-6-4.html"),
        Some(params! {
            "controller" => "archives",
            "action" => "view",
            "year" => "2004",
            "month" => "6",
            "day" => "4",
        })
    );
}

#[test]
fn test_splits_packed_with_regexps() {
    let m = mapper(
        &[(
            "archives/:(year):(month):(day).html",
            RouteOptions::new()
                .defaults(params! {"controller" => "archives", "action" => "view"})
                .requirement("year", r"\d{4}")
                .requirement("month", r"\d{2}")
                .requirement("day", r"\d{2}"),
        )],
        NO_CONTROLLERS,
    );
    assert_eq!(matches(&m, "/boo"), None);
    assert_eq!(matches(&m, "/archives"), None);
    assert_eq!(matches(&m, "/archives/2004020.html"), None);
    assert_eq!(matches(&m, "/archives/200502.html"), None);
    assert_eq!(
        matches(&m, "/archives/20041204.html"),
        Some(params! {
            "controller" => "archives",
            "action" => "view",
            "year" => "2004",
            "month" => "12",
            "day" => "04",
        })
    );
}

#[test]
fn test_splits_with_slashes_and_default() {
    let m = mapper(
        &[(
            ":name/:(action)-:(id)",
            RouteOptions::new().defaults(params! {"controller" => "content"}),
        )],
        NO_CONTROLLERS,
    );
    assert_eq!(matches(&m, "/something"), None);
    assert_eq!(
        matches(&m, "/something/is-"),
        Some(params! {
            "controller" => "content",
            "action" => "is",
            "id" => None::<&str>,
            "name" => "something",
        })
    );
    assert_eq!(
        matches(&m, "/group/view-3"),
        Some(params! {"controller" => "content", "action" => "view", "id" => "3", "name" => "group"})
    );
    assert_eq!(
        matches(&m, "/group/view-"),
        Some(params! {
            "controller" => "content",
            "action" => "view",
            "id" => None::<&str>,
            "name" => "group",
        })
    );
}

// ═════════════════════════════════════════════════════════════════════
// 6. Mapper prefix
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_dynamic_with_prefix() {
    let mut m = Mapper::new();
    m.settings_mut().prefix = Some("/blog".to_string());
    m.connect(":controller/:action/:id", RouteOptions::new()).unwrap();
    m.connect("", RouteOptions::new().defaults(params! {"controller" => "content", "action" => "index"}))
        .unwrap();
    m.create_regs(&["content", "archive", "admin/comments"]).unwrap();

    assert_eq!(matches(&m, "/x"), None);
    assert_eq!(matches(&m, "/admin/comments"), None);
    assert_eq!(matches(&m, "/content/view"), None);
    assert_eq!(
        matches(&m, "/blog/content/view"),
        Some(params! {"controller" => "content", "action" => "view", "id" => None::<&str>})
    );
    assert_eq!(
        matches(&m, "/blog/admin/comments/article/2"),
        Some(params! {"controller" => "admin/comments", "action" => "article", "id" => "2"})
    );
    assert_eq!(
        matches(&m, "/blog"),
        Some(params! {"controller" => "content", "action" => "index"})
    );
}

// ═════════════════════════════════════════════════════════════════════
// 7. Conditions
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_method_condition() {
    let m = mapper(
        &[
            (
                "items/:id",
                RouteOptions::new()
                    .defaults(params! {"controller" => "items", "action" => "update"})
                    .method("put"),
            ),
            (
                "items/:id",
                RouteOptions::new().defaults(params! {"controller" => "items", "action" => "show"}),
            ),
        ],
        &["items"],
    );
    let put = matches_with(&m, "/items/4", &with_method("PUT")).unwrap();
    assert_eq!(put["action"].as_deref(), Some("update"));
    let get = matches_with(&m, "/items/4", &with_method("GET")).unwrap();
    assert_eq!(get["action"].as_deref(), Some("show"));
    let unknown = matches_with(&m, "/items/4", &ctx()).unwrap();
    assert_eq!(unknown["action"].as_deref(), Some("show"));
}

#[test]
fn test_function_condition() {
    let m = mapper(
        &[
            (
                "beta/:action",
                RouteOptions::new()
                    .defaults(params! {"controller" => "beta"})
                    .function(|ctx, _| ctx.method() == Some("GET")),
            ),
            ("beta/:action", RouteOptions::new().defaults(params! {"controller" => "closed"})),
        ],
        &["beta", "closed"],
    );
    let open = matches_with(&m, "/beta/list", &with_method("GET")).unwrap();
    assert_eq!(open["controller"].as_deref(), Some("beta"));
    let closed = matches_with(&m, "/beta/list", &with_method("POST")).unwrap();
    assert_eq!(closed["controller"].as_deref(), Some("closed"));
}

#[test]
fn test_sub_domain_recognition() {
    let mut m = Mapper::new();
    m.settings_mut().sub_domains = true;
    m.settings_mut().sub_domains_ignore = vec!["www".to_string()];
    m.connect(
        ":controller/:action/:id",
        RouteOptions::new().sub_domain(SubDomainCondition::OneOf(vec!["fred".to_string()])),
    )
    .unwrap();
    m.connect("home/:action", RouteOptions::new().defaults(params! {"controller" => "home"}))
        .unwrap();
    m.create_regs(&["content", "home"]).unwrap();

    let fred = RequestContext::builder().http_host("fred.example.com").build();
    assert_eq!(
        matches_with(&m, "/content/view", &fred),
        Some(params! {
            "controller" => "content",
            "action" => "view",
            "id" => None::<&str>,
            "sub_domain" => "fred",
        })
    );

    let www = RequestContext::builder().http_host("www.example.com:8080").build();
    assert_eq!(matches_with(&m, "/content/view", &www), None);
    assert_eq!(
        matches_with(&m, "/home/index", &www),
        Some(params! {"controller" => "home", "action" => "index", "sub_domain" => None::<&str>})
    );
}

#[test]
fn test_any_sub_domain_condition() {
    let mut m = Mapper::new();
    m.settings_mut().sub_domains = true;
    m.connect(
        "profile",
        RouteOptions::new()
            .defaults(params! {"controller" => "profile", "action" => "show"})
            .sub_domain(SubDomainCondition::Any),
    )
    .unwrap();
    m.create_regs(&["profile"]).unwrap();

    let bare = RequestContext::builder().http_host("example.com").build();
    assert_eq!(matches_with(&m, "/profile", &bare), None);
    let sub = RequestContext::builder().http_host("anna.example.com").build();
    let result = matches_with(&m, "/profile", &sub).unwrap();
    assert_eq!(result["sub_domain"].as_deref(), Some("anna"));
}

// ═════════════════════════════════════════════════════════════════════
// 8. Resources
// ═════════════════════════════════════════════════════════════════════

fn messages() -> Mapper {
    let mut m = Mapper::new();
    m.resource("message", "messages", ResourceOptions::new()).unwrap();
    m.create_regs(&["messages"]).unwrap();
    m
}

#[test]
fn test_resource_collection() {
    let m = messages();
    assert_eq!(
        matches_with(&m, "/messages", &with_method("GET")),
        Some(params! {"controller" => "messages", "action" => "index"})
    );
    assert_eq!(
        matches_with(&m, "/messages", &with_method("POST")),
        Some(params! {"controller" => "messages", "action" => "create"})
    );
}

#[test]
fn test_formatted_resource_collection() {
    let m = messages();
    assert_eq!(
        matches_with(&m, "/messages.xml", &with_method("GET")),
        Some(params! {"controller" => "messages", "action" => "index", "format" => "xml"})
    );
    assert_eq!(
        matches_with(&m, "/messages.xml", &with_method("POST")),
        Some(params! {"controller" => "messages", "action" => "create", "format" => "xml"})
    );
}

#[test]
fn test_resource_member() {
    let m = messages();
    assert_eq!(
        matches_with(&m, "/messages/42", &with_method("GET")),
        Some(params! {"controller" => "messages", "action" => "show", "id" => "42"})
    );
    assert_eq!(matches_with(&m, "/messages/42", &with_method("POST")), None);
    assert_eq!(
        matches_with(&m, "/messages/42", &with_method("PUT")),
        Some(params! {"controller" => "messages", "action" => "update", "id" => "42"})
    );
    assert_eq!(
        matches_with(&m, "/messages/42", &with_method("DELETE")),
        Some(params! {"controller" => "messages", "action" => "delete", "id" => "42"})
    );
}

#[test]
fn test_formatted_resource_member() {
    let m = messages();
    assert_eq!(
        matches_with(&m, "/messages/42.xml", &with_method("GET")),
        Some(params! {"controller" => "messages", "action" => "show", "id" => "42", "format" => "xml"})
    );
    assert_eq!(matches_with(&m, "/messages/42.xml", &with_method("POST")), None);
    assert_eq!(
        matches_with(&m, "/messages/42.xml", &with_method("DELETE")),
        Some(params! {"controller" => "messages", "action" => "delete", "id" => "42", "format" => "xml"})
    );
}

// ═════════════════════════════════════════════════════════════════════
// 9. Route match and tracing
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_route_match_returns_route() {
    let m = mapper(&[(":controller/:action/:id", RouteOptions::new())], &["content"]);
    let found = m.route_match("/content", &ctx()).unwrap().unwrap();
    assert_eq!(
        found.params,
        params! {"controller" => "content", "action" => "index", "id" => None::<&str>}
    );
    assert!(std::sync::Arc::ptr_eq(&found.route, &m.routes()[0]));
    assert!(m.route_match("/nowhere", &ctx()).unwrap().is_none());
}

#[test]
fn test_match_debug() {
    let m = mapper(
        &[
            ("http://nowhere.com/", RouteOptions::new().name("nowhere").is_static(true)),
            (":controller/:action/:id", RouteOptions::new()),
        ],
        &["content"],
    );

    let trace = m.match_debug("/content", &ctx()).unwrap();
    let found = trace.result.unwrap();
    assert!(std::sync::Arc::ptr_eq(&found.route, &m.routes()[1]));
    assert_eq!(
        found.params,
        params! {"controller" => "content", "action" => "index", "id" => None::<&str>}
    );

    let trace = m.match_debug("/nowhere", &ctx()).unwrap();
    assert!(trace.result.is_none());
    assert_eq!(trace.log.len(), 2);
    assert!(trace.log[0].is_static);
    assert_eq!(trace.log[0].name.as_deref(), Some("nowhere"));
    assert!(!trace.log[1].matched);
}

#[test]
fn test_debug_setting_still_returns_result() {
    let mut m = Mapper::new();
    m.settings_mut().debug = true;
    m.connect(":controller/:action", RouteOptions::new()).unwrap();
    m.create_regs(&["content"]).unwrap();
    assert_eq!(
        matches(&m, "/content/list"),
        Some(params! {"controller" => "content", "action" => "list"})
    );
}
