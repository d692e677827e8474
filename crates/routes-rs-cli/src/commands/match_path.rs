//! The `match` management command.
//!
//! Recognizes a path against a settings file's route table and prints the
//! resulting values as JSON.

use std::io::Write;

use routes_rs_core::RoutesResult;
use routes_rs_http::urls::context::RequestContext;
use routes_rs_http::urls::mapper::{Mapper, MatchLogEntry, RouteMatch};
use routes_rs_http::Params;
use serde::Serialize;

use crate::command::ManagementCommand;

/// Matches a path and prints the result.
pub struct MatchCommand;

/// The printed report.
#[derive(Debug, Serialize)]
pub struct MatchReport {
    /// The path that was matched.
    pub path: String,
    /// The matched route's pattern, if any.
    pub route: Option<String>,
    /// The matched route's name, if any.
    pub name: Option<String>,
    /// The recognized values, `None` when nothing matched.
    pub params: Option<Params>,
    /// Routes considered, present with `--trace`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<MatchLogEntry>>,
}

impl MatchReport {
    fn new(path: &str, result: Option<RouteMatch>, trace: Option<Vec<MatchLogEntry>>) -> Self {
        let (route, name, params) = match result {
            Some(m) => (
                Some(m.route.path().to_string()),
                m.route.name().map(String::from),
                Some(m.params),
            ),
            None => (None, None, None),
        };
        Self {
            path: path.to_string(),
            route,
            name,
            params,
            trace,
        }
    }
}

/// Builds the request context from `--method` and `--host`.
fn request_context(matches: &clap::ArgMatches) -> RequestContext {
    let mut builder = RequestContext::builder();
    if let Some(method) = matches.get_one::<String>("method") {
        builder = builder.method(method);
    }
    if let Some(host) = matches.get_one::<String>("host") {
        builder = builder.http_host(host);
    }
    builder.build()
}

/// Matches `path` against `mapper`, recording the trace when asked.
pub fn match_report(
    mapper: &Mapper,
    path: &str,
    ctx: &RequestContext,
    trace: bool,
) -> RoutesResult<MatchReport> {
    if trace {
        let traced = mapper.match_debug(path, ctx)?;
        Ok(MatchReport::new(path, traced.result, Some(traced.log)))
    } else {
        Ok(MatchReport::new(path, mapper.route_match(path, ctx)?, None))
    }
}

impl ManagementCommand for MatchCommand {
    fn name(&self) -> &'static str {
        "match"
    }

    fn help(&self) -> &'static str {
        "Match a path against the route table"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(super::settings_arg())
            .arg(
                clap::Arg::new("path")
                    .required(true)
                    .help("The request path, e.g. /blog/view/3"),
            )
            .arg(
                clap::Arg::new("method")
                    .long("method")
                    .short('m')
                    .help("The request method"),
            )
            .arg(
                clap::Arg::new("host")
                    .long("host")
                    .help("The request Host header"),
            )
            .arg(
                clap::Arg::new("trace")
                    .long("trace")
                    .action(clap::ArgAction::SetTrue)
                    .help("Include every route considered"),
            )
    }

    fn handle(&self, matches: &clap::ArgMatches, out: &mut dyn Write) -> RoutesResult<()> {
        let settings = super::load_settings(matches)?;
        let mapper = Mapper::from_settings(&settings)?;
        let path = matches.get_one::<String>("path").map_or("/", String::as_str);
        let ctx = request_context(matches);

        let report = match_report(&mapper, path, &ctx, matches.get_flag("trace"))?;
        if report.params.is_none() {
            tracing::info!(path, "No route matched");
        }
        serde_json::to_writer_pretty(&mut *out, &report).map_err(std::io::Error::from)?;
        writeln!(out)?;
        Ok(())
    }
}
