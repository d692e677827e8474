//! The `generate` management command.
//!
//! Builds a URL from `key=value` pairs, optionally through a named route.

use std::io::Write;

use routes_rs_core::{RoutesError, RoutesResult};
use routes_rs_http::urls::context::RequestContext;
use routes_rs_http::urls::mapper::Mapper;
use routes_rs_http::Params;

use crate::command::ManagementCommand;

/// Generates a URL and prints it.
pub struct GenerateCommand;

/// Parses `key=value` arguments. A bare `key` or `key=` yields an empty value.
pub fn parse_pairs<'a, I>(pairs: I) -> RoutesResult<Params>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut params = Params::new();
    for pair in pairs {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key.is_empty() {
            return Err(RoutesError::ConfigurationError(format!(
                "Invalid argument '{pair}', expected key=value"
            )));
        }
        params.insert(key.to_string(), Some(value.to_string()));
    }
    Ok(params)
}

/// Generates a URL from `params`, through the named route when given.
pub fn generate_url(
    mapper: &Mapper,
    name: Option<&str>,
    params: &Params,
    ctx: &RequestContext,
) -> RoutesResult<String> {
    let url = match name {
        Some(name) => mapper.generate_named(name, params, ctx)?,
        None => mapper.generate(params, ctx)?,
    };
    url.ok_or_else(|| {
        RoutesError::ConfigurationError("No route can generate a URL for these values".to_string())
    })
}

impl ManagementCommand for GenerateCommand {
    fn name(&self) -> &'static str {
        "generate"
    }

    fn help(&self) -> &'static str {
        "Generate a URL from key=value pairs"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(super::settings_arg())
            .arg(
                clap::Arg::new("pairs")
                    .num_args(0..)
                    .value_name("KEY=VALUE")
                    .help("Route values, e.g. controller=blog action=view id=3"),
            )
            .arg(
                clap::Arg::new("name")
                    .long("name")
                    .short('n')
                    .help("Generate through this named route"),
            )
            .arg(
                clap::Arg::new("script-name")
                    .long("script-name")
                    .help("The mount point prepended to generated paths"),
            )
    }

    fn handle(&self, matches: &clap::ArgMatches, out: &mut dyn Write) -> RoutesResult<()> {
        let settings = super::load_settings(matches)?;
        let mapper = Mapper::from_settings(&settings)?;

        let params = parse_pairs(
            matches
                .get_many::<String>("pairs")
                .into_iter()
                .flatten()
                .map(String::as_str),
        )?;
        let mut ctx = RequestContext::builder();
        if let Some(script_name) = matches.get_one::<String>("script-name") {
            ctx = ctx.script_name(script_name);
        }
        let name = matches.get_one::<String>("name").map(String::as_str);

        let url = generate_url(&mapper, name, &params, &ctx.build())?;
        writeln!(out, "{url}")?;
        Ok(())
    }
}
