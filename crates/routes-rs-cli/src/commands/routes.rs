//! The `routes` management command.
//!
//! Lists every route of a settings file in registration order.

use std::io::Write;

use routes_rs_core::RoutesResult;
use routes_rs_http::urls::mapper::Mapper;
use routes_rs_http::urls::route::Route;
use serde::Serialize;

use crate::command::ManagementCommand;

/// Prints the route table.
pub struct RoutesCommand;

/// One line of the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRow {
    /// The route name, or `None` for unnamed routes.
    pub name: Option<String>,
    /// Accepted methods, or `None` for any method.
    pub methods: Option<Vec<String>>,
    /// The route pattern.
    pub path: String,
    /// Static routes are only reachable by name.
    #[serde(rename = "static")]
    pub is_static: bool,
}

impl From<&Route> for RouteRow {
    fn from(route: &Route) -> Self {
        Self {
            name: route.name().map(String::from),
            methods: route.conditions().methods.clone(),
            path: route.path().to_string(),
            is_static: route.is_static(),
        }
    }
}

impl RouteRow {
    fn methods_label(&self) -> String {
        self.methods
            .as_ref()
            .map_or_else(|| "ANY".to_string(), |m| m.join("|"))
    }
}

/// Collects the listing for a built mapper.
pub fn route_rows(mapper: &Mapper) -> Vec<RouteRow> {
    mapper.routes().iter().map(|r| RouteRow::from(r.as_ref())).collect()
}

/// Renders rows as aligned text columns.
pub fn render_table(rows: &[RouteRow]) -> String {
    let name_width = rows
        .iter()
        .map(|r| r.name.as_deref().map_or(1, str::len))
        .max()
        .unwrap_or(0)
        .max("NAME".len());
    let method_width = rows
        .iter()
        .map(|r| r.methods_label().len())
        .max()
        .unwrap_or(0)
        .max("METHODS".len());

    let mut table = format!("{:<name_width$}  {:<method_width$}  PATH\n", "NAME", "METHODS");
    for row in rows {
        let path = if row.is_static {
            format!("{} (static)", row.path)
        } else {
            format!("/{}", row.path.trim_start_matches('/'))
        };
        table.push_str(&format!(
            "{:<name_width$}  {:<method_width$}  {path}\n",
            row.name.as_deref().unwrap_or("-"),
            row.methods_label(),
        ));
    }
    table
}

impl ManagementCommand for RoutesCommand {
    fn name(&self) -> &'static str {
        "routes"
    }

    fn help(&self) -> &'static str {
        "List the routes declared in a settings file"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(super::settings_arg()).arg(
            clap::Arg::new("json")
                .long("json")
                .action(clap::ArgAction::SetTrue)
                .help("Print the listing as JSON"),
        )
    }

    fn handle(&self, matches: &clap::ArgMatches, out: &mut dyn Write) -> RoutesResult<()> {
        let settings = super::load_settings(matches)?;
        let mapper = Mapper::from_settings(&settings)?;
        let rows = route_rows(&mapper);

        if matches.get_flag("json") {
            serde_json::to_writer_pretty(&mut *out, &rows).map_err(std::io::Error::from)?;
            writeln!(out)?;
        } else {
            out.write_all(render_table(&rows).as_bytes())?;
        }
        Ok(())
    }
}
