//! Built-in management commands.
//!
//! Every command takes the path of a settings file (TOML, or JSON when the
//! extension is `.json`) as its first positional argument. Environment
//! overrides (`ROUTES_PREFIX`, `ROUTES_CONTROLLERS`, ...) are applied on top.

pub mod check;
pub mod generate;
pub mod match_path;
pub mod routes;

use std::path::Path;

use routes_rs_core::settings_loader;
use routes_rs_core::{RoutesResult, Settings};

pub use check::CheckCommand;
pub use generate::GenerateCommand;
pub use match_path::MatchCommand;
pub use routes::RoutesCommand;

use crate::command::CommandRegistry;

/// Registers all built-in management commands into the given registry.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(CheckCommand));
    registry.register(Box::new(RoutesCommand));
    registry.register(Box::new(MatchCommand));
    registry.register(Box::new(GenerateCommand));
}

/// The positional settings-file argument shared by every command.
pub(crate) fn settings_arg() -> clap::Arg {
    clap::Arg::new("settings")
        .required(true)
        .value_name("SETTINGS")
        .help("Path to the route settings file")
}

/// Loads the settings file named on the command line.
pub(crate) fn load_settings(matches: &clap::ArgMatches) -> RoutesResult<Settings> {
    let path = matches
        .get_one::<String>("settings")
        .map_or("routes.toml", String::as_str);
    let path = Path::new(path);
    tracing::debug!(path = %path.display(), "Loading route settings");

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        settings_loader::from_json_file_with_env(path)
    } else {
        settings_loader::from_toml_file_with_env(path)
    }
}
