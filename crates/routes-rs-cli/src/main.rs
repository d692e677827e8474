//! The `routes` management binary.

use std::process::ExitCode;

use routes_rs_cli::command::CommandRegistry;
use routes_rs_cli::commands::register_builtin_commands;
use routes_rs_core::logging::setup_logging;
use routes_rs_core::settings_loader::apply_env_overrides;
use routes_rs_core::Settings;

fn main() -> ExitCode {
    // Human-readable warnings by default; ROUTES_DEBUG / ROUTES_LOG_LEVEL override.
    let mut logging = Settings {
        debug: true,
        log_level: "warn".to_string(),
        ..Settings::default()
    };
    apply_env_overrides(&mut logging);
    setup_logging(&logging);

    let mut registry = CommandRegistry::new();
    register_builtin_commands(&mut registry);
    let matches = registry.build_cli().get_matches();

    let stdout = std::io::stdout();
    match registry.execute(&matches, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "Command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
