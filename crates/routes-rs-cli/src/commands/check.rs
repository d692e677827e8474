//! The `check` management command.
//!
//! Loads a settings file, builds and compiles its route table, and reports
//! problems with the declarations.

use std::collections::BTreeMap;
use std::io::Write;

use routes_rs_core::{RoutesError, RoutesResult, Settings};
use routes_rs_http::urls::mapper::Mapper;

use crate::command::ManagementCommand;

/// Validates a route settings file.
pub struct CheckCommand;

/// The result of a single check.
#[derive(Debug, Clone)]
pub struct CheckMessage {
    /// The severity level of this check result.
    pub level: CheckLevel,
    /// A human-readable description of the issue.
    pub msg: String,
    /// An optional hint for how to resolve the issue.
    pub hint: Option<String>,
    /// A unique identifier for this check (e.g. "routes.W001").
    pub id: String,
}

/// Severity levels for check results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckLevel {
    /// Informational message.
    Info,
    /// A warning that may indicate a problem.
    Warning,
    /// An error that must be resolved.
    Error,
}

impl std::fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

impl CheckMessage {
    fn new(level: CheckLevel, id: &str, msg: String, hint: Option<&str>) -> Self {
        Self {
            level,
            msg,
            hint: hint.map(String::from),
            id: id.to_string(),
        }
    }
}

/// Runs the route checks against the given settings.
pub fn run_checks(settings: &Settings) -> Vec<CheckMessage> {
    let mut messages = Vec::new();

    let mapper = match Mapper::from_settings(settings) {
        Ok(mapper) => mapper,
        Err(err) => {
            messages.push(CheckMessage::new(
                CheckLevel::Error,
                "routes.E001",
                format!("Route table does not compile: {err}"),
                None,
            ));
            return messages;
        }
    };

    if mapper.routes().is_empty() {
        messages.push(CheckMessage::new(
            CheckLevel::Warning,
            "routes.W001",
            "No routes are declared".to_string(),
            Some("Add [[routes]] or [[resources]] tables to the settings file"),
        ));
    }

    let mut names: BTreeMap<&str, usize> = BTreeMap::new();
    for name in mapper.routes().iter().filter_map(|r| r.name()) {
        *names.entry(name).or_default() += 1;
    }
    for (name, count) in names.into_iter().filter(|(_, count)| *count > 1) {
        messages.push(CheckMessage::new(
            CheckLevel::Warning,
            "routes.W002",
            format!("Route name '{name}' is declared {count} times; the last one wins"),
            Some("Give each named route a unique name"),
        ));
    }

    let uses_controller = mapper.routes().iter().any(|r| {
        r.segments()
            .iter()
            .any(|s| s.name() == Some("controller"))
    });
    if uses_controller && settings.controllers.is_empty() {
        messages.push(CheckMessage::new(
            CheckLevel::Warning,
            "routes.W003",
            "A route captures :controller but no controllers are listed".to_string(),
            Some("Set `controllers` or ROUTES_CONTROLLERS so :controller can match"),
        ));
    }

    messages
}

impl ManagementCommand for CheckCommand {
    fn name(&self) -> &'static str {
        "check"
    }

    fn help(&self) -> &'static str {
        "Compile the route table and report problems"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(super::settings_arg())
    }

    fn handle(&self, matches: &clap::ArgMatches, out: &mut dyn Write) -> RoutesResult<()> {
        let settings = super::load_settings(matches)?;
        let messages = run_checks(&settings);

        if messages.is_empty() {
            writeln!(out, "System check identified no issues.")?;
            return Ok(());
        }

        for msg in &messages {
            writeln!(out, "{} ({}): {}", msg.level, msg.id, msg.msg)?;
            if let Some(hint) = &msg.hint {
                writeln!(out, "\tHINT: {hint}")?;
            }
        }

        let errors = messages.iter().filter(|m| m.level >= CheckLevel::Error).count();
        writeln!(out, "System check identified {} issue(s).", messages.len())?;

        if errors > 0 {
            return Err(RoutesError::ConfigurationError(format!(
                "System check found {errors} error(s)"
            )));
        }
        Ok(())
    }
}
