//! Management command framework for routes-rs.
//!
//! This module provides the [`ManagementCommand`] trait for defining CLI
//! commands and [`CommandRegistry`] for registering and dispatching them.
//!
//! ## Defining a Custom Command
//!
//! ```rust,no_run
//! use std::io::Write;
//!
//! use routes_rs_cli::command::ManagementCommand;
//! use routes_rs_core::RoutesResult;
//!
//! struct GreetCommand;
//!
//! impl ManagementCommand for GreetCommand {
//!     fn name(&self) -> &str { "greet" }
//!     fn help(&self) -> &str { "Say hello" }
//!
//!     fn handle(&self, _matches: &clap::ArgMatches, out: &mut dyn Write) -> RoutesResult<()> {
//!         writeln!(out, "Hello from routes-rs!")?;
//!         Ok(())
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::io::Write;

use routes_rs_core::{RoutesError, RoutesResult};

/// A management command that can be registered and invoked through the CLI.
///
/// Implementations define a name, help text, optional arguments, and a
/// handler that writes its report to `out`.
pub trait ManagementCommand: Send + Sync {
    /// Returns the name of this command (used to invoke it from the CLI).
    fn name(&self) -> &str;

    /// Returns a short help description for this command.
    fn help(&self) -> &str;

    /// Adds custom arguments to the clap command.
    ///
    /// The default implementation returns the command unchanged.
    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Executes the command with the given argument matches.
    fn handle(&self, matches: &clap::ArgMatches, out: &mut dyn Write) -> RoutesResult<()>;
}

/// A registry of management commands.
///
/// Commands are registered by name and can be looked up, listed, or executed.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn ManagementCommand>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Creates a new empty command registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Registers a management command.
    ///
    /// If a command with the same name already exists, it is replaced.
    pub fn register(&mut self, command: Box<dyn ManagementCommand>) {
        let name = command.name().to_string();
        self.commands.insert(name, command);
    }

    /// Returns a reference to the command with the given name, if registered.
    pub fn get(&self, name: &str) -> Option<&dyn ManagementCommand> {
        self.commands.get(name).map(AsRef::as_ref)
    }

    /// Returns a sorted list of all registered command names.
    pub fn list_commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Builds a top-level clap `Command` containing all registered subcommands.
    pub fn build_cli(&self) -> clap::Command {
        let mut app = clap::Command::new("routes")
            .about("routes-rs management utility")
            .subcommand_required(true);

        let mut entries: Vec<_> = self.commands.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        for (name, cmd) in entries {
            let subcmd = clap::Command::new(name.clone()).about(cmd.help().to_string());
            app = app.subcommand(cmd.add_arguments(subcmd));
        }

        app
    }

    /// Executes the command identified by the given argument matches.
    ///
    /// # Errors
    ///
    /// Returns [`RoutesError::ConfigurationError`] when no known subcommand
    /// was given, and otherwise whatever the command's handler returns.
    pub fn execute(&self, matches: &clap::ArgMatches, out: &mut dyn Write) -> RoutesResult<()> {
        let (name, sub_matches) = matches.subcommand().ok_or_else(|| {
            RoutesError::ConfigurationError("No subcommand specified".to_string())
        })?;

        let cmd = self
            .get(name)
            .ok_or_else(|| RoutesError::ConfigurationError(format!("Unknown command: {name}")))?;

        tracing::debug!(command = name, "Running management command");
        cmd.handle(sub_matches, out)
    }
}
