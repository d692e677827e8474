//! Error types for the routes-rs workspace.
//!
//! [`RoutesError`] covers every failure the mapper can raise: malformed
//! route patterns, bad requirement expressions, using a mapper before its
//! table has been compiled, and configuration problems. Note that a path
//! matching no route, or a parameter set that no route can render, is not
//! an error; those outcomes are reported as `None` by the engine.

use thiserror::Error;

/// A problem found while parsing a route pattern such as `archive/:year/:month`.
///
/// # Examples
///
/// ```
/// use routes_rs_core::error::PatternError;
///
/// let err = PatternError::DuplicateParameter {
///     pattern: ":id/:id".to_string(),
///     name: "id".to_string(),
/// };
/// assert_eq!(err.to_string(), "Duplicate parameter 'id' in route ':id/:id'");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A `:(` or `*(` was opened but never closed.
    #[error("Unterminated parameter '{name}' in route '{pattern}'")]
    Unterminated {
        /// The route pattern.
        pattern: String,
        /// The partial parameter name collected before the end of input.
        name: String,
    },

    /// A `:` or `*` was not followed by a parameter name.
    #[error("Empty parameter name in route '{pattern}'")]
    EmptyParameter {
        /// The route pattern.
        pattern: String,
    },

    /// A parameter name contains characters that cannot name a capture group.
    #[error("Invalid parameter name '{name}' in route '{pattern}'")]
    InvalidParameter {
        /// The route pattern.
        pattern: String,
        /// The offending name.
        name: String,
    },

    /// The same parameter name appears twice in one route.
    #[error("Duplicate parameter '{name}' in route '{pattern}'")]
    DuplicateParameter {
        /// The route pattern.
        pattern: String,
        /// The repeated name.
        name: String,
    },

    /// More than one `*name` segment in a single route.
    #[error("Route '{pattern}' declares more than one glob segment")]
    MultipleGlobs {
        /// The route pattern.
        pattern: String,
    },
}

/// The primary error type for routes-rs.
#[derive(Error, Debug)]
pub enum RoutesError {
    // ── Route definition ─────────────────────────────────────────────

    /// A route pattern could not be parsed.
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    /// A requirement expression is not a valid regular expression.
    #[error("Invalid requirement for '{name}' ({pattern}): {message}")]
    InvalidRequirement {
        /// The parameter the requirement applies to.
        name: String,
        /// The requirement expression as given.
        pattern: String,
        /// The regex compiler's message.
        message: String,
    },

    // ── Mapper state ─────────────────────────────────────────────────

    /// `match`/`generate` was called before the route table was compiled.
    #[error("You must generate the regular expressions before matching.")]
    NotCompiled,

    /// `match` was called with an empty path.
    #[error("No URL provided, the minimum URL necessary to match is \"/\"")]
    EmptyPath,

    /// A route name was looked up that no registered route carries.
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RoutesError {
    /// Returns `true` for errors that indicate a misconfigured route table
    /// rather than anything about the request being served.
    ///
    /// - `Pattern`, `InvalidRequirement`, `NotCompiled`, `EmptyPath` -> `true`
    /// - Everything else -> `false`
    pub const fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            Self::Pattern(_) | Self::InvalidRequirement { .. } | Self::NotCompiled | Self::EmptyPath
        )
    }
}

/// A convenience type alias for `Result<T, RoutesError>`.
pub type RoutesResult<T> = Result<T, RoutesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_error_display() {
        let err = PatternError::Unterminated {
            pattern: "hi/:(name".into(),
            name: "name".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unterminated parameter 'name' in route 'hi/:(name'"
        );
    }

    #[test]
    fn test_pattern_error_conversion() {
        let err: RoutesError = PatternError::MultipleGlobs {
            pattern: "*a/*b".into(),
        }
        .into();
        assert!(err.to_string().starts_with("Pattern error: "));
        assert!(err.is_programmer_error());
    }

    #[test]
    fn test_not_compiled_message() {
        let err = RoutesError::NotCompiled;
        assert!(err
            .to_string()
            .contains("must generate the regular expressions"));
        assert!(err.is_programmer_error());
    }

    #[test]
    fn test_empty_path_message() {
        assert_eq!(
            RoutesError::EmptyPath.to_string(),
            "No URL provided, the minimum URL necessary to match is \"/\""
        );
    }

    #[test]
    fn test_configuration_error_not_programmer_error() {
        let err = RoutesError::ConfigurationError("bad".into());
        assert_eq!(err.to_string(), "Configuration error: bad");
        assert!(!err.is_programmer_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: RoutesError = io_err.into();
        assert!(err.to_string().contains("file missing"));
        assert!(!err.is_programmer_error());
    }
}
