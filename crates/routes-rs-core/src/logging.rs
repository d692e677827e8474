//! Logging integration for routes-rs.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for wrapping route
//! recognition in a span.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level` (e.g. "debug", "info",
/// "routes_rs_http=trace") and falls back to "info" when it does not parse.
/// In debug mode a pretty, human-readable format is used; otherwise a
/// structured JSON format is used. Output goes to stderr. Installing a second
/// subscriber is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span covering the recognition of one path.
///
/// # Examples
///
/// ```
/// use routes_rs_core::logging::match_span;
///
/// let span = match_span("/blog/view/3");
/// let _guard = span.enter();
/// tracing::debug!("matching");
/// ```
pub fn match_span(path: &str) -> tracing::Span {
    tracing::info_span!("route_match", path = path)
}
