//! Per-request context for matching and generation.
//!
//! [`RequestContext`] carries everything the mapper needs to know about the
//! request being served: where the application is mounted (`script_name`),
//! which host and scheme were used, the HTTP method, and the values matched
//! for this request (the "memory" that `url_for` falls back on). Nothing is
//! read from process-wide state; every call receives a context explicitly.

use http::request::Parts;

use super::params::Params;

/// The request-side inputs to `match` and `generate`.
///
/// # Examples
///
/// ```
/// use routes_rs_http::urls::context::RequestContext;
///
/// let ctx = RequestContext::builder()
///     .http_host("www.example.com:8080")
///     .method("get")
///     .script_name("/myapp")
///     .build();
///
/// assert_eq!(ctx.method(), Some("GET"));
/// assert_eq!(ctx.host().as_deref(), Some("www.example.com:8080"));
/// assert_eq!(ctx.protocol(), "http");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    script_name: String,
    http_host: Option<String>,
    server_name: Option<String>,
    server_port: Option<u16>,
    https: bool,
    method: Option<String>,
    memory: Params,
}

impl RequestContext {
    /// Creates a new [`RequestContextBuilder`].
    pub fn builder() -> RequestContextBuilder {
        RequestContextBuilder::default()
    }

    /// Builds a context from the head of an incoming HTTP request.
    ///
    /// Reads the method, the `Host` header, and whether the request is
    /// secure (an `https` URI scheme or `X-Forwarded-Proto: https`).
    pub fn from_parts(parts: &Parts) -> Self {
        let http_host = parts
            .headers
            .get(http::header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .or_else(|| parts.uri.authority().map(|a| a.as_str().to_string()));

        let forwarded_https = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("https"));
        let https = forwarded_https || parts.uri.scheme_str() == Some("https");

        Self {
            http_host,
            https,
            method: Some(parts.method.as_str().to_uppercase()),
            ..Self::default()
        }
    }

    /// Returns the mount point of the application (may be empty).
    pub fn script_name(&self) -> &str {
        &self.script_name
    }

    /// Returns the raw `Host` header value, including any port.
    pub fn http_host(&self) -> Option<&str> {
        self.http_host.as_deref()
    }

    /// Returns the upper-cased request method.
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// Returns `true` if the request was made over HTTPS.
    pub const fn is_secure(&self) -> bool {
        self.https
    }

    /// Returns the values matched for the current request.
    pub const fn memory(&self) -> &Params {
        &self.memory
    }

    /// Replaces the remembered values, typically with a fresh match result.
    pub fn set_memory(&mut self, memory: Params) {
        self.memory = memory;
    }

    /// Returns `"https"` or `"http"`.
    pub const fn protocol(&self) -> &'static str {
        if self.https {
            "https"
        } else {
            "http"
        }
    }

    /// Returns the host the request was addressed to.
    ///
    /// Uses the `Host` header when present. Otherwise falls back to the server
    /// name, with the server port appended unless it is the scheme's default.
    pub fn host(&self) -> Option<String> {
        if let Some(host) = &self.http_host {
            return Some(host.clone());
        }
        let name = self.server_name.as_ref()?;
        let default_port = if self.https { 443 } else { 80 };
        match self.server_port {
            Some(port) if port != default_port => Some(format!("{name}:{port}")),
            _ => Some(name.clone()),
        }
    }
}

/// Builder for constructing a [`RequestContext`].
#[derive(Debug, Default)]
pub struct RequestContextBuilder {
    context: RequestContext,
}

impl RequestContextBuilder {
    /// Sets the mount point of the application.
    #[must_use]
    pub fn script_name(mut self, script_name: &str) -> Self {
        self.context.script_name = script_name.to_string();
        self
    }

    /// Sets the `Host` header value.
    #[must_use]
    pub fn http_host(mut self, host: &str) -> Self {
        self.context.http_host = Some(host.to_string());
        self
    }

    /// Sets the server name used when no `Host` header is available.
    #[must_use]
    pub fn server_name(mut self, name: &str) -> Self {
        self.context.server_name = Some(name.to_string());
        self
    }

    /// Sets the server port used with the server name.
    #[must_use]
    pub const fn server_port(mut self, port: u16) -> Self {
        self.context.server_port = Some(port);
        self
    }

    /// Marks the request as secure.
    #[must_use]
    pub const fn https(mut self, https: bool) -> Self {
        self.context.https = https;
        self
    }

    /// Sets the request method. It is stored upper-cased.
    #[must_use]
    pub fn method(mut self, method: &str) -> Self {
        self.context.method = Some(method.to_uppercase());
        self
    }

    /// Sets the values remembered from the current request's match.
    #[must_use]
    pub fn memory(mut self, memory: Params) -> Self {
        self.context.memory = memory;
        self
    }

    /// Builds the context.
    pub fn build(self) -> RequestContext {
        self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let ctx = RequestContext::builder().build();
        assert_eq!(ctx.script_name(), "");
        assert!(ctx.method().is_none());
        assert!(ctx.host().is_none());
        assert!(!ctx.is_secure());
        assert!(ctx.memory().is_empty());
    }

    #[test]
    fn test_method_uppercased() {
        let ctx = RequestContext::builder().method("put").build();
        assert_eq!(ctx.method(), Some("PUT"));
    }

    #[test]
    fn test_host_from_server_name_default_port() {
        let ctx = RequestContext::builder()
            .server_name("example.com")
            .server_port(80)
            .build();
        assert_eq!(ctx.host().as_deref(), Some("example.com"));
    }

    #[test]
    fn test_host_from_server_name_custom_port() {
        let ctx = RequestContext::builder()
            .server_name("example.com")
            .server_port(8080)
            .build();
        assert_eq!(ctx.host().as_deref(), Some("example.com:8080"));

        let secure = RequestContext::builder()
            .server_name("example.com")
            .server_port(80)
            .https(true)
            .build();
        assert_eq!(secure.host().as_deref(), Some("example.com:80"));
        assert_eq!(secure.protocol(), "https");
    }

    #[test]
    fn test_http_host_wins_over_server_name() {
        let ctx = RequestContext::builder()
            .http_host("a.example.com")
            .server_name("b.example.com")
            .build();
        assert_eq!(ctx.host().as_deref(), Some("a.example.com"));
    }

    #[test]
    fn test_from_parts() {
        let request = http::Request::builder()
            .method("DELETE")
            .uri("/messages/4")
            .header("host", "fred.example.com")
            .header("x-forwarded-proto", "https")
            .body(())
            .unwrap();
        let (parts, ()) = request.into_parts();

        let ctx = RequestContext::from_parts(&parts);
        assert_eq!(ctx.method(), Some("DELETE"));
        assert_eq!(ctx.http_host(), Some("fred.example.com"));
        assert!(ctx.is_secure());
    }

    #[test]
    fn test_from_parts_uri_authority() {
        let request = http::Request::builder()
            .uri("https://example.com:8443/")
            .body(())
            .unwrap();
        let (parts, ()) = request.into_parts();

        let ctx = RequestContext::from_parts(&parts);
        assert_eq!(ctx.method(), Some("GET"));
        assert_eq!(ctx.http_host(), Some("example.com:8443"));
        assert!(ctx.is_secure());
    }

    #[test]
    fn test_set_memory() {
        let mut ctx = RequestContext::default();
        ctx.set_memory(crate::params! {"controller" => "blog"});
        assert_eq!(ctx.memory().len(), 1);
    }
}
