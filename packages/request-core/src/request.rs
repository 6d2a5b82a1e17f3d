//! The request builder: [`Command`] in, [`Request`] out.
//!
//! [`build`] is pure (no I/O, no shared state) and produces a request that
//! the transport can dispatch unmodified once it has picked a host.  The
//! request URL has a fixed `https` scheme and never carries a host; the
//! transport supplies one via [`Request::to_http`] or [`RequestUrl::to_uri`].
//!
//! # Body precedence
//!
//! The command's raw body is applied first.  A non-empty
//! [`RequestOptions::body`](crate::RequestOptions::body) then replaces it,
//! and nothing re-applies the raw body afterwards.

use std::fmt;
use std::str::FromStr;

use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::uri::{PathAndQuery, Scheme, Uri};
use http::Method;

use crate::command::Command;
use crate::encoding::{encode_query, resolve_path, ResolvedPath};
use crate::error::BuildError;

/// The host-less URL of a built request: `https:{path}[?{query}]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl {
    path_and_query: PathAndQuery,
}

impl RequestUrl {
    /// Assemble and validate a URL from an already percent-encoded path and
    /// query.
    ///
    /// An empty or relative path is rooted at `/`, so `""` becomes `/`.
    pub fn new(path: &str, query: Option<&str>) -> Result<Self, BuildError> {
        let root = if path.starts_with('/') { "" } else { "/" };
        let assembled = match query {
            Some(q) => format!("{root}{path}?{q}"),
            None => format!("{root}{path}"),
        };

        // PathAndQuery silently drops a `#fragment`; treat that as malformed.
        if assembled.contains('#') {
            return Err(BuildError::MalformedUrl(assembled));
        }

        let path_and_query = PathAndQuery::from_str(&assembled)
            .map_err(|_| BuildError::MalformedUrl(assembled.clone()))?;

        Ok(Self { path_and_query })
    }

    pub fn scheme(&self) -> &'static str {
        "https"
    }

    /// The percent-encoded path.
    pub fn path(&self) -> &str {
        self.path_and_query.path()
    }

    /// The percent-encoded query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.path_and_query.query()
    }

    pub fn path_and_query(&self) -> &PathAndQuery {
        &self.path_and_query
    }

    /// Materialise a full `https://{host}{path}?{query}` URI.
    pub fn to_uri(&self, host: &str) -> Result<Uri, BuildError> {
        Uri::builder()
            .scheme(Scheme::HTTPS)
            .authority(host)
            .path_and_query(self.path_and_query.clone())
            .build()
            .map_err(|e| BuildError::MalformedUrl(format!("https://{host}: {e}")))
    }
}

impl fmt::Display for RequestUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "https:{}", self.path_and_query)
    }
}

/// A fully materialised request, ready for the transport.
#[derive(Debug, Clone)]
pub struct Request {
    pub url: RequestUrl,
    pub method: Method,
    pub body: Option<Vec<u8>>,
    pub headers: HeaderMap,
}

impl Request {
    /// Convert into an [`http::Request`] addressed to `host`.
    ///
    /// A missing body becomes an empty one.
    pub fn to_http(&self, host: &str) -> Result<http::Request<Vec<u8>>, BuildError> {
        let mut request = http::Request::new(self.body.clone().unwrap_or_default());
        *request.method_mut() = self.method.clone();
        *request.uri_mut() = self.url.to_uri(host)?;
        *request.headers_mut() = self.headers.clone();
        Ok(request)
    }
}

/// Build a [`Request`] from a [`Command`].
///
/// # Errors
///
/// - [`BuildError::MalformedPath`]: the path does not decode to UTF-8.
/// - [`BuildError::MalformedUrl`]: path and query do not form a valid URL.
/// - [`BuildError::InvalidHeader`]: an option header name or value is invalid.
/// - [`BuildError::Body`]: the options body could not be JSON-encoded.
pub fn build(command: &Command) -> Result<Request, BuildError> {
    let path = resolve_path(&command.path)?;
    if let ResolvedPath::PreEncoded(p) = &path {
        tracing::debug!("request_builder: path was double-encoded, sending '{p}'");
    }

    let query = command
        .request_options
        .as_ref()
        .and_then(|opts| encode_query(&opts.url_parameters));

    let url = RequestUrl::new(path.as_str(), query.as_deref())?;

    let mut request = Request {
        url,
        method: command.method.clone(),
        body: command.body.clone(),
        headers: HeaderMap::new(),
    };

    if let Some(opts) = &command.request_options {
        for (name, value) in &opts.headers {
            let (name, value) = parse_header(name, value)?;
            request.headers.insert(name, value);
        }

        if let Some(body) = opts.effective_body() {
            let encoded = serde_json::to_vec(body).map_err(|e| BuildError::Body(e.to_string()))?;
            request.body = Some(encoded);
        }
    }

    Ok(request)
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), BuildError> {
    let header_name = HeaderName::from_str(name).map_err(|e| BuildError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    let header_value = HeaderValue::from_str(value).map_err(|e| BuildError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok((header_name, header_value))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::{json, Map, Value};

    use super::*;
    use crate::command::RequestOptions;

    fn object(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn build_sets_method_and_path() {
        let req = build(&Command::new(Method::GET, "/1/indexes/products")).unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.url.path(), "/1/indexes/products");
        assert_eq!(req.url.query(), None);
        assert_eq!(req.url.to_string(), "https:/1/indexes/products");
    }

    #[test]
    fn build_without_options_keeps_raw_body() {
        let cmd = Command::new(Method::POST, "/1/indexes/p/query").with_body(b"{}".to_vec());
        let req = build(&cmd).unwrap();
        assert_eq!(req.body.as_deref(), Some(b"{}".as_slice()));
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_appends_query() {
        let opts = RequestOptions::default().with_url_parameter("query", "hello world");
        let req = build(&Command::new(Method::GET, "/1/indexes/p").with_options(opts)).unwrap();
        assert_eq!(req.url.query(), Some("query=hello%20world"));
        assert_eq!(req.url.to_string(), "https:/1/indexes/p?query=hello%20world");
    }

    #[test]
    fn build_empty_parameters_adds_no_query() {
        let req = build(
            &Command::new(Method::GET, "/1/indexes/p").with_options(RequestOptions::default()),
        )
        .unwrap();
        assert_eq!(req.url.query(), None);
    }

    #[test]
    fn build_applies_option_headers() {
        let opts = RequestOptions::default().with_header("X-Forwarded-For", "10.0.0.1");
        let req = build(&Command::new(Method::GET, "/1/keys").with_options(opts)).unwrap();
        assert_eq!(req.headers["x-forwarded-for"], "10.0.0.1");
    }

    #[test]
    fn build_rejects_invalid_header_name() {
        let opts = RequestOptions::default().with_header("bad header", "v");
        let err = build(&Command::new(Method::GET, "/1/keys").with_options(opts)).unwrap_err();
        assert!(matches!(err, BuildError::InvalidHeader { ref name, .. } if name == "bad header"));
    }

    #[test]
    fn build_rejects_invalid_header_value() {
        let opts = RequestOptions::default().with_header("X-Test", "line\nbreak");
        let err = build(&Command::new(Method::GET, "/1/keys").with_options(opts)).unwrap_err();
        assert!(matches!(err, BuildError::InvalidHeader { .. }));
    }

    #[test]
    fn build_options_body_replaces_raw_body() {
        let opts = RequestOptions::default().with_body(object(json!({"b": 2})));
        let cmd = Command::new(Method::POST, "/1/indexes/p/batch")
            .with_body(br#"{"a":1}"#.to_vec())
            .with_options(opts);
        let req = build(&cmd).unwrap();
        assert_eq!(req.body.as_deref(), Some(br#"{"b":2}"#.as_slice()));
    }

    #[test]
    fn build_empty_options_body_keeps_raw_body() {
        let opts = RequestOptions::default().with_body(Map::new());
        let cmd = Command::new(Method::POST, "/1/indexes/p/batch")
            .with_body(br#"{"a":1}"#.to_vec())
            .with_options(opts);
        let req = build(&cmd).unwrap();
        assert_eq!(req.body.as_deref(), Some(br#"{"a":1}"#.as_slice()));
    }

    #[test]
    fn build_malformed_path_is_an_error() {
        let err = build(&Command::new(Method::GET, "/1/%FF")).unwrap_err();
        assert_eq!(err, BuildError::MalformedPath("/1/%FF".into()));
    }

    #[test]
    fn build_pre_encoded_path_escapes_restored_space() {
        // Decodes to "/1/a b%41": still encoded, so only the space is escaped.
        let req = build(&Command::new(Method::GET, "/1/a%20b%2541")).unwrap();
        assert_eq!(req.url.path(), "/1/a%20b%41");
    }

    #[test]
    fn build_pre_encoded_path_is_ascii_only() {
        let req = build(&Command::new(Method::GET, "/1/indexes/caf%C3%A9/gid%253A%252F%252Fy"))
            .unwrap();
        assert_eq!(req.url.path(), "/1/indexes/caf%C3%A9/gid%3A%2F%2Fy");
        assert!(req.url.path().is_ascii());
    }

    #[test]
    fn build_empty_path_is_root() {
        let req = build(&Command::new(Method::GET, "")).unwrap();
        assert_eq!(req.url.path(), "/");
        assert_eq!(req.url.to_string(), "https:/");
    }

    #[test]
    fn request_url_rejects_fragment() {
        assert!(matches!(
            RequestUrl::new("/1/a#frag", None),
            Err(BuildError::MalformedUrl(_))
        ));
    }

    #[test]
    fn to_uri_adds_host() {
        let url = RequestUrl::new("/1/indexes/p", Some("page=2")).unwrap();
        let uri = url.to_uri("appid-dsn.algolia.net").unwrap();
        assert_eq!(uri.to_string(), "https://appid-dsn.algolia.net/1/indexes/p?page=2");
    }

    #[test]
    fn request_url_roots_relative_path() {
        let url = RequestUrl::new("1/indexes/p", Some("page=1")).unwrap();
        assert_eq!(url.path(), "/1/indexes/p");
        assert_eq!(url.query(), Some("page=1"));
        let uri = url.to_uri("example.com").unwrap();
        assert_eq!(uri.to_string(), "https://example.com/1/indexes/p?page=1");
    }

    #[test]
    fn to_http_carries_everything() {
        let opts = RequestOptions::default()
            .with_header("X-Test", "1")
            .with_url_parameter("page", "3");
        let cmd = Command::new(Method::PUT, "/1/indexes/p/settings")
            .with_body(b"{}".to_vec())
            .with_options(opts);
        let http_req = build(&cmd).unwrap().to_http("example.com").unwrap();
        assert_eq!(http_req.method(), Method::PUT);
        assert_eq!(
            http_req.uri().to_string(),
            "https://example.com/1/indexes/p/settings?page=3"
        );
        assert_eq!(http_req.headers()["x-test"], "1");
        assert_eq!(http_req.body(), b"{}");
    }

    #[test]
    fn to_http_missing_body_is_empty() {
        let http_req = build(&Command::new(Method::GET, "/1/keys"))
            .unwrap()
            .to_http("example.com")
            .unwrap();
        assert!(http_req.body().is_empty());
    }
}
