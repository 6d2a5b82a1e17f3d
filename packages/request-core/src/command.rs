//! Command descriptors: the input side of the request builder.
//!
//! A [`Command`] is the caller's abstract description of one API call: the
//! resource path, the HTTP method, an optional raw body, and optional
//! per-call [`RequestOptions`].  Commands are built by the (external) command
//! catalog and handed to [`crate::build`] read-only.
//!
//! # Example
//!
//! ```text
//! let options = RequestOptions::default()
//!     .with_url_parameter("query", "hello world")
//!     .with_header("X-Forwarded-For", "10.0.0.1");
//!
//! let command = Command::new(Method::GET, "/1/indexes/products")
//!     .with_options(options);
//! ```

use std::collections::BTreeMap;

use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-call overrides layered on top of a command's defaults.
///
/// Both maps are ordered so that query strings and header application are
/// deterministic; callers should not rely on any particular order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Extra headers, keyed by header name.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Query parameters, keyed by parameter name.  Values are already strings.
    #[serde(default, rename = "urlParameters")]
    pub url_parameters: BTreeMap<String, String>,

    /// A JSON object that, when present and non-empty, replaces the
    /// command's raw body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Map<String, Value>>,
}

impl RequestOptions {
    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add or replace a query parameter.
    pub fn with_url_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.url_parameters.insert(name.into(), value.into());
        self
    }

    /// Set the JSON body override.
    pub fn with_body(mut self, body: Map<String, Value>) -> Self {
        self.body = Some(body);
        self
    }

    /// The body override, if it is present and has at least one field.
    pub fn effective_body(&self) -> Option<&Map<String, Value>> {
        self.body.as_ref().filter(|b| !b.is_empty())
    }
}

/// One API call, as described by the command layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Path reference in absolute-string form, e.g. `/1/indexes/products`.
    /// May arrive percent-encoded once or (for some object IDs) twice.
    pub path: String,

    pub method: Method,

    /// Raw body bytes.
    pub body: Option<Vec<u8>>,

    pub request_options: Option<RequestOptions>,
}

impl Command {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            body: None,
            request_options: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.request_options = Some(options);
        self
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
