//! Error types for request construction and api-key placement.

use thiserror::Error;

/// Errors that can occur when turning a [`crate::Command`] into a
/// [`crate::Request`].
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    /// The command path does not decode to valid UTF-8.
    #[error("command path is not valid percent-encoded UTF-8: '{0}'")]
    MalformedPath(String),

    /// The assembled path and query do not form a valid URL.
    #[error("assembled URL is malformed: '{0}'")]
    MalformedUrl(String),

    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// The options body could not be serialised to JSON.
    #[error("failed to encode request body as JSON: {0}")]
    Body(String),
}

/// Errors that can occur when embedding an api-key in a request body.
///
/// None of these prevent the api-key header from being set.
#[derive(Debug, Error, PartialEq)]
pub enum ApiKeyBodyError {
    #[error("request has no body to carry the api-key")]
    MissingBody,

    #[error("request body is not valid JSON: {0}")]
    NotJson(String),

    #[error("request body is not a JSON object")]
    NotObject,

    #[error("failed to re-encode request body: {0}")]
    Encode(String),
}
