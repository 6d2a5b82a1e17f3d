//! Credential header configuration.

use std::str::FromStr;

use http::header::HeaderName;

use crate::error::BuildError;

/// Default header carrying the application ID.
pub const APPLICATION_ID_HEADER: &str = "x-algolia-application-id";

/// Default header carrying the api-key.
pub const API_KEY_HEADER: &str = "x-algolia-api-key";

/// Longest api-key sent in a header alone; longer keys are also copied into
/// the JSON body under [`API_KEY_BODY_FIELD`].
pub const MAX_HEADER_API_KEY_LENGTH: usize = 500;

/// Body field that carries an over-long api-key.
pub const API_KEY_BODY_FIELD: &str = "apiKey";

/// Names of the two headers that carry [`crate::Credentials`].
///
/// | Field | Default | Wire form |
/// |-------|---------|-----------|
/// | `application_id` | [`APPLICATION_ID_HEADER`] | `X-Algolia-Application-Id` |
/// | `api_key` | [`API_KEY_HEADER`] | `X-Algolia-API-Key` |
///
/// Header names are case-insensitive; `http` stores them lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialHeaders {
    pub application_id: HeaderName,
    pub api_key: HeaderName,
}

impl CredentialHeaders {
    /// Use custom header names, e.g. for a proxy that renames them.
    pub fn new(application_id: &str, api_key: &str) -> Result<Self, BuildError> {
        Ok(Self {
            application_id: header_name(application_id)?,
            api_key: header_name(api_key)?,
        })
    }
}

impl Default for CredentialHeaders {
    fn default() -> Self {
        Self {
            application_id: HeaderName::from_static(APPLICATION_ID_HEADER),
            api_key: HeaderName::from_static(API_KEY_HEADER),
        }
    }
}

fn header_name(name: &str) -> Result<HeaderName, BuildError> {
    HeaderName::from_str(name).map_err(|e| BuildError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
