//! Credentials carried in request headers.
//!
//! An Algolia request authenticates with a matched pair: an application ID
//! and an api-key, each in its own header (see [`CredentialHeaders`]).  The
//! accessors here treat the two headers as one logical value:
//!
//! - reading yields [`Credentials`] only when **both** headers are present
//!   and parse; anything else reads as `None`;
//! - writing `Some` sets both headers, writing `None` clears both.
//!
//! Api-keys longer than [`MAX_HEADER_API_KEY_LENGTH`] are additionally
//! copied into the JSON body as `"apiKey"`.  That copy can fail (no body,
//! body not a JSON object); the header is set regardless.

use std::fmt;

use http::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use crate::config::{CredentialHeaders, API_KEY_BODY_FIELD, MAX_HEADER_API_KEY_LENGTH};
use crate::error::ApiKeyBodyError;
use crate::request::Request;

/// `true` for a non-empty string that survives a round-trip through a
/// header value.
fn is_header_safe(value: &str) -> bool {
    !value.is_empty() && HeaderValue::from_str(value).is_ok_and(|v| v.to_str().is_ok())
}

/// Identifies an Algolia application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApplicationId(String);

impl ApplicationId {
    /// Returns `None` if the value is empty or cannot travel in a header.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        is_header_safe(&v).then_some(Self(v))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An Algolia api-key.  `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` if the value is empty or cannot travel in a header.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        is_header_safe(&v).then_some(Self(v))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is too long to rely on the header alone.
    pub fn exceeds_header_limit(&self) -> bool {
        self.0.len() > MAX_HEADER_API_KEY_LENGTH
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// A matched application-ID / api-key pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub application_id: ApplicationId,
    pub api_key: ApiKey,
}

impl Credentials {
    pub fn new(application_id: ApplicationId, api_key: ApiKey) -> Self {
        Self {
            application_id,
            api_key,
        }
    }
}

// ---------------------------------------------------------------------------
// Header-backed accessors
// ---------------------------------------------------------------------------

fn read_header<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Set `name` to `value`, or remove it when `value` is `None`.
fn write_header(headers: &mut HeaderMap, name: &HeaderName, value: Option<&str>, sensitive: bool) {
    match value.and_then(|v| HeaderValue::from_str(v).ok()) {
        Some(mut v) => {
            v.set_sensitive(sensitive);
            headers.insert(name.clone(), v);
        }
        None => {
            headers.remove(name);
        }
    }
}

/// Insert `"apiKey": key` into a JSON object body.
fn embed_api_key(body: &mut Option<Vec<u8>>, key: &ApiKey) -> Result<(), ApiKeyBodyError> {
    let bytes = body.as_deref().ok_or(ApiKeyBodyError::MissingBody)?;

    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| ApiKeyBodyError::NotJson(e.to_string()))?;
    let Value::Object(mut object) = value else {
        return Err(ApiKeyBodyError::NotObject);
    };

    object.insert(
        API_KEY_BODY_FIELD.to_string(),
        Value::String(key.as_str().to_string()),
    );
    let encoded =
        serde_json::to_vec(&object).map_err(|e| ApiKeyBodyError::Encode(e.to_string()))?;
    *body = Some(encoded);
    Ok(())
}

impl CredentialHeaders {
    pub fn application_id(&self, request: &Request) -> Option<ApplicationId> {
        read_header(&request.headers, &self.application_id).and_then(ApplicationId::new)
    }

    pub fn api_key(&self, request: &Request) -> Option<ApiKey> {
        read_header(&request.headers, &self.api_key).and_then(ApiKey::new)
    }

    /// Both halves, or `None` if either is absent or invalid.
    pub fn credentials(&self, request: &Request) -> Option<Credentials> {
        Some(Credentials::new(
            self.application_id(request)?,
            self.api_key(request)?,
        ))
    }

    pub fn set_application_id(&self, request: &mut Request, id: Option<&ApplicationId>) {
        write_header(
            &mut request.headers,
            &self.application_id,
            id.map(ApplicationId::as_str),
            false,
        );
    }

    /// Set or clear the api-key header.
    ///
    /// A key longer than [`MAX_HEADER_API_KEY_LENGTH`] is also written into
    /// the JSON body.  An `Err` means only that body copy failed; the header
    /// has been set either way.
    pub fn set_api_key(
        &self,
        request: &mut Request,
        key: Option<&ApiKey>,
    ) -> Result<(), ApiKeyBodyError> {
        write_header(
            &mut request.headers,
            &self.api_key,
            key.map(ApiKey::as_str),
            true,
        );

        match key {
            Some(key) if key.exceeds_header_limit() => {
                tracing::debug!(
                    "credentials: api-key longer than {MAX_HEADER_API_KEY_LENGTH} bytes, copying into body"
                );
                embed_api_key(&mut request.body, key)
            }
            _ => Ok(()),
        }
    }

    /// Set both headers, or clear both when `credentials` is `None`.
    ///
    /// A failed api-key body copy is logged and otherwise ignored.
    pub fn set_credentials(&self, request: &mut Request, credentials: Option<&Credentials>) {
        self.set_application_id(request, credentials.map(|c| &c.application_id));
        if let Err(e) = self.set_api_key(request, credentials.map(|c| &c.api_key)) {
            tracing::warn!("credentials: could not set api-key in request body: {e}");
        }
    }
}

impl Request {
    /// The application ID under the default header name.
    pub fn application_id(&self) -> Option<ApplicationId> {
        CredentialHeaders::default().application_id(self)
    }

    /// The api-key under the default header name.
    pub fn api_key(&self) -> Option<ApiKey> {
        CredentialHeaders::default().api_key(self)
    }

    /// See [`CredentialHeaders::credentials`].
    pub fn credentials(&self) -> Option<Credentials> {
        CredentialHeaders::default().credentials(self)
    }

    pub fn set_application_id(&mut self, id: Option<&ApplicationId>) {
        CredentialHeaders::default().set_application_id(self, id);
    }

    /// See [`CredentialHeaders::set_api_key`].
    pub fn set_api_key(&mut self, key: Option<&ApiKey>) -> Result<(), ApiKeyBodyError> {
        CredentialHeaders::default().set_api_key(self, key)
    }

    /// See [`CredentialHeaders::set_credentials`].
    pub fn set_credentials(&mut self, credentials: Option<&Credentials>) {
        CredentialHeaders::default().set_credentials(self, credentials);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
