//! Percent-encoding rules for request paths and query strings.
//!
//! Paths leave only the RFC 3986 unreserved set (`A-Z a-z 0-9 - . _ ~`)
//! unescaped inside a segment.  Query components additionally keep the
//! delimiters that carry no meaning inside a `name=value` pair.
//!
//! # Double-encoded paths
//!
//! Some callers hand over object IDs that were escaped twice, e.g.
//!
//! ```text
//! /1/indexes/collections/gid%253A%252F%252Fshop%252FCollection%252F42
//! ```
//!
//! The path is always decoded once.  If the result is still percent-encoded
//! its `%XX` escapes are kept and only the characters decoding restored are
//! escaped again; otherwise the path is encoded exactly once.

use std::borrow::Cow;

use urlencoding::{decode, encode};

use crate::error::BuildError;

/// Characters left unescaped in query names and values on top of the
/// unreserved set.
const QUERY_SAFE: &[char] = &['!', '$', '\'', '(', ')', '*', ',', ';', ':', '@', '/', '?'];

/// How a command path ends up in the request URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedPath {
    /// The path needed one layer of encoding; this is the encoded form.
    Encoded(String),
    /// The path was double-encoded; this is the once-decoded form with its
    /// remaining escapes kept.
    PreEncoded(String),
}

impl ResolvedPath {
    /// The percent-encoded path to put on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            ResolvedPath::Encoded(p) | ResolvedPath::PreEncoded(p) => p,
        }
    }
}

/// `true` when decoding `s` would change it.
///
/// A string whose escapes decode to invalid UTF-8 also counts as encoded.
pub fn is_encoded(s: &str) -> bool {
    match decode(s) {
        Ok(decoded) => decoded != s,
        Err(_) => true,
    }
}

/// Remove one layer of percent-encoding.
pub fn decode_once(s: &str) -> Result<Cow<'_, str>, BuildError> {
    decode(s).map_err(|_| BuildError::MalformedPath(s.to_string()))
}

/// Resolve a command path into its on-the-wire form.
pub fn resolve_path(path: &str) -> Result<ResolvedPath, BuildError> {
    let decoded = decode_once(path)?;

    if is_encoded(&decoded) {
        return Ok(ResolvedPath::PreEncoded(escape_raw(&decoded)));
    }

    // Segment-wise so that an escaped `/` inside an object ID stays data.
    let segments = path
        .split('/')
        .map(|segment| decode_once(segment).map(|s| encode(&s).into_owned()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResolvedPath::Encoded(segments.join("/")))
}

/// Escape every character outside the unreserved set and `/`, keeping
/// existing `%XX` escapes as they are.
fn escape_raw(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut buf = [0u8; 4];
    for (i, ch) in s.char_indices() {
        if ch == '/' || (ch == '%' && is_escape_at(bytes, i)) {
            out.push(ch);
        } else {
            out.push_str(&encode(ch.encode_utf8(&mut buf)));
        }
    }
    out
}

/// `true` when `bytes[i]` starts a `%XX` escape.
fn is_escape_at(bytes: &[u8], i: usize) -> bool {
    bytes
        .get(i + 1..i + 3)
        .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
}

/// Escape a query parameter name or value.  Spaces become `%20`.
pub fn encode_query_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut buf = [0u8; 4];
    for ch in s.chars() {
        if QUERY_SAFE.contains(&ch) {
            out.push(ch);
        } else {
            out.push_str(&encode(ch.encode_utf8(&mut buf)));
        }
    }
    out
}

/// `name=value&name=value…` for the given pairs, or `None` when empty.
pub fn encode_query<'a, I>(pairs: I) -> Option<String>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let query = pairs
        .into_iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                encode_query_component(name),
                encode_query_component(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        None
    } else {
        Some(query)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
