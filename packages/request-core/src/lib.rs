//! Request translation for the Algolia search client.
//!
//! This crate has **no I/O**: no networking, no async runtime, no retry
//! logic.  It turns an abstract API [`Command`] into a fully-formed
//! [`Request`] and reads/writes the [`Credentials`] carried in that
//! request's headers.  The transport (host selection, retries, sending) is
//! the host's concern; it receives the [`Request`] and calls
//! [`Request::to_http`] with the host it picked.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |---|---|
//! | [`command`] | Input descriptors: [`Command`], [`RequestOptions`] |
//! | [`request`] | [`build`], [`Request`], [`RequestUrl`] |
//! | [`encoding`] | Path and query percent-encoding, double-encoding detection |
//! | [`credentials`] | [`ApplicationId`], [`ApiKey`], [`Credentials`] and their header accessors |
//! | [`config`] | Credential header names and limits |
//! | [`error`] | [`BuildError`], [`ApiKeyBodyError`] |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use algolia_request_core::{build, ApiKey, ApplicationId, Command, Credentials, RequestOptions};
//! use http::Method;
//!
//! let options = RequestOptions::default().with_url_parameter("query", "hello world");
//! let mut request = build(&Command::new(Method::GET, "/1/indexes/products").with_options(options))?;
//!
//! request.set_credentials(Some(&Credentials::new(
//!     ApplicationId::new("APPID").unwrap(),
//!     ApiKey::new("KEY123").unwrap(),
//! )));
//!
//! let outbound = request.to_http("APPID-dsn.algolia.net")?;
//! ```

pub mod command;
pub mod config;
pub mod credentials;
pub mod encoding;
pub mod error;
pub mod request;

pub use command::{Command, RequestOptions};
pub use config::CredentialHeaders;
pub use credentials::{ApiKey, ApplicationId, Credentials};
pub use error::{ApiKeyBodyError, BuildError};
pub use request::{build, Request, RequestUrl};
