//! Error types shared across the client core.
//!
//! Three taxonomies, matching the three seams of the crate:
//!
//! - [`ConfigError`]: settings/env resolution failures, fatal at startup.
//! - [`ApiError`]: faults from the queryable store. Propagated to the caller
//!   unchanged; there is no retry or backoff at this layer.
//! - [`AuthError`]: faults from the identity service. Always surfaced as a
//!   `Result` so callers can render the failure.

use thiserror::Error;

/// Configuration resolution errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration value '{key}'")]
    MissingValue { key: String },

    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("failed to read settings file '{path}': {message}")]
    Settings { path: String, message: String },
}

/// Faults from the remote queryable store.
///
/// Every data-access operation is a single unbuffered round-trip; any of
/// these is returned to the invoking caller as-is.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, TLS, timeout, ...).
    #[error("transport error calling {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    /// The store answered with a non-success status.
    #[error("backend rejected the request ({status}): {message}")]
    Rejected {
        status: u16,
        /// PostgREST error code when present, e.g. "PGRST116".
        code: Option<String>,
        message: String,
    },

    /// The response body did not decode into the expected row shape.
    #[error("failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

/// Faults from the identity service and session handling.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The identity service rejected the credentials or request.
    #[error("identity service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// An operation that needs an active session was called without one.
    #[error("no active session")]
    NotSignedIn,

    /// Transport/decoding fault while talking to the identity service.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The persisted session copy could not be read or written.
    #[error("session store failure: {0}")]
    SessionStore(String),
}
