//! Client core for the LinkToLawyers legal-services marketplace.
//!
//! Two halves: the session layer ([`auth`]) wraps the hosted identity
//! service and owns the signed-in state, and the data-access layer ([`db`])
//! exposes the marketplace tables (profiles, requests, quotes, messages,
//! documents, consultations) through typed store traits. Both speak to the
//! backend through one [`rest::RestClient`].
//!
//! The `ltl` binary is a thin CLI over the same library surface.

pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod rest;
pub mod settings;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use auth::{HttpAuthClient, SessionManager};
pub use config::{BackendConfig, SessionCacheConfig};
pub use db::{MarketplaceDb, RestBackend};
pub use error::{ApiError, AuthError, ConfigError};
pub use rest::RestClient;
pub use settings::Settings;
