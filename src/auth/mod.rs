//! Identity service types and client.
//!
//! [`AuthApi`] is the seam between the session manager and the remote
//! identity service; [`HttpAuthClient`] is the production implementation over
//! [`RestClient`]. The mock used by tests lives in `crate::testing`.

pub mod session;
pub mod session_store;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::UserRole;
use crate::error::{ApiError, AuthError};
use crate::rest::RestClient;

pub use session::SessionManager;
pub use session_store::{FileSessionStore, SessionStore};

/// The authenticated identity as reported by the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
    pub created_at: Option<DateTime<Utc>>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

/// An issued token bundle. Opaque to the rest of the crate except for the
/// access token it carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime of the access token in seconds, as issued.
    pub expires_in: Option<i64>,
    /// Unix timestamp at which the access token expires.
    pub expires_at: Option<i64>,
    pub refresh_token: String,
    pub user: AuthUser,
}

impl Session {
    /// True when the access token's expiry has passed. Sessions without an
    /// `expires_at` claim are treated as live; the backend is the authority.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now().timestamp() >= expires_at,
            None => false,
        }
    }
}

/// Profile metadata submitted alongside sign-up credentials. The backend
/// copies it into the new row in `profiles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignUpMetadata {
    pub role: UserRole,
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
}

impl SignUpMetadata {
    /// Split a display name into first/last on whitespace. The first token is
    /// the first name; everything after it joins into the last name. Absent
    /// or blank names produce empty strings.
    pub fn from_display_name(role: UserRole, display_name: Option<&str>) -> Self {
        let full = display_name.unwrap_or("").trim();
        let mut parts = full.split_whitespace();
        let first_name = parts.next().unwrap_or("").to_string();
        let last_name = parts.collect::<Vec<_>>().join(" ");

        Self {
            role,
            full_name: full.to_string(),
            first_name,
            last_name,
            display_name: full.to_string(),
        }
    }
}

/// Wire request for sign-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub data: SignUpMetadata,
}

/// Result of a sign-up attempt. `session` is absent when the identity
/// service defers issuance (e.g. e-mail confirmation pending).
#[derive(Debug, Clone)]
pub struct SignUpOutcome {
    pub user: Option<AuthUser>,
    pub session: Option<Session>,
}

/// Operations the identity service exposes to this client.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpOutcome, AuthError>;
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError>;
    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AuthError>;
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError>;
}

/// Production identity client over the hosted auth endpoints.
pub struct HttpAuthClient {
    rest: RestClient,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

impl HttpAuthClient {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }
}

/// Credential rejections become [`AuthError::Rejected`]; transport and decode
/// faults pass through as [`AuthError::Api`].
fn map_auth_err(err: ApiError) -> AuthError {
    match err {
        ApiError::Rejected { status, message, .. } => AuthError::Rejected { status, message },
        other => AuthError::Api(other),
    }
}

/// The sign-up endpoint answers with a full token bundle when a session is
/// issued immediately, and with a bare user object when confirmation is
/// still pending.
fn parse_sign_up_response(value: serde_json::Value) -> Result<SignUpOutcome, AuthError> {
    if value.get("access_token").is_some() {
        let session: Session =
            serde_json::from_value(value).map_err(|e| ApiError::Decode {
                endpoint: "signup".to_string(),
                message: e.to_string(),
            })?;
        Ok(SignUpOutcome {
            user: Some(session.user.clone()),
            session: Some(session),
        })
    } else {
        let user: AuthUser = serde_json::from_value(value).map_err(|e| ApiError::Decode {
            endpoint: "signup".to_string(),
            message: e.to_string(),
        })?;
        Ok(SignUpOutcome {
            user: Some(user),
            session: None,
        })
    }
}

#[async_trait]
impl AuthApi for HttpAuthClient {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpOutcome, AuthError> {
        let value: serde_json::Value = self
            .rest
            .auth_post("signup", &[], request, None)
            .await
            .map_err(map_auth_err)?;
        parse_sign_up_response(value)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        self.rest
            .auth_post(
                "token",
                &[("grant_type", "password")],
                &PasswordGrant { email, password },
                None,
            )
            .await
            .map_err(map_auth_err)
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AuthError> {
        self.rest
            .auth_post(
                "token",
                &[("grant_type", "refresh_token")],
                &RefreshGrant { refresh_token },
                None,
            )
            .await
            .map_err(map_auth_err)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        self.rest
            .auth_post_empty("logout", Some(access_token))
            .await
            .map_err(map_auth_err)
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        self.rest
            .auth_get("user", Some(access_token))
            .await
            .map_err(map_auth_err)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{SignUpMetadata, parse_sign_up_response};
    use crate::db::UserRole;

    #[test]
    fn metadata_splits_two_part_display_name() {
        let metadata = SignUpMetadata::from_display_name(UserRole::Client, Some("Jane Doe"));
        assert_eq!(metadata.role, UserRole::Client);
        assert_eq!(metadata.full_name, "Jane Doe");
        assert_eq!(metadata.first_name, "Jane");
        assert_eq!(metadata.last_name, "Doe");
        assert_eq!(metadata.display_name, "Jane Doe");
    }

    #[test]
    fn metadata_joins_multi_part_last_name() {
        let metadata =
            SignUpMetadata::from_display_name(UserRole::Attorney, Some("Ana de la Cruz"));
        assert_eq!(metadata.first_name, "Ana");
        assert_eq!(metadata.last_name, "de la Cruz");
    }

    #[test]
    fn metadata_handles_absent_name() {
        let metadata = SignUpMetadata::from_display_name(UserRole::Client, None);
        assert_eq!(metadata.full_name, "");
        assert_eq!(metadata.first_name, "");
        assert_eq!(metadata.last_name, "");
    }

    #[test]
    fn metadata_serializes_with_expected_keys() {
        let metadata = SignUpMetadata::from_display_name(UserRole::Client, Some("Jane Doe"));
        let value = serde_json::to_value(&metadata).expect("serialize metadata");
        assert_eq!(
            value,
            json!({
                "role": "client",
                "full_name": "Jane Doe",
                "first_name": "Jane",
                "last_name": "Doe",
                "display_name": "Jane Doe",
            })
        );
    }

    #[test]
    fn sign_up_response_with_tokens_yields_session() {
        let outcome = parse_sign_up_response(json!({
            "access_token": "at-1",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 4_102_444_800i64,
            "refresh_token": "rt-1",
            "user": {
                "id": "7f4f78c5-0f12-4f6a-9c3a-0b8f1f3f2a11",
                "email": "a@b.com",
            },
        }))
        .expect("parse sign-up");

        let session = outcome.session.expect("session issued");
        assert_eq!(session.access_token, "at-1");
        assert_eq!(
            outcome.user.expect("user").email.as_deref(),
            Some("a@b.com")
        );
    }

    #[test]
    fn sign_up_response_without_tokens_yields_pending_user() {
        let outcome = parse_sign_up_response(json!({
            "id": "7f4f78c5-0f12-4f6a-9c3a-0b8f1f3f2a11",
            "email": "a@b.com",
        }))
        .expect("parse sign-up");

        assert!(outcome.session.is_none());
        assert!(outcome.user.is_some());
    }
}
