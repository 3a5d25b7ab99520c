//! Test support: a scripted identity service and an in-memory session store.
//!
//! Compiled for unit tests and, via the `test-utils` feature, for the
//! integration tests under `tests/`.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{AuthApi, AuthUser, Session, SignUpOutcome, SignUpRequest};
use crate::auth::session_store::SessionStore;
use crate::error::AuthError;

/// Build a session whose access token is `access_token`; everything else is
/// fixed, plausible data.
pub fn test_session(access_token: &str) -> Session {
    Session {
        access_token: access_token.to_string(),
        token_type: "bearer".to_string(),
        expires_in: Some(3600),
        expires_at: Some(Utc::now().timestamp() + 3600),
        refresh_token: format!("refresh-{access_token}"),
        user: test_user("jane@example.com"),
    }
}

pub fn test_user(email: &str) -> AuthUser {
    AuthUser {
        id: Uuid::new_v4(),
        email: Some(email.to_string()),
        user_metadata: json!({}),
        created_at: Some(Utc::now()),
        last_sign_in_at: None,
    }
}

fn no_scripted_response(op: &str) -> AuthError {
    AuthError::Rejected {
        status: 500,
        message: format!("no scripted response for {op}"),
    }
}

/// Identity service double that replays scripted responses in order.
///
/// Each queue is popped front-first; an empty queue yields a 500-style
/// rejection so a test that forgets to script a call fails loudly.
#[derive(Default)]
pub struct MockAuthApi {
    sign_in: Mutex<VecDeque<Result<Session, AuthError>>>,
    sign_up: Mutex<VecDeque<Result<SignUpOutcome, AuthError>>>,
    refresh: Mutex<VecDeque<Result<Session, AuthError>>>,
    sign_out: Mutex<VecDeque<Result<(), AuthError>>>,
    /// Sign-up requests observed, for asserting on submitted metadata.
    pub seen_sign_ups: Mutex<Vec<SignUpRequest>>,
}

impl MockAuthApi {
    pub fn push_sign_in(&self, result: Result<Session, AuthError>) {
        self.sign_in.lock().expect("lock").push_back(result);
    }

    /// Script a sign-up that issues a session immediately.
    pub fn push_sign_up_session(&self, session: Session) {
        self.sign_up.lock().expect("lock").push_back(Ok(SignUpOutcome {
            user: Some(session.user.clone()),
            session: Some(session),
        }));
    }

    /// Script a sign-up that leaves the session pending (confirmation flow).
    pub fn push_sign_up_pending(&self) {
        self.sign_up.lock().expect("lock").push_back(Ok(SignUpOutcome {
            user: Some(test_user("pending@example.com")),
            session: None,
        }));
    }

    pub fn push_sign_up_err(&self, err: AuthError) {
        self.sign_up.lock().expect("lock").push_back(Err(err));
    }

    pub fn push_refresh(&self, result: Result<Session, AuthError>) {
        self.refresh.lock().expect("lock").push_back(result);
    }

    pub fn push_sign_out(&self, result: Result<(), AuthError>) {
        self.sign_out.lock().expect("lock").push_back(result);
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpOutcome, AuthError> {
        self.seen_sign_ups
            .lock()
            .expect("lock")
            .push(request.clone());
        self.sign_up
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(no_scripted_response("sign_up")))
    }

    async fn sign_in_with_password(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<Session, AuthError> {
        self.sign_in
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(no_scripted_response("sign_in")))
    }

    async fn refresh_session(&self, _refresh_token: &str) -> Result<Session, AuthError> {
        self.refresh
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(no_scripted_response("refresh")))
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), AuthError> {
        self.sign_out
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn get_user(&self, _access_token: &str) -> Result<AuthUser, AuthError> {
        Ok(test_user("jane@example.com"))
    }
}

/// Session store backed by a mutex, for tests that don't want the filesystem.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    /// Seed the store with a session, as if a previous run had persisted it.
    pub fn set(&self, session: Session) {
        *self.inner.lock().expect("lock") = Some(session);
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.inner.lock().expect("lock").clone())
    }

    async fn save(&self, session: &Session) -> Result<(), AuthError> {
        *self.inner.lock().expect("lock") = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), AuthError> {
        *self.inner.lock().expect("lock") = None;
        Ok(())
    }
}
