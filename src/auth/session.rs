//! Ambient authentication state.
//!
//! The [`SessionManager`] is the single source of truth for "is the user
//! signed in, and as whom". Consumers read the current session (or subscribe
//! to changes through a watch channel) and gate on [`SessionManager::initialized`]
//! before trusting it. All identity mutations go through the manager so the
//! published state and the persisted copy never diverge.

use std::sync::Arc;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::auth::{AuthApi, AuthUser, Session, SignUpMetadata, SignUpOutcome, SignUpRequest};
use crate::auth::session_store::SessionStore;
use crate::db::UserRole;
use crate::error::AuthError;

pub struct SessionManager {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn SessionStore>,
    session: RwLock<Option<Session>>,
    initialized: AtomicBool,
    changes: watch::Sender<Option<Session>>,
}

impl SessionManager {
    pub fn new(api: Arc<dyn AuthApi>, store: Arc<dyn SessionStore>) -> Arc<Self> {
        let (changes, _) = watch::channel(None);
        Arc::new(Self {
            api,
            store,
            session: RwLock::new(None),
            initialized: AtomicBool::new(false),
            changes,
        })
    }

    /// Establish the session-change subscription and start restoring any
    /// persisted session in the background.
    ///
    /// `initialized` flips to true as soon as the subscription exists; the
    /// restore may still be in flight, so an `initialized` manager can still
    /// report no session for a moment. Calling `init` again is a no-op that
    /// just hands out another receiver.
    pub fn init(self: &Arc<Self>) -> watch::Receiver<Option<Session>> {
        let rx = self.changes.subscribe();
        if self.initialized.swap(true, Ordering::AcqRel) {
            return rx;
        }

        let this = Arc::clone(self);
        tokio::spawn(async move {
            match this.store.load().await {
                Ok(Some(session)) => this.restore(session),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "failed to load persisted session"),
            }
        });
        rx
    }

    /// Like [`SessionManager::init`], but waits for the persisted-session
    /// restore to finish before returning. One-shot callers (the CLI) use
    /// this so their first request already carries the restored token.
    pub async fn init_blocking(self: &Arc<Self>) -> watch::Receiver<Option<Session>> {
        let rx = self.changes.subscribe();
        if self.initialized.swap(true, Ordering::AcqRel) {
            return rx;
        }
        match self.store.load().await {
            Ok(Some(session)) => self.restore(session),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to load persisted session"),
        }
        rx
    }

    /// True once `init` has established the change subscription.
    pub fn initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// The current session, if signed in.
    pub fn session(&self) -> Option<Session> {
        read_lock(&self.session).clone()
    }

    /// The current access token, if signed in.
    pub fn access_token(&self) -> Option<String> {
        read_lock(&self.session)
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// Subscribe to session changes (sign-in, sign-out, refresh, restore).
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.changes.subscribe()
    }

    /// Register a new account. When the identity service issues a session
    /// immediately it becomes the active one; otherwise (confirmation
    /// pending) state is left unchanged.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
        role: UserRole,
    ) -> Result<SignUpOutcome, AuthError> {
        let request = SignUpRequest {
            email: email.to_string(),
            password: password.to_string(),
            data: SignUpMetadata::from_display_name(role, display_name),
        };
        let outcome = self.api.sign_up(&request).await?;

        match &outcome.session {
            Some(session) => self.set_session(session.clone()).await,
            None => debug!("sign-up accepted without an immediate session"),
        }
        Ok(outcome)
    }

    /// Exchange credentials for a session. On failure the current state is
    /// untouched.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = self.api.sign_in_with_password(email, password).await?;
        self.set_session(session.clone()).await;
        Ok(session)
    }

    /// Invalidate the current session remotely, then clear local state.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let token = self.access_token().ok_or(AuthError::NotSignedIn)?;
        self.api.sign_out(&token).await?;
        self.clear_session().await;
        Ok(())
    }

    /// Fetch the authoritative user record for the active session from the
    /// identity service.
    pub async fn user(&self) -> Result<AuthUser, AuthError> {
        let token = self.access_token().ok_or(AuthError::NotSignedIn)?;
        self.api.get_user(&token).await
    }

    /// Exchange the refresh token for a fresh session and publish it.
    pub async fn refresh(&self) -> Result<Session, AuthError> {
        let refresh_token = self
            .session()
            .map(|s| s.refresh_token)
            .ok_or(AuthError::NotSignedIn)?;
        let session = self.api.refresh_session(&refresh_token).await?;
        self.set_session(session.clone()).await;
        Ok(session)
    }

    async fn set_session(&self, session: Session) {
        *write_lock(&self.session) = Some(session.clone());
        // Persistence is best effort; a failed cache write must not fail the
        // sign-in itself.
        if let Err(e) = self.store.save(&session).await {
            warn!(error = %e, "failed to persist session");
        }
        self.changes.send_replace(Some(session));
    }

    async fn clear_session(&self) {
        *write_lock(&self.session) = None;
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "failed to clear persisted session");
        }
        self.changes.send_replace(None);
    }

    /// Apply a restored session, unless a sign-in already won the race.
    fn restore(&self, session: Session) {
        let mut guard = write_lock(&self.session);
        if guard.is_some() {
            return;
        }
        *guard = Some(session.clone());
        drop(guard);
        debug!("restored persisted session");
        self.changes.send_replace(Some(session));
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
