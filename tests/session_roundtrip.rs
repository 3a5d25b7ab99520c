//! End-to-end session lifecycle against the file-backed store: sign in,
//! restart (a fresh manager over the same cache file), sign out.

use std::sync::Arc;

use linktolawyers::auth::{FileSessionStore, SessionManager};
use linktolawyers::testing::{test_session, MockAuthApi};

#[tokio::test]
async fn session_survives_a_restart_and_sign_out_clears_it() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache_path = dir.path().join("session.json");

    // First run: sign in; the session lands in the cache file.
    {
        let api = MockAuthApi::default();
        api.push_sign_in(Ok(test_session("at-run1")));
        let manager = SessionManager::new(
            Arc::new(api),
            Arc::new(FileSessionStore::new(cache_path.clone())),
        );
        manager.init_blocking().await;
        assert!(manager.session().is_none(), "fresh cache has no session");

        manager
            .sign_in("jane@example.com", "pw123456")
            .await
            .expect("sign in");
        assert!(cache_path.exists(), "sign-in persists the session");
    }

    // Second run: a new manager restores the persisted session and a
    // subscriber observes the restore.
    let manager = SessionManager::new(
        Arc::new(MockAuthApi::default()),
        Arc::new(FileSessionStore::new(cache_path.clone())),
    );
    assert!(!manager.initialized());

    let mut rx = manager.init();
    assert!(manager.initialized(), "initialized flips before the restore");
    rx.changed().await.expect("restore notification");
    assert_eq!(
        rx.borrow_and_update()
            .as_ref()
            .expect("restored session")
            .access_token,
        "at-run1"
    );
    assert_eq!(
        manager.session().expect("session").access_token,
        "at-run1"
    );

    // Sign out invalidates remotely and removes the cache file.
    manager.sign_out().await.expect("sign out");
    assert!(manager.session().is_none());
    assert!(!cache_path.exists(), "sign-out clears the cache");
}

#[tokio::test]
async fn sign_up_submits_profile_metadata() {
    use linktolawyers::db::UserRole;
    use linktolawyers::testing::MemorySessionStore;

    let api = Arc::new(MockAuthApi::default());
    api.push_sign_up_session(test_session("at-new"));
    let manager = SessionManager::new(api.clone(), Arc::new(MemorySessionStore::default()));

    manager
        .sign_up("jane@example.com", "pw123456", Some("Jane Doe"), UserRole::Client)
        .await
        .expect("sign up");

    let seen = api.seen_sign_ups.lock().expect("lock");
    let request = seen.first().expect("one sign-up submitted");
    assert_eq!(request.data.role, UserRole::Client);
    assert_eq!(request.data.full_name, "Jane Doe");
    assert_eq!(request.data.first_name, "Jane");
    assert_eq!(request.data.last_name, "Doe");
}
