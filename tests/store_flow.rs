//! End-to-end account and favorites flows over the JSON file backend.

use jsonland::auth::UserStore;
use jsonland::session::SessionContext;
use jsonland::storage::{keys, JsonFileStore, KeyValueStore};
use jsonland::{CountryCode, JsonLandError};
use std::sync::Arc;

fn open(dir: &tempfile::TempDir) -> (Arc<JsonFileStore>, UserStore) {
    let kv = Arc::new(JsonFileStore::open(dir.path().join("store.json")).unwrap());
    let store = UserStore::new(kv.clone());
    (kv, store)
}

fn us() -> CountryCode {
    CountryCode::parse("US").unwrap()
}

#[test]
fn register_add_remove_round() {
    let dir = tempfile::tempdir().unwrap();
    let (_, store) = open(&dir);

    let alice = store.register("alice", "a@x.com", "p", "d1").unwrap();
    assert!(alice.favorites().is_empty());
    assert_eq!(store.accounts().unwrap().len(), 1);
    assert_eq!(store.current_user(), Some(alice));

    store.add_favorite(&us()).unwrap();
    let alice = store.add_favorite(&us()).unwrap();
    assert_eq!(alice.favorites(), [us()]);

    let once = store.remove_favorite(&us()).unwrap();
    assert!(once.favorites().is_empty());
    let twice = store.remove_favorite(&us()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let (_, store) = open(&dir);
        store.register("alice", "a@x.com", "p", "d1").unwrap();
        store.add_favorite(&CountryCode::parse("no").unwrap()).unwrap();
    }

    let (_, store) = open(&dir);
    let alice = store.current_user().unwrap();
    assert_eq!(alice.username, "alice");
    assert_eq!(alice.favorites()[0].as_str(), "NO");
    assert_eq!(store.accounts().unwrap()[0], alice);
}

#[test]
fn duplicate_email_keeps_one_account() {
    let dir = tempfile::tempdir().unwrap();
    let (_, store) = open(&dir);

    store.register("alice", "a@x.com", "p", "d1").unwrap();
    let err = store.register("alice2", "a@x.com", "q", "d2").unwrap_err();
    assert!(matches!(err, JsonLandError::DuplicateEmail));
    assert_eq!(store.accounts().unwrap().len(), 1);
}

#[test]
fn logout_then_login_restores_favorites() {
    let dir = tempfile::tempdir().unwrap();
    let (kv, store) = open(&dir);

    store.register("alice", "a@x.com", "p", "d1").unwrap();
    store.add_favorite(&us()).unwrap();
    store.logout();

    assert_eq!(store.current_user(), None);
    assert_eq!(kv.get(keys::CURRENT_USER).unwrap(), None);
    assert!(matches!(store.add_favorite(&us()), Err(JsonLandError::NotLoggedIn)));

    assert!(matches!(
        store.login("a@x.com", "P"),
        Err(JsonLandError::InvalidCredentials)
    ));
    let alice = store.login("a@x.com", "p").unwrap();
    assert_eq!(alice.favorites(), [us()]);
}

#[test]
fn legacy_favorites_are_dropped_on_read() {
    let dir = tempfile::tempdir().unwrap();
    let (kv, store) = open(&dir);

    let legacy = r#"[{"username":"bob","email":"b@x.com","password":"p","photo":"d","favorites":["USA","fr",7,"FR"]}]"#;
    kv.set(keys::USERS, legacy).unwrap();

    let bob = store.login("b@x.com", "p").unwrap();
    let codes: Vec<_> = bob.favorites().iter().map(CountryCode::as_str).collect();
    assert_eq!(codes, ["FR"]);
}

#[tokio::test]
async fn session_context_mirrors_store() {
    let dir = tempfile::tempdir().unwrap();
    let (_, store) = open(&dir);
    store.register("alice", "a@x.com", "p", "d1").unwrap();

    let mut session = SessionContext::new(store.clone());
    assert!(session.is_loading());
    assert_eq!(session.load().await.map(|a| a.username.as_str()), Some("alice"));
    assert!(!session.is_loading());

    session.add_favorite("de").unwrap();
    session.add_favorite("DEU").unwrap();
    assert_eq!(session.user().unwrap().favorites().len(), 1);
    assert_eq!(store.current_user().as_ref(), session.user());

    session.logout();
    assert_eq!(session.user(), None);
    assert_eq!(store.current_user(), None);
}
