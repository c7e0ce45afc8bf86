/// Integration tests for sign-up, sign-in, session updates and logout.
use careerclash::progression::{
    Faction, ProgressionError, ProgressionStorage, ProgressionStore, SessionManager,
    SessionUpdate,
};
use tempfile::tempdir;

#[test]
fn test_register_persists_session() {
    let dir = tempdir().unwrap();
    let storage = ProgressionStorage::open(dir.path()).unwrap();
    let mut sessions = SessionManager::open(storage.clone()).unwrap();

    let id = sessions
        .register("ada@example.com", "Countess Ada")
        .unwrap()
        .id
        .clone();

    let stored = storage.load_session().unwrap().unwrap();
    assert_eq!(stored.id, id);
    assert_eq!(stored.email, "ada@example.com");
    assert_eq!(stored.username, "Countess Ada");
    assert!(!stored.has_character);

    // A fresh manager resumes the same session
    let resumed = SessionManager::open(storage).unwrap();
    assert_eq!(resumed.current().unwrap().id, id);
}

#[test]
fn test_character_creation_flow() {
    let dir = tempdir().unwrap();
    let storage = ProgressionStorage::open(dir.path()).unwrap();
    let mut sessions = SessionManager::open(storage.clone()).unwrap();
    let mut store = ProgressionStore::open(storage.clone()).unwrap();

    sessions.login("grace.hopper@navy.example.mil").unwrap();
    assert_eq!(sessions.current().unwrap().username, "grace.hopper");

    store.create("Grace", Faction::TechForgers).unwrap();
    assert!(sessions.mark_has_character().unwrap());
    assert!(storage.load_session().unwrap().unwrap().has_character);
}

#[test]
fn test_update_merges_fields() {
    let dir = tempdir().unwrap();
    let storage = ProgressionStorage::open(dir.path()).unwrap();
    let mut sessions = SessionManager::open(storage.clone()).unwrap();
    sessions.login("alan@example.com").unwrap();

    sessions
        .update(SessionUpdate {
            username: Some("Alan T".to_string()),
            ..SessionUpdate::default()
        })
        .unwrap();

    let stored = storage.load_session().unwrap().unwrap();
    assert_eq!(stored.username, "Alan T");
    assert_eq!(stored.email, "alan@example.com");

    let err = sessions
        .update(SessionUpdate {
            email: Some("broken".to_string()),
            ..SessionUpdate::default()
        })
        .unwrap_err();
    assert!(matches!(err, ProgressionError::InvalidInput(_)));
    assert_eq!(sessions.current().unwrap().email, "alan@example.com");
}

#[test]
fn test_logout_removes_both_records() {
    let dir = tempdir().unwrap();
    let storage = ProgressionStorage::open(dir.path()).unwrap();
    let mut sessions = SessionManager::open(storage.clone()).unwrap();
    let mut store = ProgressionStore::open(storage.clone()).unwrap();

    sessions.login("ada@example.com").unwrap();
    store.create("Ada", Faction::SocialChampions).unwrap();
    store.add_experience(300).unwrap();

    sessions.logout(&mut store).unwrap();
    assert!(sessions.current().is_none());
    assert!(store.character().is_none());
    assert!(storage.load_session().unwrap().is_none());
    assert!(storage.load_character().unwrap().is_none());

    // Logging out twice is harmless
    sessions.logout(&mut store).unwrap();
    assert!(storage.raw_character().unwrap().is_none());
}
