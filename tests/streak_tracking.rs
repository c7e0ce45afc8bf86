/// Integration tests for daily streak bookkeeping at calendar-day granularity.
use careerclash::progression::{Faction, ProgressionStorage, ProgressionStore};
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use tempfile::{tempdir, TempDir};

fn setup_store() -> (TempDir, ProgressionStore) {
    let dir = tempdir().unwrap();
    let storage = ProgressionStorage::open(dir.path()).unwrap();
    let mut store = ProgressionStore::open(storage).unwrap();
    store.create("Ada", Faction::KnowledgeSeekers).unwrap();
    (dir, store)
}

/// Reopen the store over a record last active at `last_active` with `streak` days.
fn plant(store: &ProgressionStore, last_active: DateTime<Utc>, streak: u32) -> ProgressionStore {
    let mut character = store.snapshot().unwrap();
    character.last_active = last_active;
    character.streak = streak;
    store.storage().put_character(&character).unwrap();
    ProgressionStore::open(store.storage().clone()).unwrap()
}

#[test]
fn test_yesterday_extends_streak() {
    let (_dir, store) = setup_store();
    let tz = FixedOffset::east_opt(0).unwrap();
    let now = tz.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();
    let mut store = plant(&store, (now - Duration::days(1)).with_timezone(&Utc), 3);

    assert!(store.update_streak_at(&now).unwrap());
    let c = store.character().unwrap();
    assert_eq!(c.streak, 4);
    assert_eq!(c.last_active, now.with_timezone(&Utc));
}

#[test]
fn test_gap_resets_streak() {
    let (_dir, store) = setup_store();
    let tz = FixedOffset::east_opt(0).unwrap();
    let now = tz.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();
    let mut store = plant(&store, (now - Duration::days(5)).with_timezone(&Utc), 4);

    store.update_streak_at(&now).unwrap();
    assert_eq!(store.character().unwrap().streak, 1);
}

#[test]
fn test_same_day_leaves_streak() {
    let (_dir, store) = setup_store();
    let tz = FixedOffset::east_opt(0).unwrap();
    let now = tz.with_ymd_and_hms(2024, 3, 10, 21, 0, 0).unwrap();
    let earlier = (now - Duration::hours(12)).with_timezone(&Utc);
    let mut store = plant(&store, earlier, 4);

    store.update_streak_at(&now).unwrap();
    let c = store.character().unwrap();
    assert_eq!(c.streak, 4);
    assert_eq!(c.last_active, now.with_timezone(&Utc));
}

#[test]
fn test_calendar_days_not_elapsed_hours() {
    // 23:30 yesterday to 00:15 today is under an hour but a new day
    let (_dir, store) = setup_store();
    let tz = FixedOffset::east_opt(2 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2024, 3, 10, 0, 15, 0).unwrap();
    let last = tz.with_ymd_and_hms(2024, 3, 9, 23, 30, 0).unwrap();
    let mut store = plant(&store, last.with_timezone(&Utc), 2);

    store.update_streak_at(&now).unwrap();
    assert_eq!(store.character().unwrap().streak, 3);
}

#[test]
fn test_streak_persists() {
    let (_dir, store) = setup_store();
    let tz = FixedOffset::east_opt(0).unwrap();
    let now = tz.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();
    let mut store = plant(&store, (now - Duration::days(1)).with_timezone(&Utc), 6);

    store.update_streak_at(&now).unwrap();
    let persisted = store.storage().load_character().unwrap().unwrap();
    assert_eq!(persisted.streak, 7);
}
