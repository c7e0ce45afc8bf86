/// Integration tests for derived achievement synchronization and summaries.
use careerclash::progression::{
    achievement_catalog, pending_achievements, summary, sync_achievements, Faction, PointCategory,
    ProgressionStorage, ProgressionStore, SkillName,
};
use tempfile::{tempdir, TempDir};

fn setup_store() -> (TempDir, ProgressionStore) {
    let dir = tempdir().unwrap();
    let storage = ProgressionStorage::open(dir.path()).unwrap();
    let mut store = ProgressionStore::open(storage).unwrap();
    store.create("Margaret", Faction::KnowledgeSeekers).unwrap();
    (dir, store)
}

#[test]
fn test_sync_unlocks_each_achievement_once() {
    let (_dir, mut store) = setup_store();
    store.add_points(PointCategory::Quest, 1200).unwrap();
    store.adjust_skill(SkillName::Logic, 4).unwrap();

    let first = sync_achievements(&mut store).unwrap();
    assert_eq!(first, vec!["skill-novice", "skill-master", "point-collector"]);
    assert!(sync_achievements(&mut store).unwrap().is_empty());
    assert!(pending_achievements(store.character().unwrap()).is_empty());
}

#[test]
fn test_sync_never_adds_display_points() {
    let (_dir, mut store) = setup_store();
    store.adjust_skill(SkillName::Technical, 9).unwrap();
    sync_achievements(&mut store).unwrap();
    let c = store.character().unwrap();
    assert_eq!(c.total_points, 0);
    assert_eq!(c.experience, 0);
}

#[test]
fn test_well_rounded_requires_all_skills() {
    let (_dir, mut store) = setup_store();
    for skill in [
        SkillName::Logic,
        SkillName::Creativity,
        SkillName::Leadership,
        SkillName::Technical,
    ] {
        store.adjust_skill(skill, 4).unwrap();
    }
    assert!(!sync_achievements(&mut store).unwrap().contains(&"well-rounded"));
    store.adjust_skill(SkillName::Social, 4).unwrap();
    assert_eq!(sync_achievements(&mut store).unwrap(), vec!["well-rounded"]);
}

#[test]
fn test_summary_totals() {
    let (_dir, mut store) = setup_store();
    store.add_points(PointCategory::Battle, 10).unwrap();
    sync_achievements(&mut store).unwrap();

    let totals = summary(store.character().unwrap());
    assert_eq!(totals.unlocked, 1);
    assert_eq!(totals.total, achievement_catalog().len());
    assert_eq!(totals.points, 150);
    assert_eq!(totals.legendary, 0);
    assert_eq!(totals.completion_percent(), 5);
}

#[test]
fn test_progress_reports_current_and_target() {
    let (_dir, mut store) = setup_store();
    store.complete_quest("first-code").unwrap();
    store.complete_quest("design-thinking").unwrap();
    let quest_master = achievement_catalog()
        .iter()
        .find(|a| a.id == "quest-master")
        .unwrap();
    assert_eq!(quest_master.progress(store.character().unwrap()), (2, 3));
}
