/// Integration tests for quest completion rewards.
use careerclash::progression::{
    achievement::LEGEND_SLAYER, available_quests, complete_quest_with_rewards, Faction,
    ProgressionError, ProgressionStorage, ProgressionStore, SkillName,
};
use std::cell::RefCell;
use std::rc::Rc;
use tempfile::{tempdir, TempDir};

fn setup_store() -> (TempDir, ProgressionStore) {
    let dir = tempdir().unwrap();
    let storage = ProgressionStorage::open(dir.path()).unwrap();
    let mut store = ProgressionStore::open(storage).unwrap();
    store.create("Linus", Faction::InnovationPioneers).unwrap();
    (dir, store)
}

#[test]
fn test_beginner_quest_rewards() {
    let (_dir, mut store) = setup_store();
    let outcome = complete_quest_with_rewards(&mut store, "first-code")
        .unwrap()
        .unwrap();

    assert_eq!(outcome.experience_awarded, 150);
    assert_eq!(outcome.points_awarded, 100);
    assert_eq!(
        outcome.skill_changes,
        vec![(SkillName::Technical, 2), (SkillName::Logic, 2)]
    );
    assert_eq!(outcome.achievements_unlocked, vec!["quest-starter"]);

    let c = store.character().unwrap();
    assert!(c.has_completed_quest("first-code"));
    assert_eq!(c.quest_points, 100);
    assert_eq!(c.total_points, 100);
    assert_eq!(c.experience, 150);
}

#[test]
fn test_completion_and_rewards_are_one_write() {
    let (_dir, mut store) = setup_store();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |c| {
        sink.borrow_mut().push((
            c.has_completed_quest("first-code"),
            c.quest_points,
            c.skills.technical,
        ))
    });

    complete_quest_with_rewards(&mut store, "first-code").unwrap();

    // One notification for the payout, one for the synced achievement.
    assert_eq!(*seen.borrow(), vec![(true, 100, 2), (true, 100, 2)]);
}

#[test]
fn test_quest_completes_once() {
    let (_dir, mut store) = setup_store();
    complete_quest_with_rewards(&mut store, "design-thinking").unwrap();
    assert!(complete_quest_with_rewards(&mut store, "design-thinking")
        .unwrap()
        .is_none());

    let c = store.character().unwrap();
    assert_eq!(c.quest_points, 150);
    assert_eq!(c.skills.creativity, 3);
    assert_eq!(available_quests(c).len(), 7);
}

#[test]
fn test_locked_quest_changes_nothing() {
    let (_dir, mut store) = setup_store();
    let before = store.snapshot().unwrap();
    let err = complete_quest_with_rewards(&mut store, "team-leadership").unwrap_err();
    assert!(matches!(err, ProgressionError::RequirementsNotMet(_)));
    assert_eq!(store.snapshot().unwrap(), before);
}

#[test]
fn test_legendary_quest_clamps_and_awards() {
    let (_dir, mut store) = setup_store();
    store.adjust_skill(SkillName::Technical, 7).unwrap();
    store.adjust_skill(SkillName::Logic, 6).unwrap();

    let outcome = complete_quest_with_rewards(&mut store, "quantum-breakthrough")
        .unwrap()
        .unwrap();
    assert_eq!(
        outcome.skill_changes,
        vec![(SkillName::Technical, 10), (SkillName::Logic, 10)]
    );
    assert!(outcome.achievements_unlocked.contains(&LEGEND_SLAYER));
    assert!(outcome.achievements_unlocked.contains(&"skill-legend"));
    assert_eq!(store.character().unwrap().quest_points, 700);
}

#[test]
fn test_unknown_quest_is_not_found() {
    let (_dir, mut store) = setup_store();
    assert!(matches!(
        complete_quest_with_rewards(&mut store, "side-quest"),
        Err(ProgressionError::NotFound(_))
    ));
}
