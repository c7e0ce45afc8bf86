/// Integration tests for skill training, battle arena, mini-game and
/// personality assessment rewards.
use careerclash::progression::{
    achievement::GIANT_SLAYER, apply_personality_result, record_battle, record_minigame,
    train_skill, BattleDifficulty, BattleOutcome, Faction, PersonalityType, PointCategory,
    ProgressionStorage, ProgressionStore, SkillName,
};
use tempfile::{tempdir, TempDir};

fn setup_store() -> (TempDir, ProgressionStore) {
    let dir = tempdir().unwrap();
    let storage = ProgressionStorage::open(dir.path()).unwrap();
    let mut store = ProgressionStore::open(storage).unwrap();
    store.create("Hedy", Faction::CreativeArtisans).unwrap();
    (dir, store)
}

#[test]
fn test_train_skill_rewards() {
    let (_dir, mut store) = setup_store();
    let outcome = train_skill(&mut store, SkillName::Leadership).unwrap().unwrap();
    assert_eq!(outcome.points, 30);
    assert_eq!(outcome.experience, 60);
    assert_eq!(outcome.category, Some(PointCategory::Skill));
    assert_eq!(outcome.skill_changes, vec![(SkillName::Leadership, 2)]);

    let c = store.character().unwrap();
    assert_eq!(c.skills.leadership, 2);
    assert_eq!(c.skill_points, 30);
    assert_eq!(c.experience, 60);
}

#[test]
fn test_train_maxed_skill_is_noop() {
    let (_dir, mut store) = setup_store();
    store.adjust_skill(SkillName::Social, 20).unwrap();
    let before = store.snapshot().unwrap();
    assert!(train_skill(&mut store, SkillName::Social).unwrap().is_none());
    assert_eq!(store.snapshot().unwrap(), before);
}

#[test]
fn test_training_unlocks_skill_achievements() {
    let (_dir, mut store) = setup_store();
    train_skill(&mut store, SkillName::Logic).unwrap();
    let outcome = train_skill(&mut store, SkillName::Logic).unwrap().unwrap();
    assert_eq!(outcome.achievements_unlocked, vec!["skill-novice"]);
}

#[test]
fn test_hard_win_awards_giant_slayer() {
    let (_dir, mut store) = setup_store();
    let outcome = record_battle(
        &mut store,
        BattleOutcome {
            difficulty: BattleDifficulty::Hard,
            user_score: 500,
            opponent_score: 300,
        },
    )
    .unwrap()
    .unwrap();

    assert_eq!(outcome.points, 800);
    assert_eq!(outcome.experience, 300);
    assert_eq!(outcome.achievements_unlocked[0], GIANT_SLAYER);
    assert!(outcome.achievements_unlocked.contains(&"first-victory"));

    let c = store.character().unwrap();
    assert_eq!(c.battle_points, 800);
    assert_eq!(c.total_points, 800);
}

#[test]
fn test_huge_winning_score_saturates() {
    let (_dir, mut store) = setup_store();
    store.add_points(PointCategory::Quest, 10).unwrap();
    let outcome = record_battle(
        &mut store,
        BattleOutcome {
            difficulty: BattleDifficulty::Easy,
            user_score: u64::MAX,
            opponent_score: 0,
        },
    )
    .unwrap()
    .unwrap();

    assert_eq!(outcome.points, u64::MAX);
    let c = store.character().unwrap();
    assert_eq!(c.battle_points, u64::MAX);
    assert_eq!(c.total_points, u64::MAX);
    assert_eq!(c.experience, 100);
}

#[test]
fn test_loss_pays_half() {
    let (_dir, mut store) = setup_store();
    let outcome = record_battle(
        &mut store,
        BattleOutcome {
            difficulty: BattleDifficulty::Easy,
            user_score: 60,
            opponent_score: 90,
        },
    )
    .unwrap()
    .unwrap();
    assert_eq!(outcome.points, 30);
    assert_eq!(outcome.experience, 50);
    assert!(!store.character().unwrap().has_achievement(GIANT_SLAYER));
}

#[test]
fn test_hard_tie_is_not_a_win() {
    let (_dir, mut store) = setup_store();
    let outcome = record_battle(
        &mut store,
        BattleOutcome {
            difficulty: BattleDifficulty::Hard,
            user_score: 200,
            opponent_score: 200,
        },
    )
    .unwrap()
    .unwrap();
    assert_eq!(outcome.points, 100);
    assert_eq!(outcome.experience, 150);
    assert!(!outcome.achievements_unlocked.contains(&GIANT_SLAYER));
}

#[test]
fn test_minigame_score_converts_to_levels() {
    let (_dir, mut store) = setup_store();
    let outcome = record_minigame(&mut store, SkillName::Creativity, 85)
        .unwrap()
        .unwrap();
    assert_eq!(outcome.skill_changes, vec![(SkillName::Creativity, 5)]);
    assert_eq!(outcome.experience, 170);
    assert_eq!(outcome.points, 85);
    assert!(outcome.achievements_unlocked.contains(&"skill-master"));

    // Huge scores clamp at the skill ceiling
    record_minigame(&mut store, SkillName::Creativity, 10_000).unwrap();
    assert_eq!(store.character().unwrap().skills.creativity, 10);
}

#[test]
fn test_personality_result_boosts() {
    let (_dir, mut store) = setup_store();
    let outcome = apply_personality_result(&mut store, PersonalityType::Practical)
        .unwrap()
        .unwrap();
    assert_eq!(outcome.experience, 500);
    assert_eq!(outcome.points, 200);

    let c = store.character().unwrap();
    assert_eq!(c.skills.technical, 2);
    assert_eq!(c.skills.leadership, 2);
    assert_eq!(c.skills.logic, 2);
    assert_eq!(c.skills.creativity, 1);
    assert_eq!(c.skill_points, 200);
}

#[test]
fn test_activities_without_character() {
    let dir = tempdir().unwrap();
    let storage = ProgressionStorage::open(dir.path()).unwrap();
    let mut store = ProgressionStore::open(storage).unwrap();
    assert!(train_skill(&mut store, SkillName::Logic).unwrap().is_none());
    assert!(record_minigame(&mut store, SkillName::Logic, 50).unwrap().is_none());
    assert!(apply_personality_result(&mut store, PersonalityType::Creative)
        .unwrap()
        .is_none());
}
