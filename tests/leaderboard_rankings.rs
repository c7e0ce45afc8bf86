/// Integration tests for leaderboard rankings and the faction breakdown.
use careerclash::progression::{
    ranking, Faction, LeaderboardCategory, ProgressionStorage, ProgressionStore, SkillName,
    Standing,
};
use tempfile::{tempdir, TempDir};

fn setup_store() -> (TempDir, ProgressionStore) {
    let dir = tempdir().unwrap();
    let storage = ProgressionStorage::open(dir.path()).unwrap();
    let mut store = ProgressionStore::open(storage).unwrap();
    store.create("Ada", Faction::KnowledgeSeekers).unwrap();
    (dir, store)
}

#[test]
fn test_rows_are_sorted_best_first() {
    let (_dir, store) = setup_store();
    for category in LeaderboardCategory::ALL {
        let board = ranking(store.character().unwrap(), category);
        assert_eq!(board.rows.len(), 10);
        assert!(board.rows.windows(2).all(|w| w[0].standing >= w[1].standing));
        assert!(board.rows.iter().enumerate().all(|(i, row)| row.rank == i + 1));
        assert_eq!(board.rows.iter().filter(|row| row.is_player).count(), 1);
    }
}

#[test]
fn test_level_rank_follows_experience() {
    let (_dir, mut store) = setup_store();
    store.add_experience(10_000).unwrap();
    let board = ranking(store.character().unwrap(), LeaderboardCategory::Level);
    // Level 11 with 10,000 XP sits behind DataNinja_Riley (11, 10,750).
    assert_eq!(board.player_rank, 5);
    let row = board.player_row().unwrap();
    assert_eq!(row.name, "Ada");
    assert_eq!(
        row.standing,
        Standing::Level {
            level: 11,
            experience: 10_000
        }
    );
    assert_eq!(row.standing.to_string(), "Level 11 (10000 XP)");
}

#[test]
fn test_tie_places_character_ahead() {
    let (_dir, mut store) = setup_store();
    // Five skills summing to 45 ties SkillMaster_Kai at the top.
    for skill in SkillName::ALL {
        store.adjust_skill(skill, 8).unwrap();
    }
    let board = ranking(store.character().unwrap(), LeaderboardCategory::Skills);
    assert_eq!(board.player_rank, 1);
    assert_eq!(board.rows[1].name, "SkillMaster_Kai");
}

#[test]
fn test_careers_rank_counts_unlocks() {
    let (_dir, mut store) = setup_store();
    let board = ranking(store.character().unwrap(), LeaderboardCategory::Careers);
    assert_eq!(board.player_rank, 10);
    assert_eq!(board.player_row().unwrap().standing, Standing::Careers { unlocked: 0 });

    store.unlock_career("code-summoner").unwrap();
    let board = ranking(store.character().unwrap(), LeaderboardCategory::Careers);
    assert_eq!(board.player_row().unwrap().standing, Standing::Careers { unlocked: 1 });
}

#[test]
fn test_factions_group_members_and_average_rank() {
    let (_dir, store) = setup_store();
    let board = ranking(store.character().unwrap(), LeaderboardCategory::Level);
    assert_eq!(board.factions.len(), Faction::PLAYABLE.len());

    // DataNinja_Riley #4, LogicLord_Quinn #9 and Ada last at #10.
    let seekers = board
        .factions
        .iter()
        .find(|f| f.faction == Faction::KnowledgeSeekers)
        .unwrap();
    assert_eq!(seekers.members, 3);
    assert_eq!(seekers.average_rank, Some(8));

    let total: usize = board.factions.iter().map(|f| f.members).sum();
    assert_eq!(total, 10);
}
