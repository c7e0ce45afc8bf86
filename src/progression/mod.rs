//! Career Clash character progression: the persistent character record, the
//! store that owns and mutates it, and the catalogs and reward rules layered
//! on top (careers, quests, achievements, activities, leaderboards, profile
//! export, session).

pub mod achievement;
pub mod activity;
pub mod career;
pub mod errors;
pub mod leaderboard;
pub mod profile;
pub mod quest;
pub mod session;
pub mod storage;
pub mod store;
pub mod types;

pub use achievement::{
    achievement_catalog, find_achievement, pending_achievements, summary, sync_achievements,
    AchievementCondition, AchievementDefinition, AchievementSummary,
};
pub use activity::{
    apply_personality_result, points_per_level, record_battle, record_minigame, skill_title,
    train_skill, BattleDifficulty, BattleOutcome, PersonalityType, RewardOutcome,
};
pub use career::{
    can_unlock, career_catalog, find_career, unlock_career_with_rewards, visible_careers,
    CareerDefinition, CareerUnlockOutcome,
};
pub use errors::ProgressionError;
pub use leaderboard::{
    ranking, FactionStanding, LeaderboardCategory, LeaderboardRow, Ranking, Standing,
};
pub use profile::{ProfileCharacter, ProfileExport, ProfileUser};
pub use quest::{
    available_quests, can_start_quest, complete_quest_with_rewards, find_quest, quest_catalog,
    QuestCompletionOutcome, QuestDefinition,
};
pub use session::{SessionManager, SessionUpdate};
pub use storage::{ProgressionStorage, ProgressionStorageBuilder, CHARACTER_KEY, SESSION_KEY};
pub use store::{ProgressionStore, SubscriptionId};
pub use types::*;
