/// Achievement catalog and derived-achievement synchronization.
///
/// Most achievements follow from the character record itself (careers
/// unlocked, skill levels, streak, points). A few are event awards that only
/// the activity that earns them can grant.
use log::info;
use serde::Serialize;

use crate::progression::errors::ProgressionError;
use crate::progression::store::ProgressionStore;
use crate::progression::types::Character;

pub const LEGEND_SEEKER: &str = "legend-seeker";
pub const LEGEND_SLAYER: &str = "legend-slayer";
pub const GIANT_SLAYER: &str = "giant-slayer";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    Career,
    Skills,
    Quests,
    Dedication,
    Battle,
    Points,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AchievementRarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum AchievementCondition {
    CareersUnlocked { required: u32 },
    AnySkillAtLeast { level: u8 },
    /// Progress counts skills at or above `level`, out of five.
    AllSkillsAtLeast { level: u8 },
    QuestsCompleted { required: u32 },
    StreakAtLeast { days: u32 },
    BattlePointsEarned,
    TotalPointsAtLeast { points: u64 },
    /// Granted by an event, never derived.
    Awarded,
}

#[derive(Debug, Clone, Serialize)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub rarity: AchievementRarity,
    pub points: u64,
    pub condition: AchievementCondition,
}

const fn achievement(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: AchievementCategory,
    rarity: AchievementRarity,
    points: u64,
    condition: AchievementCondition,
) -> AchievementDefinition {
    AchievementDefinition {
        id,
        name,
        description,
        category,
        rarity,
        points,
        condition,
    }
}

#[rustfmt::skip]
static ACHIEVEMENTS: [AchievementDefinition; 19] = {
    use AchievementCategory as Cat;
    use AchievementCondition as When;
    use AchievementRarity as R;
    [
        achievement("first-career", "Career Pioneer", "Unlock your first career path", Cat::Career, R::Common, 100, When::CareersUnlocked { required: 1 }),
        achievement("career-explorer", "Career Explorer", "Unlock 5 different career paths", Cat::Career, R::Rare, 250, When::CareersUnlocked { required: 5 }),
        achievement("career-master", "Career Master", "Unlock 10 different career paths", Cat::Career, R::Epic, 500, When::CareersUnlocked { required: 10 }),
        achievement(LEGEND_SEEKER, "Legend Seeker", "Unlock a legendary career", Cat::Career, R::Legendary, 1000, When::Awarded),
        achievement("skill-novice", "Skill Novice", "Reach level 3 in any skill", Cat::Skills, R::Common, 100, When::AnySkillAtLeast { level: 3 }),
        achievement("skill-master", "Skill Master", "Reach level 5 in any skill", Cat::Skills, R::Rare, 300, When::AnySkillAtLeast { level: 5 }),
        achievement("skill-grandmaster", "Skill Grandmaster", "Reach level 8 in any skill", Cat::Skills, R::Epic, 750, When::AnySkillAtLeast { level: 8 }),
        achievement("skill-legend", "Skill Legend", "Max out any skill at level 10", Cat::Skills, R::Legendary, 1500, When::AnySkillAtLeast { level: 10 }),
        achievement("well-rounded", "Well Rounded", "Reach level 5 in every skill", Cat::Skills, R::Epic, 1000, When::AllSkillsAtLeast { level: 5 }),
        achievement("quest-starter", "Quest Starter", "Complete your first quest", Cat::Quests, R::Common, 100, When::QuestsCompleted { required: 1 }),
        achievement("quest-master", "Quest Master", "Complete 3 quests", Cat::Quests, R::Rare, 300, When::QuestsCompleted { required: 3 }),
        achievement(LEGEND_SLAYER, "Legend Slayer", "Complete a legendary quest", Cat::Quests, R::Legendary, 1000, When::Awarded),
        achievement("streak-warrior", "Streak Warrior", "Stay active 7 days in a row", Cat::Dedication, R::Rare, 400, When::StreakAtLeast { days: 7 }),
        achievement("dedication", "Dedication", "Stay active 30 days in a row", Cat::Dedication, R::Epic, 1000, When::StreakAtLeast { days: 30 }),
        achievement("first-victory", "First Victory", "Earn points in the battle arena", Cat::Battle, R::Common, 150, When::BattlePointsEarned),
        achievement(GIANT_SLAYER, "Giant Slayer", "Defeat a hard opponent", Cat::Battle, R::Epic, 750, When::Awarded),
        achievement("point-collector", "Point Collector", "Earn 1,000 total points", Cat::Points, R::Common, 200, When::TotalPointsAtLeast { points: 1000 }),
        achievement("point-master", "Point Master", "Earn 5,000 total points", Cat::Points, R::Rare, 500, When::TotalPointsAtLeast { points: 5000 }),
        achievement("point-legend", "Point Legend", "Earn 10,000 total points", Cat::Points, R::Legendary, 1500, When::TotalPointsAtLeast { points: 10_000 }),
    ]
};

/// Full catalog in display order.
pub fn achievement_catalog() -> &'static [AchievementDefinition] {
    &ACHIEVEMENTS
}

pub fn find_achievement(achievement_id: &str) -> Option<&'static AchievementDefinition> {
    achievement_catalog().iter().find(|a| a.id == achievement_id)
}

fn count(items: &[String]) -> u64 {
    items.len() as u64
}

impl AchievementDefinition {
    /// `(current, target)` for progress display. Awarded achievements report
    /// 1/1 once present on the record, 0/1 otherwise.
    pub fn progress(&self, character: &Character) -> (u64, u64) {
        use AchievementCondition::*;
        match self.condition {
            CareersUnlocked { required } => (count(&character.unlocked_careers), required as u64),
            AnySkillAtLeast { level } => (character.skills.highest() as u64, level as u64),
            AllSkillsAtLeast { level } => (character.skills.count_at_least(level) as u64, 5),
            QuestsCompleted { required } => (count(&character.completed_quests), required as u64),
            StreakAtLeast { days } => (character.streak as u64, days as u64),
            BattlePointsEarned => (u64::from(character.battle_points > 0), 1),
            TotalPointsAtLeast { points } => (character.total_points, points),
            Awarded => (u64::from(character.has_achievement(self.id)), 1),
        }
    }

    pub fn is_met(&self, character: &Character) -> bool {
        match self.condition {
            AchievementCondition::AllSkillsAtLeast { level } => {
                character.skills.all_at_least(level)
            }
            _ => {
                let (current, target) = self.progress(character);
                current >= target
            }
        }
    }

    pub fn is_derived(&self) -> bool {
        self.condition != AchievementCondition::Awarded
    }
}

/// Derived achievements the character qualifies for but does not yet hold.
pub fn pending_achievements(character: &Character) -> Vec<&'static str> {
    achievement_catalog()
        .iter()
        .filter(|a| a.is_derived() && !character.has_achievement(a.id) && a.is_met(character))
        .map(|a| a.id)
        .collect()
}

/// Unlock every derived achievement whose condition now holds.
/// Returns the ids newly added to the record.
pub fn sync_achievements(
    store: &mut ProgressionStore,
) -> Result<Vec<&'static str>, ProgressionError> {
    let Some(character) = store.character() else {
        return Ok(Vec::new());
    };
    let pending = pending_achievements(character);
    if pending.is_empty() {
        return Ok(pending);
    }
    let mut unlocked = Vec::with_capacity(pending.len());
    store.update("sync_achievements", |c| {
        for id in pending {
            if c.unlock_achievement(id) {
                unlocked.push(id);
            }
        }
        !unlocked.is_empty()
    })?;
    for id in &unlocked {
        info!("achievement unlocked: {}", id);
    }
    Ok(unlocked)
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct AchievementSummary {
    pub unlocked: usize,
    pub total: usize,
    pub points: u64,
    pub legendary: usize,
}

impl AchievementSummary {
    pub fn completion_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.unlocked as f64 / self.total as f64) * 100.0).round() as u32
    }
}

/// Totals over the catalog entries held by `character`. Ids on the record
/// that are not in the catalog (older releases, manual grants) are ignored.
pub fn summary(character: &Character) -> AchievementSummary {
    let held: Vec<_> = achievement_catalog()
        .iter()
        .filter(|a| character.has_achievement(a.id))
        .collect();
    AchievementSummary {
        unlocked: held.len(),
        total: achievement_catalog().len(),
        points: held.iter().map(|a| a.points).sum(),
        legendary: held
            .iter()
            .filter(|a| a.rarity == AchievementRarity::Legendary)
            .count(),
    }
}
