//! Reward rules for the interactive activities: skill tree training, battle
//! arena results, mini-game scores and the personality assessment.
//!
//! Content for those activities (questions, opponents, puzzles) lives outside
//! this crate; callers pass in the decided outcome and these functions turn it
//! into store mutations.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::progression::achievement::{sync_achievements, GIANT_SLAYER};
use crate::progression::errors::ProgressionError;
use crate::progression::store::ProgressionStore;
use crate::progression::types::{PointCategory, SkillName, MAX_SKILL_LEVEL};

/// Points per skill-tree level step. Experience granted is twice this.
pub fn points_per_level(skill: SkillName) -> u64 {
    match skill {
        SkillName::Logic | SkillName::Creativity => 25,
        SkillName::Leadership | SkillName::Technical => 30,
        SkillName::Social => 20,
    }
}

pub fn skill_title(level: u8) -> &'static str {
    match level {
        10..=u8::MAX => "Grandmaster",
        8..=9 => "Master",
        5..=7 => "Expert",
        3..=4 => "Adept",
        _ => "Novice",
    }
}

/// Changes applied by one reward rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewardOutcome {
    pub experience: u64,
    pub points: u64,
    pub category: Option<PointCategory>,
    pub skill_changes: Vec<(SkillName, u8)>,
    pub achievements_unlocked: Vec<&'static str>,
}

/// Spend a skill-tree upgrade. `Ok(None)` without a character or when the
/// skill is already maxed.
pub fn train_skill(
    store: &mut ProgressionStore,
    skill: SkillName,
) -> Result<Option<RewardOutcome>, ProgressionError> {
    let Some(character) = store.character() else {
        return Ok(None);
    };
    if character.skills.get(skill) >= MAX_SKILL_LEVEL {
        return Ok(None);
    }
    let points = points_per_level(skill);

    store.update("train_skill", |c| {
        c.adjust_skill(skill, 1);
        c.add_experience(points * 2);
        c.add_points(PointCategory::Skill, points);
        true
    })?;

    Ok(Some(RewardOutcome {
        experience: points * 2,
        points,
        category: Some(PointCategory::Skill),
        skill_changes: current_levels(store, &[skill]),
        achievements_unlocked: sync_achievements(store)?,
    }))
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BattleDifficulty {
    Easy,
    Medium,
    Hard,
}

impl BattleDifficulty {
    pub fn base_points(&self) -> u64 {
        match self {
            BattleDifficulty::Easy => 100,
            BattleDifficulty::Medium => 200,
            BattleDifficulty::Hard => 300,
        }
    }
}

impl FromStr for BattleDifficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(BattleDifficulty::Easy),
            "medium" => Ok(BattleDifficulty::Medium),
            "hard" => Ok(BattleDifficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleOutcome {
    pub difficulty: BattleDifficulty,
    pub user_score: u64,
    pub opponent_score: u64,
}

impl BattleOutcome {
    /// Ties go to the opponent.
    pub fn won(&self) -> bool {
        self.user_score > self.opponent_score
    }
}

/// Pay out a finished battle. A win earns `base + score` battle points and
/// `base` experience; a loss earns half the score and half the base.
pub fn record_battle(
    store: &mut ProgressionStore,
    outcome: BattleOutcome,
) -> Result<Option<RewardOutcome>, ProgressionError> {
    if !store.has_character() {
        return Ok(None);
    }
    let base = outcome.difficulty.base_points();
    let (points, experience) = if outcome.won() {
        (base.saturating_add(outcome.user_score), base)
    } else {
        (outcome.user_score / 2, base / 2)
    };
    let giant_slain = outcome.won() && outcome.difficulty == BattleDifficulty::Hard;

    let mut achievements_unlocked = Vec::new();
    let mut slayer_unlocked = false;
    store.update("record_battle", |c| {
        c.add_points(PointCategory::Battle, points);
        c.add_experience(experience);
        if giant_slain {
            slayer_unlocked = c.unlock_achievement(GIANT_SLAYER);
        }
        true
    })?;
    if slayer_unlocked {
        achievements_unlocked.push(GIANT_SLAYER);
    }
    achievements_unlocked.extend(sync_achievements(store)?);

    Ok(Some(RewardOutcome {
        experience,
        points,
        category: Some(PointCategory::Battle),
        skill_changes: Vec::new(),
        achievements_unlocked,
    }))
}

/// Pay out a mini-game score for the game's skill: one level per 20 points
/// (clamped), twice the score as experience, the score as skill points.
pub fn record_minigame(
    store: &mut ProgressionStore,
    skill: SkillName,
    score: u64,
) -> Result<Option<RewardOutcome>, ProgressionError> {
    if !store.has_character() {
        return Ok(None);
    }
    let levels = i32::try_from(score / 20).unwrap_or(i32::MAX);
    let experience = score.saturating_mul(2);

    store.update("record_minigame", |c| {
        c.adjust_skill(skill, levels);
        c.add_experience(experience);
        c.add_points(PointCategory::Skill, score);
        true
    })?;

    Ok(Some(RewardOutcome {
        experience,
        points: score,
        category: Some(PointCategory::Skill),
        skill_changes: current_levels(store, &[skill]),
        achievements_unlocked: sync_achievements(store)?,
    }))
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PersonalityType {
    Analytical,
    Creative,
    Social,
    Practical,
    Leadership,
}

impl PersonalityType {
    pub fn skill_boosts(&self) -> &'static [(SkillName, i32)] {
        match self {
            PersonalityType::Analytical => &[(SkillName::Logic, 2), (SkillName::Technical, 1)],
            PersonalityType::Creative => &[(SkillName::Creativity, 2), (SkillName::Social, 1)],
            PersonalityType::Social => &[(SkillName::Social, 2), (SkillName::Leadership, 1)],
            PersonalityType::Practical => &[
                (SkillName::Technical, 1),
                (SkillName::Leadership, 1),
                (SkillName::Logic, 1),
            ],
            PersonalityType::Leadership => &[(SkillName::Leadership, 2), (SkillName::Social, 1)],
        }
    }
}

impl FromStr for PersonalityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "analytical" => Ok(PersonalityType::Analytical),
            "creative" => Ok(PersonalityType::Creative),
            "social" => Ok(PersonalityType::Social),
            "practical" => Ok(PersonalityType::Practical),
            "leadership" => Ok(PersonalityType::Leadership),
            other => Err(format!("unknown personality type '{}'", other)),
        }
    }
}

pub const PERSONALITY_EXPERIENCE: u64 = 500;
pub const PERSONALITY_POINTS: u64 = 200;

/// Apply the boosts for an assessment result plus the flat completion reward.
pub fn apply_personality_result(
    store: &mut ProgressionStore,
    personality: PersonalityType,
) -> Result<Option<RewardOutcome>, ProgressionError> {
    if !store.has_character() {
        return Ok(None);
    }
    let boosts = personality.skill_boosts();
    store.update("apply_personality_result", |c| {
        for (skill, boost) in boosts {
            c.adjust_skill(*skill, *boost);
        }
        c.add_experience(PERSONALITY_EXPERIENCE);
        c.add_points(PointCategory::Skill, PERSONALITY_POINTS);
        true
    })?;

    let skills: Vec<_> = boosts.iter().map(|(skill, _)| *skill).collect();
    Ok(Some(RewardOutcome {
        experience: PERSONALITY_EXPERIENCE,
        points: PERSONALITY_POINTS,
        category: Some(PointCategory::Skill),
        skill_changes: current_levels(store, &skills),
        achievements_unlocked: sync_achievements(store)?,
    }))
}

fn current_levels(store: &ProgressionStore, skills: &[SkillName]) -> Vec<(SkillName, u8)> {
    store
        .character()
        .map(|c| skills.iter().map(|s| (*s, c.skills.get(*s))).collect())
        .unwrap_or_default()
}
