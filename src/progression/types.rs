use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Experience required per level step.
pub const EXPERIENCE_PER_LEVEL: u64 = 1000;
pub const MIN_SKILL_LEVEL: u8 = 0;
pub const MAX_SKILL_LEVEL: u8 = 10;
pub const STARTING_SKILL_LEVEL: u8 = 1;
pub const UNKNOWN_CHARACTER_NAME: &str = "Unknown";

/// Level derived from total experience: `floor(experience / 1000) + 1`.
pub fn level_for_experience(experience: u64) -> u32 {
    u32::try_from(experience / EXPERIENCE_PER_LEVEL)
        .unwrap_or(u32::MAX - 1)
        .saturating_add(1)
}

pub(crate) fn new_record_id() -> String {
    Uuid::new_v4().simple().to_string()
}

// ============================================================================
// Factions
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Faction {
    TechForgers,
    CreativeArtisans,
    SocialChampions,
    KnowledgeSeekers,
    InnovationPioneers,
    /// Only produced when a stored record is missing its faction.
    #[default]
    Neutral,
}

impl Faction {
    /// Factions offered at character creation.
    pub const PLAYABLE: [Faction; 5] = [
        Faction::TechForgers,
        Faction::CreativeArtisans,
        Faction::SocialChampions,
        Faction::KnowledgeSeekers,
        Faction::InnovationPioneers,
    ];

    pub fn is_playable(&self) -> bool {
        Faction::PLAYABLE.contains(self)
    }

    pub fn id(&self) -> &'static str {
        match self {
            Faction::TechForgers => "tech-forgers",
            Faction::CreativeArtisans => "creative-artisans",
            Faction::SocialChampions => "social-champions",
            Faction::KnowledgeSeekers => "knowledge-seekers",
            Faction::InnovationPioneers => "innovation-pioneers",
            Faction::Neutral => "neutral",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Faction::TechForgers => "Tech Forgers",
            Faction::CreativeArtisans => "Creative Artisans",
            Faction::SocialChampions => "Social Champions",
            Faction::KnowledgeSeekers => "Knowledge Seekers",
            Faction::InnovationPioneers => "Innovation Pioneers",
            Faction::Neutral => "Neutral",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Faction::TechForgers => "Masters of code and digital innovation",
            Faction::CreativeArtisans => "Wielders of imagination and artistic vision",
            Faction::SocialChampions => "Leaders who inspire and connect communities",
            Faction::KnowledgeSeekers => "Scholars who unlock the mysteries of learning",
            Faction::InnovationPioneers => "Entrepreneurs who forge new paths",
            Faction::Neutral => "Unaligned",
        }
    }
}

impl FromStr for Faction {
    type Err = String;

    /// Accepts a playable faction's id (`tech-forgers`) or display name,
    /// case-insensitively. `neutral` is never parsed; it only appears as the
    /// load default for records without a usable faction.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Faction::PLAYABLE
            .into_iter()
            .find(|f| f.id() == wanted || f.display_name().to_ascii_lowercase() == wanted)
            .ok_or_else(|| {
                let choices: Vec<&str> = Faction::PLAYABLE.iter().map(|f| f.id()).collect();
                format!("unknown faction '{}' (expected one of {})", s, choices.join(", "))
            })
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Skills
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SkillName {
    Logic,
    Creativity,
    Leadership,
    Technical,
    Social,
}

impl SkillName {
    pub const ALL: [SkillName; 5] = [
        SkillName::Logic,
        SkillName::Creativity,
        SkillName::Leadership,
        SkillName::Technical,
        SkillName::Social,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            SkillName::Logic => "logic",
            SkillName::Creativity => "creativity",
            SkillName::Leadership => "leadership",
            SkillName::Technical => "technical",
            SkillName::Social => "social",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SkillName::Logic => "Logic",
            SkillName::Creativity => "Creativity",
            SkillName::Leadership => "Leadership",
            SkillName::Technical => "Technical",
            SkillName::Social => "Social",
        }
    }
}

impl FromStr for SkillName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SkillName::ALL
            .into_iter()
            .find(|skill| skill.id() == wanted)
            .ok_or_else(|| format!("unknown skill '{}'", s))
    }
}

impl fmt::Display for SkillName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

fn clamp_skill(value: i64) -> u8 {
    value.clamp(MIN_SKILL_LEVEL as i64, MAX_SKILL_LEVEL as i64) as u8
}

fn starting_skill() -> u8 {
    STARTING_SKILL_LEVEL
}

/// Integer view of a stored number: floats truncate, numeric strings parse.
fn number_from(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|v| i64::try_from(v).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f as i64),
        _ => None,
    }
}

fn lenient_skill<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(number_from(&raw).map(clamp_skill).unwrap_or(STARTING_SKILL_LEVEL))
}

/// The five fixed skill gauges, each held in `[0, 10]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Skills {
    #[serde(default = "starting_skill", deserialize_with = "lenient_skill")]
    pub logic: u8,
    #[serde(default = "starting_skill", deserialize_with = "lenient_skill")]
    pub creativity: u8,
    #[serde(default = "starting_skill", deserialize_with = "lenient_skill")]
    pub leadership: u8,
    #[serde(default = "starting_skill", deserialize_with = "lenient_skill")]
    pub technical: u8,
    #[serde(default = "starting_skill", deserialize_with = "lenient_skill")]
    pub social: u8,
}

impl Default for Skills {
    fn default() -> Self {
        Self {
            logic: STARTING_SKILL_LEVEL,
            creativity: STARTING_SKILL_LEVEL,
            leadership: STARTING_SKILL_LEVEL,
            technical: STARTING_SKILL_LEVEL,
            social: STARTING_SKILL_LEVEL,
        }
    }
}

impl Skills {
    pub fn get(&self, skill: SkillName) -> u8 {
        match skill {
            SkillName::Logic => self.logic,
            SkillName::Creativity => self.creativity,
            SkillName::Leadership => self.leadership,
            SkillName::Technical => self.technical,
            SkillName::Social => self.social,
        }
    }

    fn slot_mut(&mut self, skill: SkillName) -> &mut u8 {
        match skill {
            SkillName::Logic => &mut self.logic,
            SkillName::Creativity => &mut self.creativity,
            SkillName::Leadership => &mut self.leadership,
            SkillName::Technical => &mut self.technical,
            SkillName::Social => &mut self.social,
        }
    }

    /// Saturating adjustment; returns the new level.
    pub fn adjust(&mut self, skill: SkillName, delta: i32) -> u8 {
        let slot = self.slot_mut(skill);
        *slot = clamp_skill(*slot as i64 + delta as i64);
        *slot
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkillName, u8)> + '_ {
        SkillName::ALL.into_iter().map(move |skill| (skill, self.get(skill)))
    }

    pub fn total(&self) -> u32 {
        self.iter().map(|(_, level)| level as u32).sum()
    }

    pub fn highest(&self) -> u8 {
        self.iter().map(|(_, level)| level).max().unwrap_or(0)
    }

    pub fn all_at_least(&self, threshold: u8) -> bool {
        self.iter().all(|(_, level)| level >= threshold)
    }

    pub fn count_at_least(&self, threshold: u8) -> usize {
        self.iter().filter(|(_, level)| *level >= threshold).count()
    }

    fn clamp_all(&mut self) {
        for skill in SkillName::ALL {
            let slot = self.slot_mut(skill);
            *slot = clamp_skill(*slot as i64);
        }
    }
}

// ============================================================================
// Points
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PointCategory {
    Skill,
    Career,
    Quest,
    Battle,
}

impl PointCategory {
    pub const ALL: [PointCategory; 4] = [
        PointCategory::Skill,
        PointCategory::Career,
        PointCategory::Quest,
        PointCategory::Battle,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            PointCategory::Skill => "skill",
            PointCategory::Career => "career",
            PointCategory::Quest => "quest",
            PointCategory::Battle => "battle",
        }
    }
}

impl FromStr for PointCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PointCategory::ALL
            .into_iter()
            .find(|category| category.id() == wanted)
            .ok_or_else(|| format!("unknown point category '{}'", s))
    }
}

impl fmt::Display for PointCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ============================================================================
// Character record
// ============================================================================

// Stored documents may come from older builds or be hand-edited. Each field
// reads as a raw JSON value and falls back to its default when the value is
// missing, null or of the wrong type, so one bad field never costs the record.

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_default())
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(number_from(&raw).and_then(|n| u64::try_from(n).ok()).unwrap_or(0))
}

fn lenient_streak<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(number_from(&raw).and_then(|n| u32::try_from(n).ok()).unwrap_or(0))
}

/// String entries only; anything else in the list is dropped.
fn lenient_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(id) => Some(id),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn non_empty_string(raw: Value) -> Option<String> {
    match raw {
        Value::String(text) if !text.is_empty() => Some(text),
        _ => None,
    }
}

fn id_or_generated<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_empty_string(Value::deserialize(deserializer)?).unwrap_or_else(new_record_id))
}

fn unknown_name() -> String {
    UNKNOWN_CHARACTER_NAME.to_string()
}

fn name_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_empty_string(Value::deserialize(deserializer)?).unwrap_or_else(unknown_name))
}

fn lenient_faction<'de, D>(deserializer: D) -> Result<Faction, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_empty_string(Value::deserialize(deserializer)?)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default())
}

fn starting_level() -> u32 {
    1
}

fn timestamp_or_now<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_empty_string(Value::deserialize(deserializer)?)
        .and_then(|text| DateTime::parse_from_rfc3339(&text).ok())
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or_else(Utc::now))
}

/// The single persistent progression record for a user.
///
/// Field names serialize in camelCase so stored documents keep the layout
/// `{id, name, faction, level, experience, skillPoints, ...}`. Every field is
/// optional on load; [`Character::normalize`] re-establishes the derived values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    #[serde(default = "new_record_id", deserialize_with = "id_or_generated")]
    pub id: String,
    #[serde(default = "unknown_name", deserialize_with = "name_or_unknown")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_faction")]
    pub faction: Faction,
    /// Derived from `experience`; whatever was stored is replaced on load.
    #[serde(default = "starting_level", deserialize_with = "lenient")]
    pub level: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub experience: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub skill_points: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub career_points: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub quest_points: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub battle_points: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_points: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub skills: Skills,
    #[serde(default, deserialize_with = "lenient_ids")]
    pub unlocked_careers: Vec<String>,
    #[serde(default, deserialize_with = "lenient_ids")]
    pub badges: Vec<String>,
    #[serde(default, deserialize_with = "lenient_ids")]
    pub completed_quests: Vec<String>,
    #[serde(default, deserialize_with = "lenient_ids")]
    pub achievements: Vec<String>,
    #[serde(default, deserialize_with = "lenient_streak")]
    pub streak: u32,
    #[serde(default = "Utc::now", deserialize_with = "timestamp_or_now")]
    pub last_active: DateTime<Utc>,
}

/// Add-if-absent; returns whether the list changed.
fn insert_unique(list: &mut Vec<String>, id: &str) -> bool {
    if list.iter().any(|existing| existing == id) {
        return false;
    }
    list.push(id.to_string());
    true
}

fn dedup_in_order(list: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    list.retain(|id| seen.insert(id.clone()));
}

impl Character {
    pub fn new(name: &str, faction: Faction) -> Self {
        Self::new_at(name, faction, Utc::now())
    }

    pub fn new_at(name: &str, faction: Faction, now: DateTime<Utc>) -> Self {
        Self {
            id: new_record_id(),
            name: name.to_string(),
            faction,
            level: 1,
            experience: 0,
            skill_points: 0,
            career_points: 0,
            quest_points: 0,
            battle_points: 0,
            total_points: 0,
            skills: Skills::default(),
            unlocked_careers: Vec::new(),
            badges: Vec::new(),
            completed_quests: Vec::new(),
            achievements: Vec::new(),
            streak: 0,
            last_active: now,
        }
    }

    pub fn points(&self, category: PointCategory) -> u64 {
        match category {
            PointCategory::Skill => self.skill_points,
            PointCategory::Career => self.career_points,
            PointCategory::Quest => self.quest_points,
            PointCategory::Battle => self.battle_points,
        }
    }

    fn points_mut(&mut self, category: PointCategory) -> &mut u64 {
        match category {
            PointCategory::Skill => &mut self.skill_points,
            PointCategory::Career => &mut self.career_points,
            PointCategory::Quest => &mut self.quest_points,
            PointCategory::Battle => &mut self.battle_points,
        }
    }

    fn recompute_total(&mut self) {
        self.total_points = PointCategory::ALL
            .into_iter()
            .fold(0u64, |sum, category| sum.saturating_add(self.points(category)));
    }

    /// Returns whether the skill level actually moved.
    pub fn adjust_skill(&mut self, skill: SkillName, delta: i32) -> bool {
        let before = self.skills.get(skill);
        before != self.skills.adjust(skill, delta)
    }

    pub fn add_experience(&mut self, amount: u64) {
        self.experience = self.experience.saturating_add(amount);
        self.level = level_for_experience(self.experience);
    }

    /// Counter and total move together against this same record.
    pub fn add_points(&mut self, category: PointCategory, amount: u64) {
        let slot = self.points_mut(category);
        *slot = slot.saturating_add(amount);
        self.recompute_total();
    }

    pub fn unlock_career(&mut self, career_id: &str) -> bool {
        insert_unique(&mut self.unlocked_careers, career_id)
    }

    pub fn award_badge(&mut self, badge_id: &str) -> bool {
        insert_unique(&mut self.badges, badge_id)
    }

    pub fn complete_quest(&mut self, quest_id: &str) -> bool {
        insert_unique(&mut self.completed_quests, quest_id)
    }

    pub fn unlock_achievement(&mut self, achievement_id: &str) -> bool {
        insert_unique(&mut self.achievements, achievement_id)
    }

    pub fn has_career(&self, career_id: &str) -> bool {
        self.unlocked_careers.iter().any(|id| id == career_id)
    }

    pub fn has_completed_quest(&self, quest_id: &str) -> bool {
        self.completed_quests.iter().any(|id| id == quest_id)
    }

    pub fn has_achievement(&self, achievement_id: &str) -> bool {
        self.achievements.iter().any(|id| id == achievement_id)
    }

    /// Streak bookkeeping at calendar-day granularity in `now`'s timezone.
    ///
    /// Last active yesterday extends the streak, last active today leaves it
    /// alone, anything else starts over at 1. `last_active` always moves to `now`.
    pub fn record_activity<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) {
        let today = now.date_naive();
        let last_day = self.last_active.with_timezone(&now.timezone()).date_naive();
        if today.pred_opt() == Some(last_day) {
            self.streak = self.streak.saturating_add(1);
        } else if last_day != today {
            self.streak = 1;
        }
        self.last_active = now.with_timezone(&Utc);
    }

    /// Re-establish every invariant on a record of uncertain provenance.
    pub fn normalize(&mut self) {
        self.skills.clamp_all();
        self.level = level_for_experience(self.experience);
        self.recompute_total();
        dedup_in_order(&mut self.unlocked_careers);
        dedup_in_order(&mut self.badges);
        dedup_in_order(&mut self.completed_quests);
        dedup_in_order(&mut self.achievements);
    }
}

// ============================================================================
// User session
// ============================================================================

/// The signed-in user, stored next to the character record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    #[serde(default = "new_record_id", deserialize_with = "id_or_generated")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient")]
    pub username: String,
    #[serde(default, deserialize_with = "lenient")]
    pub has_character: bool,
}

impl UserSession {
    pub fn new(email: &str, username: &str) -> Self {
        Self {
            id: new_record_id(),
            email: email.to_string(),
            username: username.to_string(),
            has_character: false,
        }
    }
}
