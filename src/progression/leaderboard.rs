//! Leaderboards: the character ranked against a fixed field of rivals in
//! three categories, plus a per-faction breakdown of each ranking.
//!
//! Rival entries are static. Nothing here reads or writes storage.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::progression::types::{Character, Faction};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardCategory {
    Level,
    Careers,
    Skills,
}

impl LeaderboardCategory {
    pub const ALL: [LeaderboardCategory; 3] = [
        LeaderboardCategory::Level,
        LeaderboardCategory::Careers,
        LeaderboardCategory::Skills,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            LeaderboardCategory::Level => "level",
            LeaderboardCategory::Careers => "careers",
            LeaderboardCategory::Skills => "skills",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LeaderboardCategory::Level => "Level & XP",
            LeaderboardCategory::Careers => "Careers Unlocked",
            LeaderboardCategory::Skills => "Total Skills",
        }
    }

    fn rivals(&self) -> &'static [Rival] {
        match self {
            LeaderboardCategory::Level => &LEVEL_RIVALS,
            LeaderboardCategory::Careers => &CAREER_RIVALS,
            LeaderboardCategory::Skills => &SKILL_RIVALS,
        }
    }

    /// The character's standing in this category.
    pub fn standing_of(&self, character: &Character) -> Standing {
        match self {
            LeaderboardCategory::Level => Standing::Level {
                level: character.level,
                experience: character.experience,
            },
            LeaderboardCategory::Careers => Standing::Careers {
                unlocked: u32::try_from(character.unlocked_careers.len()).unwrap_or(u32::MAX),
            },
            LeaderboardCategory::Skills => Standing::Skills {
                total: character.skills.total(),
            },
        }
    }
}

impl FromStr for LeaderboardCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        LeaderboardCategory::ALL
            .into_iter()
            .find(|category| category.id() == wanted)
            .ok_or_else(|| format!("unknown leaderboard category '{}'", s))
    }
}

impl fmt::Display for LeaderboardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Score within one category. Ordering compares level first and experience
/// second, so a higher standing sorts greater.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Standing {
    Level { level: u32, experience: u64 },
    Careers { unlocked: u32 },
    Skills { total: u32 },
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Standing::Level { level, experience } => {
                write!(f, "Level {} ({} XP)", level, experience)
            }
            Standing::Careers { unlocked } => write!(f, "{} careers unlocked", unlocked),
            Standing::Skills { total } => write!(f, "{} total skill points", total),
        }
    }
}

struct Rival {
    name: &'static str,
    faction: Faction,
    standing: Standing,
}

const fn level_rival(name: &'static str, faction: Faction, level: u32, experience: u64) -> Rival {
    Rival {
        name,
        faction,
        standing: Standing::Level { level, experience },
    }
}

const fn career_rival(name: &'static str, faction: Faction, unlocked: u32) -> Rival {
    Rival {
        name,
        faction,
        standing: Standing::Careers { unlocked },
    }
}

const fn skill_rival(name: &'static str, faction: Faction, total: u32) -> Rival {
    Rival {
        name,
        faction,
        standing: Standing::Skills { total },
    }
}

#[rustfmt::skip]
static LEVEL_RIVALS: [Rival; 9] = [
    level_rival("CodeMaster_Alex", Faction::TechForgers, 15, 14_250),
    level_rival("DesignWizard_Sam", Faction::CreativeArtisans, 13, 12_800),
    level_rival("TeamLeader_Jordan", Faction::SocialChampions, 12, 11_900),
    level_rival("DataNinja_Riley", Faction::KnowledgeSeekers, 11, 10_750),
    level_rival("InnovatePro_Casey", Faction::InnovationPioneers, 10, 9_850),
    level_rival("TechGuru_Morgan", Faction::TechForgers, 9, 8_900),
    level_rival("CreativeCore_Blake", Faction::CreativeArtisans, 8, 7_800),
    level_rival("SocialStar_Avery", Faction::SocialChampions, 8, 7_650),
    level_rival("LogicLord_Quinn", Faction::KnowledgeSeekers, 7, 6_900),
];

#[rustfmt::skip]
static CAREER_RIVALS: [Rival; 9] = [
    career_rival("CareerExplorer_Max", Faction::InnovationPioneers, 25),
    career_rival("PathFinder_Taylor", Faction::SocialChampions, 22),
    career_rival("JobHunter_Drew", Faction::TechForgers, 20),
    career_rival("OpportunitySeeker_Lou", Faction::CreativeArtisans, 18),
    career_rival("VocationVoyager_Sage", Faction::KnowledgeSeekers, 15),
    career_rival("ProfessionPro_River", Faction::TechForgers, 14),
    career_rival("FieldFinder_Rowan", Faction::CreativeArtisans, 12),
    career_rival("WorkWise_Phoenix", Faction::SocialChampions, 11),
    career_rival("TradeTracker_Sage", Faction::InnovationPioneers, 10),
];

#[rustfmt::skip]
static SKILL_RIVALS: [Rival; 9] = [
    skill_rival("SkillMaster_Kai", Faction::KnowledgeSeekers, 45),
    skill_rival("AbilityAce_Nova", Faction::TechForgers, 42),
    skill_rival("TalentTitan_Sage", Faction::CreativeArtisans, 40),
    skill_rival("ExpertElite_Zara", Faction::SocialChampions, 38),
    skill_rival("ProficiencyPro_Lane", Faction::InnovationPioneers, 35),
    skill_rival("MasteryMaven_Brook", Faction::TechForgers, 33),
    skill_rival("CompetenceKing_Jesse", Faction::CreativeArtisans, 31),
    skill_rival("CapabilityChamp_Sage", Faction::SocialChampions, 29),
    skill_rival("AdeptnessAce_Storm", Faction::KnowledgeSeekers, 27),
];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LeaderboardRow {
    /// 1-based position.
    pub rank: usize,
    pub name: String,
    pub faction: Faction,
    pub standing: Standing,
    pub is_player: bool,
}

/// How one faction's members placed in a ranking.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct FactionStanding {
    pub faction: Faction,
    pub members: usize,
    /// Mean rank of the members, rounded half up. `None` without members.
    pub average_rank: Option<usize>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Ranking {
    pub category: LeaderboardCategory,
    /// Best first.
    pub rows: Vec<LeaderboardRow>,
    pub player_rank: usize,
    /// One entry per playable faction, in [`Faction::PLAYABLE`] order.
    pub factions: Vec<FactionStanding>,
}

impl Ranking {
    pub fn player_row(&self) -> Option<&LeaderboardRow> {
        self.rows.iter().find(|row| row.is_player)
    }
}

/// Rank `character` against the rivals of `category`. On equal standing the
/// character places ahead of the rival.
pub fn ranking(character: &Character, category: LeaderboardCategory) -> Ranking {
    let mut entries: Vec<(String, Faction, Standing, bool)> = Vec::with_capacity(10);
    entries.push((
        character.name.clone(),
        character.faction,
        category.standing_of(character),
        true,
    ));
    entries.extend(
        category
            .rivals()
            .iter()
            .map(|rival| (rival.name.to_string(), rival.faction, rival.standing, false)),
    );
    // Stable sort keeps the character ahead of rivals it ties with.
    entries.sort_by(|a, b| b.2.cmp(&a.2));

    let rows: Vec<LeaderboardRow> = entries
        .into_iter()
        .enumerate()
        .map(|(index, (name, faction, standing, is_player))| LeaderboardRow {
            rank: index + 1,
            name,
            faction,
            standing,
            is_player,
        })
        .collect();
    let player_rank = rows
        .iter()
        .find(|row| row.is_player)
        .map(|row| row.rank)
        .unwrap_or(rows.len());
    let factions = Faction::PLAYABLE
        .into_iter()
        .map(|faction| faction_standing(&rows, faction))
        .collect();

    Ranking {
        category,
        rows,
        player_rank,
        factions,
    }
}

fn faction_standing(rows: &[LeaderboardRow], faction: Faction) -> FactionStanding {
    let ranks: Vec<usize> = rows
        .iter()
        .filter(|row| row.faction == faction)
        .map(|row| row.rank)
        .collect();
    let members = ranks.len();
    let average_rank = (members > 0).then(|| {
        let sum: usize = ranks.iter().sum();
        (2 * sum + members) / (2 * members)
    });
    FactionStanding {
        faction,
        members,
        average_rank,
    }
}
