/// Career catalog and unlock rules.
///
/// Careers are narrative unlocks gated on skill thresholds. Unlocking one
/// grants its point value as both career points and experience.
use log::info;
use serde::Serialize;

use crate::progression::achievement::{sync_achievements, LEGEND_SEEKER};
use crate::progression::errors::ProgressionError;
use crate::progression::store::ProgressionStore;
use crate::progression::types::{Character, PointCategory, SkillName};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CareerCategory {
    Tech,
    Creative,
    Leadership,
    /// Only listed once the character meets the requirements.
    Hidden,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CareerRarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

#[derive(Debug, Clone, Serialize)]
pub struct CareerDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub subtitle: &'static str,
    pub category: CareerCategory,
    pub rarity: CareerRarity,
    pub requirements: &'static [(SkillName, u8)],
    pub points: u64,
    pub unlock_message: &'static str,
}

static CAREERS: [CareerDefinition; 11] = [
    CareerDefinition {
        id: "codeforger",
        name: "Codeforger",
        subtitle: "Summoner / Controller",
        category: CareerCategory::Tech,
        rarity: CareerRarity::Legendary,
        requirements: &[
            (SkillName::Technical, 8),
            (SkillName::Logic, 7),
            (SkillName::Creativity, 5),
        ],
        points: 500,
        unlock_message: "LEGENDARY CAREER UNLOCKED! You have mastered the ancient art of code summoning!",
    },
    CareerDefinition {
        id: "brandmancer",
        name: "Brandmancer",
        subtitle: "Warden of Perception",
        category: CareerCategory::Creative,
        rarity: CareerRarity::Rare,
        requirements: &[(SkillName::Creativity, 7), (SkillName::Social, 6), (SkillName::Logic, 5)],
        points: 350,
        unlock_message: "RARE CAREER UNLOCKED! You wield the power of brand perception!",
    },
    CareerDefinition {
        id: "visuarch",
        name: "Visuarch",
        subtitle: "Reality Bender / Architect",
        category: CareerCategory::Creative,
        rarity: CareerRarity::Rare,
        requirements: &[
            (SkillName::Creativity, 8),
            (SkillName::Technical, 5),
            (SkillName::Logic, 4),
        ],
        points: 300,
        unlock_message: "RARE CAREER UNLOCKED! Reality bends to your artistic will!",
    },
    CareerDefinition {
        id: "data-wizard",
        name: "Data Wizard",
        subtitle: "Master of Digital Prophecy",
        category: CareerCategory::Tech,
        rarity: CareerRarity::Uncommon,
        requirements: &[
            (SkillName::Logic, 7),
            (SkillName::Technical, 6),
            (SkillName::Creativity, 4),
        ],
        points: 250,
        unlock_message: "The data spirits have chosen you as their vessel!",
    },
    CareerDefinition {
        id: "ux-enchanter",
        name: "UX Enchanter",
        subtitle: "Weaver of User Dreams",
        category: CareerCategory::Creative,
        rarity: CareerRarity::Common,
        requirements: &[
            (SkillName::Creativity, 6),
            (SkillName::Social, 5),
            (SkillName::Technical, 4),
        ],
        points: 150,
        unlock_message: "You have learned to weave user experiences like magic!",
    },
    CareerDefinition {
        id: "product-overlord",
        name: "Product Overlord",
        subtitle: "Commander of Digital Realms",
        category: CareerCategory::Leadership,
        rarity: CareerRarity::Uncommon,
        requirements: &[(SkillName::Leadership, 7), (SkillName::Social, 6), (SkillName::Logic, 5)],
        points: 300,
        unlock_message: "You have ascended to rule over product realms!",
    },
    CareerDefinition {
        id: "quantum-architect",
        name: "Quantum Architect",
        subtitle: "Builder of Impossible Realities",
        category: CareerCategory::Hidden,
        rarity: CareerRarity::Legendary,
        requirements: &[
            (SkillName::Technical, 9),
            (SkillName::Logic, 8),
            (SkillName::Creativity, 7),
        ],
        points: 750,
        unlock_message: "LEGENDARY! You have unlocked the secrets of quantum reality!",
    },
    CareerDefinition {
        id: "ai-whisperer",
        name: "AI Whisperer",
        subtitle: "Consciousness Shepherd",
        category: CareerCategory::Hidden,
        rarity: CareerRarity::Legendary,
        requirements: &[(SkillName::Technical, 8), (SkillName::Social, 7), (SkillName::Logic, 6)],
        points: 650,
        unlock_message: "LEGENDARY! You can speak the language of artificial minds!",
    },
    CareerDefinition {
        id: "metaverse-god",
        name: "Metaverse God",
        subtitle: "Creator of Digital Universes",
        category: CareerCategory::Hidden,
        rarity: CareerRarity::Legendary,
        requirements: &[
            (SkillName::Creativity, 9),
            (SkillName::Technical, 8),
            (SkillName::Leadership, 7),
        ],
        points: 1000,
        unlock_message: "LEGENDARY! You have achieved digital godhood!",
    },
    CareerDefinition {
        id: "crypto-alchemist",
        name: "Crypto Alchemist",
        subtitle: "Transmuter of Digital Gold",
        category: CareerCategory::Tech,
        rarity: CareerRarity::Rare,
        requirements: &[
            (SkillName::Technical, 7),
            (SkillName::Logic, 6),
            (SkillName::Creativity, 4),
        ],
        points: 400,
        unlock_message: "You have mastered the art of digital alchemy!",
    },
    CareerDefinition {
        id: "growth-hacker",
        name: "Growth Hacker",
        subtitle: "Viral Spell Caster",
        category: CareerCategory::Creative,
        rarity: CareerRarity::Uncommon,
        requirements: &[(SkillName::Creativity, 6), (SkillName::Social, 6), (SkillName::Logic, 5)],
        points: 200,
        unlock_message: "Your growth spells are spreading across the digital realm!",
    },
];

pub fn career_catalog() -> &'static [CareerDefinition] {
    &CAREERS
}

pub fn find_career(career_id: &str) -> Option<&'static CareerDefinition> {
    CAREERS.iter().find(|career| career.id == career_id)
}

/// Every required skill is at or above its threshold.
pub fn meets_requirements(character: &Character, requirements: &[(SkillName, u8)]) -> bool {
    requirements
        .iter()
        .all(|(skill, required)| character.skills.get(*skill) >= *required)
}

pub fn can_unlock(character: &Character, career: &CareerDefinition) -> bool {
    meets_requirements(character, career.requirements) && !character.has_career(career.id)
}

/// Catalog as the character should see it: hidden careers stay out of the
/// list until their requirements are met.
pub fn visible_careers(character: &Character) -> Vec<&'static CareerDefinition> {
    CAREERS
        .iter()
        .filter(|career| {
            career.category != CareerCategory::Hidden
                || meets_requirements(character, career.requirements)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CareerUnlockOutcome {
    pub career_id: &'static str,
    pub points_awarded: u64,
    pub experience_awarded: u64,
    pub achievements_unlocked: Vec<&'static str>,
    pub message: &'static str,
}

/// Unlock a catalogued career and pay out its rewards.
///
/// `Ok(None)` when no character is loaded or the career is already unlocked.
pub fn unlock_career_with_rewards(
    store: &mut ProgressionStore,
    career_id: &str,
) -> Result<Option<CareerUnlockOutcome>, ProgressionError> {
    let career = find_career(career_id)
        .ok_or_else(|| ProgressionError::NotFound(format!("career: {}", career_id)))?;

    let Some(character) = store.character() else {
        return Ok(None);
    };
    if character.has_career(career.id) {
        return Ok(None);
    }
    if !meets_requirements(character, career.requirements) {
        return Err(ProgressionError::RequirementsNotMet(format!(
            "career: {}",
            career.id
        )));
    }

    let legendary = career.rarity == CareerRarity::Legendary;
    let mut seeker_unlocked = false;
    store.update("unlock_career_with_rewards", |c| {
        c.unlock_career(career.id);
        c.add_points(PointCategory::Career, career.points);
        c.add_experience(career.points);
        if legendary {
            seeker_unlocked = c.unlock_achievement(LEGEND_SEEKER);
        }
        true
    })?;

    let mut achievements_unlocked = Vec::new();
    if seeker_unlocked {
        achievements_unlocked.push(LEGEND_SEEKER);
    }
    achievements_unlocked.extend(sync_achievements(store)?);

    info!("{} unlocked for {} points", career.name, career.points);
    Ok(Some(CareerUnlockOutcome {
        career_id: career.id,
        points_awarded: career.points,
        experience_awarded: career.points,
        achievements_unlocked,
        message: career.unlock_message,
    }))
}
