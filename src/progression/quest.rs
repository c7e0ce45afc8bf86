/// Quest catalog and completion rewards.
///
/// A quest can be started once its skill requirements are met and completed
/// once; completion pays experience, quest points and skill boosts.
use log::info;
use serde::Serialize;

use crate::progression::achievement::{sync_achievements, LEGEND_SLAYER};
use crate::progression::career::meets_requirements;
use crate::progression::errors::ProgressionError;
use crate::progression::store::ProgressionStore;
use crate::progression::types::{Character, PointCategory, SkillName};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestCategory {
    Technical,
    Creative,
    Leadership,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestDifficulty {
    Beginner,
    Intermediate,
    Advanced,
    Legendary,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestRewards {
    pub experience: u64,
    pub points: u64,
    pub skills: &'static [(SkillName, i32)],
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: QuestCategory,
    pub difficulty: QuestDifficulty,
    pub duration_minutes: u32,
    pub requirements: &'static [(SkillName, u8)],
    pub rewards: QuestRewards,
    pub tasks: &'static [&'static str],
}

static QUESTS: [QuestDefinition; 8] = [
    QuestDefinition {
        id: "first-code",
        title: "First Lines of Code",
        description: "Complete a basic programming challenge to understand the fundamentals of digital sorcery",
        category: QuestCategory::Technical,
        difficulty: QuestDifficulty::Beginner,
        duration_minutes: 15,
        requirements: &[],
        rewards: QuestRewards {
            experience: 150,
            points: 100,
            skills: &[(SkillName::Technical, 1), (SkillName::Logic, 1)],
        },
        tasks: &[
            "Learn about variables and data types",
            "Write your first \"Hello World\" spell",
            "Complete a simple calculation challenge",
            "Debug a broken code fragment",
        ],
    },
    QuestDefinition {
        id: "design-thinking",
        title: "Creative Vision Quest",
        description: "Master the art of user-centered design through mystical exercises and creative challenges",
        category: QuestCategory::Creative,
        difficulty: QuestDifficulty::Beginner,
        duration_minutes: 30,
        requirements: &[],
        rewards: QuestRewards {
            experience: 200,
            points: 150,
            skills: &[(SkillName::Creativity, 2), (SkillName::Social, 1)],
        },
        tasks: &[
            "Channel user personas from the digital realm",
            "Map the journey of a thousand users",
            "Craft wireframes with mystical precision",
            "Present your vision to the design council",
        ],
    },
    QuestDefinition {
        id: "team-leadership",
        title: "Command the Digital Legion",
        description: "Lead virtual armies and master the art of team coordination in simulated battlefields",
        category: QuestCategory::Leadership,
        difficulty: QuestDifficulty::Intermediate,
        duration_minutes: 45,
        requirements: &[(SkillName::Social, 3), (SkillName::Leadership, 2)],
        rewards: QuestRewards {
            experience: 300,
            points: 250,
            skills: &[(SkillName::Leadership, 2), (SkillName::Social, 2)],
        },
        tasks: &[
            "Conduct a war council meeting",
            "Resolve conflicts between faction members",
            "Create battle strategies and timelines",
            "Inspire your team to victory",
        ],
    },
    QuestDefinition {
        id: "data-divination",
        title: "Data Divination Mastery",
        description: "Peer into the crystal ball of data and extract prophetic insights from digital realms",
        category: QuestCategory::Technical,
        difficulty: QuestDifficulty::Intermediate,
        duration_minutes: 60,
        requirements: &[(SkillName::Logic, 4), (SkillName::Technical, 3)],
        rewards: QuestRewards {
            experience: 400,
            points: 350,
            skills: &[(SkillName::Logic, 3), (SkillName::Technical, 2)],
        },
        tasks: &[
            "Cleanse corrupted datasets with purification spells",
            "Perform statistical divination rituals",
            "Create mystical data visualizations",
            "Present prophecies to the data council",
        ],
    },
    QuestDefinition {
        id: "startup-conquest",
        title: "Startup Empire Building",
        description: "Forge a business empire from nothing and present your vision to the investor dragons",
        category: QuestCategory::Leadership,
        difficulty: QuestDifficulty::Advanced,
        duration_minutes: 90,
        requirements: &[
            (SkillName::Creativity, 5),
            (SkillName::Leadership, 4),
            (SkillName::Social, 4),
        ],
        rewards: QuestRewards {
            experience: 600,
            points: 500,
            skills: &[
                (SkillName::Creativity, 2),
                (SkillName::Leadership, 3),
                (SkillName::Social, 2),
            ],
        },
        tasks: &[
            "Identify a problem plaguing the digital realm",
            "Craft an innovative solution with magical properties",
            "Summon financial projections from the void",
            "Face the dragon investors in epic pitch battle",
        ],
    },
    QuestDefinition {
        id: "ai-ethics-trial",
        title: "The Great AI Ethics Trial",
        description: "Navigate the treacherous waters of AI consciousness and make decisions that shape digital destiny",
        category: QuestCategory::Technical,
        difficulty: QuestDifficulty::Advanced,
        duration_minutes: 75,
        requirements: &[(SkillName::Logic, 6), (SkillName::Technical, 5), (SkillName::Social, 4)],
        rewards: QuestRewards {
            experience: 550,
            points: 450,
            skills: &[(SkillName::Logic, 3), (SkillName::Social, 2), (SkillName::Technical, 2)],
        },
        tasks: &[
            "Judge AI bias cases in the digital court",
            "Craft ethical guidelines for artificial minds",
            "Debate with AI consciousness representatives",
            "Present your verdict to the tech council",
        ],
    },
    QuestDefinition {
        id: "metaverse-creation",
        title: "Forge a Digital Universe",
        description: "Create an entire metaverse realm with its own laws of physics and digital inhabitants",
        category: QuestCategory::Creative,
        difficulty: QuestDifficulty::Legendary,
        duration_minutes: 120,
        requirements: &[
            (SkillName::Creativity, 7),
            (SkillName::Technical, 6),
            (SkillName::Leadership, 5),
        ],
        rewards: QuestRewards {
            experience: 1000,
            points: 750,
            skills: &[
                (SkillName::Creativity, 3),
                (SkillName::Technical, 3),
                (SkillName::Leadership, 2),
            ],
        },
        tasks: &[
            "Design the fundamental laws of your universe",
            "Create diverse digital ecosystems",
            "Program AI inhabitants with unique personalities",
            "Establish governance systems for your realm",
            "Launch your universe to the public",
        ],
    },
    QuestDefinition {
        id: "quantum-breakthrough",
        title: "Quantum Computing Breakthrough",
        description: "Solve impossible problems using quantum algorithms and reshape computational reality",
        category: QuestCategory::Technical,
        difficulty: QuestDifficulty::Legendary,
        duration_minutes: 100,
        requirements: &[(SkillName::Technical, 8), (SkillName::Logic, 7)],
        rewards: QuestRewards {
            experience: 900,
            points: 700,
            skills: &[(SkillName::Technical, 4), (SkillName::Logic, 3)],
        },
        tasks: &[
            "Master quantum superposition principles",
            "Design quantum algorithms for real problems",
            "Simulate quantum entanglement effects",
            "Present breakthrough to quantum council",
        ],
    },
];

pub fn quest_catalog() -> &'static [QuestDefinition] {
    &QUESTS
}

pub fn find_quest(quest_id: &str) -> Option<&'static QuestDefinition> {
    QUESTS.iter().find(|quest| quest.id == quest_id)
}

pub fn can_start_quest(character: &Character, quest: &QuestDefinition) -> bool {
    meets_requirements(character, quest.requirements) && !character.has_completed_quest(quest.id)
}

/// Quests not yet completed, in catalog order.
pub fn available_quests(character: &Character) -> Vec<&'static QuestDefinition> {
    QUESTS
        .iter()
        .filter(|quest| !character.has_completed_quest(quest.id))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestCompletionOutcome {
    pub quest_id: &'static str,
    pub experience_awarded: u64,
    pub points_awarded: u64,
    pub skill_changes: Vec<(SkillName, u8)>,
    pub achievements_unlocked: Vec<&'static str>,
}

/// Complete a catalogued quest and pay out its rewards.
///
/// `Ok(None)` when no character is loaded or the quest was already completed.
pub fn complete_quest_with_rewards(
    store: &mut ProgressionStore,
    quest_id: &str,
) -> Result<Option<QuestCompletionOutcome>, ProgressionError> {
    let quest = find_quest(quest_id)
        .ok_or_else(|| ProgressionError::NotFound(format!("quest: {}", quest_id)))?;

    let Some(character) = store.character() else {
        return Ok(None);
    };
    if character.has_completed_quest(quest.id) {
        return Ok(None);
    }
    if !meets_requirements(character, quest.requirements) {
        return Err(ProgressionError::RequirementsNotMet(format!("quest: {}", quest.id)));
    }

    let legendary = quest.difficulty == QuestDifficulty::Legendary;
    let mut slayer_unlocked = false;
    store.update("complete_quest_with_rewards", |c| {
        c.complete_quest(quest.id);
        c.add_experience(quest.rewards.experience);
        c.add_points(PointCategory::Quest, quest.rewards.points);
        for (skill, boost) in quest.rewards.skills {
            c.adjust_skill(*skill, *boost);
        }
        if legendary {
            slayer_unlocked = c.unlock_achievement(LEGEND_SLAYER);
        }
        true
    })?;

    let skill_changes = match store.character() {
        Some(c) => quest
            .rewards
            .skills
            .iter()
            .map(|(skill, _)| (*skill, c.skills.get(*skill)))
            .collect(),
        None => Vec::new(),
    };

    let mut achievements_unlocked = Vec::new();
    if slayer_unlocked {
        achievements_unlocked.push(LEGEND_SLAYER);
    }
    achievements_unlocked.extend(sync_achievements(store)?);

    info!("quest {} completed (+{} xp)", quest.title, quest.rewards.experience);
    Ok(Some(QuestCompletionOutcome {
        quest_id: quest.id,
        experience_awarded: quest.rewards.experience,
        points_awarded: quest.rewards.points,
        skill_changes,
        achievements_unlocked,
    }))
}
