//! Shareable profile export: the signed-in user plus the public part of the
//! character record, stamped with the export time.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::progression::errors::ProgressionError;
use crate::progression::types::{Character, Faction, Skills, UserSession};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProfileUser {
    pub username: String,
    pub email: String,
}

/// Character fields included in an export. Point breakdowns, badges, quests
/// and timestamps stay private.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCharacter {
    pub name: String,
    pub faction: Faction,
    pub level: u32,
    pub experience: u64,
    pub skills: Skills,
    pub total_points: u64,
    pub unlocked_careers: Vec<String>,
    pub achievements: Vec<String>,
    pub streak: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileExport {
    /// `None` when exporting without a signed-in session.
    pub user: Option<ProfileUser>,
    pub character: ProfileCharacter,
    pub export_date: DateTime<Utc>,
}

impl ProfileExport {
    pub fn new(character: &Character, session: Option<&UserSession>) -> Self {
        Self::new_at(character, session, Utc::now())
    }

    pub fn new_at(
        character: &Character,
        session: Option<&UserSession>,
        exported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user: session.map(|s| ProfileUser {
                username: s.username.clone(),
                email: s.email.clone(),
            }),
            character: ProfileCharacter {
                name: character.name.clone(),
                faction: character.faction,
                level: character.level,
                experience: character.experience,
                skills: character.skills,
                total_points: character.total_points,
                unlocked_careers: character.unlocked_careers.clone(),
                achievements: character.achievements.clone(),
                streak: character.streak,
            },
            export_date: exported_at,
        }
    }

    /// Pretty-printed JSON document.
    pub fn to_json(&self) -> Result<String, ProgressionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Suggested file name for the export.
    pub fn file_name(&self) -> String {
        format!("career-clash-profile-{}.json", self.character.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn export_keeps_public_fields_only() {
        let mut character = Character::new("Ada", Faction::TechForgers);
        character.add_experience(1500);
        character.award_badge("night-owl");
        let session = UserSession::new("ada@example.com", "ada");
        let at = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();

        let export = ProfileExport::new_at(&character, Some(&session), at);
        let value = serde_json::to_value(&export).expect("json");
        assert_eq!(value["user"]["username"], "ada");
        assert_eq!(value["character"]["level"], 2);
        assert_eq!(value["character"]["faction"], "tech-forgers");
        assert!(value["character"].get("badges").is_none());
        assert!(value["character"].get("totalPoints").is_some());
        assert_eq!(value["exportDate"], "2026-05-01T12:00:00Z");
        assert_eq!(export.file_name(), "career-clash-profile-Ada.json");
    }

    #[test]
    fn export_without_session_has_null_user() {
        let character = Character::new("Ada", Faction::SocialChampions);
        let export = ProfileExport::new(&character, None);
        let value = serde_json::to_value(&export).expect("json");
        assert!(value["user"].is_null());
    }
}
