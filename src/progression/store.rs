//! The progression store: single owner of the character record.
//!
//! Every mutation runs as `current -> next` against the store's own record,
//! writes the whole record through [`ProgressionStorage`], commits it in
//! memory, then notifies subscribers. A failed write leaves the in-memory
//! record untouched so memory and storage never diverge.

use chrono::{DateTime, Local, TimeZone};
use log::{debug, info, warn};

use crate::logutil::escape_log;
use crate::progression::errors::ProgressionError;
use crate::progression::storage::ProgressionStorage;
use crate::progression::types::{Character, Faction, PointCategory, SkillName};

/// Handle returned by [`ProgressionStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&Character)>;

pub struct ProgressionStore {
    storage: ProgressionStorage,
    character: Option<Character>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl ProgressionStore {
    /// Build a store over `storage`, reading the persisted character once.
    ///
    /// A stored document that cannot be parsed at all is logged and ignored;
    /// the bytes stay on disk until the next write replaces them.
    pub fn open(storage: ProgressionStorage) -> Result<Self, ProgressionError> {
        let character = match storage.load_character() {
            Ok(character) => character,
            Err(ProgressionError::Json(e)) => {
                warn!("stored character is unreadable, starting without one: {}", e);
                None
            }
            Err(e) => return Err(e),
        };
        if let Some(ref c) = character {
            debug!(
                "loaded character {} ({}) level {}",
                c.id,
                escape_log(&c.name),
                c.level
            );
        }
        Ok(Self {
            storage,
            character,
            subscribers: Vec::new(),
            next_subscription: 0,
        })
    }

    pub fn storage(&self) -> &ProgressionStorage {
        &self.storage
    }

    /// Current record, if a character exists.
    pub fn character(&self) -> Option<&Character> {
        self.character.as_ref()
    }

    /// Owned copy for callers that outlive the borrow.
    pub fn snapshot(&self) -> Option<Character> {
        self.character.clone()
    }

    pub fn has_character(&self) -> bool {
        self.character.is_some()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&Character) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    fn notify(&self) {
        if let Some(ref character) = self.character {
            for (_, subscriber) in &self.subscribers {
                subscriber(character);
            }
        }
    }

    /// Persist `next` and make it the current record.
    fn commit(&mut self, next: Character) -> Result<(), ProgressionError> {
        self.storage.put_character(&next)?;
        self.character = Some(next);
        self.notify();
        Ok(())
    }

    /// Apply `mutate` to a copy of the current record as one write and one
    /// notification. The closure reports whether anything changed; unchanged
    /// records are not rewritten. Returns `Ok(false)` when there is no
    /// character or nothing changed. The result is normalized before it is
    /// written, so skill bounds, level and total hold whatever `mutate` did.
    pub fn update<F>(&mut self, operation: &str, mutate: F) -> Result<bool, ProgressionError>
    where
        F: FnOnce(&mut Character) -> bool,
    {
        let Some(current) = self.character.as_ref() else {
            debug!("{}: no character loaded, ignoring", operation);
            return Ok(false);
        };
        let level_before = current.level;
        let mut next = current.clone();
        if !mutate(&mut next) {
            debug!("{}: no change", operation);
            return Ok(false);
        }
        next.normalize();
        let level_after = next.level;
        let id = next.id.clone();
        self.commit(next)?;
        if level_after != level_before {
            info!("character {} reached level {}", id, level_after);
        }
        debug!("{}: applied", operation);
        Ok(true)
    }

    /// Start a fresh character, replacing any existing record. Only playable
    /// factions are accepted.
    pub fn create(&mut self, name: &str, faction: Faction) -> Result<&Character, ProgressionError> {
        if !faction.is_playable() {
            return Err(ProgressionError::InvalidInput(format!(
                "faction {} cannot be chosen",
                faction.id()
            )));
        }
        let character = Character::new(name, faction);
        info!(
            "created character {} ({}) in {}",
            character.id,
            escape_log(name),
            faction.id()
        );
        self.commit(character)?;
        self.character
            .as_ref()
            .ok_or_else(|| ProgressionError::NotFound("character".to_string()))
    }

    pub fn adjust_skill(&mut self, skill: SkillName, delta: i32) -> Result<bool, ProgressionError> {
        self.update("adjust_skill", |c| c.adjust_skill(skill, delta))
    }

    pub fn add_experience(&mut self, amount: u64) -> Result<bool, ProgressionError> {
        self.update("add_experience", |c| {
            c.add_experience(amount);
            true
        })
    }

    pub fn add_points(
        &mut self,
        category: PointCategory,
        amount: u64,
    ) -> Result<bool, ProgressionError> {
        self.update("add_points", |c| {
            c.add_points(category, amount);
            true
        })
    }

    pub fn unlock_career(&mut self, career_id: &str) -> Result<bool, ProgressionError> {
        let unlocked = self.update("unlock_career", |c| c.unlock_career(career_id))?;
        if unlocked {
            info!("career unlocked: {}", escape_log(career_id));
        }
        Ok(unlocked)
    }

    pub fn award_badge(&mut self, badge_id: &str) -> Result<bool, ProgressionError> {
        self.update("award_badge", |c| c.award_badge(badge_id))
    }

    pub fn complete_quest(&mut self, quest_id: &str) -> Result<bool, ProgressionError> {
        let completed = self.update("complete_quest", |c| c.complete_quest(quest_id))?;
        if completed {
            info!("quest completed: {}", escape_log(quest_id));
        }
        Ok(completed)
    }

    pub fn unlock_achievement(&mut self, achievement_id: &str) -> Result<bool, ProgressionError> {
        let unlocked = self.update("unlock_achievement", |c| c.unlock_achievement(achievement_id))?;
        if unlocked {
            info!("achievement unlocked: {}", escape_log(achievement_id));
        }
        Ok(unlocked)
    }

    /// Record activity now, in the machine's local timezone.
    pub fn update_streak(&mut self) -> Result<bool, ProgressionError> {
        self.update_streak_at(&Local::now())
    }

    pub fn update_streak_at<Tz: TimeZone>(
        &mut self,
        now: &DateTime<Tz>,
    ) -> Result<bool, ProgressionError> {
        self.update("update_streak", |c| {
            c.record_activity(now);
            true
        })
    }

    /// Logout: drop the record from memory and storage.
    pub fn clear(&mut self) -> Result<(), ProgressionError> {
        self.storage.remove_character()?;
        if let Some(character) = self.character.take() {
            info!("cleared character {}", character.id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::storage::ProgressionStorageBuilder;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> ProgressionStore {
        let storage = ProgressionStorageBuilder::new(dir.path()).open().expect("storage");
        ProgressionStore::open(storage).expect("store")
    }

    #[test]
    fn mutations_without_character_are_silent_noops() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = open_store(&dir);
        assert!(!store.adjust_skill(SkillName::Logic, 3).expect("skill"));
        assert!(!store.add_experience(100).expect("xp"));
        assert!(!store.add_points(PointCategory::Quest, 10).expect("points"));
        assert!(!store.unlock_career("codeforger").expect("career"));
        assert!(!store.update_streak().expect("streak"));
        assert!(store.character().is_none());
        assert!(store.storage().load_character().expect("load").is_none());
    }

    #[test]
    fn every_mutation_is_mirrored_to_storage() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = open_store(&dir);
        store.create("Ada", Faction::TechForgers).expect("create");
        store.adjust_skill(SkillName::Technical, 3).expect("skill");
        store.add_experience(1200).expect("xp");
        store.add_points(PointCategory::Career, 40).expect("points");
        store.award_badge("pioneer").expect("badge");

        let persisted = store.storage().load_character().expect("load").expect("present");
        assert_eq!(Some(&persisted), store.character());
        assert_eq!(persisted.skills.technical, 4);
        assert_eq!(persisted.level, 2);
        assert_eq!(persisted.total_points, 40);
    }

    #[test]
    fn duplicate_unlock_does_not_rewrite_or_notify() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = open_store(&dir);
        store.create("Ada", Faction::TechForgers).expect("create");
        let seen = Rc::new(RefCell::new(0usize));
        let counter = Rc::clone(&seen);
        store.subscribe(move |_| *counter.borrow_mut() += 1);

        assert!(store.complete_quest("first-code").expect("first"));
        assert!(!store.complete_quest("first-code").expect("second"));
        assert_eq!(*seen.borrow(), 1);
        assert_eq!(store.character().expect("character").completed_quests.len(), 1);
    }

    #[test]
    fn unsubscribed_callbacks_stop_receiving() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = open_store(&dir);
        store.create("Ada", Faction::TechForgers).expect("create");
        let levels = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&levels);
        let id = store.subscribe(move |c| sink.borrow_mut().push(c.level));

        store.add_experience(1000).expect("xp");
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.add_experience(1000).expect("xp");
        assert_eq!(*levels.borrow(), vec![2]);
    }

    #[test]
    fn create_rejects_neutral_faction() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = open_store(&dir);
        assert!(matches!(
            store.create("Ada", Faction::Neutral),
            Err(ProgressionError::InvalidInput(_))
        ));
        assert!(!store.has_character());
        assert!(store.storage().load_character().expect("load").is_none());
    }

    #[test]
    fn update_writes_several_changes_once() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = open_store(&dir);
        store.create("Ada", Faction::TechForgers).expect("create");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |c| sink.borrow_mut().push((c.experience, c.quest_points)));

        let changed = store
            .update("bundle", |c| {
                c.add_experience(300);
                c.add_points(PointCategory::Quest, 75);
                true
            })
            .expect("update");
        assert!(changed);
        assert_eq!(*seen.borrow(), vec![(300, 75)]);
        assert!(!store.update("nothing", |_| false).expect("noop"));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn update_normalizes_direct_edits() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = open_store(&dir);
        store.create("Ada", Faction::TechForgers).expect("create");
        store
            .update("raw edit", |c| {
                c.skills.logic = 50;
                c.experience = 2000;
                c.battle_points = 9;
                true
            })
            .expect("update");
        let c = store.character().expect("character");
        assert_eq!(c.skills.logic, 10);
        assert_eq!(c.level, 3);
        assert_eq!(c.total_points, 9);
    }

    #[test]
    fn clear_forgets_character_everywhere() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = open_store(&dir);
        store.create("Ada", Faction::TechForgers).expect("create");
        store.clear().expect("clear");
        assert!(!store.has_character());
        drop(store);
        let store = open_store(&dir);
        assert!(!store.has_character());
    }

    #[test]
    fn unreadable_document_starts_empty_without_erasing() {
        let dir = TempDir::new().expect("tempdir");
        let storage = ProgressionStorageBuilder::new(dir.path()).open().expect("storage");
        storage.put_raw_character("{broken").expect("plant");
        let store = ProgressionStore::open(storage).expect("store");
        assert!(!store.has_character());
        assert_eq!(
            store.storage().raw_character().expect("raw").as_deref(),
            Some("{broken")
        );
    }
}
