use std::path::{Path, PathBuf};

use log::warn;
use sled::IVec;

use crate::progression::errors::ProgressionError;
use crate::progression::types::{Character, UserSession};

const TREE_PRIMARY: &str = "careerclash";

/// Key holding the `{id, email, username, hasCharacter}` session document.
pub const SESSION_KEY: &str = "careerClashUser";
/// Key holding the full character document.
pub const CHARACTER_KEY: &str = "careerClashCharacter";

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct ProgressionStorageBuilder {
    path: PathBuf,
    flush_every_write: bool,
}

impl ProgressionStorageBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            flush_every_write: true,
        }
    }

    /// Leave durability to sled's background flusher (bulk tests, imports).
    pub fn without_flush(mut self) -> Self {
        self.flush_every_write = false;
        self
    }

    pub fn flush_every_write(mut self, enabled: bool) -> Self {
        self.flush_every_write = enabled;
        self
    }

    pub fn open(self) -> Result<ProgressionStorage, ProgressionError> {
        ProgressionStorage::open_with_options(self.path, self.flush_every_write)
    }
}

/// Sled-backed mirror of the session and character records.
///
/// Holds exactly two keys, each a whole JSON document. Cloning is cheap and
/// every clone addresses the same database.
#[derive(Clone)]
pub struct ProgressionStorage {
    _db: sled::Db,
    primary: sled::Tree,
    flush_every_write: bool,
}

impl ProgressionStorage {
    /// Open (or create) the progression database rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ProgressionError> {
        Self::open_with_options(path, true)
    }

    fn open_with_options<P: AsRef<Path>>(
        path: P,
        flush_every_write: bool,
    ) -> Result<Self, ProgressionError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let primary = db.open_tree(TREE_PRIMARY)?;
        Ok(Self {
            _db: db,
            primary,
            flush_every_write,
        })
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, ProgressionError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T, ProgressionError> {
        Ok(serde_json::from_slice::<T>(&bytes)?)
    }

    fn write(&self, key: &str, bytes: Vec<u8>) -> Result<(), ProgressionError> {
        self.primary.insert(key.as_bytes(), bytes)?;
        if self.flush_every_write {
            self.primary.flush()?;
        }
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, ProgressionError> {
        let existed = self.primary.remove(key.as_bytes())?.is_some();
        if self.flush_every_write {
            self.primary.flush()?;
        }
        Ok(existed)
    }

    /// Overwrite the stored character with `character`.
    pub fn put_character(&self, character: &Character) -> Result<(), ProgressionError> {
        let bytes = Self::serialize(character)?;
        self.write(CHARACTER_KEY, bytes)
    }

    /// Read the stored character, defaulting absent fields and repairing
    /// derived values. `Ok(None)` when no character has been created.
    pub fn load_character(&self) -> Result<Option<Character>, ProgressionError> {
        let Some(bytes) = self.primary.get(CHARACTER_KEY)? else {
            return Ok(None);
        };
        let mut character: Character = Self::deserialize(bytes)?;
        character.normalize();
        Ok(Some(character))
    }

    pub fn remove_character(&self) -> Result<bool, ProgressionError> {
        self.delete(CHARACTER_KEY)
    }

    pub fn put_session(&self, session: &UserSession) -> Result<(), ProgressionError> {
        let bytes = Self::serialize(session)?;
        self.write(SESSION_KEY, bytes)
    }

    pub fn load_session(&self) -> Result<Option<UserSession>, ProgressionError> {
        let Some(bytes) = self.primary.get(SESSION_KEY)? else {
            return Ok(None);
        };
        Ok(Some(Self::deserialize(bytes)?))
    }

    pub fn remove_session(&self) -> Result<bool, ProgressionError> {
        self.delete(SESSION_KEY)
    }

    /// Remove both records (logout).
    pub fn clear(&self) -> Result<(), ProgressionError> {
        let had_session = self.remove_session()?;
        let had_character = self.remove_character()?;
        if !had_session && !had_character {
            warn!("clear requested on empty progression storage");
        }
        Ok(())
    }

    /// Raw JSON text of the stored character, for export and diagnostics.
    pub fn raw_character(&self) -> Result<Option<String>, ProgressionError> {
        Ok(self
            .primary
            .get(CHARACTER_KEY)?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Replace the stored character document verbatim. Used by imports and by
    /// tests that need to plant legacy or partial documents.
    pub fn put_raw_character(&self, json: &str) -> Result<(), ProgressionError> {
        self.write(CHARACTER_KEY, json.as_bytes().to_vec())
    }
}
