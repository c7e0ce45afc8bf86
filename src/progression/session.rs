//! Local account session: who is signed in and whether they have finished
//! character creation. There is no credential check; the session is a
//! client-side record stored next to the character.

use log::{debug, info};

use crate::logutil::escape_log;
use crate::progression::errors::ProgressionError;
use crate::progression::storage::ProgressionStorage;
use crate::progression::store::ProgressionStore;
use crate::progression::types::UserSession;
use crate::validation::{username_from_email, validate_email, validate_user_name};

/// Fields to merge into the current session. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    pub email: Option<String>,
    pub username: Option<String>,
    pub has_character: Option<bool>,
}

pub struct SessionManager {
    storage: ProgressionStorage,
    current: Option<UserSession>,
}

impl SessionManager {
    /// Load any persisted session from `storage`.
    pub fn open(storage: ProgressionStorage) -> Result<Self, ProgressionError> {
        let current = storage.load_session()?;
        if let Some(ref session) = current {
            debug!("resumed session for {}", escape_log(&session.username));
        }
        Ok(Self { storage, current })
    }

    pub fn current(&self) -> Option<&UserSession> {
        self.current.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    /// Sign up with an explicit username.
    pub fn register(
        &mut self,
        email: &str,
        username: &str,
    ) -> Result<&UserSession, ProgressionError> {
        let email = validate_email(email).map_err(invalid)?;
        let username = validate_user_name(username).map_err(invalid)?;
        self.start(UserSession::new(&email, &username))
    }

    /// Sign in; the username is the email's local part, unchecked beyond the
    /// email shape. Reserved names only apply to chosen usernames.
    pub fn login(&mut self, email: &str) -> Result<&UserSession, ProgressionError> {
        let email = validate_email(email).map_err(invalid)?;
        let username = username_from_email(&email).to_string();
        self.start(UserSession::new(&email, &username))
    }

    fn start(&mut self, session: UserSession) -> Result<&UserSession, ProgressionError> {
        self.storage.put_session(&session)?;
        info!("signed in {} ({})", escape_log(&session.username), session.id);
        Ok(&*self.current.insert(session))
    }

    /// Merge `update` into the current session and persist it. `Ok(false)`
    /// when nobody is signed in.
    pub fn update(&mut self, update: SessionUpdate) -> Result<bool, ProgressionError> {
        let Some(current) = self.current.as_ref() else {
            return Ok(false);
        };
        let mut next = current.clone();
        if let Some(email) = update.email {
            next.email = validate_email(&email).map_err(invalid)?;
        }
        if let Some(username) = update.username {
            next.username = validate_user_name(&username).map_err(invalid)?;
        }
        if let Some(has_character) = update.has_character {
            next.has_character = has_character;
        }
        self.storage.put_session(&next)?;
        self.current = Some(next);
        Ok(true)
    }

    pub fn mark_has_character(&mut self) -> Result<bool, ProgressionError> {
        self.update(SessionUpdate {
            has_character: Some(true),
            ..SessionUpdate::default()
        })
    }

    /// Sign out: remove the session and the character record.
    pub fn logout(&mut self, store: &mut ProgressionStore) -> Result<(), ProgressionError> {
        self.storage.remove_session()?;
        store.clear()?;
        if let Some(session) = self.current.take() {
            info!("signed out {}", escape_log(&session.username));
        }
        Ok(())
    }
}

fn invalid(err: impl std::fmt::Display) -> ProgressionError {
    ProgressionError::InvalidInput(err.to_string())
}
