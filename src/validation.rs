//! Input validation for character names, account emails and usernames

use std::collections::HashSet;

/// Longest character name accepted at creation.
pub const MAX_CHARACTER_NAME_CHARS: usize = 20;

/// Character name validation errors with helpful messages
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CharacterNameError {
    #[error("Character name cannot be empty")]
    Empty,

    #[error("Character name is too long (maximum {max} characters)")]
    TooLong { max: usize },

    #[error("Character name contains control characters")]
    ControlCharacters,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum EmailError {
    #[error("Email address cannot be empty")]
    Empty,

    #[error("Email address is too long (maximum {max} characters)")]
    TooLong { max: usize },

    #[error("Email address must look like name@domain")]
    Malformed,
}

/// Username validation errors with helpful messages
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UsernameError {
    #[error("Username is too short (minimum {min} characters)")]
    TooShort { min: usize },

    #[error("Username is too long (maximum {max} characters)")]
    TooLong { max: usize },

    #[error("Username contains invalid characters: {chars}")]
    InvalidCharacters { chars: String },

    #[error("Username is a reserved name")]
    Reserved,
}

/// Username validation rules configuration
#[derive(Debug, Clone)]
pub struct UsernameRules {
    pub min_length: usize,
    pub max_length: usize,
    pub allow_spaces: bool,
    pub allow_unicode: bool,
}

impl Default for UsernameRules {
    fn default() -> Self {
        UsernameRules {
            min_length: 2,
            max_length: 30,
            allow_spaces: true,
            allow_unicode: true,
        }
    }
}

fn reserved_names() -> HashSet<&'static str> {
    ["admin", "administrator", "root", "system", "moderator", "guest", "anonymous"]
        .iter()
        .copied()
        .collect()
}

/// Trim a character name and check it can be shown on cards and leaderboards.
pub fn validate_character_name(name: &str) -> Result<String, CharacterNameError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CharacterNameError::Empty);
    }
    if trimmed.chars().count() > MAX_CHARACTER_NAME_CHARS {
        return Err(CharacterNameError::TooLong {
            max: MAX_CHARACTER_NAME_CHARS,
        });
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(CharacterNameError::ControlCharacters);
    }
    Ok(trimmed.to_string())
}

/// Shape check only: one `@`, a non-empty local part, a dotted domain and no
/// whitespace. Returns the trimmed address.
pub fn validate_email(email: &str) -> Result<String, EmailError> {
    const MAX_EMAIL_CHARS: usize = 254;

    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(EmailError::Empty);
    }
    if trimmed.chars().count() > MAX_EMAIL_CHARS {
        return Err(EmailError::TooLong { max: MAX_EMAIL_CHARS });
    }
    if trimmed.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(EmailError::Malformed);
    }

    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err(EmailError::Malformed);
    };
    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty());
    if local.is_empty() || !domain_ok {
        return Err(EmailError::Malformed);
    }
    Ok(trimmed.to_string())
}

/// Local part of a validated email, used as the username on login. Any local
/// part [`validate_email`] accepts is kept as is.
pub fn username_from_email(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Validate a username according to the given rules
pub fn validate_username(username: &str, rules: &UsernameRules) -> Result<String, UsernameError> {
    let trimmed = username.trim();
    let length = trimmed.chars().count();

    if length < rules.min_length {
        return Err(UsernameError::TooShort { min: rules.min_length });
    }
    if length > rules.max_length {
        return Err(UsernameError::TooLong { max: rules.max_length });
    }

    if reserved_names().contains(trimmed.to_lowercase().as_str()) {
        return Err(UsernameError::Reserved);
    }

    let mut invalid: Vec<char> = trimmed
        .chars()
        .filter(|&ch| {
            let valid = if ch.is_ascii_alphanumeric() || "_-.+".contains(ch) {
                true
            } else if ch == ' ' {
                rules.allow_spaces
            } else if ch.is_control() {
                false
            } else if !ch.is_ascii() {
                rules.allow_unicode && ch.is_alphanumeric()
            } else {
                false
            };
            !valid
        })
        .collect();

    if !invalid.is_empty() {
        invalid.sort_unstable();
        invalid.dedup();
        return Err(UsernameError::InvalidCharacters {
            chars: invalid.into_iter().collect(),
        });
    }

    Ok(trimmed.to_string())
}

/// Validate a chosen display username with the default rules
pub fn validate_user_name(name: &str) -> Result<String, UsernameError> {
    validate_username(name, &UsernameRules::default())
}
