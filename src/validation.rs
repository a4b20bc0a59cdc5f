//! Input validation for usernames, passwords, pet names and forum text.

use std::collections::HashSet;

/// Username validation errors with helpful messages
#[derive(Debug, thiserror::Error)]
pub enum UsernameError {
    #[error("Username is too short (minimum {min} characters)")]
    TooShort { min: usize },

    #[error("Username is too long (maximum {max} characters)")]
    TooLong { max: usize },

    #[error("Username cannot start or end with whitespace")]
    InvalidWhitespace,

    #[error("Username contains invalid characters: {chars}")]
    InvalidCharacters { chars: String },

    #[error("Username is a reserved system name")]
    Reserved,
}

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password is too short (minimum {min} characters)")]
    TooShort { min: usize },

    #[error("Password is too long (maximum {max} characters)")]
    TooLong { max: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum PetNameError {
    #[error("Pet name must be between {min} and {max} characters")]
    BadLength { min: usize, max: usize },

    #[error("Pet name contains control characters")]
    InvalidCharacters,
}

#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("Text too long (max {max} characters)")]
    TooLong { max: usize },
}

/// Username validation rules configuration
#[derive(Debug, Clone)]
pub struct UsernameRules {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for UsernameRules {
    /// Registration form rules: 4-20 characters.
    fn default() -> Self {
        UsernameRules {
            min_length: 4,
            max_length: 20,
        }
    }
}

pub const PASSWORD_MIN: usize = 4;
pub const PASSWORD_MAX: usize = 20;

pub const PET_NAME_MIN: usize = 4;
pub const PET_NAME_MAX: usize = 20;

/// Generate safe filename from username using URL encoding
pub fn safe_filename(username: &str) -> String {
    use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
    utf8_percent_encode(username, NON_ALPHANUMERIC).to_string()
}

/// Get set of reserved usernames that should not be allowed
fn reserved_names() -> HashSet<&'static str> {
    [
        // System/admin terms
        "admin", "administrator", "root", "system", "operator", "moderator",
        "guest", "anonymous", "user", "test", "demo", "lamoland",
        // Platform-specific reserved names
        "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7", "com8", "com9",
        "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
        // Route terms that could cause confusion in profile links
        "login", "logout", "register", "profile", "store", "adopt", "forums",
        "gifting", "minigames", "settings", "delete", "help",
    ].iter().copied().collect()
}

/// Validate a username according to the given rules
pub fn validate_username(username: &str, rules: &UsernameRules) -> Result<String, UsernameError> {
    let trimmed = username.trim();

    // Length checks
    if trimmed.len() < rules.min_length {
        return Err(UsernameError::TooShort {
            min: rules.min_length,
        });
    }
    if trimmed.len() > rules.max_length {
        return Err(UsernameError::TooLong {
            max: rules.max_length,
        });
    }

    // Whitespace checks
    if trimmed != username {
        return Err(UsernameError::InvalidWhitespace);
    }

    // Reserved name check (case-insensitive)
    if reserved_names().contains(&trimmed.to_lowercase().as_str()) {
        return Err(UsernameError::Reserved);
    }

    // Usernames become store keys and avatar filenames, so only a
    // conservative ASCII set is accepted.
    let invalid: HashSet<char> = trimmed
        .chars()
        .filter(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || *c == '.'))
        .collect();
    if !invalid.is_empty() {
        let chars: String = invalid.into_iter().collect();
        return Err(UsernameError::InvalidCharacters { chars });
    }

    Ok(trimmed.to_string())
}

/// Validate a username with the registration form rules.
pub fn validate_user_name(name: &str) -> Result<String, UsernameError> {
    validate_username(name, &UsernameRules::default())
}

/// Registration form rule: 4-20 characters, no other constraints.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.len() < PASSWORD_MIN {
        return Err(PasswordError::TooShort { min: PASSWORD_MIN });
    }
    if password.len() > PASSWORD_MAX {
        return Err(PasswordError::TooLong { max: PASSWORD_MAX });
    }
    Ok(())
}

/// Validate a pet's chosen display name: 4-20 characters after trimming,
/// no control characters.
pub fn validate_pet_name(name: &str) -> Result<String, PetNameError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if len < PET_NAME_MIN || len > PET_NAME_MAX {
        return Err(PetNameError::BadLength {
            min: PET_NAME_MIN,
            max: PET_NAME_MAX,
        });
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(PetNameError::InvalidCharacters);
    }
    Ok(trimmed.to_string())
}

/// Sanitize forum text (remove control characters, validate length).
/// Newlines and tabs survive; other control characters are stripped.
pub fn sanitize_text(content: &str, max_chars: usize) -> Result<String, TextError> {
    if content.chars().count() > max_chars {
        return Err(TextError::TooLong { max: max_chars });
    }

    let sanitized: String = content
        .chars()
        .filter(|&c| !c.is_control() || c == '\n' || c == '\t')
        .collect();

    Ok(sanitized)
}
