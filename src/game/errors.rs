use thiserror::Error;

/// Errors that can arise while executing game operations against the store.
#[derive(Debug, Error)]
pub enum GameError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, avatar writes, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when fetching a record that is not present.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    /// Input failed a validation rule (lengths, charsets, empty fields).
    #[error("{0}")]
    Validation(String),

    /// Creating a record whose unique key is already taken.
    #[error("{0}")]
    Duplicate(String),

    /// Balance too low to cover a debit.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// Gift attempted before the sender's cooldown elapsed.
    #[error("gift cooldown active: {remaining_minutes} minutes remaining")]
    CooldownActive { remaining_minutes: i64 },

    /// Daily minigame plays used up.
    #[error("no plays remaining today")]
    AllowanceExhausted,

    /// Acting on a record the caller does not own.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Commit kept failing after the configured retry attempts.
    #[error("store busy: commit retries exhausted")]
    StoreBusy,

    /// Internal error (task join errors, unexpected conditions)
    #[error("internal error: {0}")]
    Internal(String),
}
