//! Error types for the vault layer.

use thiserror::Error;

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// Errors that can occur in vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// No vault has been created yet.
    #[error("vault is not initialized")]
    NotInitialized,

    /// The operation needs an unlocked session.
    #[error("vault is locked")]
    Locked,

    /// Unlock was called on an already-unlocked session.
    #[error("vault is already unlocked")]
    AlreadyUnlocked,

    /// Wrong password, or a stored blob that fails authentication. The
    /// two cases are deliberately indistinguishable.
    #[error("incorrect password or corrupted data")]
    InvalidPassword,

    /// Password rejected before any cryptography.
    #[error("password too short (min {0} characters)")]
    PasswordTooShort(usize),

    /// No entry with the given id.
    #[error("entry not found: {0}")]
    EntryNotFound(String),

    /// Backup bundle rejected on structural grounds.
    #[error("invalid backup format: {0}")]
    InvalidBackup(String),

    /// Underlying persistence failed; in-memory session state is
    /// preserved.
    #[error("storage error: {0}")]
    Storage(String),

    /// Record list or metadata serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Unexpected failure in a crypto primitive.
    #[error("crypto error: {0}")]
    Crypto(String),
}
