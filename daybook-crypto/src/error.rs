//! Error types for the encryption layer.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key derivation failed.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Authentication tag verification failed. Deliberately does not say
    /// which of wrong key / tampered data it was.
    #[error("authentication failed (wrong key or tampered data)")]
    AuthenticationFailure,

    /// Payload rejected on structural grounds before any decryption.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Invalid salt length.
    #[error("invalid salt length: expected {expected}, got {actual}")]
    InvalidSaltLength { expected: usize, actual: usize },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
