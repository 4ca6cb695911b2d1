//! Core type definitions for Daybook.
//!
//! This crate defines the plain data model shared by the vault layers:
//! - Journal entry records and their identifiers (UUID v7)
//! - The JSON codec for the entry list, including the lenient parsing
//!   rules for damaged payloads
//!
//! Anything that touches keys, ciphertext, or persistence lives in the
//! `daybook-crypto` and `daybook-vault` crates, not here.

mod entry;
mod ids;

pub use entry::{entries_from_json, entries_to_json, sort_for_display, JournalEntry};
pub use ids::EntryId;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
