//! Password-locked journal vault for Daybook.
//!
//! Orchestrates the `daybook-crypto` primitives over an injected
//! key/value store:
//! - [`VaultStore`]: typed access to the four persisted fields
//!   (salt, ciphertext blob, metadata, lock hint)
//! - [`VaultSession`]: the no-vault / locked / unlocked state machine
//!   that owns the derived key and the decrypted entry list
//! - backup export/import of the encrypted blob
//! - [`InactivityGuard`]: idle-timeout auto-lock
//!
//! All plaintext lives inside [`VaultSession`]; nothing below it ever
//! sees decrypted entries.

mod backup;
mod error;
mod guard;
mod session;
mod store;

pub use backup::{export_backup, import_backup, VaultBackup};
pub use error::{VaultError, VaultResult};
pub use guard::{InactivityGuard, DEFAULT_INACTIVITY_TIMEOUT};
pub use session::{SessionConfig, VaultSession, VaultState};
pub use store::{
    FileStore, KeyValueStore, MemoryStore, VaultMeta, VaultStore, CIPHER_KEY, LOCK_KEY, META_KEY,
    SALT_KEY,
};
