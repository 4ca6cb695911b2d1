//! Vault session state machine.
//!
//! A session is `NoVault` until a password is set, `Locked` when a vault
//! is persisted but no key is in memory, and `Unlocked` while the
//! derived key and decrypted entry list are cached. The session is the
//! sole owner of both; nothing below it ever sees plaintext.
//!
//! Operations take `&self` and serialize on an internal mutex. Mutations
//! re-encrypt the full list and persist it before the cached copy
//! advances, so a failed write leaves both the persisted blob and the
//! in-memory state where they were.

use crate::backup;
use crate::error::{VaultError, VaultResult};
use crate::store::VaultStore;
use daybook_crypto::{decrypt_string, derive_key, encrypt_string, DerivedKey, KdfParams, Salt};
use daybook_types::{entries_from_json, entries_to_json, EntryId, JournalEntry};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Lifecycle state of a vault session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    /// No vault has been created yet.
    NoVault,
    /// A vault is persisted but the key is not in memory.
    Locked,
    /// The key and decrypted entries are cached in memory.
    Unlocked,
}

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Key derivation cost parameters.
    pub kdf: KdfParams,
    /// Minimum accepted password length, in characters.
    pub min_password_len: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            kdf: KdfParams::default(),
            min_password_len: 6,
        }
    }
}

struct SessionInner {
    key: Option<DerivedKey>,
    entries: Vec<JournalEntry>,
}

/// A single-user session over one persisted vault.
pub struct VaultSession {
    store: VaultStore,
    config: SessionConfig,
    inner: Mutex<SessionInner>,
}

impl VaultSession {
    /// Creates a session over `store` with default configuration.
    pub fn new(store: VaultStore) -> Self {
        Self::with_config(store, SessionConfig::default())
    }

    /// Creates a session with explicit configuration.
    pub fn with_config(store: VaultStore, config: SessionConfig) -> Self {
        Self {
            store,
            config,
            inner: Mutex::new(SessionInner {
                key: None,
                entries: Vec::new(),
            }),
        }
    }

    /// Creates a session over process-local memory.
    pub fn in_memory() -> Self {
        Self::new(VaultStore::in_memory())
    }

    /// The underlying field store.
    pub fn store(&self) -> &VaultStore {
        &self.store
    }

    /// Reports the current lifecycle state.
    pub fn state(&self) -> VaultResult<VaultState> {
        let inner = self.inner.lock().unwrap();
        if inner.key.is_some() {
            return Ok(VaultState::Unlocked);
        }
        if self.store.exists()? {
            Ok(VaultState::Locked)
        } else {
            Ok(VaultState::NoVault)
        }
    }

    /// Returns true if the key is currently held in memory.
    pub fn is_unlocked(&self) -> bool {
        self.inner.lock().unwrap().key.is_some()
    }

    /// Unlocks the vault with `password`.
    ///
    /// Wrong passwords and damaged blobs are indistinguishable by
    /// design; both report [`VaultError::InvalidPassword`].
    pub fn unlock(&self, password: &str) -> VaultResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.key.is_some() {
            return Err(VaultError::AlreadyUnlocked);
        }

        let salt_text = self.store.salt()?.ok_or(VaultError::NotInitialized)?;
        let cipher_text = self.store.cipher()?.ok_or(VaultError::NotInitialized)?;

        let salt = Salt::from_base64(&salt_text).map_err(|_| VaultError::InvalidPassword)?;
        let key = derive_key(password, &salt, &self.config.kdf)
            .map_err(|e| VaultError::Crypto(e.to_string()))?;
        let json = decrypt_string(&key, &cipher_text).map_err(|_| VaultError::InvalidPassword)?;

        let entries = entries_from_json(&json);
        if entries.is_empty() && json.trim() != "[]" {
            warn!("Decrypted entry list is unreadable; treating the vault as empty");
        }
        inner.entries = entries;
        inner.key = Some(key);
        info!("Vault unlocked ({} entries)", inner.entries.len());
        drop(inner);

        if let Err(e) = self.store.set_locked_hint(false) {
            warn!("Failed to clear lock flag: {}", e);
        }
        Ok(())
    }

    /// Sets the initial password, or changes it when a vault already
    /// exists.
    ///
    /// An existing vault requires the correct current password; its
    /// entries are then re-encrypted under a freshly generated salt.
    /// The new salt and blob are fully computed before anything is
    /// written, and a failed blob write restores the previous salt, so
    /// the persisted pair never mixes generations. Ends with the
    /// session unlocked under the new password.
    pub fn set_password(
        &self,
        new_password: &str,
        current_password: Option<&str>,
    ) -> VaultResult<()> {
        if new_password.chars().count() < self.config.min_password_len {
            return Err(VaultError::PasswordTooShort(self.config.min_password_len));
        }

        let mut inner = self.inner.lock().unwrap();

        let previous_salt = self.store.salt()?;
        let had_vault = previous_salt.is_some();
        let entries = match (&previous_salt, self.store.cipher()?) {
            (Some(salt_text), Some(cipher_text)) => {
                let current = current_password.ok_or(VaultError::InvalidPassword)?;
                let salt =
                    Salt::from_base64(salt_text).map_err(|_| VaultError::InvalidPassword)?;
                let key = derive_key(current, &salt, &self.config.kdf)
                    .map_err(|e| VaultError::Crypto(e.to_string()))?;
                let json =
                    decrypt_string(&key, &cipher_text).map_err(|_| VaultError::InvalidPassword)?;
                entries_from_json(&json)
            }
            _ => Vec::new(),
        };

        // Compute the complete new pair before any write.
        let salt = Salt::random();
        let key = derive_key(new_password, &salt, &self.config.kdf)
            .map_err(|e| VaultError::Crypto(e.to_string()))?;
        let json = entries_to_json(&entries).map_err(|e| VaultError::Serialization(e.to_string()))?;
        let cipher = encrypt_string(&key, &json).map_err(|e| VaultError::Crypto(e.to_string()))?;

        self.store.set_salt(&salt.to_base64())?;
        if let Err(e) = self.store.set_cipher(&cipher) {
            // Don't leave the fresh salt next to the old blob.
            let restore = match &previous_salt {
                Some(old) => self.store.set_salt(old),
                None => self.store.remove_salt(),
            };
            if let Err(restore_err) = restore {
                warn!("Failed to restore previous salt: {}", restore_err);
            }
            return Err(e);
        }
        if let Err(e) = self.store.touch_meta() {
            warn!("Failed to update metadata: {}", e);
        }

        inner.key = Some(key);
        inner.entries = entries;
        drop(inner);

        if let Err(e) = self.store.set_locked_hint(false) {
            warn!("Failed to clear lock flag: {}", e);
        }
        if had_vault {
            info!("Vault password changed");
        } else {
            info!("Vault created");
        }
        Ok(())
    }

    /// Returns a copy of the decrypted entry list.
    pub fn entries(&self) -> VaultResult<Vec<JournalEntry>> {
        let inner = self.inner.lock().unwrap();
        if inner.key.is_none() {
            return Err(VaultError::Locked);
        }
        Ok(inner.entries.clone())
    }

    /// Applies `transform` to a copy of the entry list, then re-encrypts
    /// and persists the whole list. The cached copy only advances when
    /// the write succeeds.
    pub fn mutate<F>(&self, transform: F) -> VaultResult<()>
    where
        F: FnOnce(&mut Vec<JournalEntry>),
    {
        self.mutate_entries(|entries| {
            transform(entries);
            Ok(())
        })
    }

    /// Appends a new entry.
    pub fn add_entry(&self, entry: JournalEntry) -> VaultResult<()> {
        self.mutate_entries(|entries| {
            entries.push(entry);
            Ok(())
        })
    }

    /// Replaces the entry with the same id, bumping its `updated_at`.
    pub fn update_entry(&self, mut entry: JournalEntry) -> VaultResult<()> {
        self.mutate_entries(|entries| {
            let Some(slot) = entries.iter_mut().find(|e| e.id == entry.id) else {
                return Err(VaultError::EntryNotFound(entry.id.to_string()));
            };
            entry.touch();
            *slot = entry;
            Ok(())
        })
    }

    /// Removes the entry with the given id.
    pub fn remove_entry(&self, id: EntryId) -> VaultResult<()> {
        self.mutate_entries(|entries| {
            let before = entries.len();
            entries.retain(|e| e.id != id);
            if entries.len() == before {
                return Err(VaultError::EntryNotFound(id.to_string()));
            }
            Ok(())
        })
    }

    fn mutate_entries<F>(&self, transform: F) -> VaultResult<()>
    where
        F: FnOnce(&mut Vec<JournalEntry>) -> VaultResult<()>,
    {
        let mut inner = self.inner.lock().unwrap();
        let key = inner.key.as_ref().ok_or(VaultError::Locked)?;

        let mut next = inner.entries.clone();
        transform(&mut next)?;

        let json = entries_to_json(&next).map_err(|e| VaultError::Serialization(e.to_string()))?;
        let cipher = encrypt_string(key, &json).map_err(|e| VaultError::Crypto(e.to_string()))?;

        self.store.set_cipher(&cipher)?;
        if let Err(e) = self.store.touch_meta() {
            warn!("Failed to update metadata: {}", e);
        }

        debug!("Persisted {} entries", next.len());
        inner.entries = next;
        Ok(())
    }

    /// Discards the key and cached plaintext, then persists the lock
    /// hint.
    ///
    /// Idempotent; the memory wipe happens even when the hint write
    /// fails.
    pub fn lock(&self) {
        let mut inner = self.inner.lock().unwrap();
        let was_unlocked = inner.key.take().is_some(); // DerivedKey zeroizes on drop
        inner.entries.clear();
        drop(inner);

        if was_unlocked {
            if let Err(e) = self.store.set_locked_hint(true) {
                warn!("Failed to persist lock flag: {}", e);
            }
            info!("Vault locked");
        }
    }

    /// Exports the persisted vault as a portable JSON bundle.
    ///
    /// Works in any state; the snapshot cannot interleave with a
    /// concurrent password change or import, and the bundle never
    /// contains plaintext or keys.
    pub fn export_backup(&self) -> VaultResult<String> {
        // set_password and import write the salt/cipher pair under this
        // lock; holding it keeps the snapshot on a single generation.
        let _inner = self.inner.lock().unwrap();
        let bundle = backup::export_backup(&self.store)?;
        info!("Exported vault backup");
        Ok(bundle)
    }

    /// Validates and imports a backup bundle, replacing the persisted
    /// vault, then locks the session so stale cached plaintext can never
    /// overwrite the imported blob.
    pub fn import_backup(&self, bundle: &str) -> VaultResult<()> {
        let mut inner = self.inner.lock().unwrap();
        backup::import_backup(&self.store, bundle)?;

        inner.key = None;
        inner.entries.clear();
        drop(inner);

        if let Err(e) = self.store.set_locked_hint(true) {
            warn!("Failed to persist lock flag: {}", e);
        }
        info!("Imported vault backup; session locked");
        Ok(())
    }
}
