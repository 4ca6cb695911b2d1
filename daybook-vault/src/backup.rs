//! Portable vault backups.
//!
//! A backup is the persisted salt and ciphertext, verbatim, wrapped in a
//! two-field JSON document. It is exactly as secret as the vault at
//! rest: useless without the password, and never containing plaintext,
//! keys, or metadata.

use crate::error::{VaultError, VaultResult};
use crate::store::VaultStore;
use daybook_crypto::{EncryptedData, Salt};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The portable backup bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultBackup {
    /// Base64 KDF salt, byte-identical to the persisted field.
    pub salt: String,
    /// Base64 encrypted entry list, byte-identical to the persisted
    /// field.
    pub cipher: String,
}

/// Captures the current vault as a JSON bundle.
///
/// Fails with [`VaultError::NotInitialized`] when there is no vault to
/// capture. The two reads are not coordinated with writers; exporting
/// through a session snapshots under its lock instead.
pub fn export_backup(store: &VaultStore) -> VaultResult<String> {
    let salt = store.salt()?.ok_or(VaultError::NotInitialized)?;
    let cipher = store.cipher()?.ok_or(VaultError::NotInitialized)?;
    serde_json::to_string(&VaultBackup { salt, cipher })
        .map_err(|e| VaultError::Serialization(e.to_string()))
}

/// Validates `bundle` and replaces the persisted vault with it.
///
/// Destructive: the previous salt and ciphertext are overwritten and the
/// metadata is touched. Password compatibility is not checked here; a
/// bundle encrypted under a different password simply fails the next
/// unlock.
pub fn import_backup(store: &VaultStore, bundle: &str) -> VaultResult<()> {
    let backup: VaultBackup =
        serde_json::from_str(bundle).map_err(|e| VaultError::InvalidBackup(e.to_string()))?;

    // Both fields must be structurally sound before anything is touched.
    Salt::from_base64(&backup.salt)
        .map_err(|e| VaultError::InvalidBackup(format!("salt: {}", e)))?;
    EncryptedData::from_base64(&backup.cipher)
        .map_err(|e| VaultError::InvalidBackup(format!("cipher: {}", e)))?;

    let previous_salt = store.salt()?;
    store.set_salt(&backup.salt)?;
    if let Err(e) = store.set_cipher(&backup.cipher) {
        // Don't leave the imported salt next to the old blob.
        let restore = match &previous_salt {
            Some(old) => store.set_salt(old),
            None => store.remove_salt(),
        };
        if let Err(restore_err) = restore {
            warn!("Failed to restore previous salt: {}", restore_err);
        }
        return Err(e);
    }
    if let Err(e) = store.touch_meta() {
        warn!("Failed to update metadata: {}", e);
    }
    Ok(())
}
