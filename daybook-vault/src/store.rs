//! Persistence for the vault's four fields.
//!
//! Everything at this layer is opaque text; base64 and JSON decoding
//! belong to the session and backup layers. The backing [`KeyValueStore`]
//! is injected so hosts can supply whatever storage they have.

use crate::error::{VaultError, VaultResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Storage key for the KDF salt (base64 text).
pub const SALT_KEY: &str = "daybook_salt_v1";

/// Storage key for the encrypted entry list (base64 text).
pub const CIPHER_KEY: &str = "daybook_cipher_v1";

/// Storage key for vault metadata (cleartext JSON).
pub const META_KEY: &str = "daybook_meta_v1";

/// Storage key for the lock hint flag.
pub const LOCK_KEY: &str = "daybook_lock_v1";

const LOCK_FLAG: &str = "1";

/// Generic text key/value storage backing a vault.
///
/// Absent durable storage is indistinguishable from "no vault yet":
/// `get` simply returns `None`. Single-key writes are atomic;
/// cross-key transactions are not offered.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &str) -> VaultResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> VaultResult<()>;

    /// Removes the value stored under `key`, if any.
    fn remove(&self, key: &str) -> VaultResult<()>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> VaultResult<Option<String>> {
        Ok(self.map.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> VaultResult<()> {
        self.map
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> VaultResult<()> {
        self.map.lock().unwrap().remove(key);
        Ok(())
    }
}

/// File-backed store holding all fields in one JSON document.
///
/// Every mutation rewrites the file through a temp file and an atomic
/// rename, so a crash mid-write never leaves a torn store behind. A
/// failed write also leaves the in-memory view on the old contents.
pub struct FileStore {
    path: PathBuf,
    map: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Opens the store, loading existing contents if the file exists.
    pub fn open(path: impl AsRef<Path>) -> VaultResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| VaultError::Storage(e.to_string()))?;
            }
        }
        let map = if path.exists() {
            let raw =
                std::fs::read_to_string(&path).map_err(|e| VaultError::Storage(e.to_string()))?;
            serde_json::from_str(&raw)
                .map_err(|e| VaultError::Storage(format!("corrupt store file: {}", e)))?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            map: Mutex::new(map),
        })
    }

    fn persist(&self, map: &HashMap<String, String>) -> VaultResult<()> {
        let json = serde_json::to_string_pretty(map)
            .map_err(|e| VaultError::Serialization(e.to_string()))?;
        // Write to a temp file, then atomic rename
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json).map_err(|e| VaultError::Storage(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| VaultError::Storage(e.to_string()))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> VaultResult<Option<String>> {
        Ok(self.map.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> VaultResult<()> {
        let mut map = self.map.lock().unwrap();
        let mut next = map.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *map = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> VaultResult<()> {
        let mut map = self.map.lock().unwrap();
        if !map.contains_key(key) {
            return Ok(());
        }
        let mut next = map.clone();
        next.remove(key);
        self.persist(&next)?;
        *map = next;
        Ok(())
    }
}

/// Informational vault metadata, persisted as cleartext JSON.
///
/// Never load-bearing: a missing or damaged value reads as absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultMeta {
    /// Time of the last successful vault write.
    pub last_updated: DateTime<Utc>,
}

/// Typed access to the four persisted vault fields.
#[derive(Clone)]
pub struct VaultStore {
    inner: Arc<dyn KeyValueStore>,
}

impl VaultStore {
    /// Wraps an injected key/value collaborator.
    pub fn new(inner: Arc<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    /// Creates a store backed by process-local memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Opens a store backed by a single JSON file.
    pub fn open_file(path: impl AsRef<Path>) -> VaultResult<Self> {
        Ok(Self::new(Arc::new(FileStore::open(path)?)))
    }

    /// Returns the persisted salt text, if any.
    pub fn salt(&self) -> VaultResult<Option<String>> {
        self.inner.get(SALT_KEY)
    }

    /// Writes the salt text.
    pub fn set_salt(&self, salt: &str) -> VaultResult<()> {
        self.inner.set(SALT_KEY, salt)
    }

    pub(crate) fn remove_salt(&self) -> VaultResult<()> {
        self.inner.remove(SALT_KEY)
    }

    /// Returns the persisted ciphertext blob, if any.
    pub fn cipher(&self) -> VaultResult<Option<String>> {
        self.inner.get(CIPHER_KEY)
    }

    /// Writes the ciphertext blob.
    pub fn set_cipher(&self, cipher: &str) -> VaultResult<()> {
        self.inner.set(CIPHER_KEY, cipher)
    }

    /// Reads vault metadata. Lenient: an unparseable value reads as
    /// absent.
    pub fn meta(&self) -> VaultResult<Option<VaultMeta>> {
        let Some(raw) = self.inner.get(META_KEY)? else {
            return Ok(None);
        };
        Ok(serde_json::from_str(&raw).ok())
    }

    /// Stamps the metadata with the current time.
    pub fn touch_meta(&self) -> VaultResult<()> {
        let meta = VaultMeta {
            last_updated: Utc::now(),
        };
        let json =
            serde_json::to_string(&meta).map_err(|e| VaultError::Serialization(e.to_string()))?;
        self.inner.set(META_KEY, &json)
    }

    /// Reads the persisted lock hint.
    pub fn locked_hint(&self) -> VaultResult<bool> {
        Ok(self.inner.get(LOCK_KEY)?.as_deref() == Some(LOCK_FLAG))
    }

    /// Persists (or clears) the lock hint. Advisory only; the real
    /// boundary is whether a session holds the key in memory.
    pub fn set_locked_hint(&self, locked: bool) -> VaultResult<()> {
        if locked {
            self.inner.set(LOCK_KEY, LOCK_FLAG)
        } else {
            self.inner.remove(LOCK_KEY)
        }
    }

    /// Returns true if a vault (salt or ciphertext) is persisted.
    pub fn exists(&self) -> VaultResult<bool> {
        Ok(self.salt()?.is_some() || self.cipher()?.is_some())
    }
}
