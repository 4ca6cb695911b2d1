//! Encryption layer for Daybook.
//!
//! Two primitives, combined by the vault session:
//! - Argon2id key derivation from a password and a persisted salt
//! - ChaCha20-Poly1305 authenticated encryption of the entry list
//!
//! Failure modes are deliberately coarse: a failed authentication tag
//! never says whether the password was wrong or the data was tampered
//! with, and structurally broken payloads are rejected before any key
//! material is touched.

mod cipher;
mod error;
mod key;

pub use cipher::{
    decrypt, decrypt_string, encrypt, encrypt_string, EncryptedData, NONCE_SIZE, TAG_SIZE,
};
pub use error::{CryptoError, CryptoResult};
pub use key::{derive_key, DerivedKey, KdfParams, Salt, KEY_SIZE, SALT_SIZE};
