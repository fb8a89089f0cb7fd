//! Vault error types.

use thiserror::Error;

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// Errors that can occur in vault operations.
///
/// Read paths (`decrypt_field`, `shareable_key`) do not use these: they
/// answer with `Option` so that every miss looks the same to the caller.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The record to load was not a mapping of field names to values.
    #[error("record must be a mapping of field names to values")]
    InvalidInput,

    /// An operation referenced a field the vault does not hold.
    #[error("field not found: {0}")]
    FieldNotFound(String),

    /// A referenced key id is unknown or revoked. A field whose key was
    /// revoked can no longer be rotated, since nothing can decrypt it
    /// first.
    #[error("key unavailable (unknown or revoked)")]
    KeyUnavailable,

    /// A stored envelope failed authentication under its own key. The
    /// ciphertext is corrupt and the plaintext unrecoverable; not retried.
    #[error("stored envelope for field '{0}' failed authentication")]
    Corrupted(String),

    #[error("crypto error: {0}")]
    Crypto(String),

    #[error("storage error: {0}")]
    Storage(String),
}
