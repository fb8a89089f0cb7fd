//! Crypto error types.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur while sealing or opening field envelopes.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// AEAD seal failed. Not reachable with a well-formed key and nonce.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Uniform failure for every open error: wrong key, tampered
    /// ciphertext or nonce, truncated or garbled envelope. Carries no
    /// cause so callers cannot distinguish them.
    #[error("authentication failed (wrong key or tampered envelope)")]
    Authentication,

    /// Key material of the wrong length was supplied.
    #[error("invalid key length: expected {expected}, actual {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// The plaintext value could not be serialized before sealing.
    #[error("value serialization failed: {0}")]
    Serialization(String),
}
