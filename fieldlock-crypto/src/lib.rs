//! Field envelope encryption for Fieldlock.
//!
//! Provides per-field authenticated encryption using:
//! - AES-256-GCM with a fresh random 96-bit nonce per envelope
//! - Zeroized 256-bit key material
//! - Base64 (standard alphabet, padded) as the wire encoding
//!
//! # Architecture
//!
//! Every field of a record is sealed into its own [`FieldEnvelope`]:
//! nonce, ciphertext and a [`ValueKind`] tag recording whether the
//! plaintext was a text value (encrypted as-is) or a structured value
//! (encrypted as its canonical JSON encoding). Opening an envelope with
//! the wrong key, a tampered ciphertext or a garbled envelope all fail
//! with the same [`CryptoError::Authentication`]; callers cannot tell
//! the causes apart.
//!
//! Keys never pick their own nonces: [`seal_value`] draws one from the
//! OS randomness source on every call. Nonce reuse under the same key is
//! the one failure AES-GCM cannot survive.

mod envelope;
mod error;
mod key;
pub(crate) mod wire;

pub use envelope::{FieldEnvelope, NONCE_SIZE, ValueKind, open_value, seal_value};
pub use error::{CryptoError, CryptoResult};
pub use key::{FieldKey, KEY_SIZE};
