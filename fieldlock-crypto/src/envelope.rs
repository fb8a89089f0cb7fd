//! Sealing and opening of per-field envelopes.

use crate::error::{CryptoError, CryptoResult};
use crate::key::FieldKey;
use crate::wire;
use aes_gcm::aead::{Aead, AeadCore, OsRng};
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// AES-GCM nonce length in bytes (96 bits).
pub const NONCE_SIZE: usize = 12;

/// How the plaintext was encoded before sealing.
///
/// Text values are encrypted as their raw UTF-8 bytes; everything else
/// (mappings, sequences, numbers, booleans, null) is encrypted as its
/// canonical JSON encoding and parsed back on open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Text,
    Structured,
}

/// One encrypted field: nonce, ciphertext and the plaintext's shape.
///
/// Serializes with base64 strings for the binary members, which is the
/// canonical wire form of the exported record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEnvelope {
    #[serde(with = "wire")]
    pub nonce: Vec<u8>,
    #[serde(with = "wire")]
    pub ciphertext: Vec<u8>,
    pub value_kind: ValueKind,
}

/// Seals a value under `key` with a fresh random nonce and empty
/// associated data.
///
/// The nonce is drawn from the OS randomness source on every call and is
/// never caller-supplied; reusing a nonce under the same key would forfeit
/// both confidentiality and integrity.
pub fn seal_value(value: &Value, key: &FieldKey) -> CryptoResult<FieldEnvelope> {
    let (plaintext, value_kind) = match value {
        Value::String(s) => (s.clone().into_bytes(), ValueKind::Text),
        other => (
            serde_json::to_vec(other).map_err(|e| CryptoError::Serialization(e.to_string()))?,
            ValueKind::Structured,
        ),
    };

    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext.as_slice())
        .map_err(|_| CryptoError::Encryption("AEAD seal failed".into()))?;

    Ok(FieldEnvelope {
        nonce: nonce.to_vec(),
        ciphertext,
        value_kind,
    })
}

/// Opens an envelope with the supplied key, authenticating the ciphertext
/// and reversing the plaintext encoding.
///
/// Every failure mode (wrong key, flipped ciphertext or nonce bits,
/// truncation, an inner encoding that does not parse) returns the same
/// [`CryptoError::Authentication`] value.
pub fn open_value(envelope: &FieldEnvelope, key: &FieldKey) -> CryptoResult<Value> {
    if envelope.nonce.len() != NONCE_SIZE {
        return Err(CryptoError::Authentication);
    }

    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(&envelope.nonce),
            envelope.ciphertext.as_slice(),
        )
        .map_err(|_| CryptoError::Authentication)?;

    match envelope.value_kind {
        ValueKind::Text => String::from_utf8(plaintext)
            .map(Value::String)
            .map_err(|_| CryptoError::Authentication),
        ValueKind::Structured => {
            serde_json::from_slice(&plaintext).map_err(|_| CryptoError::Authentication)
        }
    }
}
