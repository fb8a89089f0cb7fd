//! Symmetric key material.

use crate::error::{CryptoError, CryptoResult};
use crate::wire;
use aes_gcm::aead::OsRng;
use aes_gcm::{Aes256Gcm, KeyInit};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// AES-256 key length in bytes.
pub const KEY_SIZE: usize = 32;

/// A 256-bit symmetric key protecting one or more fields.
///
/// The bytes are zeroized on drop. `Debug` never prints them, and the
/// serde representation (a base64 string) exists only for the explicit
/// key-sharing exports; a `FieldKey` should not appear in any other
/// persisted structure.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct FieldKey([u8; KEY_SIZE]);

impl FieldKey {
    /// Generates a fresh random key from the OS randomness source.
    ///
    /// Aborts the process if the randomness source is unavailable; no
    /// secure key material can be produced without it.
    pub fn generate() -> Self {
        Self(Aes256Gcm::generate_key(&mut OsRng).into())
    }

    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        wire::encode(&self.0)
    }

    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let bytes = wire::decode(encoded).map_err(|_| CryptoError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: 0,
        })?;
        if bytes.len() != KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; KEY_SIZE];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldKey(..)")
    }
}

impl Serialize for FieldKey {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for FieldKey {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let s = String::deserialize(de)?;
        Self::from_base64(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_are_distinct() {
        let a = FieldKey::generate();
        let b = FieldKey::generate();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn base64_round_trip() {
        let key = FieldKey::generate();
        let recovered = FieldKey::from_base64(&key.to_base64()).unwrap();
        assert_eq!(key.as_bytes(), recovered.as_bytes());
    }

    #[test]
    fn wrong_length_rejected() {
        let short = wire::encode(&[0u8; 16]);
        assert!(FieldKey::from_base64(&short).is_err());
    }

    #[test]
    fn debug_does_not_leak_bytes() {
        let key = FieldKey::from_bytes([0xAB; KEY_SIZE]);
        let printed = format!("{key:?}");
        assert!(!printed.contains("171"));
        assert!(!printed.to_lowercase().contains("ab"), "got: {printed}");
    }
}
