//! Key records and their identifiers.

use chrono::{DateTime, Utc};
use fieldlock_crypto::FieldKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Opaque unique identifier of a key record.
///
/// Assigned once at creation and unique for the registry's lifetime.
/// Serializes as the UUID's hyphenated string, so it can be used directly
/// as a JSON object key in the exported shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyId(Uuid);

impl KeyId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// First 12 hex characters, for display.
    pub fn short(&self) -> String {
        let hex = self.0.simple().to_string();
        hex[..12].to_string()
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One entry in the registry: id, secret, creation time, revocation flag
/// and the set of fields currently encrypted under this key.
///
/// The secret is owned exclusively by the record; it leaves the registry
/// only as a transient clone through [`crate::KeyRegistry::key_bytes`].
/// `KeyRecord` deliberately has no serde implementation: key material
/// crosses the export boundary only inside the vault's explicit sharing
/// structures.
#[derive(Debug)]
pub struct KeyRecord {
    id: KeyId,
    pub(crate) secret: FieldKey,
    created_at: DateTime<Utc>,
    pub(crate) revoked: bool,
    pub(crate) protected_fields: BTreeSet<String>,
}

impl KeyRecord {
    pub(crate) fn new() -> Self {
        Self {
            id: KeyId::generate(),
            secret: FieldKey::generate(),
            created_at: Utc::now(),
            revoked: false,
            protected_fields: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> KeyId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether this key has been revoked. Terminal; there is no un-revoke.
    pub fn is_revoked(&self) -> bool {
        self.revoked
    }

    /// Names of the fields currently encrypted under this key, sorted.
    pub fn protected_fields(&self) -> impl Iterator<Item = &str> {
        self.protected_fields.iter().map(String::as_str)
    }

    pub fn field_count(&self) -> usize {
        self.protected_fields.len()
    }

    pub fn protects(&self, field: &str) -> bool {
        self.protected_fields.contains(field)
    }
}
