//! Exported shapes: key sharing and encrypted-record persistence.
//!
//! These are the only structures in which secret bytes cross the process
//! boundary, and each one is an explicit sharing decision by the caller.
//! All binary members serialize as standard base64 with padding.

use fieldlock_crypto::{FieldEnvelope, FieldKey};
use fieldlock_registry::KeyId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One key exported for sharing, with the full list of fields it
/// protects so a recipient understands the blast radius of holding it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShareableKey {
    pub key_id: KeyId,
    pub secret: FieldKey,
    pub protected_fields: Vec<String>,
}

/// Manifest entry: the secret plus the fields it protects. The key id is
/// the map key in [`KeyManifest::keys`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyExport {
    pub secret: FieldKey,
    pub protected_fields: Vec<String>,
}

/// Every distinct non-revoked key referenced by any field, for
/// full-access distribution.
///
/// `field_map` covers all fields, including those whose key has been
/// revoked; such keys simply have no entry in `keys`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct KeyManifest {
    pub keys: BTreeMap<KeyId, KeyExport>,
    pub field_map: BTreeMap<String, KeyId>,
}

/// Counters stored alongside an exported record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub total_fields: usize,
    pub total_keys: usize,
}

/// The complete encrypted record: envelopes, field→key mapping and
/// metadata. Contains no key material; keys travel separately in the
/// [`KeyManifest`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncryptedRecord {
    pub encrypted_data: BTreeMap<String, FieldEnvelope>,
    pub field_key_map: BTreeMap<String, KeyId>,
    pub metadata: RecordMetadata,
}

/// A single field exported together with its key, for handing one field
/// to one recipient.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldExport {
    pub field: String,
    pub envelope: FieldEnvelope,
    pub key_id: KeyId,
    pub secret: FieldKey,
}
