//! The field vault: per-field encryption over an owned key registry.

use crate::error::{VaultError, VaultResult};
use crate::export::{
    EncryptedRecord, FieldExport, KeyExport, KeyManifest, RecordMetadata, ShareableKey,
};
use crate::store;
use fieldlock_crypto::{FieldEnvelope, FieldKey, open_value, seal_value};
use fieldlock_registry::{KeyId, KeyRegistry, RegistryStats};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Encryption topology for a [`FieldVault::load`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyMode {
    /// Every field in the call shares one key: the registry's current key
    /// if one exists, otherwise a single freshly minted key. Later loads
    /// on the same vault keep reusing that key.
    Single,
    /// One dedicated key per field.
    Multi,
}

/// Encrypts the fields of a structured record independently and tracks
/// which key protects which field.
///
/// The vault and its registry form one unit of state: every mutation
/// takes `&mut self`, so a concurrent adapter must wrap the whole vault
/// in a single writer lock. Per-field locking cannot keep the envelope
/// map, the field→key map and two key records consistent through a
/// rotation.
#[derive(Debug, Default)]
pub struct FieldVault {
    registry: KeyRegistry,
    envelopes: HashMap<String, FieldEnvelope>,
    field_to_key: HashMap<String, KeyId>,
}

impl FieldVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a vault over an existing registry, e.g. one shared with
    /// earlier vault instances in tests.
    pub fn with_registry(registry: KeyRegistry) -> Self {
        Self {
            registry,
            envelopes: HashMap::new(),
            field_to_key: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &KeyRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut KeyRegistry {
        &mut self.registry
    }

    pub fn field_count(&self) -> usize {
        self.envelopes.len()
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.envelopes.contains_key(field)
    }

    /// Field names currently held, sorted.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.envelopes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Id of the key currently protecting `field`.
    pub fn key_for(&self, field: &str) -> Option<KeyId> {
        self.field_to_key.get(field).copied()
    }

    /// Encrypts every field of `record` and registers the field→key
    /// bookkeeping on both sides.
    ///
    /// `record` must be a JSON mapping of field names to values; anything
    /// else fails with [`VaultError::InvalidInput`]. Re-loading a field
    /// that is already held replaces its envelope and detaches it from
    /// the previously protecting key.
    pub fn load(&mut self, record: &Value, mode: KeyMode) -> VaultResult<()> {
        let fields = record.as_object().ok_or(VaultError::InvalidInput)?;
        debug!("loading {} fields in {mode:?} mode", fields.len());

        for (field, value) in fields {
            let key_id = match mode {
                KeyMode::Multi => self.registry.create_key(),
                KeyMode::Single => self
                    .registry
                    .current_key()
                    .unwrap_or_else(|| self.registry.create_key()),
            };
            let secret = self
                .registry
                .key_bytes(key_id)
                .ok_or(VaultError::KeyUnavailable)?;
            let envelope =
                seal_value(value, &secret).map_err(|e| VaultError::Crypto(e.to_string()))?;

            if let Some(previous) = self.field_to_key.insert(field.clone(), key_id)
                && previous != key_id
            {
                self.registry.detach_field(previous, field);
            }
            self.envelopes.insert(field.clone(), envelope);
            self.registry.attach_field(key_id, field);
        }

        info!(
            "encrypted {} fields with {} keys",
            fields.len(),
            self.registry.len()
        );
        Ok(())
    }

    /// Attempts to decrypt `field` with the supplied secret.
    ///
    /// Possession of the right key is both necessary and sufficient: the
    /// vault does not look up the "correct" key, it simply tries the one
    /// given. Unknown field, wrong key and tampered envelope all answer
    /// `None`, deliberately alike.
    pub fn decrypt_field(&self, field: &str, secret: &FieldKey) -> Option<Value> {
        let envelope = self.envelopes.get(field)?;
        open_value(envelope, secret).ok()
    }

    /// Re-keys a single field: decrypt under the old key, mint a new key,
    /// re-encrypt, and move the bookkeeping. Returns the new key id.
    ///
    /// No other field is touched, and the old key record keeps its id,
    /// secret and revocation state; only its protected set shrinks.
    /// All fallible steps happen before the first mutation, so a failed
    /// rotation leaves the vault exactly as it was. Decryption failure
    /// under the field's own key means the stored ciphertext is corrupt;
    /// that is surfaced as [`VaultError::Corrupted`] and not retried.
    pub fn rotate(&mut self, field: &str) -> VaultResult<KeyId> {
        let old_id = self
            .key_for(field)
            .ok_or_else(|| VaultError::FieldNotFound(field.to_string()))?;
        let envelope = self
            .envelopes
            .get(field)
            .ok_or_else(|| VaultError::FieldNotFound(field.to_string()))?;
        let old_secret = self
            .registry
            .key_bytes(old_id)
            .ok_or(VaultError::KeyUnavailable)?;

        let value = open_value(envelope, &old_secret)
            .map_err(|_| VaultError::Corrupted(field.to_string()))?;

        let new_id = self.registry.create_key();
        let new_secret = self
            .registry
            .key_bytes(new_id)
            .ok_or(VaultError::KeyUnavailable)?;
        let new_envelope =
            seal_value(&value, &new_secret).map_err(|e| VaultError::Crypto(e.to_string()))?;

        // Past this point nothing can fail: the envelope swap, the map
        // update and the two protected-set edits land as one unit.
        self.envelopes.insert(field.to_string(), new_envelope);
        self.field_to_key.insert(field.to_string(), new_id);
        self.registry.detach_field(old_id, field);
        self.registry.attach_field(new_id, field);

        info!(
            "rotated key for '{field}': {}... -> {}...",
            old_id.short(),
            new_id.short()
        );
        Ok(new_id)
    }

    /// Exports the secret protecting `field`, with the full list of
    /// fields that key also protects. `None` if the field is unknown or
    /// its key is revoked.
    pub fn shareable_key(&self, field: &str) -> Option<ShareableKey> {
        let key_id = self.key_for(field)?;
        let secret = self.registry.key_bytes(key_id)?;
        let record = self.registry.record(key_id)?;
        Some(ShareableKey {
            key_id,
            secret,
            protected_fields: record.protected_fields().map(str::to_string).collect(),
        })
    }

    /// Exports one field's envelope together with its key, for handing a
    /// single field to a recipient. `None` if the field is unknown or its
    /// key is revoked.
    pub fn export_field(&self, field: &str) -> Option<FieldExport> {
        let envelope = self.envelopes.get(field)?;
        let key_id = self.key_for(field)?;
        let secret = self.registry.key_bytes(key_id)?;
        Some(FieldExport {
            field: field.to_string(),
            envelope: envelope.clone(),
            key_id,
            secret,
        })
    }

    /// Every distinct non-revoked key referenced by any field,
    /// deduplicated by id, plus the complete field→key map.
    pub fn key_manifest(&self) -> KeyManifest {
        let mut manifest = KeyManifest::default();
        for (field, &key_id) in &self.field_to_key {
            manifest.field_map.insert(field.clone(), key_id);
            if manifest.keys.contains_key(&key_id) {
                continue;
            }
            // Revoked keys stay out of the manifest; their fields remain
            // listed in field_map.
            let Some(secret) = self.registry.key_bytes(key_id) else {
                continue;
            };
            let Some(record) = self.registry.record(key_id) else {
                continue;
            };
            manifest.keys.insert(
                key_id,
                KeyExport {
                    secret,
                    protected_fields: record.protected_fields().map(str::to_string).collect(),
                },
            );
        }
        manifest
    }

    /// The complete encrypted record for persistence. Carries no key
    /// material.
    pub fn export_record(&self) -> EncryptedRecord {
        EncryptedRecord {
            encrypted_data: self
                .envelopes
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            field_key_map: self.field_to_key.iter().map(|(k, &v)| (k.clone(), v)).collect(),
            metadata: RecordMetadata {
                total_fields: self.envelopes.len(),
                total_keys: self.registry.len(),
            },
        }
    }

    /// Replaces the vault's envelopes and field→key map from a previously
    /// exported record. Keys are not part of the record and must be
    /// re-established separately via the key manifest.
    pub fn import_record(&mut self, record: EncryptedRecord) {
        info!(
            "imported encrypted record with {} fields",
            record.metadata.total_fields
        );
        self.envelopes = record.encrypted_data.into_iter().collect();
        self.field_to_key = record.field_key_map.into_iter().collect();
    }

    pub fn save_record(&self, path: &Path) -> VaultResult<()> {
        store::save_json(path, &self.export_record())
    }

    pub fn save_manifest(&self, path: &Path) -> VaultResult<()> {
        store::save_json(path, &self.key_manifest())
    }

    pub fn load_record(&mut self, path: &Path) -> VaultResult<()> {
        let record = store::load_json(path)?;
        self.import_record(record);
        Ok(())
    }

    pub fn stats(&self) -> VaultStats {
        VaultStats {
            total_fields: self.envelopes.len(),
            total_keys: self.registry.len(),
            registry: self.registry.stats(),
        }
    }
}

/// Snapshot of vault counters for reporting.
#[derive(Clone, Debug, Serialize)]
pub struct VaultStats {
    pub total_fields: usize,
    pub total_keys: usize,
    pub registry: RegistryStats,
}
