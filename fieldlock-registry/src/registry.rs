//! The append-only key registry.

use crate::error::{RegistryError, RegistryResult};
use crate::record::{KeyId, KeyRecord};
use fieldlock_crypto::FieldKey;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

/// Creation-ordered collection of key records with O(1) id lookup.
///
/// Records are appended on creation and never removed; the "current" key
/// is always the most recently created record, recomputed from the log
/// rather than stored separately. Each instance is independent owned
/// state (no globals), so multiple registries can coexist.
#[derive(Debug, Default)]
pub struct KeyRegistry {
    records: Vec<KeyRecord>,
    index: HashMap<KeyId, usize>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a fresh key, appends it to the log and returns its id.
    ///
    /// The new record becomes the current key. Key generation aborts the
    /// process if the OS randomness source is unavailable; there is no
    /// recovery path that could produce secure key material.
    pub fn create_key(&mut self) -> KeyId {
        let record = KeyRecord::new();
        let id = record.id();
        self.index.insert(id, self.records.len());
        self.records.push(record);
        debug!("created key {}", id.short());
        id
    }

    /// Returns a transient clone of the secret, or `None` if the id is
    /// unknown **or** the key is revoked.
    ///
    /// The two cases are deliberately indistinguishable so callers cannot
    /// use this as an oracle for which ids exist.
    pub fn key_bytes(&self, id: KeyId) -> Option<FieldKey> {
        let record = &self.records[*self.index.get(&id)?];
        if record.revoked {
            None
        } else {
            Some(record.secret.clone())
        }
    }

    /// Full bookkeeping for an id, including revoked records.
    ///
    /// Unlike [`Self::key_bytes`] this is an audit view and does answer
    /// for revoked keys; it never exposes the secret.
    pub fn record(&self, id: KeyId) -> Option<&KeyRecord> {
        self.index.get(&id).map(|&i| &self.records[i])
    }

    /// Marks a key revoked. Idempotent: revoking an already-revoked key
    /// is a no-op success.
    pub fn revoke(&mut self, id: KeyId) -> RegistryResult<()> {
        let idx = *self.index.get(&id).ok_or(RegistryError::KeyNotFound)?;
        let record = &mut self.records[idx];
        if !record.revoked {
            record.revoked = true;
            info!("revoked key {}", id.short());
        }
        Ok(())
    }

    /// Id of the most recently created record, if any.
    pub fn current_key(&self) -> Option<KeyId> {
        self.records.last().map(KeyRecord::id)
    }

    /// Oldest-first traversal of all records, revoked included.
    pub fn iter(&self) -> impl Iterator<Item = &KeyRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records `field` as protected by the key. No-op for unknown ids.
    ///
    /// Bookkeeping hook for the vault, which owns the field→key mapping;
    /// the registry never mutates protected sets on its own.
    pub fn attach_field(&mut self, id: KeyId, field: &str) {
        if let Some(&idx) = self.index.get(&id) {
            self.records[idx].protected_fields.insert(field.to_string());
        }
    }

    /// Removes `field` from the key's protected set. No-op for unknown
    /// ids or fields the key does not protect.
    pub fn detach_field(&mut self, id: KeyId, field: &str) {
        if let Some(&idx) = self.index.get(&id) {
            self.records[idx].protected_fields.remove(field);
        }
    }

    pub fn stats(&self) -> RegistryStats {
        let revoked = self.records.iter().filter(|r| r.revoked).count();
        RegistryStats {
            total_keys: self.records.len(),
            active_keys: self.records.len() - revoked,
            revoked_keys: revoked,
            current_key_id: self.current_key(),
        }
    }
}

/// Snapshot of registry counters for reporting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub total_keys: usize,
    pub active_keys: usize,
    pub revoked_keys: usize,
    pub current_key_id: Option<KeyId>,
}

const RULE: &str = "======================================================================";

impl fmt::Display for KeyRegistry {
    /// Oldest-first console report of every record.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "KEY REGISTRY ({} keys)", self.records.len())?;
        writeln!(f, "{RULE}")?;
        let current = self.current_key();
        for (pos, record) in self.records.iter().enumerate() {
            let status = if record.is_revoked() { "REVOKED" } else { "ACTIVE" };
            let marker = if current == Some(record.id()) {
                " [CURRENT]"
            } else {
                ""
            };
            writeln!(f, "{pos}. {}... - {status}{marker}", record.id().short())?;
            let preview: Vec<&str> = record.protected_fields().take(3).collect();
            writeln!(
                f,
                "   fields: {} - [{}]",
                record.field_count(),
                preview.join(", ")
            )?;
        }
        write!(f, "{RULE}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn create_appends_in_order_and_moves_current() {
        let mut registry = KeyRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.current_key(), None);

        let first = registry.create_key();
        let second = registry.create_key();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.current_key(), Some(second));
        let order: Vec<KeyId> = registry.iter().map(KeyRecord::id).collect();
        assert_eq!(order, vec![first, second]);
    }

    #[test]
    fn ids_are_unique() {
        let mut registry = KeyRegistry::new();
        let a = registry.create_key();
        let b = registry.create_key();
        assert_ne!(a, b);
    }

    #[test]
    fn key_bytes_absent_for_unknown_and_revoked_alike() {
        let mut registry = KeyRegistry::new();
        let id = registry.create_key();
        assert!(registry.key_bytes(id).is_some());

        registry.revoke(id).unwrap();
        let revoked = registry.key_bytes(id);
        let unknown = registry.key_bytes(KeyId::generate());
        assert!(revoked.is_none());
        assert!(unknown.is_none());
    }

    #[test]
    fn revoked_record_stays_enumerable() {
        let mut registry = KeyRegistry::new();
        let id = registry.create_key();
        registry.revoke(id).unwrap();

        let record = registry.record(id).unwrap();
        assert!(record.is_revoked());
        assert_eq!(registry.iter().count(), 1);
    }

    #[test]
    fn revoke_is_idempotent() {
        let mut registry = KeyRegistry::new();
        let id = registry.create_key();
        registry.revoke(id).unwrap();
        assert_eq!(registry.revoke(id), Ok(()));
    }

    #[test]
    fn revoke_unknown_id_is_not_found() {
        let mut registry = KeyRegistry::new();
        assert_eq!(
            registry.revoke(KeyId::generate()),
            Err(RegistryError::KeyNotFound)
        );
    }

    #[test]
    fn revocation_does_not_disturb_other_keys() {
        let mut registry = KeyRegistry::new();
        let a = registry.create_key();
        let b = registry.create_key();
        let b_secret = registry.key_bytes(b).unwrap();

        registry.revoke(a).unwrap();

        assert_eq!(
            registry.key_bytes(b).unwrap().as_bytes(),
            b_secret.as_bytes()
        );
        assert_eq!(registry.current_key(), Some(b));
    }

    #[test]
    fn attach_and_detach_maintain_protected_set() {
        let mut registry = KeyRegistry::new();
        let id = registry.create_key();

        registry.attach_field(id, "email");
        registry.attach_field(id, "name");
        registry.attach_field(id, "email"); // duplicate attach is a no-op

        let record = registry.record(id).unwrap();
        assert_eq!(record.field_count(), 2);
        assert!(record.protects("email"));

        registry.detach_field(id, "email");
        assert!(!registry.record(id).unwrap().protects("email"));

        // unknown ids are tolerated
        registry.detach_field(KeyId::generate(), "email");
    }

    #[test]
    fn stats_count_active_and_revoked() {
        let mut registry = KeyRegistry::new();
        let a = registry.create_key();
        let b = registry.create_key();
        registry.revoke(a).unwrap();

        let stats = registry.stats();
        assert_eq!(stats.total_keys, 2);
        assert_eq!(stats.active_keys, 1);
        assert_eq!(stats.revoked_keys, 1);
        assert_eq!(stats.current_key_id, Some(b));
    }

    #[test]
    fn display_report_lists_every_record() {
        let mut registry = KeyRegistry::new();
        let a = registry.create_key();
        registry.attach_field(a, "name");
        let b = registry.create_key();
        registry.revoke(a).unwrap();

        let report = registry.to_string();
        assert!(report.contains("KEY REGISTRY (2 keys)"));
        assert!(report.contains("REVOKED"));
        assert!(report.contains("[CURRENT]"));
        assert!(report.contains(&a.short()));
        assert!(report.contains(&b.short()));
    }
}
