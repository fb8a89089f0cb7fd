//! Per-field encrypted record vault for Fieldlock.
//!
//! A [`FieldVault`] owns a key registry plus two maps: field name →
//! encrypted envelope, and field name → protecting key id. Records load
//! in one of two topologies (one shared key for every field, or one
//! dedicated key per field), and any single field's key can be rotated
//! without touching the encryption or key material of its siblings.
//!
//! Access control is possession-based: [`FieldVault::decrypt_field`]
//! attempts AEAD decryption with whatever secret the caller supplies and
//! answers with a value or nothing. The vault never looks up the "right"
//! key to compare against, and it never reveals whether a miss was an
//! unknown field, a wrong key or a tampered envelope.
//!
//! The vault holds key ids only; secret bytes are fetched from the
//! registry transiently per operation and leave the process only through
//! the explicit sharing exports in [`export`].

mod error;
mod export;
mod store;
mod vault;

pub use error::{VaultError, VaultResult};
pub use export::{
    EncryptedRecord, FieldExport, KeyExport, KeyManifest, RecordMetadata, ShareableKey,
};
pub use store::{load_json, save_json};
pub use vault::{FieldVault, KeyMode, VaultStats};
