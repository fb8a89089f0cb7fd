//! Key lifecycle registry for Fieldlock.
//!
//! An append-only, creation-ordered log of symmetric keys with O(1) id
//! lookup. Each [`KeyRecord`] tracks which fields it currently protects
//! and whether it has been revoked; records are never deleted, so the
//! full history stays available for audit and display.
//!
//! Revocation is terminal: a revoked key's record remains enumerable,
//! but its secret can no longer be retrieved. [`KeyRegistry::key_bytes`]
//! answers identically for unknown and revoked ids so callers cannot
//! probe which keys exist.

mod error;
mod record;
mod registry;

pub use error::{RegistryError, RegistryResult};
pub use record::{KeyId, KeyRecord};
pub use registry::{KeyRegistry, RegistryStats};
