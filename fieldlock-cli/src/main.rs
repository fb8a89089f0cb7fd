//! Illustrative entry point: encrypts a sample profile in both
//! topologies, rotates a field, and writes the exported shapes to disk.

use anyhow::Context;
use fieldlock_vault::{FieldVault, KeyMode};
use serde_json::{Value, json};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn sample_profile() -> Value {
    json!({
        "name": "Violet K.",
        "email": "violet@example.com",
        "phone": "+1-555-0100",
        "current_position": "Staff Engineer",
        "skills": ["C/C++", "Rust", "SQL", "Kotlin"],
        "languages": ["en", "fr"],
        "education": {
            "degree": "MSc Computer Science",
            "year": 2019
        },
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let profile = sample_profile();

    // One shared key for the whole record.
    let mut vault = FieldVault::new();
    vault.load(&profile, KeyMode::Single)?;
    println!("{}", vault.registry());

    let share = vault
        .shareable_key("email")
        .context("no shareable key for 'email'")?;
    let email = vault
        .decrypt_field("email", &share.secret)
        .context("exported secret failed to decrypt 'email'")?;
    println!(
        "'email' decrypts under key {}... to {email} (key also covers {} fields)",
        share.key_id.short(),
        share.protected_fields.len()
    );

    // Rotate a single field out of the shared key.
    let new_id = vault.rotate("email")?;
    println!(
        "rotated 'email' onto key {}...; 'name' still resolves under the old key",
        new_id.short()
    );
    println!("{}", vault.registry());

    // One dedicated key per field.
    let mut isolated = FieldVault::new();
    isolated.load(&profile, KeyMode::Multi)?;
    let manifest = isolated.key_manifest();
    println!(
        "multi mode: {} fields across {} distinct keys",
        manifest.field_map.len(),
        manifest.keys.len()
    );

    vault.save_record(Path::new("encrypted_profile.json"))?;
    vault.save_manifest(Path::new("profile_keys.json"))?;
    println!("wrote encrypted_profile.json and profile_keys.json");

    Ok(())
}
