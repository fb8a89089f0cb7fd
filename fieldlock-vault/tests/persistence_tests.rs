//! File round-trips for the exported record and key manifest.

use fieldlock_vault::{EncryptedRecord, FieldVault, KeyManifest, KeyMode};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn profile() -> Value {
    json!({
        "name": "A",
        "email": "b@x.com",
        "languages": ["en", "de"],
    })
}

#[test]
fn record_and_manifest_survive_a_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let record_path = dir.path().join("encrypted_profile.json");
    let manifest_path = dir.path().join("profile_keys.json");

    let mut vault = FieldVault::new();
    vault.load(&profile(), KeyMode::Multi).unwrap();
    vault.save_record(&record_path).unwrap();
    vault.save_manifest(&manifest_path).unwrap();

    // A fresh vault imports the record; keys arrive via the manifest.
    let mut restored = FieldVault::new();
    restored.load_record(&record_path).unwrap();
    let manifest: KeyManifest = fieldlock_vault::load_json(&manifest_path).unwrap();

    assert_eq!(restored.field_count(), 3);
    for (field, expected) in profile().as_object().unwrap() {
        let key_id = manifest.field_map[field];
        let secret = &manifest.keys[&key_id].secret;
        assert_eq!(restored.decrypt_field(field, secret).as_ref(), Some(expected));
    }
}

#[test]
fn exported_record_metadata_counts_fields_and_keys() {
    let mut vault = FieldVault::new();
    vault.load(&profile(), KeyMode::Single).unwrap();

    let record = vault.export_record();
    assert_eq!(record.metadata.total_fields, 3);
    assert_eq!(record.metadata.total_keys, 1);
    assert_eq!(record.encrypted_data.len(), 3);
    assert_eq!(record.field_key_map.len(), 3);
}

#[test]
fn record_wire_format_uses_base64_strings_and_id_keys() {
    let mut vault = FieldVault::new();
    vault.load(&json!({"email": "b@x.com"}), KeyMode::Single).unwrap();

    let wire = serde_json::to_value(vault.export_record()).unwrap();
    let envelope = &wire["encrypted_data"]["email"];
    assert!(envelope["nonce"].is_string());
    assert!(envelope["ciphertext"].is_string());
    assert_eq!(envelope["value_kind"], json!("text"));
    assert!(wire["field_key_map"]["email"].is_string());
    assert_eq!(wire["metadata"]["total_fields"], json!(1));

    // The manifest keys map is keyed by the same id string.
    let manifest_wire = serde_json::to_value(vault.key_manifest()).unwrap();
    let id = wire["field_key_map"]["email"].as_str().unwrap();
    assert!(manifest_wire["keys"][id]["secret"].is_string());
    assert_eq!(
        manifest_wire["keys"][id]["protected_fields"],
        json!(["email"])
    );
    assert_eq!(manifest_wire["field_map"]["email"], json!(id));
}

#[test]
fn record_json_round_trips_through_serde_exactly() {
    let mut vault = FieldVault::new();
    vault.load(&profile(), KeyMode::Multi).unwrap();

    let record = vault.export_record();
    let json = serde_json::to_string_pretty(&record).unwrap();
    let parsed: EncryptedRecord = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.metadata, record.metadata);
    assert_eq!(parsed.encrypted_data, record.encrypted_data);
    assert_eq!(parsed.field_key_map, record.field_key_map);
}

#[test]
fn loading_a_missing_file_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut vault = FieldVault::new();
    let err = vault.load_record(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, fieldlock_vault::VaultError::Storage(_)));
}
