// ═══════════════════════════════════════════════════════════════════
// Storage Tests — configuration document, memory and JSON file stores
// ═══════════════════════════════════════════════════════════════════

use dividend_planner_core::errors::CoreError;
use dividend_planner_core::models::asset::AssetEntry;
use dividend_planner_core::models::configuration::SessionState;
use dividend_planner_core::storage::document::{ConfigurationDocument, CURRENT_VERSION};
use dividend_planner_core::storage::file::{JsonFileConfigurationStore, JsonFileSessionStore};
use dividend_planner_core::storage::memory::{MemoryConfigurationStore, MemorySessionStore};
use dividend_planner_core::storage::traits::{normalize_name, ConfigurationStore, SessionStore};

fn sample_assets() -> Vec<AssetEntry> {
    vec![
        AssetEntry::new("MXRF11", "0.10", "10.25"),
        AssetEntry::new("HGLG11", "1.10", "160.40"),
    ]
}

/// Shared behavior every `ConfigurationStore` backend must have.
fn exercise_store(store: &mut dyn ConfigurationStore) {
    assert!(store.list().unwrap().is_empty());

    store.save("FIIs", "1000", &sample_assets()).unwrap();
    store.save("Aposentadoria", "5000", &[]).unwrap();
    assert_eq!(store.list().unwrap(), vec!["Aposentadoria", "FIIs"]);

    let loaded = store.load("FIIs").unwrap();
    assert_eq!(loaded.name, "FIIs");
    assert_eq!(loaded.goal, "1000");
    assert_eq!(loaded.assets, sample_assets_with_ids(&loaded.assets));

    // Overwrite by name
    store.save("FIIs", "2000", &sample_assets()[..1]).unwrap();
    let loaded = store.load("FIIs").unwrap();
    assert_eq!(loaded.goal, "2000");
    assert_eq!(loaded.assets.len(), 1);
    assert_eq!(store.list().unwrap().len(), 2);

    store.delete("Aposentadoria").unwrap();
    assert_eq!(store.list().unwrap(), vec!["FIIs"]);

    assert!(matches!(
        store.load("Aposentadoria"),
        Err(CoreError::StorageNotFound(_))
    ));
    assert!(matches!(
        store.delete("Aposentadoria"),
        Err(CoreError::StorageNotFound(_))
    ));
}

/// The stored rows keep their ids; compare field values only.
fn sample_assets_with_ids(loaded: &[AssetEntry]) -> Vec<AssetEntry> {
    sample_assets()
        .into_iter()
        .zip(loaded)
        .map(|(mut a, l)| {
            a.id = l.id;
            a
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════
// Names
// ═══════════════════════════════════════════════════════════════════

mod names {
    use super::*;

    #[test]
    fn trims_whitespace() {
        assert_eq!(normalize_name("  FIIs  ").unwrap(), "FIIs");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(normalize_name(""), Err(CoreError::ValidationError(_))));
        assert!(matches!(normalize_name("   "), Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn store_rejects_empty_name() {
        let mut store = MemoryConfigurationStore::new();
        let err = store.save(" ", "1000", &[]).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn lookup_ignores_surrounding_whitespace() {
        let mut store = MemoryConfigurationStore::new();
        store.save(" FIIs ", "1000", &[]).unwrap();
        assert_eq!(store.load("FIIs").unwrap().name, "FIIs");
        store.delete(" FIIs").unwrap();
    }
}

// ═══════════════════════════════════════════════════════════════════
// ConfigurationDocument
// ═══════════════════════════════════════════════════════════════════

mod document {
    use super::*;

    #[test]
    fn default_is_current_version_and_empty() {
        let doc = ConfigurationDocument::default();
        assert_eq!(doc.version, CURRENT_VERSION);
        assert!(doc.configurations.is_empty());
    }

    #[test]
    fn json_is_keyed_by_name() {
        let mut doc = ConfigurationDocument::default();
        doc.upsert("FIIs", "1000", &sample_assets()).unwrap();
        let json = doc.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let entry = &value["configurations"]["FIIs"];
        assert_eq!(entry["goal"], "1000");
        assert_eq!(entry["assets"][0]["identifier"], "MXRF11");
        assert_eq!(entry["assets"][0]["payoutPerUnit"], "0.10");
        assert_eq!(entry["assets"][0]["pricePerUnit"], "10.25");
    }

    #[test]
    fn parses_back() {
        let mut doc = ConfigurationDocument::default();
        doc.upsert("FIIs", "1000", &sample_assets()).unwrap();
        let parsed = ConfigurationDocument::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn assets_without_ids_get_fresh_ones() {
        let json = r#"{
            "version": 1,
            "configurations": {
                "Old": { "goal": "300", "assets": [
                    { "identifier": "A", "payoutPerUnit": "1", "pricePerUnit": "10" },
                    { "identifier": "B", "payoutPerUnit": "2", "pricePerUnit": "20" }
                ] }
            }
        }"#;
        let doc = ConfigurationDocument::from_json(json).unwrap();
        let config = doc.get("Old").unwrap();
        assert_eq!(config.assets.len(), 2);
        assert_ne!(config.assets[0].id, config.assets[1].id);
    }

    #[test]
    fn rejects_unknown_version() {
        let json = r#"{ "version": 99, "configurations": {} }"#;
        let err = ConfigurationDocument::from_json(json).unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));

        let json = r#"{ "version": 0 }"#;
        assert!(ConfigurationDocument::from_json(json).is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = ConfigurationDocument::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn all_is_ordered_by_name() {
        let mut doc = ConfigurationDocument::default();
        doc.upsert("b", "1", &[]).unwrap();
        doc.upsert("a", "2", &[]).unwrap();
        let names: Vec<String> = doc.all().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Memory stores
// ═══════════════════════════════════════════════════════════════════

mod memory {
    use super::*;

    #[test]
    fn configuration_store_contract() {
        let mut store = MemoryConfigurationStore::new();
        exercise_store(&mut store);
    }

    #[test]
    fn session_slot() {
        let mut session = MemorySessionStore::new();
        assert_eq!(session.load().unwrap(), None);

        let state = SessionState {
            goal: "1000".into(),
            assets: sample_assets(),
        };
        session.save(&state).unwrap();
        assert_eq!(session.load().unwrap(), Some(state));

        session.clear().unwrap();
        assert_eq!(session.load().unwrap(), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
// JSON file stores
// ═══════════════════════════════════════════════════════════════════

mod file {
    use super::*;

    #[test]
    fn configuration_store_contract() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileConfigurationStore::open(dir.path().join("saves.json")).unwrap();
        exercise_store(&mut store);
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saves.json");

        {
            let mut store = JsonFileConfigurationStore::open(&path).unwrap();
            store.save("FIIs", "1000", &sample_assets()).unwrap();
        }

        let store = JsonFileConfigurationStore::open(&path).unwrap();
        assert_eq!(store.path(), path.as_path());
        let loaded = store.load("FIIs").unwrap();
        assert_eq!(loaded.goal, "1000");
        assert_eq!(loaded.assets[1].identifier, "HGLG11");
    }

    #[test]
    fn missing_file_opens_empty_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("saves.json");
        let store = JsonFileConfigurationStore::open(&path).unwrap();
        assert!(store.list().unwrap().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn creates_parent_directories_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("saves.json");
        let mut store = JsonFileConfigurationStore::open(&path).unwrap();
        store.save("FIIs", "1000", &[]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn delete_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saves.json");
        let mut store = JsonFileConfigurationStore::open(&path).unwrap();
        store.save("FIIs", "1000", &[]).unwrap();
        store.delete("FIIs").unwrap();

        let reopened = JsonFileConfigurationStore::open(&path).unwrap();
        assert!(reopened.list().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saves.json");
        std::fs::write(&path, "garbage").unwrap();
        let err = JsonFileConfigurationStore::open(&path).unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn session_slot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut session = JsonFileSessionStore::new(&path);
        assert_eq!(session.load().unwrap(), None);

        let state = SessionState {
            goal: "750".into(),
            assets: sample_assets(),
        };
        session.save(&state).unwrap();
        assert!(path.exists());

        let reopened = JsonFileSessionStore::new(&path);
        assert_eq!(reopened.load().unwrap(), Some(state));
    }

    #[test]
    fn session_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut session = JsonFileSessionStore::new(&path);
        session.save(&SessionState::default()).unwrap();
        session.clear().unwrap();
        assert!(!path.exists());

        // Clearing an absent slot is fine
        session.clear().unwrap();
        assert_eq!(session.load().unwrap(), None);
    }
}
