//! Cache persistence through real files.

use tempfile::TempDir;
use tutor_core::persist::{THEORY_ENTRY, TOPICS_ENTRY};
use tutor_core::{FileStorage, SeededCache, StaticSeed, Storage, Subject, TheoryKey};

fn small_seed() -> StaticSeed {
    StaticSeed::empty()
        .with_topics(Subject::Mathematics, vec!["Limits".to_string()])
        .with_theory(TheoryKey::new(Subject::Mathematics, "Limits"), "# Limits")
}

#[test]
fn test_runtime_entries_survive_restart() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    {
        let mut cache =
            SeededCache::initialize(Box::new(FileStorage::new(temp_dir.path())), small_seed());
        cache.put_topics(
            Subject::Chemistry,
            vec!["Gases".to_string(), "Solutions".to_string()],
        );
        cache.put_theory(TheoryKey::new(Subject::Chemistry, "Gases"), "# Gases\nPV = nRT");
    }

    let cache = SeededCache::initialize(Box::new(FileStorage::new(temp_dir.path())), small_seed());

    assert_eq!(
        cache.get_topics(Subject::Chemistry).unwrap(),
        &["Gases".to_string(), "Solutions".to_string()]
    );
    assert_eq!(
        cache.get_theory(&TheoryKey::new(Subject::Chemistry, "Gases")),
        Some("# Gases\nPV = nRT")
    );
    assert_eq!(
        cache.get_theory(&TheoryKey::new(Subject::Mathematics, "Limits")),
        Some("# Limits")
    );
}

#[test]
fn test_seed_wins_over_persisted_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage = FileStorage::new(temp_dir.path());
    storage
        .write(TOPICS_ENTRY, r#"{"mathematics": ["Old", "List"]}"#)
        .unwrap();
    storage
        .write(THEORY_ENTRY, r##"{"mathematics": {"Limits": "# Stale"}}"##)
        .unwrap();

    let cache = SeededCache::initialize(Box::new(storage), small_seed());

    assert_eq!(
        cache.get_topics(Subject::Mathematics).unwrap(),
        &["Limits".to_string()]
    );
    assert_eq!(
        cache.get_theory(&TheoryKey::new(Subject::Mathematics, "Limits")),
        Some("# Limits")
    );
}

#[test]
fn test_corrupt_file_degrades_to_seed_only() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(temp_dir.path().join("theory.json"), "{ definitely not json").unwrap();
    std::fs::write(temp_dir.path().join("topics.json"), "[]").unwrap();

    let mut cache =
        SeededCache::initialize(Box::new(FileStorage::new(temp_dir.path())), small_seed());

    assert_eq!(cache.theory_len(), 1);
    assert_eq!(cache.topic_subjects_len(), 1);

    // A put after a corrupt load rewrites the file with valid JSON.
    cache.put_theory(TheoryKey::new(Subject::Physics, "Optics"), "# Optics");
    let contents = std::fs::read_to_string(temp_dir.path().join("theory.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["physics"]["Optics"], "# Optics");
}

#[test]
fn test_topic_order_preserved_on_disk() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let topics: Vec<String> = ["Waves", "Kinematics", "Optics", "Acoustics"]
        .iter()
        .map(|t| t.to_string())
        .collect();

    {
        let mut cache = SeededCache::initialize(
            Box::new(FileStorage::new(temp_dir.path())),
            StaticSeed::empty(),
        );
        cache.put_topics(Subject::Physics, topics.clone());
    }

    let cache = SeededCache::initialize(
        Box::new(FileStorage::new(temp_dir.path())),
        StaticSeed::empty(),
    );
    assert_eq!(cache.get_topics(Subject::Physics).unwrap(), topics.as_slice());
}

#[test]
fn test_unwritable_directory_keeps_memory_value() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let blocker = temp_dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file in the way").unwrap();

    let mut cache = SeededCache::initialize(Box::new(FileStorage::new(&blocker)), small_seed());
    cache.put_theory(TheoryKey::new(Subject::Physics, "Optics"), "# Optics");

    assert_eq!(
        cache.get_theory(&TheoryKey::new(Subject::Physics, "Optics")),
        Some("# Optics")
    );
}
