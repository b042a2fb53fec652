//! Seeded topic and lesson cache.
//!
//! Answers "do we already have this content" before any remote call is made.
//! Persisted entries are loaded once, the [`StaticSeed`] is laid over them,
//! and every put rewrites the whole mapping to storage. Storage faults are
//! logged and never reach the caller.

use crate::persist::{load_map, save_map, Storage, THEORY_ENTRY, TOPICS_ENTRY};
use crate::seed::StaticSeed;
use crate::subject::Subject;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

type TopicMap = BTreeMap<Subject, Vec<String>>;
type TheoryMap = BTreeMap<Subject, BTreeMap<String, String>>;

/// Key of a single lesson. The topic is compared verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TheoryKey {
    pub subject: Subject,
    pub topic: String,
}

impl TheoryKey {
    pub fn new(subject: Subject, topic: impl Into<String>) -> Self {
        Self {
            subject,
            topic: topic.into(),
        }
    }
}

impl fmt::Display for TheoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.subject.id(), self.topic)
    }
}

/// The active in-memory cache plus the storage it mirrors to.
pub struct SeededCache {
    storage: Box<dyn Storage>,
    topics: TopicMap,
    theory: TheoryMap,
    seeded_topics: BTreeSet<Subject>,
    seeded_theory: BTreeSet<TheoryKey>,
}

impl SeededCache {
    /// Load persisted entries and overlay `seed` on top of them.
    ///
    /// Missing or unreadable entries start out empty.
    pub fn initialize(storage: Box<dyn Storage>, seed: StaticSeed) -> Self {
        let mut topics: TopicMap = load_by_subject(storage.as_ref(), TOPICS_ENTRY);
        let mut theory: TheoryMap = load_by_subject(storage.as_ref(), THEORY_ENTRY);

        let mut seeded_topics = BTreeSet::new();
        for (subject, list) in seed.topics() {
            topics.insert(*subject, list.clone());
            seeded_topics.insert(*subject);
        }

        let mut seeded_theory = BTreeSet::new();
        for (key, text) in seed.theory() {
            theory
                .entry(key.subject)
                .or_default()
                .insert(key.topic.clone(), text.clone());
            seeded_theory.insert(key.clone());
        }

        let cache = Self {
            storage,
            topics,
            theory,
            seeded_topics,
            seeded_theory,
        };

        tracing::info!(
            topic_lists = cache.topics.len(),
            lessons = cache.theory_len(),
            seeded_lessons = cache.seeded_theory.len(),
            "lesson cache initialized"
        );

        cache
    }

    /// Topic index for `subject`, or `None` on a miss.
    pub fn get_topics(&self, subject: Subject) -> Option<&[String]> {
        let hit = self.topics.get(&subject).map(Vec::as_slice);
        tracing::debug!(subject = subject.id(), hit = hit.is_some(), "topic lookup");
        hit
    }

    /// Store a freshly fetched topic index. Seeded subjects keep their seed.
    pub fn put_topics(&mut self, subject: Subject, topics: Vec<String>) {
        if self.seeded_topics.contains(&subject) {
            tracing::debug!(subject = subject.id(), "ignoring put over seeded topic list");
            return;
        }
        self.topics.insert(subject, topics);
        if let Err(e) = save_map(self.storage.as_ref(), TOPICS_ENTRY, &self.topics) {
            tracing::warn!(error = %e, "failed to persist topic lists");
        }
    }

    /// Lesson text for `key`, or `None` on a miss.
    pub fn get_theory(&self, key: &TheoryKey) -> Option<&str> {
        let hit = self
            .theory
            .get(&key.subject)
            .and_then(|lessons| lessons.get(&key.topic))
            .map(String::as_str);
        tracing::debug!(key = %key, hit = hit.is_some(), "lesson lookup");
        hit
    }

    /// Store a freshly fetched lesson. Seeded lessons keep their seed.
    pub fn put_theory(&mut self, key: TheoryKey, text: impl Into<String>) {
        if self.seeded_theory.contains(&key) {
            tracing::debug!(key = %key, "ignoring put over seeded lesson");
            return;
        }
        self.theory
            .entry(key.subject)
            .or_default()
            .insert(key.topic, text.into());
        if let Err(e) = save_map(self.storage.as_ref(), THEORY_ENTRY, &self.theory) {
            tracing::warn!(error = %e, "failed to persist lessons");
        }
    }

    pub fn is_seeded_topics(&self, subject: Subject) -> bool {
        self.seeded_topics.contains(&subject)
    }

    pub fn is_seeded_theory(&self, key: &TheoryKey) -> bool {
        self.seeded_theory.contains(key)
    }

    /// Number of subjects with a cached topic index.
    pub fn topic_subjects_len(&self) -> usize {
        self.topics.len()
    }

    /// Number of cached lessons across all subjects.
    pub fn theory_len(&self) -> usize {
        self.theory.values().map(BTreeMap::len).sum()
    }
}

/// Load a subject-keyed entry. Keys that are not a subject id are skipped,
/// anything else unreadable yields an empty map.
fn load_by_subject<V>(storage: &dyn Storage, name: &str) -> BTreeMap<Subject, V>
where
    V: serde::de::DeserializeOwned,
{
    let raw: BTreeMap<String, V> = match load_map(storage, name) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!(entry = name, error = %e, "could not load cache entry, starting empty");
            return BTreeMap::new();
        }
    };

    raw.into_iter()
        .filter_map(|(key, value)| match Subject::from_id(&key) {
            Some(subject) => Some((subject, value)),
            None => {
                tracing::warn!(entry = name, key = %key, "skipping unknown subject in cache entry");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStorage;
    use crate::testing::FailingStorage;

    fn seed() -> StaticSeed {
        StaticSeed::empty()
            .with_topics(
                Subject::Physics,
                vec!["Kinematics".to_string(), "Waves".to_string()],
            )
            .with_theory(TheoryKey::new(Subject::Physics, "Waves"), "# Waves\nSeeded.")
    }

    #[test]
    fn test_seed_overrides_persisted_values() {
        let storage = MemoryStorage::with_entries([
            (TOPICS_ENTRY, r#"{"physics": ["Stale"], "chemistry": ["Gases"]}"#),
            (
                THEORY_ENTRY,
                r##"{"physics": {"Waves": "# Old", "Optics": "# Optics"}}"##,
            ),
        ]);

        let cache = SeededCache::initialize(Box::new(storage), seed());

        assert_eq!(
            cache.get_topics(Subject::Physics).unwrap(),
            &["Kinematics".to_string(), "Waves".to_string()]
        );
        assert_eq!(
            cache.get_topics(Subject::Chemistry).unwrap(),
            &["Gases".to_string()]
        );
        assert_eq!(
            cache.get_theory(&TheoryKey::new(Subject::Physics, "Waves")),
            Some("# Waves\nSeeded.")
        );
        assert_eq!(
            cache.get_theory(&TheoryKey::new(Subject::Physics, "Optics")),
            Some("# Optics")
        );
    }

    #[test]
    fn test_put_then_get_is_stable() {
        let mut cache = SeededCache::initialize(Box::new(MemoryStorage::new()), seed());
        let key = TheoryKey::new(Subject::Mathematics, "Limits");

        assert!(cache.get_theory(&key).is_none());
        cache.put_theory(key.clone(), "# Limits");

        assert_eq!(cache.get_theory(&key), Some("# Limits"));
        assert_eq!(cache.get_theory(&key), Some("# Limits"));
    }

    #[test]
    fn test_put_over_seed_is_ignored() {
        let mut cache = SeededCache::initialize(Box::new(MemoryStorage::new()), seed());

        cache.put_topics(Subject::Physics, vec!["Replaced".to_string()]);
        cache.put_theory(TheoryKey::new(Subject::Physics, "Waves"), "# Replaced");

        assert_eq!(cache.get_topics(Subject::Physics).unwrap().len(), 2);
        assert_eq!(
            cache.get_theory(&TheoryKey::new(Subject::Physics, "Waves")),
            Some("# Waves\nSeeded.")
        );
    }

    #[test]
    fn test_topic_keys_are_exact() {
        let mut cache = SeededCache::initialize(Box::new(MemoryStorage::new()), seed());
        cache.put_theory(TheoryKey::new(Subject::Chemistry, "Gases"), "# Gases");

        assert!(cache
            .get_theory(&TheoryKey::new(Subject::Chemistry, "gases"))
            .is_none());
        assert!(cache
            .get_theory(&TheoryKey::new(Subject::Chemistry, "Gases "))
            .is_none());
        assert!(cache
            .get_theory(&TheoryKey::new(Subject::Physics, "Gases"))
            .is_none());
    }

    #[test]
    fn test_write_failure_keeps_memory_value() {
        let mut cache = SeededCache::initialize(Box::new(FailingStorage::new()), seed());

        cache.put_topics(Subject::Chemistry, vec!["Gases".to_string()]);
        cache.put_theory(TheoryKey::new(Subject::Chemistry, "Gases"), "# Gases");

        assert_eq!(
            cache.get_topics(Subject::Chemistry).unwrap(),
            &["Gases".to_string()]
        );
        assert_eq!(
            cache.get_theory(&TheoryKey::new(Subject::Chemistry, "Gases")),
            Some("# Gases")
        );
    }

    #[test]
    fn test_read_failure_still_applies_seed() {
        let cache = SeededCache::initialize(Box::new(FailingStorage::new()), seed());
        assert!(cache.is_seeded_topics(Subject::Physics));
        assert_eq!(cache.topic_subjects_len(), 1);
        assert_eq!(cache.theory_len(), 1);
    }

    #[test]
    fn test_corrupt_entry_starts_empty() {
        let storage = MemoryStorage::with_entries([(TOPICS_ENTRY, "[1, 2")]);
        let cache = SeededCache::initialize(Box::new(storage), StaticSeed::empty());
        assert!(cache.get_topics(Subject::Mathematics).is_none());
    }

    #[test]
    fn test_unknown_subject_key_is_skipped() {
        let storage = MemoryStorage::with_entries([(
            TOPICS_ENTRY,
            r#"{"biology": ["Cells"], "physics": ["Optics", "Waves"]}"#,
        )]);
        let cache = SeededCache::initialize(Box::new(storage), StaticSeed::empty());

        assert_eq!(
            cache.get_topics(Subject::Physics),
            Some(&["Optics".to_string(), "Waves".to_string()][..])
        );
        assert_eq!(cache.topic_subjects_len(), 1);
    }

    #[test]
    fn test_put_rewrites_full_mapping() {
        let storage = std::sync::Arc::new(MemoryStorage::new());
        let mut cache = SeededCache::initialize(
            Box::new(crate::testing::SharedStorage(storage.clone())),
            StaticSeed::empty(),
        );

        cache.put_theory(TheoryKey::new(Subject::Physics, "Optics"), "# Optics");
        cache.put_theory(TheoryKey::new(Subject::Chemistry, "Gases"), "# Gases");

        let raw = storage.raw(THEORY_ENTRY).expect("theory entry written");
        let parsed: TheoryMap = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed[&Subject::Physics]["Optics"], "# Optics");
        assert_eq!(parsed[&Subject::Chemistry]["Gases"], "# Gases");
    }

    #[test]
    fn test_key_display_joins_subject_and_topic() {
        let key = TheoryKey::new(Subject::Mathematics, "Limits");
        assert_eq!(key.to_string(), "mathematics-Limits");
    }
}
