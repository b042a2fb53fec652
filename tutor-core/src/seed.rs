//! Built-in lessons that ship with the binary.
//!
//! Every subject has a topic index, and a few topics per subject have a
//! complete lesson, so the tutor is usable without any remote call.

use crate::cache::TheoryKey;
use crate::subject::Subject;
use std::collections::BTreeMap;

const MATHEMATICS_TOPICS: [&str; 8] = [
    "Algebraic Expressions",
    "Linear Equations",
    "Functions",
    "Trigonometry",
    "Limits",
    "Derivatives",
    "Integrals",
    "Probability",
];

const PHYSICS_TOPICS: [&str; 8] = [
    "Kinematics",
    "Newton's Laws",
    "Work and Energy",
    "Momentum",
    "Waves",
    "Electricity",
    "Magnetism",
    "Thermodynamics",
];

const CHEMISTRY_TOPICS: [&str; 8] = [
    "Atomic Structure",
    "The Periodic Table",
    "Chemical Bonding",
    "Stoichiometry",
    "Gases",
    "Solutions",
    "Acids and Bases",
    "Chemical Kinetics",
];

const LESSONS: [(Subject, &str, &str); 6] = [
    (
        Subject::Mathematics,
        "Linear Equations",
        include_str!("../seed/mathematics/linear-equations.md"),
    ),
    (
        Subject::Mathematics,
        "Derivatives",
        include_str!("../seed/mathematics/derivatives.md"),
    ),
    (
        Subject::Physics,
        "Newton's Laws",
        include_str!("../seed/physics/newtons-laws.md"),
    ),
    (Subject::Physics, "Waves", include_str!("../seed/physics/waves.md")),
    (
        Subject::Chemistry,
        "Atomic Structure",
        include_str!("../seed/chemistry/atomic-structure.md"),
    ),
    (
        Subject::Chemistry,
        "Acids and Bases",
        include_str!("../seed/chemistry/acids-and-bases.md"),
    ),
];

/// Fixed content that overrides anything persisted under the same key.
#[derive(Debug, Clone, Default)]
pub struct StaticSeed {
    topics: BTreeMap<Subject, Vec<String>>,
    theory: BTreeMap<TheoryKey, String>,
}

impl StaticSeed {
    /// The curriculum compiled into the crate.
    pub fn builtin() -> Self {
        let mut seed = Self::empty();
        for (subject, topics) in [
            (Subject::Mathematics, &MATHEMATICS_TOPICS),
            (Subject::Physics, &PHYSICS_TOPICS),
            (Subject::Chemistry, &CHEMISTRY_TOPICS),
        ] {
            seed = seed.with_topics(subject, topics.iter().map(|t| t.to_string()).collect());
        }
        for (subject, topic, lesson) in LESSONS {
            seed = seed.with_theory(TheoryKey::new(subject, topic), lesson);
        }
        seed
    }

    /// A seed with no content.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_topics(mut self, subject: Subject, topics: Vec<String>) -> Self {
        self.topics.insert(subject, topics);
        self
    }

    pub fn with_theory(mut self, key: TheoryKey, text: impl Into<String>) -> Self {
        self.theory.insert(key, text.into());
        self
    }

    pub fn topics(&self) -> &BTreeMap<Subject, Vec<String>> {
        &self.topics
    }

    pub fn theory(&self) -> &BTreeMap<TheoryKey, String> {
        &self.theory
    }
}
