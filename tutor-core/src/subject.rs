//! Subjects, their display profiles, and quiz difficulty levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the academic domains the tutor supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Mathematics,
    Physics,
    Chemistry,
}

impl Subject {
    /// All subjects, in home-screen order.
    pub const ALL: [Subject; 3] = [Subject::Mathematics, Subject::Physics, Subject::Chemistry];

    /// Stable identifier used in storage and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            Subject::Mathematics => "mathematics",
            Subject::Physics => "physics",
            Subject::Chemistry => "chemistry",
        }
    }

    /// Exact inverse of [`Subject::id`], without the aliases `FromStr` accepts.
    pub fn from_id(id: &str) -> Option<Subject> {
        Subject::ALL.into_iter().find(|s| s.id() == id)
    }

    pub fn name(&self) -> &'static str {
        self.profile().name
    }

    pub fn profile(&self) -> SubjectProfile {
        match self {
            Subject::Mathematics => SubjectProfile {
                subject: *self,
                name: "Mathematics",
                icon: "📐",
                tagline: "Explore the world of mathematics.",
            },
            Subject::Physics => SubjectProfile {
                subject: *self,
                name: "Physics",
                icon: "⚡",
                tagline: "Explore the world of physics.",
            },
            Subject::Chemistry => SubjectProfile {
                subject: *self,
                name: "Chemistry",
                icon: "🧪",
                tagline: "Explore the world of chemistry.",
            },
        }
    }

    /// Position in [`Subject::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Subject::Mathematics => 0,
            Subject::Physics => 1,
            Subject::Chemistry => 2,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
#[error("unknown subject `{0}` (expected mathematics, physics or chemistry)")]
pub struct UnknownSubject(pub String);

impl FromStr for Subject {
    type Err = UnknownSubject;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mathematics" | "maths" | "math" => Ok(Subject::Mathematics),
            "physics" | "phys" => Ok(Subject::Physics),
            "chemistry" | "chem" => Ok(Subject::Chemistry),
            _ => Err(UnknownSubject(s.to_string())),
        }
    }
}

/// Fixed presentation record for a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubjectProfile {
    pub subject: Subject,
    pub name: &'static str,
    pub icon: &'static str,
    pub tagline: &'static str,
}

/// Quiz difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "e" | "1" => Ok(Difficulty::Easy),
            "medium" | "m" | "2" => Ok(Difficulty::Medium),
            "hard" | "h" | "3" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty `{other}`")),
        }
    }
}
