use serde::{Deserialize, Serialize};

use crate::ids::SampleId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Map a free-form technical level onto a tier. Unknown levels get `Basic`.
    pub fn for_technical_level(level: &str) -> Self {
        match level.trim().to_ascii_lowercase().as_str() {
            "beginner" => Difficulty::Basic,
            "intermediate" => Difficulty::Intermediate,
            "advanced" => Difficulty::Advanced,
            _ => Difficulty::Basic,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Difficulty::Basic => 0,
            Difficulty::Intermediate => 1,
            Difficulty::Advanced => 2,
        }
    }

    /// Exactly one tier apart.
    pub fn is_adjacent_to(&self, other: Difficulty) -> bool {
        self.rank().abs_diff(other.rank()) == 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataHighlight {
    pub field: String,
    pub value: String,
    pub explanation: String,
    pub importance: Importance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleFile {
    pub id: SampleId,
    pub name: String,
    pub description: String,
    pub file_type: String,
    pub difficulty: Difficulty,
    pub use_cases: Vec<String>,
    pub tags: Vec<String>,
    pub highlights: Vec<MetadataHighlight>,
    pub learning_points: Vec<String>,
    pub common_uses: Vec<String>,
}

/// Caller-supplied description of who is being onboarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub use_case: String,
    pub technical_level: String,
    #[serde(default)]
    pub file_types: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub industry: Option<String>,
}
