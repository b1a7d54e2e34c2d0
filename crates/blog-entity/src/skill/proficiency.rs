//! Skill proficiency level.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use blog_core::error::AppError;

/// How well the author knows a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProficiencyLevel {
    /// Has worked with it.
    Familiar,
    /// Uses it regularly.
    Proficient,
    /// Deep knowledge.
    Expert,
}

impl ProficiencyLevel {
    /// Return the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Familiar => "familiar",
            Self::Proficient => "proficient",
            Self::Expert => "expert",
        }
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProficiencyLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "familiar" => Ok(Self::Familiar),
            "proficient" => Ok(Self::Proficient),
            "expert" => Ok(Self::Expert),
            other => Err(AppError::validation(format!(
                "Unknown proficiency level: {other}"
            ))),
        }
    }
}
