//! Skill entity model.

use serde::{Deserialize, Serialize};

use blog_core::error::AppError;
use blog_core::result::AppResult;

use super::proficiency::ProficiencyLevel;

/// A skill shown on the author's skill table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    /// Store-assigned identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Optional icon URL.
    #[serde(default)]
    pub icon_url: Option<String>,
    /// Skill name.
    pub name: String,
    /// Capability group the skill belongs to (e.g. "Backend").
    pub capability: String,
    /// Proficiency level.
    pub proficiency_level: ProficiencyLevel,
}

impl Skill {
    /// Create a new skill.
    pub fn create(
        name: &str,
        icon_url: Option<String>,
        capability: &str,
        proficiency_level: ProficiencyLevel,
    ) -> AppResult<Self> {
        if name.trim().is_empty() {
            return Err(AppError::validation("Skill name must not be empty"));
        }
        if capability.trim().is_empty() {
            return Err(AppError::validation("Skill capability must not be empty"));
        }

        Ok(Self {
            id: None,
            icon_url: icon_url.filter(|url| !url.trim().is_empty()),
            name: name.trim().to_string(),
            capability: capability.trim().to_string(),
            proficiency_level,
        })
    }

    /// Change the proficiency level.
    pub fn set_proficiency_level(&mut self, level: ProficiencyLevel) {
        self.proficiency_level = level;
    }
}

impl_entity!(Skill, "skills");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_trims_and_drops_blank_icon() {
        let skill = Skill::create(" Rust ", Some(" ".into()), "Backend", ProficiencyLevel::Expert)
            .unwrap();
        assert_eq!(skill.name, "Rust");
        assert!(skill.icon_url.is_none());
    }

    #[test]
    fn test_create_requires_capability() {
        assert!(Skill::create("Rust", None, "", ProficiencyLevel::Familiar).is_err());
    }

    #[test]
    fn test_set_proficiency_level() {
        let mut skill = Skill::create("Rust", None, "Backend", ProficiencyLevel::Familiar).unwrap();
        skill.set_proficiency_level(ProficiencyLevel::Proficient);
        assert_eq!(skill.proficiency_level, ProficiencyLevel::Proficient);
    }
}
