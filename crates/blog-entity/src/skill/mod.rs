//! Skill domain entity.

pub mod model;
pub mod proficiency;

pub use model::Skill;
pub use proficiency::ProficiencyLevel;
