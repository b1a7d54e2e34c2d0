//! Projection shapes for list queries.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Which fields of each matched document reach the caller.
///
/// The projected document is deserialized into the caller's target
/// type, so a projection must name every field that type requires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// The whole stored document.
    #[default]
    Identity,
    /// Only the listed top-level fields.
    Fields(Vec<String>),
}

impl Projection {
    /// The whole stored document.
    pub fn identity() -> Self {
        Self::Identity
    }

    /// Only the listed top-level fields, in the given order.
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fields(fields.into_iter().map(Into::into).collect())
    }

    /// Reject projections that select nothing.
    pub fn validate(&self) -> AppResult<()> {
        match self {
            Self::Identity => Ok(()),
            Self::Fields(fields) if fields.is_empty() => Err(AppError::validation(
                "Projection must select at least one field",
            )),
            Self::Fields(fields) => match fields.iter().find(|f| f.trim().is_empty()) {
                Some(_) => Err(AppError::validation("Projection field names must not be blank")),
                None => Ok(()),
            },
        }
    }

    /// The selected field names, or `None` for the identity projection.
    pub fn field_names(&self) -> Option<&[String]> {
        match self {
            Self::Identity => None,
            Self::Fields(fields) => Some(fields),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_projection_is_rejected() {
        let err = Projection::fields(Vec::<String>::new()).validate().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Validation);
    }

    #[test]
    fn test_blank_field_is_rejected() {
        assert!(Projection::fields(["title", " "]).validate().is_err());
    }

    #[test]
    fn test_identity_is_valid() {
        assert!(Projection::identity().validate().is_ok());
        assert!(Projection::identity().field_names().is_none());
    }
}
