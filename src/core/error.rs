//! Error types for field registry operations

use thiserror::Error;

/// Result type alias for registry and factory operations
pub type Result<T> = std::result::Result<T, FieldError>;

/// Why a field type could not be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedReason {
    /// No definition is registered for the tag
    Unknown,
    /// The attributes carry no type tag at all
    Missing,
}

/// Every failure is local to a single call and leaves the registries untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("form field of type <{field_type}> not supported")]
    UnsupportedType {
        field_type: String,
        reason: UnsupportedReason,
    },

    #[error("form field with id <{0}> already exists")]
    DuplicateId(String),

    #[error("binding path '{0}' is already claimed")]
    PathConflict(String),

    #[error("identifier <{0}> is already claimed")]
    IdConflict(String),

    #[error("parent form field <{0}> does not exist")]
    ParentNotFound(String),

    #[error("form field <{0}> does not exist")]
    FieldNotFound(String),

    #[error("invalid move: {0}")]
    InvalidMove(String),

    #[error("invalid edit: {0}")]
    InvalidEdit(String),

    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}

impl FieldError {
    pub fn unsupported(field_type: impl Into<String>) -> Self {
        let field_type = field_type.into();
        let reason = if field_type.is_empty() {
            UnsupportedReason::Missing
        } else {
            UnsupportedReason::Unknown
        };

        Self::UnsupportedType { field_type, reason }
    }

    /// Builds a path conflict naming the dot-joined path.
    pub fn path_conflict(path: &[String]) -> Self {
        Self::PathConflict(path.join("."))
    }

    /// True for errors caused by a clash with existing registry state, as
    /// opposed to malformed input.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            FieldError::DuplicateId(_) | FieldError::PathConflict(_) | FieldError::IdConflict(_)
        )
    }
}
