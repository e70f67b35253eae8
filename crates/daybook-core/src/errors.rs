//! Error types for the daybook entity model.
//!
//! Storage and reconciliation errors live in `daybook-sync`; the binary
//! converges everything into `anyhow`.

use thiserror::Error;

/// Errors raised by entity construction and mutation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A field value violates its constraint. Never silently clamped.
    #[error("Validation error on '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// An entity with the same identity already exists in its collection.
    #[error("Duplicate {entity_type} id: {id}")]
    Duplicate { entity_type: String, id: String },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Whether this error came from a constraint check on user-supplied data.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Duplicate { .. })
    }
}
