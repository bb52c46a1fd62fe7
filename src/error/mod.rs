//! Error handling for the monitoring core.

use std::fmt;

/// Specialized error type for the monitoring core
#[derive(Debug, thiserror::Error)]
pub enum NephrologError {
    /// A mandatory input was missing or malformed
    #[error("validation error on `{field}`: {message}")]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// A referenced entity does not exist in the store
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind (patient, alert, action, ...)
        entity: &'static str,
        /// The id that failed to resolve
        id: String,
    },

    /// An operation was attempted against an entity in the wrong state
    #[error("state conflict on {entity} {id}: expected {expected}, found {actual}")]
    StateConflict {
        /// Entity kind
        entity: &'static str,
        /// The id of the conflicting entity
        id: String,
        /// State the operation required
        expected: String,
        /// State actually found
        actual: String,
    },

    /// Stored data violates an ordering or referential invariant
    #[error("data integrity violation: {0}")]
    DataIntegrity(String),

    /// The durable store failed; possibly transient
    #[error("storage error: {0}")]
    Storage(String),
}

impl NephrologError {
    /// Create a validation error for a named field
    pub fn validation(field: &'static str, message: impl fmt::Display) -> Self {
        Self::Validation {
            field,
            message: message.to_string(),
        }
    }

    /// Create a not-found error for an entity kind and id
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Create a state-conflict error carrying expected vs. actual state
    pub fn state_conflict(
        entity: &'static str,
        id: impl Into<String>,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        Self::StateConflict {
            entity,
            id: id.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Whether a scan may retry the failed per-patient unit
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Result type for monitoring-core operations
pub type Result<T> = std::result::Result<T, NephrologError>;
