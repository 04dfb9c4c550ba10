//! # Invariant Errors

use thiserror::Error;

/// Result type for invariant checks
pub type InvariantResult<T> = Result<T, InvariantCheckError>;

/// Raised when an invariant cannot produce a verdict for an instance.
///
/// A `false` verdict is not an error. This type covers the case where the
/// check itself blew up, and keeps enough context to diagnose it later.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantCheckError {
    #[error("Invariant checking failed. Instance: {instance}, invariant: {invariant}")]
    Violated {
        /// Rendered offending instance
        instance: String,
        /// Description of the invariant that failed
        invariant: String,
    },

    #[error("Invariant checking failed: {0}")]
    Failed(String),
}

impl InvariantCheckError {
    /// Create an error carrying the offending instance and invariant
    pub fn violated(instance: &dyn std::fmt::Debug, invariant: impl Into<String>) -> Self {
        InvariantCheckError::Violated {
            instance: format!("{:?}", instance),
            invariant: invariant.into(),
        }
    }

    /// Create an error with a free-form message
    pub fn failed(message: impl Into<String>) -> Self {
        InvariantCheckError::Failed(message.into())
    }

    /// Rendered instance, if the error carries one
    pub fn instance(&self) -> Option<&str> {
        match self {
            InvariantCheckError::Violated { instance, .. } => Some(instance),
            InvariantCheckError::Failed(_) => None,
        }
    }

    /// Invariant description, if the error carries one
    pub fn invariant(&self) -> Option<&str> {
        match self {
            InvariantCheckError::Violated { invariant, .. } => Some(invariant),
            InvariantCheckError::Failed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violated_carries_context() {
        let err = InvariantCheckError::violated(&42u32, "positive");
        assert_eq!(err.instance(), Some("42"));
        assert_eq!(err.invariant(), Some("positive"));

        let display = err.to_string();
        assert!(display.contains("Instance: 42"));
        assert!(display.contains("invariant: positive"));
    }

    #[test]
    fn test_failed_has_no_context() {
        let err = InvariantCheckError::failed("boom");
        assert!(err.instance().is_none());
        assert!(err.invariant().is_none());
        assert_eq!(err.to_string(), "Invariant checking failed: boom");
    }
}
