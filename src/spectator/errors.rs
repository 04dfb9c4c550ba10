//! # Capability Errors

use thiserror::Error;

use crate::identity::Subject;

/// Result type for capability lookups
pub type CapabilityResult<T> = Result<T, CapabilityError>;

/// Raised when a spectator cannot present itself as the requested type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("Operation is not supported for this type: {requested}")]
    Unsupported {
        /// The type that was asked for
        requested: Subject,
    },
}

impl CapabilityError {
    /// Create an unsupported-capability error for `U`
    pub fn unsupported<U: ?Sized + 'static>() -> Self {
        CapabilityError::Unsupported {
            requested: Subject::of::<U>(),
        }
    }

    /// The type that was asked for
    pub fn requested(&self) -> Subject {
        match self {
            CapabilityError::Unsupported { requested } => *requested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Invoice;

    #[test]
    fn test_unsupported_names_requested_type() {
        let err = CapabilityError::unsupported::<Invoice>();
        assert!(err.requested().is::<Invoice>());
        assert_eq!(err.to_string(), "Operation is not supported for this type: Invoice");
    }
}
