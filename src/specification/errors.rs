//! Specification error types
//!
//! Error codes:
//! - SPEC_EVALUATION_FAILED
//! - SPEC_CONSTRUCTION_FAILED
//! - SPEC_COMPOSITION_FAILED
//! - SPEC_UNIQUENESS_VIOLATION
//! - SPEC_CONFIG_INVALID
//!
//! Every failure is synchronous, local and non-retryable. Each one points
//! at a programming or configuration defect.

use std::fmt;

use crate::identity::Discriminant;
use crate::invariant::InvariantCheckError;

/// Specification error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecificationErrorCode {
    /// A predicate failed while evaluating an instance
    SpecEvaluationFailed,
    /// Builder state could not be materialized
    SpecConstructionFailed,
    /// Operands of a composition do not fit together
    SpecCompositionFailed,
    /// An identity is already registered
    SpecUniquenessViolation,
    /// Provider configuration rejected
    SpecConfigInvalid,
}

impl SpecificationErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SpecificationErrorCode::SpecEvaluationFailed => "SPEC_EVALUATION_FAILED",
            SpecificationErrorCode::SpecConstructionFailed => "SPEC_CONSTRUCTION_FAILED",
            SpecificationErrorCode::SpecCompositionFailed => "SPEC_COMPOSITION_FAILED",
            SpecificationErrorCode::SpecUniquenessViolation => "SPEC_UNIQUENESS_VIOLATION",
            SpecificationErrorCode::SpecConfigInvalid => "SPEC_CONFIG_INVALID",
        }
    }
}

impl fmt::Display for SpecificationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Specification error with full context
#[derive(Debug, Clone)]
pub struct SpecificationError {
    /// Error code
    code: SpecificationErrorCode,
    /// Human-readable message
    message: String,
    /// Description of the specification involved, if any
    specification: Option<String>,
    /// Colliding identity for uniqueness violations
    spec_id: Option<Discriminant>,
    /// Underlying invariant failure for evaluation errors
    source: Option<InvariantCheckError>,
}

impl SpecificationError {
    fn new(code: SpecificationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            specification: None,
            spec_id: None,
            source: None,
        }
    }

    /// A predicate failed while evaluating an instance
    pub fn evaluation_failed(specification: impl Into<String>, source: InvariantCheckError) -> Self {
        let specification = specification.into();
        let instance = source.instance().unwrap_or("<unrendered>").to_string();
        Self {
            specification: Some(specification.clone()),
            source: Some(source),
            ..Self::new(
                SpecificationErrorCode::SpecEvaluationFailed,
                format!(
                    "Instance does not satisfy specification. Instance: {}, specification: {}",
                    instance, specification
                ),
            )
        }
    }

    /// Builder state could not be materialized
    pub fn construction(message: impl Into<String>) -> Self {
        Self::new(SpecificationErrorCode::SpecConstructionFailed, message)
    }

    /// Builder failed its readiness check
    pub fn not_ready(builder: impl Into<String>, source: InvariantCheckError) -> Self {
        Self {
            source: Some(source),
            ..Self::construction(format!("Invalid builder's state: {}", builder.into()))
        }
    }

    /// Operands of a composition do not fit together
    pub fn composition(reason: impl Into<String>, operands: &[String]) -> Self {
        Self::new(
            SpecificationErrorCode::SpecCompositionFailed,
            format!(
                "Unable to combine specifications from array: [{}]: {}",
                operands.join(", "),
                reason.into()
            ),
        )
    }

    /// An identity is already registered
    pub fn uniqueness(spec_id: Discriminant, existing: impl Into<String>) -> Self {
        Self {
            spec_id: Some(spec_id.clone()),
            specification: Some(existing.into()),
            ..Self::new(
                SpecificationErrorCode::SpecUniquenessViolation,
                format!("Specification id '{}' is already registered", spec_id),
            )
        }
    }

    /// Provider configuration rejected
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(SpecificationErrorCode::SpecConfigInvalid, message)
    }

    /// Returns the error code
    pub fn code(&self) -> SpecificationErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the specification involved, if any
    pub fn specification(&self) -> Option<&str> {
        self.specification.as_deref()
    }

    /// Returns the colliding identity, if any
    pub fn spec_id(&self) -> Option<&Discriminant> {
        self.spec_id.as_ref()
    }

    /// Returns the underlying invariant failure, if any
    pub fn invariant_error(&self) -> Option<&InvariantCheckError> {
        self.source.as_ref()
    }

    /// No failure in this domain is transient
    pub fn is_retryable(&self) -> bool {
        false
    }
}

impl fmt::Display for SpecificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for SpecificationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<SpecificationError> for InvariantCheckError {
    fn from(err: SpecificationError) -> Self {
        match err.source {
            Some(source) => source,
            None => InvariantCheckError::failed(err.to_string()),
        }
    }
}

/// Result type for specification operations
pub type SpecResult<T> = Result<T, SpecificationError>;
