//! specula - Composable, identity-aware business rule specifications
//!
//! A specification is a predicate bound to a subject type, optionally
//! carrying an identity. Specifications compose with `and`, `or`, `not`
//! and `compose`; user-defined specification types survive composition.
//! Identified specifications are unique per provider.

pub mod identity;
pub mod invariant;
pub mod observability;
pub mod specification;
pub mod spectator;

pub use identity::{same_identity, Discriminant, SpecId, SpecType, Subject, TypedSpecId};
pub use invariant::{Invariant, InvariantCheckError, InvariantResult, PredicateInvariant};
pub use specification::{
    AnySpecification, CompareApproach, ProviderConfig, SpecKind, SpecResult, Specification,
    SpecificationBuilder, SpecificationError, SpecificationErrorCode, SpecificationProvider,
};
pub use spectator::{CapabilityError, Spectator};
