//! Specifications
//!
//! A specification binds a predicate to a subject type and an optional
//! identity. Specifications are immutable, compose through a boolean
//! algebra, and are only ever materialized by a `SpecificationProvider`.
//!
//! - `spec`: the base specification and its comparison regimes
//! - `kind`: concrete specification types and the composition algebra
//! - `builder`: staging state and its readiness rule
//! - `provider`: materialization and identity uniqueness
//! - `registry`: ids taken per provider

mod builder;
mod config;
mod errors;
mod kind;
mod provider;
mod registry;
mod spec;

pub use builder::{Readiness, SpecificationBuilder};
pub use config::ProviderConfig;
pub use errors::{SpecResult, SpecificationError, SpecificationErrorCode};
pub use kind::{AnySpecification, SpecKind};
pub use provider::SpecificationProvider;
pub use registry::SpecRegistry;
pub use spec::{CompareApproach, Specification};
