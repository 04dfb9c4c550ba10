//! # Identity
//!
//! Type tags and enumerated identities.
//!
//! - [`Subject`] tags the type a specification evaluates
//! - [`SpecType`] tags the concrete specification type materialized
//! - [`SpecId`] is the enumerated identity used for equality and
//!   registry keys, canonical in its [`Discriminant`]

mod spec_id;
mod subject;

pub use spec_id::{same_identity, Discriminant, SpecId, TypedSpecId};
pub use subject::{SpecType, Subject};
