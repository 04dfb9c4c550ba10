//! Concrete specification types
//!
//! A domain can define its own specification types (for example
//! `PaidOrders`) that wrap a base [`Specification`]. Implementing
//! [`SpecKind`] is the only thing such a type has to do: the provider
//! materializes a base specification from builder state and hands it to
//! `from_spec`, and the boolean algebra is inherited from the trait. The
//! result of `and`/`or`/`not` is always `Self`, so a specialized type
//! stays specialized after composition.

use std::any::Any;

use super::builder::SpecificationBuilder;
use super::errors::SpecResult;
use super::provider::SpecificationProvider;
use super::spec::{Rule, Specification};
use crate::identity::{Discriminant, SpecType, Subject};

/// A concrete specification type over `Subject`
pub trait SpecKind: Clone + Send + Sync + 'static {
    /// Type the specification evaluates
    type Subject: 'static;

    /// Population step: adopt a freshly materialized base specification
    ///
    /// Returning an error aborts the build; the id, if any, is not
    /// registered.
    fn from_spec(spec: Specification<Self::Subject>) -> SpecResult<Self>;

    /// The wrapped base specification
    fn as_spec(&self) -> &Specification<Self::Subject>;

    /// Evaluate against `instance`
    fn is_satisfied_by(&self, instance: &Self::Subject) -> SpecResult<bool> {
        self.as_spec().is_satisfied_by(instance)
    }

    /// Builder pre-populated with this specification's subject, provider
    /// and concrete type
    fn builder(&self) -> SpecificationBuilder<Self::Subject, Self> {
        let spec = self.as_spec();
        SpecificationBuilder::new(spec.provider().clone()).with_subject(spec.subject())
    }

    /// Conjunction, short-circuiting on `self`
    fn and<O>(&self, other: &O) -> SpecResult<Self>
    where
        O: SpecKind<Subject = Self::Subject>,
    {
        let rule = Rule::And(self.as_spec().clone(), other.as_spec().clone());
        self.builder().with_rule(rule).build()
    }

    /// Disjunction, short-circuiting on `self`
    fn or<O>(&self, other: &O) -> SpecResult<Self>
    where
        O: SpecKind<Subject = Self::Subject>,
    {
        let rule = Rule::Or(self.as_spec().clone(), other.as_spec().clone());
        self.builder().with_rule(rule).build()
    }

    /// Negation
    fn not(&self) -> SpecResult<Self> {
        let rule = Rule::Not(self.as_spec().clone());
        self.builder().with_rule(rule).build()
    }
}

impl<T: 'static> SpecKind for Specification<T> {
    type Subject = T;

    fn from_spec(spec: Specification<T>) -> SpecResult<Self> {
        Ok(spec)
    }

    fn as_spec(&self) -> &Specification<T> {
        self
    }
}

/// Type-erased view of any specification
///
/// Lets operands over different subject types sit in one slice, which is
/// what `Specification::compose` checks.
pub trait AnySpecification: Send + Sync {
    /// Subject type tag
    fn subject(&self) -> Subject;

    /// Concrete specification type tag
    fn spec_type(&self) -> SpecType;

    /// Canonical id value, if identified
    fn id_value(&self) -> Option<Discriminant>;

    /// Provider that materialized the specification
    fn provider(&self) -> &SpecificationProvider;

    /// The wrapped base specification as `&dyn Any`
    fn as_base_any(&self) -> &dyn Any;

    /// Diagnostic rendering
    fn describe(&self) -> String;
}

impl<K: SpecKind> AnySpecification for K {
    fn subject(&self) -> Subject {
        self.as_spec().subject()
    }

    fn spec_type(&self) -> SpecType {
        self.as_spec().spec_type()
    }

    fn id_value(&self) -> Option<Discriminant> {
        self.as_spec().id().map(|id| id.value())
    }

    fn provider(&self) -> &SpecificationProvider {
        self.as_spec().provider()
    }

    fn as_base_any(&self) -> &dyn Any {
        self.as_spec()
    }

    fn describe(&self) -> String {
        self.as_spec().to_string()
    }
}
