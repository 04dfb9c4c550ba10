//! Specification builder
//!
//! Transient accumulator for the state of one specification. `build()` is
//! the only way to turn that state into a live specification, and it
//! always goes through the provider so that the target concrete type `R`
//! is honored and ids are registered.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::errors::{SpecResult, SpecificationError};
use super::kind::SpecKind;
use super::provider::SpecificationProvider;
use super::spec::{CompareApproach, Rule, SpecState, Specification};
use crate::identity::{SpecId, SpecType, Subject};
use crate::invariant::{Invariant, InvariantCheckError, InvariantResult, PredicateInvariant};

/// Staging area for a specification of concrete type `R` over `T`
pub struct SpecificationBuilder<T: 'static, R = Specification<T>> {
    provider: SpecificationProvider,
    subject: Option<Subject>,
    rule: Option<Rule<T>>,
    spec_id: Option<Arc<dyn SpecId<T>>>,
    compare: CompareApproach,
    _target: PhantomData<fn() -> R>,
}

impl<T: 'static, R: SpecKind<Subject = T>> SpecificationBuilder<T, R> {
    /// Empty builder bound to `provider`
    pub fn new(provider: SpecificationProvider) -> Self {
        Self {
            provider,
            subject: None,
            rule: None,
            spec_id: None,
            compare: CompareApproach::Identity,
            _target: PhantomData,
        }
    }

    /// Set the subject type tag
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Set the rule from an infallible predicate
    pub fn with_predicate<F>(self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.with_invariant(PredicateInvariant::new(predicate))
    }

    /// Set the rule from a fallible invariant
    pub fn with_invariant<I>(mut self, invariant: I) -> Self
    where
        I: Invariant<T> + 'static,
    {
        self.rule = Some(Rule::Invariant(Arc::new(invariant)));
        self
    }

    /// Set the identity; switches an IDENTITY builder to EQUALITY
    pub fn with_spec_id<I: SpecId<T>>(mut self, spec_id: I) -> Self {
        self.spec_id = Some(Arc::new(spec_id));
        if self.compare == CompareApproach::Identity {
            self.compare = CompareApproach::Equality;
        }
        self
    }

    /// Force a comparison regime
    ///
    /// IDENTITY together with an id fails readiness at `build()`.
    pub fn with_compare_approach(mut self, compare: CompareApproach) -> Self {
        self.compare = compare;
        self
    }

    /// Retarget the builder at another concrete specification type
    pub fn with_spec_type<K>(self) -> SpecificationBuilder<T, K>
    where
        K: SpecKind<Subject = T>,
    {
        SpecificationBuilder {
            provider: self.provider,
            subject: self.subject,
            rule: self.rule,
            spec_id: self.spec_id,
            compare: self.compare,
            _target: PhantomData,
        }
    }

    pub(crate) fn with_rule(mut self, rule: Rule<T>) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Subject set so far
    pub fn subject(&self) -> Option<Subject> {
        self.subject
    }

    /// Identity set so far
    pub fn spec_id(&self) -> Option<&dyn SpecId<T>> {
        self.spec_id.as_deref()
    }

    /// Current comparison regime
    pub fn compare_approach(&self) -> CompareApproach {
        self.compare
    }

    /// Concrete type `build()` will produce
    pub fn spec_type(&self) -> SpecType {
        SpecType::of::<R>()
    }

    /// Whether a predicate or invariant has been set
    pub fn has_predicate(&self) -> bool {
        self.rule.is_some()
    }

    /// The readiness rule as a standalone invariant over builders
    pub fn readiness() -> Readiness {
        Readiness
    }

    /// Run the readiness rule, mapping a violation to a construction error
    pub fn check_readiness(&self) -> SpecResult<()> {
        Readiness
            .check(self)
            .map(|_| ())
            .map_err(|e| SpecificationError::not_ready(format!("{:?}", self), e))
    }

    /// Materialize the specification as `R`
    pub fn build(self) -> SpecResult<R> {
        let provider = self.provider.clone();
        provider.instantiate(self)
    }

    /// Move the accumulated state out; callers check readiness first
    pub(crate) fn into_state(self) -> SpecResult<SpecState<T>> {
        let spec_type = self.spec_type();
        let subject = self.subject.ok_or_else(|| {
            SpecificationError::construction(format!("Missing subject for {}", spec_type))
        })?;
        let rule = self.rule.ok_or_else(|| {
            SpecificationError::construction(format!("Missing predicate for {}", spec_type))
        })?;

        Ok(SpecState {
            subject,
            rule,
            spec_id: self.spec_id,
            compare: self.compare,
            spec_type,
            provider: self.provider,
        })
    }
}

impl<T: 'static, R> fmt::Debug for SpecificationBuilder<T, R>
where
    R: SpecKind<Subject = T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecificationBuilder")
            .field("subject", &self.subject)
            .field("spec_type", &self.spec_type())
            .field("has_predicate", &self.has_predicate())
            .field("compare", &self.compare)
            .field("spec_id", &self.spec_id())
            .finish()
    }
}

/// Readiness rule for builders
///
/// - IDENTITY: subject and predicate present, no id
/// - EQUALITY / COMPARISON: subject, predicate and id present
///
/// The subject, when present, must be the builder's subject type.
#[derive(Debug, Clone, Copy, Default)]
pub struct Readiness;

impl<T: 'static, R> Invariant<SpecificationBuilder<T, R>> for Readiness
where
    R: SpecKind<Subject = T>,
{
    fn check(&self, builder: &SpecificationBuilder<T, R>) -> InvariantResult<bool> {
        let mut missing = Vec::new();

        match builder.subject {
            None => missing.push("subject".to_string()),
            Some(subject) if subject != Subject::of::<T>() => {
                missing.push(format!("subject {} (found {})", Subject::of::<T>(), subject))
            }
            Some(_) => {}
        }
        if builder.rule.is_none() {
            missing.push("predicate".to_string());
        }
        if builder.compare != CompareApproach::Identity && builder.spec_id.is_none() {
            missing.push("spec id".to_string());
        }

        let mut problems = Vec::new();
        if !missing.is_empty() {
            problems.push(format!("missing {}", missing.join(", ")));
        }
        if builder.compare == CompareApproach::Identity && builder.spec_id.is_some() {
            problems.push("spec id present but compared by IDENTITY".to_string());
        }

        if problems.is_empty() {
            return Ok(true);
        }
        Err(InvariantCheckError::violated(
            builder,
            format!("{} readiness, {}", builder.compare, problems.join("; ")),
        ))
    }

    fn describe(&self) -> String {
        "builder readiness".to_string()
    }
}
