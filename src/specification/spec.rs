//! Specification - a reusable predicate bound to a subject type
//!
//! A specification is immutable once materialized. Composition always
//! produces a new specification that refers to its operands; operands are
//! never modified.
//!
//! Cloning a `Specification` clones a handle. Clones share one instance,
//! so they are identical under the IDENTITY comparison regime.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::errors::{SpecResult, SpecificationError};
use super::kind::{AnySpecification, SpecKind};
use super::provider::SpecificationProvider;
use crate::identity::{Discriminant, SpecId, SpecType, Subject};
use crate::invariant::{Invariant, InvariantCheckError, InvariantResult, PredicateInvariant};

/// How two specifications are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareApproach {
    /// Reference identity, for specifications without an id
    Identity,
    /// Equality of ids
    Equality,
    /// Reserved for ordering semantics; compares like `Equality` today
    Comparison,
}

impl CompareApproach {
    /// Regime implied by the presence of an id
    pub fn for_id(present: bool) -> Self {
        if present {
            CompareApproach::Equality
        } else {
            CompareApproach::Identity
        }
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareApproach::Identity => "IDENTITY",
            CompareApproach::Equality => "EQUALITY",
            CompareApproach::Comparison => "COMPARISON",
        }
    }
}

impl fmt::Display for CompareApproach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rule body of a specification
pub(crate) enum Rule<T: 'static> {
    /// A leaf predicate
    Invariant(Arc<dyn Invariant<T>>),
    And(Specification<T>, Specification<T>),
    Or(Specification<T>, Specification<T>),
    Not(Specification<T>),
    /// Conjunction over any number of operands
    All(Vec<Specification<T>>),
}

impl<T: 'static> Clone for Rule<T> {
    fn clone(&self) -> Self {
        match self {
            Rule::Invariant(inv) => Rule::Invariant(Arc::clone(inv)),
            Rule::And(a, b) => Rule::And(a.clone(), b.clone()),
            Rule::Or(a, b) => Rule::Or(a.clone(), b.clone()),
            Rule::Not(a) => Rule::Not(a.clone()),
            Rule::All(specs) => Rule::All(specs.clone()),
        }
    }
}

impl<T: 'static> Rule<T> {
    /// Move operand handles out, leaving an empty conjunction behind
    fn take_operands(&mut self, into: &mut Vec<Specification<T>>) {
        match std::mem::replace(self, Rule::All(Vec::new())) {
            Rule::Invariant(_) => {}
            Rule::And(a, b) | Rule::Or(a, b) => {
                into.push(a);
                into.push(b);
            }
            Rule::Not(a) => into.push(a),
            Rule::All(specs) => into.extend(specs),
        }
    }

    fn describe(&self) -> String {
        match self {
            Rule::Invariant(inv) => inv.describe(),
            Rule::And(a, b) => format!("({} AND {})", a, b),
            Rule::Or(a, b) => format!("({} OR {})", a, b),
            Rule::Not(a) => format!("NOT {}", a),
            Rule::All(specs) => {
                let parts: Vec<String> = specs.iter().map(|s| s.to_string()).collect();
                format!("ALL[{}]", parts.join(", "))
            }
        }
    }
}

/// Pending work while walking a rule tree
enum Continuation<'a, T: 'static> {
    /// Left operand of AND evaluated; right one pending
    And(&'a Specification<T>),
    /// Left operand of OR evaluated; right one pending
    Or(&'a Specification<T>),
    Not,
    /// Remaining operands of an ALL
    All(&'a [Specification<T>]),
}

/// Evaluate `root` against `instance` without recursing per rule level
///
/// Operands are evaluated left to right with short-circuit. A failing leaf
/// is reported against the specification that owns it.
fn evaluate<T: 'static>(root: &Specification<T>, instance: &T) -> SpecResult<bool> {
    let mut pending: Vec<Continuation<'_, T>> = Vec::new();
    let mut current = root;

    loop {
        let mut value = match current.rule() {
            Rule::Invariant(inv) => inv
                .check(instance)
                .map_err(|e| SpecificationError::evaluation_failed(current.to_string(), e))?,
            Rule::And(a, b) => {
                pending.push(Continuation::And(b));
                current = a;
                continue;
            }
            Rule::Or(a, b) => {
                pending.push(Continuation::Or(b));
                current = a;
                continue;
            }
            Rule::Not(a) => {
                pending.push(Continuation::Not);
                current = a;
                continue;
            }
            Rule::All(specs) => match specs.split_first() {
                Some((first, rest)) => {
                    pending.push(Continuation::All(rest));
                    current = first;
                    continue;
                }
                None => true,
            },
        };

        // Unwind until some operand still needs evaluating
        loop {
            match pending.pop() {
                None => return Ok(value),
                Some(Continuation::And(right)) if value => {
                    current = right;
                    break;
                }
                Some(Continuation::Or(right)) if !value => {
                    current = right;
                    break;
                }
                Some(Continuation::And(_)) | Some(Continuation::Or(_)) => {}
                Some(Continuation::Not) => value = !value,
                Some(Continuation::All(rest)) if value => {
                    if let Some((first, rest)) = rest.split_first() {
                        pending.push(Continuation::All(rest));
                        current = first;
                        break;
                    }
                }
                Some(Continuation::All(_)) => {}
            }
        }
    }
}

/// Materialized state shared by all handles of one specification
pub(crate) struct SpecState<T: 'static> {
    pub(crate) subject: Subject,
    pub(crate) rule: Rule<T>,
    pub(crate) spec_id: Option<Arc<dyn SpecId<T>>>,
    pub(crate) compare: CompareApproach,
    pub(crate) spec_type: SpecType,
    pub(crate) provider: SpecificationProvider,
}

impl<T: 'static> Drop for SpecState<T> {
    /// Releases operand chains iteratively, so long `and`/`or`/`not`
    /// chains do not overflow the stack when the last handle goes away.
    fn drop(&mut self) {
        let mut orphans = Vec::new();
        self.rule.take_operands(&mut orphans);

        while let Some(spec) = orphans.pop() {
            if let Ok(mut state) = Arc::try_unwrap(spec.inner) {
                state.rule.take_operands(&mut orphans);
            }
        }
    }
}

/// A reusable, composable predicate over `T`
pub struct Specification<T: 'static> {
    pub(crate) inner: Arc<SpecState<T>>,
}

impl<T: 'static> Clone for Specification<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Specification<T> {
    pub(crate) fn from_state(state: SpecState<T>) -> Self {
        Self {
            inner: Arc::new(state),
        }
    }

    /// Plain, un-identified specification owned by `provider`
    pub(crate) fn detached(provider: SpecificationProvider, rule: Rule<T>) -> Self {
        Self::from_state(SpecState {
            subject: Subject::of::<T>(),
            rule,
            spec_id: None,
            compare: CompareApproach::Identity,
            spec_type: SpecType::of::<Self>(),
            provider,
        })
    }

    /// Un-identified specification from a predicate, on the global provider
    pub fn of<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::detached(
            SpecificationProvider::global().clone(),
            Rule::Invariant(Arc::new(PredicateInvariant::new(predicate))),
        )
    }

    /// Un-identified specification from a fallible invariant, on the global provider
    pub fn of_invariant<I>(invariant: I) -> Self
    where
        I: Invariant<T> + 'static,
    {
        Self::detached(
            SpecificationProvider::global().clone(),
            Rule::Invariant(Arc::new(invariant)),
        )
    }

    /// Evaluate the rule against `instance`
    ///
    /// A failing predicate surfaces as `SPEC_EVALUATION_FAILED`, naming the
    /// specification whose predicate failed.
    pub fn is_satisfied_by(&self, instance: &T) -> SpecResult<bool> {
        evaluate(self, instance)
    }

    /// Instances that satisfy this specification, in no particular order
    pub fn select_satisfying<'a, I>(&self, items: I) -> SpecResult<HashSet<T>>
    where
        I: IntoIterator<Item = &'a T>,
        T: Clone + Eq + Hash,
    {
        let mut selected = HashSet::new();
        for item in items {
            if self.is_satisfied_by(item)? {
                selected.insert(item.clone());
            }
        }
        Ok(selected)
    }

    /// Logical negation of `spec` as a plain specification
    pub fn negate<K>(spec: &K) -> Self
    where
        K: SpecKind<Subject = T>,
    {
        let base = spec.as_spec();
        Self::detached(base.provider().clone(), Rule::Not(base.clone()))
    }

    /// Conjunction across all `specs`
    ///
    /// Every operand must share one subject type, and that subject must be
    /// `T`. The result is always a plain specification.
    pub fn compose(specs: &[&dyn AnySpecification]) -> SpecResult<Self> {
        let operands: Vec<String> = specs.iter().map(|s| s.describe()).collect();
        let first = specs
            .first()
            .ok_or_else(|| SpecificationError::composition("no operands given", &operands))?;
        let provider = first.provider().clone();

        let reject = |reason: String| {
            let err = SpecificationError::composition(reason, &operands);
            provider.composition_rejected(&err);
            err
        };

        let limit = provider.config().max_compose_operands;
        if specs.len() > limit {
            return Err(reject(format!(
                "{} operands exceed the limit of {}",
                specs.len(),
                limit
            )));
        }

        let subject = first.subject();
        if let Some(odd) = specs.iter().find(|s| s.subject() != subject) {
            return Err(reject(format!(
                "subject {} does not match subject {}",
                odd.subject(),
                subject
            )));
        }
        if subject != Subject::of::<T>() {
            return Err(reject(format!(
                "operands are over {}, expected {}",
                subject,
                Subject::of::<T>()
            )));
        }

        let mut members = Vec::with_capacity(specs.len());
        for spec in specs {
            let base = spec
                .as_base_any()
                .downcast_ref::<Specification<T>>()
                .cloned()
                .ok_or_else(|| reject(format!("operand {} has no base specification", spec.describe())))?;
            members.push(base);
        }

        Ok(Self::detached(provider, Rule::All(members)))
    }

    /// Same subject and predicate under a new identity
    ///
    /// The id is registered with this specification's provider; reusing an
    /// id fails with `SPEC_UNIQUENESS_VIOLATION`.
    pub fn with_id<I: SpecId<T>>(&self, id: I) -> SpecResult<Self> {
        self.inner
            .provider
            .builder::<T>()
            .with_subject(self.subject())
            .with_rule(self.rule().clone())
            .with_spec_id(id)
            .build()
    }

    /// Like [`with_id`](Self::with_id), materialized as the concrete type `R`
    pub fn identified_as<R, K, I>(spec: &K, id: I) -> SpecResult<R>
    where
        R: SpecKind<Subject = T>,
        K: SpecKind<Subject = T>,
        I: SpecId<T>,
    {
        spec.builder()
            .with_spec_type::<R>()
            .with_rule(spec.as_spec().rule().clone())
            .with_spec_id(id)
            .build()
    }

    /// Subject type tag
    pub fn subject(&self) -> Subject {
        self.inner.subject
    }

    /// Identity, if any
    pub fn id(&self) -> Option<&dyn SpecId<T>> {
        self.inner.spec_id.as_deref()
    }

    /// Comparison regime
    pub fn compare_approach(&self) -> CompareApproach {
        self.inner.compare
    }

    /// Concrete specification type this instance was materialized as
    pub fn spec_type(&self) -> SpecType {
        self.inner.spec_type
    }

    /// Provider that materialized this specification
    pub fn provider(&self) -> &SpecificationProvider {
        &self.inner.provider
    }

    pub(crate) fn rule(&self) -> &Rule<T> {
        &self.inner.rule
    }

    /// Key used for equality, present only outside the IDENTITY regime
    fn identity_key(&self) -> Option<Discriminant> {
        match self.inner.compare {
            CompareApproach::Identity => None,
            CompareApproach::Equality | CompareApproach::Comparison => {
                self.inner.spec_id.as_ref().map(|id| id.value())
            }
        }
    }
}

impl<T: 'static> Invariant<T> for Specification<T> {
    fn check(&self, instance: &T) -> InvariantResult<bool> {
        self.is_satisfied_by(instance).map_err(InvariantCheckError::from)
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl<T: 'static> PartialEq for Specification<T> {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        match (self.identity_key(), other.identity_key()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl<T: 'static> Eq for Specification<T> {}

impl<T: 'static> Hash for Specification<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.identity_key() {
            Some(key) => key.hash(state),
            None => (Arc::as_ptr(&self.inner) as *const () as usize).hash(state),
        }
    }
}

impl<T: 'static> fmt::Display for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_name = self.spec_type().simple_name();
        let type_name = type_name.split('<').next().unwrap_or(type_name);
        write!(f, "{}{{subject={}", type_name, self.subject())?;
        if let Some(id) = &self.inner.spec_id {
            write!(f, ", id={}", id.value())?;
        }
        write!(f, "}}")
    }
}

impl<T: 'static> fmt::Debug for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Specification")
            .field("subject", &self.subject())
            .field("spec_type", &self.spec_type())
            .field("spec_id", &self.id())
            .field("compare", &self.compare_approach())
            .field("rule", &self.inner.rule.describe())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Discriminant;
    use crate::specification::SpecificationErrorCode;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Order {
        paid: bool,
        shipped: bool,
    }

    #[derive(Debug, Clone, Copy)]
    enum OrderRule {
        Paid,
        Shipped,
    }

    impl SpecId<Order> for OrderRule {
        fn value(&self) -> Discriminant {
            Discriminant::of(self)
        }
    }

    fn order(paid: bool, shipped: bool) -> Order {
        Order { paid, shipped }
    }

    #[test]
    fn test_of_is_unidentified() {
        let spec = Specification::<Order>::of(|o| o.paid);
        assert!(spec.id().is_none());
        assert_eq!(spec.compare_approach(), CompareApproach::Identity);
        assert!(spec.subject().is::<Order>());
        assert!(spec.spec_type().is::<Specification<Order>>());
    }

    #[test]
    fn test_is_satisfied_by() {
        let spec = Specification::<Order>::of(|o| o.paid);
        assert!(spec.is_satisfied_by(&order(true, false)).unwrap());
        assert!(!spec.is_satisfied_by(&order(false, false)).unwrap());
    }

    #[test]
    fn test_evaluation_failure_names_spec() {
        let spec = Specification::<Order>::of_invariant(|o: &Order| {
            if o.shipped && !o.paid {
                Err(InvariantCheckError::violated(o, "shipped orders are paid"))
            } else {
                Ok(o.paid)
            }
        });

        let err = spec.is_satisfied_by(&order(false, true)).unwrap_err();
        assert_eq!(err.code(), SpecificationErrorCode::SpecEvaluationFailed);
        assert!(err.message().contains("Specification{subject=Order}"));
        assert!(err.message().contains("shipped: true"));
    }

    #[test]
    fn test_select_satisfying_collapses_duplicates() {
        let spec = Specification::<Order>::of(|o| o.paid);
        let orders = vec![order(true, false), order(true, false), order(false, true), order(true, true)];

        let selected = spec.select_satisfying(&orders).unwrap();
        assert_eq!(selected.len(), 2);
        assert!(selected.contains(&order(true, false)));
        assert!(selected.contains(&order(true, true)));
    }

    #[test]
    fn test_negate_is_plain() {
        let paid = Specification::<Order>::of(|o| o.paid);
        let unpaid = Specification::negate(&paid);
        assert!(unpaid.is_satisfied_by(&order(false, false)).unwrap());
        assert!(!unpaid.is_satisfied_by(&order(true, false)).unwrap());
        assert_eq!(unpaid.compare_approach(), CompareApproach::Identity);
    }

    #[test]
    fn test_identity_regime_uses_reference() {
        let a = Specification::<Order>::of(|o| o.paid);
        let b = Specification::<Order>::of(|o| o.paid);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_equality_regime_uses_id() {
        let provider = SpecificationProvider::new();
        let paid = provider.of::<Order, _>(|o| o.paid).with_id(OrderRule::Paid).unwrap();
        let again = paid.clone();
        let shipped = provider.of::<Order, _>(|o| o.shipped).with_id(OrderRule::Shipped).unwrap();

        assert_eq!(paid.compare_approach(), CompareApproach::Equality);
        assert_eq!(paid, again);
        assert_ne!(paid, shipped);

        let mut set = HashSet::new();
        set.insert(paid.clone());
        set.insert(again);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_display() {
        let provider = SpecificationProvider::new();
        let plain = provider.of::<Order, _>(|o| o.paid);
        assert_eq!(plain.to_string(), "Specification{subject=Order}");

        let identified = plain.with_id(OrderRule::Paid).unwrap();
        assert_eq!(identified.to_string(), "Specification{subject=Order, id=OrderRule::Paid}");
    }

    #[test]
    fn test_specification_is_an_invariant() {
        let spec = Specification::<Order>::of(|o| o.shipped);
        let as_invariant: &dyn Invariant<Order> = &spec;
        assert!(as_invariant.check(&order(false, true)).unwrap());
        assert_eq!(as_invariant.describe(), "Specification{subject=Order}");
    }

    #[test]
    fn test_compare_approach_for_id() {
        assert_eq!(CompareApproach::for_id(true), CompareApproach::Equality);
        assert_eq!(CompareApproach::for_id(false), CompareApproach::Identity);
        assert_eq!(CompareApproach::Comparison.to_string(), "COMPARISON");
    }
}
