//! # Invariants
//!
//! The atomic unit of rule logic. An invariant inspects an instance and
//! returns a verdict, or fails with an [`InvariantCheckError`] when it
//! cannot decide. Invariants carry no state and have no side effects
//! beyond evaluation.
//!
//! Any closure `Fn(&T) -> InvariantResult<bool>` is an invariant. Plain
//! boolean predicates are lifted with [`PredicateInvariant`].

mod errors;

pub use errors::{InvariantCheckError, InvariantResult};

use std::fmt;

/// A checked boolean predicate over `T`
pub trait Invariant<T: ?Sized>: Send + Sync {
    /// Evaluate the invariant against `instance`
    fn check(&self, instance: &T) -> InvariantResult<bool>;

    /// Human-readable description used in diagnostics
    fn describe(&self) -> String {
        short_type_name(std::any::type_name::<Self>()).to_string()
    }
}

impl<T: ?Sized, F> Invariant<T> for F
where
    F: Fn(&T) -> InvariantResult<bool> + Send + Sync,
{
    fn check(&self, instance: &T) -> InvariantResult<bool> {
        self(instance)
    }

    fn describe(&self) -> String {
        "closure".to_string()
    }
}

/// Lifts an infallible predicate into an [`Invariant`]
pub struct PredicateInvariant<F> {
    name: String,
    predicate: F,
}

impl<F> PredicateInvariant<F> {
    /// Wrap a predicate under a generic name
    pub fn new(predicate: F) -> Self {
        Self::named("predicate", predicate)
    }

    /// Wrap a predicate under an explicit name
    pub fn named(name: impl Into<String>, predicate: F) -> Self {
        Self {
            name: name.into(),
            predicate,
        }
    }
}

impl<T: ?Sized, F> Invariant<T> for PredicateInvariant<F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn check(&self, instance: &T) -> InvariantResult<bool> {
        Ok((self.predicate)(instance))
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

impl<F> fmt::Debug for PredicateInvariant<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateInvariant")
            .field("name", &self.name)
            .finish()
    }
}

/// Strip module paths from a `type_name` output, keeping generics readable
pub(crate) fn short_type_name(full: &str) -> &str {
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positive(n: &i64) -> InvariantResult<bool> {
        Ok(*n > 0)
    }

    #[test]
    fn test_fn_is_invariant() {
        assert!(Invariant::<i64>::check(&positive, &5).unwrap());
        assert!(!Invariant::<i64>::check(&positive, &-5).unwrap());
    }

    #[test]
    fn test_closure_can_fail() {
        let inv = |n: &i64| {
            if *n == 0 {
                Err(InvariantCheckError::violated(n, "non-zero divisor"))
            } else {
                Ok(100 % n == 0)
            }
        };

        assert!(Invariant::<i64>::check(&inv, &10).unwrap());
        let err = Invariant::<i64>::check(&inv, &0).unwrap_err();
        assert_eq!(err.invariant(), Some("non-zero divisor"));
    }

    #[test]
    fn test_predicate_invariant() {
        let inv = PredicateInvariant::named("even", |n: &u32| n % 2 == 0);
        assert!(Invariant::<u32>::check(&inv, &4).unwrap());
        assert!(!Invariant::<u32>::check(&inv, &3).unwrap());
        assert_eq!(Invariant::<u32>::describe(&inv), "even");
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("a::b::Order"), "Order");
        assert_eq!(short_type_name("a::b::Wrap<c::d::Order>"), "Wrap<c::d::Order>");
        assert_eq!(short_type_name("u32"), "u32");
    }
}
