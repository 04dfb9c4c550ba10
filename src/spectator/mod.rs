//! Capability boundary
//!
//! A spectator is any domain object that can be asked whether a
//! specification applies to it. It presents itself as the specification's
//! subject type through `unwrap`, or refuses with
//! [`CapabilityError::Unsupported`].
//!
//! `satisfy` is total: a spectator that cannot present itself as the
//! subject simply does not satisfy the specification. Evaluation errors
//! from the predicate itself still propagate.

mod errors;

pub use errors::{CapabilityError, CapabilityResult};

use std::any::Any;

use crate::identity::Subject;
use crate::invariant::{Invariant, InvariantResult};
use crate::specification::{SpecKind, SpecResult};

/// An object that specifications can be asserted against
pub trait Spectator: Any {
    /// A view of `self` as `subject`, if this spectator offers one
    ///
    /// The returned value must downcast to the type `subject` denotes.
    /// The default offers no views beyond the spectator's own type.
    fn capability(&self, _subject: Subject) -> Option<&dyn Any> {
        None
    }

    /// Present `self` as `U`
    ///
    /// Succeeds when `Self` is `U`, or when `capability` offers a `U` view.
    fn unwrap<U: 'static>(&self) -> CapabilityResult<&U>
    where
        Self: Sized,
    {
        let this: &dyn Any = self;
        if let Some(own) = this.downcast_ref::<U>() {
            return Ok(own);
        }
        self.capability(Subject::of::<U>())
            .and_then(|view| view.downcast_ref::<U>())
            .ok_or_else(CapabilityError::unsupported::<U>)
    }

    /// Whether `spec` holds for this spectator
    ///
    /// `Ok(false)` if `self` cannot be presented as the subject.
    fn satisfy<K: SpecKind>(&self, spec: &K) -> SpecResult<bool>
    where
        Self: Sized,
    {
        match self.unwrap::<K::Subject>() {
            Ok(subject) => spec.is_satisfied_by(subject),
            Err(_) => Ok(false),
        }
    }

    /// Check an invariant over the spectator itself
    fn satisfy_invariant(&self, invariant: &dyn Invariant<Self>) -> InvariantResult<bool>
    where
        Self: Sized,
    {
        invariant.check(self)
    }

    /// Test a predicate over the spectator itself
    fn satisfy_predicate<F>(&self, predicate: F) -> bool
    where
        Self: Sized,
        F: Fn(&Self) -> bool,
    {
        predicate(self)
    }
}
