//! SpecId - typed, enumerated identity of a specification
//!
//! A consuming domain declares a closed set of identities per subject type
//! by implementing [`SpecId`] on an enum:
//!
//! ```ignore
//! #[derive(Debug, Clone, Copy)]
//! enum OrderRule { Paid, Shipped }
//!
//! impl SpecId<Order> for OrderRule {
//!     fn value(&self) -> Discriminant {
//!         Discriminant::of(self)
//!     }
//! }
//! ```
//!
//! Identity is canonical in the enumerated value alone. Wrapping the same
//! variant in different carrier types yields equal identities.
//!
//! [`Discriminant::of`] takes the variant from the value's `Debug` output.
//! That is exact for fieldless enums with derived `Debug`. A hand-written
//! `Debug`, or variants carrying data, change what counts as one identity:
//! two values that render alike are the same id, and `Limit(1)` differs from
//! `Limit(2)`. Use [`Discriminant::named`] to spell the variant out instead.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use super::subject::Subject;
use crate::invariant::short_type_name;

/// The canonical value of an identity: an enum type plus one of its variants
#[derive(Clone)]
pub struct Discriminant {
    kind: TypeId,
    kind_name: &'static str,
    variant: String,
}

impl Discriminant {
    /// Discriminant of an enumerated value, named by its `Debug` rendering
    pub fn of<E: fmt::Debug + 'static>(value: &E) -> Self {
        Self::named::<E>(format!("{:?}", value))
    }

    /// Discriminant of enum `E` with an explicit variant name
    pub fn named<E: 'static>(variant: impl Into<String>) -> Self {
        Self {
            kind: TypeId::of::<E>(),
            kind_name: type_name::<E>(),
            variant: variant.into(),
        }
    }

    /// Variant name
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Enum type name without its module path
    pub fn kind_name(&self) -> &'static str {
        short_type_name(self.kind_name)
    }
}

impl PartialEq for Discriminant {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.variant == other.variant
    }
}

impl Eq for Discriminant {}

impl Hash for Discriminant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.variant.hash(state);
    }
}

impl fmt::Debug for Discriminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Discriminant({}::{})", self.kind_name, self.variant)
    }
}

impl fmt::Display for Discriminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.kind_name(), self.variant)
    }
}

/// Identity of a specification over subject `S`
///
/// Enums return `Discriminant::of(self)`. Carrier types that wrap an enum
/// return the wrapped value's discriminant. Enums whose `Debug` is not the
/// bare variant name return `Discriminant::named::<Self>(..)`.
pub trait SpecId<S: ?Sized + 'static>: fmt::Debug + Send + Sync + 'static {
    /// Canonical identity value
    fn value(&self) -> Discriminant;

    /// Subject type this identity is scoped to
    fn subject(&self) -> Subject {
        Subject::of::<S>()
    }
}

/// Carrier pairing a subject type with an enumerated value
///
/// Equality and hashing follow the enumerated value only, never the
/// carrier or subject.
pub struct TypedSpecId<S: ?Sized, E> {
    value: E,
    _subject: PhantomData<fn() -> Box<S>>,
}

impl<S: ?Sized, E> TypedSpecId<S, E> {
    /// Bind `value` to subject `S`
    pub fn new(value: E) -> Self {
        Self {
            value,
            _subject: PhantomData,
        }
    }

    /// The wrapped enumerated value
    pub fn get(&self) -> &E {
        &self.value
    }
}

impl<S: ?Sized, E: Clone> Clone for TypedSpecId<S, E> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<S, E> SpecId<S> for TypedSpecId<S, E>
where
    S: ?Sized + 'static,
    E: fmt::Debug + Send + Sync + 'static,
{
    fn value(&self) -> Discriminant {
        Discriminant::of(&self.value)
    }
}

impl<S: ?Sized, E: fmt::Debug + 'static> PartialEq for TypedSpecId<S, E> {
    fn eq(&self, other: &Self) -> bool {
        Discriminant::of(&self.value) == Discriminant::of(&other.value)
    }
}

impl<S: ?Sized, E: fmt::Debug + 'static> Eq for TypedSpecId<S, E> {}

impl<S: ?Sized, E: fmt::Debug + 'static> Hash for TypedSpecId<S, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Discriminant::of(&self.value).hash(state);
    }
}

impl<S: ?Sized + 'static, E: fmt::Debug> fmt::Debug for TypedSpecId<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TypedSpecId{{subject={}, value={:?}}}",
            short_type_name(type_name::<S>()),
            self.value
        )
    }
}

/// Compare two identities by their canonical value, whatever carries them
pub fn same_identity<A, B>(a: &dyn SpecId<A>, b: &dyn SpecId<B>) -> bool
where
    A: ?Sized + 'static,
    B: ?Sized + 'static,
{
    a.value() == b.value()
}
