//! Runtime type tags
//!
//! `Subject` names the type a specification applies to. `SpecType` names
//! the concrete specification type that was materialized. Both are opaque
//! tags compared by `TypeId`; the stored name is for diagnostics only.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::invariant::short_type_name;

/// Type tag for the subject of a specification
#[derive(Clone, Copy)]
pub struct Subject {
    type_id: TypeId,
    name: &'static str,
}

impl Subject {
    /// Tag for `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Returns true if this tag denotes `T`
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Fully qualified type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path
    pub fn simple_name(&self) -> &'static str {
        short_type_name(self.name)
    }
}

impl PartialEq for Subject {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Subject {}

impl Hash for Subject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Subject({})", self.name)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.simple_name())
    }
}

/// Type tag for a concrete specification type
///
/// Set once when a specification is materialized and carried through
/// composition, so a combined specification reports the same concrete
/// type as its receiver.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpecType(Subject);

impl SpecType {
    /// Tag for the specification type `K`
    pub fn of<K: 'static>() -> Self {
        Self(Subject::of::<K>())
    }

    /// Returns true if this tag denotes `K`
    pub fn is<K: 'static>(&self) -> bool {
        self.0.is::<K>()
    }

    /// Fully qualified type name
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Type name without its module path
    pub fn simple_name(&self) -> &'static str {
        self.0.simple_name()
    }
}

impl fmt::Debug for SpecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpecType({})", self.0.name())
    }
}

impl fmt::Display for SpecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.simple_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Order;
    struct Invoice;

    #[test]
    fn test_subject_equality_by_type() {
        assert_eq!(Subject::of::<Order>(), Subject::of::<Order>());
        assert_ne!(Subject::of::<Order>(), Subject::of::<Invoice>());
        assert!(Subject::of::<Order>().is::<Order>());
        assert!(!Subject::of::<Order>().is::<Invoice>());
    }

    #[test]
    fn test_subject_names() {
        let subject = Subject::of::<Order>();
        assert!(subject.name().ends_with("Order"));
        assert_eq!(subject.simple_name(), "Order");
        assert_eq!(subject.to_string(), "Order");
    }

    #[test]
    fn test_spec_type_tags() {
        let tag = SpecType::of::<Order>();
        assert!(tag.is::<Order>());
        assert_eq!(tag.simple_name(), "Order");
        assert_ne!(tag, SpecType::of::<Invoice>());
    }
}
