//! # Specification Registry
//!
//! Maps each identity to the one specification materialized with it.
//! Entries are never removed: once an id is taken it stays taken for the
//! life of the registry, even after the specification itself is dropped.

use std::any::Any;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};

use super::errors::{SpecResult, SpecificationError};
use super::spec::Specification;
use crate::identity::{Discriminant, SpecType, Subject};

/// Registered identity
struct RegistryEntry {
    subject: Subject,
    spec_type: SpecType,
    description: String,
    /// Weak so that a specification does not keep its own provider alive
    handle: Weak<dyn Any + Send + Sync>,
}

/// Registry of identified specifications
#[derive(Default)]
pub struct SpecRegistry {
    entries: RwLock<HashMap<Discriminant, RegistryEntry>>,
}

impl SpecRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an identified specification
    ///
    /// The uniqueness check and the insert happen under one write lock, so
    /// concurrent registrations of the same id cannot both succeed. Nothing
    /// that calls back into user code runs while the lock is held.
    pub(crate) fn register<T: 'static>(&self, spec: &Specification<T>) -> SpecResult<Discriminant> {
        let id = spec
            .id()
            .map(|id| id.value())
            .ok_or_else(|| SpecificationError::construction(format!("Cannot register {} without an id", spec)))?;
        let description = spec.to_string();
        let weak = Arc::downgrade(&spec.inner);
        let handle: Weak<dyn Any + Send + Sync> = weak;
        let entry = RegistryEntry {
            subject: spec.subject(),
            spec_type: spec.spec_type(),
            description,
            handle,
        };

        let mut entries = self
            .entries
            .write()
            .map_err(|_| SpecificationError::construction("Registry lock poisoned"))?;

        match entries.entry(id.clone()) {
            Entry::Occupied(existing) => Err(SpecificationError::uniqueness(
                id,
                existing.get().description.clone(),
            )),
            Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(id)
            }
        }
    }

    /// Whether `id` is taken
    pub fn contains(&self, id: &Discriminant) -> bool {
        self.entries
            .read()
            .map(|m| m.contains_key(id))
            .unwrap_or(false)
    }

    /// The live specification registered under `id`
    ///
    /// `None` if the id is unknown, registered over another subject, or the
    /// specification has been dropped.
    pub fn lookup<T: 'static>(&self, id: &Discriminant) -> Option<Specification<T>> {
        let handle = {
            let entries = self.entries.read().ok()?;
            let entry = entries.get(id)?;
            if entry.subject != Subject::of::<T>() {
                return None;
            }
            entry.handle.upgrade()?
        };

        handle
            .downcast::<super::spec::SpecState<T>>()
            .ok()
            .map(|inner| Specification { inner })
    }

    /// Subject and concrete type recorded for `id`
    pub fn describe(&self, id: &Discriminant) -> Option<(Subject, SpecType, String)> {
        let entries = self.entries.read().ok()?;
        entries
            .get(id)
            .map(|e| (e.subject, e.spec_type, e.description.clone()))
    }

    /// All registered ids, in no particular order
    pub fn ids(&self) -> Vec<Discriminant> {
        self.entries
            .read()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of registered ids
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for SpecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecRegistry")
            .field("len", &self.len())
            .finish()
    }
}
