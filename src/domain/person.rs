//! Person: the node entity of a genealogy tree

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use generational_arena::Index;

/// Identity of the tree that issued a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TreeId(u64);

impl TreeId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Stable handle of a person inside its tree's arena.
///
/// Handles compare by identity, not by name: two persons with the same name
/// have different handles. A handle only resolves in the tree that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PersonId {
    pub(crate) tree: TreeId,
    pub(crate) index: Index,
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.index.into_raw_parts();
        write!(f, "#{}.{}.{}", self.tree.0, slot, generation)
    }
}

/// A member of a genealogy tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    /// Identifier used by every name-based lookup
    pub(crate) name: String,
    /// Free text: role, gender, notes
    pub(crate) details: String,
    /// Owned children, in insertion order
    pub(crate) children: Vec<PersonId>,
    /// Shared spouse links, in insertion order
    pub(crate) spouses: Vec<PersonId>,
}

impl Person {
    pub fn new(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            details: details.into(),
            children: Vec::new(),
            spouses: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn children(&self) -> &[PersonId] {
        &self.children
    }

    pub fn spouses(&self) -> &[PersonId] {
        &self.spouses
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.details.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.details)
        }
    }
}
