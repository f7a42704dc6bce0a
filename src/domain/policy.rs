//! Behavior switches for name resolution and spouse removal

use serde::{Deserialize, Serialize};

/// How names are treated on insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamePolicy {
    /// Duplicates are accepted; lookups resolve to the first depth-first match.
    #[default]
    FirstMatch,
    /// A name already carried by any person of the tree is rejected.
    Unique,
}

/// What `remove_spouse` does to the reciprocal link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpouseRemoval {
    /// Only the member's own list is changed; the removed spouse keeps its link back.
    #[default]
    OneSided,
    /// Both sides of the link are removed.
    Mutual,
}

/// Options a tree is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeOptions {
    pub name_policy: NamePolicy,
    pub spouse_removal: SpouseRemoval,
}
