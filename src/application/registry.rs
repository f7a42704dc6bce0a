//! Registry of named family trees with a current selection

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{GenealogyTree, TreeOptions};

/// Maps family names to trees and tracks which one operations target.
///
/// Owned by a session; there is no process-wide registry.
#[derive(Debug, Default)]
pub struct FamilyRegistry {
    trees: BTreeMap<String, GenealogyTree>,
    current: Option<String>,
    options: TreeOptions,
}

impl FamilyRegistry {
    pub fn new(options: TreeOptions) -> Self {
        Self {
            trees: BTreeMap::new(),
            current: None,
            options,
        }
    }

    /// Creates a tree whose root is a member named after the family and
    /// makes it current.
    ///
    /// An existing name is left untouched and reported.
    pub fn create(&mut self, family: &str) -> ApplicationResult<&mut GenealogyTree> {
        let family = family.trim();
        if family.is_empty() {
            return Err(ApplicationError::EmptyName("family name"));
        }
        if self.trees.contains_key(family) {
            warn!("family tree already exists: {}", family);
            return Err(ApplicationError::TreeAlreadyExists(family.to_string()));
        }

        let mut tree = GenealogyTree::with_options(family, self.options);
        tree.add_member("", family, "")?;
        info!("created family tree: {}", family);

        self.current = Some(family.to_string());
        Ok(self.trees.entry(family.to_string()).or_insert(tree))
    }

    pub fn switch(&mut self, family: &str) -> ApplicationResult<()> {
        if !self.trees.contains_key(family) {
            warn!("family tree not found: {}", family);
            return Err(ApplicationError::TreeNotFound(family.to_string()));
        }
        debug!("switched to family tree: {}", family);
        self.current = Some(family.to_string());
        Ok(())
    }

    /// Drops a tree; the selection is cleared if it pointed at it.
    pub fn remove(&mut self, family: &str) -> ApplicationResult<GenealogyTree> {
        let tree = self
            .trees
            .remove(family)
            .ok_or_else(|| ApplicationError::TreeNotFound(family.to_string()))?;
        if self.current.as_deref() == Some(family) {
            self.current = None;
        }
        info!("removed family tree: {}", family);
        Ok(tree)
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current(&self) -> ApplicationResult<&GenealogyTree> {
        self.current
            .as_ref()
            .and_then(|name| self.trees.get(name))
            .ok_or(ApplicationError::NoTreeSelected)
    }

    pub fn current_mut(&mut self) -> ApplicationResult<&mut GenealogyTree> {
        self.current
            .as_ref()
            .and_then(|name| self.trees.get_mut(name))
            .ok_or(ApplicationError::NoTreeSelected)
    }

    pub fn get(&self, family: &str) -> Option<&GenealogyTree> {
        self.trees.get(family)
    }

    /// Family names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.trees.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_new_family_when_creating_then_seeded_with_root_and_selected() {
        let mut registry = FamilyRegistry::default();
        registry.create("Smith").unwrap();

        assert_eq!(registry.current_name(), Some("Smith"));
        let tree = registry.current().unwrap();
        let root = tree.root().and_then(|id| tree.get(id)).unwrap();
        assert_eq!(root.name(), "Smith");
    }

    #[test]
    fn given_existing_family_when_creating_again_then_reported_and_unchanged() {
        let mut registry = FamilyRegistry::default();
        registry.create("Smith").unwrap();
        registry.current_mut().unwrap().add_member("Smith", "John", "").unwrap();
        registry.create("Jones").unwrap();

        let err = registry.create("Smith").unwrap_err();

        assert!(matches!(err, ApplicationError::TreeAlreadyExists(ref n) if n == "Smith"));
        assert_eq!(registry.get("Smith").unwrap().len(), 2);
        assert_eq!(registry.current_name(), Some("Jones"));
    }

    #[test]
    fn given_blank_family_when_creating_then_empty_name() {
        let mut registry = FamilyRegistry::default();
        assert!(matches!(
            registry.create("   "),
            Err(ApplicationError::EmptyName(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn given_no_selection_then_current_is_reported() {
        let registry = FamilyRegistry::default();
        assert!(matches!(registry.current(), Err(ApplicationError::NoTreeSelected)));
    }

    #[test]
    fn given_two_families_when_switching_then_current_follows() {
        let mut registry = FamilyRegistry::default();
        registry.create("Smith").unwrap();
        registry.create("Jones").unwrap();

        registry.switch("Smith").unwrap();
        assert_eq!(registry.current().unwrap().name(), "Smith");

        assert!(matches!(
            registry.switch("Miller"),
            Err(ApplicationError::TreeNotFound(_))
        ));
        assert_eq!(registry.current_name(), Some("Smith"));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Jones", "Smith"]);
    }

    #[test]
    fn given_current_family_when_removed_then_selection_cleared() {
        let mut registry = FamilyRegistry::default();
        registry.create("Smith").unwrap();
        let removed = registry.remove("Smith").unwrap();

        assert_eq!(removed.name(), "Smith");
        assert_eq!(registry.current_name(), None);
        assert!(registry.remove("Smith").is_err());
    }
}
