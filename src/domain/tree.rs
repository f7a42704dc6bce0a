//! GenealogyTree: arena-backed genealogy with name lookup and parent map

use std::collections::HashMap;

use generational_arena::Arena;
use tracing::{debug, info, instrument, trace, warn};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::person::{Person, PersonId, TreeId};
use crate::domain::policy::{NamePolicy, SpouseRemoval, TreeOptions};

/// A named genealogy with a single root.
///
/// Persons are stored in a generational arena. `children` edges own their
/// targets and form a tree; `spouses` edges are shared links into the same
/// arena and are never followed by searches. A reverse map from child to
/// parent is updated on every child insertion, so parent lookup does not
/// need a traversal.
#[derive(Debug)]
pub struct GenealogyTree {
    id: TreeId,
    name: String,
    arena: Arena<Person>,
    root: Option<PersonId>,
    parents: HashMap<PersonId, PersonId>,
    options: TreeOptions,
}

impl GenealogyTree {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, TreeOptions::default())
    }

    pub fn with_options(name: impl Into<String>, options: TreeOptions) -> Self {
        Self {
            id: TreeId::next(),
            name: name.into(),
            arena: Arena::new(),
            root: None,
            parents: HashMap::new(),
            options,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> TreeOptions {
        self.options
    }

    pub fn root(&self) -> Option<PersonId> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of persons held by the tree, spouses included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// `None` for handles issued by another tree.
    pub fn get(&self, id: PersonId) -> Option<&Person> {
        if id.tree != self.id {
            return None;
        }
        self.arena.get(id.index)
    }

    fn get_mut(&mut self, id: PersonId) -> Option<&mut Person> {
        if id.tree != self.id {
            return None;
        }
        self.arena.get_mut(id.index)
    }

    /// Adds a child of `parent_name`, or the root when `parent_name` is empty.
    #[instrument(level = "trace", skip(self))]
    pub fn add_member(
        &mut self,
        parent_name: &str,
        name: &str,
        details: &str,
    ) -> DomainResult<PersonId> {
        debug!(tree = %self.name, "add_member: name={}, parent={}", name, parent_name);

        if parent_name.is_empty() {
            if let Some(root) = self.root {
                let current = self.get(root).map(|p| p.name.clone()).unwrap_or_default();
                warn!("root already exists: {}", current);
                return Err(DomainError::RootAlreadyExists(current));
            }
            let id = self.insert(Person::new(name, details));
            self.root = Some(id);
            info!("root member added: {}", name);
            return Ok(id);
        }

        let Some(parent) = self.find_member(parent_name) else {
            warn!("parent not found: {}", parent_name);
            return Err(DomainError::ParentNotFound(parent_name.to_string()));
        };
        self.ensure_name_available(name)?;
        let id = self.attach_child(parent, Person::new(name, details));
        info!("child member added: {} -> {}", name, parent_name);
        Ok(id)
    }

    /// Creates a spouse for `member_name` and links both sides.
    #[instrument(level = "trace", skip(self))]
    pub fn add_spouse(
        &mut self,
        member_name: &str,
        spouse_name: &str,
        spouse_details: &str,
    ) -> DomainResult<PersonId> {
        let member = self.require_member(member_name)?;
        if self.spouse_position(member, spouse_name).is_some() {
            warn!("spouse already exists: {} -> {}", spouse_name, member_name);
            return Err(DomainError::SpouseAlreadyExists {
                member: member_name.to_string(),
                spouse: spouse_name.to_string(),
            });
        }
        self.ensure_name_available(spouse_name)?;

        let mut spouse = Person::new(spouse_name, spouse_details);
        spouse.spouses.push(member);
        let spouse_id = self.insert(spouse);
        if let Some(m) = self.get_mut(member) {
            m.spouses.push(spouse_id);
        }
        info!("spouse added: {} -> {}", spouse_name, member_name);
        Ok(spouse_id)
    }

    /// Appends a new child to the parent of `target_name`.
    ///
    /// The root has no parent, so a sibling of the root cannot be added.
    #[instrument(level = "trace", skip(self))]
    pub fn add_sibling(
        &mut self,
        target_name: &str,
        sibling_name: &str,
        sibling_details: &str,
    ) -> DomainResult<PersonId> {
        let target = self.require_member(target_name)?;
        let Some(parent) = self.find_parent(target) else {
            warn!("parent not found for target: {}", target_name);
            return Err(DomainError::NoParent(target_name.to_string()));
        };
        self.ensure_name_available(sibling_name)?;
        let id = self.attach_child(parent, Person::new(sibling_name, sibling_details));
        info!("sibling added: {} next to {}", sibling_name, target_name);
        Ok(id)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn modify_member(&mut self, name: &str, new_details: &str) -> DomainResult<()> {
        let id = self.require_member(name)?;
        if let Some(person) = self.get_mut(id) {
            person.details = new_details.to_string();
        }
        info!("member details updated: {}", name);
        Ok(())
    }

    /// Overwrites the details of a spouse of `member_name`.
    ///
    /// The spouse is a shared person, so every link to it sees the change.
    #[instrument(level = "trace", skip(self))]
    pub fn modify_spouse_details(
        &mut self,
        member_name: &str,
        spouse_name: &str,
        new_details: &str,
    ) -> DomainResult<()> {
        let (_, spouse) = self.require_spouse(member_name, spouse_name)?;
        if let Some(person) = self.get_mut(spouse) {
            person.details = new_details.to_string();
        }
        info!("spouse details updated: {} -> {}", spouse_name, member_name);
        Ok(())
    }

    /// Removes the first spouse named `spouse_name` from the member's list.
    ///
    /// With [`SpouseRemoval::OneSided`] the removed spouse still lists the
    /// member; with [`SpouseRemoval::Mutual`] that entry goes as well.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_spouse(&mut self, member_name: &str, spouse_name: &str) -> DomainResult<PersonId> {
        let (member, spouse) = self.require_spouse(member_name, spouse_name)?;

        if let Some(m) = self.get_mut(member) {
            if let Some(pos) = m.spouses.iter().position(|&s| s == spouse) {
                m.spouses.remove(pos);
            }
        }
        if self.options.spouse_removal == SpouseRemoval::Mutual {
            if let Some(s) = self.get_mut(spouse) {
                if let Some(pos) = s.spouses.iter().position(|&m| m == member) {
                    s.spouses.remove(pos);
                }
            }
        }
        info!(
            policy = ?self.options.spouse_removal,
            "spouse removed: {} from {}", spouse_name, member_name
        );
        Ok(spouse)
    }

    /// First person named `name` in depth-first pre-order from the root.
    ///
    /// Spouse lists are not searched.
    #[instrument(level = "trace", skip(self))]
    pub fn find_member(&self, name: &str) -> Option<PersonId> {
        let found = self
            .iter()
            .find(|(_, person, _)| person.name == name)
            .map(|(id, _, _)| id);
        trace!("find_member: {} -> {:?}", name, found);
        found
    }

    /// Parent of `node` along the `children` edges.
    ///
    /// `None` for the root, for spouses and for handles of another tree.
    pub fn find_parent(&self, node: PersonId) -> Option<PersonId> {
        if node.tree != self.id {
            return None;
        }
        self.parents.get(&node).copied()
    }

    pub fn children_of(&self, id: PersonId) -> impl Iterator<Item = (PersonId, &Person)> + '_ {
        let children = self.get(id).map(|p| p.children.as_slice()).unwrap_or_default();
        children
            .iter()
            .filter_map(move |&child| self.get(child).map(|p| (child, p)))
    }

    pub fn spouses_of(&self, id: PersonId) -> impl Iterator<Item = (PersonId, &Person)> + '_ {
        let spouses = self.get(id).map(|p| p.spouses.as_slice()).unwrap_or_default();
        spouses
            .iter()
            .filter_map(move |&spouse| self.get(spouse).map(|p| (spouse, p)))
    }

    /// Depth-first pre-order traversal yielding `(id, person, depth)`.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Number of generations along `children`; 0 for an empty tree.
    pub fn depth(&self) -> usize {
        self.iter().map(|(_, _, depth)| depth + 1).max().unwrap_or(0)
    }

    fn insert(&mut self, person: Person) -> PersonId {
        PersonId {
            tree: self.id,
            index: self.arena.insert(person),
        }
    }

    fn attach_child(&mut self, parent: PersonId, person: Person) -> PersonId {
        let id = self.insert(person);
        if let Some(p) = self.get_mut(parent) {
            p.children.push(id);
        }
        self.parents.insert(id, parent);
        id
    }

    fn require_member(&self, name: &str) -> DomainResult<PersonId> {
        self.find_member(name).ok_or_else(|| {
            warn!("member not found: {}", name);
            DomainError::MemberNotFound(name.to_string())
        })
    }

    fn require_spouse(&self, member_name: &str, spouse_name: &str) -> DomainResult<(PersonId, PersonId)> {
        let member = self.require_member(member_name)?;
        let spouse = self
            .spouse_position(member, spouse_name)
            .and_then(|pos| self.get(member).and_then(|m| m.spouses.get(pos).copied()));
        match spouse {
            Some(spouse) => Ok((member, spouse)),
            None => {
                warn!("spouse not found: {} -> {}", spouse_name, member_name);
                Err(DomainError::SpouseNotFound {
                    member: member_name.to_string(),
                    spouse: spouse_name.to_string(),
                })
            }
        }
    }

    fn spouse_position(&self, member: PersonId, spouse_name: &str) -> Option<usize> {
        self.get(member)?
            .spouses
            .iter()
            .position(|&s| self.get(s).is_some_and(|p| p.name == spouse_name))
    }

    fn ensure_name_available(&self, name: &str) -> DomainResult<()> {
        if self.options.name_policy == NamePolicy::Unique
            && self.arena.iter().any(|(_, p)| p.name == name)
        {
            warn!("duplicate name rejected: {}", name);
            return Err(DomainError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
}

/// Pre-order iterator over the `children` hierarchy.
pub struct TreeIterator<'a> {
    tree: &'a GenealogyTree,
    stack: Vec<(PersonId, usize)>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a GenealogyTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push((root, 0));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (PersonId, &'a Person, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, depth)) = self.stack.pop() {
            if let Some(person) = self.tree.get(current) {
                // Push children in reverse order for left-to-right traversal
                for &child in person.children.iter().rev() {
                    self.stack.push((child, depth + 1));
                }
                return Some((current, person, depth));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(ids: impl Iterator<Item = (PersonId, &'a Person)>) -> Vec<&'a str> {
        ids.map(|(_, p)| p.name()).collect()
    }

    #[test]
    fn given_empty_tree_then_has_no_root_and_finds_nothing() {
        let tree = GenealogyTree::new("Smith");
        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);
        assert_eq!(tree.find_member(""), None);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.iter().count(), 0);
    }

    #[test]
    fn given_empty_tree_when_adding_child_then_parent_not_found() {
        let mut tree = GenealogyTree::new("Smith");
        let result = tree.add_member("A", "B", "");
        assert_eq!(result, Err(DomainError::ParentNotFound("A".into())));
        assert!(tree.is_empty());
    }

    #[test]
    fn given_tree_when_iterating_then_parent_map_matches_children_lists() {
        let mut tree = GenealogyTree::new("Smith");
        tree.add_member("", "A", "").unwrap();
        tree.add_member("A", "B", "").unwrap();
        tree.add_member("A", "C", "").unwrap();
        tree.add_member("B", "D", "").unwrap();
        tree.add_sibling("D", "E", "").unwrap();

        for (id, _, _) in tree.iter() {
            for (child, _) in tree.children_of(id) {
                assert_eq!(tree.find_parent(child), Some(id));
            }
        }
        assert_eq!(tree.find_parent(tree.root().unwrap()), None);
    }

    #[test]
    fn given_spouse_when_looking_up_parent_then_none() {
        let mut tree = GenealogyTree::new("Smith");
        tree.add_member("", "A", "").unwrap();
        let m = tree.add_spouse("A", "M", "").unwrap();
        assert_eq!(tree.find_parent(m), None);
    }

    #[test]
    fn given_three_generations_then_depth_counts_generations() {
        let mut tree = GenealogyTree::new("Smith");
        tree.add_member("", "A", "").unwrap();
        tree.add_member("A", "B", "").unwrap();
        tree.add_member("B", "D", "").unwrap();
        tree.add_spouse("D", "S", "").unwrap();
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.iter().count(), 3);
    }

    #[test]
    fn given_two_spouses_when_removing_first_then_order_of_rest_kept() {
        let mut tree = GenealogyTree::new("Smith");
        let a = tree.add_member("", "A", "").unwrap();
        tree.add_spouse("A", "M", "").unwrap();
        tree.add_spouse("A", "N", "").unwrap();
        tree.add_spouse("A", "O", "").unwrap();

        tree.remove_spouse("A", "M").unwrap();

        assert_eq!(names(tree.spouses_of(a)), vec!["N", "O"]);
    }

    #[test]
    fn given_unknown_spouse_when_modifying_then_spouse_not_found() {
        let mut tree = GenealogyTree::new("Smith");
        tree.add_member("", "A", "").unwrap();
        let result = tree.modify_spouse_details("A", "Nobody", "x");
        assert_eq!(
            result,
            Err(DomainError::SpouseNotFound {
                member: "A".into(),
                spouse: "Nobody".into()
            })
        );
    }
}
