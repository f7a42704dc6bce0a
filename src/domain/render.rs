/*
Text rendering of a genealogy tree via termtree.
Spouses are shown inline in the member's label, they are not nodes of the rendered tree.
 */
use itertools::Itertools;
use termtree::Tree;

use crate::domain::person::PersonId;
use crate::domain::tree::GenealogyTree;

pub trait TreeRender {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeRender for GenealogyTree {
    fn to_tree_string(&self) -> Tree<String> {
        let Some(root) = self.root() else {
            return Tree::new(format!("{} (empty)", self.name()));
        };
        let mut tree = Tree::new(label(self, root));

        fn build_tree(genealogy: &GenealogyTree, id: PersonId, parent_tree: &mut Tree<String>) {
            for (child, _) in genealogy.children_of(id) {
                let mut child_tree = Tree::new(label(genealogy, child));
                build_tree(genealogy, child, &mut child_tree);
                parent_tree.push(child_tree);
            }
        }

        build_tree(self, root, &mut tree);
        tree
    }
}

/// `name (spouses: A, B) [details]`, omitting empty parts.
fn label(tree: &GenealogyTree, id: PersonId) -> String {
    let Some(person) = tree.get(id) else {
        return String::new();
    };
    let mut text = person.name().to_string();
    let spouses = tree.spouses_of(id).map(|(_, s)| s.name()).join(", ");
    if !spouses.is_empty() {
        text.push_str(&format!(" (spouses: {})", spouses));
    }
    if !person.details().is_empty() {
        text.push_str(&format!(" [{}]", person.details()));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_empty_tree_then_renders_placeholder() {
        let tree = GenealogyTree::new("Smith");
        assert_eq!(tree.to_tree_string().to_string().trim(), "Smith (empty)");
    }

    #[test]
    fn given_members_and_spouses_then_labels_and_nesting_are_rendered() {
        let mut tree = GenealogyTree::new("Smith");
        tree.add_member("", "A", "patriarch").unwrap();
        tree.add_member("A", "B", "").unwrap();
        tree.add_member("B", "D", "").unwrap();
        tree.add_member("A", "C", "").unwrap();
        tree.add_spouse("A", "M", "").unwrap();
        tree.add_spouse("A", "N", "").unwrap();

        let rendered = tree.to_tree_string().to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "A (spouses: M, N) [patriarch]");
        assert!(lines[1].ends_with("B"));
        assert!(lines[2].ends_with("D"));
        assert!(lines[3].ends_with("C"));
        assert_eq!(lines.len(), 4);
        // D is nested one level deeper than B
        assert!(lines[2].find('D') > lines[1].find('B'));
    }
}
