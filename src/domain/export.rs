//! Depth-first visitor contract used by exporters

use itertools::Itertools;

use crate::domain::person::PersonId;
use crate::domain::tree::GenealogyTree;

/// Separator between entries of the spouse column.
pub const SPOUSE_SEPARATOR: &str = "; ";

/// One exported row: a person seen during pre-order traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow<'a> {
    pub name: &'a str,
    pub details: &'a str,
    /// `"name (details)"` per spouse, joined by [`SPOUSE_SEPARATOR`]
    pub spouse_info: String,
    /// 0 for the root, +1 per `children` edge
    pub depth: usize,
}

/// Receives rows in depth-first pre-order.
pub trait PersonVisitor {
    fn visit(&mut self, row: &ExportRow<'_>);
}

impl<F> PersonVisitor for F
where
    F: FnMut(&ExportRow<'_>),
{
    fn visit(&mut self, row: &ExportRow<'_>) {
        self(row)
    }
}

impl GenealogyTree {
    /// Renders the spouses of `id` as `"M (details); N (details)"`.
    pub fn spouse_info(&self, id: PersonId) -> String {
        self.spouses_of(id)
            .map(|(_, spouse)| format!("{} ({})", spouse.name(), spouse.details()))
            .join(SPOUSE_SEPARATOR)
    }

    /// Feeds every person reachable through `children` to `visitor`.
    pub fn walk<V: PersonVisitor + ?Sized>(&self, visitor: &mut V) {
        for (id, person, depth) in self.iter() {
            let row = ExportRow {
                name: person.name(),
                details: person.details(),
                spouse_info: self.spouse_info(id),
                depth,
            };
            visitor.visit(&row);
        }
    }
}
