//! Domain layer: genealogy data model and its operations
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod export;
pub mod person;
pub mod policy;
pub mod render;
pub mod tree;

pub use error::{DomainError, DomainResult};
pub use export::{ExportRow, PersonVisitor, SPOUSE_SEPARATOR};
pub use person::{Person, PersonId};
pub use policy::{NamePolicy, SpouseRemoval, TreeOptions};
pub use render::TreeRender;
pub use tree::{GenealogyTree, TreeIterator};
