//! Application layer: registry, script sessions and export
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod export;
pub mod registry;
pub mod script;
pub mod session;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use export::{export_csv, export_to_path, CsvExporter, CSV_HEADER};
pub use registry::FamilyRegistry;
pub use script::{Operation, ScriptLine, ScriptParser};
pub use session::{LineReport, Outcome, Session};
