//! CSV export of a genealogy tree
//!
//! Columns: `name,details,spouse-info,depth`. Fields are written verbatim
//! (no quoting), the format existing consumers of the export read.

use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{ExportRow, GenealogyTree, PersonVisitor};
use crate::infrastructure::traits::FileSystem;

pub const CSV_HEADER: &str = "name,details,spouse-info,depth";

/// Visitor writing one CSV line per person.
///
/// The first write error is kept and returned by [`CsvExporter::finish`];
/// later rows are skipped.
pub struct CsvExporter<W: Write> {
    out: W,
    rows: usize,
    error: Option<io::Error>,
}

impl<W: Write> CsvExporter<W> {
    pub fn new(mut out: W, header: bool) -> io::Result<Self> {
        if header {
            writeln!(out, "{}", CSV_HEADER)?;
        }
        Ok(Self {
            out,
            rows: 0,
            error: None,
        })
    }

    /// Flushes and returns the number of rows written.
    pub fn finish(mut self) -> io::Result<usize> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.rows)
    }
}

impl<W: Write> PersonVisitor for CsvExporter<W> {
    fn visit(&mut self, row: &ExportRow<'_>) {
        if self.error.is_some() {
            return;
        }
        match writeln!(
            self.out,
            "{},{},{},{}",
            row.name, row.details, row.spouse_info, row.depth
        ) {
            Ok(()) => self.rows += 1,
            Err(e) => self.error = Some(e),
        }
    }
}

/// Writes the whole tree to `out`; returns the number of rows.
pub fn export_csv<W: Write>(tree: &GenealogyTree, out: W, header: bool) -> io::Result<usize> {
    let mut exporter = CsvExporter::new(out, header)?;
    tree.walk(&mut exporter);
    exporter.finish()
}

/// Renders the tree to CSV and stores it at `path`.
pub fn export_to_path(
    fs: &dyn FileSystem,
    tree: &GenealogyTree,
    path: &Path,
    header: bool,
) -> ApplicationResult<usize> {
    debug!("export_to_path: tree={}, path={}", tree.name(), path.display());
    let mut buffer = Vec::new();
    let rows = export_csv(tree, &mut buffer, header).with_path_context("render csv", path)?;
    let content = String::from_utf8_lossy(&buffer);

    fs.ensure_parent(path)
        .with_path_context("create export directory", path)?;
    fs.write(path, &content).with_path_context("write csv", path)?;
    info!("exported {} rows of {} to {}", rows, tree.name(), path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn given_tree_when_exporting_then_header_and_rows_in_preorder() {
        let mut tree = GenealogyTree::new("Smith");
        tree.add_member("", "A", "founder").unwrap();
        tree.add_member("A", "B", "").unwrap();
        tree.add_member("B", "D", "").unwrap();
        tree.add_spouse("A", "M", "details-of-M").unwrap();

        let mut out = Vec::new();
        let rows = export_csv(&tree, &mut out, true).unwrap();

        assert_eq!(rows, 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name,details,spouse-info,depth\n\
             A,founder,M (details-of-M),0\n\
             B,,,1\n\
             D,,,2\n"
        );
    }

    #[test]
    fn given_no_header_when_exporting_then_rows_only() {
        let mut tree = GenealogyTree::new("Smith");
        tree.add_member("", "A", "").unwrap();

        let mut out = Vec::new();
        export_csv(&tree, &mut out, false).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "A,,,0\n");
    }

    #[test]
    fn given_empty_tree_when_exporting_then_header_only() {
        let tree = GenealogyTree::new("Smith");
        let mut out = Vec::new();
        assert_eq!(export_csv(&tree, &mut out, true).unwrap(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", CSV_HEADER));
    }

    #[test]
    fn given_failing_writer_when_exporting_then_error_returned() {
        let mut tree = GenealogyTree::new("Smith");
        tree.add_member("", "A", "").unwrap();
        assert!(export_csv(&tree, FailingWriter, false).is_err());
    }
}
