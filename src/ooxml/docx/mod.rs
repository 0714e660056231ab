/// Word (.docx) document support.
///
/// This module provides loading, in-place editing, and saving of Microsoft
/// Word documents in the Office Open XML (OOXML) format (.docx files).
///
/// # Architecture
///
/// The module is organized around these key types:
/// - `Package`: The overall .docx file package
/// - `Document`: The body of `word/document.xml`
/// - `Paragraph`: A paragraph with runs
/// - `Run`: A text run with formatting
/// - `Table`: A table with rows and cells
///
/// Everything the model does not type (drawings, fields, section
/// properties, ...) is carried as raw XML and written back unchanged.
///
/// # Example
///
/// ```rust,no_run
/// use surat_izin::ooxml::docx::Package;
///
/// // Open a document
/// let package = Package::open("files/template_surat_izin.docx")?;
/// let doc = package.document()?;
///
/// // Access paragraphs and runs
/// for para in doc.paragraphs() {
///     println!("Paragraph: {}", para.text());
///     for run in para.runs() {
///         println!("  Run: {} (bold: {:?})", run.text(), run.bold());
///     }
/// }
///
/// // Access tables
/// for table in doc.tables() {
///     for row in table.rows() {
///         for cell in row.cells() {
///             println!("Cell: {}", cell.text());
///         }
///     }
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub mod document;
pub mod format;
pub mod package;
pub mod paragraph;
pub mod replace;
pub mod run;
pub mod table;
mod wml;

pub use document::{BlockItem, Document};
pub use format::UnderlineStyle;
pub use package::Package;
pub use paragraph::{Inline, Paragraph};
pub use replace::{TokenLocation, locate, substitute, substitute_default};
pub use run::Run;
pub use table::{Cell, Row, Table};
