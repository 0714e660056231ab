/// Open Packaging Conventions (OPC) implementation.
///
/// This module provides the parts of the OPC specification needed to open a
/// `.docx` package, locate and rewrite its main document part, and write the
/// package back out:
///
/// - ZIP-based physical packaging (`phys_pkg`)
/// - Content type discovery (`pkgreader`)
/// - Package relationships (`rel`)
/// - The in-memory package (`package`)
///
/// Every member of the archive is kept in its original order, so parts this
/// crate never touches are written back byte-for-byte.
pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod phys_pkg;
pub mod pkgreader;
pub mod rel;

// Re-export commonly used types
pub use package::{MainPart, OpcPackage};
pub use packuri::PackURI;
pub use rel::{Relationship, Relationships};
