//! Office Open XML (OOXML) format implementation.
//!
//! This module provides loading, in-place editing, and saving of Word
//! (.docx) documents.
//!
//! # Architecture
//!
//! The module is organized into layers:
//!
//! 1. **OPC Layer** (`opc`): Low-level package handling (ZIP, content types, relationships)
//! 2. **Error** (`error`): The error type shared by the format modules
//! 3. **Word** (`docx`): The paragraph/run/table model and the placeholder
//!    substitution engine
//!
//! # Example: Filling a placeholder
//!
//! ```rust,no_run
//! use surat_izin::ooxml::docx::{Package, replace};
//!
//! let mut pkg = Package::open("template.docx")?;
//! let mut doc = pkg.document()?;
//! replace::substitute_default(&mut doc, "nama_dosen", "Dr. Siti Aminah")?;
//! pkg.set_document(&doc)?;
//! pkg.save("filled.docx")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod docx;
pub mod error;
pub mod opc;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types from OPC layer
pub use opc::{OpcPackage, PackURI};

// Re-export error types
pub use error::{OoxmlError, Result};
