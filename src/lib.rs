//! Surat Izin - fills student leave-of-absence letters from a Word template
//!
//! The template is an ordinary `.docx` in which each form field appears as
//! a literal placeholder token (`nama_mata_kuliah`, `nims`, ...). Filling
//! a placeholder replaces the text of every run containing the token while
//! keeping the run's bold, italic, underline and color, and sets its font
//! size.
//!
//! # Modules
//!
//! - [`ooxml`]: the .docx package, the paragraph/run/table model, and the
//!   substitution engine
//! - [`letter`]: leave requests, configuration, and letter generation
//! - [`common`]: XML tree, colors, and lengths shared by both
//!
//! # Example - Filling a template
//!
//! ```no_run
//! use surat_izin::letter::{GeneratorConfig, LeaveRequest, generate};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GeneratorConfig::load("surat-izin.yaml")?;
//! let request = LeaveRequest::load("izin.yaml")?;
//! let letter = generate(&config, &request)?;
//! println!("Written: {}", letter.path.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Replacing a single token
//!
//! ```no_run
//! use surat_izin::ooxml::docx::{Package, replace};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pkg = Package::open("template.docx")?;
//! let mut doc = pkg.document()?;
//! let rewritten = replace::substitute_default(&mut doc, "nama_dosen", "Dr. Siti Aminah")?;
//! println!("{} runs rewritten", rewritten);
//! pkg.set_document(&doc)?;
//! pkg.save("filled.docx")?;
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod letter;
pub mod ooxml;
