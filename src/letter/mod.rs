//! Leave letter (surat izin) generation.
//!
//! A [`LeaveRequest`] carries the thirteen form fields a student submits.
//! [`generate`] loads the letter template, fills each [`Placeholder`] with
//! the matching field, and writes the result to the configured output
//! directory as `{name}-{course}-{leave period}.docx`.
//!
//! # Example
//!
//! ```rust,no_run
//! use surat_izin::letter::{GeneratorConfig, LeaveRequest, generate};
//!
//! let config = GeneratorConfig::default();
//! let request = LeaveRequest::load("izin.yaml")?;
//! let letter = generate(&config, &request)?;
//! println!("{}", letter.path.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod generator;
pub mod placeholder;
pub mod request;

pub use config::{GeneratorConfig, PdfConfig};
pub use convert::{DocumentConverter, LibreOfficeConverter};
pub use error::{LetterError, Result};
pub use generator::{GeneratedLetter, fill_template, generate, generate_batch, output_file_name};
pub use placeholder::Placeholder;
pub use request::LeaveRequest;
