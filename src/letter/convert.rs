//! Conversion of generated letters to PDF.

use crate::letter::error::{LetterError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Converts a `.docx` file into another format.
pub trait DocumentConverter: Send + Sync {
    /// Convert `docx`, writing the result into `out_dir`.
    ///
    /// Returns the path of the converted file.
    fn convert(&self, docx: &Path, out_dir: &Path) -> Result<PathBuf>;
}

/// PDF conversion through a headless LibreOffice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibreOfficeConverter {
    program: PathBuf,
}

impl LibreOfficeConverter {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }

    #[inline]
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for LibreOfficeConverter {
    fn default() -> Self {
        Self::new("soffice")
    }
}

impl DocumentConverter for LibreOfficeConverter {
    fn convert(&self, docx: &Path, out_dir: &Path) -> Result<PathBuf> {
        let stem = docx
            .file_stem()
            .ok_or_else(|| LetterError::Conversion(format!("not a file path: {}", docx.display())))?;
        // Stems may contain dots, e.g. dates
        let mut pdf_name = stem.to_os_string();
        pdf_name.push(".pdf");
        let pdf = out_dir.join(pdf_name);

        debug!(program = %self.program.display(), docx = %docx.display(), "converting to PDF");
        let output = Command::new(&self.program)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(out_dir)
            .arg(docx)
            .output()
            .map_err(|e| LetterError::Conversion(format!("failed to run {}: {}", self.program.display(), e)))?;

        if !output.status.success() {
            return Err(LetterError::Conversion(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        if !pdf.is_file() {
            return Err(LetterError::Conversion(format!(
                "{} did not produce {}",
                self.program.display(),
                pdf.display()
            )));
        }
        Ok(pdf)
    }
}
