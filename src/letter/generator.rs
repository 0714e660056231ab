//! Filling the template and writing letters.

use crate::common::Length;
use crate::letter::config::GeneratorConfig;
use crate::letter::convert::{DocumentConverter, LibreOfficeConverter};
use crate::letter::error::{LetterError, Result};
use crate::letter::placeholder::Placeholder;
use crate::letter::request::LeaveRequest;
use crate::ooxml::docx::{Document, Package, replace};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A letter written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedLetter {
    /// Where the `.docx` was written
    pub path: PathBuf,
    /// File name of the `.docx`
    pub file_name: String,
    /// The `.docx` content
    pub bytes: Vec<u8>,
    /// The converted PDF, if one was produced
    pub pdf: Option<PathBuf>,
}

impl GeneratedLetter {
    /// Convert the letter, placing the result beside the `.docx`.
    pub fn convert(&mut self, converter: &dyn DocumentConverter) -> Result<&Path> {
        let out_dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let pdf = converter.convert(&self.path, out_dir)?;
        Ok(self.pdf.insert(pdf).as_path())
    }
}

/// Fill every placeholder of the template with the request's values.
///
/// Returns the total number of rewritten runs.
pub fn fill_template(document: &mut Document, request: &LeaveRequest, font_size: Length) -> Result<usize> {
    let mut rewritten = 0;
    for placeholder in Placeholder::plan() {
        rewritten += replace::substitute(document, placeholder.token(), placeholder.value(request), font_size)?;
    }
    Ok(rewritten)
}

/// File name for a request's letter: `{name}-{course}-{leave period}.docx`.
///
/// Characters that are not allowed in file names, path separators
/// included, are replaced by `_`.
pub fn output_file_name(request: &LeaveRequest) -> String {
    format!(
        "{}-{}-{}.docx",
        sanitize(&request.nama_lengkap),
        sanitize(&request.nama_mata_kuliah),
        sanitize(&request.waktu_izin)
    )
}

fn sanitize(component: &str) -> String {
    component
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Generate one letter.
///
/// Loads the template, fills it, and writes the result to
/// `output_dir/output_file_name(request)`. Nothing is written if any step
/// before the write fails.
///
/// # Errors
///
/// `LetterError::TemplateNotFound` when the template is missing; document
/// and I/O errors otherwise.
pub fn generate(config: &GeneratorConfig, request: &LeaveRequest) -> Result<GeneratedLetter> {
    if !config.template.is_file() {
        return Err(LetterError::TemplateNotFound(config.template.clone()));
    }

    let mut package = Package::open(&config.template)?;
    let mut document = package.document()?;
    let rewritten = fill_template(&mut document, request, config.font_size())?;
    package.set_document(&document)?;
    let bytes = package.to_bytes()?;

    std::fs::create_dir_all(&config.output_dir)?;
    let file_name = output_file_name(request);
    let path = config.output_dir.join(&file_name);
    std::fs::write(&path, &bytes)?;
    info!(path = %path.display(), rewritten, "letter written");

    Ok(GeneratedLetter {
        path,
        file_name,
        bytes,
        pdf: None,
    })
}

/// Generate many letters in parallel.
///
/// Results are returned in request order. When PDF conversion is
/// configured, a failed conversion is logged and the letter is still
/// returned, without a PDF.
pub fn generate_batch(config: &GeneratorConfig, requests: &[LeaveRequest]) -> Vec<Result<GeneratedLetter>> {
    let converter = config
        .pdf
        .as_ref()
        .map(|pdf| LibreOfficeConverter::new(pdf.program.clone()));

    requests
        .par_iter()
        .map(|request| {
            let mut letter = generate(config, request)?;
            if let Some(converter) = &converter
                && let Err(e) = letter.convert(converter)
            {
                warn!(path = %letter.path.display(), error = %e, "PDF conversion failed");
            }
            Ok(letter)
        })
        .collect()
}
