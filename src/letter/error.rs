/// Error types for letter generation.
use crate::ooxml::error::OoxmlError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for letter generation.
pub type Result<T> = std::result::Result<T, LetterError>;

/// Errors raised while generating a leave letter.
#[derive(Error, Debug)]
pub enum LetterError {
    /// The configured template does not exist
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// Loading, editing, or saving the document failed
    #[error("Document error: {0}")]
    Document(#[from] OoxmlError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration file
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Invalid leave request file
    #[error("Invalid request: {0}")]
    Request(String),

    /// PDF conversion failed
    #[error("Conversion failed: {0}")]
    Conversion(String),
}
