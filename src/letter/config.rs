//! Generator configuration.

use crate::common::Length;
use crate::letter::error::{LetterError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default template location.
pub const DEFAULT_TEMPLATE: &str = "files/template_surat_izin.docx";
/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "tmp";
/// Default font size of filled-in text, in points.
pub const DEFAULT_FONT_SIZE_PT: u32 = 11;

/// Settings for one or more letter generations.
///
/// Loaded from YAML; every key is optional and unknown keys are rejected.
///
/// ```yaml
/// template: files/template_surat_izin.docx
/// output_dir: tmp
/// font_size: 11
/// pdf:
///   program: soffice
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// The `.docx` template containing the placeholder tokens
    pub template: PathBuf,
    /// Directory the filled letters are written to
    pub output_dir: PathBuf,
    /// Font size applied to filled-in runs, in points
    pub font_size: u32,
    /// PDF conversion settings; conversion is off when absent
    pub pdf: Option<PdfConfig>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            template: PathBuf::from(DEFAULT_TEMPLATE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            font_size: DEFAULT_FONT_SIZE_PT,
            pdf: None,
        }
    }
}

/// PDF conversion settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PdfConfig {
    /// LibreOffice executable
    pub program: PathBuf,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("soffice"),
        }
    }
}

impl GeneratorConfig {
    /// Parse a configuration from YAML.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Self = serde_saphyr::from_str(text).map_err(|e| LetterError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text).map_err(|e| match e {
            LetterError::Config(msg) => LetterError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// The font size as a length.
    #[inline]
    pub fn font_size(&self) -> Length {
        Length::pt(i64::from(self.font_size))
    }

    fn validate(&self) -> Result<()> {
        // w:sz is limited to 1..=1638 points
        if !(1..=1638).contains(&self.font_size) {
            return Err(LetterError::Config(format!(
                "font_size must be between 1 and 1638 points, got {}",
                self.font_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.template, PathBuf::from("files/template_surat_izin.docx"));
        assert_eq!(config.output_dir, PathBuf::from("tmp"));
        assert_eq!(config.font_size(), Length::pt(11));
        assert!(config.pdf.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = GeneratorConfig::from_yaml("output_dir: out\npdf: {}\n").unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.template, PathBuf::from(DEFAULT_TEMPLATE));
        assert_eq!(config.pdf, Some(PdfConfig::default()));
    }

    #[test]
    fn test_full_yaml() {
        let config = GeneratorConfig::from_yaml(
            "template: t.docx\noutput_dir: /srv/izin\nfont_size: 12\npdf:\n  program: /usr/bin/libreoffice\n",
        )
        .unwrap();
        assert_eq!(config.font_size(), Length::pt(12));
        assert_eq!(
            config.pdf.unwrap().program,
            PathBuf::from("/usr/bin/libreoffice")
        );
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = GeneratorConfig::from_yaml("templat: t.docx\n").unwrap_err();
        assert!(matches!(err, LetterError::Config(_)));
    }

    #[test]
    fn test_font_size_range() {
        assert!(GeneratorConfig::from_yaml("font_size: 0\n").is_err());
        assert!(GeneratorConfig::from_yaml("font_size: 72\n").is_ok());
    }
}
