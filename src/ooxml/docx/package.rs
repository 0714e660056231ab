/// Package implementation for Word documents.
use crate::ooxml::docx::document::Document;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::content_type as ct;
use crate::ooxml::opc::{MainPart, OpcPackage};
use std::io::{Read, Seek};
use std::path::Path;

/// Content types accepted for the main document part.
const WML_MAIN_CONTENT_TYPES: [&str; 4] = [
    ct::WML_DOCUMENT_MAIN,
    ct::WML_DOCUMENT_MACRO_MAIN,
    ct::WML_TEMPLATE_MAIN,
    ct::WML_TEMPLATE_MACRO_MAIN,
];

/// A Word (.docx) package.
///
/// This is the main entry point for working with Word documents.
/// It wraps an OPC package and provides Word-specific functionality.
///
/// # Examples
///
/// ```rust,no_run
/// use surat_izin::ooxml::docx::Package;
///
/// // Open an existing document
/// let mut pkg = Package::open("files/template_surat_izin.docx")?;
///
/// // Get the main document, edit it, and put it back
/// let mut doc = pkg.document()?;
/// for para in doc.paragraphs_mut() {
///     for run in para.runs_mut() {
///         run.set_bold(Some(true));
///     }
/// }
/// pkg.set_document(&doc)?;
/// pkg.save("bold.docx")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Package {
    /// The underlying OPC package
    opc: OpcPackage,
    /// The main document part, resolved when the package is opened
    main_part: MainPart,
}

impl Package {
    /// Open a .docx package from a file path.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the .docx file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_opc(OpcPackage::open(path)?)
    }

    /// Create a .docx package from a reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - A reader containing the .docx file data (must implement Read + Seek)
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use surat_izin::ooxml::docx::Package;
    /// use std::io::Cursor;
    ///
    /// let data = std::fs::read("document.docx")?;
    /// let pkg = Package::from_reader(Cursor::new(data))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_opc(OpcPackage::from_reader(reader)?)
    }

    /// Create a .docx package from owned bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_opc(OpcPackage::from_bytes(data)?)
    }

    fn from_opc(opc: OpcPackage) -> Result<Self> {
        // Verify it's a Word document by checking the main part's content type
        let main_part = opc
            .main_document_part()
            .map_err(|e| OoxmlError::PartNotFound(format!("main document part: {}", e)))?;

        if !WML_MAIN_CONTENT_TYPES.contains(&main_part.content_type.as_str()) {
            return Err(OoxmlError::InvalidContentType {
                expected: ct::WML_DOCUMENT_MAIN.to_string(),
                got: main_part.content_type,
            });
        }

        Ok(Self { opc, main_part })
    }

    /// Parse the main document.
    ///
    /// The returned document is an independent copy; edits reach the
    /// package only through [`Package::set_document`].
    pub fn document(&self) -> Result<Document> {
        Document::from_xml(self.opc.blob_for(&self.main_part.partname)?)
    }

    /// Serialize `document` into the main document part.
    pub fn set_document(&mut self, document: &Document) -> Result<()> {
        self.opc
            .set_blob(&self.main_part.partname, document.to_bytes())?;
        Ok(())
    }

    /// Serialize the package to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.opc.to_bytes()?)
    }

    /// Write the package to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.opc.save(path)?;
        Ok(())
    }

    /// Get the main document part's name and content type.
    #[inline]
    pub fn main_part(&self) -> &MainPart {
        &self.main_part
    }

    /// Get the underlying OPC package.
    ///
    /// This provides access to lower-level package operations.
    #[inline]
    pub fn opc_package(&self) -> &OpcPackage {
        &self.opc
    }
}
