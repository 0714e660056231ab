//! The in-memory OPC package.
//!
//! OpcPackage keeps every ZIP member as loaded and indexes the two pieces of
//! package metadata needed to work with the main document: the content type
//! map and the package-level relationships.

use crate::ooxml::opc::constants::relationship_type;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PACKAGE_URI, PackURI};
use crate::ooxml::opc::phys_pkg::{PhysMember, PhysPkgReader, PhysPkgWriter};
use crate::ooxml::opc::pkgreader::ContentTypeMap;
use crate::ooxml::opc::rel::Relationships;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;

/// The main document part of a package, as resolved through the
/// `officeDocument` relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainPart {
    /// Partname of the main part (usually `/word/document.xml`)
    pub partname: PackURI,
    /// Content type declared for it in `[Content_Types].xml`
    pub content_type: String,
}

/// Main API class for working with OPC packages.
///
/// # Example
/// ```no_run
/// use surat_izin::ooxml::opc::OpcPackage;
///
/// let pkg = OpcPackage::open("template.docx")?;
/// let main = pkg.main_document_part()?;
/// println!("{} ({})", main.partname, main.content_type);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct OpcPackage {
    /// All archive members in their original order
    members: Vec<PhysMember>,

    /// Content types from [Content_Types].xml
    content_types: ContentTypeMap,

    /// Package-level relationships (_rels/.rels)
    rels: Relationships,
}

impl OpcPackage {
    /// Open an OPC package from a file.
    ///
    /// # Errors
    /// Returns `OpcError::PackageNotFound` if the file does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(OpcError::PackageNotFound(path.display().to_string()));
        }
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Load an OPC package from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_members(PhysPkgReader::read_members(reader)?)
    }

    /// Load an OPC package from owned bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(data))
    }

    fn from_members(members: Vec<PhysMember>) -> Result<Self> {
        let content_types_uri = PackURI::new(CONTENT_TYPES_URI).map_err(OpcError::InvalidPackUri)?;
        let content_types_xml = find_member(&members, &content_types_uri)
            .ok_or_else(|| OpcError::PartNotFound("[Content_Types].xml".to_string()))?;
        let content_types = ContentTypeMap::from_xml(&content_types_xml.data)?;

        let package_uri = PackURI::new(PACKAGE_URI).map_err(OpcError::InvalidPackUri)?;
        let rels_uri = package_uri.rels_uri().map_err(OpcError::InvalidPackUri)?;
        let rels = match find_member(&members, &rels_uri) {
            Some(member) => Relationships::from_xml(PACKAGE_URI, &member.data)?,
            None => Relationships::new(PACKAGE_URI.to_string()),
        };

        Ok(Self {
            members,
            content_types,
            rels,
        })
    }

    /// Get the package-level relationships.
    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// Get the number of file members (directories excluded).
    pub fn part_count(&self) -> usize {
        self.members.iter().filter(|m| !m.is_dir).count()
    }

    /// Iterate over the member names in archive order.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.name.as_str())
    }

    /// Check whether a part exists.
    pub fn contains(&self, partname: &PackURI) -> bool {
        find_member(&self.members, partname).is_some()
    }

    /// Get the content type of a part.
    pub fn content_type(&self, partname: &PackURI) -> Result<&str> {
        self.content_types.get(partname)
    }

    /// Get the binary content of a part.
    pub fn blob_for(&self, partname: &PackURI) -> Result<&[u8]> {
        find_member(&self.members, partname)
            .map(|m| m.data.as_slice())
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    /// Replace the binary content of an existing part.
    ///
    /// Only existing parts can be replaced, since adding a part would also
    /// require new content type and relationship entries.
    pub fn set_blob(&mut self, partname: &PackURI, data: Vec<u8>) -> Result<()> {
        let member = self
            .members
            .iter_mut()
            .find(|m| !m.is_dir && member_matches(&m.name, partname))
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))?;
        member.data = data;
        Ok(())
    }

    /// Resolve the main document part through the `officeDocument` relationship.
    pub fn main_document_part(&self) -> Result<MainPart> {
        let rel = self
            .rels
            .part_with_reltype(relationship_type::OFFICE_DOCUMENT)?;
        let partname = rel.target_partname()?;
        if !self.contains(&partname) {
            return Err(OpcError::PartNotFound(partname.to_string()));
        }
        let content_type = self.content_type(&partname)?.to_string();
        Ok(MainPart {
            partname,
            content_type,
        })
    }

    /// Serialize the package to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = PhysPkgWriter::new();
        for member in &self.members {
            if member.is_dir {
                writer.add_directory(&member.name)?;
            } else {
                writer.write(&member.name, &member.data)?;
            }
        }
        writer.finish()
    }

    /// Write the package to a stream.
    pub fn write_to_stream<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes()?)?;
        Ok(())
    }

    /// Write the package to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

/// ZIP member names are matched case-insensitively, as OPC partnames are.
fn member_matches(name: &str, partname: &PackURI) -> bool {
    name.eq_ignore_ascii_case(partname.membername())
}

fn find_member<'a>(members: &'a [PhysMember], partname: &PackURI) -> Option<&'a PhysMember> {
    members
        .iter()
        .find(|m| !m.is_dir && member_matches(&m.name, partname))
}
