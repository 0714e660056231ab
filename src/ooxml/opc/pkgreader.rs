//! Content type discovery for a serialized Open Packaging Convention (OPC) package.
//!
//! Implements the `[Content_Types].xml` lookup: an `Override` for the exact
//! partname wins, otherwise the `Default` for the part's extension applies.

use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;

/// Content type map for looking up content types by part name or extension.
///
/// Implements the OPC content type discovery algorithm using Default and Override elements
/// from [Content_Types].xml. Uses hash maps for O(1) lookup.
#[derive(Debug, Default)]
pub struct ContentTypeMap {
    /// Maps lowercase file extensions to default content types
    defaults: HashMap<String, String>,

    /// Maps specific partnames to override content types
    overrides: HashMap<String, String>,
}

impl ContentTypeMap {
    /// Parse content types from [Content_Types].xml.
    ///
    /// Uses quick-xml for streaming XML parsing with minimal allocation.
    pub fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut map = Self::default();
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    match e.local_name().as_ref() {
                        b"Default" => {
                            // Parse Default element: <Default Extension="xml" ContentType="application/xml"/>
                            let mut extension = None;
                            let mut content_type = None;

                            for attr in e.attributes() {
                                let attr = attr?;
                                match attr.key.as_ref() {
                                    b"Extension" => {
                                        extension = Some(attr.unescape_value()?.to_string());
                                    },
                                    b"ContentType" => {
                                        content_type = Some(attr.unescape_value()?.to_string());
                                    },
                                    _ => {},
                                }
                            }

                            if let (Some(ext), Some(ct)) = (extension, content_type) {
                                map.add_default(ext, ct);
                            }
                        },
                        b"Override" => {
                            // Parse Override element: <Override PartName="/word/document.xml" ContentType="..."/>
                            let mut partname = None;
                            let mut content_type = None;

                            for attr in e.attributes() {
                                let attr = attr?;
                                match attr.key.as_ref() {
                                    b"PartName" => {
                                        partname = Some(attr.unescape_value()?.to_string());
                                    },
                                    b"ContentType" => {
                                        content_type = Some(attr.unescape_value()?.to_string());
                                    },
                                    _ => {},
                                }
                            }

                            if let (Some(pn), Some(ct)) = (partname, content_type) {
                                map.add_override(pn, ct);
                            }
                        },
                        _ => {},
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OpcError::XmlError(format!(
                        "Content types parse error: {}",
                        e
                    )));
                },
                _ => {},
            }
            buf.clear();
        }

        Ok(map)
    }

    /// Add a default content type mapping for a file extension.
    pub fn add_default(&mut self, extension: String, content_type: String) {
        self.defaults.insert(extension.to_lowercase(), content_type);
    }

    /// Add an override content type mapping for a specific partname.
    ///
    /// Partnames compare case-insensitively in OPC, so they are stored lowercase.
    pub fn add_override(&mut self, partname: String, content_type: String) {
        self.overrides.insert(partname.to_lowercase(), content_type);
    }

    /// Get the content type for a partname.
    ///
    /// First checks for an override, then falls back to the default
    /// based on file extension.
    pub fn get(&self, pack_uri: &PackURI) -> Result<&str> {
        if let Some(ct) = self.overrides.get(&pack_uri.as_str().to_lowercase()) {
            return Ok(ct);
        }

        if let Some(ct) = self.defaults.get(&pack_uri.ext().to_lowercase()) {
            return Ok(ct);
        }

        Err(OpcError::ContentTypeNotFound(pack_uri.to_string()))
    }
}
