use crate::ooxml::opc::constants::target_mode;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
/// Relationship-related objects for OPC packages.
///
/// This module provides types for reading the relationships between parts in
/// an OPC package, including internal and external relationships.
use quick_xml::Reader;
use quick_xml::events::Event;
use smallvec::SmallVec;

/// A single relationship from a source part to a target.
///
/// Represents a connection between parts in an OPC package, identified by an rId
/// (relationship ID). Can be either internal (pointing to another part) or external
/// (pointing to an external URL).
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target reference - either a part URI or external URL
    target_ref: String,

    /// Base URI for resolving relative references
    base_uri: String,

    /// Whether this is an external relationship
    is_external: bool,
}

impl Relationship {
    /// Create a new relationship.
    pub fn new(
        r_id: String,
        reltype: String,
        target_ref: String,
        base_uri: String,
        is_external: bool,
    ) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
            base_uri,
            is_external,
        }
    }

    /// Get the relationship ID.
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    /// Get the relationship type.
    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Get the target reference.
    ///
    /// For internal relationships, this is a relative part reference.
    /// For external relationships, this is an absolute URL.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    /// Check if this is an external relationship.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }

    /// Get the absolute target partname for internal relationships.
    ///
    /// Returns an error if this is an external relationship.
    pub fn target_partname(&self) -> Result<PackURI> {
        if self.is_external {
            return Err(OpcError::InvalidRelationship(
                "Cannot get target_partname for external relationship".to_string(),
            ));
        }
        PackURI::from_rel_ref(&self.base_uri, &self.target_ref).map_err(OpcError::InvalidPackUri)
    }
}

/// Collection of relationships from a single source, in document order.
///
/// Uses SmallVec since a source rarely has more than a handful of relationships.
#[derive(Debug, Default)]
pub struct Relationships {
    /// Base URI for resolving relative references
    base_uri: String,

    rels: SmallVec<[Relationship; 8]>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new(base_uri: String) -> Self {
        Self {
            base_uri,
            rels: SmallVec::new(),
        }
    }

    /// Parse a .rels part.
    ///
    /// # Arguments
    /// * `base_uri` - Base URI of the source part, used to resolve targets
    /// * `xml` - The content of the .rels part
    pub fn from_xml(base_uri: &str, xml: &[u8]) -> Result<Self> {
        let mut rels = Self::new(base_uri.to_string());
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut r_id = None;
                    let mut reltype = None;
                    let mut target_ref = None;
                    let mut mode = None;

                    for attr in e.attributes() {
                        let attr = attr?;
                        let value = attr.unescape_value()?.to_string();
                        match attr.key.as_ref() {
                            b"Id" => r_id = Some(value),
                            b"Type" => reltype = Some(value),
                            b"Target" => target_ref = Some(value),
                            b"TargetMode" => mode = Some(value),
                            _ => {},
                        }
                    }

                    match (r_id, reltype, target_ref) {
                        (Some(r_id), Some(reltype), Some(target_ref)) => {
                            let is_external = mode.as_deref() == Some(target_mode::EXTERNAL);
                            rels.add_relationship(reltype, target_ref, r_id, is_external);
                        },
                        _ => {
                            return Err(OpcError::InvalidRelationship(
                                "Relationship element is missing Id, Type or Target".to_string(),
                            ));
                        },
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OpcError::XmlError(format!(
                        "Relationships parse error: {}",
                        e
                    )));
                },
                _ => {},
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Add a relationship to the collection.
    pub fn add_relationship(
        &mut self,
        reltype: String,
        target_ref: String,
        r_id: String,
        is_external: bool,
    ) {
        self.rels.push(Relationship::new(
            r_id,
            reltype,
            target_ref,
            self.base_uri.clone(),
            is_external,
        ));
    }

    /// Get a relationship by its ID.
    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.r_id() == r_id)
    }

    /// Get the relationship of a specific type.
    ///
    /// Returns an error if no relationship of the type is found,
    /// or if multiple relationships of the type exist.
    pub fn part_with_reltype(&self, reltype: &str) -> Result<&Relationship> {
        let mut matching = self.rels.iter().filter(|rel| rel.reltype() == reltype);

        match (matching.next(), matching.next()) {
            (None, _) => Err(OpcError::RelationshipNotFound(format!(
                "No relationship of type '{}'",
                reltype
            ))),
            (Some(rel), None) => Ok(rel),
            (Some(_), Some(_)) => Err(OpcError::InvalidRelationship(format!(
                "Multiple relationships of type '{}'",
                reltype
            ))),
        }
    }

    /// Get an iterator over all relationships.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    /// Get the number of relationships in the collection.
    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    /// Check if the collection is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::relationship_type;

    const PKG_RELS: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
        r#"<Relationship Id="rId9" Type="http://example.com/link" Target="https://example.com/?a=1&amp;b=2" TargetMode="External"/>"#,
        r#"</Relationships>"#
    );

    #[test]
    fn test_relationship_creation() {
        let rel = Relationship::new(
            "rId1".to_string(),
            "http://example.com/rel".to_string(),
            "target.xml".to_string(),
            "/word".to_string(),
            false,
        );

        assert_eq!(rel.r_id(), "rId1");
        assert_eq!(rel.reltype(), "http://example.com/rel");
        assert!(!rel.is_external());
        assert_eq!(rel.target_partname().unwrap().as_str(), "/word/target.xml");
    }

    #[test]
    fn test_from_xml() {
        let rels = Relationships::from_xml("/", PKG_RELS.as_bytes()).unwrap();
        assert_eq!(rels.len(), 3);

        let main = rels.part_with_reltype(relationship_type::OFFICE_DOCUMENT).unwrap();
        assert_eq!(main.r_id(), "rId1");
        assert_eq!(main.target_partname().unwrap().as_str(), "/word/document.xml");

        let link = rels.get("rId9").unwrap();
        assert!(link.is_external());
        assert_eq!(link.target_ref(), "https://example.com/?a=1&b=2");
        assert!(link.target_partname().is_err());
    }

    #[test]
    fn test_part_with_reltype_errors() {
        let mut rels = Relationships::new("/".to_string());
        assert!(matches!(
            rels.part_with_reltype("type1"),
            Err(OpcError::RelationshipNotFound(_))
        ));

        rels.add_relationship("type1".into(), "a.xml".into(), "rId1".into(), false);
        rels.add_relationship("type1".into(), "b.xml".into(), "rId2".into(), false);
        assert!(matches!(
            rels.part_with_reltype("type1"),
            Err(OpcError::InvalidRelationship(_))
        ));
    }
}
