//! A small lossless XML element tree.
//!
//! The WordprocessingML model keeps everything it does not understand as raw
//! nodes, so the tree must round-trip a part without dropping declarations,
//! comments, namespace attributes, or significant whitespace.

use super::escape::{
    escape_text, escape_xml, normalize_attribute, normalize_line_endings, resolve_reference, unescape_xml,
};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fmt::Write as FmtWrite;
use thiserror::Error;

/// Errors raised while parsing an XML part into a tree.
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("XML is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Malformed XML: {0}")]
    Malformed(String),
}

/// A node in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// An element with attributes and children
    Element(XmlElement),
    /// Unescaped character data
    Text(String),
    /// Raw CDATA content
    CData(String),
    /// Raw comment content
    Comment(String),
    /// Raw processing instruction content (`target data`)
    ProcessingInstruction(String),
    /// Raw doctype content
    DocType(String),
}

impl XmlNode {
    /// Get the node as an element, if it is one.
    #[inline]
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Get the node as a mutable element, if it is one.
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlNode::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Serialize this node.
    pub fn write_to(&self, out: &mut String) {
        match self {
            XmlNode::Element(el) => el.write_to(out),
            XmlNode::Text(text) => out.push_str(&escape_text(text)),
            XmlNode::CData(data) => {
                out.push_str("<![CDATA[");
                out.push_str(data);
                out.push_str("]]>");
            },
            XmlNode::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            },
            XmlNode::ProcessingInstruction(pi) => {
                out.push_str("<?");
                out.push_str(pi);
                out.push_str("?>");
            },
            XmlNode::DocType(doctype) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(doctype);
                out.push('>');
            },
        }
    }
}

/// An XML element.
///
/// Names are kept qualified exactly as written (e.g. `w:p`); attribute values
/// are stored unescaped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    /// Qualified element name
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Get the local part of the element name (`p` for `w:p`).
    #[inline]
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Get the namespace prefix of the element name, if any.
    #[inline]
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Get an attribute value by qualified name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Get an attribute value by local name, ignoring the prefix.
    pub fn attribute_local(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| local_part(key) == local)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Remove an attribute by qualified name, returning its value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(pos).1)
    }

    /// Iterate over child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    /// Iterate mutably over child elements.
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(XmlNode::as_element_mut)
    }

    /// Find the first child element with the given qualified name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|el| el.name == name)
    }

    /// Find the first child element with the given qualified name, mutably.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.child_elements_mut().find(|el| el.name == name)
    }

    /// Serialize the element and its subtree.
    pub fn write_to(&self, out: &mut String) {
        self.write_start(out, self.children.is_empty());
        if !self.children.is_empty() {
            for child in &self.children {
                child.write_to(out);
            }
            self.write_end(out);
        }
    }

    /// Write only the start tag (or a self-closing tag when `empty`).
    pub fn write_start(&self, out: &mut String, empty: bool) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            // Writing into a String cannot fail
            let _ = write!(out, " {}=\"{}\"", key, escape_xml(value));
        }
        out.push_str(if empty { "/>" } else { ">" });
    }

    /// Write only the end tag.
    pub fn write_end(&self, out: &mut String) {
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    /// Serialize the element to a string.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    /// Parse a standalone XML fragment with a single root element.
    pub fn parse(xml: &str) -> Result<Self, XmlError> {
        XmlTree::parse(xml.as_bytes()).map(|tree| tree.root)
    }
}

/// A parsed XML document: declaration, prolog, root element, and epilog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlTree {
    /// Raw declaration content (e.g. `xml version="1.0" standalone="yes"`)
    pub declaration: Option<String>,
    /// Nodes between the declaration and the root element
    pub prolog: Vec<XmlNode>,
    /// The document element
    pub root: XmlElement,
    /// Nodes after the root element
    pub epilog: Vec<XmlNode>,
}

impl XmlTree {
    /// Parse an XML document from bytes.
    pub fn parse(xml: &[u8]) -> Result<Self, XmlError> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(false);

        let mut declaration = None;
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut root: Option<XmlElement> = None;
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut buf = Vec::with_capacity(1024);

        loop {
            let event = reader.read_event_into(&mut buf)?;
            let node = match event {
                Event::Start(e) => {
                    stack.push(element_from_start(&e)?);
                    None
                },
                Event::End(_) => {
                    let finished = stack
                        .pop()
                        .ok_or_else(|| XmlError::Malformed("unexpected end tag".to_string()))?;
                    if stack.is_empty() {
                        if root.is_some() {
                            return Err(XmlError::Malformed("multiple root elements".to_string()));
                        }
                        root = Some(finished);
                        None
                    } else {
                        Some(XmlNode::Element(finished))
                    }
                },
                Event::Empty(e) => {
                    let el = element_from_start(&e)?;
                    if stack.is_empty() {
                        if root.is_some() {
                            return Err(XmlError::Malformed("multiple root elements".to_string()));
                        }
                        root = Some(el);
                        None
                    } else {
                        Some(XmlNode::Element(el))
                    }
                },
                Event::Text(e) => {
                    let raw = std::str::from_utf8(&e)?;
                    // Whitespace outside the root is kept byte for byte
                    if stack.is_empty() {
                        Some(XmlNode::Text(raw.to_string()))
                    } else {
                        Some(XmlNode::Text(unescape_xml(&normalize_line_endings(raw))))
                    }
                },
                Event::GeneralRef(e) => {
                    let name = std::str::from_utf8(&e)?;
                    let text = resolve_reference(name)
                        .ok_or_else(|| XmlError::Malformed(format!("unknown entity &{};", name)))?;
                    Some(XmlNode::Text(text))
                },
                Event::CData(e) => Some(XmlNode::CData(std::str::from_utf8(&e)?.to_string())),
                Event::Comment(e) => Some(XmlNode::Comment(std::str::from_utf8(&e)?.to_string())),
                Event::PI(e) => Some(XmlNode::ProcessingInstruction(
                    std::str::from_utf8(&e)?.to_string(),
                )),
                Event::DocType(e) => Some(XmlNode::DocType(std::str::from_utf8(&e)?.to_string())),
                Event::Decl(e) => {
                    declaration = Some(std::str::from_utf8(&e)?.to_string());
                    None
                },
                Event::Eof => break,
            };

            if let Some(node) = node {
                match stack.last_mut() {
                    Some(parent) => push_child(parent, node),
                    None if root.is_none() => prolog.push(node),
                    None => epilog.push(node),
                }
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(XmlError::Malformed(format!(
                "unclosed element <{}>",
                stack.last().map(|el| el.name.as_str()).unwrap_or_default()
            )));
        }
        let root = root.ok_or_else(|| XmlError::Malformed("no root element".to_string()))?;

        Ok(Self {
            declaration,
            prolog,
            root,
            epilog,
        })
    }

    /// Serialize the tree, writing `root` through the supplied closure.
    ///
    /// This lets typed models that took ownership of part of the tree write
    /// themselves in place of the root element.
    pub fn write_with(&self, out: &mut String, write_root: impl FnOnce(&mut String)) {
        if let Some(ref decl) = self.declaration {
            out.push_str("<?");
            out.push_str(decl);
            out.push_str("?>");
        }
        for node in &self.prolog {
            write_misc(node, out);
        }
        write_root(out);
        for node in &self.epilog {
            write_misc(node, out);
        }
    }

    /// Serialize the whole tree to a string.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::with_capacity(4096);
        self.write_with(&mut out, |out| self.root.write_to(out));
        out
    }
}

/// Local part of a qualified name.
#[inline]
pub fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map(|(_, local)| local).unwrap_or(name)
}

fn element_from_start(e: &BytesStart<'_>) -> Result<XmlElement, XmlError> {
    let name = std::str::from_utf8(e.name().as_ref())?.to_string();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = unescape_xml(&normalize_attribute(std::str::from_utf8(&attr.value)?));
        attributes.push((key, value));
    }
    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
    })
}

/// Write a node that sits outside the root element. Text there is only
/// whitespace and is written raw; references are not allowed outside the root.
fn write_misc(node: &XmlNode, out: &mut String) {
    match node {
        XmlNode::Text(text) => out.push_str(text),
        other => other.write_to(out),
    }
}

/// Append a child, merging adjacent text nodes (references arrive as
/// separate events).
fn push_child(parent: &mut XmlElement, node: XmlNode) {
    if let XmlNode::Text(ref text) = node
        && let Some(XmlNode::Text(previous)) = parent.children.last_mut()
    {
        previous.push_str(text);
        return;
    }
    parent.children.push(node);
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n",
        "<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">",
        "<!-- template --><w:body><w:p><w:r><w:t xml:space=\"preserve\"> A &amp; B </w:t></w:r>",
        "<w:r><w:tab/></w:r></w:p></w:body></w:document>"
    );

    #[test]
    fn test_parse_structure() {
        let tree = XmlTree::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(
            tree.declaration.as_deref(),
            Some("xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"")
        );
        assert_eq!(tree.prolog, vec![XmlNode::Text("\r\n".to_string())]);
        assert_eq!(tree.root.name, "w:document");
        assert_eq!(tree.root.local_name(), "document");
        assert_eq!(tree.root.prefix(), Some("w"));

        let body = tree.root.child("w:body").unwrap();
        let t = body
            .child("w:p")
            .and_then(|p| p.child("w:r"))
            .and_then(|r| r.child("w:t"))
            .unwrap();
        assert_eq!(t.attribute("xml:space"), Some("preserve"));
        assert_eq!(t.children, vec![XmlNode::Text(" A & B ".to_string())]);
    }

    #[test]
    fn test_round_trip() {
        let tree = XmlTree::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(tree.to_xml_string(), SAMPLE);

        let reparsed = XmlTree::parse(tree.to_xml_string().as_bytes()).unwrap();
        assert_eq!(reparsed, tree);
    }

    #[test]
    fn test_character_references() {
        let el = XmlElement::parse("<t a=\"x&#34;y\">caf&#233; &lt;ok&gt;</t>").unwrap();
        assert_eq!(el.attribute("a"), Some("x\"y"));
        assert_eq!(el.children, vec![XmlNode::Text("café <ok>".to_string())]);
    }

    #[test]
    fn test_attribute_editing() {
        let mut el = XmlElement::new("w:color").with_attribute("w:val", "FF0000");
        el.set_attribute("w:themeColor", "accent1");
        el.set_attribute("w:val", "00FF00");
        assert_eq!(el.attribute_local("val"), Some("00FF00"));
        assert_eq!(el.remove_attribute("w:themeColor").as_deref(), Some("accent1"));
        assert_eq!(el.to_xml_string(), "<w:color w:val=\"00FF00\"/>");
    }

    #[test]
    fn test_whitespace_references_survive_reparse() {
        let xml = "<w:p w:rsid=\"a&#xA;b&#9;c&#13;\"><w:t>line&#13;&#xA;end</w:t></w:p>";
        let el = XmlElement::parse(xml).unwrap();
        assert_eq!(el.attribute("w:rsid"), Some("a\nb\tc\r"));
        assert_eq!(el.child("w:t").unwrap().children, vec![XmlNode::Text("line\r\nend".to_string())]);

        let written = el.to_xml_string();
        assert_eq!(written, "<w:p w:rsid=\"a&#xA;b&#x9;c&#xD;\"><w:t>line&#xD;\nend</w:t></w:p>");
        assert_eq!(XmlElement::parse(&written).unwrap(), el);
    }

    #[test]
    fn test_raw_line_endings_are_normalized() {
        let el = XmlElement::parse("<t a=\"x\r\ny\tz\">one\r\ntwo\rthree</t>").unwrap();
        assert_eq!(el.attribute("a"), Some("x y z"));
        assert_eq!(el.children, vec![XmlNode::Text("one\ntwo\nthree".to_string())]);
        assert_eq!(el.to_xml_string(), "<t a=\"x y z\">one\ntwo\nthree</t>");
    }

    #[test]
    fn test_malformed() {
        assert!(XmlTree::parse(b"<a><b></a>").is_err());
        assert!(XmlTree::parse(b"<a>").is_err());
        assert!(XmlTree::parse(b"   ").is_err());
    }
}
