//! XML utilities: escaping and a lossless element tree.

mod escape;
pub mod tree;

pub use escape::{
    escape_text, escape_xml, find_invalid_xml_char, is_xml_char, normalize_attribute, normalize_line_endings,
    resolve_reference, unescape_xml,
};
pub use tree::{XmlElement, XmlNode, XmlTree};
