/// Document - the main API for working with Word document content.
use crate::common::xml::{XmlNode, XmlTree};
use crate::ooxml::docx::paragraph::Paragraph;
use crate::ooxml::docx::table::Table;
use crate::ooxml::error::{OoxmlError, Result};

/// A block-level item: the content of `w:body` and `w:tc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockItem {
    /// A `<w:p>` element
    Paragraph(Paragraph),
    /// A `<w:tbl>` element
    Table(Table),
    /// Anything else (`w:sectPr`, `w:sdt`, bookmarks, whitespace, ...), kept verbatim
    Other(XmlNode),
}

impl BlockItem {
    pub(crate) fn from_node(node: XmlNode) -> Self {
        match node {
            XmlNode::Element(el) if el.local_name() == "p" => BlockItem::Paragraph(Paragraph::from_element(el)),
            XmlNode::Element(el) if el.local_name() == "tbl" => BlockItem::Table(Table::from_element(el)),
            other => BlockItem::Other(other),
        }
    }

    #[inline]
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            BlockItem::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    #[inline]
    pub fn as_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        match self {
            BlockItem::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    #[inline]
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            BlockItem::Table(t) => Some(t),
            _ => None,
        }
    }

    #[inline]
    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            BlockItem::Table(t) => Some(t),
            _ => None,
        }
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        match self {
            BlockItem::Paragraph(p) => p.write_to(out),
            BlockItem::Table(t) => t.write_to(out),
            BlockItem::Other(node) => node.write_to(out),
        }
    }
}

/// A Word document.
///
/// This is the main API for reading and editing the content of
/// `word/document.xml`. Body paragraphs and tables are parsed into typed
/// values; everything else in the part (namespace declarations, section
/// properties, drawings, ...) is kept verbatim and written back unchanged.
///
/// # Examples
///
/// ```rust,no_run
/// use surat_izin::ooxml::docx::Package;
///
/// let pkg = Package::open("files/template_surat_izin.docx")?;
/// let doc = pkg.document()?;
///
/// // Extract all text
/// println!("Document text: {}", doc.text());
/// println!("Number of paragraphs: {}", doc.paragraph_count());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The parsed part; the body element is left in place with no children
    tree: XmlTree,
    /// Index of `w:body` within the root's children
    body_position: usize,
    blocks: Vec<BlockItem>,
}

impl Document {
    /// Parse the main document part.
    pub fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut tree = XmlTree::parse(xml)?;
        if tree.root.local_name() != "document" {
            return Err(OoxmlError::InvalidFormat(format!(
                "expected w:document root element, found <{}>",
                tree.root.name
            )));
        }

        let body_position = tree
            .root
            .children
            .iter()
            .position(|node| matches!(node, XmlNode::Element(el) if el.local_name() == "body"))
            .ok_or_else(|| OoxmlError::InvalidFormat("document has no w:body element".to_string()))?;

        let blocks = match &mut tree.root.children[body_position] {
            XmlNode::Element(body) => std::mem::take(&mut body.children)
                .into_iter()
                .map(BlockItem::from_node)
                .collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            tree,
            body_position,
            blocks,
        })
    }

    /// Serialize the document part back to XML.
    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(8192);
        self.tree.write_with(&mut out, |out| {
            let root = &self.tree.root;
            root.write_start(out, false);
            for (idx, child) in root.children.iter().enumerate() {
                match child {
                    XmlNode::Element(body) if idx == self.body_position => {
                        body.write_start(out, self.blocks.is_empty());
                        if !self.blocks.is_empty() {
                            for block in &self.blocks {
                                block.write_to(out);
                            }
                            body.write_end(out);
                        }
                    },
                    other => other.write_to(out),
                }
            }
            root.write_end(out);
        });
        out
    }

    /// Serialize the document part to UTF-8 bytes.
    #[inline]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_xml().into_bytes()
    }

    /// All body content in document order.
    #[inline]
    pub fn blocks(&self) -> &[BlockItem] {
        &self.blocks
    }

    /// Iterate over the body-level paragraphs.
    ///
    /// Paragraphs inside tables are reached through [`Document::tables`].
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(BlockItem::as_paragraph)
    }

    /// Iterate mutably over the body-level paragraphs.
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.blocks.iter_mut().filter_map(BlockItem::as_paragraph_mut)
    }

    /// Iterate over the body-level tables.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(BlockItem::as_table)
    }

    /// Iterate mutably over the body-level tables.
    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.blocks.iter_mut().filter_map(BlockItem::as_table_mut)
    }

    /// Get all text content from the document.
    ///
    /// Paragraphs are separated by newlines; tables contribute their
    /// text with tab-separated cells.
    pub fn text(&self) -> String {
        let mut parts = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            match block {
                BlockItem::Paragraph(p) => parts.push(p.text()),
                BlockItem::Table(t) => parts.push(t.text()),
                BlockItem::Other(_) => {},
            }
        }
        parts.join("\n")
    }

    /// Get the number of body-level paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs().count()
    }

    /// Get the number of body-level tables.
    pub fn table_count(&self) -> usize {
        self.tables().count()
    }
}
