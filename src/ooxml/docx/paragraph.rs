/// Paragraph structure for Word documents.
use crate::common::xml::{XmlElement, XmlNode};
use crate::ooxml::docx::run::Run;
use crate::ooxml::error::Result;
use smallvec::SmallVec;

/// Content of a paragraph, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// A direct `<w:r>` child
    Run(Run),
    /// Anything else (`w:pPr`, bookmarks, hyperlinks, field markers,
    /// whitespace, ...), kept verbatim
    Other(XmlNode),
}

/// A paragraph in a Word document.
///
/// Represents a `<w:p>` element. Paragraphs contain runs which in turn
/// contain the actual text and formatting. Only direct `<w:r>` children are
/// exposed as runs; runs nested in hyperlinks, revisions or content
/// controls are preserved untouched.
///
/// # Example
///
/// ```rust
/// use surat_izin::ooxml::docx::Paragraph;
///
/// let para = Paragraph::from_xml(
///     r#"<w:p><w:r><w:t xml:space="preserve">Nama: </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>nmhs</w:t></w:r></w:p>"#,
/// )?;
/// assert_eq!(para.text(), "Nama: nmhs");
/// for run in para.runs() {
///     println!("  Run: {} (bold: {:?})", run.text(), run.bold());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// The `<w:p>` element with its children moved into `content`
    element: XmlElement,
    content: SmallVec<[Inline; 8]>,
}

impl Paragraph {
    /// Build a paragraph from a parsed `<w:p>` element.
    pub(crate) fn from_element(mut element: XmlElement) -> Self {
        let content = std::mem::take(&mut element.children)
            .into_iter()
            .map(|node| match node {
                XmlNode::Element(el) if el.local_name() == "r" => Inline::Run(Run::from_element(el)),
                other => Inline::Other(other),
            })
            .collect();
        Self { element, content }
    }

    /// Parse a paragraph from a standalone `<w:p>` XML fragment.
    pub fn from_xml(xml: &str) -> Result<Self> {
        Ok(Self::from_element(XmlElement::parse(xml)?))
    }

    /// Get the text content of this paragraph.
    ///
    /// Concatenates the text of all direct runs.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for run in self.runs() {
            text.push_str(&run.text());
        }
        text
    }

    /// Iterate over the runs of this paragraph.
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.content.iter().filter_map(|inline| match inline {
            Inline::Run(run) => Some(run),
            Inline::Other(_) => None,
        })
    }

    /// Iterate mutably over the runs of this paragraph.
    pub fn runs_mut(&mut self) -> impl Iterator<Item = &mut Run> {
        self.content.iter_mut().filter_map(|inline| match inline {
            Inline::Run(run) => Some(run),
            Inline::Other(_) => None,
        })
    }

    /// Number of runs in this paragraph.
    pub fn run_count(&self) -> usize {
        self.runs().count()
    }

    /// Serialize the paragraph.
    pub(crate) fn write_to(&self, out: &mut String) {
        self.element.write_start(out, self.content.is_empty());
        if self.content.is_empty() {
            return;
        }
        for inline in &self.content {
            match inline {
                Inline::Run(run) => run.write_to(out),
                Inline::Other(node) => node.write_to(out),
            }
        }
        self.element.write_end(out);
    }

    /// Reassemble the `<w:p>` element.
    pub fn into_element(self) -> XmlElement {
        let mut element = self.element;
        element.children = self
            .content
            .into_iter()
            .map(|inline| match inline {
                Inline::Run(run) => XmlNode::Element(run.into_element()),
                Inline::Other(node) => node,
            })
            .collect();
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARA: &str = concat!(
        "<w:p w:rsidR=\"00A1\"><w:pPr><w:pStyle w:val=\"Isi\"/></w:pPr>",
        "<w:r><w:t xml:space=\"preserve\">Mata kuliah: </w:t></w:r>",
        "<w:bookmarkStart w:id=\"0\" w:name=\"mk\"/>",
        "<w:r><w:rPr><w:b/></w:rPr><w:t>nama_mata_kuliah</w:t></w:r>",
        "<w:bookmarkEnd w:id=\"0\"/>",
        "<w:hyperlink r:id=\"rId9\"><w:r><w:t>tautan</w:t></w:r></w:hyperlink>",
        "</w:p>"
    );

    #[test]
    fn test_text_and_runs() {
        let para = Paragraph::from_xml(PARA).unwrap();
        assert_eq!(para.text(), "Mata kuliah: nama_mata_kuliah");
        assert_eq!(para.run_count(), 2);
        let bold: Vec<_> = para.runs().map(|r| r.bold()).collect();
        assert_eq!(bold, vec![None, Some(true)]);
    }

    #[test]
    fn test_round_trip() {
        let para = Paragraph::from_xml(PARA).unwrap();
        let mut out = String::new();
        para.write_to(&mut out);
        assert_eq!(out, PARA);
        assert_eq!(para.into_element().to_xml_string(), PARA);
    }

    #[test]
    fn test_runs_mut() {
        let mut para = Paragraph::from_xml(PARA).unwrap();
        for run in para.runs_mut() {
            if run.text() == "nama_mata_kuliah" {
                run.set_text("Basis Data");
            }
        }
        assert_eq!(para.text(), "Mata kuliah: Basis Data");
        assert_eq!(para.runs().nth(1).and_then(|r| r.bold()), Some(true));
    }

    #[test]
    fn test_empty_paragraph() {
        let para = Paragraph::from_xml("<w:p/>").unwrap();
        assert_eq!(para.text(), "");
        assert_eq!(para.run_count(), 0);
        let mut out = String::new();
        para.write_to(&mut out);
        assert_eq!(out, "<w:p/>");
    }
}
