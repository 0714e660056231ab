/// Table, Row, and Cell structures for Word documents.
use crate::common::xml::{XmlElement, XmlNode};
use crate::ooxml::docx::document::BlockItem;
use crate::ooxml::docx::paragraph::Paragraph;
use crate::ooxml::docx::wml;
use crate::ooxml::error::Result;
use smallvec::SmallVec;

/// A typed child, or any other node kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Child<T> {
    Typed(T),
    Other(XmlNode),
}

impl<T> Child<T> {
    fn typed(&self) -> Option<&T> {
        match self {
            Child::Typed(t) => Some(t),
            Child::Other(_) => None,
        }
    }

    fn typed_mut(&mut self) -> Option<&mut T> {
        match self {
            Child::Typed(t) => Some(t),
            Child::Other(_) => None,
        }
    }
}

/// Split an element's children into typed children with the given local
/// name and raw nodes.
fn split_children<T>(element: &mut XmlElement, local: &str, build: impl Fn(XmlElement) -> T) -> Vec<Child<T>> {
    std::mem::take(&mut element.children)
        .into_iter()
        .map(|node| match node {
            XmlNode::Element(el) if el.local_name() == local => Child::Typed(build(el)),
            other => Child::Other(other),
        })
        .collect()
}

/// A table in a Word document.
///
/// Represents a `<w:tbl>` element. Tables contain rows, which contain cells,
/// which contain paragraphs and possibly nested tables.
///
/// # Example
///
/// ```rust
/// use surat_izin::ooxml::docx::Table;
///
/// let table = Table::from_xml(concat!(
///     "<w:tbl><w:tr>",
///     "<w:tc><w:p><w:r><w:t>Hari</w:t></w:r></w:p></w:tc>",
///     "<w:tc><w:p><w:r><w:t>day</w:t></w:r></w:p></w:tc>",
///     "</w:tr></w:tbl>",
/// ))?;
/// for (row_idx, row) in table.rows().enumerate() {
///     for (col_idx, cell) in row.cells().enumerate() {
///         println!("Cell [{},{}]: {}", row_idx, col_idx, cell.text());
///     }
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// The `<w:tbl>` element with its children moved out
    element: XmlElement,
    children: Vec<Child<Row>>,
}

impl Table {
    pub(crate) fn from_element(mut element: XmlElement) -> Self {
        let children = split_children(&mut element, "tr", Row::from_element);
        Self { element, children }
    }

    /// Parse a table from a standalone `<w:tbl>` XML fragment.
    pub fn from_xml(xml: &str) -> Result<Self> {
        Ok(Self::from_element(XmlElement::parse(xml)?))
    }

    /// Iterate over the rows of this table.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.children.iter().filter_map(Child::typed)
    }

    /// Iterate mutably over the rows of this table.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.children.iter_mut().filter_map(Child::typed_mut)
    }

    /// Get the number of rows in this table.
    pub fn row_count(&self) -> usize {
        self.rows().count()
    }

    /// Get the number of columns in this table.
    ///
    /// Uses the table grid when present, otherwise the widest row.
    pub fn column_count(&self) -> usize {
        let grid = self.children.iter().find_map(|child| match child {
            Child::Other(XmlNode::Element(el)) if el.local_name() == "tblGrid" => Some(el),
            _ => None,
        });
        match grid {
            Some(grid) => grid
                .child_elements()
                .filter(|el| el.local_name() == "gridCol")
                .count(),
            None => self.rows().map(Row::cell_count).max().unwrap_or(0),
        }
    }

    /// Get the text of the table, one line per row with cells separated by tabs.
    pub fn text(&self) -> String {
        self.rows()
            .map(|row| row.cells().map(Cell::text).collect::<Vec<_>>().join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        write_children(&self.element, &self.children, out, Row::write_to);
    }
}

/// A row in a table (`<w:tr>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    element: XmlElement,
    children: Vec<Child<Cell>>,
}

impl Row {
    fn from_element(mut element: XmlElement) -> Self {
        let children = split_children(&mut element, "tc", Cell::from_element);
        Self { element, children }
    }

    /// Iterate over the cells of this row.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.children.iter().filter_map(Child::typed)
    }

    /// Iterate mutably over the cells of this row.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.children.iter_mut().filter_map(Child::typed_mut)
    }

    /// Get the number of cells in this row.
    pub fn cell_count(&self) -> usize {
        self.cells().count()
    }

    fn write_to(&self, out: &mut String) {
        write_children(&self.element, &self.children, out, Cell::write_to);
    }
}

/// A cell in a table (`<w:tc>`).
///
/// Cells hold block content: paragraphs, nested tables, and anything else
/// kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    element: XmlElement,
    blocks: SmallVec<[BlockItem; 2]>,
}

impl Cell {
    fn from_element(mut element: XmlElement) -> Self {
        let blocks = std::mem::take(&mut element.children)
            .into_iter()
            .map(BlockItem::from_node)
            .collect();
        Self { element, blocks }
    }

    /// All block content of this cell in document order.
    #[inline]
    pub fn blocks(&self) -> &[BlockItem] {
        &self.blocks
    }

    /// Iterate over the paragraphs directly inside this cell.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(BlockItem::as_paragraph)
    }

    /// Iterate mutably over the paragraphs directly inside this cell.
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.blocks.iter_mut().filter_map(BlockItem::as_paragraph_mut)
    }

    /// Iterate over tables nested in this cell.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(BlockItem::as_table)
    }

    /// Iterate mutably over tables nested in this cell.
    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.blocks.iter_mut().filter_map(BlockItem::as_table_mut)
    }

    /// Get the text of this cell, one line per paragraph.
    pub fn text(&self) -> String {
        self.paragraphs()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Get the number of grid columns this cell spans (`w:tcPr/w:gridSpan`).
    pub fn grid_span(&self) -> u32 {
        self.blocks
            .iter()
            .find_map(|block| match block {
                BlockItem::Other(XmlNode::Element(el)) if el.local_name() == "tcPr" => Some(el),
                _ => None,
            })
            .and_then(|tc_pr| wml::child(tc_pr, "gridSpan"))
            .and_then(|span| span.attribute_local("val"))
            .and_then(|val| val.parse().ok())
            .unwrap_or(1)
    }

    fn write_to(&self, out: &mut String) {
        self.element.write_start(out, self.blocks.is_empty());
        if self.blocks.is_empty() {
            return;
        }
        for block in &self.blocks {
            block.write_to(out);
        }
        self.element.write_end(out);
    }
}

fn write_children<T>(element: &XmlElement, children: &[Child<T>], out: &mut String, write: fn(&T, &mut String)) {
    element.write_start(out, children.is_empty());
    if children.is_empty() {
        return;
    }
    for child in children {
        match child {
            Child::Typed(t) => write(t, out),
            Child::Other(node) => node.write_to(out),
        }
    }
    element.write_end(out);
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = concat!(
        "<w:tbl><w:tblPr><w:tblW w:w=\"0\" w:type=\"auto\"/></w:tblPr>",
        "<w:tblGrid><w:gridCol w:w=\"3000\"/><w:gridCol w:w=\"6000\"/></w:tblGrid>",
        "<w:tr><w:tc><w:tcPr><w:tcW w:w=\"3000\"/></w:tcPr><w:p><w:r><w:t>NIM</w:t></w:r></w:p></w:tc>",
        "<w:tc><w:p><w:r><w:t>nims</w:t></w:r></w:p></w:tc></w:tr>",
        "<w:tr><w:tc><w:tcPr><w:gridSpan w:val=\"2\"/></w:tcPr>",
        "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>prdi</w:t></w:r></w:p></w:tc></w:tr></w:tbl>",
        "<w:p/></w:tc></w:tr>",
        "</w:tbl>"
    );

    #[test]
    fn test_structure() {
        let table = Table::from_xml(TABLE).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].cell_count(), 2);
        assert_eq!(rows[1].cell_count(), 1);

        let merged = rows[1].cells().next().unwrap();
        assert_eq!(merged.grid_span(), 2);
        assert_eq!(merged.tables().count(), 1);
        assert_eq!(merged.paragraphs().count(), 1);
        assert_eq!(merged.tables().next().unwrap().text(), "prdi");
        assert_eq!(table.text(), "NIM\tnims\n");
    }

    #[test]
    fn test_round_trip() {
        let table = Table::from_xml(TABLE).unwrap();
        let mut out = String::new();
        table.write_to(&mut out);
        assert_eq!(out, TABLE);
    }

    #[test]
    fn test_cell_edit() {
        let mut table = Table::from_xml(TABLE).unwrap();
        for row in table.rows_mut() {
            for cell in row.cells_mut() {
                for para in cell.paragraphs_mut() {
                    for run in para.runs_mut() {
                        if run.text() == "nims" {
                            run.set_text("2101234567");
                        }
                    }
                }
            }
        }
        assert_eq!(table.rows().next().unwrap().cells().nth(1).unwrap().text(), "2101234567");
    }

    #[test]
    fn test_column_count_without_grid() {
        let table = Table::from_xml(
            "<w:tbl><w:tr><w:tc><w:p/></w:tc></w:tr><w:tr><w:tc><w:p/></w:tc><w:tc><w:p/></w:tc></w:tr></w:tbl>",
        )
        .unwrap();
        assert_eq!(table.column_count(), 2);
    }
}
