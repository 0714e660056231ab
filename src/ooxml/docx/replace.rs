//! Placeholder substitution.
//!
//! Templates mark insertion points with literal tokens such as
//! `nama_dosen`. [`substitute`] replaces the whole text of every run that
//! contains a token, keeps the run's character formatting, and normalizes
//! its font size.
//!
//! Matching is plain substring containment within a single run: `nim`
//! matches inside `nims`, and a token that Word split across several runs
//! (for example after a spell-check or a partial format change) is not
//! matched. [`locate`] reports such split occurrences without changing
//! anything.

use crate::common::xml::find_invalid_xml_char;
use crate::common::{Length, RGBColor};
use crate::ooxml::docx::document::Document;
use crate::ooxml::docx::format::UnderlineStyle;
use crate::ooxml::docx::paragraph::Paragraph;
use crate::ooxml::docx::run::Run;
use crate::ooxml::docx::table::Table;
use crate::ooxml::error::{OoxmlError, Result};
use memchr::memmem::Finder;
use tracing::{debug, trace};

/// Font size applied to rewritten runs by [`substitute_default`].
pub const DEFAULT_FONT_SIZE: Length = Length::pt(11);

/// Character formatting carried over when a run is rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunFormat {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<UnderlineStyle>,
    /// `None` when the color is absent, `auto`, or not a hex value
    pub color: Option<RGBColor>,
}

impl RunFormat {
    /// Capture the direct formatting of a run.
    pub fn capture(run: &Run) -> Self {
        Self {
            bold: run.bold(),
            italic: run.italic(),
            underline: run.underline(),
            color: run.color(),
        }
    }

    /// Apply the captured formatting to a run.
    ///
    /// An undefined color is skipped, leaving whatever `<w:color>` the run
    /// has untouched.
    pub fn restore(&self, run: &mut Run) {
        run.set_bold(self.bold);
        run.set_italic(self.italic);
        run.set_underline(self.underline.clone());
        match self.color {
            Some(color) => run.set_color(Some(color)),
            None => trace!("run color undefined, leaving it as authored"),
        }
    }
}

/// Replace `token` in every run of `document`, including runs in table
/// cells and nested tables.
///
/// Each run whose own text contains `token` has its entire text replaced
/// by `value`; bold, italic, underline and (when defined) color are kept,
/// and the font size is set to `font_size`. Runs without the token are not
/// touched. Returns the number of rewritten runs.
///
/// # Errors
///
/// Returns `OoxmlError::InvalidFormat` for an empty token, or for a value
/// holding a character XML cannot carry (most C0 controls, `U+FFFE`,
/// `U+FFFF`). The document is left untouched in both cases.
///
/// # Example
///
/// ```rust
/// use surat_izin::common::Length;
/// use surat_izin::ooxml::docx::{Paragraph, replace};
///
/// let mut para = Paragraph::from_xml(
///     r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Mata kuliah nama_mata_kuliah</w:t></w:r></w:p>"#,
/// )?;
/// let rewritten = replace::substitute_paragraph(&mut para, "nama_mata_kuliah", "Kalkulus II", Length::pt(11))?;
/// assert_eq!(rewritten, 1);
/// assert_eq!(para.text(), "Kalkulus II");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn substitute(document: &mut Document, token: &str, value: &str, font_size: Length) -> Result<usize> {
    let finder = token_finder(token)?;
    check_value(value)?;

    let mut rewritten = 0;
    for para in document.paragraphs_mut() {
        rewritten += replace_in_paragraph(para, &finder, value, font_size);
    }
    for table in document.tables_mut() {
        rewritten += replace_in_table(table, &finder, value, font_size);
    }

    debug!(token, rewritten, "substituted placeholder");
    Ok(rewritten)
}

/// [`substitute`] with the [`DEFAULT_FONT_SIZE`].
pub fn substitute_default(document: &mut Document, token: &str, value: &str) -> Result<usize> {
    substitute(document, token, value, DEFAULT_FONT_SIZE)
}

/// [`substitute`] restricted to a single paragraph.
pub fn substitute_paragraph(paragraph: &mut Paragraph, token: &str, value: &str, font_size: Length) -> Result<usize> {
    let finder = token_finder(token)?;
    check_value(value)?;
    Ok(replace_in_paragraph(paragraph, &finder, value, font_size))
}

/// Rewrite one run: replace its text and reapply its formatting.
pub fn rewrite_run(run: &mut Run, value: &str, font_size: Length) {
    let format = RunFormat::capture(run);
    run.set_text(value);
    format.restore(run);
    run.set_font_size(Some(font_size));
}

fn token_finder(token: &str) -> Result<Finder<'_>> {
    if token.is_empty() {
        return Err(OoxmlError::InvalidFormat(
            "placeholder token must not be empty".to_string(),
        ));
    }
    Ok(Finder::new(token))
}

fn check_value(value: &str) -> Result<()> {
    match find_invalid_xml_char(value) {
        Some(c) => Err(OoxmlError::InvalidFormat(format!(
            "replacement value contains U+{:04X}, which is not allowed in XML",
            c as u32
        ))),
        None => Ok(()),
    }
}

fn replace_in_paragraph(para: &mut Paragraph, finder: &Finder<'_>, value: &str, font_size: Length) -> usize {
    if finder.find(para.text().as_bytes()).is_none() {
        return 0;
    }

    let mut rewritten = 0;
    for run in para.runs_mut() {
        if finder.find(run.text().as_bytes()).is_some() {
            rewrite_run(run, value, font_size);
            rewritten += 1;
        }
    }
    rewritten
}

fn replace_in_table(table: &mut Table, finder: &Finder<'_>, value: &str, font_size: Length) -> usize {
    let mut rewritten = 0;
    for row in table.rows_mut() {
        for cell in row.cells_mut() {
            for para in cell.paragraphs_mut() {
                rewritten += replace_in_paragraph(para, finder, value, font_size);
            }
            for nested in cell.tables_mut() {
                rewritten += replace_in_table(nested, finder, value, font_size);
            }
        }
    }
    rewritten
}

/// Where a token occurs in a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenLocation {
    /// Runs whose own text contains the token; these are what
    /// [`substitute`] rewrites
    pub run_matches: usize,
    /// Paragraphs where at least one occurrence spans a run boundary and
    /// will therefore not be replaced
    pub split_matches: usize,
}

impl TokenLocation {
    /// Whether [`substitute`] would rewrite anything.
    #[inline]
    pub fn is_replaceable(&self) -> bool {
        self.run_matches > 0
    }
}

/// Report where `token` occurs, without modifying the document.
pub fn locate(document: &Document, token: &str) -> Result<TokenLocation> {
    let finder = token_finder(token)?;
    let mut location = TokenLocation::default();
    for para in document.paragraphs() {
        locate_in_paragraph(para, &finder, &mut location);
    }
    for table in document.tables() {
        locate_in_table(table, &finder, &mut location);
    }
    Ok(location)
}

fn locate_in_paragraph(para: &Paragraph, finder: &Finder<'_>, location: &mut TokenLocation) {
    let total = finder.find_iter(para.text().as_bytes()).count();
    if total == 0 {
        return;
    }

    let mut within_runs = 0;
    for run in para.runs() {
        let count = finder.find_iter(run.text().as_bytes()).count();
        if count > 0 {
            location.run_matches += 1;
            within_runs += count;
        }
    }
    if total > within_runs {
        location.split_matches += 1;
    }
}

fn locate_in_table(table: &Table, finder: &Finder<'_>, location: &mut TokenLocation) {
    for row in table.rows() {
        for cell in row.cells() {
            for para in cell.paragraphs() {
                locate_in_paragraph(para, finder, location);
            }
            for nested in cell.tables() {
                locate_in_table(nested, finder, location);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::test_support::document_xml;

    fn doc(body: &str) -> Document {
        Document::from_xml(document_xml(body).as_bytes()).unwrap()
    }

    fn first_run(doc: &Document) -> &Run {
        doc.paragraphs().next().unwrap().runs().next().unwrap()
    }

    #[test]
    fn test_token_in_single_run_keeps_format() {
        let mut d = doc(concat!(
            "<w:p><w:r><w:rPr><w:b/><w:color w:val=\"000000\"/><w:sz w:val=\"24\"/></w:rPr>",
            "<w:t>Mohon izin untuk nama_mata_kuliah pada hari ini</w:t></w:r></w:p>"
        ));
        let n = substitute_default(&mut d, "nama_mata_kuliah", "Kalkulus II").unwrap();
        assert_eq!(n, 1);

        let run = first_run(&d);
        assert_eq!(run.text(), "Kalkulus II");
        assert_eq!(run.bold(), Some(true));
        assert_eq!(run.color(), Some(RGBColor::BLACK));
        assert_eq!(run.font_size(), Some(Length::pt(11)));
        assert!(d.to_xml().contains(concat!(
            "<w:r><w:rPr><w:b/><w:color w:val=\"000000\"/><w:sz w:val=\"22\"/></w:rPr>",
            "<w:t>Kalkulus II</w:t></w:r>"
        )));
    }

    #[test]
    fn test_font_size_is_always_normalized() {
        let mut d = doc("<w:p><w:r><w:rPr><w:i/></w:rPr><w:t>jam_mata_kuliah</w:t></w:r></w:p>");
        substitute(&mut d, "jam_mata_kuliah", "07.30 - 09.10", Length::pt(12)).unwrap();
        assert_eq!(first_run(&d).font_size(), Some(Length::pt(12)));
        assert_eq!(first_run(&d).text(), "07.30 - 09.10");
    }

    #[test]
    fn test_only_matching_runs_are_rewritten() {
        let body = concat!(
            "<w:p><w:r><w:rPr><w:sz w:val=\"28\"/></w:rPr><w:t xml:space=\"preserve\">Ruang: </w:t></w:r>",
            "<w:r><w:t>ruang_mata_kuliah</w:t></w:r>",
            "<w:r><w:t xml:space=\"preserve\"> dan ruang_mata_kuliah</w:t></w:r></w:p>"
        );
        let mut d = doc(body);
        assert_eq!(substitute_default(&mut d, "ruang_mata_kuliah", "GK-201").unwrap(), 2);

        let runs: Vec<_> = d.paragraphs().next().unwrap().runs().collect();
        assert_eq!(runs[0].text(), "Ruang: ");
        assert_eq!(runs[0].font_size(), Some(Length::pt(14)));
        assert_eq!(runs[1].text(), "GK-201");
        assert_eq!(runs[2].text(), "GK-201");
    }

    #[test]
    fn test_absent_token_leaves_document_unchanged() {
        let xml = document_xml(concat!(
            "<w:p><w:r><w:rPr><w:color w:val=\"auto\"/></w:rPr><w:t>Hormat saya,</w:t></w:r></w:p>",
            "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>NIM</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"
        ));
        let mut d = Document::from_xml(xml.as_bytes()).unwrap();
        let before = d.clone();
        assert_eq!(substitute_default(&mut d, "waktu_izin", "Senin").unwrap(), 0);
        assert_eq!(d, before);
        assert_eq!(d.to_xml(), xml);
    }

    #[test]
    fn test_substitution_is_idempotent() {
        let mut d = doc("<w:p><w:r><w:rPr><w:u w:val=\"single\"/></w:rPr><w:t>nmhs</w:t></w:r></w:p>");
        substitute_default(&mut d, "nmhs", "Andi Wijaya").unwrap();
        let once = d.clone();
        assert_eq!(substitute_default(&mut d, "nmhs", "Andi Wijaya").unwrap(), 0);
        assert_eq!(d, once);
    }

    #[test]
    fn test_idempotent_when_value_contains_token() {
        let mut d = doc("<w:p><w:r><w:t>nim</w:t></w:r></w:p>");
        substitute_default(&mut d, "nim", "nim 2101").unwrap();
        let once = d.to_xml();
        substitute_default(&mut d, "nim", "nim 2101").unwrap();
        assert_eq!(d.to_xml(), once);
    }

    #[test]
    fn test_table_cells_are_covered() {
        let mut d = doc(concat!(
            "<w:tbl><w:tblGrid><w:gridCol/><w:gridCol/></w:tblGrid>",
            "<w:tr><w:tc><w:p><w:r><w:t>Program studi</w:t></w:r></w:p></w:tc>",
            "<w:tc><w:p><w:r><w:rPr><w:b/></w:rPr><w:t>prdi</w:t></w:r></w:p></w:tc></w:tr>",
            "<w:tr><w:tc><w:p><w:r><w:t>Hari</w:t></w:r></w:p></w:tc>",
            "<w:tc><w:p><w:r><w:t>day</w:t></w:r></w:p></w:tc></w:tr>",
            "</w:tbl>"
        ));
        assert_eq!(substitute_default(&mut d, "prdi", "Teknik Informatika").unwrap(), 1);

        let table = d.tables().next().unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        let cells: Vec<_> = table.rows().flat_map(|r| r.cells()).map(|c| c.text()).collect();
        assert_eq!(cells, vec!["Program studi", "Teknik Informatika", "Hari", "day"]);
        let bold = table.rows().next().unwrap().cells().nth(1).unwrap();
        assert_eq!(bold.paragraphs().next().unwrap().runs().next().unwrap().bold(), Some(true));
    }

    #[test]
    fn test_nested_tables_are_covered() {
        let mut d = doc(concat!(
            "<w:tbl><w:tr><w:tc><w:tbl><w:tr><w:tc>",
            "<w:p><w:r><w:t>ala_san</w:t></w:r></w:p>",
            "</w:tc></w:tr></w:tbl><w:p/></w:tc></w:tr></w:tbl>"
        ));
        assert_eq!(substitute_default(&mut d, "ala_san", "Sakit").unwrap(), 1);
        assert!(d.to_xml().contains("<w:t>Sakit</w:t>"));
    }

    #[test]
    fn test_split_token_is_not_matched() {
        let body = concat!(
            "<w:p><w:r><w:t>nama_mata</w:t></w:r>",
            "<w:r><w:rPr><w:b/></w:rPr><w:t>_kuliah</w:t></w:r></w:p>"
        );
        let mut d = doc(body);
        let location = locate(&d, "nama_mata_kuliah").unwrap();
        assert_eq!(location, TokenLocation { run_matches: 0, split_matches: 1 });
        assert!(!location.is_replaceable());

        assert_eq!(substitute_default(&mut d, "nama_mata_kuliah", "Kalkulus II").unwrap(), 0);
        assert_eq!(d.to_xml(), document_xml(body));
    }

    #[test]
    fn test_substring_over_match() {
        let mut d = doc(concat!(
            "<w:p><w:r><w:t>Nama: nim</w:t></w:r></w:p>",
            "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>NIM: nims</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"
        ));
        assert_eq!(locate(&d, "nim").unwrap().run_matches, 2);
        assert_eq!(substitute_default(&mut d, "nim", "2101234567").unwrap(), 2);
        assert_eq!(first_run(&d).text(), "2101234567");
        assert_eq!(d.tables().next().unwrap().text(), "2101234567");
    }

    #[test]
    fn test_undefined_color_is_left_as_authored() {
        let body = concat!(
            "<w:p><w:r><w:rPr><w:color w:val=\"auto\"/></w:rPr><w:t>nomor_hp</w:t></w:r>",
            "<w:r><w:rPr><w:color w:themeColor=\"accent1\"/></w:rPr><w:t>nomor_hp</w:t></w:r></w:p>"
        );
        let mut d = doc(body);
        assert_eq!(substitute_default(&mut d, "nomor_hp", "0812").unwrap(), 2);
        let xml = d.to_xml();
        assert!(xml.contains("<w:rPr><w:color w:val=\"auto\"/><w:sz w:val=\"22\"/></w:rPr><w:t>0812</w:t>"));
        assert!(xml.contains("<w:rPr><w:color w:themeColor=\"accent1\"/><w:sz w:val=\"22\"/></w:rPr><w:t>0812</w:t>"));
    }

    #[test]
    fn test_multiline_value() {
        let mut d = doc("<w:p><w:r><w:t>ala_san</w:t></w:r></w:p>");
        substitute_default(&mut d, "ala_san", "Sakit\nSurat dokter terlampir").unwrap();
        assert_eq!(first_run(&d).text(), "Sakit\nSurat dokter terlampir");
        assert!(d.to_xml().contains("<w:t>Sakit</w:t><w:br/><w:t>Surat dokter terlampir</w:t>"));
    }

    #[test]
    fn test_empty_value_clears_run() {
        let mut d = doc("<w:p><w:r><w:t>kelas_mata_kuliah</w:t></w:r></w:p>");
        assert_eq!(substitute_default(&mut d, "kelas_mata_kuliah", "").unwrap(), 1);
        assert_eq!(first_run(&d).text(), "");
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let mut d = doc("<w:p><w:r><w:t>nmhs</w:t></w:r></w:p>");
        let before = d.clone();
        assert!(matches!(
            substitute_default(&mut d, "", "x"),
            Err(OoxmlError::InvalidFormat(_))
        ));
        assert!(locate(&d, "").is_err());
        assert_eq!(d, before);
    }

    #[test]
    fn test_value_with_xml_illegal_characters_is_rejected() {
        let mut d = doc("<w:p><w:r><w:t>ala_san</w:t></w:r><w:r><w:t>ala_san</w:t></w:r></w:p>");
        let before = d.clone();
        for value in ["Sakit\u{0B}demam", "Sakit\u{0}", "\u{1F}", "x\u{FFFE}"] {
            assert!(matches!(
                substitute_default(&mut d, "ala_san", value),
                Err(OoxmlError::InvalidFormat(_))
            ));
        }
        assert_eq!(d, before);

        let mut para = d.paragraphs().next().unwrap().clone();
        assert!(substitute_paragraph(&mut para, "ala_san", "\u{0C}", DEFAULT_FONT_SIZE).is_err());
        assert_eq!(para.text(), "ala_sanala_san");

        // Tab, newline and astral characters are fine
        assert_eq!(substitute_default(&mut d, "ala_san", "Sakit\tdemam 🤒").unwrap(), 2);
        assert!(!d.to_xml().contains('\u{0B}'));
    }

    #[test]
    fn test_rewrite_run_restores_format() {
        let mut run = Run::from_xml(concat!(
            "<w:r><w:rPr><w:b w:val=\"0\"/><w:i/><w:color w:val=\"C00000\"/>",
            "<w:u w:val=\"double\"/></w:rPr><w:tab/><w:t>x</w:t></w:r>"
        ))
        .unwrap();
        let before = RunFormat::capture(&run);
        rewrite_run(&mut run, "y", DEFAULT_FONT_SIZE);
        assert_eq!(RunFormat::capture(&run), before);
        assert_eq!(run.text(), "y");
        assert_eq!(run.font_size(), Some(DEFAULT_FONT_SIZE));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// Non-empty run texts that never contain `#`
        fn run_texts_strategy() -> impl Strategy<Value = Vec<String>> {
            prop::collection::vec("[a-zA-Z0-9_ ]{1,16}", 1..6)
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn prop_absent_token_leaves_document_unchanged(
                texts in run_texts_strategy(),
                token in "[a-z_]{1,10}",
                value in "\\PC{0,12}",
            ) {
                let body: String = texts
                    .iter()
                    .map(|t| format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", t))
                    .collect();
                let xml = document_xml(&body);
                let mut d = Document::from_xml(xml.as_bytes()).unwrap();
                let before = d.clone();

                let token = format!("#{}#", token);
                prop_assert_eq!(substitute_default(&mut d, &token, &value).unwrap(), 0);
                prop_assert_eq!(&d, &before);
                prop_assert_eq!(d.to_xml(), xml);
            }
        }
    }
}
