/// Run structure for Word documents.
use crate::common::xml::{XmlElement, XmlNode};
use crate::common::{Length, RGBColor};
use crate::ooxml::docx::format::{UnderlineStyle, parse_on_off};
use crate::ooxml::docx::wml;

/// A run in a Word document.
///
/// Represents a `<w:r>` element: the smallest span of text that carries its
/// own character formatting. The formatting lives in the optional `<w:rPr>`
/// child; everything else is run content (`<w:t>`, `<w:tab/>`, `<w:br/>`,
/// drawings, field characters, ...).
///
/// Formatting accessors report only what is set directly on the run. A
/// `None` means the value is inherited from styles or document defaults.
///
/// # Example
///
/// ```rust
/// use surat_izin::ooxml::docx::Run;
///
/// let mut run = Run::from_xml(r#"<w:r><w:rPr><w:b/></w:rPr><w:t>nama_dosen</w:t></w:r>"#)?;
/// assert_eq!(run.text(), "nama_dosen");
/// assert_eq!(run.bold(), Some(true));
///
/// run.set_text("Dr. Siti Aminah");
/// assert_eq!(run.text(), "Dr. Siti Aminah");
/// assert_eq!(run.bold(), Some(true));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// The `<w:r>` element, including its properties and content
    element: XmlElement,
}

impl Run {
    /// Create an unformatted run holding `text`.
    pub fn new(text: &str) -> Self {
        let mut run = Self {
            element: XmlElement::new("w:r"),
        };
        run.set_text(text);
        run
    }

    /// Wrap a parsed `<w:r>` element.
    #[inline]
    pub(crate) fn from_element(element: XmlElement) -> Self {
        Self { element }
    }

    /// Parse a run from a standalone `<w:r>` XML fragment.
    ///
    /// The `w` prefix does not need to be declared.
    pub fn from_xml(xml: &str) -> crate::ooxml::error::Result<Self> {
        Ok(Self::from_element(XmlElement::parse(xml)?))
    }

    /// Get the underlying `<w:r>` element.
    #[inline]
    pub fn element(&self) -> &XmlElement {
        &self.element
    }

    /// Consume the run and return its element.
    #[inline]
    pub fn into_element(self) -> XmlElement {
        self.element
    }

    /// Get the text content of this run.
    ///
    /// `<w:t>` contributes its text, `<w:tab/>` a tab, and line breaks
    /// (`<w:br/>` without a page or column type, `<w:cr/>`) a newline.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for el in self.element.child_elements() {
            match el.local_name() {
                "t" => {
                    for node in &el.children {
                        if let XmlNode::Text(t) | XmlNode::CData(t) = node {
                            text.push_str(t);
                        }
                    }
                },
                "tab" | "ptab" => text.push('\t'),
                "br" => {
                    if matches!(el.attribute_local("type"), None | Some("textWrapping")) {
                        text.push('\n');
                    }
                },
                "cr" => text.push('\n'),
                "noBreakHyphen" => text.push('-'),
                _ => {},
            }
        }
        text
    }

    /// Remove all run content, keeping only the run properties.
    pub fn clear(&mut self) {
        self.element.children.retain(|node| wml::is_element(node, "rPr"));
    }

    /// Replace the run content with `text`.
    ///
    /// Existing content is discarded entirely (see [`Run::clear`]) and the
    /// run properties are left as they are. Tabs become `<w:tab/>` and
    /// line feeds or carriage returns become `<w:br/>`.
    pub fn set_text(&mut self, text: &str) {
        self.clear();

        let mut pending = String::new();
        for ch in text.chars() {
            match ch {
                '\t' => {
                    self.push_text(&mut pending);
                    self.push_empty("tab");
                },
                '\n' | '\r' => {
                    self.push_text(&mut pending);
                    self.push_empty("br");
                },
                _ => pending.push(ch),
            }
        }
        self.push_text(&mut pending);
    }

    fn push_text(&mut self, pending: &mut String) {
        if pending.is_empty() {
            return;
        }
        let mut t = XmlElement::new(wml::qualified(&self.element, "t"));
        if pending.starts_with(char::is_whitespace) || pending.ends_with(char::is_whitespace) {
            t.set_attribute("xml:space", "preserve");
        }
        t.children.push(XmlNode::Text(std::mem::take(pending)));
        self.element.children.push(XmlNode::Element(t));
    }

    fn push_empty(&mut self, local: &str) {
        let el = XmlElement::new(wml::qualified(&self.element, local));
        self.element.children.push(XmlNode::Element(el));
    }

    /// Get the run properties element (`<w:rPr>`), if present.
    #[inline]
    pub fn properties(&self) -> Option<&XmlElement> {
        wml::child(&self.element, "rPr")
    }

    /// Get the run properties element, creating it as the first child if
    /// needed.
    fn properties_mut(&mut self) -> &mut XmlElement {
        let pos = match self
            .element
            .children
            .iter()
            .position(|node| wml::is_element(node, "rPr"))
        {
            Some(pos) => pos,
            None => {
                let rpr = XmlElement::new(wml::qualified(&self.element, "rPr"));
                self.element.children.insert(0, XmlNode::Element(rpr));
                0
            },
        };
        match &mut self.element.children[pos] {
            XmlNode::Element(rpr) => rpr,
            _ => unreachable!("rPr position always holds an element"),
        }
    }

    /// Get a property element by local name.
    fn property(&self, local: &str) -> Option<&XmlElement> {
        self.properties().and_then(|rpr| wml::child(rpr, local))
    }

    /// Set or remove a property element, keeping schema order.
    fn set_property(&mut self, local: &str, val: Option<String>) {
        match val {
            Some(val) => {
                let rpr = self.properties_mut();
                let mut el = XmlElement::new(wml::qualified(rpr, local));
                if !val.is_empty() {
                    el.set_attribute(wml::qualified(rpr, "val"), val);
                }
                wml::set_rpr_child(rpr, el);
            },
            None => {
                if let Some(rpr) = wml::child_mut(&mut self.element, "rPr") {
                    wml::remove_children(rpr, local);
                }
            },
        }
    }

    fn on_off(&self, local: &str) -> Option<bool> {
        self.property(local)
            .map(|el| parse_on_off(el.attribute_local("val")))
    }

    fn set_on_off(&mut self, local: &str, value: Option<bool>) {
        if self.on_off(local) == value {
            return;
        }
        // `<w:b/>` for on, `<w:b w:val="0"/>` for off
        self.set_property(local, value.map(|on| if on { String::new() } else { "0".to_string() }));
    }

    /// Check if this run is bold.
    ///
    /// Returns `Some(true)` or `Some(false)` when `<w:b>` is present,
    /// `None` when bold is inherited.
    #[inline]
    pub fn bold(&self) -> Option<bool> {
        self.on_off("b")
    }

    /// Set or clear direct bold formatting.
    ///
    /// Setting the value the run already has leaves the XML untouched.
    pub fn set_bold(&mut self, value: Option<bool>) {
        self.set_on_off("b", value);
    }

    /// Check if this run is italic.
    #[inline]
    pub fn italic(&self) -> Option<bool> {
        self.on_off("i")
    }

    /// Set or clear direct italic formatting.
    pub fn set_italic(&mut self, value: Option<bool>) {
        self.set_on_off("i", value);
    }

    /// Get the underline style of this run.
    ///
    /// A `<w:u>` without a value is read as a single underline.
    pub fn underline(&self) -> Option<UnderlineStyle> {
        self.property("u").map(|el| {
            el.attribute_local("val")
                .map(UnderlineStyle::from_val)
                .unwrap_or(UnderlineStyle::Single)
        })
    }

    /// Set or clear the underline style.
    ///
    /// Only `w:val` is rewritten, so underline color attributes survive.
    pub fn set_underline(&mut self, value: Option<UnderlineStyle>) {
        if self.underline() == value {
            return;
        }
        match value {
            Some(style) => {
                let rpr = self.properties_mut();
                let val_name = wml::qualified(rpr, "val");
                match wml::child_mut(rpr, "u") {
                    Some(u) => u.set_attribute(val_name, style.as_str()),
                    None => {
                        let u = XmlElement::new(wml::qualified(rpr, "u"))
                            .with_attribute(val_name, style.as_str());
                        wml::set_rpr_child(rpr, u);
                    },
                }
            },
            None => self.set_property("u", None),
        }
    }

    /// Get the font size of this run (`<w:sz>`, stored in half-points).
    pub fn font_size(&self) -> Option<Length> {
        self.property("sz")
            .and_then(|el| el.attribute_local("val"))
            .and_then(|val| val.trim().parse::<u32>().ok())
            .map(Length::from_half_points)
    }

    /// Set or clear the font size.
    ///
    /// Sizes are rounded to the nearest half-point.
    pub fn set_font_size(&mut self, value: Option<Length>) {
        match value {
            Some(size) => {
                let half_points = size.half_points();
                if self.font_size().map(|s| s.half_points()) == Some(half_points) {
                    return;
                }
                self.set_property("sz", Some(half_points.to_string()));
            },
            None => self.set_property("sz", None),
        }
    }

    /// Get the explicit RGB font color of this run.
    ///
    /// Returns `None` when there is no `<w:color>`, when it is `auto`, or
    /// when its value is not a valid hex color. Theme-only colors carry
    /// an RGB fallback in `w:val` and report that value.
    pub fn color(&self) -> Option<RGBColor> {
        self.property("color")
            .and_then(|el| el.attribute_local("val"))
            .and_then(RGBColor::from_hex)
    }

    /// Set or clear the RGB font color.
    ///
    /// Setting an RGB value drops theme color references, since Word
    /// would otherwise keep rendering the theme color.
    pub fn set_color(&mut self, value: Option<RGBColor>) {
        if self.color() == value {
            return;
        }
        match value {
            Some(color) => {
                let rpr = self.properties_mut();
                let val_name = wml::qualified(rpr, "val");
                match wml::child_mut(rpr, "color") {
                    Some(el) => {
                        el.set_attribute(val_name, color.to_hex());
                        el.attributes.retain(|(key, _)| {
                            !matches!(
                                crate::common::xml::tree::local_part(key),
                                "themeColor" | "themeTint" | "themeShade"
                            )
                        });
                    },
                    None => {
                        let el = XmlElement::new(wml::qualified(rpr, "color"))
                            .with_attribute(val_name, color.to_hex());
                        wml::set_rpr_child(rpr, el);
                    },
                }
            },
            None => self.set_property("color", None),
        }
    }

    /// Serialize the run.
    #[inline]
    pub(crate) fn write_to(&self, out: &mut String) {
        self.element.write_to(out);
    }
}
