use std::fmt;

/// RGB color representation.
///
/// Used for run font colors (`<w:color w:val="RRGGBB"/>`).
///
/// # Examples
///
/// ```rust
/// use surat_izin::common::RGBColor;
///
/// // Create a red color
/// let red = RGBColor::new(255, 0, 0);
///
/// // Create from hex string
/// let blue = RGBColor::from_hex("0000FF").unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RGBColor {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl RGBColor {
    /// Black, the color most templates write explicitly.
    pub const BLACK: RGBColor = RGBColor::new(0, 0, 0);

    /// Create a new RGB color.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use surat_izin::common::RGBColor;
    ///
    /// let color = RGBColor::new(255, 128, 0); // Orange
    /// ```
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create an RGB color from a hex string.
    ///
    /// Accepts `RRGGBB` with an optional leading `#`. Returns `None` for
    /// anything else, including the WordprocessingML keyword `auto`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use surat_izin::common::RGBColor;
    ///
    /// let red = RGBColor::from_hex("FF0000").unwrap();
    /// let blue = RGBColor::from_hex("#0000FF").unwrap();
    /// assert!(RGBColor::from_hex("auto").is_none());
    /// ```
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Self::new(r, g, b))
    }

    /// Convert to hex string (without # prefix).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use surat_izin::common::RGBColor;
    ///
    /// let color = RGBColor::new(255, 0, 0);
    /// assert_eq!(color.to_hex(), "FF0000");
    /// ```
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for RGBColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(RGBColor::from_hex("1F3864"), Some(RGBColor::new(0x1F, 0x38, 0x64)));
        assert_eq!(RGBColor::from_hex("#000000"), Some(RGBColor::BLACK));
        assert_eq!(RGBColor::from_hex("auto"), None);
        assert_eq!(RGBColor::from_hex("12345"), None);
        assert_eq!(RGBColor::from_hex("GG0000"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(RGBColor::new(0, 0x80, 0xFF).to_string(), "#0080FF");
    }
}
