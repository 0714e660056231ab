//! Shared formatting types for DOCX run properties.

/// Underline styles for text (`<w:u w:val="..."/>`).
///
/// Values this crate has no dedicated variant for are kept verbatim in
/// `Other`, so reading and writing back an underline never changes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnderlineStyle {
    /// Explicitly no underline (`none`), which overrides an inherited underline
    None,
    Single,
    Words,
    Double,
    Thick,
    Dotted,
    Dashed,
    DotDash,
    DotDotDash,
    Wave,
    /// Any other `ST_Underline` value
    Other(String),
}

impl UnderlineStyle {
    pub(crate) fn as_str(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Single => "single",
            Self::Words => "words",
            Self::Double => "double",
            Self::Thick => "thick",
            Self::Dotted => "dotted",
            Self::Dashed => "dash",
            Self::DotDash => "dotDash",
            Self::DotDotDash => "dotDotDash",
            Self::Wave => "wave",
            Self::Other(val) => val,
        }
    }

    /// Parse a `w:val` attribute value.
    pub fn from_val(val: &str) -> Self {
        match val {
            "none" => Self::None,
            "single" => Self::Single,
            "words" => Self::Words,
            "double" => Self::Double,
            "thick" => Self::Thick,
            "dotted" => Self::Dotted,
            "dash" => Self::Dashed,
            "dotDash" => Self::DotDash,
            "dotDotDash" => Self::DotDotDash,
            "wave" => Self::Wave,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Parse an `ST_OnOff` value. A missing `w:val` means on.
#[inline]
pub(crate) fn parse_on_off(val: Option<&str>) -> bool {
    !matches!(val, Some("0" | "false" | "off"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underline_round_trip_values() {
        for val in ["none", "single", "double", "dash", "wave", "dashLongHeavy"] {
            assert_eq!(UnderlineStyle::from_val(val).as_str(), val);
        }
        assert_eq!(
            UnderlineStyle::from_val("dashLongHeavy"),
            UnderlineStyle::Other("dashLongHeavy".to_string())
        );
    }

    #[test]
    fn test_parse_on_off() {
        assert!(parse_on_off(None));
        assert!(parse_on_off(Some("1")));
        assert!(parse_on_off(Some("true")));
        assert!(!parse_on_off(Some("0")));
        assert!(!parse_on_off(Some("false")));
        assert!(!parse_on_off(Some("off")));
    }
}
