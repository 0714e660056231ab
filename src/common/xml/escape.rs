use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;
use std::borrow::Cow;

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'", "\t", "\n", "\r"])
        .expect("Failed to build XML escaper")
});

static TEXT_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\r"])
        .expect("Failed to build XML text escaper")
});

// Use LeftmostLongest to ensure longer entities are matched first (e.g., &amp; instead of &lt;)
static XML_UNESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
        .expect("Failed to build XML unescaper")
});

/// Escape XML special characters for use in an attribute value.
///
/// Tab, line feed and carriage return are written as character references,
/// since a parser turns the raw characters into spaces.
///
/// # Examples
///
/// ```
/// use surat_izin::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<tag>\"hello\"</tag>"), "&lt;tag&gt;&quot;hello&quot;&lt;/tag&gt;");
/// assert_eq!(escape_xml("a\tb\r\n"), "a&#x9;b&#xD;&#xA;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(
        s,
        &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;", "&#x9;", "&#xA;", "&#xD;"],
    )
}

/// Escape XML special characters for use in element text.
///
/// Quotes are left as they are since they carry no meaning in character data.
/// Carriage returns become `&#xD;` so that line-end normalization on reparse
/// keeps them.
///
/// # Examples
///
/// ```
/// use surat_izin::common::xml::escape_text;
/// assert_eq!(escape_text("Jum'at <pagi> & \"sore\""), "Jum'at &lt;pagi&gt; &amp; \"sore\"");
/// assert_eq!(escape_text("a\r\nb"), "a&#xD;\nb");
/// ```
#[inline]
pub fn escape_text(s: &str) -> String {
    TEXT_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&#xD;"])
}

/// Normalize the line endings of raw character data: `\r\n` and a lone
/// `\r` both become `\n`.
pub fn normalize_line_endings(raw: &str) -> Cow<'_, str> {
    if memchr::memchr(b'\r', raw.as_bytes()).is_none() {
        return Cow::Borrowed(raw);
    }
    Cow::Owned(raw.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Normalize a raw attribute value: line endings as in
/// [`normalize_line_endings`], then every tab and line feed becomes a space.
///
/// Character references are left alone; unescape afterwards.
pub fn normalize_attribute(raw: &str) -> Cow<'_, str> {
    if memchr::memchr3(b'\t', b'\n', b'\r', raw.as_bytes()).is_none() {
        return Cow::Borrowed(raw);
    }
    Cow::Owned(normalize_line_endings(raw).replace(['\t', '\n'], " "))
}

/// Whether `c` is allowed in an XML 1.0 document.
///
/// # Examples
///
/// ```
/// use surat_izin::common::xml::is_xml_char;
/// assert!(is_xml_char('\n'));
/// assert!(is_xml_char('é'));
/// assert!(!is_xml_char('\u{0B}'));
/// assert!(!is_xml_char('\u{FFFE}'));
/// ```
#[inline]
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// First character of `s` that XML 1.0 does not allow, if any.
#[inline]
pub fn find_invalid_xml_char(s: &str) -> Option<char> {
    s.chars().find(|&c| !is_xml_char(c))
}

/// Unescape XML special characters.
///
/// Replaces the five standard XML entities and numeric character references
/// with their corresponding characters. Unknown or malformed references are
/// left unchanged.
///
/// # Examples
///
/// ```
/// use surat_izin::common::xml::unescape_xml;
/// assert_eq!(unescape_xml("&lt;a &amp; b&gt;"), "<a & b>");
/// assert_eq!(unescape_xml("&quot;hello&apos;"), "\"hello'");
/// assert_eq!(unescape_xml("&amp;lt;"), "&lt;"); // &amp; is matched first
/// assert_eq!(unescape_xml("caf&#233; &#x41;"), "café A");
/// assert_eq!(unescape_xml("&invalid;"), "&invalid;"); // unknown entity
/// ```
pub fn unescape_xml(s: &str) -> String {
    if memchr::memchr(b'&', s.as_bytes()).is_none() {
        return s.to_string();
    }
    if memchr::memmem::find(s.as_bytes(), b"&#").is_none() {
        return XML_UNESCAPER.replace_all(s, &["&", "<", ">", "\"", "'"]);
    }

    // Slow path: resolve every reference in one left-to-right scan so that
    // "&amp;#65;" stays "&#65;" instead of turning into "A".
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';') {
            Some(semi) => match resolve_reference(&tail[1..semi]) {
                Some(resolved) => {
                    out.push_str(&resolved);
                    rest = &tail[semi + 1..];
                },
                None => {
                    out.push('&');
                    rest = &tail[1..];
                },
            },
            None => {
                out.push_str(tail);
                rest = "";
            },
        }
    }
    out.push_str(rest);
    out
}

/// Resolve the name of an entity or character reference (the part between
/// `&` and `;`).
///
/// Returns `None` for names that are neither predefined entities nor valid
/// character references.
///
/// # Examples
///
/// ```
/// use surat_izin::common::xml::resolve_reference;
/// assert_eq!(resolve_reference("amp").as_deref(), Some("&"));
/// assert_eq!(resolve_reference("#x2014").as_deref(), Some("\u{2014}"));
/// assert_eq!(resolve_reference("nbsp"), None);
/// ```
pub fn resolve_reference(name: &str) -> Option<String> {
    let resolved = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)?
        },
    };
    Some(resolved.to_string())
}
