//! WordprocessingML element helpers.
//!
//! Elements are matched by local name. The children inspected here are
//! direct children of `w:body`, `w:p`, `w:r`, `w:tbl`, `w:tr` and `w:tc`,
//! where the local name alone identifies the WordprocessingML element (math
//! runs such as `m:r` only occur nested inside `m:oMath`).

use crate::common::xml::{XmlElement, XmlNode};

/// Children of `w:rPr` in `CT_RPr` schema order.
const RPR_CHILD_ORDER: &[&str] = &[
    "rStyle",
    "rFonts",
    "b",
    "bCs",
    "i",
    "iCs",
    "caps",
    "smallCaps",
    "strike",
    "dstrike",
    "outline",
    "shadow",
    "emboss",
    "imprint",
    "noProof",
    "snapToGrid",
    "vanish",
    "webHidden",
    "color",
    "spacing",
    "w",
    "kern",
    "position",
    "sz",
    "szCs",
    "highlight",
    "u",
    "effect",
    "bdr",
    "shd",
    "fitText",
    "vertAlign",
    "rtl",
    "cs",
    "em",
    "lang",
    "eastAsianLayout",
    "specVanish",
    "oMath",
    "rPrChange",
];

/// Check whether a node is an element with the given local name.
#[inline]
pub(crate) fn is_element(node: &XmlNode, local: &str) -> bool {
    matches!(node, XmlNode::Element(el) if el.local_name() == local)
}

/// Build a qualified name using the prefix of `context`, defaulting to `w`.
pub(crate) fn qualified(context: &XmlElement, local: &str) -> String {
    format!("{}:{}", context.prefix().unwrap_or("w"), local)
}

/// Find the first child element with the given local name.
pub(crate) fn child<'a>(parent: &'a XmlElement, local: &str) -> Option<&'a XmlElement> {
    parent.child_elements().find(|el| el.local_name() == local)
}

/// Find the first child element with the given local name, mutably.
pub(crate) fn child_mut<'a>(parent: &'a mut XmlElement, local: &str) -> Option<&'a mut XmlElement> {
    parent.child_elements_mut().find(|el| el.local_name() == local)
}

/// Remove every child element with the given local name.
pub(crate) fn remove_children(parent: &mut XmlElement, local: &str) {
    parent.children.retain(|node| !is_element(node, local));
}

/// Insert or replace an `rPr` child, keeping schema order.
///
/// An existing child with the same local name is replaced in place;
/// otherwise the new child goes before the first sibling that the schema
/// orders after it.
pub(crate) fn set_rpr_child(rpr: &mut XmlElement, child: XmlElement) {
    let local = child.local_name().to_string();
    if let Some(pos) = rpr
        .children
        .iter()
        .position(|node| is_element(node, &local))
    {
        rpr.children[pos] = XmlNode::Element(child);
        return;
    }

    let rank = rpr_rank(&local);
    let insert_at = rpr
        .children
        .iter()
        .position(|node| matches!(node, XmlNode::Element(el) if rpr_rank(el.local_name()) > rank))
        .unwrap_or(rpr.children.len());
    rpr.children.insert(insert_at, XmlNode::Element(child));
}

/// Schema position of an `rPr` child; unknown children sort last.
fn rpr_rank(local: &str) -> usize {
    RPR_CHILD_ORDER
        .iter()
        .position(|name| *name == local)
        .unwrap_or(RPR_CHILD_ORDER.len())
}
