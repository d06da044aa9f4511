//! Tufte CSS rewrite passes.
//!
//! Each pass operates on the whole document and is independent of the
//! others except for ordering (see [`super::TransformChain::standard`]).
//!
//! # Modules
//!
//! - `subtitle`: `section.subtitle > hN` → `p.subtitle` before the section
//! - `code`: `pre > code` → `pre.code`
//! - `citation`: `span.cite` → `cite`, blockquote footers promoted
//! - `figure`: unwraps annotation paragraphs inside `figure`
//! - `fullwidth`: `table` + `span.fullwidth` → `table.fullwidth`
//! - `sidenote`: footnotes → sidenotes / margin notes
//! - `wrapper`: `figure > table` → `figure > div.table-wrapper > table`

mod citation;
mod code;
mod figure;
mod fullwidth;
mod sidenote;
mod subtitle;
mod wrapper;

pub use citation::{BlockquoteFooters, CitationSpans};
pub use code::CodeListings;
pub use figure::FigureDenest;
pub use fullwidth::FullwidthTables;
pub use sidenote::SidenoteConverter;
pub use subtitle::SubtitleNormalizer;
pub use wrapper::TableWrappers;

use crate::dom::{Element, Node};

// =============================================================================
// Markup conventions
// =============================================================================

/// Class of the converter's footnotes container.
pub const FOOTNOTES: &str = "footnotes";
/// Class of in-text footnote reference anchors.
pub const FOOTNOTE_REF: &str = "footnoteRef";
/// Marker span class: render the preceding note as a margin note.
pub const UNNUMBERED: &str = "unnumbered";
/// Marker span class: render the preceding table at full width.
pub const FULLWIDTH: &str = "fullwidth";
pub const SUBTITLE: &str = "subtitle";
pub const FOOTER: &str = "footer";
pub const CITE: &str = "cite";
pub const MARGIN_TOGGLE: &str = "margin-toggle";
pub const TABLE_WRAPPER: &str = "table-wrapper";

// =============================================================================
// Helpers
// =============================================================================

/// `span` carrying the given class.
fn is_marker(el: &Element, class: &str) -> bool {
    el.is("span") && el.has_class(class)
}

fn is_marker_node(node: &Node, class: &str) -> bool {
    node.as_element().is_some_and(|e| is_marker(e, class))
}

/// Any in-text footnote reference anchor, whatever its number.
fn is_footnote_ref(el: &Element) -> bool {
    el.is("a") && el.has_class(FOOTNOTE_REF)
}

/// Parent of the element at `path`, and the element's index in it.
fn parent_mut<'a>(root: &'a mut Element, path: &[usize]) -> Option<(&'a mut Element, usize)> {
    let (&index, parent_path) = path.split_last()?;
    Some((root.at_path_mut(parent_path)?, index))
}

/// Remove the element at `path` from its parent and return it.
fn detach(root: &mut Element, path: &[usize]) -> Option<Element> {
    let (parent, index) = parent_mut(root, path)?;
    if index >= parent.children.len() {
        return None;
    }
    parent.children.remove(index).into_element()
}

/// The only non-blank child of `el`, if it is an element.
fn sole_content_element(el: &Element) -> Option<&Element> {
    let mut content = el.content_children();
    match (content.next(), content.next()) {
        (Some(Node::Element(only)), None) => Some(only),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{find_path, parse};

    #[test]
    fn test_detach_moves_node_out() {
        let mut doc = parse("<div><p>a</p><section class=\"footnotes\"></section></div>").unwrap();
        let path = find_path(&doc.root, &|e| e.has_class(FOOTNOTES)).unwrap();

        let detached = detach(&mut doc.root, &path).unwrap();
        assert!(detached.is("section"));
        assert_eq!(doc.count(|e| e.has_class(FOOTNOTES)), 0);
        assert_eq!(doc.count(|e| e.is("p")), 1);
    }

    #[test]
    fn test_sole_content_element_ignores_whitespace() {
        let doc = parse("<p>\n  <span class=\"fullwidth\"></span>\n</p>").unwrap();
        let p = doc.root.element_children().next().unwrap();
        assert!(sole_content_element(p).is_some_and(|e| is_marker(e, FULLWIDTH)));

        let doc = parse("<p>text <span></span></p>").unwrap();
        let p = doc.root.element_children().next().unwrap();
        assert!(sole_content_element(p).is_none());
    }
}
