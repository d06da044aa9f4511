//! Citation and blockquote footer fixups.
//!
//! Tufte CSS expects the source of a quotation as a `footer` that is a
//! direct child of the `blockquote`, while the converter leaves it nested in
//! the last paragraph:
//!
//! ```text
//! <blockquote><p>Quote <span class="footer"><a href="u">Src</a></span></p></blockquote>
//!   ↓
//! <blockquote cite="u"><p>Quote</p><footer><a href="u">Src</a></footer></blockquote>
//! ```

use super::{CITE, FOOTER, is_marker};
use crate::dom::{Document, Element, Node, find_all_paths};
use crate::pipeline::{Transform, TransformError};

// =============================================================================
// Inline citations
// =============================================================================

/// `span.cite` → `cite`.
pub struct CitationSpans;

impl Transform for CitationSpans {
    fn name(&self) -> &'static str {
        "citations"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), TransformError> {
        let is_cite_span = |e: &Element| is_marker(e, CITE);
        for path in find_all_paths(&doc.root, &is_cite_span) {
            if let Some(span) = doc.root.at_path_mut(&path) {
                span.tag = "cite".to_string();
                span.attrs.remove_class(CITE);
            }
        }
        Ok(())
    }
}

// =============================================================================
// Blockquote footers
// =============================================================================

/// Moves a trailing `span.footer` (or `cite`) out of a blockquote's last
/// paragraph into a `footer` child of the blockquote.
pub struct BlockquoteFooters;

impl Transform for BlockquoteFooters {
    fn name(&self) -> &'static str {
        "blockquote-footers"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), TransformError> {
        let is_blockquote = |e: &Element| e.is("blockquote");
        for path in find_all_paths(&doc.root, &is_blockquote).into_iter().rev() {
            if let Some(blockquote) = doc.root.at_path_mut(&path) {
                promote_footer(blockquote);
            }
        }
        Ok(())
    }
}

enum FooterKind {
    /// `span.footer`, relabeled in place.
    Span,
    /// `cite`, wrapped in a new `footer`.
    Cite,
}

fn footer_kind(el: &Element) -> Option<FooterKind> {
    if is_marker(el, FOOTER) {
        Some(FooterKind::Span)
    } else if el.is("cite") {
        Some(FooterKind::Cite)
    } else {
        None
    }
}

fn promote_footer(blockquote: &mut Element) {
    let Some(p_index) = blockquote.last_content_index() else {
        return;
    };
    let Some(p) = blockquote.children[p_index]
        .as_element_mut()
        .filter(|e| e.is("p"))
    else {
        return;
    };
    let Some(marker_index) = p.last_content_index() else {
        return;
    };
    let Some(kind) = p.children[marker_index].as_element().and_then(footer_kind) else {
        return;
    };
    let Some(marker) = p.children.remove(marker_index).into_element() else {
        return;
    };
    p.trim_end();
    let drop_paragraph = p.is_empty();

    let footer = match kind {
        FooterKind::Span => {
            let mut footer = marker;
            footer.tag = "footer".to_string();
            footer.attrs.remove_class(FOOTER);
            footer
        }
        FooterKind::Cite => Element::new("footer").with_child(Node::element(marker)),
    };

    if let Some(source) = footer_source(&footer) {
        blockquote.attrs.set("cite", source);
    }
    if drop_paragraph {
        blockquote.children.remove(p_index);
    }
    blockquote.children.push(Node::element(footer));
}

/// `href` of the footer's link when the footer holds exactly one element
/// and it is a link (directly or inside a `cite`).
fn footer_source(footer: &Element) -> Option<String> {
    let mut inner = sole_element_child(footer)?;
    if inner.is("cite") {
        inner = sole_element_child(inner)?;
    }
    if !inner.is("a") {
        return None;
    }
    inner.attr("href").map(str::to_string)
}

/// The only element child; surrounding text such as a leading dash is allowed.
fn sole_element_child(el: &Element) -> Option<&Element> {
    let mut elements = el.element_children();
    match (elements.next(), elements.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse, render};

    fn run(html: &str) -> String {
        let mut doc = parse(html).unwrap();
        CitationSpans.apply(&mut doc).unwrap();
        BlockquoteFooters.apply(&mut doc).unwrap();
        render(&doc)
    }

    #[test]
    fn test_footer_promoted_with_cite_attribute() {
        assert_eq!(
            run(r#"<blockquote><p>Quote text <span class="footer"><a href="http://x">X</a></span></p></blockquote>"#),
            r#"<blockquote cite="http://x"><p>Quote text</p><footer><a href="http://x">X</a></footer></blockquote>"#
        );
    }

    #[test]
    fn test_footer_without_link_has_no_cite() {
        assert_eq!(
            run(r#"<blockquote><p>Q <span class="footer">Someone</span></p></blockquote>"#),
            r#"<blockquote><p>Q</p><footer>Someone</footer></blockquote>"#
        );
    }

    #[test]
    fn test_footer_with_dash_and_link() {
        let out = run(
            r#"<blockquote><p>Q <span class="footer">— <a href="http://y">Y</a></span></p></blockquote>"#,
        );
        assert!(out.starts_with(r#"<blockquote cite="http://y">"#));
        assert!(out.ends_with(r#"<footer>— <a href="http://y">Y</a></footer></blockquote>"#));
    }

    #[test]
    fn test_cite_span_relabeled() {
        assert_eq!(
            run(r#"<p>See <span class="cite">Tufte</span>.</p>"#),
            r#"<p>See <cite>Tufte</cite>.</p>"#
        );
    }

    #[test]
    fn test_trailing_cite_wrapped_in_footer() {
        assert_eq!(
            run(r#"<blockquote><p>Q <span class="cite"><a href="http://z">Z</a></span></p></blockquote>"#),
            r#"<blockquote cite="http://z"><p>Q</p><footer><cite><a href="http://z">Z</a></cite></footer></blockquote>"#
        );
    }

    #[test]
    fn test_footer_only_paragraph_removed() {
        let out = run(concat!(
            "<blockquote>\n<p>Quote</p>\n",
            r#"<p><span class="footer">Anon</span></p>"#,
            "\n</blockquote>"
        ));
        assert_eq!(out, "<blockquote>\n<p>Quote</p>\n\n<footer>Anon</footer></blockquote>");
    }

    #[test]
    fn test_text_after_footer_is_not_trailing() {
        let html = r#"<blockquote><p>Q <span class="footer">A</span> and more</p></blockquote>"#;
        assert_eq!(run(html), html);
    }

    #[test]
    fn test_last_child_not_paragraph() {
        let html = r#"<blockquote><p>Q <span class="footer">A</span></p><ul><li>x</li></ul></blockquote>"#;
        assert_eq!(run(html), html);
    }
}
