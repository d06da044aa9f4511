//! Figure content denesting.
//!
//! The converter wraps loose inline content in paragraphs. Inside a `figure`
//! the margin annotations must be direct children, so paragraphs holding
//! only a footnote reference (plus an optional `span.unnumbered`) or only a
//! single `span` are unwrapped in place.

use super::{UNNUMBERED, is_footnote_ref, is_marker};
use crate::dom::{Document, Element, Node, find_all_paths};
use crate::pipeline::{Transform, TransformError};

pub struct FigureDenest;

impl Transform for FigureDenest {
    fn name(&self) -> &'static str {
        "figure-denest"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), TransformError> {
        let is_figure = |e: &Element| e.is("figure");
        for path in find_all_paths(&doc.root, &is_figure).into_iter().rev() {
            if let Some(figure) = doc.root.at_path_mut(&path) {
                denest(figure);
            }
        }
        Ok(())
    }
}

fn denest(figure: &mut Element) {
    for i in (0..figure.children.len()).rev() {
        let unwrap = figure.children[i]
            .as_element()
            .is_some_and(is_annotation_paragraph);
        if !unwrap {
            continue;
        }
        if let Some(p) = figure.children.remove(i).into_element() {
            figure.children.splice(i..i, p.children);
        }
    }
}

/// `p` whose visible content is `a.footnoteRef [span.unnumbered]` or a
/// single `span`.
fn is_annotation_paragraph(p: &Element) -> bool {
    if !p.is("p") {
        return false;
    }
    let mut elements = Vec::new();
    for node in p.content_children() {
        match node {
            Node::Element(e) => elements.push(&**e),
            _ => return false,
        }
    }

    match elements.as_slice() {
        [only] => is_footnote_ref(only) || only.is("span"),
        [anchor, marker] => is_footnote_ref(anchor) && is_marker(marker, UNNUMBERED),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse, render};

    fn run(html: &str) -> String {
        let mut doc = parse(html).unwrap();
        FigureDenest.apply(&mut doc).unwrap();
        render(&doc)
    }

    #[test]
    fn test_footnote_ref_with_marker_unwrapped() {
        let html = concat!(
            r##"<figure><p><a href="#fn1" class="footnoteRef" id="fnref1"><sup>1</sup></a>"##,
            r#"<span class="unnumbered"></span></p><img src="a.png"></figure>"#
        );
        let doc = {
            let mut doc = parse(html).unwrap();
            FigureDenest.apply(&mut doc).unwrap();
            doc
        };
        let figure = doc.root.element_children().next().unwrap();
        let tags: Vec<_> = figure.element_children().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["a", "span", "img"]);
    }

    #[test]
    fn test_single_span_unwrapped() {
        assert_eq!(
            run("<figure>\n<p><span class=\"marginnote\">Caption</span></p>\n</figure>"),
            "<figure>\n<span class=\"marginnote\">Caption</span>\n</figure>"
        );
    }

    #[test]
    fn test_paragraph_with_text_kept() {
        let html = r#"<figure><p>Some <span>text</span></p></figure>"#;
        assert_eq!(run(html), html);
    }

    #[test]
    fn test_two_spans_kept() {
        let html = r#"<figure><p><span>a</span><span>b</span></p></figure>"#;
        assert_eq!(run(html), html);
    }

    #[test]
    fn test_outside_figure_untouched() {
        let html = r#"<p><span>alone</span></p>"#;
        assert_eq!(run(html), html);
    }

    #[test]
    fn test_nested_paragraph_not_direct_child() {
        let html = r#"<figure><div><p><span>x</span></p></div></figure>"#;
        assert_eq!(run(html), html);
    }
}
