//! [`Document`] → HTML text.

use super::{Document, Element, Node};

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Serialize a document.
///
/// Text and attribute values are emitted as stored (they keep the escaping
/// of the source); attribute values are always double-quoted.
pub fn render(doc: &Document) -> String {
    let mut out = String::new();
    if let Some(doctype) = &doc.doctype {
        out.push_str(doctype);
    }
    render_children(&doc.root, &mut out);
    out
}

fn render_children(el: &Element, out: &mut String) {
    for child in &el.children {
        match child {
            Node::Element(e) => write_element(e, out),
            Node::Text(t) => out.push_str(t.as_str()),
            Node::Comment(c) if c.starts_with("<!--") => out.push_str(c),
            Node::Comment(c) => {
                out.push_str("<!--");
                out.push_str(c);
                out.push_str("-->");
            }
        }
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    for (name, value) in el.attrs.iter() {
        out.push(' ');
        out.push_str(name);
        if !value.is_empty() {
            out.push_str("=\"");
            out.push_str(&value.replace('"', "&quot;"));
            out.push('"');
        }
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&el.tag.as_str()) {
        return;
    }

    render_children(el, out);
    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Attrs, parse};

    fn render_element(el: &Element) -> String {
        let mut out = String::new();
        write_element(el, &mut out);
        out
    }

    #[test]
    fn test_render_fragment_round_trip() {
        let html = r#"<blockquote><p>Quote <em>text</em></p><!-- c --></blockquote>"#;
        assert_eq!(render(&parse(html).unwrap()), html);
    }

    #[test]
    fn test_render_void_and_boolean() {
        let mut input = Element::new("input");
        input.attrs = Attrs::from([("type", "checkbox"), ("checked", "")]);
        assert_eq!(render_element(&input), r#"<input type="checkbox" checked>"#);
    }

    #[test]
    fn test_render_escapes_quotes_in_attributes() {
        let el = Element::new("span").with_attr("title", r#"say "hi""#);
        assert_eq!(render_element(&el), r#"<span title="say &quot;hi&quot;"></span>"#);
    }

    #[test]
    fn test_render_doctype() {
        let doc = parse("<!DOCTYPE html>\n<html></html>").unwrap();
        assert_eq!(render(&doc), "<!DOCTYPE html>\n<html></html>");
    }
}
