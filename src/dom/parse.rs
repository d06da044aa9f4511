//! HTML text → [`Document`], built on the `tl` parser.
//!
//! `tl` reads `<script>`/`<style>`/`<textarea>` bodies as markup, so an inline
//! `if (a < b)` would open a tag. Those bodies are swapped for placeholders
//! before parsing and put back as verbatim text afterwards:
//!
//! ```text
//! <script>if (a < b) {}</script>  →  <script>\u{E000}0\u{E000}</script>  →  tl  →  Text("if (a < b) {}")
//! ```

use thiserror::Error;

use super::{Attrs, Document, Element, Node, Text};

/// Elements whose content is raw text, not markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea"];

/// Delimits a stashed raw-text body index. Private-use, never produced by pandoc.
const STASH_MARK: char = '\u{E000}';

/// The input could not be parsed as HTML.
#[derive(Debug, Error)]
#[error("failed to parse HTML: {0}")]
pub struct ParseError(String);

/// Parse a full page or a fragment.
///
/// A leading `<!DOCTYPE ...>` is split off before handing the rest to `tl`
/// and stored on the document so rendering can restore it verbatim.
pub fn parse(html: &str) -> Result<Document, ParseError> {
    let (doctype, body) = split_doctype(html);
    let (body, raw_bodies) = stash_raw_text(body);

    let dom = tl::parse(&body, tl::ParserOptions::default())
        .map_err(|e| ParseError(format!("{e:?}")))?;
    let parser = dom.parser();

    let children = dom
        .children()
        .iter()
        .filter_map(|handle| convert_node(*handle, parser, &raw_bodies))
        .collect();

    let mut doc = Document::new(children);
    doc.doctype = doctype.map(str::to_string);
    Ok(doc)
}

/// Split `<!DOCTYPE ...>` (case-insensitive, optional leading whitespace)
/// from the rest of the input.
fn split_doctype(html: &str) -> (Option<&str>, &str) {
    let trimmed = html.trim_start();
    let is_doctype = trimmed
        .get(..9)
        .is_some_and(|head| head.eq_ignore_ascii_case("<!doctype"));

    if is_doctype && let Some(end) = trimmed.find('>') {
        return (Some(&trimmed[..=end]), &trimmed[end + 1..]);
    }
    (None, html)
}

// =============================================================================
// Raw text
// =============================================================================

/// Replace every non-empty raw-text element body with a placeholder.
///
/// Returns the rewritten input and the bodies, indexed by placeholder.
/// Comments are skipped so a commented-out `<script>` stays a comment.
fn stash_raw_text(html: &str) -> (String, Vec<String>) {
    // ASCII lowercasing keeps byte offsets, so indices are shared with `html`
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut bodies = Vec::new();
    let mut pos = 0;

    while let Some(offset) = lower[pos..].find('<') {
        let start = pos + offset;
        let rest = &lower[start..];

        if rest.starts_with("<!--") {
            let end = rest.find("-->").map_or(html.len(), |e| start + e + 3);
            out.push_str(&html[pos..end]);
            pos = end;
            continue;
        }

        let Some(tag) = RAW_TEXT_ELEMENTS.iter().find(|tag| opens_tag(rest, tag)) else {
            out.push_str(&html[pos..=start]);
            pos = start + 1;
            continue;
        };
        let Some(open_end) = rest.find('>').map(|e| start + e + 1) else {
            break;
        };
        let close = format!("</{tag}");
        let body_end = lower[open_end..]
            .find(&close)
            .map_or(html.len(), |e| open_end + e);

        out.push_str(&html[pos..open_end]);
        if body_end > open_end {
            out.push(STASH_MARK);
            out.push_str(&bodies.len().to_string());
            out.push(STASH_MARK);
            bodies.push(html[open_end..body_end].to_string());
        }
        pos = body_end;
    }
    out.push_str(&html[pos..]);
    (out, bodies)
}

/// `rest` (lowercased, starting at `<`) opens a `tag` element.
fn opens_tag(rest: &str, tag: &str) -> bool {
    rest[1..].starts_with(tag)
        && rest[1 + tag.len()..]
            .starts_with(|c: char| c == '>' || c == '/' || c.is_ascii_whitespace())
}

/// Stashed body for a placeholder text, if `text` is one.
fn stashed<'a>(text: &str, bodies: &'a [String]) -> Option<&'a str> {
    let index = text.strip_prefix(STASH_MARK)?.strip_suffix(STASH_MARK)?;
    bodies.get(index.parse::<usize>().ok()?).map(String::as_str)
}

// =============================================================================
// tl → Node
// =============================================================================

/// Convert a `tl` node and its subtree into an owned [`Node`].
fn convert_node(handle: tl::NodeHandle, parser: &tl::Parser, bodies: &[String]) -> Option<Node> {
    match handle.get(parser)? {
        tl::Node::Tag(tag) => {
            let mut element = Element::new(tag.name().as_utf8_str().to_lowercase());
            element.attrs = convert_attrs(tag);
            element.children = tag
                .children()
                .top()
                .iter()
                .filter_map(|child| convert_node(*child, parser, bodies))
                .collect();
            Some(Node::element(element))
        }
        tl::Node::Raw(bytes) => {
            let text = bytes.as_utf8_str();
            if let Some(body) = stashed(&text, bodies) {
                return Some(Node::text(body));
            }
            (!text.is_empty()).then(|| Node::Text(Text::new(text.into_owned())))
        }
        tl::Node::Comment(bytes) => Some(Node::Comment(bytes.as_utf8_str().into_owned())),
    }
}

/// Attributes in source order. `tl` keeps them in a hash map, so the order
/// is recovered from the tag's own source text.
fn convert_attrs(tag: &tl::HTMLTag<'_>) -> Attrs {
    let order = attribute_names(&tag.raw().as_utf8_str());
    let mut pairs: Vec<(String, String)> = tag
        .attributes()
        .iter()
        .map(|(key, value)| {
            let value = value.map(|v| v.into_owned()).unwrap_or_default();
            (key.to_ascii_lowercase(), value)
        })
        .collect();
    pairs.sort_by_key(|(key, _)| order.iter().position(|n| n == key).unwrap_or(usize::MAX));

    let mut attrs = Attrs::new();
    for (key, value) in pairs {
        attrs.set(&key, value);
    }
    attrs
}

/// Lowercased attribute names of the opening tag at the start of `raw`.
fn attribute_names(raw: &str) -> Vec<String> {
    let bytes = raw.as_bytes();
    let is_space = |b: u8| b.is_ascii_whitespace();
    let mut names = Vec::new();
    let mut i = bytes
        .iter()
        .position(|&b| is_space(b) || b == b'>' || b == b'/')
        .unwrap_or(bytes.len());

    while i < bytes.len() {
        match bytes[i] {
            b'>' => break,
            b if is_space(b) || b == b'/' => i += 1,
            _ => {
                let start = i;
                while i < bytes.len() && !is_space(bytes[i]) && !matches!(bytes[i], b'=' | b'>' | b'/') {
                    i += 1;
                }
                names.push(raw[start..i].to_ascii_lowercase());

                while i < bytes.len() && is_space(bytes[i]) {
                    i += 1;
                }
                if bytes.get(i) != Some(&b'=') {
                    continue;
                }
                i += 1;
                while i < bytes.len() && is_space(bytes[i]) {
                    i += 1;
                }
                match bytes.get(i) {
                    Some(&quote @ (b'"' | b'\'')) => {
                        i += 1;
                        i += bytes[i..]
                            .iter()
                            .position(|&b| b == quote)
                            .map_or(bytes.len() - i, |p| p + 1);
                    }
                    _ => {
                        while i < bytes.len() && !is_space(bytes[i]) && bytes[i] != b'>' {
                            i += 1;
                        }
                    }
                }
            }
        }
    }
    names
}
