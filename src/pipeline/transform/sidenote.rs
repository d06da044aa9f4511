//! Footnote → sidenote converter.
//!
//! The converter collects footnotes at the end of the page. Tufte CSS wants
//! them in the margin, next to the sentence that references them:
//!
//! ```text
//! <p>Text<a href="#fn1" class="footnoteRef" id="fnref1"><sup>1</sup></a></p>
//! …
//! <section class="footnotes"><ol><li id="fn1"><p>Note.<a href="#fnref1">↩</a></p></li></ol></section>
//!   ↓
//! <p>Text<label for="sidenote-1" class="margin-toggle sidenote-number"></label>
//!    <input type="checkbox" id="sidenote-1" class="margin-toggle">
//!    <span class="sidenote">Note.</span></p>
//! ```
//!
//! A reference followed directly by `span.unnumbered` becomes a margin note
//! (no number, `⊕` toggle) and the marker span is dropped.

use super::{
    FOOTNOTES, MARGIN_TOGGLE, UNNUMBERED, detach, is_footnote_ref, is_marker_node, parent_mut,
};
use crate::debug;
use crate::dom::{Document, Element, Node, find_path};
use crate::pipeline::{Transform, TransformError};

/// Toggle glyph shown for unnumbered margin notes.
const MARGIN_NOTE_SYMBOL: &str = "⊕";

pub struct SidenoteConverter;

impl Transform for SidenoteConverter {
    fn name(&self) -> &'static str {
        "sidenotes"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), TransformError> {
        let Some(container) = take_container(doc)? else {
            return Ok(());
        };
        let notes = collect_notes(container)?;
        debug!("sidenotes"; "converting {} notes", notes.len());

        for (i, content) in notes.into_iter().enumerate() {
            attach_note(doc, i + 1, content)?;
        }
        reject_orphan_refs(doc)
    }
}

// =============================================================================
// Footnotes container
// =============================================================================

/// Detach the footnotes container. `None` means there is nothing to convert.
fn take_container(doc: &mut Document) -> Result<Option<Element>, TransformError> {
    let is_container = |e: &Element| e.has_class(FOOTNOTES);
    if let Some(path) = find_path(&doc.root, &is_container) {
        return Ok(detach(&mut doc.root, &path));
    }

    if doc.count(is_footnote_ref) > 0 {
        return Err(TransformError::MissingFootnotes);
    }
    if doc.count(|e| e.is("input") && e.has_class(MARGIN_TOGGLE)) > 0 {
        return Err(TransformError::AlreadyTransformed);
    }
    Ok(None)
}

/// Content of every entry in the container's first list, in order.
fn collect_notes(container: Element) -> Result<Vec<Vec<Node>>, TransformError> {
    let Some(path) = find_path(&container, &|e: &Element| e.is("ol")) else {
        return Ok(Vec::new());
    };
    let Some(list) = container.at_path(&path) else {
        return Ok(Vec::new());
    };

    let mut notes = Vec::new();
    for entry in list.element_children().filter(|e| e.is("li")) {
        let expected = notes.len() + 1;
        if entry_number(entry) != Some(expected) {
            return Err(TransformError::FootnoteSequenceGap {
                expected,
                found: entry.attr("id").map(str::to_string),
            });
        }
        notes.push(note_content(entry.clone(), expected)?);
    }
    Ok(notes)
}

/// `N` from an entry id of the form `fn<N>`.
fn entry_number(entry: &Element) -> Option<usize> {
    entry.attr("id")?.strip_prefix("fn")?.parse().ok()
}

/// Entry content without the trailing back-reference link.
fn note_content(mut entry: Element, index: usize) -> Result<Vec<Node>, TransformError> {
    let malformed = |reason| TransformError::MalformedFootnote { index, reason };

    entry.trim_end();
    let leading = entry
        .children
        .iter()
        .take_while(|n| n.is_whitespace())
        .count();
    entry.children.drain(..leading);

    let drop_last = match entry.children.last_mut() {
        None => return Err(malformed("empty entry")),
        Some(Node::Element(anchor)) if anchor.is("a") => true,
        Some(Node::Element(block)) => {
            let Some(anchor_index) = block
                .last_content_index()
                .filter(|&i| block.children[i].is_tag("a"))
            else {
                return Err(malformed("no back-reference"));
            };
            block.children.remove(anchor_index);
            block.trim_end();
            block.is_empty()
        }
        Some(_) => return Err(malformed("no back-reference")),
    };
    if drop_last {
        entry.children.pop();
        entry.trim_end();
    }

    if entry.is_empty() {
        return Err(malformed("empty entry"));
    }

    let single_paragraph = {
        let mut content = entry.content_children();
        matches!((content.next(), content.next()), (Some(only), None) if only.is_tag("p"))
    };
    if single_paragraph {
        let paragraph = entry
            .children
            .into_iter()
            .find_map(|n| n.into_element().filter(|e| e.is("p")));
        return Ok(paragraph.map(|p| p.children).unwrap_or_default());
    }
    Ok(entry.children)
}

// =============================================================================
// Placement
// =============================================================================

/// Replace the reference anchor of note `index` with toggle, checkbox and
/// note span.
fn attach_note(doc: &mut Document, index: usize, content: Vec<Node>) -> Result<(), TransformError> {
    let href = format!("#fn{index}");
    let id = format!("fnref{index}");
    let is_ref = |e: &Element| {
        is_footnote_ref(e) && e.attr("href") == Some(href.as_str()) && e.attr("id") == Some(id.as_str())
    };

    let (parent, anchor) = find_path(&doc.root, &is_ref)
        .and_then(|path| parent_mut(&mut doc.root, &path))
        .ok_or(TransformError::MissingFootnoteRef { index })?;

    let margin_note = parent
        .children
        .get(anchor + 1)
        .is_some_and(|n| is_marker_node(n, UNNUMBERED));
    if margin_note {
        parent.children.remove(anchor + 1);
    }

    parent
        .children
        .splice(anchor..=anchor, note_nodes(index, margin_note, content));
    Ok(())
}

/// Every reference anchor must have been replaced by now; a leftover one
/// would point at the removed container.
fn reject_orphan_refs(doc: &Document) -> Result<(), TransformError> {
    let Some(anchor) = find_path(&doc.root, &is_footnote_ref).and_then(|p| doc.root.at_path(&p))
    else {
        return Ok(());
    };
    Err(TransformError::OrphanFootnoteRef {
        href: anchor.attr("href").unwrap_or_default().to_string(),
    })
}

fn note_nodes(index: usize, margin_note: bool, content: Vec<Node>) -> [Node; 3] {
    let target = format!("sidenote-{index}");

    let (label, note_class) = if margin_note {
        let label = Element::new("label")
            .with_attr("for", &target)
            .with_attr("class", MARGIN_TOGGLE)
            .with_child(Node::text(MARGIN_NOTE_SYMBOL));
        (label, "marginnote")
    } else {
        let label = Element::new("label")
            .with_attr("for", &target)
            .with_attr("class", format!("{MARGIN_TOGGLE} sidenote-number"));
        (label, "sidenote")
    };

    let input = Element::new("input")
        .with_attr("type", "checkbox")
        .with_attr("id", target)
        .with_attr("class", MARGIN_TOGGLE);

    let mut note = Element::new("span").with_attr("class", note_class);
    note.children = content;

    [Node::element(label), Node::element(input), Node::element(note)]
}
