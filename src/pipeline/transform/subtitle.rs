//! Subtitle normalizer.
//!
//! The converter only wraps headings in sections, so a subtitle is authored
//! as a heading with class `subtitle`:
//!
//! ```text
//! <section class="level2 subtitle"><h2>By Someone</h2>…</section>
//!   ↓
//! <p class="subtitle">By Someone</p><section class="level2">…</section>
//! ```

use super::{SUBTITLE, parent_mut};
use crate::dom::{Document, Element, Node, find_path};
use crate::pipeline::{Transform, TransformError};

/// Relabels the first subtitle heading and lifts it out of its section.
pub struct SubtitleNormalizer;

impl Transform for SubtitleNormalizer {
    fn name(&self) -> &'static str {
        "subtitle"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), TransformError> {
        let is_subtitle = |e: &Element| e.is("section") && e.has_class(SUBTITLE);
        let Some(path) = find_path(&doc.root, &is_subtitle) else {
            return Ok(());
        };
        let Some((parent, index)) = parent_mut(&mut doc.root, &path) else {
            return Ok(());
        };
        let Some(section) = parent.children[index].as_element_mut() else {
            return Ok(());
        };

        let heading = take_heading(section)?;
        section.attrs.remove_class(SUBTITLE);
        parent.children.insert(index, Node::element(heading));
        Ok(())
    }
}

/// Remove the section's first element child, which must be a heading, and
/// return it relabeled as `p.subtitle`.
fn take_heading(section: &mut Element) -> Result<Element, TransformError> {
    let Some(heading_index) = section.first_element_index() else {
        return Err(TransformError::MalformedSubtitle { found: None });
    };
    if let Some(first) = section.children[heading_index].as_element()
        && !first.is_heading()
    {
        return Err(TransformError::MalformedSubtitle {
            found: Some(first.tag.clone()),
        });
    }

    let mut heading = section
        .children
        .remove(heading_index)
        .into_element()
        .ok_or(TransformError::MalformedSubtitle { found: None })?;
    heading.tag = "p".to_string();
    heading.attrs.set("class", SUBTITLE);
    Ok(heading)
}
