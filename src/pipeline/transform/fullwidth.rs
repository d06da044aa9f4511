//! Full-width table marker.
//!
//! Authoring convention: an empty `[]{.fullwidth}` span right after a table
//! asks for the table to span the whole page instead of the text column.

use super::{FULLWIDTH, is_marker, is_marker_node, parent_mut, sole_content_element};
use crate::dom::{Document, Element, find_all_paths};
use crate::pipeline::{Transform, TransformError};

pub struct FullwidthTables;

impl Transform for FullwidthTables {
    fn name(&self) -> &'static str {
        "fullwidth-tables"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), TransformError> {
        let is_table = |e: &Element| e.is("table");
        for path in find_all_paths(&doc.root, &is_table).into_iter().rev() {
            let Some((parent, index)) = parent_mut(&mut doc.root, &path) else {
                continue;
            };
            let Some(marker_index) = parent
                .next_content_index(index)
                .filter(|&i| is_fullwidth_marker(parent, i))
            else {
                continue;
            };

            parent.children.remove(marker_index);
            if let Some(table) = parent.children[index].as_element_mut() {
                table.attrs.add_class(FULLWIDTH);
                table.attrs.remove("style");
            }
        }
        Ok(())
    }
}

/// `span.fullwidth`, or a paragraph holding nothing but one.
fn is_fullwidth_marker(parent: &Element, index: usize) -> bool {
    let node = &parent.children[index];
    if is_marker_node(node, FULLWIDTH) {
        return true;
    }
    node.as_element()
        .filter(|e| e.is("p"))
        .and_then(sole_content_element)
        .is_some_and(|e| is_marker(e, FULLWIDTH))
}
