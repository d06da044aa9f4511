//! `figure > table` → `figure > div.table-wrapper > table`, so wide tables
//! scroll horizontally instead of overflowing into the margin.

use super::TABLE_WRAPPER;
use crate::dom::{Document, Element, Node, find_all_paths};
use crate::pipeline::{Transform, TransformError};

pub struct TableWrappers;

impl Transform for TableWrappers {
    fn name(&self) -> &'static str {
        "table-wrappers"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), TransformError> {
        let is_figure = |e: &Element| e.is("figure");
        for path in find_all_paths(&doc.root, &is_figure) {
            let Some(figure) = doc.root.at_path_mut(&path) else {
                continue;
            };
            for child in &mut figure.children {
                if child.is_tag("table") {
                    let table = std::mem::replace(child, Node::text(""));
                    let wrapper = Element::new("div")
                        .with_attr("class", TABLE_WRAPPER)
                        .with_child(table);
                    *child = Node::element(wrapper);
                }
            }
        }
        Ok(())
    }
}
