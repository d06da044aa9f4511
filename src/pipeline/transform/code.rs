//! Code listing reformatter: `<pre><code>…</code></pre>` → `<pre class="code">…</pre>`.
//!
//! Only blocks whose single child is a `code` element are touched; raw HTML
//! `pre` blocks written directly in the source keep their shape.

use crate::dom::{Document, Element, Node, find_all_paths};
use crate::pipeline::{Transform, TransformError};

pub struct CodeListings;

fn is_code_listing(el: &Element) -> bool {
    el.is("pre") && matches!(el.children.as_slice(), [only] if only.is_tag("code"))
}

impl Transform for CodeListings {
    fn name(&self) -> &'static str {
        "code-listings"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), TransformError> {
        for path in find_all_paths(&doc.root, &is_code_listing).into_iter().rev() {
            let Some(pre) = doc.root.at_path_mut(&path) else {
                continue;
            };
            let Some(code) = pre.children.pop().and_then(Node::into_element) else {
                continue;
            };
            pre.children = code.children;
            pre.attrs.set("class", "code");
        }
        Ok(())
    }
}
