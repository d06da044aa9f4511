//! Owned, mutable HTML document tree.
//!
//! The post-processing passes work on this tree rather than on text:
//!
//! ```text
//! html text ──parse──► Document ──passes──► Document ──render──► html text
//! ```
//!
//! - `parse`: builds the tree from converter output (via `tl`)
//! - `render`: serializes the tree back to HTML
//! - `query`: predicate-based lookups returning child-index paths
//!
//! Nodes are owned by their parent's `children` vector, so moving a node is
//! a `remove` from one vector and an `insert` into another. Positions go
//! stale after any mutation; passes always re-query instead of caching them.

mod attrs;
mod parse;
mod query;
mod render;

pub use attrs::Attrs;
pub use parse::{ParseError, parse};
pub use query::{find_all_paths, find_path};
pub use render::render;

/// Tag name of the synthetic element that holds a document's top-level nodes.
pub const ROOT_TAG: &str = "#document";

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

// =============================================================================
// Document
// =============================================================================

/// A parsed page.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// `<!DOCTYPE ...>` declaration, kept verbatim.
    pub doctype: Option<String>,
    /// Synthetic root; its children are the page's top-level nodes.
    pub root: Element,
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        let mut root = Element::new(ROOT_TAG);
        root.children = children;
        Self {
            doctype: None,
            root,
        }
    }

    /// Count elements matching `pred` anywhere in the document.
    pub fn count(&self, pred: impl Fn(&Element) -> bool) -> usize {
        find_all_paths(&self.root, &pred).len()
    }
}

// =============================================================================
// Node
// =============================================================================

/// A child of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Box<Element>),
    Text(Text),
    Comment(String),
}

impl Node {
    /// Shorthand for a boxed element node.
    pub fn element(element: Element) -> Self {
        Self::Element(Box::new(element))
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(Text::new(content))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Consume the node, yielding the element if it is one.
    pub fn into_element(self) -> Option<Element> {
        match self {
            Self::Element(e) => Some(*e),
            _ => None,
        }
    }

    /// Whitespace-only text or a comment: nodes that carry no visible content.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(t) => t.is_whitespace(),
            Self::Comment(_) => true,
            Self::Element(_) => false,
        }
    }

    /// Whitespace-only text (comments are not whitespace).
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Self::Text(t) if t.is_whitespace())
    }

    /// Element with the given tag.
    pub fn is_tag(&self, tag: &str) -> bool {
        self.as_element().is_some_and(|e| e.tag == tag)
    }
}

// =============================================================================
// Text
// =============================================================================

/// Character data, stored in its source (already escaped) form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text(String);

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_whitespace(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Copy with trailing whitespace removed.
    pub fn trimmed_end(&self) -> Self {
        Self(self.0.trim_end().to_string())
    }
}

// =============================================================================
// Element
// =============================================================================

/// An element: tag, ordered attributes, ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Attrs,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Attrs::new(),
            children: Vec::new(),
        }
    }

    /// Builder: set an attribute.
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.set(name, value);
        self
    }

    /// Builder: append a child node.
    pub fn with_child(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    pub fn is_heading(&self) -> bool {
        HEADINGS.contains(&self.tag.as_str())
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attrs.has_class(class)
    }

    /// Element children only, in order.
    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Index of the first element child.
    pub fn first_element_index(&self) -> Option<usize> {
        self.children
            .iter()
            .position(|n| matches!(n, Node::Element(_)))
    }

    /// Index of the last child that is not blank (whitespace text or comment).
    pub fn last_content_index(&self) -> Option<usize> {
        self.children.iter().rposition(|n| !n.is_blank())
    }

    /// Next sibling after `index` that is not blank.
    pub fn next_content_index(&self, index: usize) -> Option<usize> {
        self.children
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, n)| !n.is_blank())
            .map(|(i, _)| i)
    }

    /// Non-blank children, in order.
    pub fn content_children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(|n| !n.is_blank())
    }

    /// Drop whitespace at the end of the child list: whitespace-only text
    /// nodes are removed, a trailing text node is right-trimmed.
    pub fn trim_end(&mut self) {
        while self.children.last().is_some_and(Node::is_whitespace) {
            self.children.pop();
        }
        if let Some(Node::Text(text)) = self.children.last_mut() {
            *text = text.trimmed_end();
        }
    }

    /// No children other than whitespace and comments.
    pub fn is_empty(&self) -> bool {
        self.children.iter().all(Node::is_blank)
    }

    /// Resolve a child-index path to a descendant.
    pub fn at_path(&self, path: &[usize]) -> Option<&Element> {
        path.iter().try_fold(self, |el, &i| el.children.get(i)?.as_element())
    }

    /// Mutable variant of [`Element::at_path`].
    pub fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut el = self;
        for &i in path {
            el = el.children.get_mut(i)?.as_element_mut()?;
        }
        Some(el)
    }

    /// Concatenated text of all descendants.
    #[cfg(test)]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    #[cfg(test)]
    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t.as_str()),
                Node::Element(e) => e.collect_text(out),
                Node::Comment(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(children: Vec<Node>) -> Element {
        let mut p = Element::new("p");
        p.children = children;
        p
    }

    #[test]
    fn test_trim_end_removes_whitespace_tail() {
        let mut p = para(vec![Node::text("Quote text "), Node::text("\n  ")]);
        p.trim_end();
        assert_eq!(p.children, vec![Node::text("Quote text")]);
    }

    #[test]
    fn test_last_content_index_skips_blank() {
        let p = para(vec![
            Node::text("a"),
            Node::element(Element::new("span")),
            Node::text("\n"),
            Node::Comment(" note ".into()),
        ]);
        assert_eq!(p.last_content_index(), Some(1));
    }

    #[test]
    fn test_next_content_index() {
        let p = para(vec![
            Node::element(Element::new("table")),
            Node::text("\n"),
            Node::element(Element::new("span")),
        ]);
        assert_eq!(p.next_content_index(0), Some(2));
        assert_eq!(p.next_content_index(2), None);
    }

    #[test]
    fn test_at_path() {
        let inner = Element::new("em").with_child(Node::text("x"));
        let p = para(vec![Node::text("a"), Node::element(inner)]);
        let root = Element::new(ROOT_TAG).with_child(Node::element(p));

        assert_eq!(root.at_path(&[0, 1]).map(|e| e.tag.as_str()), Some("em"));
        assert!(root.at_path(&[0, 0]).is_none(), "text is not an element");
        assert_eq!(root.text_content(), "ax");
    }

    #[test]
    fn test_is_heading() {
        assert!(Element::new("h2").is_heading());
        assert!(!Element::new("header").is_heading());
    }
}
