//! Predicate queries over the tree.
//!
//! Results are child-index paths from the queried element. A path is only
//! valid until the next mutation of any ancestor's child list, so callers
//! query, mutate once, and query again.

use super::{Element, Node};

/// Child indices leading from an ancestor to a descendant element.
pub type Path = Vec<usize>;

/// First descendant (pre-order, document order) matching `pred`.
pub fn find_path(root: &Element, pred: &impl Fn(&Element) -> bool) -> Option<Path> {
    let mut path = Vec::new();
    find_in(root, pred, &mut path).then_some(path)
}

fn find_in(el: &Element, pred: &impl Fn(&Element) -> bool, path: &mut Path) -> bool {
    for (i, child) in el.children.iter().enumerate() {
        let Node::Element(child) = child else {
            continue;
        };
        path.push(i);
        if pred(child) || find_in(child, pred, path) {
            return true;
        }
        path.pop();
    }
    false
}

/// All descendants matching `pred`, in document order.
///
/// Matches nested inside other matches are included. Paths that share a
/// parent are listed in increasing index order, so callers that remove or
/// insert siblings should walk the list in reverse.
pub fn find_all_paths(root: &Element, pred: &impl Fn(&Element) -> bool) -> Vec<Path> {
    let mut out = Vec::new();
    let mut path = Vec::new();
    collect_in(root, pred, &mut path, &mut out);
    out
}

fn collect_in(
    el: &Element,
    pred: &impl Fn(&Element) -> bool,
    path: &mut Path,
    out: &mut Vec<Path>,
) {
    for (i, child) in el.children.iter().enumerate() {
        let Node::Element(child) = child else {
            continue;
        };
        path.push(i);
        if pred(child) {
            out.push(path.clone());
        }
        collect_in(child, pred, path, out);
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse;

    #[test]
    fn test_find_path_document_order() {
        let doc = parse("<div><p><span>a</span></p></div><span>b</span>").unwrap();
        let path = find_path(&doc.root, &|e| e.is("span")).unwrap();

        assert_eq!(path, vec![0, 0, 0]);
        assert_eq!(doc.root.at_path(&path).unwrap().text_content(), "a");
    }

    #[test]
    fn test_find_path_none() {
        let doc = parse("<p>text</p>").unwrap();
        assert!(find_path(&doc.root, &|e| e.is("table")).is_none());
    }

    #[test]
    fn test_find_all_paths_includes_nested() {
        let doc = parse("<figure><figure></figure></figure><p></p><figure></figure>").unwrap();
        let paths = find_all_paths(&doc.root, &|e| e.is("figure"));
        assert_eq!(paths, vec![vec![0], vec![0, 0], vec![2]]);
    }
}
