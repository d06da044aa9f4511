//! Transform chain faults.
//!
//! Every variant means the converter output did not have the shape the
//! passes rely on. They are fatal for the page being processed.

use thiserror::Error;

use crate::dom::ParseError;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A `section.subtitle` whose first element child is not `h1`..`h6`.
    #[error("subtitle section must wrap a heading, found {}", describe(.found, "no element", |t| format!("<{t}>")))]
    MalformedSubtitle { found: Option<String> },

    /// Footnote entries are not numbered `fn1`, `fn2`, ... in order.
    #[error("footnote entry {expected} expected id `fn{expected}`, found {}", describe(.found, "no id", |id| format!("`{id}`")))]
    FootnoteSequenceGap {
        expected: usize,
        found: Option<String>,
    },

    /// A footnote entry without the trailing back-reference anchor.
    #[error("footnote {index} is malformed: {reason}")]
    MalformedFootnote { index: usize, reason: &'static str },

    /// Reference anchors exist but there is no footnotes container.
    #[error("page has footnote references but no `footnotes` container")]
    MissingFootnotes,

    /// No in-text anchor `a.footnoteRef#fnref<N>` for footnote N.
    #[error("no reference anchor found for footnote {index}")]
    MissingFootnoteRef { index: usize },

    /// A reference anchor left over after every entry was placed.
    #[error("footnote reference `{href}` has no matching footnote entry")]
    OrphanFootnoteRef { href: String },

    /// The page already carries generated sidenote markup.
    #[error("page was already post-processed (margin toggles present, no footnotes container)")]
    AlreadyTransformed,
}

fn describe(value: &Option<String>, missing: &str, present: impl Fn(&str) -> String) -> String {
    value.as_deref().map_or_else(|| missing.to_string(), present)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TransformError::MalformedSubtitle {
            found: Some("div".into()),
        };
        assert_eq!(err.to_string(), "subtitle section must wrap a heading, found <div>");

        let err = TransformError::FootnoteSequenceGap {
            expected: 2,
            found: Some("fn3".into()),
        };
        assert_eq!(err.to_string(), "footnote entry 2 expected id `fn2`, found `fn3`");

        let err = TransformError::FootnoteSequenceGap {
            expected: 1,
            found: None,
        };
        assert!(err.to_string().ends_with("found no id"));

        let err = TransformError::OrphanFootnoteRef { href: "#fn2".into() };
        assert_eq!(
            err.to_string(),
            "footnote reference `#fn2` has no matching footnote entry"
        );
    }
}
