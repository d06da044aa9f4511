//! Source → output path mapping.
//!
//! The content directory is mirrored under the output directory with its own
//! name kept, so relative links between pages and their images survive:
//!
//! ```text
//! posts/tufte/tufte.md        → output/posts/tufte/tufte.html
//! posts/tufte/images/a.png    → output/posts/tufte/images/a.png
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Source extension of converter input.
pub const MARKDOWN_EXT: &str = "md";

pub fn is_markdown(path: &Path) -> bool {
    path.extension() == Some(OsStr::new(MARKDOWN_EXT))
}

/// Mirror location of `source` (inside `content`) under `output`.
///
/// Returns `None` when `source` is not inside `content`.
pub fn mirror_path(content: &Path, output: &Path, source: &Path) -> Option<PathBuf> {
    let relative = source.strip_prefix(content).ok()?;
    let mut mirrored = output.to_path_buf();
    if let Some(name) = content.file_name() {
        mirrored.push(name);
    }
    mirrored.push(relative);
    Some(mirrored)
}

/// HTML output location of the Markdown page `source`.
pub fn page_output_path(content: &Path, output: &Path, source: &Path) -> Option<PathBuf> {
    mirror_path(content, output, source).map(|p| p.with_extension("html"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_output_path() {
        assert_eq!(
            page_output_path(
                Path::new("/site/posts"),
                Path::new("/site/output"),
                Path::new("/site/posts/tufte/tufte.md")
            ),
            Some(PathBuf::from("/site/output/posts/tufte/tufte.html"))
        );
    }

    #[test]
    fn test_mirror_keeps_extension() {
        assert_eq!(
            mirror_path(
                Path::new("/site/posts"),
                Path::new("/out"),
                Path::new("/site/posts/tufte/images/a.png")
            ),
            Some(PathBuf::from("/out/posts/tufte/images/a.png"))
        );
    }

    #[test]
    fn test_outside_content_is_none() {
        assert!(
            page_output_path(
                Path::new("/site/posts"),
                Path::new("/out"),
                Path::new("/site/other/a.md")
            )
            .is_none()
        );
    }

    #[test]
    fn test_is_markdown() {
        assert!(is_markdown(Path::new("a/b.md")));
        assert!(!is_markdown(Path::new("a/b.markdown.html")));
        assert!(!is_markdown(Path::new("README")));
    }
}
