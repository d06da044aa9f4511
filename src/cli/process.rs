//! In-place post-processing of already converted HTML files.
//!
//! Each file is read, run through the standard chain and written back. A
//! failing file is left untouched and reported; the others still complete.

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use std::{fs, path::Path, path::PathBuf};

use crate::{log, logger::ProgressLine, pipeline::TransformChain, utils::plural_count};

/// Rewrite every file in `files` with the standard chain.
pub fn process_files(files: &[PathBuf]) -> Result<()> {
    let chain = TransformChain::standard();
    let progress = ProgressLine::new("process", &[("files", files.len())]);

    let failed = files
        .par_iter()
        .filter(|path| {
            let result = process_file(&chain, path);
            progress.inc("files");
            match result {
                Ok(()) => false,
                Err(e) => {
                    log!("error"; "{}: {:#}", path.display(), e);
                    true
                }
            }
        })
        .count();
    progress.finish();

    if failed > 0 {
        bail!("{} of {} failed", plural_count(failed, "file"), files.len());
    }
    log!("done"; "processed {}", plural_count(files.len(), "file"));
    Ok(())
}

/// Rewrite a single file; nothing is written unless every pass succeeds.
pub fn process_file(chain: &TransformChain, path: &Path) -> Result<()> {
    let html =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let processed = chain.process(&html)?;
    fs::write(path, processed).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PAGE: &str = r##"<html><body><article><section><p>Text<a href="#fn1" class="footnoteRef" id="fnref1"><sup>1</sup></a></p></section><section class="footnotes"><hr><ol><li id="fn1"><p>A note.<a href="#fnref1">↩</a></p></li></ol></section></article></body></html>"##;

    #[test]
    fn test_process_file_in_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, PAGE).unwrap();

        process_file(&TransformChain::standard(), &path).unwrap();
        let out = fs::read_to_string(&path).unwrap();
        assert!(out.contains(r#"class="sidenote""#));
        assert!(!out.contains("footnotes"));
    }

    #[test]
    fn test_failed_file_left_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.html");
        // Anchor without a footnotes container
        let broken = r##"<p>x<a href="#fn1" class="footnoteRef" id="fnref1"><sup>1</sup></a></p>"##;
        fs::write(&path, broken).unwrap();

        assert!(process_file(&TransformChain::standard(), &path).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), broken);
    }

    #[test]
    fn test_process_files_counts_failures() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.html");
        fs::write(&good, PAGE).unwrap();
        let missing = dir.path().join("missing.html");

        let err = process_files(&[good.clone(), missing]).unwrap_err();
        assert!(err.to_string().contains("1 file of 2 failed"));
        assert!(fs::read_to_string(&good).unwrap().contains("sidenote"));
    }
}
