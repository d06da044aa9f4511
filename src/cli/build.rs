//! Site building orchestration.
//!
//! Build pipeline phases:
//! - **Init** - Resolve the converter, reset the output directory
//! - **Assets** - Place asset directories (symlink or copy per target)
//! - **Fragments** - Render include templates into the staging directory
//! - **Collect** - Split content into pages and mirrored files
//! - **Convert** - Parallel per-page convert → transform → write
//! - **Finalize** - Remove staging, report failures
//!
//! Every build is a full rebuild. Pages share nothing but read-only state,
//! so one failing page does not stop the others; the build fails at the end.

use anyhow::{Context, Result, anyhow, bail};
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    config::{FragmentSlot, SiteConfig, Target},
    convert::Converter,
    debug, log,
    logger::ProgressLine,
    pipeline::TransformChain,
    template::{Template, TemplateContext},
    utils::{
        fs::{collect_all_files, copy_file, place_dir, prepare_dir},
        path::{is_markdown, mirror_path, page_output_path},
        plural_count,
    },
};

/// Staging directory inside the output, removed when the build ends.
pub const STAGING_DIR: &str = ".tufted";

/// Content files split by how they reach the output.
struct BuildFiles {
    pages: Vec<PathBuf>,
    files: Vec<PathBuf>,
}

/// Build the entire site for `target`.
///
/// Pipeline: init -> assets -> fragments -> collect -> convert -> finalize
pub fn build_site(config: &SiteConfig, target: &Target) -> Result<()> {
    log!("build"; "target {} ({})", target.kind, target.base_url);

    // Init: fail on a missing converter before touching the output
    let converter = Converter::new(config, target)?;
    let output = &config.build.output;
    prepare_dir(output, config.build.clean)?;

    place_assets(config, target)?;

    let staging = output.join(STAGING_DIR);
    prepare_dir(&staging, true)?;
    let converter = render_fragments(config, target, &staging)?
        .into_iter()
        .fold(converter, |conv, (slot, path)| conv.include(slot, path));

    let files = collect_build_files(&config.build.content);
    let chain = TransformChain::standard();
    debug!("build"; "passes: {}", chain.names().join(" → "));

    let progress = ProgressLine::new(
        "build",
        &[("pages", files.pages.len()), ("files", files.files.len())],
    );
    let (page_results, file_result) = rayon::join(
        || convert_pages(config, &converter, &chain, &staging, &files.pages, &progress),
        || mirror_files(config, &files.files, &progress),
    );
    progress.finish();

    fs::remove_dir_all(&staging)
        .with_context(|| format!("Failed to remove staging directory {}", staging.display()))?;

    let copied = file_result?;
    let failed = page_results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        bail!("{} failed", plural_count(failed, "page"));
    }

    log!(
        "done";
        "{}, {} in {}",
        plural_count(page_results.len(), "page"),
        plural_count(copied, "file"),
        config.root_relative(output).display()
    );
    Ok(())
}

// ============================================================================
// Phases
// ============================================================================

/// Place every asset directory at `output/<name>`.
fn place_assets(config: &SiteConfig, target: &Target) -> Result<()> {
    for asset in &config.build.assets {
        let name = asset
            .file_name()
            .ok_or_else(|| anyhow!("asset path has no name: {}", asset.display()))?;
        place_dir(asset, &config.build.output.join(name), target.assets)?;
    }
    Ok(())
}

/// Render configured fragments into `staging`, one file per slot.
fn render_fragments(
    config: &SiteConfig,
    target: &Target,
    staging: &Path,
) -> Result<Vec<(FragmentSlot, PathBuf)>> {
    let ctx = TemplateContext::for_build(config, target);
    let mut rendered_paths = Vec::new();
    for (slot, source) in config.build.fragments.iter() {
        let rendered = Template::load(source)?.render(&ctx)?;
        let path = staging.join(slot.file_name());
        fs::write(&path, rendered)
            .with_context(|| format!("Failed to write fragment {}", path.display()))?;
        debug!("fragment"; "{} → {}", config.root_relative(source).display(), slot.flag());
        rendered_paths.push((slot, path));
    }
    Ok(rendered_paths)
}

fn collect_build_files(content: &Path) -> BuildFiles {
    let (pages, files) = collect_all_files(content)
        .into_iter()
        .partition(|p| is_markdown(p));
    BuildFiles { pages, files }
}

/// Convert all pages in parallel; each result is logged as it lands.
fn convert_pages(
    config: &SiteConfig,
    converter: &Converter,
    chain: &TransformChain,
    staging: &Path,
    pages: &[PathBuf],
    progress: &ProgressLine,
) -> Vec<Result<PathBuf>> {
    pages
        .par_iter()
        .enumerate()
        .map(|(index, source)| {
            let scratch = staging.join(format!("page-{index}.html"));
            let result = build_page(config, converter, chain, &scratch, source);
            if let Err(e) = &result {
                log!("error"; "{}: {:#}", config.root_relative(source).display(), e);
            }
            progress.inc("pages");
            result
        })
        .collect()
}

/// Convert one page into `scratch`, rewrite it, then write the final file.
///
/// The final output is only written after every pass succeeded.
fn build_page(
    config: &SiteConfig,
    converter: &Converter,
    chain: &TransformChain,
    scratch: &Path,
    source: &Path,
) -> Result<PathBuf> {
    let output = page_output_path(&config.build.content, &config.build.output, source)
        .ok_or_else(|| anyhow!("page outside content directory: {}", source.display()))?;

    converter.convert(source, scratch)?;
    let html = fs::read_to_string(scratch)
        .with_context(|| format!("Failed to read converter output {}", scratch.display()))?;
    fs::remove_file(scratch).ok();

    let processed = chain.process(&html)?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(&output, processed)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    debug!("page"; "{}", config.root_relative(&output).display());
    Ok(output)
}

/// Copy non-page content files (images, data) to their mirror location.
fn mirror_files(config: &SiteConfig, files: &[PathBuf], progress: &ProgressLine) -> Result<usize> {
    files.par_iter().try_for_each(|source| {
        let dest = mirror_path(&config.build.content, &config.build.output, source)
            .ok_or_else(|| anyhow!("file outside content directory: {}", source.display()))?;
        copy_file(source, &dest)?;
        progress.inc("files");
        Ok::<_, anyhow::Error>(())
    })?;
    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AssetMode, TargetKind, test_parse_config};
    use tempfile::TempDir;

    /// Site with content under `posts/` and an output dir, paths resolved.
    fn site() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("posts/tufte/images")).unwrap();
        fs::write(root.join("posts/tufte/tufte.md"), "# Tufte").unwrap();
        fs::write(root.join("posts/tufte/images/a.png"), "png").unwrap();
        fs::create_dir_all(root.join("css")).unwrap();
        fs::write(root.join("css/tufte.css"), "body {}").unwrap();
        fs::create_dir_all(root.join("templates")).unwrap();
        fs::write(root.join("templates/tufte.html"), "$body$").unwrap();
        fs::write(
            root.join("templates/header.html"),
            "<link href=\"{{ assets_url }}css/tufte.css\"><!-- {{ site.title }} -->",
        )
        .unwrap();

        let mut config = test_parse_config(
            "[build]\ntemplate = \"templates/tufte.html\"\nassets = [\"css\"]\n[build.fragments]\nheader = \"templates/header.html\"",
        );
        config.build.normalize(root);
        config.root = root.to_path_buf();
        (dir, config)
    }

    #[test]
    fn test_collect_splits_pages_and_files() {
        let (dir, _) = site();
        let files = collect_build_files(&dir.path().join("posts"));
        assert_eq!(files.pages, vec![dir.path().join("posts/tufte/tufte.md")]);
        assert_eq!(files.files, vec![dir.path().join("posts/tufte/images/a.png")]);
    }

    #[test]
    fn test_render_fragments_writes_staging() {
        let (dir, config) = site();
        let target = config.target(TargetKind::Prod);
        let staging = dir.path().join("output").join(STAGING_DIR);
        fs::create_dir_all(&staging).unwrap();

        let fragments = render_fragments(&config, &target, &staging).unwrap();
        assert_eq!(fragments, vec![(FragmentSlot::Header, staging.join("header.html"))]);
        assert_eq!(
            fs::read_to_string(staging.join("header.html")).unwrap(),
            "<link href=\"/css/tufte.css\"><!-- Test -->"
        );
    }

    #[test]
    fn test_place_assets_per_target() {
        let (dir, config) = site();
        let target = Target {
            kind: TargetKind::Prod,
            base_url: "/".into(),
            assets: AssetMode::Copy,
        };
        place_assets(&config, &target).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("output/css/tufte.css")).unwrap(),
            "body {}"
        );
    }

    #[test]
    fn test_mirror_files() {
        let (dir, config) = site();
        let files = collect_build_files(&config.build.content);
        let progress = ProgressLine::new("build", &[("files", files.files.len())]);
        let copied = mirror_files(&config, &files.files, &progress).unwrap();
        progress.finish();

        assert_eq!(copied, 1);
        assert!(dir.path().join("output/posts/tufte/images/a.png").is_file());
    }
}
