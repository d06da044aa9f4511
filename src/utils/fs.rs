//! Filesystem operations used by the build.

use crate::{config::AssetMode, debug};
use anyhow::{Context, Result};
use jwalk::WalkDir;
use std::{
    fs,
    path::{Path, PathBuf},
};

const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Collect all files from a directory recursively, in path order.
pub fn collect_all_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(|e| e.path())
        .collect();
    files.sort();
    files
}

/// Make `dir` an existing directory; with `clean`, remove whatever was there.
pub fn prepare_dir(dir: &Path, clean: bool) -> Result<()> {
    if clean && dir.exists() {
        fs::remove_dir_all(dir)
            .with_context(|| format!("Failed to clear output directory: {}", dir.display()))?;
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))
}

/// Copy `src` to `dst`, creating parent directories.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::copy(src, dst)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), dst.display()))?;
    Ok(())
}

/// Recursively copy directory contents. Returns the number of files copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize> {
    let files = collect_all_files(src);
    for file in &files {
        let relative = file.strip_prefix(src).unwrap_or(file);
        copy_file(file, &dst.join(relative))?;
    }
    Ok(files.len())
}

/// Place the asset directory `src` at `dst`, replacing anything already there.
pub fn place_dir(src: &Path, dst: &Path, mode: AssetMode) -> Result<()> {
    remove_existing(dst)?;
    match mode {
        AssetMode::Copy => {
            let count = copy_dir_recursive(src, dst)?;
            debug!("assets"; "copied {} ({} files)", src.display(), count);
        }
        AssetMode::Symlink => {
            if let Some(parent) = dst.parent() {
                fs::create_dir_all(parent)?;
            }
            symlink_dir(src, dst).with_context(|| {
                format!("Failed to link {} to {}", dst.display(), src.display())
            })?;
            debug!("assets"; "linked {}", src.display());
        }
    }
    Ok(())
}

/// Remove a file, symlink or directory at `path` if present.
fn remove_existing(path: &Path) -> Result<()> {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return Ok(());
    };
    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
    .with_context(|| format!("Failed to remove {}", path.display()))
}

#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tree(dir: &Path) {
        fs::create_dir_all(dir.join("css/sub")).unwrap();
        fs::write(dir.join("css/tufte.css"), "body {}").unwrap();
        fs::write(dir.join("css/sub/extra.css"), "p {}").unwrap();
        fs::write(dir.join("css/.DS_Store"), "").unwrap();
    }

    #[test]
    fn test_collect_skips_ignored_and_sorts() {
        let dir = TempDir::new().unwrap();
        tree(dir.path());
        let files = collect_all_files(&dir.path().join("css"));
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![PathBuf::from("css/sub/extra.css"), PathBuf::from("css/tufte.css")]
        );
    }

    #[test]
    fn test_prepare_dir_clean() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("output");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("stale.html"), "").unwrap();

        prepare_dir(&out, false).unwrap();
        assert!(out.join("stale.html").exists());

        prepare_dir(&out, true).unwrap();
        assert!(out.is_dir());
        assert!(!out.join("stale.html").exists());
    }

    #[test]
    fn test_place_dir_copy() {
        let dir = TempDir::new().unwrap();
        tree(dir.path());
        let dst = dir.path().join("output/css");

        place_dir(&dir.path().join("css"), &dst, AssetMode::Copy).unwrap();
        assert_eq!(fs::read_to_string(dst.join("tufte.css")).unwrap(), "body {}");
        assert!(dst.join("sub/extra.css").is_file());
        assert!(!fs::symlink_metadata(&dst).unwrap().file_type().is_symlink());
    }

    #[cfg(unix)]
    #[test]
    fn test_place_dir_symlink_replaces_copy() {
        let dir = TempDir::new().unwrap();
        tree(dir.path());
        let src = dir.path().join("css");
        let dst = dir.path().join("output/css");

        place_dir(&src, &dst, AssetMode::Copy).unwrap();
        place_dir(&src, &dst, AssetMode::Symlink).unwrap();

        assert!(fs::symlink_metadata(&dst).unwrap().file_type().is_symlink());
        assert!(dst.join("tufte.css").is_file());
    }
}
