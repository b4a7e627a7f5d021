//! Publishing of the bundled stylesheets and scripts.
//!
//! Files land in `{target}/backoffice/` so they never collide with the host
//! application's own assets.

use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

const NAMESPACE: &str = "backoffice";

/// Root of the bundled `assets/` tree.
pub fn bundled_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}

/// Copies `assets/css/*.css`; returns how many files were written.
pub fn copy_styles(target_dir: &Path) -> Result<usize> {
    publish(&bundled_dir().join("css"), target_dir, "css")
}

/// Copies `assets/js/*.js`; returns how many files were written.
pub fn copy_static_assets(target_dir: &Path) -> Result<usize> {
    publish(&bundled_dir().join("js"), target_dir, "js")
}

fn publish(src_dir: &Path, target_dir: &Path, extension: &str) -> Result<usize> {
    let dst_dir = target_dir.join(NAMESPACE);
    let copied = copy_dir_files(src_dir, &dst_dir, extension)?;
    if copied == 0 {
        tracing::info!("no .{} files found in {}", extension, src_dir.display());
    } else {
        tracing::info!("📦 copied {} .{} files to {}", copied, extension, dst_dir.display());
    }
    Ok(copied)
}

/// Copies every file in `src_dir` with the given extension into `dst_dir`.
/// A missing source directory counts as empty; unreadable files are skipped.
pub fn copy_dir_files(src_dir: &Path, dst_dir: &Path, extension: &str) -> Result<usize> {
    fs::create_dir_all(dst_dir)?;

    let entries = match fs::read_dir(src_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut sources: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == extension))
        .collect();
    sources.sort();

    let mut copied = 0;
    for src in sources {
        let Some(name) = src.file_name() else { continue };
        let data = match fs::read(&src) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", src.display(), e);
                continue;
            }
        };
        fs::write(dst_dir.join(name), data)?;
        copied += 1;
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_filters_by_extension() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::write(src.path().join("table.css"), "a{}").unwrap();
        fs::write(src.path().join("drawer.css"), "b{}").unwrap();
        fs::write(src.path().join("notes.txt"), "skip").unwrap();

        let copied = copy_dir_files(src.path(), &dst.path().join(NAMESPACE), "css").unwrap();
        assert_eq!(copied, 2);
        assert!(dst.path().join("backoffice/table.css").exists());
        assert!(!dst.path().join("backoffice/notes.txt").exists());
    }

    #[test]
    fn test_missing_source_is_noop() {
        let dst = TempDir::new().unwrap();
        let copied = publish(&dst.path().join("nowhere"), dst.path(), "js").unwrap();
        assert_eq!(copied, 0);
    }

    #[test]
    fn test_bundled_assets_published() {
        let dst = TempDir::new().unwrap();
        assert!(copy_styles(dst.path()).unwrap() > 0);
        assert!(copy_static_assets(dst.path()).unwrap() > 0);
        assert!(dst.path().join("backoffice/backoffice-table.css").exists());
    }
}
