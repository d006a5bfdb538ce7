//! Parallel, deterministic source file discovery with directory pruning.
//!
//! - Early directory pruning via `WalkDir::filter_entry` (subtree skip)
//! - Parallel extension checks via Rayon's `par_bridge`
//! - Results sorted so runs are reproducible

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::parse::FileKind;

/// Directories never scanned: dependencies, VCS metadata and build output.
const EXCLUDED_DIRS: &[&str] = &["node_modules", ".git", "dist", "build", "target"];

#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

fn is_source_file(path: &Path) -> bool {
    path.is_file() && FileKind::from_path(path).is_some()
}

/// Gathers all `.js`, `.jsx`, `.ts` and `.tsx` files under `root`.
///
/// A `root` that is itself a source file is returned as-is.
pub fn gather_source_files(root: &Path) -> Result<Vec<PathBuf>> {
    gather_source_files_with_excludes(root, &[])
}

/// Like [`gather_source_files`], also pruning directories named in `excludes`.
pub fn gather_source_files_with_excludes(root: &Path, excludes: &[&str]) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(if is_source_file(root) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        });
    }

    let all_excludes: HashSet<&str> = EXCLUDED_DIRS
        .iter()
        .copied()
        .chain(excludes.iter().copied())
        .collect();

    let mut files = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, &all_excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) if is_source_file(e.path()) => Some(Ok(e.into_path())),
            Ok(_) => None,
            Err(e) => Some(Err(e.into())),
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("Failed to gather source files from {}", root.display()))?;

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_project() -> PathBuf {
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir()
            .join("deadbind_scan_tests")
            .join(format!("{}_{}", std::process::id(), id));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        for sub in ["src/components", "node_modules/react", "dist", "vendor"] {
            fs::create_dir_all(dir.join(sub)).unwrap();
        }
        for file in [
            "src/index.ts",
            "src/components/App.tsx",
            "src/legacy.js",
            "src/View.jsx",
            "src/styles.css",
            "node_modules/react/index.js",
            "dist/bundle.js",
            "vendor/lib.js",
        ] {
            fs::write(dir.join(file), "").unwrap();
        }
        dir
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_gather_prunes_default_dirs() {
        let dir = temp_project();
        let files = gather_source_files(&dir).unwrap();
        assert_eq!(
            names(&dir, &files),
            vec![
                "src/View.jsx",
                "src/components/App.tsx",
                "src/index.ts",
                "src/legacy.js",
                "vendor/lib.js",
            ]
        );
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_gather_with_custom_excludes() {
        let dir = temp_project();
        let files = gather_source_files_with_excludes(&dir, &["vendor", "components"]).unwrap();
        assert_eq!(
            names(&dir, &files),
            vec!["src/View.jsx", "src/index.ts", "src/legacy.js"]
        );
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_single_file_root() {
        let dir = temp_project();
        let file = dir.join("src/index.ts");
        assert_eq!(gather_source_files(&file).unwrap(), vec![file.clone()]);
        assert!(gather_source_files(&dir.join("src/styles.css")).unwrap().is_empty());
        fs::remove_dir_all(&dir).ok();
    }
}
