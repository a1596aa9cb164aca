// Source file discovery

use crate::analysis::resolver::{absolute, SOURCE_EXTENSION};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into below the crawl root
pub const IGNORED_DIRS: &[&str] = &[
    "__pycache__",
    ".git",
    ".hg",
    ".svn",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    ".venv",
    "venv",
    "env",
    "build",
    "dist",
];

/// Lazily yield the absolute path of every `.py` file under `root`.
///
/// Entries are visited sorted by file name within each directory, so the
/// sequence is the same on every platform. A missing root yields nothing.
pub fn iter_source_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(absolute(root))
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_ignored_dir(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::trace!("skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_source_file(entry.path()))
        .map(|entry| entry.into_path())
}

fn is_ignored_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| IGNORED_DIRS.contains(&name))
            .unwrap_or(false)
}

fn is_source_file(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == SOURCE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(root: &Path) -> Vec<String> {
        iter_source_files(root)
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_finds_nested_python_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.py"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("b.py"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        assert_eq!(names(dir.path()), vec!["a.py", "sub/b.py"]);
    }

    #[test]
    fn test_paths_are_absolute() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.py"), "").unwrap();

        let files: Vec<PathBuf> = iter_source_files(dir.path()).collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].is_absolute());
    }

    #[test]
    fn test_prunes_ignored_directories() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("main.py"), "").unwrap();
        for ignored in ["__pycache__", ".venv", "build", "dist", ".git"] {
            let sub = dir.path().join(ignored);
            fs::create_dir_all(&sub).unwrap();
            fs::write(sub.join("hidden.py"), "").unwrap();
        }

        assert_eq!(names(dir.path()), vec!["main.py"]);
    }

    #[test]
    fn test_ignored_name_as_file_is_kept() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("pkg");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("build.py"), "").unwrap();

        assert_eq!(names(dir.path()), vec!["pkg/build.py"]);
    }

    #[test]
    fn test_root_with_ignored_name_is_walked() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("build");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("setup_steps.py"), "").unwrap();

        assert_eq!(names(&root), vec!["setup_steps.py"]);
    }

    #[test]
    fn test_directory_named_like_source_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("odd.py")).unwrap();

        assert!(names(dir.path()).is_empty());
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let dir = TempDir::new().unwrap();
        assert_eq!(iter_source_files(&dir.path().join("missing")).count(), 0);
    }

    #[test]
    fn test_order_is_sorted_within_directories() {
        let dir = TempDir::new().unwrap();
        for name in ["zeta.py", "alpha.py", "mid.py"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        assert_eq!(names(dir.path()), vec!["alpha.py", "mid.py", "zeta.py"]);
    }
}
