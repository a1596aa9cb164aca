// Mapping between filesystem paths and dotted Python module names

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Stem of the file that marks a directory as a package
pub const PACKAGE_MARKER: &str = "__init__";

/// Extension of Python source files
pub const SOURCE_EXTENSION: &str = "py";

/// Make a path absolute against the current directory without touching the filesystem.
///
/// `.` and `..` are resolved lexically, so symlinks along the path are kept
/// as given and `pkg/sub/..` names `pkg`.
pub fn absolute(path: &Path) -> PathBuf {
    let joined = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if normalized.file_name().is_some() {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Check if a directory exists and directly contains `__init__.py`
pub fn is_package_directory(path: &Path) -> bool {
    path.is_dir()
        && path
            .join(format!("{}.{}", PACKAGE_MARKER, SOURCE_EXTENSION))
            .is_file()
}

/// Convert a file path to a dotted module name relative to `root`.
///
/// Package markers vanish from the name, so `root/pkg/__init__.py` is `pkg`
/// and `root/__init__.py` is the empty string. Files outside `root` fall back
/// to a literal string-prefix strip, and failing that to every component of
/// the absolute path.
pub fn module_name_from_path(root: &Path, file_path: &Path) -> String {
    let parts: Vec<String> = match file_path.strip_prefix(root) {
        Ok(relative) => normal_components(relative),
        Err(_) => fallback_components(root, file_path),
    };

    let last = parts.len().saturating_sub(1);
    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            if i == last {
                strip_extension(part)
            } else {
                part.as_str()
            }
        })
        .filter(|part| *part != PACKAGE_MARKER && !part.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

fn normal_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect()
}

/// Best-effort relative path for files that are not under `root`.
///
/// A sibling sharing a textual prefix with the root (`/a/pkg` vs `/a/pkg2`)
/// is stripped literally; this matches the historical behaviour.
fn fallback_components(root: &Path, file_path: &Path) -> Vec<String> {
    let root_text = root.to_string_lossy();
    let file_text = file_path.to_string_lossy();
    match file_text.strip_prefix(root_text.as_ref()) {
        Some(rest) if !root_text.is_empty() => rest
            .split(['/', '\\'])
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => normal_components(file_path),
    }
}

fn strip_extension(name: &str) -> &str {
    name.strip_suffix(SOURCE_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .unwrap_or(name)
}

/// Discover top-level package names under `root`.
///
/// The root's own name comes first when the root is itself a package,
/// followed by every immediate child directory that is a package, sorted by
/// name. Duplicates are dropped keeping the first occurrence. A missing or
/// unreadable root yields an empty list.
pub fn discover_roots(root: &Path) -> Vec<String> {
    let mut roots = Vec::new();

    if is_package_directory(root) {
        if let Some(name) = root.file_name() {
            roots.push(name.to_string_lossy().to_string());
        }
    }

    if let Ok(entries) = std::fs::read_dir(root) {
        let mut children: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| is_package_directory(p))
            .collect();
        children.sort();
        roots.extend(
            children
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string()),
        );
    }

    let mut seen = HashSet::new();
    roots.retain(|r| seen.insert(r.clone()));
    roots
}
