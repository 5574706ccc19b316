//! Path helpers: repository root discovery, normalization, and display.

use std::path::{Component, Path, PathBuf};

use crate::config::{CONFIG_FILE, DEFAULT_SPEC_DIR};
use crate::error::Error;

/// Locate the repository root.
///
/// An explicit `--root` wins. Otherwise the nearest ancestor of `start`
/// holding `.speclint.toml` is the root; failing that, the nearest one
/// holding a `specification/` directory.
///
/// # Errors
///
/// Returns `Error::RootInvalid` if the explicit root is not a directory,
/// `Error::RootNotFound` if no ancestor qualifies, or `Error::Io` if
/// canonicalization fails.
pub fn find_root(explicit: Option<&Path>, start: &Path) -> Result<PathBuf, Error> {
    if let Some(root) = explicit {
        if !root.is_dir() {
            return Err(Error::RootInvalid { path: root.to_path_buf() });
        }
        return Ok(root.canonicalize()?);
    }

    let start = start.canonicalize()?;
    let found = start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE).is_file())
        .or_else(|| start.ancestors().find(|dir| dir.join(DEFAULT_SPEC_DIR).is_dir()))
        .map(Path::to_path_buf);

    match found {
        Some(dir) => Ok(dir),
        None => Err(Error::RootNotFound {
            start,
            spec_dir: DEFAULT_SPEC_DIR.to_owned(),
        }),
    }
}

/// Collapse `.` and `..` components in a path without touching the filesystem.
/// Preserves leading `..` when there is nothing left to pop.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => match components.last() {
                Some(Component::RootDir | Component::Prefix(_)) => {},
                Some(Component::ParentDir) | None => components.push(component),
                Some(_) => {
                    components.pop();
                },
            },
            other => components.push(other),
        }
    }
    components.iter().collect()
}

/// Resolve `relative` against the directory containing `source`.
///
/// Returns the canonical path when the target exists, or the lexically
/// normalized path (for error messages) when it does not.
pub fn resolve_from_source(source: &Path, relative: &str) -> Result<PathBuf, PathBuf> {
    let source_dir = source.parent().unwrap_or_else(|| Path::new(""));
    let joined = source_dir.join(relative);
    joined.canonicalize().map_err(|_err| normalize_path(&joined))
}

/// Make a command-line path absolute against `cwd`, canonicalizing if it exists.
pub fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    let joined = cwd.join(path);
    joined.canonicalize().unwrap_or_else(|_err| normalize_path(&joined))
}

/// Render `path` relative to `root` when it lies inside, absolute otherwise.
pub fn display_relative(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.display().to_string(),
        _ => path.display().to_string(),
    }
}
