//! Input selection: `--all` discovery under a root, or command-line files.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::paths;
use crate::types::CheckKind;

/// Recursively collect every file of `kind` under `dir`, in file-name order.
/// Applies the config's exclude prefixes (relative to `root`).
/// A missing directory yields no files.
pub fn discover_all(root: &Path, dir: &Path, kind: CheckKind, config: &Config) -> Vec<PathBuf> {
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "discovery root does not exist");
        return Vec::new();
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_str().is_some_and(|name| kind.matches_file_name(name)))
    {
        let relative = paths::display_relative(root, entry.path());
        if !config.should_scan(&relative) {
            tracing::debug!(file = %relative, "excluded by config");
            continue;
        }
        files.push(entry.into_path());
    }
    files
}

/// Turn command-line file arguments into absolute paths, keeping their order.
/// Missing files are kept; the driver reports them.
pub fn from_args(cwd: &Path, files: &[PathBuf]) -> Vec<PathBuf> {
    files.iter().map(|f| paths::absolutize(cwd, f)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn finds_markdown_recursively_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let spec = root.join("specification");
        touch(&spec.join("b.md"));
        touch(&spec.join("a.md"));
        touch(&spec.join("sub/c.md"));
        touch(&spec.join("notes.txt"));

        let found = discover_all(&root, &spec, CheckKind::Links, &Config::default());
        let names: Vec<String> = found.iter().map(|p| paths::display_relative(&root, p)).collect();
        assert_eq!(names, vec!["specification/a.md", "specification/b.md", "specification/sub/c.md"]);
    }

    #[test]
    fn schemas_need_full_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let schema = root.join("specification/schema");
        touch(&schema.join("task.schema.json"));
        touch(&schema.join("plain.json"));

        let found = discover_all(&root, &schema, CheckKind::Schemas, &Config::default());
        assert_eq!(found, vec![schema.join("task.schema.json")]);
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let found = discover_all(dir.path(), &dir.path().join("nope"), CheckKind::Links, &Config::default());
        assert!(found.is_empty());
    }

    #[test]
    fn args_are_made_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let files = from_args(dir.path(), &[PathBuf::from("./x/../missing.md")]);
        assert_eq!(files, vec![dir.path().join("missing.md")]);
    }
}
