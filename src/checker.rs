//! Shared driver (discover → extract → resolve → report) and the two checkers plugged into it.

use std::path::{Path, PathBuf};

use crate::error::Problem;
use crate::markdown::{self, AnchorCache};
use crate::paths;
use crate::report::{Failure, Report};
use crate::schema;
use crate::types::{CheckKind, Reference, Target};

/// One file format's extraction and resolution rules.
pub trait Checker {
    /// Which report wording and discovery filter this checker uses.
    const KIND: CheckKind;

    /// Pull every reference out of a source file's content.
    ///
    /// # Errors
    ///
    /// Returns a file-level problem when the content cannot be interpreted;
    /// the driver then skips the file's references.
    fn extract(&mut self, path: &Path, content: &str) -> Result<Vec<Reference>, Problem>;

    /// Check that one reference points at something that exists.
    ///
    /// # Errors
    ///
    /// Returns the problem describing why the reference is broken.
    fn resolve(&mut self, reference: &Reference) -> Result<(), Problem>;
}

/// Run `checker` over `files` in order, accumulating every failure.
/// Nothing here aborts early: each file and reference is checked independently.
pub fn run<C: Checker>(checker: &mut C, root: &Path, files: &[PathBuf]) -> Report {
    let mut report = Report::new(C::KIND);

    for file in files {
        let relative = paths::display_relative(root, file);

        if !file.is_file() {
            record_file_failure(&mut report, relative, Problem::MissingInput);
            continue;
        }
        report.files_checked = report.files_checked.saturating_add(1);

        let content = match std::fs::read_to_string(file) {
            Ok(c) => c,
            Err(e) => {
                let problem = Problem::Unreadable { path: relative.clone(), reason: e.to_string() };
                record_file_failure(&mut report, relative, problem);
                continue;
            },
        };

        let references = match checker.extract(file, &content) {
            Ok(refs) => refs,
            Err(problem) => {
                record_file_failure(&mut report, relative, problem);
                continue;
            },
        };
        tracing::debug!(file = %relative, references = references.len(), "scanned");

        for reference in references {
            report.references_checked = report.references_checked.saturating_add(1);
            if let Err(problem) = checker.resolve(&reference) {
                tracing::debug!(file = %relative, location = %reference.location, %problem, "broken reference");
                report.failures.push(Failure {
                    context: Some(reference.raw),
                    file: relative.clone(),
                    location: Some(reference.location),
                    problem,
                });
            }
        }
    }

    report
}

/// Record a problem that applies to a whole input file.
fn record_file_failure(report: &mut Report, file: String, problem: Problem) {
    tracing::debug!(file = %file, %problem, "file-level failure");
    report.failures.push(Failure {
        context: None,
        file,
        location: None,
        problem,
    });
}

/// Resolve a target's path part against its source, requiring an existing file.
///
/// # Errors
///
/// Returns `Problem::TargetNotFound` with the best displayable path.
fn resolve_existing_file(root: &Path, source: &Path, path: &str) -> Result<PathBuf, Problem> {
    match paths::resolve_from_source(source, path) {
        Ok(resolved) if resolved.is_file() => Ok(resolved),
        Ok(resolved) | Err(resolved) => Err(Problem::TargetNotFound {
            path: paths::display_relative(root, &resolved),
        }),
    }
}

// ── Markdown links ────────────────────────────────────────────────────

/// Checks `[text](target)` links: target files exist inside the repository
/// and anchors name a heading or HTML anchor in the target.
#[derive(Debug)]
pub struct LinkChecker {
    /// Per-file anchor sets, filled on first use.
    anchors: AnchorCache,
    /// Canonical repository root.
    root: PathBuf,
}

impl LinkChecker {
    /// A checker resolving display paths against `root`.
    pub fn new(root: &Path) -> Self {
        Self {
            anchors: AnchorCache::default(),
            root: root.to_path_buf(),
        }
    }
}

impl Checker for LinkChecker {
    const KIND: CheckKind = CheckKind::Links;

    fn extract(&mut self, path: &Path, content: &str) -> Result<Vec<Reference>, Problem> {
        self.anchors.prime(path, content);
        Ok(markdown::extract_links(content, path))
    }

    fn resolve(&mut self, reference: &Reference) -> Result<(), Problem> {
        let target = Target::parse(&reference.target);

        let target_file = if target.is_same_document() {
            reference.source.clone()
        } else {
            let resolved = resolve_existing_file(&self.root, &reference.source, target.path)?;
            // Anything outside the repository counts as missing.
            if !resolved.starts_with(&self.root) {
                return Err(Problem::TargetNotFound {
                    path: resolved.display().to_string(),
                });
            }
            resolved
        };

        let Some(anchor) = target.fragment.filter(|a| !a.is_empty()) else {
            return Ok(());
        };

        let display = paths::display_relative(&self.root, &target_file);
        let anchors = self.anchors.anchors_for(&target_file).map_err(|e| Problem::Unreadable {
            path: display.clone(),
            reason: e.to_string(),
        })?;

        if anchors.contains(anchor) {
            Ok(())
        } else {
            Err(Problem::AnchorNotFound {
                anchor: anchor.to_owned(),
                path: display,
            })
        }
    }
}

// ── Schema references ─────────────────────────────────────────────────

/// Checks `$ref` pointers: target files exist and stay inside the schema root.
#[derive(Debug)]
pub struct SchemaChecker {
    /// Canonical repository root.
    root: PathBuf,
    /// Canonical schema root; resolved targets must be descendants of it.
    schema_root: PathBuf,
}

impl SchemaChecker {
    /// A checker enforcing containment in `schema_root`.
    pub fn new(root: &Path, schema_root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            schema_root: schema_root.to_path_buf(),
        }
    }
}

impl Checker for SchemaChecker {
    const KIND: CheckKind = CheckKind::Schemas;

    fn extract(&mut self, path: &Path, content: &str) -> Result<Vec<Reference>, Problem> {
        let document: serde_json::Value =
            serde_json::from_str(content).map_err(|e| Problem::MalformedJson { reason: e.to_string() })?;
        Ok(schema::extract_refs(&document, path))
    }

    fn resolve(&mut self, reference: &Reference) -> Result<(), Problem> {
        let target = Target::parse(&reference.target);
        // Same-document pointers are not followed.
        if target.is_same_document() {
            return Ok(());
        }

        let resolved = resolve_existing_file(&self.root, &reference.source, target.path)?;
        if !resolved.starts_with(&self.schema_root) {
            return Err(Problem::OutsideSchemaRoot {
                path: paths::display_relative(&self.root, &resolved),
            });
        }
        Ok(())
    }
}
