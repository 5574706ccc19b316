//! Run summary: accumulated failures, text and JSON rendering, exit status.

use std::fmt::Write as _;
use std::process::ExitCode;

use serde::Serialize;

use crate::error::Problem;
use crate::types::{CheckKind, Location};

/// One recorded problem, tied to the file (and place in it) where it was found.
#[derive(Debug, Clone)]
pub struct Failure {
    /// Offending link text or `$ref` value. `None` for file-level failures.
    pub context: Option<String>,
    /// Source file, relative to the repository root when inside it.
    pub file: String,
    /// Place in the file. `None` for file-level failures.
    pub location: Option<Location>,
    /// What went wrong.
    pub problem: Problem,
}

/// Outcome of one checker run. Failures keep file order, then in-file order.
#[derive(Debug)]
pub struct Report {
    /// Failures in encounter order.
    pub failures: Vec<Failure>,
    /// Input files that existed and were read. Missing inputs are not counted.
    pub files_checked: usize,
    /// Which checker produced this report.
    pub kind: CheckKind,
    /// References extracted and resolved.
    pub references_checked: usize,
}

impl Report {
    /// An empty report for a run of `kind`.
    pub const fn new(kind: CheckKind) -> Self {
        Self {
            failures: Vec::new(),
            files_checked: 0,
            kind,
            references_checked: 0,
        }
    }

    /// True when nothing was recorded.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Process exit status: success only when every reference resolved.
    pub fn exit_code(&self) -> ExitCode {
        if self.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
    }

    /// Human-readable summary followed by one record per failure.
    pub fn render_text(&self) -> String {
        let refs = self.references_checked;
        let files = self.files_checked;
        let count = self.failures.len();

        if self.is_ok() {
            return match self.kind {
                CheckKind::Links => format!("✅ All {refs} link(s) in {files} markdown file(s) are valid!\n"),
                CheckKind::Schemas => {
                    format!("✅ All {refs} schema reference(s) in {files} schema file(s) are valid!\n")
                },
            };
        }

        let mut out = match self.kind {
            CheckKind::Links => format!("❌ Found {count} broken link(s) in {files} file(s):\n\n"),
            CheckKind::Schemas => format!("❌ Found {count} broken schema reference(s) in {files} file(s):\n\n"),
        };
        for failure in &self.failures {
            render_failure(&mut out, self.kind, failure);
            out.push('\n');
        }
        out
    }

    /// The report as a pretty-printed JSON document.
    pub fn render_json(&self) -> String {
        let json = ReportJson {
            failures: self.failures.iter().map(|f| FailureJson::new(self.kind, f)).collect(),
            files_checked: self.files_checked,
            kind: self.kind,
            ok: self.is_ok(),
            references_checked: self.references_checked,
        };
        // Plain strings and integers only; serialization cannot fail.
        serde_json::to_string_pretty(&json).unwrap_or_default()
    }
}

/// Append one failure record in the layout of its checker.
fn render_failure(out: &mut String, kind: CheckKind, failure: &Failure) {
    let Failure { context, file, location, problem } = failure;
    match (kind, location) {
        (CheckKind::Links, Some(location)) => {
            let _ = writeln!(out, "{file}:{location}: {problem}");
            if let Some(link) = context {
                let _ = writeln!(out, "  Link: {link}");
            }
        },
        (CheckKind::Schemas, Some(location)) => {
            let _ = writeln!(out, "{file}: {problem}");
            let _ = writeln!(out, "  At: {location}");
            if let Some(value) = context {
                let _ = writeln!(out, "  $ref: {value}");
            }
        },
        (_, None) => {
            let _ = writeln!(out, "{file}: {problem}");
        },
    }
}

/// Serialized shape of a [`Report`].
#[derive(Serialize)]
struct ReportJson {
    /// Failures in encounter order.
    failures: Vec<FailureJson>,
    /// Input files processed.
    files_checked: usize,
    /// Which checker ran.
    kind: CheckKind,
    /// True when no failures were recorded.
    ok: bool,
    /// References resolved.
    references_checked: usize,
}

/// Serialized shape of a [`Failure`].
#[derive(Serialize)]
struct FailureJson {
    /// Source file.
    file: String,
    /// Structural path of the `$ref` key, for schema failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    json_path: Option<String>,
    /// One-based line, for link failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<u32>,
    /// Raw link text, for link failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<String>,
    /// Human-readable message.
    message: String,
    /// Offending `$ref` value, for schema failures.
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
}

impl FailureJson {
    /// Flatten a failure into its serialized shape.
    fn new(kind: CheckKind, failure: &Failure) -> Self {
        let (line, json_path) = match &failure.location {
            Some(Location::Line(line)) => (Some(*line), None),
            Some(Location::JsonPath(path)) => (None, Some(path.clone())),
            None => (None, None),
        };
        let (link, reference) = match kind {
            CheckKind::Links => (failure.context.clone(), None),
            CheckKind::Schemas => (None, failure.context.clone()),
        };
        Self {
            file: failure.file.clone(),
            json_path,
            line,
            link,
            message: failure.problem.to_string(),
            reference,
        }
    }
}
