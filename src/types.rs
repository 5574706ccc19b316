//! Core domain types shared by the link and schema checkers.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Which family of files a run checks. Selects discovery rules and report wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Inline links in markdown files.
    Links,
    /// `$ref` pointers in JSON Schema files.
    Schemas,
}

impl CheckKind {
    /// Whether a discovered path belongs to this kind.
    pub fn matches_file_name(self, file_name: &str) -> bool {
        match self {
            Self::Links => file_name.ends_with(".md"),
            Self::Schemas => file_name.ends_with(".schema.json"),
        }
    }
}

/// Where in a source file a reference was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// One-based line number in a markdown file.
    Line(u32),
    /// Structural path of a `$ref` key inside a JSON document.
    JsonPath(String),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(line) => write!(f, "{line}"),
            Self::JsonPath(path) => f.write_str(path),
        }
    }
}

/// An outbound pointer extracted from a source document.
#[derive(Debug, Clone)]
pub struct Reference {
    /// Where the reference sits in its source file.
    pub location: Location,
    /// Full matched link text, or the `$ref` value for schemas.
    pub raw: String,
    /// Canonical path of the file containing the reference.
    pub source: PathBuf,
    /// Link target or `$ref` value, exactly as written.
    pub target: String,
}

/// A reference target split on its first `#`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target<'a> {
    /// Fragment after the `#`, if any. An anchor for markdown, a pointer for schemas.
    pub fragment: Option<&'a str>,
    /// File part before the `#`. Empty means "the source file itself".
    pub path: &'a str,
}

impl<'a> Target<'a> {
    /// Split a raw target on the first `#`.
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once('#') {
            Some((path, fragment)) => Self { fragment: Some(fragment), path },
            None => Self { fragment: None, path: raw },
        }
    }

    /// True when the target points back into the document it came from.
    pub fn is_same_document(&self) -> bool {
        self.path.is_empty()
    }
}
