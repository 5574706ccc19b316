//! Crate-level error types: fatal run errors and per-reference problems.

use std::path::PathBuf;

/// Errors that stop a run before any report is produced.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `.speclint.toml` exists but cannot be parsed.
    #[error("invalid config {}: {source}", path.display())]
    ConfigInvalid {
        /// Path to the malformed config file.
        path: PathBuf,
        /// The wrapped TOML deserialization error.
        #[source]
        source: toml::de::Error,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// `--root` was given but does not name a directory.
    #[error("root is not a directory: {}", path.display())]
    RootInvalid {
        /// Path passed on the command line.
        path: PathBuf,
    },

    /// No ancestor of the working directory looks like a repository root.
    #[error(
        "could not locate repository root from {} (no .speclint.toml or `{spec_dir}/` in any ancestor; pass --root)",
        start.display()
    )]
    RootNotFound {
        /// Directory the search started from.
        start: PathBuf,
        /// Specification directory name that was searched for.
        spec_dir: String,
    },
}

/// A non-fatal finding recorded against one input file or reference.
///
/// Paths are stored already rendered for display (relative to the
/// repository root when possible), so `Display` is the final message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Problem {
    /// A link anchor is not among the target file's headings or HTML anchors.
    #[error("Anchor '#{anchor}' not found in {path}")]
    AnchorNotFound {
        /// Anchor text after the `#`.
        anchor: String,
        /// Target file that was searched.
        path: String,
    },

    /// A schema file is not valid JSON. Its references are not extracted.
    #[error("Invalid JSON: {reason}")]
    MalformedJson {
        /// Parser message, including line and column.
        reason: String,
    },

    /// An input file named on the command line does not exist.
    #[error("File not found")]
    MissingInput,

    /// A `$ref` resolves to a real file that lies outside the schema root.
    #[error("Referenced file is outside schema directory: {path}")]
    OutsideSchemaRoot {
        /// Resolved target path.
        path: String,
    },

    /// The path part of a link or `$ref` does not name an existing file.
    #[error("Target file does not exist: {path}")]
    TargetNotFound {
        /// Resolved (or lexically normalized) target path.
        path: String,
    },

    /// A source or target file could not be read.
    #[error("Could not read {path}: {reason}")]
    Unreadable {
        /// File that failed to read.
        path: String,
        /// The I/O error message.
        reason: String,
    },
}
