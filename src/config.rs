//! Optional `.speclint.toml` at the repository root.

use std::path::Path;

use crate::error::Error;

/// Name of the optional config file at the repository root.
pub const CONFIG_FILE: &str = ".speclint.toml";

/// Default markdown root, relative to the repository root.
pub const DEFAULT_SPEC_DIR: &str = "specification";

/// Default schema root, relative to the repository root.
pub const DEFAULT_SCHEMA_DIR: &str = "specification/schema";

/// Project configuration loaded from `.speclint.toml`.
/// Exclude patterns are root-relative path prefixes applied during `--all` discovery.
#[derive(Debug)]
pub struct Config {
    /// Root-relative path prefixes skipped by discovery.
    exclude: Vec<String>,
    /// Schema root; `$ref` targets must resolve inside it.
    pub schema_dir: String,
    /// Markdown root searched by `links --all`.
    pub spec_dir: String,
}

/// Raw TOML structure for `.speclint.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct SpeclintTomlConfig {
    /// Root-relative prefixes to skip.
    #[serde(default)]
    exclude: Vec<String>,
    /// Overrides [`DEFAULT_SCHEMA_DIR`].
    schema_dir: Option<String>,
    /// Overrides [`DEFAULT_SPEC_DIR`].
    spec_dir: Option<String>,
}

impl Config {
    /// Load config from `.speclint.toml` in the given root directory.
    /// Returns the default layout if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; a config the
    /// user wrote is never silently replaced by defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::ConfigInvalid` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: SpeclintTomlConfig =
            toml::from_str(&content).map_err(|source| Error::ConfigInvalid { path, source })?;
        Ok(Self {
            exclude: raw.exclude,
            schema_dir: raw.schema_dir.unwrap_or_else(|| DEFAULT_SCHEMA_DIR.to_owned()),
            spec_dir: raw.spec_dir.unwrap_or_else(|| DEFAULT_SPEC_DIR.to_owned()),
        })
    }

    /// Check whether a discovered file should be scanned.
    /// A path is skipped if it starts with any exclude prefix.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        !self.exclude.iter().any(|p| relative_path.starts_with(p.as_str()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            schema_dir: DEFAULT_SCHEMA_DIR.to_owned(),
            spec_dir: DEFAULT_SPEC_DIR.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_default_layout() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.spec_dir, "specification");
        assert_eq!(config.schema_dir, "specification/schema");
        assert!(config.should_scan("specification/anything.md"));
    }

    #[test]
    fn overrides_and_excludes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "spec_dir = \"docs\"\nschema_dir = \"docs/schemas\"\nexclude = [\"docs/archive/\"]\n",
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.spec_dir, "docs");
        assert_eq!(config.schema_dir, "docs/schemas");
        assert!(!config.should_scan("docs/archive/old.md"));
        assert!(config.should_scan("docs/current.md"));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "spec_dir = [").unwrap();
        assert!(matches!(Config::load(dir.path()), Err(Error::ConfigInvalid { .. })));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "spec_directory = \"docs\"\n").unwrap();
        assert!(matches!(Config::load(dir.path()), Err(Error::ConfigInvalid { .. })));
    }
}
