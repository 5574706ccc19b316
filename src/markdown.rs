//! Markdown scanning: inline link extraction and per-file anchor sets.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Location, Reference};

/// Inline link syntax `[text](target)`.
#[allow(clippy::expect_used, reason = "literal regex, valid at compile time")]
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]*)\)").expect("valid link regex"));

/// A URI scheme prefix such as `https:` or `mailto:`.
#[allow(clippy::expect_used, reason = "literal regex, valid at compile time")]
static EXTERNAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+.-]+:").expect("valid scheme regex"));

/// ATX heading, one to six `#` then whitespace then text.
#[allow(clippy::expect_used, reason = "literal regex, valid at compile time")]
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s+(.+)$").expect("valid heading regex"));

/// An opening `<a ...>` tag.
#[allow(clippy::expect_used, reason = "literal regex, valid at compile time")]
static ANCHOR_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<a\s[^>]*>").expect("valid anchor tag regex"));

/// A `name` or `id` attribute inside an anchor tag, either quote style.
#[allow(clippy::expect_used, reason = "literal regex, valid at compile time")]
static ANCHOR_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s(?:name|id)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid anchor attribute regex")
});

/// Extract every local `[text](target)` link from markdown content.
/// External links (any URI scheme) and empty targets are skipped.
pub fn extract_links(content: &str, source: &Path) -> Vec<Reference> {
    let mut references = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line_number = u32::try_from(index.saturating_add(1)).unwrap_or(u32::MAX);
        extract_links_from_line(line, line_number, source, &mut references);
    }
    references
}

/// Extract references from a single markdown line.
fn extract_links_from_line(line: &str, line_number: u32, source: &Path, out: &mut Vec<Reference>) {
    for cap in LINK.captures_iter(line) {
        let (Some(full), Some(target)) = (cap.get(0), cap.get(2)) else {
            continue;
        };
        let target = target.as_str().trim();
        if target.is_empty() || is_external(target) {
            continue;
        }
        out.push(Reference {
            location: Location::Line(line_number),
            raw: full.as_str().to_owned(),
            source: source.to_path_buf(),
            target: target.to_owned(),
        });
    }
}

/// Whether a link target carries a URI scheme (`http:`, `mailto:`, ...).
pub fn is_external(target: &str) -> bool {
    EXTERNAL.is_match(target)
}

/// Collect every anchor a link into this content may name: slugified
/// headings plus literal `name`/`id` values of HTML anchor tags.
pub fn extract_anchors(content: &str) -> HashSet<String> {
    let mut anchors = HashSet::new();
    for line in content.lines() {
        if let Some(text) = HEADING.captures(line.trim()).and_then(|c| c.get(1)) {
            anchors.insert(slugify(text.as_str()));
        }
    }
    // Tags may wrap across lines, so they are matched over the whole content.
    for tag in ANCHOR_TAG.find_iter(content) {
        for attr in ANCHOR_ATTR.captures_iter(tag.as_str()) {
            if let Some(value) = attr.get(1).or_else(|| attr.get(2)) {
                anchors.insert(value.as_str().to_owned());
            }
        }
    }
    anchors
}

/// Convert heading text to an anchor slug.
/// Lowercase, drop everything outside `[a-z0-9 -]`, trim, then turn each
/// whitespace run into a single hyphen. Repeated headings share one slug.
pub fn slugify(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ' || *c == '-')
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Lazily computed anchor sets, keyed by canonical file path.
/// The first lookup for a file reads and parses it; later lookups reuse the set.
#[derive(Debug, Default)]
pub struct AnchorCache {
    /// Anchor sets of files read so far.
    sets: HashMap<PathBuf, HashSet<String>>,
}

impl AnchorCache {
    /// Return the anchor set for `path`, reading the file on first use.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read. Failures are not cached.
    pub fn anchors_for(&mut self, path: &Path) -> std::io::Result<&HashSet<String>> {
        if !self.sets.contains_key(path) {
            tracing::debug!(file = %path.display(), "computing anchor set");
            let content = std::fs::read_to_string(path)?;
            self.sets.insert(path.to_path_buf(), extract_anchors(&content));
        }
        Ok(self.sets.entry(path.to_path_buf()).or_default())
    }

    /// Seed the cache with content already in memory (the source file being scanned).
    pub fn prime(&mut self, path: &Path, content: &str) {
        self.sets
            .entry(path.to_path_buf())
            .or_insert_with(|| extract_anchors(content));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(content: &str) -> Vec<String> {
        extract_links(content, Path::new("doc.md"))
            .into_iter()
            .map(|r| r.target)
            .collect()
    }

    #[test]
    fn slug_strips_punctuation() {
        assert_eq!(slugify("Hello, World! 123"), "hello-world-123");
    }

    #[test]
    fn slug_collapses_whitespace() {
        assert_eq!(slugify("  Getting   Started  "), "getting-started");
    }

    #[test]
    fn slug_keeps_hyphens() {
        assert_eq!(slugify("Pre-flight checks"), "pre-flight-checks");
    }

    #[test]
    fn slug_drops_non_ascii() {
        assert_eq!(slugify("Café Über"), "caf-ber");
    }

    #[test]
    fn slug_of_symbols_is_empty() {
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn links_are_extracted_with_line_numbers() {
        let content = "# Title\n\nSee [a](a.md) and [b](b.md#intro).\n";
        let refs = extract_links(content, Path::new("doc.md"));
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].location, Location::Line(3));
        assert_eq!(refs[0].raw, "[a](a.md)");
        assert_eq!(refs[1].target, "b.md#intro");
    }

    #[test]
    fn external_links_are_skipped() {
        let content = "[x](https://example.com) [y](http://a.b) [m](mailto:me@x.org) [f](ftp+ssh://h) [ok](#local)";
        assert_eq!(targets(content), vec!["#local"]);
    }

    #[test]
    fn empty_targets_are_skipped() {
        assert!(targets("[nothing]()").is_empty());
    }

    #[test]
    fn empty_link_text_is_not_a_link() {
        assert!(targets("[](a.md) and [](#top)").is_empty());
    }

    #[test]
    fn indented_heading_yields_anchor() {
        let anchors = extract_anchors("  # Intro
   ## Deep Dive  
");
        assert!(anchors.contains("intro"));
        assert!(anchors.contains("deep-dive"));
    }

    #[test]
    fn anchor_tag_spanning_lines() {
        let anchors = extract_anchors("<a\n  id=\"wrapped\"></a>\n");
        assert!(anchors.contains("wrapped"));
    }

    #[test]
    fn no_links_no_references() {
        assert!(targets("# Heading\n\nplain text only\n").is_empty());
    }

    #[test]
    fn anchors_from_headings_and_tags() {
        let content = "# Intro\n## Hello, World! 123\n<a name=\"Custom_Anchor\"></a>\nText <a id='other'>x</a>\n";
        let anchors = extract_anchors(content);
        assert!(anchors.contains("intro"));
        assert!(anchors.contains("hello-world-123"));
        assert!(anchors.contains("Custom_Anchor"));
        assert!(anchors.contains("other"));
        assert!(!anchors.contains("custom_anchor"));
    }

    #[test]
    fn heading_needs_whitespace_after_hashes() {
        let anchors = extract_anchors("#nospace\n####### seven\n");
        assert!(anchors.is_empty());
    }

    #[test]
    fn repeated_headings_share_a_slug() {
        let anchors = extract_anchors("## Example\ntext\n## Example\n");
        assert_eq!(anchors.len(), 1);
        assert!(anchors.contains("example"));
    }

    #[test]
    fn cache_reads_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("b.md");
        std::fs::write(&path, "# Intro\n").unwrap();

        let mut cache = AnchorCache::default();
        assert!(cache.anchors_for(&path).unwrap().contains("intro"));

        // A second lookup is served from the cache even after the file changes.
        std::fs::write(&path, "# Changed\n").unwrap();
        assert!(cache.anchors_for(&path).unwrap().contains("intro"));
    }

    #[test]
    fn cache_reports_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = AnchorCache::default();
        assert!(cache.anchors_for(&dir.path().join("missing.md")).is_err());
    }
}
