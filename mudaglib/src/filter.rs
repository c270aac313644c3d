//! Ignore patterns loaded from `.mudagignore` files.
//!
//! The file holds one glob pattern per line. Blank lines and lines starting
//! with `#` are skipped. A path is ignored when any pattern matches it:
//!
//! - `dir/` matches a directory name anywhere in the path;
//! - patterns with `*`, `?` or `[...]` are shell globs, tried against the
//!   full relative path, each trailing sub-path and each single segment;
//! - any other pattern matches a segment, a trailing sub-path or a leading
//!   directory prefix literally.
//!
//! Matching is case-sensitive and there are no negation patterns.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::MudagError;
use crate::Result;

/// Name of the ignore configuration file.
pub const IGNORE_FILE_NAME: &str = ".mudagignore";

/// How a single pattern is matched.
#[derive(Debug, Clone)]
enum Matcher {
    /// `name/`: matches directory segments
    Directory(Pattern),
    /// Contains glob metacharacters
    Glob(Pattern),
    /// Literal path or name
    Literal(String),
}

/// A compiled set of ignore patterns.
///
/// Patterns are OR'd: a path is ignored as soon as one of them matches.
/// An empty set matches nothing.
#[derive(Debug, Clone, Default)]
pub struct IgnorePatterns {
    /// Raw patterns, in file order
    patterns: Vec<String>,
    matchers: Vec<Matcher>,
}

impl IgnorePatterns {
    /// Create an empty pattern set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `.mudagignore` from `dir`.
    ///
    /// A missing file is not an error and yields an empty set.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        match Self::from_file(dir.as_ref().join(IGNORE_FILE_NAME)) {
            Err(MudagError::ConfigNotFound(path)) => {
                tracing::debug!(path = %path.display(), "no ignore file");
                Ok(Self::new())
            }
            other => other,
        }
    }

    /// Load patterns from an explicit file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MudagError::ConfigNotFound(path.to_path_buf()),
            _ => MudagError::ConfigRead {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let patterns = Self::parse(&content);
        tracing::debug!(
            path = %path.display(),
            count = patterns.len(),
            "loaded ignore patterns"
        );
        Ok(patterns)
    }

    /// Parse the contents of an ignore file.
    pub fn parse(content: &str) -> Self {
        content
            .lines()
            .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
            .fold(Self::new(), |set, line| set.add(line))
    }

    /// Add one pattern. Any string is accepted.
    pub fn add(mut self, pattern: &str) -> Self {
        self.push(pattern);
        self
    }

    /// Add several patterns.
    pub fn add_many<S: AsRef<str>>(mut self, patterns: impl IntoIterator<Item = S>) -> Self {
        for pattern in patterns {
            self.push(pattern.as_ref());
        }
        self
    }

    fn push(&mut self, pattern: &str) {
        self.matchers.push(compile(pattern));
        self.patterns.push(pattern.to_string());
    }

    /// The raw patterns, in the order they were added.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True if there are no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Check whether a path relative to the scan root should be skipped.
    ///
    /// Both `/` and `\` are accepted as separators, and a leading `./` is
    /// ignored.
    pub fn is_ignored(&self, relative_path: &str) -> bool {
        if self.matchers.is_empty() {
            return false;
        }

        let segments: Vec<&str> = relative_path
            .split(['/', '\\'])
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();
        if segments.is_empty() {
            return false;
        }

        self.matchers.iter().any(|m| m.matches(&segments))
    }

    /// Path variant of [`is_ignored`](Self::is_ignored).
    pub fn is_path_ignored(&self, relative_path: &Path) -> bool {
        self.is_ignored(&relative_path.to_string_lossy())
    }
}

fn has_glob_meta(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Compile a glob, falling back to a literal match when it is malformed.
fn glob_or_literal(pattern: &str) -> Pattern {
    Pattern::new(pattern).unwrap_or_else(|e| {
        tracing::debug!(pattern, error = %e, "treating malformed glob as literal");
        // escape() only produces valid patterns
        Pattern::new(&Pattern::escape(pattern)).unwrap_or_default()
    })
}

fn compile(pattern: &str) -> Matcher {
    if let Some(dir) = pattern.strip_suffix('/') {
        let dir = dir.trim_start_matches('/');
        return Matcher::Directory(if has_glob_meta(dir) {
            glob_or_literal(dir)
        } else {
            glob_or_literal(&Pattern::escape(dir))
        });
    }

    let pattern = pattern.trim_start_matches("./");
    if has_glob_meta(pattern) {
        Matcher::Glob(glob_or_literal(pattern))
    } else {
        Matcher::Literal(pattern.trim_start_matches('/').to_string())
    }
}

impl Matcher {
    fn matches(&self, segments: &[&str]) -> bool {
        match self {
            // every contiguous run of segments, so `a/b/` also works
            Matcher::Directory(pattern) => (0..segments.len()).any(|start| {
                (start + 1..=segments.len())
                    .any(|end| pattern.matches(&segments[start..end].join("/")))
            }),
            Matcher::Glob(pattern) => {
                (0..segments.len()).any(|start| pattern.matches(&segments[start..].join("/")))
                    || segments.iter().any(|segment| pattern.matches(segment))
            }
            Matcher::Literal(literal) => {
                let full = segments.join("/");
                segments.iter().any(|segment| segment == literal)
                    || full == *literal
                    || full.ends_with(&format!("/{literal}"))
                    || full.starts_with(&format!("{literal}/"))
            }
        }
    }
}

/// Pick the ignore file for a scan: an explicit path, or `<root>/.mudagignore`.
pub(crate) fn resolve_ignore_file(root: &Path, explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.join(IGNORE_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn patterns(lines: &[&str]) -> IgnorePatterns {
        IgnorePatterns::new().add_many(lines)
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let set = IgnorePatterns::new();
        assert!(set.is_empty());
        assert!(!set.is_ignored("anything.cwl"));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = tempdir().unwrap();
        let set = IgnorePatterns::load(temp.path()).unwrap();
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_from_file_missing_is_config_not_found() {
        let result = IgnorePatterns::from_file("/nonexistent/.mudagignore");
        assert!(matches!(result, Err(MudagError::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_skips_comments_and_blank_lines() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(IGNORE_FILE_NAME),
            "# Test ignore file with comments and empty lines\n*.log\n\n# This is a comment\ntemp/\n\n# Another comment\n\ntest_data.txt\n",
        )
        .unwrap();

        let set = IgnorePatterns::load(temp.path()).unwrap();
        assert_eq!(set.patterns(), ["*.log", "temp/", "test_data.txt"]);
    }

    #[test]
    fn test_parse_keeps_surrounding_whitespace() {
        let set = IgnorePatterns::parse("  spaced\r\n   \n");
        assert_eq!(set.patterns(), ["  spaced"]);
    }

    #[test]
    fn test_basic_patterns() {
        let set = patterns(&["*.log", "temp/", "test_data.txt"]);

        assert!(set.is_ignored("file.log"));
        assert!(set.is_ignored("logs/error.log"));
        assert!(set.is_ignored("temp/file.txt"));
        assert!(set.is_ignored("dir/temp/file.txt"));
        assert!(set.is_ignored("test_data.txt"));
        assert!(set.is_ignored("dir/test_data.txt"));

        assert!(!set.is_ignored("file.txt"));
        assert!(!set.is_ignored("logfile"));
        assert!(!set.is_ignored("temporal/file.txt"));
    }

    #[test]
    fn test_extension_and_directory_patterns() {
        let set = patterns(&["*.py", "build/"]);

        assert!(set.is_ignored("file.py"));
        assert!(set.is_ignored("dir/module.py"));
        assert!(!set.is_ignored("file.pyc"));

        assert!(set.is_ignored("build/output.txt"));
        assert!(set.is_ignored("path/to/build/file"));
        assert!(!set.is_ignored("builder/file.txt"));
    }

    #[test]
    fn test_character_class() {
        let set = patterns(&["output[0-9].txt"]);

        assert!(set.is_ignored("output1.txt"));
        assert!(set.is_ignored("output9.txt"));
        assert!(!set.is_ignored("output.txt"));
        assert!(!set.is_ignored("output10.txt"));
    }

    #[test]
    fn test_single_char_wildcard() {
        let set = patterns(&["test?.xml"]);

        assert!(set.is_ignored("test1.xml"));
        assert!(set.is_ignored("testA.xml"));
        assert!(!set.is_ignored("test.xml"));
        assert!(!set.is_ignored("test12.xml"));
    }

    #[test]
    fn test_directory_pattern_is_segment_based() {
        let set = patterns(&["node_modules/"]);

        assert!(set.is_ignored("node_modules"));
        assert!(set.is_ignored("node_modules/x"));
        assert!(set.is_ignored("a/node_modules/x"));
        assert!(!set.is_ignored("node_modules_old/x"));
    }

    #[test]
    fn test_nested_directory_pattern() {
        let set = patterns(&["docs/build/"]);

        assert!(set.is_ignored("docs/build/index.cwl"));
        assert!(set.is_ignored("project/docs/build/x"));
        assert!(!set.is_ignored("build/x"));
    }

    #[test]
    fn test_glob_directory_pattern() {
        let set = patterns(&["tmp*/"]);

        assert!(set.is_ignored("tmp1/a.cwl"));
        assert!(set.is_ignored("a/tmp_work/b.cwl"));
        assert!(!set.is_ignored("a/tm/b.cwl"));
    }

    #[test]
    fn test_literal_path_prefix() {
        let set = patterns(&["vendor/pipelines"]);

        assert!(set.is_ignored("vendor/pipelines"));
        assert!(set.is_ignored("vendor/pipelines/main.nf"));
        assert!(set.is_ignored("third_party/vendor/pipelines"));
        assert!(!set.is_ignored("vendor/other.nf"));
    }

    #[test]
    fn test_case_sensitive() {
        let set = patterns(&["*.LOG", "Temp/"]);

        assert!(set.is_ignored("a.LOG"));
        assert!(!set.is_ignored("a.log"));
        assert!(!set.is_ignored("temp/x"));
    }

    #[test]
    fn test_malformed_glob_is_literal() {
        let set = patterns(&["[invalid"]);

        assert!(set.is_ignored("[invalid"));
        assert!(set.is_ignored("dir/[invalid"));
        assert!(!set.is_ignored("i"));
    }

    #[test]
    fn test_leading_dot_slash_and_backslashes() {
        let set = patterns(&["build/", "*.log"]);

        assert!(set.is_ignored("./build/out.cwl"));
        assert!(set.is_ignored("build\\out.cwl"));
        assert!(set.is_ignored("./x/err.log"));
        assert!(!set.is_ignored("."));
    }

    #[test]
    fn test_idempotent() {
        let set = patterns(&["node_modules/"]);
        let first = set.is_ignored("a/node_modules/x");
        let second = set.is_ignored("a/node_modules/x");
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolve_ignore_file() {
        let root = Path::new("/data/project");
        assert_eq!(
            resolve_ignore_file(root, None),
            PathBuf::from("/data/project/.mudagignore")
        );
        assert_eq!(
            resolve_ignore_file(root, Some(Path::new("/etc/custom"))),
            PathBuf::from("/etc/custom")
        );
    }
}
