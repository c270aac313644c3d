//! High-level scanning API.
//!
//! This module provides the main entry points: counting a single file and
//! scanning a directory tree for workflow files, honoring `.mudagignore`.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::MudagError;
use crate::filter::{resolve_ignore_file, IgnorePatterns};
use crate::language::WorkflowLanguage;
use crate::stats::{LineCounts, ScanResult};
use crate::visitor::{parse_file, parse_file_with};
use crate::Result;

/// Options for scanning a directory.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Explicit ignore file (defaults to `<root>/.mudagignore`)
    pub ignore_file: Option<PathBuf>,
    /// Whether to load an ignore file at all
    pub use_ignore_file: bool,
    /// Extra patterns, OR'd with the ignore file's
    pub exclude: Vec<String>,
    /// Follow symbolic links while walking
    pub follow_links: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            ignore_file: None,
            use_ignore_file: true,
            exclude: Vec::new(),
            follow_links: true,
        }
    }
}

impl ScanOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read ignore patterns from this file instead of `<root>/.mudagignore`.
    pub fn ignore_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ignore_file = Some(path.into());
        self.use_ignore_file = true;
        self
    }

    /// Do not load any ignore file.
    pub fn no_ignore_file(mut self) -> Self {
        self.use_ignore_file = false;
        self
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    /// Add multiple exclude patterns.
    pub fn exclude_many<S: Into<String>>(mut self, patterns: impl IntoIterator<Item = S>) -> Self {
        self.exclude.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Set whether symbolic links are followed.
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Build the pattern set for a scan rooted at `root`.
    ///
    /// Problems with the ignore file are logged and never fatal.
    fn load_patterns(&self, root: &Path) -> IgnorePatterns {
        let mut patterns = if self.use_ignore_file {
            let path = resolve_ignore_file(root, self.ignore_file.as_deref());
            match IgnorePatterns::from_file(&path) {
                Ok(patterns) => patterns,
                Err(MudagError::ConfigNotFound(path)) if self.ignore_file.is_none() => {
                    tracing::debug!(path = %path.display(), "no ignore file");
                    IgnorePatterns::new()
                }
                Err(e) => {
                    tracing::warn!("{e}; continuing without ignore patterns");
                    IgnorePatterns::new()
                }
            }
        } else {
            IgnorePatterns::new()
        };

        if !self.exclude.is_empty() {
            patterns = patterns.add_many(&self.exclude);
        }
        patterns
    }
}

/// `path` relative to `root`, `/`-separated.
fn relative_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn file_name(entry: &DirEntry) -> String {
    entry.file_name().to_string_lossy().into_owned()
}

/// Scan a directory tree for workflow files.
///
/// Patterns are read from `<root>/.mudagignore` when it exists.
///
/// # Example
///
/// ```rust
/// use mudaglib::{scan_directory, WorkflowLanguage};
/// use std::fs;
/// use tempfile::tempdir;
///
/// let dir = tempdir().unwrap();
/// fs::write(dir.path().join("tool.cwl"), "# tool\nclass: CommandLineTool\n").unwrap();
/// fs::write(dir.path().join("notes.txt"), "not a workflow\n").unwrap();
///
/// let result = scan_directory(dir.path()).unwrap();
/// assert_eq!(result.len(), 1);
/// assert_eq!(result.files["tool.cwl"].comment, 1);
/// assert_eq!(result.language(WorkflowLanguage::Cwl).files, 1);
/// ```
pub fn scan_directory(root: impl AsRef<Path>) -> Result<ScanResult> {
    scan_directory_with(root, &ScanOptions::new())
}

/// Scan a directory tree with explicit options.
///
/// Only a missing or non-directory root is an error. Unreadable files are
/// logged, listed in [`ScanResult::unreadable`] and skipped; walk errors
/// (permissions, symlink loops) are logged and skipped.
pub fn scan_directory_with(root: impl AsRef<Path>, options: &ScanOptions) -> Result<ScanResult> {
    let root = root.as_ref();

    if !root.exists() {
        return Err(MudagError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(MudagError::NotADirectory(root.to_path_buf()));
    }

    let patterns = options.load_patterns(root);
    let mut result = ScanResult::new();

    let walker = WalkDir::new(root)
        .follow_links(options.follow_links)
        .sort_by_file_name()
        .into_iter();

    for entry in walker.filter_entry(|e| {
        // Always include the root directory
        if e.depth() == 0 {
            return true;
        }
        let key = relative_key(root, e.path());
        if patterns.is_ignored(&key) {
            tracing::debug!(path = %key, "ignored");
            return false;
        }
        true
    }) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!("skipping entry: {err}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let name = file_name(&entry);
        let Some(language) = WorkflowLanguage::from_file_name(&name) else {
            tracing::trace!(path = %entry.path().display(), "not a workflow file");
            continue;
        };

        let key = relative_key(root, entry.path());
        match parse_file_with(entry.path(), language.comment_style()) {
            Ok(counts) => {
                tracing::debug!(
                    path = %key,
                    language = %language,
                    code = counts.code,
                    comment = counts.comment,
                    blank = counts.blank,
                    "counted"
                );
                result.add_file(key, language, counts);
            }
            Err(e) => {
                tracing::warn!("{e}");
                result.unreadable.push(key);
            }
        }
    }

    tracing::info!(
        root = %root.display(),
        files = result.len(),
        skipped = result.unreadable.len(),
        "scan complete"
    );
    Ok(result)
}

/// Count the lines of a single file.
///
/// Works for any file, not only workflow files; the comment grammar is
/// chosen from the file name.
///
/// # Example
///
/// ```rust,ignore
/// use mudaglib::count_lines;
///
/// let counts = count_lines("workflow.cwl")?;
/// println!("Code: {}, Comments: {}", counts.code, counts.comment);
/// ```
pub fn count_lines(path: impl AsRef<Path>) -> Result<LineCounts> {
    parse_file(path)
}

/// Count the lines of a workflow file, returning its language as well.
///
/// Fails with [`MudagError::UnsupportedLanguage`] for non-workflow files.
pub fn count_workflow_file(path: impl AsRef<Path>) -> Result<(WorkflowLanguage, LineCounts)> {
    let path = path.as_ref();
    let language = WorkflowLanguage::detect(path)?;
    let counts = parse_file_with(path, language.comment_style())?;
    Ok((language, counts))
}
