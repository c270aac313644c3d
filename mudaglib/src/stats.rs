//! Core data structures for line statistics

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::language::WorkflowLanguage;

/// Key of the metadata entry in the flat serialized form of a [`ScanResult`].
pub const METADATA_KEY: &str = "__metadata__";

/// Line counts for a single file or an aggregate of files.
///
/// `total()` is always `code + comment + blank`; the serialized form carries
/// it as an explicit `total` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineCounts {
    /// Lines holding code (including code lines with trailing comments)
    pub code: u64,
    /// Comment, docstring and shebang lines
    pub comment: u64,
    /// Whitespace-only lines
    pub blank: u64,
}

impl LineCounts {
    /// Create counts from the three line classes.
    pub fn new(code: u64, comment: u64, blank: u64) -> Self {
        Self {
            code,
            comment,
            blank,
        }
    }

    /// Total number of lines
    pub fn total(&self) -> u64 {
        self.code + self.comment + self.blank
    }
}

impl Add for LineCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            code: self.code + other.code,
            comment: self.comment + other.comment,
            blank: self.blank + other.blank,
        }
    }
}

impl AddAssign for LineCounts {
    fn add_assign(&mut self, other: Self) {
        self.code += other.code;
        self.comment += other.comment;
        self.blank += other.blank;
    }
}

impl Serialize for LineCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LineCounts", 4)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("comment", &self.comment)?;
        state.serialize_field("blank", &self.blank)?;
        state.serialize_field("total", &self.total())?;
        state.end()
    }
}

/// Aggregated counts for one workflow language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LanguageStats {
    /// Number of files of this language
    pub files: u64,
    /// Summed line counts
    #[serde(flatten)]
    pub lines: LineCounts,
}

impl LanguageStats {
    /// Record one more file.
    pub fn add_file(&mut self, counts: LineCounts) {
        self.files += 1;
        self.lines += counts;
    }

    /// Take back a file recorded earlier.
    pub fn remove_file(&mut self, counts: LineCounts) {
        self.files = self.files.saturating_sub(1);
        self.lines.code = self.lines.code.saturating_sub(counts.code);
        self.lines.comment = self.lines.comment.saturating_sub(counts.comment);
        self.lines.blank = self.lines.blank.saturating_sub(counts.blank);
    }
}

/// Scan-wide metadata: file count and per-language totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanMetadata {
    /// Number of workflow files counted
    pub total_files: u64,
    /// Per-language aggregate; every language is present, zero-valued if unmatched
    pub workflow_languages: BTreeMap<WorkflowLanguage, LanguageStats>,
}

impl Default for ScanMetadata {
    fn default() -> Self {
        Self {
            total_files: 0,
            workflow_languages: WorkflowLanguage::ALL
                .iter()
                .map(|lang| (*lang, LanguageStats::default()))
                .collect(),
        }
    }
}

/// Result of scanning a directory tree.
///
/// File keys are `/`-separated paths relative to the scan root. The
/// `Serialize` impl produces the flat mapping of every file path to its
/// counts plus one [`METADATA_KEY`] entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Per-file counts keyed by relative path
    pub files: BTreeMap<String, LineCounts>,
    /// Totals by language
    pub metadata: ScanMetadata,
    /// Workflow files that matched but could not be read
    pub unreadable: Vec<String>,
    /// Language each file was recorded under
    languages: BTreeMap<String, WorkflowLanguage>,
}

impl ScanResult {
    /// Create a new empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the counts of one workflow file.
    ///
    /// Adding a path again replaces its earlier entry and language.
    pub fn add_file(
        &mut self,
        path: impl Into<String>,
        language: WorkflowLanguage,
        counts: LineCounts,
    ) {
        let path = path.into();
        if let Some(previous) = self.files.insert(path.clone(), counts) {
            if let Some(old_language) = self.languages.get(&path) {
                if let Some(stats) = self.metadata.workflow_languages.get_mut(old_language) {
                    stats.remove_file(previous);
                }
            }
            self.metadata.total_files = self.metadata.total_files.saturating_sub(1);
        }
        self.languages.insert(path, language);
        self.metadata.total_files += 1;
        self.metadata
            .workflow_languages
            .entry(language)
            .or_default()
            .add_file(counts);
    }

    /// Language a file was recorded under.
    pub fn file_language(&self, path: &str) -> Option<WorkflowLanguage> {
        self.languages.get(path).copied()
    }

    /// Number of file entries (the metadata entry is not counted).
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True if no workflow file was counted.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Summed counts over all files.
    pub fn totals(&self) -> LineCounts {
        self.files
            .values()
            .fold(LineCounts::default(), |acc, counts| acc + *counts)
    }

    /// Aggregate for a single language.
    pub fn language(&self, language: WorkflowLanguage) -> LanguageStats {
        self.metadata
            .workflow_languages
            .get(&language)
            .copied()
            .unwrap_or_default()
    }
}

impl Serialize for ScanResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.files.len() + 1))?;
        for (path, counts) in &self.files {
            map.serialize_entry(path, counts)?;
        }
        map.serialize_entry(METADATA_KEY, &self.metadata)?;
        map.end()
    }
}
