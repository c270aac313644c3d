//! Workflow language detection and comment grammars.
//!
//! Two static lookup tables live here:
//!
//! - [`WorkflowLanguage`]: which scientific pipeline language a file belongs
//!   to, decided purely from its file name.
//! - [`CommentStyle`]: which comment grammar the line classifier applies to a
//!   file, decided from the workflow language or, for other files, from the
//!   extension.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MudagError;
use crate::Result;

/// A scientific workflow description language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WorkflowLanguage {
    /// Common Workflow Language (`.cwl`)
    #[serde(rename = "CWL")]
    Cwl,
    /// Nextflow (`.nf`, `.nextflow`, `nextflow.config`)
    Nextflow,
    /// Snakemake (`Snakefile`, `.smk`, `.rules`, ...)
    Snakemake,
    /// Galaxy workflows (`.ga`, `.galaxy`, `.gxwf`)
    Galaxy,
    /// Workflow Description Language (`.wdl`)
    #[serde(rename = "WDL")]
    Wdl,
    /// KNIME workflows (`.knwf`, `.workflow.knime`)
    #[serde(rename = "KNIME")]
    Knime,
}

/// Extension table: lowercase extension (without the dot) to language.
const EXTENSIONS: &[(&str, WorkflowLanguage)] = &[
    ("cwl", WorkflowLanguage::Cwl),
    ("nf", WorkflowLanguage::Nextflow),
    ("nextflow", WorkflowLanguage::Nextflow),
    ("smk", WorkflowLanguage::Snakemake),
    ("snake", WorkflowLanguage::Snakemake),
    ("snakefile", WorkflowLanguage::Snakemake),
    ("snakemake", WorkflowLanguage::Snakemake),
    ("rules", WorkflowLanguage::Snakemake),
    ("ga", WorkflowLanguage::Galaxy),
    ("galaxy", WorkflowLanguage::Galaxy),
    ("gxwf", WorkflowLanguage::Galaxy),
    ("wdl", WorkflowLanguage::Wdl),
    ("knwf", WorkflowLanguage::Knime),
];

/// Whole file names that identify a workflow file regardless of extension.
const FILE_NAMES: &[(&str, WorkflowLanguage)] = &[
    ("Snakefile", WorkflowLanguage::Snakemake),
    ("nextflow.config", WorkflowLanguage::Nextflow),
];

/// Multi-part suffixes, compared case-insensitively against the file name.
const SUFFIXES: &[(&str, WorkflowLanguage)] = &[(".workflow.knime", WorkflowLanguage::Knime)];

impl WorkflowLanguage {
    /// Every recognized language, in reporting order.
    pub const ALL: [WorkflowLanguage; 6] = [
        WorkflowLanguage::Cwl,
        WorkflowLanguage::Nextflow,
        WorkflowLanguage::Snakemake,
        WorkflowLanguage::Galaxy,
        WorkflowLanguage::Wdl,
        WorkflowLanguage::Knime,
    ];

    /// Display name, as used in reports and JSON keys.
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowLanguage::Cwl => "CWL",
            WorkflowLanguage::Nextflow => "Nextflow",
            WorkflowLanguage::Snakemake => "Snakemake",
            WorkflowLanguage::Galaxy => "Galaxy",
            WorkflowLanguage::Wdl => "WDL",
            WorkflowLanguage::Knime => "KNIME",
        }
    }

    /// Identify the workflow language of a file from its name.
    ///
    /// Only the final path component is inspected. Returns `None` for files
    /// that are not workflow files.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let name = name.rsplit(['/', '\\']).next().unwrap_or(name);

        if let Some((_, lang)) = FILE_NAMES.iter().find(|(n, _)| *n == name) {
            return Some(*lang);
        }

        let lower = name.to_ascii_lowercase();
        if let Some((_, lang)) = SUFFIXES
            .iter()
            .find(|(suffix, _)| lower.len() > suffix.len() && lower.ends_with(suffix))
        {
            return Some(*lang);
        }

        let (stem, ext) = lower.rsplit_once('.')?;
        if stem.is_empty() {
            // dotfiles such as ".cwl" have no extension
            return None;
        }
        EXTENSIONS
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, lang)| *lang)
    }

    /// Identify the workflow language of a path, failing for other files.
    pub fn detect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(Self::from_file_name)
            .ok_or_else(|| MudagError::UnsupportedLanguage(path.to_path_buf()))
    }

    /// The comment grammar used when classifying files of this language.
    pub fn comment_style(&self) -> CommentStyle {
        match self {
            WorkflowLanguage::Cwl | WorkflowLanguage::Wdl => CommentStyle::Hash,
            WorkflowLanguage::Nextflow => CommentStyle::CStyle,
            WorkflowLanguage::Snakemake => CommentStyle::Python,
            WorkflowLanguage::Galaxy | WorkflowLanguage::Knime => CommentStyle::Plain,
        }
    }
}

impl fmt::Display for WorkflowLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Check whether a file name belongs to a recognized workflow language.
///
/// ```rust
/// use mudaglib::is_workflow_file;
///
/// assert!(is_workflow_file("Snakefile"));
/// assert!(is_workflow_file("main.nf"));
/// assert!(!is_workflow_file("script.py"));
/// ```
pub fn is_workflow_file(name: &str) -> bool {
    WorkflowLanguage::from_file_name(name).is_some()
}

/// Comment grammar applied by the line classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `#` line comments, `"""` / `'''` docstrings
    Python,
    /// `#` line comments only (shell, YAML, CWL, WDL)
    Hash,
    /// `//` line comments and `/* */` blocks (Nextflow, Groovy, C family)
    CStyle,
    /// No comment syntax (JSON, archives); every non-blank line is code
    Plain,
}

/// Delimiter pair of a block comment or multi-line string.
pub(crate) type Delimiters = (&'static str, &'static str);

const HASH_MARKERS: &[&str] = &["#"];
const SLASH_MARKERS: &[&str] = &["//"];
const TRIPLE_QUOTES: &[Delimiters] = &[("\"\"\"", "\"\"\""), ("'''", "'''")];
const C_BLOCKS: &[Delimiters] = &[("/*", "*/")];

impl CommentStyle {
    /// Choose a grammar for an arbitrary path.
    ///
    /// Workflow files use their language's grammar; any other file is mapped
    /// by extension, falling back to [`CommentStyle::Hash`].
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

        if let Some(lang) = WorkflowLanguage::from_file_name(name) {
            return lang.comment_style();
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        Self::from_extension(&ext)
    }

    /// Choose a grammar from a lowercase extension (without the dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "py" | "pyw" | "pyi" => Self::Python,

            "c" | "h" | "cc" | "cpp" | "hpp" | "java" | "js" | "mjs" | "ts" | "groovy"
            | "gradle" | "rs" | "go" | "kt" | "kts" | "scala" | "swift" => Self::CStyle,

            "json" | "txt" | "md" | "xml" | "csv" | "tsv" => Self::Plain,

            _ => Self::Hash,
        }
    }

    /// Markers that turn the rest of a line into a comment.
    pub(crate) fn line_markers(&self) -> &'static [&'static str] {
        match self {
            Self::Python | Self::Hash => HASH_MARKERS,
            Self::CStyle => SLASH_MARKERS,
            Self::Plain => &[],
        }
    }

    /// Delimiters that open a block comment when they start a line.
    pub(crate) fn block_delimiters(&self) -> &'static [Delimiters] {
        match self {
            Self::Python => TRIPLE_QUOTES,
            Self::CStyle => C_BLOCKS,
            Self::Hash | Self::Plain => &[],
        }
    }

    /// Whether a code line can leave a multi-line string open.
    pub(crate) fn tracks_strings(&self) -> bool {
        matches!(self, Self::Python)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_extensions() {
        assert_eq!(
            WorkflowLanguage::from_file_name("file.cwl"),
            Some(WorkflowLanguage::Cwl)
        );
        assert_eq!(
            WorkflowLanguage::from_file_name("main.nf"),
            Some(WorkflowLanguage::Nextflow)
        );
        assert_eq!(
            WorkflowLanguage::from_file_name("workflow.nextflow"),
            Some(WorkflowLanguage::Nextflow)
        );
        assert_eq!(
            WorkflowLanguage::from_file_name("align.smk"),
            Some(WorkflowLanguage::Snakemake)
        );
        assert_eq!(
            WorkflowLanguage::from_file_name("workflow.rules"),
            Some(WorkflowLanguage::Snakemake)
        );
        assert_eq!(
            WorkflowLanguage::from_file_name("analysis.ga"),
            Some(WorkflowLanguage::Galaxy)
        );
        assert_eq!(
            WorkflowLanguage::from_file_name("workflow.gxwf"),
            Some(WorkflowLanguage::Galaxy)
        );
        assert_eq!(
            WorkflowLanguage::from_file_name("file.wdl"),
            Some(WorkflowLanguage::Wdl)
        );
        assert_eq!(
            WorkflowLanguage::from_file_name("workflow.knwf"),
            Some(WorkflowLanguage::Knime)
        );
    }

    #[test]
    fn test_whole_file_names() {
        assert_eq!(
            WorkflowLanguage::from_file_name("Snakefile"),
            Some(WorkflowLanguage::Snakemake)
        );
        assert_eq!(
            WorkflowLanguage::from_file_name("nextflow.config"),
            Some(WorkflowLanguage::Nextflow)
        );
        assert_eq!(
            WorkflowLanguage::from_file_name("pipelines/rnaseq/Snakefile"),
            Some(WorkflowLanguage::Snakemake)
        );
        // only nextflow.config qualifies among .config files
        assert_eq!(WorkflowLanguage::from_file_name("app.config"), None);
        assert_eq!(WorkflowLanguage::from_file_name("snakefile"), None);
    }

    #[test]
    fn test_knime_suffix() {
        assert_eq!(
            WorkflowLanguage::from_file_name("workflow.workflow.knime"),
            Some(WorkflowLanguage::Knime)
        );
        assert_eq!(WorkflowLanguage::from_file_name("workflow.knime"), None);
    }

    #[test]
    fn test_extension_case_insensitive() {
        assert_eq!(
            WorkflowLanguage::from_file_name("MAIN.NF"),
            Some(WorkflowLanguage::Nextflow)
        );
    }

    #[test]
    fn test_non_workflow_files() {
        assert!(!is_workflow_file("file.py"));
        assert!(!is_workflow_file("file.txt"));
        assert!(!is_workflow_file("file.md"));
        assert!(!is_workflow_file("file"));
        assert!(!is_workflow_file(".cwl"));
        assert!(!is_workflow_file(""));
    }

    #[test]
    fn test_detect_unsupported() {
        let err = WorkflowLanguage::detect("src/script.py").unwrap_err();
        assert!(matches!(err, MudagError::UnsupportedLanguage(_)));
        assert_eq!(
            WorkflowLanguage::detect("dir/tool.cwl").unwrap(),
            WorkflowLanguage::Cwl
        );
    }

    #[test]
    fn test_names_and_serde() {
        let names: Vec<&str> = WorkflowLanguage::ALL.iter().map(|l| l.name()).collect();
        assert_eq!(
            names,
            ["CWL", "Nextflow", "Snakemake", "Galaxy", "WDL", "KNIME"]
        );
        for lang in WorkflowLanguage::ALL {
            let json = serde_json::to_string(&lang).unwrap();
            assert_eq!(json, format!("\"{}\"", lang.name()));
        }
    }

    #[test]
    fn test_comment_style_from_path() {
        assert_eq!(CommentStyle::from_path("Snakefile"), CommentStyle::Python);
        assert_eq!(CommentStyle::from_path("main.nf"), CommentStyle::CStyle);
        assert_eq!(CommentStyle::from_path("tool.cwl"), CommentStyle::Hash);
        assert_eq!(CommentStyle::from_path("wf.ga"), CommentStyle::Plain);
        assert_eq!(CommentStyle::from_path("script.py"), CommentStyle::Python);
        assert_eq!(CommentStyle::from_path("Main.java"), CommentStyle::CStyle);
        assert_eq!(CommentStyle::from_path("run.sh"), CommentStyle::Hash);
        assert_eq!(CommentStyle::from_path("LICENSE"), CommentStyle::Hash);
    }
}
