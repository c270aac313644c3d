//! # mudaglib
//!
//! A lines of code counter for scientific workflow files.
//!
//! ## Overview
//!
//! Research software repositories often mix ordinary code with pipeline
//! descriptions. This library finds the pipeline files and counts their
//! code, comment and blank lines with language-aware comment detection:
//!
//! - **CWL** and **WDL**: `#` comments
//! - **Nextflow**: `//` and `/* */` comments
//! - **Snakemake**: `#` comments and standalone `"""` / `'''` docstrings
//! - **Galaxy** and **KNIME**: no comment syntax
//!
//! A shebang on the first line always counts as a comment.
//!
//! ## Features
//!
//! - **Workflow detection**: by extension (`.cwl`, `.nf`, `.smk`, `.ga`,
//!   `.wdl`, `.knwf`, ...) or by whole file name (`Snakefile`, `nextflow.config`)
//! - **Ignore files**: glob patterns from `.mudagignore` prune the scan
//! - **Best effort**: unreadable files are reported and skipped, never fatal
//! - **Pure data types**: results serialize with serde; renderers are optional
//!
//! ## Example
//!
//! ```rust
//! use mudaglib::{count_lines, is_workflow_file, scan_directory, WorkflowLanguage};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! assert!(is_workflow_file("Snakefile"));
//!
//! let dir = tempdir().unwrap();
//! fs::create_dir(dir.path().join("node_modules")).unwrap();
//! fs::write(dir.path().join("node_modules/dep.cwl"), "class: Workflow\n").unwrap();
//! fs::write(dir.path().join(".mudagignore"), "node_modules/\n").unwrap();
//! let main_nf = dir.path().join("main.nf");
//! fs::write(&main_nf, "// entry point\nworkflow {\n}\n").unwrap();
//!
//! // Count a single file
//! let counts = count_lines(&main_nf).unwrap();
//! assert_eq!(counts.code, 2);
//! assert_eq!(counts.comment, 1);
//!
//! // Scan a directory, honoring .mudagignore
//! let result = scan_directory(dir.path()).unwrap();
//! assert_eq!(result.len(), 1);
//! assert_eq!(result.language(WorkflowLanguage::Nextflow).files, 1);
//! assert_eq!(result.language(WorkflowLanguage::Cwl).files, 0);
//! ```

pub mod counter;
pub mod error;
pub mod filter;
pub mod language;
pub mod output;
pub mod stats;
pub mod visitor;

pub use counter::{
    count_lines, count_workflow_file, scan_directory, scan_directory_with, ScanOptions,
};
pub use error::MudagError;
pub use filter::{IgnorePatterns, IGNORE_FILE_NAME};
pub use language::{is_workflow_file, CommentStyle, WorkflowLanguage};
pub use output::{format_csv, format_json, format_table, OutputFormat};
pub use stats::{LanguageStats, LineCounts, ScanMetadata, ScanResult, METADATA_KEY};
pub use visitor::{parse_file, parse_string, LineKind, LineVisitor};

/// Result type for mudaglib operations
pub type Result<T> = std::result::Result<T, MudagError>;
