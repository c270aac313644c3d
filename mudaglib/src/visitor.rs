//! Line classifier for workflow and script files.
//!
//! Every line of a file is assigned to exactly one of code, comment or blank.
//! The classifier walks the lines top to bottom and carries a small amount of
//! state between them: whether it is inside an open block comment, or inside
//! a Python multi-line string literal that was opened on a code line.
//!
//! Per line, outside any open block:
//!
//! 1. whitespace-only lines are blank;
//! 2. a shebang (`#!`) on the first line is a comment;
//! 3. a line starting with a line-comment marker is a comment;
//! 4. a line starting with a block opener (`/*`, or a Python triple quote)
//!    is a comment, and opens a block unless the closer is on the same line;
//! 5. everything else is code, even with a trailing comment. A `/*` after
//!    code never opens a block, so `cp data/* out/` stays code.
//!
//! Python triple quotes are treated as docstrings only when nothing precedes
//! them on their opening line. `x = """..."""` is a string literal and
//! therefore code. This is a heuristic, not an expression parser.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use crate::error::MudagError;
use crate::language::{CommentStyle, Delimiters};
use crate::stats::LineCounts;
use crate::Result;

/// State carried from one line to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    Normal,
    /// Inside a block comment; lines are comments until the closer
    BlockComment { close: &'static str },
    /// Inside a multi-line string literal; non-blank lines are code until the closer
    StringBlock { close: &'static str },
}

/// Class assigned to a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Code,
    Comment,
    Blank,
}

/// Classifies lines one at a time and accumulates [`LineCounts`].
#[derive(Debug)]
pub struct LineVisitor {
    style: CommentStyle,
    state: LineState,
    counts: LineCounts,
    line_no: usize,
}

impl LineVisitor {
    /// Create a visitor for the given comment grammar.
    pub fn new(style: CommentStyle) -> Self {
        Self {
            style,
            state: LineState::Normal,
            counts: LineCounts::default(),
            line_no: 0,
        }
    }

    /// Classify one line (without its line terminator) and record it.
    pub fn visit_line(&mut self, line: &str) -> LineKind {
        self.line_no += 1;
        let kind = self.classify(line);
        match kind {
            LineKind::Code => self.counts.code += 1,
            LineKind::Comment => self.counts.comment += 1,
            LineKind::Blank => self.counts.blank += 1,
        }
        kind
    }

    /// Counts gathered so far.
    pub fn counts(&self) -> LineCounts {
        self.counts
    }

    /// Finish and return the counts.
    pub fn finish(self) -> LineCounts {
        self.counts
    }

    fn classify(&mut self, line: &str) -> LineKind {
        let trimmed = line.trim();

        match self.state {
            LineState::BlockComment { close } => {
                if let Some(pos) = trimmed.find(close) {
                    self.state = self.scan_code(&trimmed[pos + close.len()..]);
                }
                return LineKind::Comment;
            }
            LineState::StringBlock { close } => {
                if trimmed.is_empty() {
                    return LineKind::Blank;
                }
                if let Some(pos) = trimmed.find(close) {
                    self.state = self.scan_code(&trimmed[pos + close.len()..]);
                }
                return LineKind::Code;
            }
            LineState::Normal => {}
        }

        if trimmed.is_empty() {
            return LineKind::Blank;
        }

        if self.line_no == 1 && trimmed.starts_with("#!") {
            return LineKind::Comment;
        }

        if self
            .style
            .line_markers()
            .iter()
            .any(|marker| trimmed.starts_with(marker))
        {
            return LineKind::Comment;
        }

        if let Some(((_, close), rest)) = self.block_opener(trimmed) {
            if !rest.contains(close) {
                self.state = LineState::BlockComment { close };
            }
            return LineKind::Comment;
        }

        self.state = self.scan_code(trimmed);
        LineKind::Code
    }

    /// Match a block opener at the start of the line, returning the
    /// delimiters and the text after the opener.
    fn block_opener<'a>(&self, trimmed: &'a str) -> Option<(Delimiters, &'a str)> {
        let body = match self.style {
            // r"""...""" and u"""...""" are still docstrings
            CommentStyle::Python => trimmed
                .strip_prefix(['r', 'R', 'u', 'U'])
                .filter(|rest| rest.starts_with("\"\"\"") || rest.starts_with("'''"))
                .unwrap_or(trimmed),
            _ => trimmed,
        };

        self.style
            .block_delimiters()
            .iter()
            .find(|(open, _)| body.starts_with(open))
            .map(|delims| (*delims, &body[delims.0.len()..]))
    }

    /// Scan a code fragment for a triple-quoted string that is left open at
    /// the end of the line.
    fn scan_code(&self, code: &str) -> LineState {
        if !self.style.tracks_strings() {
            return LineState::Normal;
        }

        let markers = self.style.line_markers();
        let quotes = self.style.block_delimiters();
        let mut rest = code;

        while let Some(c) = rest.chars().next() {
            if markers.iter().any(|m| rest.starts_with(m)) {
                break;
            }

            if let Some((open, close)) = quotes.iter().find(|(open, _)| rest.starts_with(open)) {
                let after = &rest[open.len()..];
                match after.find(close) {
                    Some(pos) => {
                        rest = &after[pos + close.len()..];
                        continue;
                    }
                    None => return LineState::StringBlock { close },
                }
            }

            if c == '"' || c == '\'' {
                match skip_quoted(&rest[1..], c) {
                    Some(after) => {
                        rest = after;
                        continue;
                    }
                    None => break,
                }
            }

            rest = &rest[c.len_utf8()..];
        }

        LineState::Normal
    }
}

/// Skip to just past the closing `quote`, honoring backslash escapes.
fn skip_quoted(text: &str, quote: char) -> Option<&str> {
    let mut chars = text.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == quote {
            return Some(&text[i + c.len_utf8()..]);
        }
    }
    None
}

/// Classify every line of `source` with the given grammar.
///
/// # Example
///
/// ```rust
/// use mudaglib::visitor::parse_string;
/// use mudaglib::CommentStyle;
///
/// let source = "# comment\ncwlVersion: v1.0\n\nclass: Workflow\n";
/// let counts = parse_string(source, CommentStyle::Hash);
/// assert_eq!(counts.code, 2);
/// assert_eq!(counts.comment, 1);
/// assert_eq!(counts.blank, 1);
/// ```
pub fn parse_string(source: &str, style: CommentStyle) -> LineCounts {
    let mut visitor = LineVisitor::new(style);
    for line in source.lines() {
        visitor.visit_line(line);
    }
    visitor.finish()
}

/// Read a file and classify its lines.
///
/// The grammar is chosen from the file name with [`CommentStyle::from_path`].
/// Invalid UTF-8 is decoded lossily rather than rejected.
pub fn parse_file(path: impl AsRef<Path>) -> Result<LineCounts> {
    let path = path.as_ref();
    parse_file_with(path, CommentStyle::from_path(path))
}

/// Read a file and classify its lines with an explicit grammar.
pub fn parse_file_with(path: impl AsRef<Path>, style: CommentStyle) -> Result<LineCounts> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| MudagError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let source: Cow<'_, str> = String::from_utf8_lossy(&bytes);
    Ok(parse_string(&source, style))
}
