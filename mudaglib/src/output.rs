//! Report rendering: table, CSV and JSON.
//!
//! All renderers consume a [`ScanResult`] and write to any [`io::Write`].

use std::io::{self, Write};
use std::str::FromStr;

use console::{measure_text_width, Style};
use serde_json::json;

use crate::stats::{LineCounts, ScanResult};
use crate::Result;

/// Widest the file path column is allowed to grow.
const MAX_PATH_WIDTH: usize = 60;
const NUM_WIDTH: usize = 9;

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl OutputFormat {
    /// Names accepted by [`FromStr`].
    pub const NAMES: [&'static str; 3] = ["table", "csv", "json"];

    /// Render `result` in this format.
    pub fn write(self, result: &ScanResult, out: &mut dyn Write) -> Result<()> {
        match self {
            OutputFormat::Table => format_table(result, out),
            OutputFormat::Csv => format_csv(result, out),
            OutputFormat::Json => format_json(result, out),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "unknown format '{other}' (expected one of: {})",
                Self::NAMES.join(", ")
            )),
        }
    }
}

/// Truncate a name to fit within max_len, adding ".." prefix if needed
fn truncate_name(name: &str, max_len: usize) -> String {
    if measure_text_width(name) <= max_len {
        return name.to_string();
    }
    let keep = max_len.saturating_sub(2);
    let tail: String = {
        let chars: Vec<char> = name.chars().collect();
        chars[chars.len().saturating_sub(keep)..].iter().collect()
    };
    format!("..{tail}")
}

fn number_cells(counts: &LineCounts) -> String {
    format!(
        "{:>w$} {:>w$} {:>w$} {:>w$}",
        counts.code,
        counts.comment,
        counts.blank,
        counts.total(),
        w = NUM_WIDTH
    )
}

/// Render a human-readable table.
///
/// Layout: file count, blank line, header, separator, one numbered row per
/// file, separator, `TOTAL` row, then a per-language breakdown.
pub fn format_table(result: &ScanResult, out: &mut dyn Write) -> Result<()> {
    let header_style = Style::new().bold();

    writeln!(out, "Total files analyzed: {}", result.len())?;
    writeln!(out)?;

    if result.is_empty() {
        writeln!(out, "No workflow files found.")?;
        return Ok(());
    }

    let no_width = result.len().to_string().len().max(3) + 2;
    let path_width = result
        .files
        .keys()
        .map(|p| measure_text_width(p))
        .chain(std::iter::once("File Path".len()))
        .max()
        .unwrap_or(0)
        .min(MAX_PATH_WIDTH);

    let header = format!(
        "{:<nw$}{:<pw$} {:>w$} {:>w$} {:>w$} {:>w$}",
        "No.",
        "File Path",
        "Code",
        "Comment",
        "Blank",
        "Total",
        nw = no_width,
        pw = path_width,
        w = NUM_WIDTH
    );
    let separator = "-".repeat(measure_text_width(&header));

    writeln!(out, "{}", header_style.apply_to(&header))?;
    writeln!(out, "{separator}")?;

    for (index, (path, counts)) in result.files.iter().enumerate() {
        writeln!(
            out,
            "{:<nw$}{:<pw$} {}",
            index + 1,
            truncate_name(path, path_width),
            number_cells(counts),
            nw = no_width,
            pw = path_width
        )?;
    }

    writeln!(out, "{separator}")?;
    let total_row = format!(
        "{:<nw$}{:<pw$} {}",
        "",
        "TOTAL",
        number_cells(&result.totals()),
        nw = no_width,
        pw = path_width
    );
    writeln!(out, "{}", header_style.apply_to(total_row))?;

    let languages: Vec<_> = result
        .metadata
        .workflow_languages
        .iter()
        .filter(|(_, stats)| stats.files > 0)
        .collect();
    if !languages.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", header_style.apply_to("Workflow languages:"))?;
        for (language, stats) in languages {
            writeln!(
                out,
                "  {:<10} {:>5} files {}",
                language.name(),
                stats.files,
                number_cells(&stats.lines)
            )?;
        }
    }

    if !result.unreadable.is_empty() {
        writeln!(out)?;
        writeln!(out, "Unreadable files skipped: {}", result.unreadable.len())?;
    }

    Ok(())
}

/// Quote a CSV field, doubling embedded quotes.
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Render CSV: a header, one row per file, then a `TOTAL` row.
pub fn format_csv(result: &ScanResult, out: &mut dyn Write) -> Result<()> {
    writeln!(
        out,
        "File Path,Code Lines,Comment Lines,Blank Lines,Total Lines"
    )?;

    let format_row = |name: &str, counts: &LineCounts| -> String {
        format!(
            "{},{},{},{},{}",
            csv_field(name),
            counts.code,
            counts.comment,
            counts.blank,
            counts.total()
        )
    };

    for (path, counts) in &result.files {
        writeln!(out, "{}", format_row(path, counts))?;
    }
    writeln!(out, "{}", format_row("TOTAL", &result.totals()))?;
    Ok(())
}

/// Render pretty-printed JSON with `summary` and `files` sections.
pub fn format_json(result: &ScanResult, out: &mut dyn Write) -> Result<()> {
    let totals = result.totals();
    let mut summary = json!({
        "total_files": result.len(),
        "total_code": totals.code,
        "total_comment": totals.comment,
        "total_blank": totals.blank,
        "total_lines": totals.total(),
        "workflow_languages": result.metadata.workflow_languages,
    });
    if !result.unreadable.is_empty() {
        summary["unreadable_files"] = json!(result.unreadable);
    }

    let report = json!({
        "summary": summary,
        "files": result.files,
    });

    serde_json::to_writer_pretty(&mut *out, &report).map_err(io::Error::from)?;
    writeln!(out)?;
    Ok(())
}
