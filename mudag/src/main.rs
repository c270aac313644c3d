//! # mudag
//!
//! A CLI tool for analyzing research software repositories with a focus on
//! scientific workflow languages.
//!
//! ## Overview
//!
//! mudag is built on top of mudaglib. It walks a directory, picks out CWL,
//! Nextflow, Snakemake, Galaxy, WDL and KNIME files, and reports their code,
//! comment and blank lines per file and per language.
//!
//! ## Usage
//!
//! ```bash
//! # Scan the current directory
//! mudag
//!
//! # Scan a repository and write JSON to a file
//! mudag path/to/repo --format json --output report.json
//!
//! # Use a different ignore file, plus extra patterns
//! mudag . --ignore-file ci/.mudagignore --exclude "work/" --exclude "*.test.nf"
//!
//! # Show what is being ignored
//! mudag . -vv
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use mudaglib::{scan_directory_with, OutputFormat, ScanOptions};
use tracing::Level;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("mudag")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Count code, comment and blank lines in scientific workflow files")
        .arg(
            Arg::new("directory")
                .help("Directory to analyze (defaults to current directory)")
                .default_value("."),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_parser(OutputFormat::NAMES)
                .default_value("table")
                .help("Output format"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Write the report to a file instead of stdout"),
        )
        .arg(
            Arg::new("ignore-file")
                .long("ignore-file")
                .value_parser(clap::value_parser!(PathBuf))
                .conflicts_with("no-ignore-file")
                .help("Read ignore patterns from this file (default: <DIRECTORY>/.mudagignore)"),
        )
        .arg(
            Arg::new("no-ignore-file")
                .long("no-ignore-file")
                .action(ArgAction::SetTrue)
                .help("Do not read any ignore file"),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .action(ArgAction::Append)
                .help("Ignore paths matching pattern (can be specified multiple times)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .conflicts_with("quiet")
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Only log errors"),
        )
}

/// Map -v/-q flags to a log level
fn log_level(matches: &ArgMatches) -> Level {
    if matches.get_flag("quiet") {
        return Level::ERROR;
    }
    match matches.get_count("verbose") {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Build scan options from matches
fn build_options(matches: &ArgMatches) -> ScanOptions {
    let mut options = ScanOptions::new();

    if matches.get_flag("no-ignore-file") {
        options = options.no_ignore_file();
    } else if let Some(path) = matches.get_one::<PathBuf>("ignore-file") {
        options = options.ignore_file(path);
    }

    if let Some(excludes) = matches.get_many::<String>("exclude") {
        options = options.exclude_many(excludes.cloned());
    }

    options
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let directory = matches
        .get_one::<String>("directory")
        .map(|s| s.as_str())
        .unwrap_or(".");
    let format: OutputFormat = matches
        .get_one::<String>("format")
        .map(|s| s.parse::<OutputFormat>())
        .transpose()
        .map_err(anyhow::Error::msg)?
        .unwrap_or_default();

    let result = scan_directory_with(directory, &build_options(matches))?;

    match matches.get_one::<PathBuf>("output") {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create output file '{}'", path.display()))?;
            let mut out = BufWriter::new(file);
            format.write(&result, &mut out)?;
            out.flush()?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            format.write(&result, &mut out)?;
            out.flush()?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(log_level(&matches));

    // keep styling codes out of report files
    if matches.contains_id("output") {
        console::set_colors_enabled(false);
    }

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
