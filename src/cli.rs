//! Command-line interface module for dirsort.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Wiring configuration, classification and the organizer together
//! - Self-exclusion of the tool's own files
//! - Mapping run outcomes to exit codes

use crate::config::{ConfigError, Configuration};
use crate::file_organizer::{OrganizeError, Organizer, Summary};
use crate::logging::{DEFAULT_LOG_FILE, LogSettings};
use crate::output::OutputFormatter;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Sort the files of a directory into category folders by extension.
#[derive(Debug, Clone, Parser)]
#[command(name = "dirsort", version, about)]
pub struct Cli {
    /// Configuration file (JSON, or TOML when the name ends in .toml)
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Append-only log file
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Show where files would go without moving anything
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with a non-zero code when the run or any file fails
    #[arg(long)]
    pub strict: bool,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            log_file: self.log_file.clone(),
            console: true,
            debug: self.verbose,
        }
    }
}

/// Errors that stop a run before or instead of organizing.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Organize(#[from] OrganizeError),
}

impl RunError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Organize(OrganizeError::InvalidSource { .. }) => 3,
            Self::Organize(_) => 1,
        }
    }
}

/// Exit code reported when at least one file could not be moved.
pub const EXIT_FILES_FAILED: u8 = 4;

/// Runs one organization pass as configured on the command line.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use dirsort::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["dirsort", "--config", "config.json", "--dry-run"]);
/// match run_cli(&cli) {
///     Ok(summary) => println!("{} files planned", summary.moved_count()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<Summary, RunError> {
    let config = Configuration::load(&cli.config)?;

    let mut organizer = Organizer::new(&config)?.dry_run(cli.dry_run);

    for conflict in organizer.index().conflicts() {
        tracing::warn!(
            "Extension '{}' is listed under both '{}' and '{}'; using '{}'.",
            conflict.extension,
            conflict.overridden,
            conflict.winner,
            conflict.winner
        );
    }

    let own_files = own_files(&cli.config, &cli.log_file);
    for name in self_exclusions(&config.source_directory, &own_files) {
        tracing::debug!("Excluding '{}' from organization", name);
        organizer = organizer.exclude_name(name);
    }

    let summary = organizer.run()?;
    OutputFormatter::report(&summary, cli.dry_run);

    Ok(summary)
}

/// Maps the outcome of a run to the process exit code.
///
/// Without `--strict` the run always exits successfully; failures are only
/// logged.
pub fn exit_code(cli: &Cli, outcome: &Result<Summary, RunError>) -> ExitCode {
    ExitCode::from(exit_status(cli, outcome))
}

fn exit_status(cli: &Cli, outcome: &Result<Summary, RunError>) -> u8 {
    if !cli.strict {
        return 0;
    }
    match outcome {
        Ok(summary) if summary.failed.is_empty() => 0,
        Ok(_) => EXIT_FILES_FAILED,
        Err(e) => e.exit_code(),
    }
}

/// The tool's executable plus its configuration and log files.
fn own_files(config: &Path, log_file: &Path) -> Vec<PathBuf> {
    let mut files = vec![config.to_path_buf(), log_file.to_path_buf()];
    match std::env::current_exe() {
        Ok(exe) => files.push(exe),
        Err(e) => tracing::debug!("Could not resolve own executable: {}", e),
    }
    files
}

/// Names of the given files that live directly inside `source_dir`.
pub fn self_exclusions(source_dir: &Path, files: &[PathBuf]) -> Vec<String> {
    let Ok(source_dir) = fs::canonicalize(source_dir) else {
        return Vec::new();
    };

    files
        .iter()
        .filter(|file| parent_dir(file).is_some_and(|parent| parent == source_dir))
        .filter_map(|file| file.file_name())
        .map(|name| name.to_string_lossy().to_string())
        .collect()
}

fn parent_dir(file: &Path) -> Option<PathBuf> {
    let parent = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::canonicalize(parent).ok()
}
