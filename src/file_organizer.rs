/// File organization system for moving files into category directories.
///
/// This module scans a source directory once, classifies every regular file
/// by its extension and moves it into the matching category subdirectory.
/// Per-file problems are recorded in the run [`Summary`] and never abort the
/// pass; only an unusable source directory does.
use crate::config::{CompiledExcludes, ConfigError, Configuration};
use crate::file_category::ExtensionIndex;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Represents a single file organization operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// The name of the file that was moved.
    pub file_name: String,
    /// The original path of the file before organization.
    pub original_path: PathBuf,
    /// The new path of the file after organization.
    pub new_path: PathBuf,
    /// The category the file was moved to.
    pub category: String,
}

/// Why a single file could not be organized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The file or its destination folder was not accessible.
    PermissionDenied,
    /// The category folder could not be created.
    DestinationCreateFailed,
    /// The move itself failed.
    MoveFailed,
}

/// A file that was left in place because its move failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub file_name: String,
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of attempting to relocate one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved(Operation),
    Failed(FileFailure),
}

/// Counts and details of one organizer pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Files moved (or, in dry-run mode, that would be moved).
    pub moved: Vec<Operation>,
    /// Regular files left alone because they matched an exclusion.
    pub skipped: usize,
    /// Files whose move failed.
    pub failed: Vec<FileFailure>,
}

impl Summary {
    fn record(&mut self, outcome: MoveOutcome) {
        match outcome {
            MoveOutcome::Moved(operation) => self.moved.push(operation),
            MoveOutcome::Failed(failure) => self.failed.push(failure),
        }
    }

    pub fn moved_count(&self) -> usize {
        self.moved.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Returns true if nothing was moved, skipped or failed.
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty() && self.skipped == 0 && self.failed.is_empty()
    }

    /// Number of moved files per category, sorted by category name.
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for operation in &self.moved {
            *counts.entry(operation.category.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// Errors that abort a whole organizer run.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The source directory is missing or is not a directory.
    #[error("Source directory '{path}' does not exist or is not a directory")]
    InvalidSource { path: PathBuf },
    /// The source directory exists but could not be listed.
    #[error("Failed to read source directory '{path}': {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors from moving one file into its category directory.
#[derive(Debug, Error)]
pub enum MoveError {
    /// Failed to create a category directory.
    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Failed to move a file to its category directory.
    #[error("Failed to move {from} to {to}: {source}")]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MoveError {
    fn io_error(&self) -> &io::Error {
        match self {
            Self::DirectoryCreationFailed { source, .. } | Self::FileMoveFailure { source, .. } => {
                source
            }
        }
    }

    /// Maps the error onto the per-file failure taxonomy.
    pub fn kind(&self) -> FailureKind {
        if self.io_error().kind() == io::ErrorKind::PermissionDenied {
            return FailureKind::PermissionDenied;
        }
        match self {
            Self::DirectoryCreationFailed { .. } => FailureKind::DestinationCreateFailed,
            Self::FileMoveFailure { .. } => FailureKind::MoveFailed,
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Moves single files into category subdirectories.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Moves a file into its category directory within the base path and records the operation.
    ///
    /// The category directory is created when missing; an existing one is
    /// reused. The file keeps its name. If a file with the same name already
    /// exists in the category directory, the outcome is whatever the host
    /// rename does with an existing target.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirsort::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let result = FileOrganizer::move_to_category_with_record(
    ///     Path::new("/path/to/base"),
    ///     Path::new("/path/to/base/report.pdf"),
    ///     "Documents"
    /// );
    ///
    /// match result {
    ///     Ok(op) => println!("Moved {} to {}", op.original_path.display(), op.new_path.display()),
    ///     Err(e) => eprintln!("Organization failed: {}", e),
    /// }
    /// ```
    pub fn move_to_category_with_record(
        base_path: &Path,
        file_path: &Path,
        category_dir_name: &str,
    ) -> Result<Operation, MoveError> {
        let category_path = base_path.join(category_dir_name);

        match fs::create_dir(&category_path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && category_path.is_dir() => {}
            Err(e) => {
                return Err(MoveError::DirectoryCreationFailed {
                    path: category_path,
                    source: e,
                });
            }
        }

        let file_name = file_path.file_name().ok_or_else(|| MoveError::FileMoveFailure {
            from: file_path.to_path_buf(),
            to: category_path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "file has no name component"),
        })?;

        let destination_path = category_path.join(file_name);

        move_file(file_path, &destination_path).map_err(|e| MoveError::FileMoveFailure {
            from: file_path.to_path_buf(),
            to: destination_path.clone(),
            source: e,
        })?;

        Ok(Operation {
            file_name: file_name.to_string_lossy().to_string(),
            original_path: file_path.to_path_buf(),
            new_path: destination_path,
            category: category_dir_name.to_string(),
        })
    }
}

/// Renames `from` to `to`, copying then removing when they live on
/// different filesystems.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            tracing::debug!(
                "Rename across devices for '{}', falling back to copy and remove",
                from.display()
            );
            copy_then_remove(from, to)
        }
        Err(e) => Err(e),
    }
}

/// Copies `from` to `to` and removes the original. If the original cannot be
/// removed the copy is deleted again, so the file never ends up in both places.
fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to)?;
    if let Err(e) = fs::remove_file(from) {
        if let Err(cleanup) = fs::remove_file(to) {
            tracing::warn!("Could not remove copy '{}': {}", to.display(), cleanup);
        }
        return Err(e);
    }
    Ok(())
}

/// Sorts the regular files of one source directory into category folders.
pub struct Organizer {
    source_dir: PathBuf,
    index: ExtensionIndex,
    excludes: CompiledExcludes,
    own_files: HashSet<String>,
    dry_run: bool,
}

impl Organizer {
    /// Builds an organizer from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Malformed` if an exclude pattern is invalid.
    pub fn new(config: &Configuration) -> Result<Self, ConfigError> {
        let index = ExtensionIndex::build_with_default(&config.mappings, &config.default_category);
        let excludes = config.compile_excludes()?;

        Ok(Self {
            source_dir: config.source_directory.clone(),
            index,
            excludes,
            own_files: HashSet::new(),
            dry_run: false,
        })
    }

    /// Silently skip one of the tool's own files by exact name.
    ///
    /// Unlike configured `exclude` patterns these are not counted as skipped,
    /// so a run over an already organized directory stays empty.
    pub fn exclude_name(mut self, name: impl Into<String>) -> Self {
        self.own_files.insert(name.into());
        self
    }

    /// Plan the moves without touching the filesystem.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn index(&self) -> &ExtensionIndex {
        &self.index
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Runs one pass over the source directory.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::InvalidSource` before touching anything if the
    /// source is not an existing directory, and `OrganizeError::ReadDir` if it
    /// cannot be listed. Individual file failures are reported in the summary.
    pub fn run(&self) -> OrganizeResult<Summary> {
        if !self.source_dir.is_dir() {
            let err = OrganizeError::InvalidSource {
                path: self.source_dir.clone(),
            };
            tracing::error!("{}", err);
            return Err(err);
        }

        tracing::info!("Scanning source directory: {}", self.source_dir.display());

        let entries = fs::read_dir(&self.source_dir).map_err(|e| {
            let err = OrganizeError::ReadDir {
                path: self.source_dir.clone(),
                source: e,
            };
            tracing::error!("{}", err);
            err
        })?;

        let mut summary = Summary::default();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in '{}': {}", self.source_dir.display(), e);
                    continue;
                }
            };

            let path = entry.path();
            // Follows symlinks: links to files are moved, links to directories are not
            if !path.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            if self.own_files.contains(&name) {
                continue;
            }
            if self.excludes.is_excluded(&name) {
                tracing::debug!("Skipping excluded file '{}'", name);
                summary.skipped += 1;
                continue;
            }

            let category = self.index.classify(&name);
            summary.record(self.organize_file(&path, &name, category));
        }

        tracing::info!("File organization process completed.");
        Ok(summary)
    }

    fn organize_file(&self, path: &Path, name: &str, category: &str) -> MoveOutcome {
        if self.dry_run {
            tracing::info!("Would move: '{}' -> '{}/'", name, category);
            return MoveOutcome::Moved(Operation {
                file_name: name.to_string(),
                original_path: path.to_path_buf(),
                new_path: self.source_dir.join(category).join(name),
                category: category.to_string(),
            });
        }

        match FileOrganizer::move_to_category_with_record(&self.source_dir, path, category) {
            Ok(operation) => {
                tracing::info!("Moved: '{}' -> '{}/'", name, category);
                MoveOutcome::Moved(operation)
            }
            Err(e) => {
                let kind = e.kind();
                match kind {
                    FailureKind::PermissionDenied => tracing::warn!(
                        "Permission denied to move '{}'. The file might be in use. ({})",
                        name,
                        e
                    ),
                    _ => tracing::error!("Failed to move '{}'. Error: {}", name, e),
                }
                MoveOutcome::Failed(FileFailure {
                    file_name: name.to_string(),
                    kind,
                    message: e.to_string(),
                })
            }
        }
    }
}
