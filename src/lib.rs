//! dirsort - sort a directory's files into category folders by extension
//!
//! This library loads a category → extensions table from a JSON or TOML
//! configuration file, inverts it into an extension index, and moves every
//! regular file of one source directory into the sub-folder of its category.
//! Files with unmapped extensions go to a fallback category (`Others`).

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod output;

pub use config::{CompiledExcludes, ConfigError, Configuration, DEFAULT_CATEGORY};
pub use file_category::{ExtensionConflict, ExtensionIndex};
pub use file_organizer::{
    FailureKind, FileFailure, FileOrganizer, MoveOutcome, Operation, OrganizeError, Organizer,
    Summary,
};

pub use cli::{Cli, RunError, run_cli};
