//! Configuration loading for the organizer.
//!
//! The configuration names the directory to sort and the category table that
//! drives classification. JSON is the primary format; a file ending in
//! `.toml` is parsed as TOML instead.
//!
//! # Configuration File Format
//!
//! ```json
//! {
//!   "source_directory": "/home/user/Downloads",
//!   "mappings": {
//!     "Documents": [".pdf", ".txt"],
//!     "Images": [".png", ".jpg"]
//!   },
//!   "exclude": ["*.part"],
//!   "default_category": "Others"
//! }
//! ```
//!
//! `mappings`, `exclude` and `default_category` are optional. Unknown
//! top-level fields are ignored.

use glob::Pattern;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Category used for files whose extension is not mapped.
pub const DEFAULT_CATEGORY: &str = "Others";

/// Errors that can occur while loading the configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found at '{0}'")]
    NotFound(PathBuf),
    /// Invalid syntax, missing required field or rejected value.
    #[error("Malformed configuration: {0}")]
    Malformed(String),
    /// IO error while reading configuration.
    #[error("IO error reading configuration: {0}")]
    Io(String),
}

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Picks the format from the file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// On-disk shape of the configuration, before validation.
#[derive(Debug, Deserialize)]
struct RawConfig {
    source_directory: Option<PathBuf>,
    #[serde(default)]
    mappings: IndexMap<String, Vec<String>>,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    default_category: Option<String>,
}

/// Validated configuration for one run.
///
/// `mappings` keeps the declaration order of the file, which decides which
/// category wins when an extension is listed twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub source_directory: PathBuf,
    pub mappings: IndexMap<String, Vec<String>>,
    pub exclude: Vec<String>,
    pub default_category: String,
}

impl Configuration {
    /// Creates a configuration with no mappings, for the given source directory.
    pub fn new(source_directory: impl Into<PathBuf>) -> Self {
        Self {
            source_directory: source_directory.into(),
            mappings: IndexMap::new(),
            exclude: Vec::new(),
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }

    /// Adds a category with its extensions, keeping declaration order.
    pub fn with_mapping<I, S>(mut self, category: &str, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mappings.insert(
            category.to_string(),
            extensions.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Load configuration from a file.
    ///
    /// Emits an INFO record on success and an ERROR record on failure; the
    /// caller decides whether to abort.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file does not exist.
    /// Returns `ConfigError::Malformed` if parsing or validation fails.
    /// Returns `ConfigError::Io` if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match Self::load_from_file(path) {
            Ok(config) => {
                tracing::info!(
                    "Configuration loaded successfully from '{}'.",
                    path.display()
                );
                Ok(config)
            }
            Err(ConfigError::NotFound(missing)) => {
                tracing::error!(
                    "Configuration file not found at '{}'. Please create it.",
                    missing.display()
                );
                Err(ConfigError::NotFound(missing))
            }
            Err(e) => {
                tracing::error!("Error loading configuration from '{}': {}", path.display(), e);
                Err(e)
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Io(e.to_string()),
        })?;

        Self::from_str_with_format(&content, ConfigFormat::from_path(path))
    }

    /// Parses and validates configuration text in the given format.
    pub fn from_str_with_format(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let raw: RawConfig = match format {
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::Malformed(format!("invalid JSON: {}", e)))?,
            ConfigFormat::Toml => toml::from_str(content)
                .map_err(|e| ConfigError::Malformed(format!("invalid TOML: {}", e)))?,
        };

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let source_directory = raw.source_directory.ok_or_else(|| {
            ConfigError::Malformed("missing required field 'source_directory'".to_string())
        })?;

        let default_category = raw
            .default_category
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        validate_category_name(&default_category)?;

        let mut mappings = IndexMap::with_capacity(raw.mappings.len());
        for (category, extensions) in raw.mappings {
            validate_category_name(&category)?;
            let mut normalized = Vec::with_capacity(extensions.len());
            for ext in &extensions {
                match normalize_extension(ext) {
                    Some(ext) => normalized.push(ext),
                    None => tracing::warn!(
                        "Ignoring extension '{}' under '{}': it can never match a file suffix such as \".pdf\".",
                        ext,
                        category
                    ),
                }
            }
            mappings.insert(category, normalized);
        }

        // Reject bad patterns at load time rather than mid-run
        for pattern in &raw.exclude {
            Pattern::new(pattern).map_err(|e| {
                ConfigError::Malformed(format!("invalid exclude pattern '{}': {}", pattern, e))
            })?;
        }

        Ok(Self {
            source_directory,
            mappings,
            exclude: raw.exclude,
            default_category,
        })
    }

    /// Compile the configured exclude patterns.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Malformed` if a pattern is not a valid glob.
    pub fn compile_excludes(&self) -> Result<CompiledExcludes, ConfigError> {
        CompiledExcludes::new(&self.exclude)
    }
}

/// Category names become directory names under the source directory, so
/// they must name a single child path component.
fn validate_category_name(name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ConfigError::Malformed(format!(
            "invalid category name '{}': must be a single folder name",
            name
        )));
    }
    Ok(())
}

/// Lower-cases an extension and makes sure it carries its leading dot.
///
/// Returns `None` for entries no file name can produce: empty ones and
/// compound suffixes like `.tar.gz`, since only the last suffix is compared.
pub fn normalize_extension(ext: &str) -> Option<String> {
    let trimmed = ext.trim();
    let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);
    if bare.is_empty() || bare.contains(['.', '/', '\\']) {
        return None;
    }
    Some(format!(".{}", bare.to_lowercase()))
}

/// Compiled `exclude` glob patterns.
///
/// Matching is done against the bare file name, never the full path.
#[derive(Debug, Clone, Default)]
pub struct CompiledExcludes {
    patterns: Vec<Pattern>,
}

impl CompiledExcludes {
    fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|e| {
                    ConfigError::Malformed(format!("invalid exclude pattern '{}': {}", pattern, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Check if a file name is excluded from organization.
    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.matches(file_name))
    }
}
