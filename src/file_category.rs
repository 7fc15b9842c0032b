//! Extension-based file classification.
//!
//! The configuration declares categories with the extensions they collect.
//! This module inverts that table into an [`ExtensionIndex`] so a file name
//! can be classified with a single lookup.
//!
//! # Examples
//!
//! ```
//! use dirsort::file_category::ExtensionIndex;
//! use indexmap::IndexMap;
//!
//! let mut mappings = IndexMap::new();
//! mappings.insert("Documents".to_string(), vec![".pdf".to_string()]);
//!
//! let index = ExtensionIndex::build(&mappings);
//! assert_eq!(index.classify("Report.PDF"), "Documents");
//! assert_eq!(index.classify("README"), "Others");
//! ```

use crate::config::DEFAULT_CATEGORY;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::Path;

/// An extension that was declared under more than one category.
///
/// The later category in declaration order keeps the extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionConflict {
    pub extension: String,
    pub overridden: String,
    pub winner: String,
}

/// Maps lower-cased extensions (with their leading dot) to category names.
#[derive(Debug, Clone)]
pub struct ExtensionIndex {
    extension_map: HashMap<String, String>,
    default_category: String,
    conflicts: Vec<ExtensionConflict>,
}

impl ExtensionIndex {
    /// Inverts a category → extensions table, falling back to `Others`.
    pub fn build(mappings: &IndexMap<String, Vec<String>>) -> Self {
        Self::build_with_default(mappings, DEFAULT_CATEGORY)
    }

    /// Inverts a category → extensions table with a custom fallback category.
    ///
    /// Categories are processed in declaration order; when the same
    /// extension appears twice the later category wins and the override is
    /// kept in [`ExtensionIndex::conflicts`].
    pub fn build_with_default(
        mappings: &IndexMap<String, Vec<String>>,
        default_category: &str,
    ) -> Self {
        let mut index = Self {
            extension_map: HashMap::new(),
            default_category: default_category.to_string(),
            conflicts: Vec::new(),
        };

        for (category, extensions) in mappings {
            for ext in extensions {
                index.add_extension_mapping(ext, category);
            }
        }

        index
    }

    /// Adds a file extension to category mapping.
    pub fn add_extension_mapping(&mut self, ext: &str, category: &str) {
        let trimmed = ext.trim().to_lowercase();
        let key = if trimmed.starts_with('.') {
            trimmed
        } else {
            format!(".{}", trimmed)
        };
        if let Some(previous) = self.extension_map.insert(key.clone(), category.to_string())
            && previous != category
        {
            self.conflicts.push(ExtensionConflict {
                extension: key,
                overridden: previous,
                winner: category.to_string(),
            });
        }
    }

    /// Maps an extension (leading dot included) to its category, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsort::file_category::ExtensionIndex;
    /// use indexmap::IndexMap;
    ///
    /// let mut mappings = IndexMap::new();
    /// mappings.insert("Images".to_string(), vec![".png".to_string()]);
    ///
    /// let index = ExtensionIndex::build(&mappings);
    /// assert_eq!(index.extension_to_category(".PNG"), Some("Images"));
    /// assert_eq!(index.extension_to_category(".gif"), None);
    /// ```
    pub fn extension_to_category(&self, ext: &str) -> Option<&str> {
        self.extension_map
            .get(&ext.to_lowercase())
            .map(String::as_str)
    }

    /// Returns the category for a file name, or the default category.
    pub fn classify(&self, file_name: &str) -> &str {
        let ext = extension_of(file_name);
        if ext.is_empty() {
            return &self.default_category;
        }

        self.extension_to_category(&ext)
            .unwrap_or(self.default_category.as_str())
    }

    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    /// Extensions that were declared under more than one category.
    pub fn conflicts(&self) -> &[ExtensionConflict] {
        &self.conflicts
    }

    pub fn len(&self) -> usize {
        self.extension_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extension_map.is_empty()
    }
}

/// Extracts the lower-cased extension of a file name, dot included.
///
/// Names without a suffix (`README`), dot-files (`.bashrc`) and names
/// ending in a dot yield an empty string.
pub fn extension_of(file_name: &str) -> String {
    match Path::new(file_name).extension() {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy().to_lowercase()),
        _ => String::new(),
    }
}
