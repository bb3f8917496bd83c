//! Content index builder.
//!
//! Scans one directory and derives a [`ContentEntry`] per item. The listing
//! is rebuilt on every call; nothing is cached between renders.

use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

use super::entry::{ContentEntry, EntryKind};

/// Names that refer to the directory itself or its parent
const RESERVED_NAMES: &[&str] = &[".", ".."];

/// Errors raised while building an index
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Directory not found: {}", .path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed to read directory {}: {source}", .path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Metadata unavailable for {}: {reason}", .path.display())]
    MetadataUnavailable { path: PathBuf, reason: String },
}

/// Ordering applied to the listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexOrder {
    /// Whatever order the filesystem enumerates in
    Filesystem,

    /// Byte-wise by name
    #[default]
    Alphabetical,
}

/// How entries are filtered, described and ordered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexOptions {
    /// Per-entry metadata file name (default: Readme.md)
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    /// 1-based line of the metadata file used as description (default: 3)
    #[serde(default = "default_description_line")]
    pub description_line: usize,

    /// Listing order (default: alphabetical)
    #[serde(default)]
    pub order: IndexOrder,

    /// Glob patterns for names to leave out
    #[serde(default)]
    pub ignore: Vec<String>,
}

fn default_metadata_file() -> String {
    "Readme.md".to_string()
}
fn default_description_line() -> usize {
    3
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            metadata_file: default_metadata_file(),
            description_line: default_description_line(),
            order: IndexOrder::default(),
            ignore: Vec::new(),
        }
    }
}

impl IndexOptions {
    /// Check whether a name is reserved or matches an ignore pattern
    pub fn is_excluded(&self, name: &str) -> bool {
        if RESERVED_NAMES.contains(&name) {
            return true;
        }
        self.ignore
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .any(|pattern| pattern.matches(name))
    }
}

/// Build the index for `dir`.
///
/// Only a missing or unreadable directory is fatal. Metadata problems fall
/// back to the default description.
pub async fn build_index(dir: &Path, options: &IndexOptions) -> Result<Vec<ContentEntry>, IndexError> {
    match fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => {}
        _ => {
            return Err(IndexError::DirectoryNotFound {
                path: dir.to_path_buf(),
            })
        }
    }

    let unreadable = |source| IndexError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    let mut listing = fs::read_dir(dir).await.map_err(unreadable)?;

    while let Some(item) = listing.next_entry().await.map_err(unreadable)? {
        let Some(name) = item.file_name().to_str().map(str::to_string) else {
            debug!(path = %item.path().display(), "Skipping entry with non UTF-8 name");
            continue;
        };

        if options.is_excluded(&name) {
            continue;
        }

        let path = item.path();
        // Follows symlinks so a linked project still counts as a directory
        let kind = match fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => EntryKind::Directory,
            _ => EntryKind::File,
        };

        let mut entry = ContentEntry::new(&name, &path, kind);
        match read_description(&path, options).await {
            Ok(description) => entry = entry.with_description(description),
            Err(e) => debug!("{}", e),
        }
        entries.push(entry);
    }

    if options.order == IndexOrder::Alphabetical {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
    }

    debug!(dir = %dir.display(), count = entries.len(), "Built content index");
    Ok(entries)
}

/// Read the configured line of `<entry>/<metadata_file>`
async fn read_description(entry_path: &Path, options: &IndexOptions) -> Result<String, IndexError> {
    let path = entry_path.join(&options.metadata_file);
    let unavailable = |reason: String| IndexError::MetadataUnavailable {
        path: path.clone(),
        reason,
    };

    let content = fs::read_to_string(&path)
        .await
        .map_err(|e| unavailable(e.to_string()))?;

    let line = options
        .description_line
        .checked_sub(1)
        .and_then(|idx| content.lines().nth(idx))
        .ok_or_else(|| {
            unavailable(format!(
                "fewer than {} lines",
                options.description_line
            ))
        })?;

    Ok(line.trim().to_string())
}
