//! Content entries derived from a directory listing.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Kind of filesystem item behind an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Subdirectory (a self-contained project)
    Directory,

    /// Plain file (a sample source file)
    File,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Directory => write!(f, "dir"),
            EntryKind::File => write!(f, "file"),
        }
    }
}

/// One indexed item, built fresh for every render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    /// File name as listed in the directory
    pub name: String,

    /// Full path of the item
    pub path: PathBuf,

    /// Display title (capitalized name)
    pub title: String,

    /// Summary line from the metadata file, or a generated default
    pub description: String,

    /// Directory or file
    pub kind: EntryKind,
}

impl ContentEntry {
    /// Create an entry with the generated default description
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        let name = name.into();
        Self {
            title: capitalize(&name),
            description: default_description(&name),
            path: path.into(),
            name,
            kind,
        }
    }

    /// Replace the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Upper-case the first character, leaving the rest untouched
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Description used when no metadata file supplies one
pub fn default_description(name: &str) -> String {
    format!("This is a sample {} project.", name)
}
