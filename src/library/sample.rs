//! Sample source files shown on the Fundamentals pages.
//!
//! A sample is an ordinary file in the Fundamentals directory, read at
//! render time. Names are validated before touching the filesystem.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tokio::fs;

/// Default upper bound on a sample's size (256 KiB)
pub const DEFAULT_MAX_SAMPLE_BYTES: u64 = 256 * 1024;

/// Errors raised while loading a sample
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("Invalid sample name: {0}")]
    InvalidName(String),

    #[error("Sample not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Sample too large: {actual} > {limit} bytes")]
    TooLarge { actual: u64, limit: u64 },

    #[error("Sample is not valid UTF-8: {}", .path.display())]
    NotText { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A loaded sample ready for display
#[derive(Debug, Clone, Serialize)]
pub struct SampleSource {
    /// File name within the samples directory
    pub name: String,

    /// Language hint derived from the extension
    pub language: String,

    /// Raw source text
    pub code: String,
}

impl SampleSource {
    /// Load `name` from `dir`, refusing anything larger than `max_bytes`
    pub async fn load(dir: &Path, name: &str, max_bytes: u64) -> Result<Self, SampleError> {
        validate_name(name)?;

        let path = dir.join(name);
        let meta = match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => meta,
            _ => return Err(SampleError::NotFound { path }),
        };

        if meta.len() > max_bytes {
            return Err(SampleError::TooLarge {
                actual: meta.len(),
                limit: max_bytes,
            });
        }

        let bytes = fs::read(&path).await?;
        let code = String::from_utf8(bytes).map_err(|_| SampleError::NotText { path: path.clone() })?;

        Ok(Self {
            name: name.to_string(),
            language: language_for(name),
            code,
        })
    }
}

/// Reject names that could escape the samples directory
fn validate_name(name: &str) -> Result<(), SampleError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');

    if invalid {
        return Err(SampleError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Language hint for syntax classes (`language-<ext>`)
pub fn language_for(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_else(|| "plaintext".to_string())
}
