//! Error type for loading guide data.
//!
//! Only the loading edge can fail. Once a guide is on screen every problem
//! (unknown slug, empty guide, missing scroll target) is absorbed into a
//! neutral display state rather than reported.

use thiserror::Error;

/// Failures raised while reading guides from disk.
#[derive(Error, Debug)]
pub enum GuideError {
    /// The data or markdown file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The data file is not a JSON array of guide groups.
    #[error("Invalid guide data: {0}")]
    Json(#[from] serde_json::Error),

    /// The markdown grammar could not be loaded or the document not parsed.
    #[error("Failed to parse markdown: {0}")]
    Parse(String),
}

/// Convenience alias for results carrying a [`GuideError`].
pub type Result<T> = std::result::Result<T, GuideError>;
