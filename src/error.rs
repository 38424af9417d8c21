// src/error.rs

//! Error types for recipe cooking

use thiserror::Error;

/// Errors raised while cooking a recipe
#[derive(Error, Debug)]
pub enum Error {
    /// The active toolchain cannot satisfy a recipe precondition
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// An option override does not match the resolved schema
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Failed to fetch {url} at tag {tag}: {reason}")]
    SourceFetch {
        url: String,
        tag: String,
        reason: String,
    },

    /// An external build step completed with a non-success status
    #[error("{step} step failed with exit code {status:?}\nstderr: {stderr}")]
    Build {
        step: &'static str,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Packaging failed: {0}")]
    Packaging(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e.to_string())
    }
}

/// Result type for recipe operations
pub type Result<T> = std::result::Result<T, Error>;
