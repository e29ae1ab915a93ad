//! Error types for the pdf-packet library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the pdf-packet library
#[derive(Error, Debug)]
pub enum Error {
    /// No PDF files in the chosen directory
    #[error("no PDF files found in {}", .0.display())]
    NoInput(PathBuf),

    /// A source document could not be opened
    #[error("failed to open source PDF {}: {source}", .path.display())]
    DocumentOpen {
        path: PathBuf,
        source: lopdf::Error,
    },

    /// A stamped intermediate could not be opened at merge time
    #[error("failed to open stamped intermediate {}: {source}", .path.display())]
    ArtifactOpen {
        path: PathBuf,
        source: lopdf::Error,
    },

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// File not found
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid glob pattern
    #[error("invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// General error
    #[error("{0}")]
    General(String),
}
