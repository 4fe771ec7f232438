//! Error types shared by the extractor, cleaner and visualizer.

use std::path::PathBuf;

/// Result type alias for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Dataset root, `frames` directory or annotation file is absent.
    #[error("path not found: {}", .0.display())]
    MissingPath(PathBuf),

    /// A frame record or frame image could not be decoded.
    #[error("malformed record {}: {reason}", path.display())]
    MalformedRecord { path: PathBuf, reason: String },

    /// The annotation file is not a readable MAT file or has an unexpected shape.
    #[error("malformed annotation: {0}")]
    MalformedAnnotation(String),

    /// A `subject_*` or `sequence_*` directory without a numeric suffix.
    #[error("invalid directory name: {}", .0.display())]
    InvalidDirectoryName(PathBuf),

    /// Nothing to process under the given root.
    #[error("nothing found under {}: {what}", root.display())]
    EmptyDiscovery { root: PathBuf, what: String },

    #[error("visualization error: {0}")]
    Visualization(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl DatasetError {
    pub(crate) fn annotation(msg: impl Into<String>) -> Self {
        Self::MalformedAnnotation(msg.into())
    }
}
