//! Error types for parsing, clustering and rendering a city.

use thiserror::Error;

/// Errors that can occur while planning districts.
///
/// Duplicate-coordinate collisions are not errors: the deduplicator resolves
/// them in place. Everything listed here is surfaced to the caller as-is and
/// no partial result accompanies it.
#[derive(Error, Debug)]
pub enum CaveError {
    /// The city description could not be parsed.
    #[error("Malformed input at line {line}: {message}")]
    MalformedInput { line: usize, message: String },

    /// The requested district count is outside `[1, available]`.
    #[error("Invalid target district count {requested}: expected 1..={available}")]
    InvalidTargetCount { requested: usize, available: usize },

    /// A district was constructed without any houses.
    ///
    /// Rejected at construction so that the tavern/house ratio used by the
    /// scorer is always defined.
    #[error("District {id} has no houses")]
    DegenerateDistrict { id: usize },

    /// The plot image could not be encoded or written.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl CaveError {
    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            message: message.into(),
        }
    }
}

/// Result type alias for cave operations.
pub type Result<T> = std::result::Result<T, CaveError>;
