use thiserror::Error;

/// Result type for model assembly and validation
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while assembling or validating analysis inputs
#[derive(Error, Debug)]
pub enum Error {
    #[error("Degenerate direction: {0}")]
    DegenerateDirection(String),

    #[error("Invalid bounding box: {0}")]
    InvalidBounds(String),

    #[error("Invalid cross-section: {0}")]
    InvalidCrossSection(String),

    #[error("Missing dimension: {0}")]
    MissingDimension(String),

    #[error("Unsupported host category: {0}")]
    UnsupportedHost(String),

    #[error("Unsupported conduit shape: {0}")]
    UnsupportedShape(String),
}
