use thiserror::Error;

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a pass
#[derive(Error, Debug)]
pub enum Error {
    #[error("No usable placement surface: {0}")]
    NoPlacementSurface(String),

    #[error("Surface normal evaluation failed: {0}")]
    SurfaceNormal(String),

    #[error("Model error: {0}")]
    CoreError(#[from] provoid_core::Error),
}
