use thiserror::Error;

/// Errors a frame sink can report back to the driver.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The surface or its context is gone; further draws are pointless
    #[error("render surface lost")]
    SurfaceLost,

    #[error("draw failed: {0}")]
    Draw(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SinkError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::SurfaceLost)
    }
}
