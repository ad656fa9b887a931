//! Errors

/// Result type used across the crate
pub type RasterResult<T> = Result<T, RasterError>;

/// Errors returned by the scheduler and span futures
#[derive(thiserror::Error, Debug)]
pub enum RasterError {
    /// A worker thread could not be started
    #[error("failed to spawn raster worker: {0}")]
    Spawn(#[from] std::io::Error),

    /// The task was dropped before it ran, the scheduler shut down
    #[error("raster task canceled before it ran")]
    Canceled,

    /// Waiting for the spans took longer than allowed
    #[error("timed out waiting for raster task")]
    Timeout,

    /// Invalid scheduler configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl RasterError {
    /// Build a [`RasterError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
