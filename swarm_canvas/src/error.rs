use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the canvas.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("invalid canvas configuration: {0}")]
    InvalidConfig(String),
    #[error("segment endpoints must be finite")]
    NonFiniteCoordinate,
    #[error("failed to load image {path:?}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to export canvas to {path:?}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("rasterizer error: {0}")]
    Backend(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("cannot summarize an empty population")]
    EmptyPopulation,
}

#[derive(Debug, Error)]
pub enum SwarmError {
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}
