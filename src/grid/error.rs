use image::{ColorType, ImageError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that may occur when building a `PixelGrid`.
#[derive(Error, Debug)]
pub enum GridError {
    /// The image path does not exist or cannot be decoded.
    #[error("cannot load image {path:?}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    /// The image has fewer than 3 channels.
    #[error("expected at least 3 channels, found {found}")]
    MalformedChannel { found: u8 },

    /// Only 8-bit channels are supported.
    #[error("unsupported sample depth: {0:?}")]
    UnsupportedDepth(ColorType),

    /// The raw sample buffer does not match the grid dimensions.
    #[error("expected {expected} samples, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
