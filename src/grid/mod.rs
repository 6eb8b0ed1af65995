use image::{DynamicImage, RgbImage, RgbaImage};
use log::info;
use std::path::Path;

pub use error::GridError;

mod error;

/// The number of color channels in every `PixelGrid`.
pub const CHANNELS: usize = 3;

/// An immutable `rows x cols x 3` array of 8-bit RGB samples, stored
/// interleaved in raster order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    rows: usize,
    cols: usize,
    samples: Vec<u8>,
}

impl PixelGrid {
    /// Creates a grid from interleaved RGB samples in raster order.
    ///
    /// Returns `GridError::DimensionMismatch` if `samples` does not hold
    /// exactly `rows * cols * 3` values.
    pub fn from_raw(rows: usize, cols: usize, samples: Vec<u8>) -> Result<PixelGrid, GridError> {
        let expected = rows * cols * CHANNELS;
        if samples.len() != expected {
            return Err(GridError::DimensionMismatch {
                expected,
                actual: samples.len(),
            });
        }
        Ok(PixelGrid {
            rows,
            cols,
            samples,
        })
    }

    /// Creates a grid where every pixel has the given value.
    pub fn filled(rows: usize, cols: usize, pixel: [u8; CHANNELS]) -> PixelGrid {
        let samples = pixel
            .iter()
            .copied()
            .cycle()
            .take(rows * cols * CHANNELS)
            .collect();
        PixelGrid {
            rows,
            cols,
            samples,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the number of pixels in the grid.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the value of channel `chan` of the pixel at raster position `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` or `chan` is out of range.
    pub fn sample(&self, idx: usize, chan: usize) -> i32 {
        assert!(chan < CHANNELS);
        assert!(idx < self.len());
        self.samples[idx * CHANNELS + chan].into()
    }

    /// Returns the three channel values of the pixel at raster position `idx`.
    pub fn pixel(&self, idx: usize) -> [i32; CHANNELS] {
        [
            self.sample(idx, 0),
            self.sample(idx, 1),
            self.sample(idx, 2),
        ]
    }
}

impl From<&RgbImage> for PixelGrid {
    fn from(image: &RgbImage) -> PixelGrid {
        PixelGrid {
            rows: image.height() as usize,
            cols: image.width() as usize,
            samples: image.as_raw().clone(),
        }
    }
}

impl From<&RgbaImage> for PixelGrid {
    /// Drops the alpha channel.
    fn from(image: &RgbaImage) -> PixelGrid {
        let samples = image
            .pixels()
            .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
            .collect();
        PixelGrid {
            rows: image.height() as usize,
            cols: image.width() as usize,
            samples,
        }
    }
}

impl TryFrom<DynamicImage> for PixelGrid {
    type Error = GridError;

    fn try_from(image: DynamicImage) -> Result<PixelGrid, GridError> {
        let color = image.color();
        if color.channel_count() < CHANNELS as u8 {
            return Err(GridError::MalformedChannel {
                found: color.channel_count(),
            });
        }

        match image {
            DynamicImage::ImageRgb8(rgb8) => Ok(PixelGrid::from(&rgb8)),
            DynamicImage::ImageRgba8(rgba8) => Ok(PixelGrid::from(&rgba8)),
            _ => Err(GridError::UnsupportedDepth(color)),
        }
    }
}

/// Loads the image at `path` into a `PixelGrid`, keeping only the RGB channels.
pub fn open_grid<P>(path: P) -> Result<PixelGrid, GridError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let image = image::open(path).map_err(|source| GridError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let grid = PixelGrid::try_from(image)?;
    info!(
        "Loaded {}: {} rows x {} cols",
        path.display(),
        grid.rows(),
        grid.cols()
    );
    Ok(grid)
}
