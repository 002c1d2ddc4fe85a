use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, RgbImage};
use ndarray::Array3;
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            height: 224,
            width: 224,
            channels: 3,
        }
    }
}

impl PreprocessConfig {
    /// Shape of a single preprocessed image, `(height, width, channels)`.
    pub fn shape(&self) -> [usize; 3] {
        [self.height, self.width, self.channels]
    }
}

#[derive(Debug, Default)]
pub struct Processor {
    pub config: PreprocessConfig,
}

impl Processor {
    /// Create a new instance of the Processor struct
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Decode uploaded bytes and turn them into a `height x width x 3` tensor
    /// with values in `[0, 1]`.
    ///
    /// The image is stretched to the target size, not cropped or padded.
    pub fn preprocess(&self, raw: &[u8]) -> Result<Array3<f32>> {
        let t = std::time::Instant::now();
        let decoded = image::load_from_memory(raw)?;
        debug!(
            width = decoded.width(),
            height = decoded.height(),
            color = ?decoded.color(),
            elapsed = ?t.elapsed(),
            "decoded upload"
        );

        let t = std::time::Instant::now();
        let rgb = to_rgb(decoded)?;
        let resized = self.resize(rgb)?;
        debug!(elapsed = ?t.elapsed(), "resized to model input");

        let (height, width, channels) = (self.config.height, self.config.width, self.config.channels);
        let values: Vec<f32> = resized.iter().map(|&v| v as f32 / 255.0).collect();
        Array3::from_shape_vec((height, width, channels), values)
            .map_err(|e| Error::UnsupportedFormat(format!("unexpected pixel buffer: {e}")))
    }

    fn resize(&self, rgb: RgbImage) -> Result<Vec<u8>> {
        if self.config.channels != 3 {
            return Err(Error::UnsupportedFormat(format!(
                "{} channels requested, only RGB is produced",
                self.config.channels
            )));
        }
        let src = DynamicImage::ImageRgb8(rgb);
        let mut dst_image = Image::new(
            self.config.width as u32,
            self.config.height as u32,
            PixelType::U8x3,
        );

        // Bicubic
        let resize_options =
            ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::CatmullRom));
        let mut resizer = Resizer::new();
        resizer
            .resize(&src, &mut dst_image, Some(&resize_options))
            .map_err(|e| Error::UnsupportedFormat(format!("resize failed: {e}")))?;
        Ok(dst_image.into_vec())
    }
}

/// Coerce any supported color layout to 8-bit RGB.
///
/// Grayscale is replicated into all three channels and alpha is dropped,
/// not composited onto a background.
fn to_rgb(image: DynamicImage) -> Result<RgbImage> {
    match image {
        DynamicImage::ImageRgb8(rgb) => Ok(rgb),
        convertible @ (DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgba8(_)
        | DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_)
        | DynamicImage::ImageRgb32F(_)
        | DynamicImage::ImageRgba32F(_)) => Ok(convertible.to_rgb8()),
        other => Err(Error::UnsupportedFormat(format!(
            "cannot convert color type {:?} to RGB",
            other.color()
        ))),
    }
}
