//! # Quality Analysis Module
//!
//! Scores image sharpness as the variance of the Laplacian.
//!
//! A sharp photo has strong, well-defined edges, so its second-derivative
//! response swings widely; a blurred or flat photo produces a response close
//! to zero everywhere. Scores below [`DEFAULT_SHARPNESS_THRESHOLD`] are
//! treated as low quality.
//!
//! Colour images are reduced to 8-bit gray with BT.601 weights
//! (0.299 R + 0.587 G + 0.114 B), the convention the threshold was tuned
//! against. `image`'s own `to_luma8` uses Rec. 709 and would shift scores
//! near the threshold.

use image::{DynamicImage, GrayImage, Luma};

/// Score below which an image is reported as low quality
pub const DEFAULT_SHARPNESS_THRESHOLD: f64 = 100.0;

/// Computes sharpness scores
#[derive(Debug, Clone, Default)]
pub struct SharpnessAnalyzer {
    /// Downscale so the longest edge is at most this many pixels before
    /// scoring. `None` scores at full resolution.
    max_dimension: Option<u32>,
}

impl SharpnessAnalyzer {
    /// Analyzer that scores at full resolution
    pub fn new() -> Self {
        Self::default()
    }

    /// Downscale large images before scoring.
    ///
    /// Faster, but scores are not comparable with full-resolution scores.
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = Some(max_dimension);
        self
    }

    /// Sharpness of a decoded image
    pub fn score_image(&self, image: &DynamicImage) -> f64 {
        let gray = match self.max_dimension {
            Some(limit) if image.width() > limit || image.height() > limit => bt601_gray(
                &image.resize(limit, limit, image::imageops::FilterType::Triangle),
            ),
            _ => bt601_gray(image),
        };

        laplacian_variance(&gray)
    }
}

/// 8-bit gray with BT.601 luma weights
pub fn bt601_gray(image: &DynamicImage) -> GrayImage {
    match image {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        DynamicImage::ImageLumaA8(_) => image.to_luma8(),
        _ => {
            let rgb = image.to_rgb8();
            GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
                let [r, g, b] = rgb.get_pixel(x, y).0;
                let luma = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
                Luma([luma.round().clamp(0.0, 255.0) as u8])
            })
        }
    }
}

/// Population variance of the 3x3 Laplacian `[0 1 0; 1 -4 1; 0 1 0]`.
///
/// Every pixel contributes; out-of-bounds neighbours are mirrored without
/// repeating the edge pixel (`gfedcb|abcdefgh|gfedcba`).
pub fn laplacian_variance(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return 0.0;
    }

    let pixel = |x: u32, y: u32| gray.get_pixel(x, y)[0] as f64;

    let mut sum = 0.0;
    let mut sum_squares = 0.0;

    for y in 0..height {
        let up = reflect_101(y as i64 - 1, height);
        let down = reflect_101(y as i64 + 1, height);

        for x in 0..width {
            let left = reflect_101(x as i64 - 1, width);
            let right = reflect_101(x as i64 + 1, width);

            let response = pixel(x, up) + pixel(x, down) + pixel(left, y) + pixel(right, y)
                - 4.0 * pixel(x, y);

            sum += response;
            sum_squares += response * response;
        }
    }

    let n = (width as f64) * (height as f64);
    let mean = sum / n;
    (sum_squares / n - mean * mean).max(0.0)
}

fn reflect_101(index: i64, len: u32) -> u32 {
    let len = len as i64;
    if len == 1 {
        return 0;
    }
    let reflected = if index < 0 {
        -index
    } else if index >= len {
        2 * len - 2 - index
    } else {
        index
    };
    reflected as u32
}
