//! # Extractor Module
//!
//! Computes both per-image signals from a single decode: the perceptual
//! [`Fingerprint`] used for duplicate grouping and the sharpness score used
//! for quality flagging.
//!
//! Extraction never fails the caller. Any read, decode or decoder panic is
//! captured as an [`ExtractError`] inside the returned [`ImageFeatures`].

use crate::core::hasher::fast_decode::FastDecoder;
use crate::core::hasher::{Fingerprint, FingerprintHasher};
use crate::core::quality::SharpnessAnalyzer;
use crate::error::ExtractError;
use image::DynamicImage;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// Signals extracted from one image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFeatures {
    /// The image these features belong to
    pub path: PathBuf,
    /// Perceptual fingerprint, or why it could not be computed
    pub fingerprint: Result<Fingerprint, ExtractError>,
    /// Laplacian variance, or why it could not be computed
    pub sharpness: Result<f64, ExtractError>,
}

impl ImageFeatures {
    /// Features for a file that could not be decoded at all
    pub fn failed(path: &Path, error: ExtractError) -> Self {
        Self {
            path: path.to_path_buf(),
            fingerprint: Err(error.clone()),
            sharpness: Err(error),
        }
    }

    /// First failure, if any signal is missing
    pub fn failure(&self) -> Option<&ExtractError> {
        self.fingerprint
            .as_ref()
            .err()
            .or_else(|| self.sharpness.as_ref().err())
    }
}

/// Decodes images and derives their features
pub struct FeatureExtractor {
    hasher: FingerprintHasher,
    analyzer: SharpnessAnalyzer,
}

impl FeatureExtractor {
    /// Create an extractor from a built hasher and analyzer
    pub fn new(hasher: FingerprintHasher, analyzer: SharpnessAnalyzer) -> Self {
        Self { hasher, analyzer }
    }

    /// Read, decode and analyze the file at `path`
    pub fn extract(&self, path: &Path) -> ImageFeatures {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| match FastDecoder::decode(path) {
            Ok(image) => self.extract_image(path, &image),
            Err(error) => ImageFeatures::failed(path, error),
        }));

        outcome.unwrap_or_else(|_| {
            ImageFeatures::failed(
                path,
                ExtractError::Panicked {
                    path: path.to_path_buf(),
                },
            )
        })
    }

    /// Analyze an image that is already decoded
    pub fn extract_image(&self, path: &Path, image: &DynamicImage) -> ImageFeatures {
        if image.width() == 0 || image.height() == 0 {
            return ImageFeatures::failed(
                path,
                ExtractError::EmptyImage {
                    path: path.to_path_buf(),
                },
            );
        }

        ImageFeatures {
            path: path.to_path_buf(),
            fingerprint: Ok(self.hasher.fingerprint(image)),
            sharpness: Ok(self.analyzer.score_image(image)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::HasherConfig;
    use image::{ImageBuffer, Luma};
    use std::fs;
    use tempfile::TempDir;

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(HasherConfig::new().build().unwrap(), SharpnessAnalyzer::new())
    }

    fn textured_image() -> DynamicImage {
        DynamicImage::ImageLuma8(ImageBuffer::from_fn(48, 48, |x, y| {
            let base: i32 = if x < 24 { 200 } else { 60 };
            let noise = if (x + y) % 2 == 0 { 40 } else { -40 };
            Luma([(base + noise) as u8])
        }))
    }

    #[test]
    fn decoded_image_yields_both_signals() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("photo.png");
        textured_image().save(&path).unwrap();

        let features = extractor().extract(&path);

        assert!(features.fingerprint.is_ok());
        assert!(*features.sharpness.as_ref().unwrap() > 100.0);
        assert!(features.failure().is_none());
    }

    #[test]
    fn byte_identical_files_share_a_fingerprint() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.png");
        let b = temp_dir.path().join("b.png");
        textured_image().save(&a).unwrap();
        fs::copy(&a, &b).unwrap();

        let extractor = extractor();
        assert_eq!(
            extractor.extract(&a).fingerprint.unwrap(),
            extractor.extract(&b).fingerprint.unwrap()
        );
    }

    #[test]
    fn corrupt_file_fails_both_signals() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("corrupt.jpg");
        fs::write(&path, b"this is not a valid image file").unwrap();

        let features = extractor().extract(&path);

        assert!(features.fingerprint.is_err());
        assert!(features.sharpness.is_err());
        assert_eq!(features.failure().unwrap().path(), &path);
    }

    #[test]
    fn missing_file_is_captured_not_raised() {
        let features = extractor().extract(Path::new("/nonexistent/photo.png"));
        assert!(matches!(features.failure(), Some(ExtractError::Io { .. })));
    }

    #[test]
    fn flat_image_scores_zero_but_is_not_a_failure() {
        let image = DynamicImage::ImageLuma8(ImageBuffer::from_fn(16, 16, |_, _| Luma([0])));
        let features = extractor().extract_image(Path::new("dark.png"), &image);

        assert_eq!(features.sharpness, Ok(0.0));
        assert!(features.failure().is_none());
    }
}
