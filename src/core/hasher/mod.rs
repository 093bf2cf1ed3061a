//! # Hasher Module
//!
//! Computes perceptual fingerprints for duplicate grouping.
//!
//! ## Supported Algorithms
//! - **pHash (Perceptual Hash)** - DCT-based, robust to recompression and
//!   resizing (default)
//! - **aHash (Average Hash)** - Fastest, compares pixels to the mean
//! - **dHash (Difference Hash)** - Compares brightness gradients
//! - **Double dHash** - Horizontal and vertical gradients
//!
//! ## How It Works
//! 1. Resize the image to a small grayscale grid
//! 2. (pHash only) take the DCT and keep the low frequencies
//! 3. Emit one bit per cell by comparing it with the grid mean
//!
//! Fingerprints are compared for exact equality only.
//!
//! ## Example
//! ```rust,ignore
//! use image_hygiene::core::hasher::{HasherConfig, FingerprintAlgorithm};
//!
//! let hasher = HasherConfig::new()
//!     .algorithm(FingerprintAlgorithm::Perceptual)
//!     .hash_size(8)
//!     .build()?;
//!
//! let fingerprint = hasher.fingerprint(&image)?;
//! ```

pub mod fast_decode;
mod fingerprint;

pub use fingerprint::Fingerprint;

use crate::error::ConfigError;
use image::DynamicImage;
use image_hasher::{HashAlg, HasherConfig as ImageHasherConfig};
use serde::{Deserialize, Serialize};

/// Available fingerprint algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FingerprintAlgorithm {
    /// DCT-based perceptual hash
    Perceptual,
    /// Mean-threshold hash
    Average,
    /// Row-gradient hash
    Difference,
    /// Row and column gradient hash
    DoubleDifference,
}

impl FingerprintAlgorithm {
    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            FingerprintAlgorithm::Perceptual => {
                "Perceptual Hash (pHash) - DCT-based, robust to recompression and resizing"
            }
            FingerprintAlgorithm::Average => {
                "Average Hash (aHash) - Fast comparison based on average brightness"
            }
            FingerprintAlgorithm::Difference => {
                "Difference Hash (dHash) - Compares brightness gradients between pixels"
            }
            FingerprintAlgorithm::DoubleDifference => {
                "Double Difference Hash - Horizontal and vertical brightness gradients"
            }
        }
    }
}

impl std::fmt::Display for FingerprintAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FingerprintAlgorithm::Perceptual => write!(f, "pHash"),
            FingerprintAlgorithm::Average => write!(f, "aHash"),
            FingerprintAlgorithm::Difference => write!(f, "dHash"),
            FingerprintAlgorithm::DoubleDifference => write!(f, "double-dHash"),
        }
    }
}

/// Configuration builder for fingerprint hashers
#[derive(Debug, Clone)]
pub struct HasherConfig {
    /// Grid edge length; the fingerprint has `hash_size²` bits
    hash_size: u32,
    /// Algorithm to use
    algorithm: FingerprintAlgorithm,
}

impl HasherConfig {
    /// pHash over an 8x8 grid (64 bits)
    pub fn new() -> Self {
        Self {
            hash_size: 8,
            algorithm: FingerprintAlgorithm::Perceptual,
        }
    }

    /// Set the grid edge length (4-64).
    ///
    /// Larger grids separate near-identical images more aggressively.
    pub fn hash_size(mut self, size: u32) -> Self {
        self.hash_size = size;
        self
    }

    /// Set the algorithm
    pub fn algorithm(mut self, algorithm: FingerprintAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Validate and build the hasher
    pub fn build(self) -> Result<FingerprintHasher, ConfigError> {
        if !(4..=64).contains(&self.hash_size) {
            return Err(ConfigError::InvalidHashSize {
                value: self.hash_size,
            });
        }

        let base = ImageHasherConfig::new().hash_size(self.hash_size, self.hash_size);
        let config = match self.algorithm {
            FingerprintAlgorithm::Perceptual => base.hash_alg(HashAlg::Mean).preproc_dct(),
            FingerprintAlgorithm::Average => base.hash_alg(HashAlg::Mean),
            FingerprintAlgorithm::Difference => base.hash_alg(HashAlg::Gradient),
            FingerprintAlgorithm::DoubleDifference => base.hash_alg(HashAlg::DoubleGradient),
        };

        Ok(FingerprintHasher {
            inner: config.to_hasher(),
        })
    }
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes [`Fingerprint`]s from decoded images
pub struct FingerprintHasher {
    inner: image_hasher::Hasher,
}

impl FingerprintHasher {
    /// Fingerprint a decoded image
    pub fn fingerprint(&self, image: &DynamicImage) -> Fingerprint {
        let hash = self.inner.hash_image(image);
        Fingerprint::from_bytes(hash.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma};

    fn split_image(vertical: bool) -> DynamicImage {
        DynamicImage::ImageLuma8(ImageBuffer::from_fn(64, 64, |x, y| {
            let coordinate = if vertical { y } else { x };
            if coordinate < 32 {
                Luma([230])
            } else {
                Luma([20])
            }
        }))
    }

    #[test]
    fn config_defaults_to_phash() {
        let config = HasherConfig::new();
        assert_eq!(config.algorithm, FingerprintAlgorithm::Perceptual);
        assert_eq!(config.hash_size, 8);
    }

    #[test]
    fn invalid_hash_size_is_rejected() {
        let result = HasherConfig::new().hash_size(1).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidHashSize { value: 1 })
        ));
    }

    #[test]
    fn default_fingerprint_is_64_bits() {
        let hasher = HasherConfig::new().build().unwrap();
        let fingerprint = hasher.fingerprint(&split_image(false));
        assert_eq!(fingerprint.bit_count(), 64);
    }

    #[test]
    fn identical_images_produce_identical_fingerprints() {
        let hasher = HasherConfig::new().build().unwrap();
        let a = hasher.fingerprint(&split_image(false));
        let b = hasher.fingerprint(&split_image(false));
        assert_eq!(a, b);
    }

    #[test]
    fn different_layouts_produce_different_fingerprints() {
        for algorithm in [
            FingerprintAlgorithm::Perceptual,
            FingerprintAlgorithm::Average,
            FingerprintAlgorithm::DoubleDifference,
        ] {
            let hasher = HasherConfig::new().algorithm(algorithm).build().unwrap();
            let left_right = hasher.fingerprint(&split_image(false));
            let top_bottom = hasher.fingerprint(&split_image(true));
            assert_ne!(left_right, top_bottom, "{algorithm}");
        }
    }

    #[test]
    fn algorithm_display() {
        assert_eq!(FingerprintAlgorithm::Perceptual.to_string(), "pHash");
        assert_eq!(FingerprintAlgorithm::Difference.to_string(), "dHash");
    }
}
