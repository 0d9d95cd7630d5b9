use image::{DynamicImage, GrayImage};
use image_hasher::{HashAlg, Hasher, HasherConfig};
use serde::{Deserialize, Serialize};

use crate::detection::preprocessing::to_grayscale;

/// Side of the hash grid; 8x8 gives 64 bits
const HASH_SIZE: u32 = 8;

/// 64-bit DCT perceptual hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    /// Compute the fingerprint of an image
    ///
    /// Uses the same luminance conversion as segmentation.
    pub fn of(img: &DynamicImage) -> Self {
        Self::of_luma(&to_grayscale(&img.to_rgb8()))
    }

    /// Compute the fingerprint of an already grayscale image
    pub fn of_luma(gray: &GrayImage) -> Self {
        let hash = hasher().hash_image(gray);
        let bits = hash
            .as_bytes()
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
        Fingerprint(bits)
    }

    /// Number of differing bits
    pub fn distance(&self, other: &Fingerprint) -> u32 {
        (self.0 ^ other.0).count_ones()
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

fn hasher() -> Hasher {
    HasherConfig::new()
        .hash_size(HASH_SIZE, HASH_SIZE)
        .hash_alg(HashAlg::Median)
        .preproc_dct()
        .to_hasher()
}
