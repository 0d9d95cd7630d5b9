use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::filter::separable_filter_equal;
use imageproc::map::map_colors;
use imageproc::morphology;

/// BT.601 luma in 16-bit fixed point, rounded: 0.299 R + 0.587 G + 0.114 B
///
/// Used for both segmentation and fingerprinting so that the two agree on
/// how bright a pixel is.
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    map_colors(img, |Rgb([r, g, b])| {
        let y = (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16;
        Luma([y as u8])
    })
}

/// Normalized 1-D Gaussian taps for an odd kernel size
pub fn gaussian_kernel(size: u32, sigma: f32) -> Vec<f32> {
    let half = (size / 2) as i32;
    let taps: Vec<f32> = (-half..=half)
        .map(|x| (-((x * x) as f32) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f32 = taps.iter().sum();
    taps.into_iter().map(|t| t / sum).collect()
}

/// Gaussian blur with a fixed `size` x `size` kernel to suppress scanner noise
pub fn apply_blur(img: &GrayImage, size: u32, sigma: f32) -> GrayImage {
    separable_filter_equal(img, &gaussian_kernel(size, sigma))
}

/// Inverted binary threshold: luminance strictly below `level` becomes 255, the rest 0
pub fn binarize_inverted(img: &GrayImage, level: u8) -> GrayImage {
    if level == 0 {
        return GrayImage::new(img.width(), img.height());
    }
    threshold(img, level - 1, ThresholdType::BinaryInverted)
}

/// Square-element radius equivalent to `iterations` closings of `radius`,
/// or `None` when it does not fit the L-infinity closing's `u8` radius
pub fn closing_extent(radius: u8, iterations: u8) -> Option<u8> {
    radius.checked_mul(iterations)
}

/// Morphological closing with a square element of radius `k`
///
/// Dilating (or eroding) `n` times with a square of radius `r` is the same as
/// one pass with a square of radius `n * r`, so repeated closings fold into
/// a single L-infinity closing of radius [`closing_extent`].
pub fn close(img: &GrayImage, k: u8) -> GrayImage {
    if k == 0 {
        return img.clone();
    }
    morphology::close(img, Norm::LInf, k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_tap_kernel_weights() {
        let k = gaussian_kernel(5, 1.1);
        assert_eq!(k.len(), 5);
        let expected = [0.0708, 0.2445, 0.3696, 0.2445, 0.0708];
        for (w, e) in k.iter().zip(expected) {
            assert!((w - e).abs() < 1e-3, "{} vs {}", w, e);
        }
    }

    #[test]
    fn test_grayscale_uses_bt601_weights() {
        let img = RgbImage::from_fn(3, 1, |x, _| match x {
            0 => Rgb([255, 0, 0]),
            1 => Rgb([0, 255, 0]),
            _ => Rgb([200, 255, 255]),
        });
        let gray = to_grayscale(&img);
        assert_eq!(gray.get_pixel(0, 0)[0], 76);
        assert_eq!(gray.get_pixel(1, 0)[0], 150);
        assert_eq!(gray.get_pixel(2, 0)[0], 239);
    }

    #[test]
    fn test_closing_extent_rejects_overflow() {
        assert_eq!(closing_extent(2, 2), Some(4));
        assert_eq!(closing_extent(16, 16), None);
    }
}
