use image::GrayImage;

use crate::detection::preprocessing;
use crate::error::{SegmentError, Stage};

/// A mask-to-mask stage of the segmenter
pub trait MaskStep: Send + Sync {
    fn process(&self, image: &GrayImage) -> Result<GrayImage, SegmentError>;

    /// Stage this step reports failures under
    fn stage(&self) -> Stage;
}

/// Apply Gaussian blur
pub struct BlurStep {
    pub kernel_size: u32,
    pub sigma: f32,
}

impl MaskStep for BlurStep {
    fn process(&self, image: &GrayImage) -> Result<GrayImage, SegmentError> {
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(SegmentError::failure(
                Stage::Blur,
                format!("sigma must be positive, got {}", self.sigma),
            ));
        }
        if self.kernel_size % 2 == 0 {
            return Err(SegmentError::failure(
                Stage::Blur,
                format!("kernel size must be odd, got {}", self.kernel_size),
            ));
        }
        Ok(preprocessing::apply_blur(image, self.kernel_size, self.sigma))
    }

    fn stage(&self) -> Stage {
        Stage::Blur
    }
}

/// Separate dark objects from white paper
pub struct ThresholdStep {
    pub level: u8,
}

impl MaskStep for ThresholdStep {
    fn process(&self, image: &GrayImage) -> Result<GrayImage, SegmentError> {
        Ok(preprocessing::binarize_inverted(image, self.level))
    }

    fn stage(&self) -> Stage {
        Stage::Threshold
    }
}

/// Bridge small gaps so one object yields one region
pub struct ClosingStep {
    pub radius: u8,
    pub iterations: u8,
}

impl MaskStep for ClosingStep {
    fn process(&self, image: &GrayImage) -> Result<GrayImage, SegmentError> {
        let k = preprocessing::closing_extent(self.radius, self.iterations).ok_or_else(|| {
            SegmentError::failure(
                Stage::Closing,
                format!(
                    "radius {} x {} iterations exceeds 255",
                    self.radius, self.iterations
                ),
            )
        })?;
        Ok(preprocessing::close(image, k))
    }

    fn stage(&self) -> Stage {
        Stage::Closing
    }
}
