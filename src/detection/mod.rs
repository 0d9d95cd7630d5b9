pub mod preprocessing;
pub mod contours;
pub mod steps;

use std::path::PathBuf;

use image::{DynamicImage, GrayImage};
use log::{debug, error, info};

use crate::config::SegmenterConfig;
use crate::error::{SegmentError, Stage};
use crate::models::Contour;
use steps::{BlurStep, ClosingStep, MaskStep, ThresholdStep};

/// Finds candidate objects on a white scanned background
pub struct Segmenter {
    min_area_fraction: f64,
    steps: Vec<Box<dyn MaskStep>>,
    debug_dir: Option<PathBuf>,
}

impl Segmenter {
    pub fn new(config: &SegmenterConfig) -> Self {
        Self {
            min_area_fraction: config.min_area_fraction,
            steps: vec![
                Box::new(BlurStep {
                    kernel_size: config.blur_kernel_size,
                    sigma: config.blur_sigma,
                }),
                Box::new(ThresholdStep { level: config.threshold_level }),
                Box::new(ClosingStep {
                    radius: config.closing_radius,
                    iterations: config.closing_iterations,
                }),
            ],
            debug_dir: None,
        }
    }

    /// Save every intermediate mask to `output_dir`
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> std::io::Result<Self> {
        if output_dir.exists() {
            if std::fs::read_dir(&output_dir)?.next().is_some() {
                return Err(std::io::Error::other(format!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                )));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.debug_dir = Some(output_dir);
        Ok(self)
    }

    /// Contours of all objects large enough to matter, in discovery order
    ///
    /// Any failure is logged and reported as `None`; no partial list is returned.
    pub fn segment(&self, image: Option<&DynamicImage>) -> Option<Vec<Contour>> {
        let result = match image {
            Some(image) => self.try_segment(image),
            None => Err(SegmentError::invalid("input image is None")),
        };

        match result {
            Ok(contours) => Some(contours),
            Err(e) => {
                error!("[{}] {}", e.stage(), e);
                None
            }
        }
    }

    /// Same as [`segment`](Self::segment) but hands the error back
    pub fn try_segment(&self, image: &DynamicImage) -> Result<Vec<Contour>, SegmentError> {
        let mask = self.mask(image)?;

        let all = contours::find_external_contours(&mask);
        debug!("Extracted {} external contours", all.len());

        let (width, height) = (image.width() as f64, image.height() as f64);
        let min_area = self.min_area_fraction * width * height;
        let kept = contours::filter_by_area(all, min_area);

        info!(
            "Kept {} contours after filtering out smaller than {:.2} ({}% of image)",
            kept.len(),
            min_area,
            self.min_area_fraction * 100.0
        );
        Ok(kept)
    }

    /// Binary foreground mask after blur, threshold and closing
    pub fn mask(&self, image: &DynamicImage) -> Result<GrayImage, SegmentError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(SegmentError::invalid(format!(
                "image has no area ({}x{})",
                image.width(),
                image.height()
            )));
        }

        let DynamicImage::ImageRgb8(rgb) = image else {
            return Err(SegmentError::failure(
                Stage::Grayscale,
                format!("unsupported channel layout {:?}, expected 8-bit RGB", image.color()),
            ));
        };

        let mut current = preprocessing::to_grayscale(rgb);
        self.save_debug(1, Stage::Grayscale, &current)?;

        for (idx, step) in self.steps.iter().enumerate() {
            current = step.process(&current)?;
            self.save_debug(idx + 2, step.stage(), &current)?;
        }

        Ok(current)
    }

    fn save_debug(&self, index: usize, stage: Stage, mask: &GrayImage) -> Result<(), SegmentError> {
        let Some(dir) = &self.debug_dir else {
            return Ok(());
        };

        let path = dir.join(format!("{:02}_{}.png", index, stage.name()));
        mask.save(&path).map_err(|e| {
            SegmentError::failure(stage, format!("failed to save debug image {}: {}", path.display(), e))
        })?;
        debug!("Debug: saved {}", path.display());
        Ok(())
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(&SegmenterConfig::default())
    }
}
