//! Configuration for segmentation and classification.
//!
//! Values can be built programmatically or loaded from a JSON file. Every
//! field has a default, so a config file only needs the keys it changes:
//!
//! ```no_run
//! use patchscan::Config;
//! use std::path::Path;
//!
//! let config = Config::from_json_file(Path::new("patchscan.json"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::detection::preprocessing::closing_extent;
use crate::error::ConfigError;

/// Complete configuration for one classification pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the eight template images
    pub template_dir: PathBuf,

    /// How to resolve several qualifying matches of the same patch kind
    pub policy: MatchPolicy,

    pub segmentation: SegmenterConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("templates"),
            policy: MatchPolicy::default(),
            segmentation: SegmenterConfig::default(),
        }
    }
}

impl Config {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.segmentation.validate()?;
        Ok(config)
    }
}

/// Segmentation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Side of the square Gaussian kernel, odd
    pub blur_kernel_size: u32,

    /// Gaussian sigma; 1.1 is what a 5x5 kernel implies
    pub blur_sigma: f32,

    /// Luminance strictly below this level is foreground
    pub threshold_level: u8,

    /// Radius of the square closing element (2 => 5x5)
    pub closing_radius: u8,

    pub closing_iterations: u8,

    /// Contours must enclose more than this fraction of the image area
    pub min_area_fraction: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            blur_kernel_size: 5,
            blur_sigma: 1.1,
            threshold_level: 240,
            closing_radius: 2,
            closing_iterations: 2,
            min_area_fraction: 0.0005,
        }
    }
}

impl SegmenterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.blur_sigma.is_finite() && self.blur_sigma > 0.0) {
            return Err(ConfigError::InvalidParameter {
                parameter: "blur_sigma".to_string(),
                value: self.blur_sigma.to_string(),
            });
        }
        if self.blur_kernel_size % 2 == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "blur_kernel_size".to_string(),
                value: self.blur_kernel_size.to_string(),
            });
        }
        if closing_extent(self.closing_radius, self.closing_iterations).is_none() {
            return Err(ConfigError::InvalidParameter {
                parameter: "closing_radius * closing_iterations".to_string(),
                value: format!("{} * {}", self.closing_radius, self.closing_iterations),
            });
        }
        if !(self.min_area_fraction.is_finite() && self.min_area_fraction >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                parameter: "min_area_fraction".to_string(),
                value: self.min_area_fraction.to_string(),
            });
        }
        Ok(())
    }
}

/// Resolution rule when several contours or orientations qualify
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// The last qualifying contour/orientation in iteration order wins
    #[default]
    LastWins,
    /// The qualifying match with the smallest distance wins; ties keep the earliest
    Closest,
}
