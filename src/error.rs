//! Error types for segmentation, template access and configuration

use std::path::PathBuf;
use thiserror::Error;

/// Segmentation stage names, used in error messages and debug dumps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Input,
    Grayscale,
    Blur,
    Threshold,
    Closing,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Input => "input",
            Stage::Grayscale => "grayscale",
            Stage::Blur => "blur",
            Stage::Threshold => "threshold",
            Stage::Closing => "closing",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a segmentation run produced no result
#[derive(Error, Debug)]
pub enum SegmentError {
    /// No image, or an image without usable dimensions
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A stage failed while processing a valid image
    #[error("Segmentation failed at stage '{stage}': {message}")]
    ProcessingFailure { stage: Stage, message: String },
}

impl SegmentError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        SegmentError::InvalidInput { reason: reason.into() }
    }

    pub fn failure(stage: Stage, message: impl Into<String>) -> Self {
        SegmentError::ProcessingFailure { stage, message: message.into() }
    }

    /// Stage the error is attributed to
    pub fn stage(&self) -> Stage {
        match self {
            SegmentError::InvalidInput { .. } => Stage::Input,
            SegmentError::ProcessingFailure { stage, .. } => *stage,
        }
    }
}

/// A template file could not be read or decoded
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("Failed to load template {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl TemplateError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            TemplateError::Missing { path } | TemplateError::Unreadable { path, .. } => path,
        }
    }
}

/// Configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },
}
