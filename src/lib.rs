pub mod config;
pub mod detection;
pub mod error;
pub mod matching;
pub mod models;
pub mod pipeline;

pub use config::{Config, MatchPolicy, SegmenterConfig};
pub use detection::Segmenter;
pub use error::{ConfigError, SegmentError, Stage, TemplateError};
pub use matching::phash::Fingerprint;
pub use matching::templates::{Template, TemplateLibrary};
pub use matching::{OrientationDistances, PerceptualMatcher, MATCH_THRESHOLD};
pub use models::{BoundingBox, Contour, MatchResult, Orientation, PatchKind, Point};
pub use pipeline::{Classification, ClassificationPipeline, ContourDistances};
