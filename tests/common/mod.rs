mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from patchscan for tests
pub use patchscan::{
    Classification, ClassificationPipeline, Config, Contour, Fingerprint, MatchPolicy,
    Orientation, PatchKind, PerceptualMatcher, Segmenter, Template, TemplateLibrary,
    MATCH_THRESHOLD,
};
