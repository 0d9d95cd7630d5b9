pub mod phash;
pub mod templates;

use std::collections::BTreeMap;
use std::sync::Arc;

use image::DynamicImage;

use crate::error::TemplateError;
use crate::models::{Orientation, PatchKind};
use phash::Fingerprint;
use templates::{Template, TemplateLibrary};

/// Largest Hamming distance still counted as a match
pub const MATCH_THRESHOLD: u32 = 12;

/// Hamming distance per template orientation, iterated in catalog order
pub type OrientationDistances = BTreeMap<Orientation, u32>;

/// Compares candidate regions against the template catalogs
#[derive(Clone)]
pub struct PerceptualMatcher {
    library: Arc<TemplateLibrary>,
}

impl PerceptualMatcher {
    pub fn new(library: Arc<TemplateLibrary>) -> Self {
        Self { library }
    }

    /// Distance from the candidate to each orientation of one catalog
    pub fn compare(
        &self,
        candidate: &DynamicImage,
        kind: PatchKind,
    ) -> Result<OrientationDistances, TemplateError> {
        self.compare_fingerprint(&Fingerprint::of(candidate), kind)
    }

    /// Same as [`compare`](Self::compare) for a precomputed candidate fingerprint
    pub fn compare_fingerprint(
        &self,
        candidate: &Fingerprint,
        kind: PatchKind,
    ) -> Result<OrientationDistances, TemplateError> {
        let mut distances = OrientationDistances::new();
        for template in Template::catalog(kind) {
            let target = self.library.fingerprint(&template)?;
            distances.insert(template.orientation, candidate.distance(&target));
        }
        Ok(distances)
    }
}
