use std::sync::Arc;

use image::DynamicImage;
use log::{debug, warn};
use serde::Serialize;

use crate::config::{Config, MatchPolicy};
use crate::detection::Segmenter;
use crate::error::TemplateError;
use crate::matching::phash::Fingerprint;
use crate::matching::templates::TemplateLibrary;
use crate::matching::{OrientationDistances, PerceptualMatcher, MATCH_THRESHOLD};
use crate::models::{BoundingBox, Contour, MatchResult, PatchKind};

/// Template distances measured for one contour
#[derive(Debug, Clone, Serialize)]
pub struct ContourDistances {
    pub index: usize,
    pub bbox: BoundingBox,
    pub fingerprint: Fingerprint,
    pub color: OrientationDistances,
    pub gray: OrientationDistances,
}

impl ContourDistances {
    pub fn for_kind(&self, kind: PatchKind) -> &OrientationDistances {
        match kind {
            PatchKind::Color => &self.color,
            PatchKind::Gray => &self.gray,
        }
    }
}

/// Outcome of one classification run
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub contours: Vec<Contour>,
    pub distances: Vec<ContourDistances>,
    pub color_match: Option<MatchResult>,
    pub gray_match: Option<MatchResult>,
}

impl Classification {
    pub fn color_match_index(&self) -> Option<usize> {
        self.color_match.map(|m| m.contour_index)
    }

    pub fn gray_match_index(&self) -> Option<usize> {
        self.gray_match.map(|m| m.contour_index)
    }

    /// Every contour/orientation pair within the threshold, in iteration order
    pub fn candidates(&self) -> Vec<MatchResult> {
        let mut out = Vec::new();
        for d in &self.distances {
            for kind in [PatchKind::Color, PatchKind::Gray] {
                for (&orientation, &distance) in d.for_kind(kind) {
                    if distance <= MATCH_THRESHOLD {
                        out.push(MatchResult { contour_index: d.index, kind, orientation, distance });
                    }
                }
            }
        }
        out
    }
}

/// Segments a scan and tags the contours matching the color and gray patches
pub struct ClassificationPipeline {
    segmenter: Segmenter,
    matcher: PerceptualMatcher,
    policy: MatchPolicy,
}

impl ClassificationPipeline {
    pub fn new(segmenter: Segmenter, matcher: PerceptualMatcher) -> Self {
        Self {
            segmenter,
            matcher,
            policy: MatchPolicy::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let library = Arc::new(TemplateLibrary::new(config.template_dir.clone()));
        Self::new(
            Segmenter::new(&config.segmentation),
            PerceptualMatcher::new(library),
        )
        .with_policy(config.policy)
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run segmentation and template matching on one image
    ///
    /// `Ok(None)` means segmentation produced no result. A missing or
    /// unreadable template aborts the run with an error.
    pub fn classify(
        &self,
        image: Option<&DynamicImage>,
    ) -> Result<Option<Classification>, TemplateError> {
        let Some(contours) = self.segmenter.segment(image) else {
            return Ok(None);
        };
        // segment() only succeeds on a real image
        let Some(image) = image else {
            return Ok(None);
        };

        let mut distances = Vec::with_capacity(contours.len());
        let mut color_match = None;
        let mut gray_match = None;

        for (idx, contour) in contours.iter().enumerate() {
            let bbox = contour.bounding_box();
            let Some(roi) = contour.extract_roi(image) else {
                warn!("Contour {} has an empty bounding box, skipping", idx);
                continue;
            };

            let fingerprint = Fingerprint::of(&roi);
            let color = self.matcher.compare_fingerprint(&fingerprint, PatchKind::Color)?;
            let gray = self.matcher.compare_fingerprint(&fingerprint, PatchKind::Gray)?;
            debug!(
                "Contour {} at ({}, {}) {}x{}: color {:?}, gray {:?}",
                idx, bbox.x, bbox.y, bbox.width, bbox.height, color, gray
            );

            self.record(&mut color_match, idx, PatchKind::Color, &color);
            self.record(&mut gray_match, idx, PatchKind::Gray, &gray);

            distances.push(ContourDistances { index: idx, bbox, fingerprint, color, gray });
        }

        Ok(Some(Classification { contours, distances, color_match, gray_match }))
    }

    fn record(
        &self,
        current: &mut Option<MatchResult>,
        contour_index: usize,
        kind: PatchKind,
        distances: &OrientationDistances,
    ) {
        for (&orientation, &distance) in distances {
            if distance > MATCH_THRESHOLD {
                continue;
            }
            debug!(
                "{} match for contour {} at {} orientation, distance {}",
                kind, contour_index, orientation, distance
            );

            let candidate = MatchResult { contour_index, kind, orientation, distance };
            let replace = match self.policy {
                MatchPolicy::LastWins => true,
                MatchPolicy::Closest => current.is_none_or(|c| distance < c.distance),
            };
            if replace {
                *current = Some(candidate);
            }
        }
    }
}
