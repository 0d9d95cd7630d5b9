use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Integer point on a contour boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Bounding box in the original image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Closed boundary of a detected region, in discovery order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Enclosed polygon area (shoelace formula), never negative
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }

        let mut twice_area: i64 = 0;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            twice_area += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
        }

        (twice_area as f64 / 2.0).abs()
    }

    /// Smallest upright rectangle containing every point
    pub fn bounding_box(&self) -> BoundingBox {
        let Some(first) = self.points.first() else {
            return BoundingBox { x: 0, y: 0, width: 0, height: 0 };
        };

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        BoundingBox {
            x: min_x.max(0) as u32,
            y: min_y.max(0) as u32,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        }
    }

    /// Crop the contour's bounding box out of the original image
    pub fn extract_roi(&self, img: &DynamicImage) -> Option<DynamicImage> {
        let bbox = self.bounding_box();
        if bbox.x >= img.width() || bbox.y >= img.height() {
            return None;
        }

        let width = bbox.width.min(img.width() - bbox.x);
        let height = bbox.height.min(img.height() - bbox.y);
        if width == 0 || height == 0 {
            return None;
        }

        Some(img.crop_imm(bbox.x, bbox.y, width, height))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Which reference patch a template depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchKind {
    Color,
    Gray,
}

impl PatchKind {
    pub fn name(&self) -> &'static str {
        match self {
            PatchKind::Color => "color",
            PatchKind::Gray => "gray",
        }
    }
}

impl std::fmt::Display for PatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Template orientation; declaration order is catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Upright,
    Neg90,
    Neg180,
    Pos90,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Upright,
        Orientation::Neg90,
        Orientation::Neg180,
        Orientation::Pos90,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Orientation::Upright => "upright",
            Orientation::Neg90 => "neg90",
            Orientation::Neg180 => "neg180",
            Orientation::Pos90 => "pos90",
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A contour whose fingerprint came within the match threshold of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub contour_index: usize,
    pub kind: PatchKind,
    pub orientation: Orientation,
    pub distance: u32,
}
