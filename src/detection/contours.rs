use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};

use crate::models::{Contour, Point};

/// Outermost boundaries of the foreground regions of a binary mask
///
/// Hole borders and outer borders nested inside holes are skipped. Points
/// are compressed with [`compress_runs`].
pub fn find_external_contours(mask: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| {
            let points: Vec<Point> = c.points.iter().map(|p| Point::new(p.x, p.y)).collect();
            Contour::new(compress_runs(&points))
        })
        .collect()
}

/// Drop points in the middle of straight horizontal, vertical or diagonal runs
///
/// The chain is closed: the last point connects back to the first.
pub fn compress_runs(points: &[Point]) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let step = |a: Point, b: Point| (b.x - a.x, b.y - a.y);

    let kept: Vec<Point> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            step(prev, cur) != step(cur, next)
        })
        .map(|i| points[i])
        .collect();

    if kept.is_empty() { points.to_vec() } else { kept }
}

/// Keep contours whose area is strictly greater than `min_area`
pub fn filter_by_area(contours: Vec<Contour>, min_area: f64) -> Vec<Contour> {
    contours
        .into_iter()
        .filter(|c| c.area() > min_area)
        .collect()
}
