#![allow(dead_code)]

use image::{imageops, DynamicImage, Rgb, RgbImage};
use patchscan::{Orientation, PatchKind, Template};
use std::path::Path;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Side length of the synthetic calibration patches
pub const PATCH_SIZE: u32 = 240;

/// Seeds used for the synthetic color and gray patches
pub const COLOR_SEED: u64 = 0x5eed_c010;
pub const GRAY_SEED: u64 = 0x5eed_9a7e;

/// White canvas of the given size
pub fn blank_canvas(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, WHITE)
}

fn next(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state >> 33
}

/// 6x6 grid of pseudo-random cells, every channel in 30..=200 so the whole
/// patch reads as foreground against white paper
pub fn synthetic_patch(seed: u64, colorful: bool) -> RgbImage {
    const CELLS: u32 = 6;
    let mut state = seed;
    let mut cells = Vec::new();
    for _ in 0..CELLS * CELLS {
        let level = |s: &mut u64| (30 + next(s) % 171) as u8;
        let px = if colorful {
            Rgb([level(&mut state), level(&mut state), level(&mut state)])
        } else {
            let v = level(&mut state);
            Rgb([v, v, v])
        };
        cells.push(px);
    }

    let cell = PATCH_SIZE / CELLS;
    RgbImage::from_fn(PATCH_SIZE, PATCH_SIZE, |x, y| {
        cells[((y / cell) * CELLS + x / cell) as usize]
    })
}

pub fn color_patch() -> RgbImage {
    synthetic_patch(COLOR_SEED, true)
}

pub fn gray_patch() -> RgbImage {
    synthetic_patch(GRAY_SEED, false)
}

/// The patch as it appears in the template of the given orientation
pub fn oriented(patch: &RgbImage, orientation: Orientation) -> RgbImage {
    match orientation {
        Orientation::Upright => patch.clone(),
        Orientation::Neg90 => imageops::rotate90(patch),
        Orientation::Neg180 => imageops::rotate180(patch),
        Orientation::Pos90 => imageops::rotate270(patch),
    }
}

/// Write the eight catalog templates for the synthetic patches into `dir`
pub fn write_templates(dir: &Path) {
    let color = color_patch();
    let gray = gray_patch();
    for template in Template::all() {
        let source = match template.kind {
            PatchKind::Color => &color,
            PatchKind::Gray => &gray,
        };
        oriented(source, template.orientation)
            .save(dir.join(template.file_name))
            .expect("Failed to save template");
    }
}

/// Temporary directory populated with the eight templates
pub fn template_dir() -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    write_templates(dir.path());
    dir
}

/// White page with each patch pasted at its (x, y) offset
pub fn page(width: u32, height: u32, placements: &[(i64, i64, &RgbImage)]) -> DynamicImage {
    let mut canvas = blank_canvas(width, height);
    for (x, y, patch) in placements {
        imageops::overlay(&mut canvas, *patch, *x, *y);
    }
    DynamicImage::ImageRgb8(canvas)
}
