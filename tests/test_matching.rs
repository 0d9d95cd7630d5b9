mod common;

use common::*;
use image::{imageops, DynamicImage, Rgb};
use patchscan::TemplateError;
use std::sync::Arc;

#[test]
fn test_fingerprint_distance_is_reflexive() {
    let img = DynamicImage::ImageRgb8(gray_patch());
    let fp = Fingerprint::of(&img);
    assert_eq!(fp.distance(&fp), 0);
    assert_eq!(Fingerprint::of(&img), fp);
}

#[test]
fn test_fingerprint_is_orientation_sensitive() {
    for patch in [gray_patch(), color_patch()] {
        let upright = Fingerprint::of(&DynamicImage::ImageRgb8(patch.clone()));
        let rotated = Fingerprint::of(&DynamicImage::ImageRgb8(imageops::rotate90(&patch)));
        assert!(upright.distance(&rotated) > MATCH_THRESHOLD);
    }
}

#[test]
fn test_fingerprint_tolerates_photometric_noise() {
    let patch = gray_patch();
    let mut noisy = patch.clone();
    for (x, y, px) in noisy.enumerate_pixels_mut() {
        let delta = ((x * 7 + y * 13) % 5) as u8;
        *px = Rgb([px[0] + delta, px[1] + delta, px[2] + delta]);
    }

    let a = Fingerprint::of(&DynamicImage::ImageRgb8(patch));
    let b = Fingerprint::of(&DynamicImage::ImageRgb8(noisy));
    assert!(a.distance(&b) <= MATCH_THRESHOLD);
}

#[test]
fn test_catalog_order_and_names() {
    let gray = Template::catalog(PatchKind::Gray);
    let orientations: Vec<_> = gray.iter().map(|t| t.orientation).collect();
    assert_eq!(
        orientations,
        [Orientation::Upright, Orientation::Neg90, Orientation::Neg180, Orientation::Pos90]
    );
    assert_eq!(gray[0].file_name, "kodak_gray.tif");
    assert_eq!(Template::catalog(PatchKind::Color)[3].file_name, "kodak_color_pos_90.tif");
    assert_eq!(Template::all().count(), 8);
}

#[test]
fn test_compare_against_own_template() -> anyhow::Result<()> {
    let dir = template_dir();
    let matcher = PerceptualMatcher::new(Arc::new(TemplateLibrary::new(dir.path())));

    let candidate = DynamicImage::ImageRgb8(gray_patch());
    let gray = matcher.compare(&candidate, PatchKind::Gray)?;
    assert_eq!(gray.len(), 4);
    assert_eq!(gray[&Orientation::Upright], 0);
    assert!(gray[&Orientation::Neg90] > MATCH_THRESHOLD);
    assert!(gray[&Orientation::Pos90] > MATCH_THRESHOLD);

    let color = matcher.compare(&candidate, PatchKind::Color)?;
    assert!(color.values().all(|&d| d > MATCH_THRESHOLD));
    Ok(())
}

#[test]
fn test_rotated_candidate_matches_rotated_template() -> anyhow::Result<()> {
    let dir = template_dir();
    let matcher = PerceptualMatcher::new(Arc::new(TemplateLibrary::new(dir.path())));

    let rotated = DynamicImage::ImageRgb8(oriented(&color_patch(), Orientation::Neg90));
    let color = matcher.compare(&rotated, PatchKind::Color)?;
    assert_eq!(color[&Orientation::Neg90], 0);
    assert!(color[&Orientation::Upright] > MATCH_THRESHOLD);
    Ok(())
}

#[test]
fn test_cache_does_not_change_distances() -> anyhow::Result<()> {
    let dir = template_dir();
    let cached = Arc::new(TemplateLibrary::new(dir.path()));
    let uncached = Arc::new(TemplateLibrary::new(dir.path()).without_cache());

    let candidate = DynamicImage::ImageRgb8(oriented(&gray_patch(), Orientation::Neg180));
    for kind in [PatchKind::Color, PatchKind::Gray] {
        let first = PerceptualMatcher::new(cached.clone()).compare(&candidate, kind)?;
        let second = PerceptualMatcher::new(cached.clone()).compare(&candidate, kind)?;
        let fresh = PerceptualMatcher::new(uncached.clone()).compare(&candidate, kind)?;
        assert_eq!(first, second);
        assert_eq!(first, fresh);
    }
    assert_eq!(cached.cached(), 8);
    assert_eq!(uncached.cached(), 0);
    Ok(())
}

#[test]
fn test_warm_loads_all_templates() -> anyhow::Result<()> {
    let dir = template_dir();
    let library = TemplateLibrary::new(dir.path());
    assert!(library.verify().is_empty());
    library.warm()?;
    assert_eq!(library.cached(), 8);
    Ok(())
}

#[test]
fn test_missing_template_is_reported() -> anyhow::Result<()> {
    let dir = template_dir();
    let removed = Template::catalog(PatchKind::Gray)[2];
    std::fs::remove_file(dir.path().join(removed.file_name))?;

    let library = Arc::new(TemplateLibrary::new(dir.path()));
    assert_eq!(library.verify(), vec![removed]);
    assert!(matches!(library.warm(), Err(TemplateError::Missing { .. })));

    let matcher = PerceptualMatcher::new(library);
    let candidate = DynamicImage::ImageRgb8(gray_patch());
    assert!(matcher.compare(&candidate, PatchKind::Color).is_ok());

    let err = matcher.compare(&candidate, PatchKind::Gray).unwrap_err();
    assert_eq!(err.path(), dir.path().join(removed.file_name));
    Ok(())
}

#[test]
fn test_corrupt_template_is_unreadable() -> anyhow::Result<()> {
    let dir = template_dir();
    let broken = Template::catalog(PatchKind::Color)[0];
    std::fs::write(dir.path().join(broken.file_name), b"not a tiff")?;

    let library = TemplateLibrary::new(dir.path());
    assert!(matches!(
        library.fingerprint(&broken),
        Err(TemplateError::Unreadable { .. })
    ));
    Ok(())
}
