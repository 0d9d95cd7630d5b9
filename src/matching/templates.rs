use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use image::ImageReader;
use log::debug;

use crate::error::TemplateError;
use crate::matching::phash::Fingerprint;
use crate::models::{Orientation, PatchKind};

const COLOR_CATALOG: [(Orientation, &str); 4] = [
    (Orientation::Upright, "kodak_color.tif"),
    (Orientation::Neg90, "kodak_color_neg_90.tif"),
    (Orientation::Neg180, "kodak_color_neg_180.tif"),
    (Orientation::Pos90, "kodak_color_pos_90.tif"),
];

const GRAY_CATALOG: [(Orientation, &str); 4] = [
    (Orientation::Upright, "kodak_gray.tif"),
    (Orientation::Neg90, "kodak_gray_neg_90.tif"),
    (Orientation::Neg180, "kodak_gray_neg_180.tif"),
    (Orientation::Pos90, "kodak_gray_pos_90.tif"),
];

/// One entry of the fixed template catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub kind: PatchKind,
    pub orientation: Orientation,
    pub file_name: &'static str,
}

impl Template {
    /// The four templates of a patch kind, in catalog order
    pub fn catalog(kind: PatchKind) -> [Template; 4] {
        let entries = match kind {
            PatchKind::Color => &COLOR_CATALOG,
            PatchKind::Gray => &GRAY_CATALOG,
        };
        (*entries).map(|(orientation, file_name)| Template { kind, orientation, file_name })
    }

    /// All eight templates, color first
    pub fn all() -> impl Iterator<Item = Template> {
        Template::catalog(PatchKind::Color)
            .into_iter()
            .chain(Template::catalog(PatchKind::Gray))
    }
}

/// Template directory plus a fingerprint cache keyed by template path
pub struct TemplateLibrary {
    dir: PathBuf,
    cache: Option<RwLock<HashMap<PathBuf, Fingerprint>>>,
}

impl TemplateLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Some(RwLock::new(HashMap::new())),
        }
    }

    /// Load every template from disk on each request
    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    pub fn path_of(&self, template: &Template) -> PathBuf {
        self.dir.join(template.file_name)
    }

    /// Fingerprint of a template, computed on first use when caching is on
    pub fn fingerprint(&self, template: &Template) -> Result<Fingerprint, TemplateError> {
        let path = self.path_of(template);

        let Some(cache) = &self.cache else {
            return load_fingerprint(&path);
        };

        if let Some(fp) = cache.read().ok().and_then(|c| c.get(&path).copied()) {
            return Ok(fp);
        }

        let fp = load_fingerprint(&path)?;
        if let Ok(mut c) = cache.write() {
            c.insert(path, fp);
        }
        Ok(fp)
    }

    /// Load all eight fingerprints, stopping at the first failure
    pub fn warm(&self) -> Result<(), TemplateError> {
        for template in Template::all() {
            self.fingerprint(&template)?;
        }
        Ok(())
    }

    /// Catalog entries whose file does not exist
    pub fn verify(&self) -> Vec<Template> {
        Template::all()
            .filter(|t| !self.path_of(t).is_file())
            .collect()
    }

    /// Number of fingerprints currently cached
    pub fn cached(&self) -> usize {
        self.cache
            .as_ref()
            .and_then(|c| c.read().ok().map(|c| c.len()))
            .unwrap_or(0)
    }
}

fn load_fingerprint(path: &Path) -> Result<Fingerprint, TemplateError> {
    if !path.is_file() {
        return Err(TemplateError::Missing { path: path.to_path_buf() });
    }

    let unreadable = |source| TemplateError::Unreadable { path: path.to_path_buf(), source };
    let img = ImageReader::open(path)
        .map_err(|e| unreadable(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| unreadable(image::ImageError::IoError(e)))?
        .decode()
        .map_err(unreadable)?;

    let fp = Fingerprint::of(&img);
    debug!("Template {} fingerprint {}", path.display(), fp);
    Ok(fp)
}
