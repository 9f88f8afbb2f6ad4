//! Template directory loaders

use super::{DigitTemplate, DigitTemplateSet, QueueTemplate};
use crate::error::Result;
use crate::gray::GrayBuffer;
use log::{debug, warn};
use std::fs;
use std::path::Path;

const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

fn is_supported(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Load the digit glyph set from a directory of images named by their
/// digit value (`0.png` .. `9.png`). A missing directory or files with
/// non-digit stems yield an empty/partial set, not an error; the
/// pipeline reports empty sets as a diagnostic warning.
pub fn load_digit_templates<P: AsRef<Path>>(dir: P) -> Result<DigitTemplateSet> {
    let dir = dir.as_ref();
    let mut glyphs = Vec::new();

    for path in list_images(dir) {
        let stem = match path.file_stem() {
            Some(stem) => stem.to_string_lossy().to_string(),
            None => continue,
        };
        let digit = match stem.parse::<u8>() {
            Ok(d) if d <= 9 => d,
            _ => {
                debug!("skipping non-digit template file {:?}", path);
                continue;
            }
        };
        let image = GrayBuffer::load(&path, None, None)?;
        glyphs.push(DigitTemplate { digit, image });
    }

    if glyphs.is_empty() {
        warn!("no digit templates found in {:?}", dir);
    }
    Ok(DigitTemplateSet::new(glyphs))
}

/// Load queue icon templates from a directory; each file stem is the
/// icon's identifier. Returned sorted by id so match iteration order
/// is deterministic.
pub fn load_queue_templates<P: AsRef<Path>>(dir: P) -> Result<Vec<QueueTemplate>> {
    let dir = dir.as_ref();
    let mut templates = Vec::new();

    for path in list_images(dir) {
        let id = match path.file_stem() {
            Some(stem) => stem.to_string_lossy().to_string(),
            None => continue,
        };
        let image = GrayBuffer::load(&path, None, None)?;
        templates.push(QueueTemplate { id, image });
    }

    if templates.is_empty() {
        warn!("no queue templates found in {:?}", dir);
    }
    templates.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(templates)
}

/// Load the optional separator landmark template; `None` when the
/// file does not exist (the supply reader falls back to a fixed
/// fraction of the strip width).
pub fn load_separator<P: AsRef<Path>>(path: P) -> Result<Option<GrayBuffer>> {
    let path = path.as_ref();
    if !path.exists() {
        debug!("separator template {:?} not present, using fallback landmark", path);
        return Ok(None);
    }
    GrayBuffer::load(path, None, None).map(Some)
}

fn list_images(dir: &Path) -> Vec<std::path::PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };
    let mut paths: Vec<_> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| is_supported(p))
        .collect();
    paths.sort();
    paths
}
