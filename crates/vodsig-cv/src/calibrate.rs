//! Calibration primitives: mask clustering and glyph box derivation
//! used by the offline ROI-bootstrapping tooling

use crate::components::connected_components;
use crate::gray::GrayBuffer;
use vodsig_core::Roi;

/// Columns with more foreground pixels than this count as occupied
/// during cluster detection
pub const MIN_COLUMN_ON: u32 = 2;
/// Glyph candidate boxes narrower than this are discarded
pub const MIN_GLYPH_W: u32 = 2;
/// Glyph candidate boxes shorter than this are discarded
pub const MIN_GLYPH_H: u32 = 6;

/// Maximal runs of occupied columns, as inclusive `(start, end)` x
/// ranges in mask coordinates
pub fn column_clusters(mask: &GrayBuffer, min_col_on: u32) -> Vec<(u32, u32)> {
    let mut clusters = Vec::new();
    let mut start: Option<u32> = None;

    for x in 0..mask.width() {
        let mut on = 0u32;
        for y in 0..mask.height() {
            if mask.get(x, y) > 0 {
                on += 1;
            }
        }
        let occupied = on > min_col_on;
        match (occupied, start) {
            (true, None) => start = Some(x),
            (false, Some(s)) => {
                clusters.push((s, x - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        clusters.push((s, mask.width() - 1));
    }
    clusters
}

/// Tight bounding box of the foreground inside a column range, or
/// `None` when the range holds no foreground at all
pub fn cluster_bbox(mask: &GrayBuffer, start: u32, end: u32) -> Option<Roi> {
    let mut min_y = mask.height();
    let mut max_y = 0u32;
    let mut any = false;

    for x in start..=end {
        for y in 0..mask.height() {
            if mask.get(x, y) > 0 {
                any = true;
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }
    }

    any.then(|| Roi::new(start, min_y, end - start + 1, max_y - min_y + 1))
}

/// Candidate glyph boxes of a digit-field mask: connected components
/// filtered to plausible glyph proportions, left-to-right, keeping the
/// rightmost `expect` (digit fields are right-aligned in the UI)
pub fn glyph_boxes(mask: &GrayBuffer, expect: usize) -> Vec<Roi> {
    let mut boxes: Vec<Roi> = connected_components(mask)
        .into_iter()
        .filter(|b| b.w >= MIN_GLYPH_W && b.h >= MIN_GLYPH_H)
        .collect();
    boxes.sort_by_key(|b| b.x);
    let skip = boxes.len().saturating_sub(expect);
    boxes.split_off(skip)
}

/// Normalize glyph crops to a common size: the maximal width and
/// height across the set (the canonical template size)
pub fn normalize_glyphs(crops: &[GrayBuffer]) -> (Vec<GrayBuffer>, (u32, u32)) {
    let w = crops.iter().map(|c| c.width()).max().unwrap_or(0);
    let h = crops.iter().map(|c| c.height()).max().unwrap_or(0);
    let normalized = crops.iter().map(|c| c.resized(w, h)).collect();
    (normalized, (w, h))
}
