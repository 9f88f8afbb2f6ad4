//! Glyph and icon template sets

pub mod loader;
pub mod matcher;

pub use loader::{load_digit_templates, load_queue_templates, load_separator};
pub use matcher::{SearchHit, match_score, search};

use crate::error::Result;
use crate::gray::GrayBuffer;
use crate::template::matcher::best_match;

/// Reference bitmap of one digit glyph (0-9)
#[derive(Debug, Clone)]
pub struct DigitTemplate {
    pub digit: u8,
    pub image: GrayBuffer,
}

/// Reference bitmap of one queue icon
#[derive(Debug, Clone)]
pub struct QueueTemplate {
    pub id: String,
    pub image: GrayBuffer,
}

/// Best digit match of one glyph crop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DigitMatch {
    pub digit: u8,
    pub conf: f64,
}

/// Immutable digit template arena, shared read-only across frames.
///
/// All glyphs are normalized to one canonical size at construction so
/// per-frame crops never need per-template resizing.
#[derive(Debug, Clone, Default)]
pub struct DigitTemplateSet {
    glyphs: Vec<DigitTemplate>,
    size: (u32, u32),
}

impl DigitTemplateSet {
    /// Normalize glyphs to the maximal width/height across the set
    /// and order them by ascending digit.
    pub fn new(mut glyphs: Vec<DigitTemplate>) -> Self {
        if glyphs.is_empty() {
            return Self::default();
        }
        let w = glyphs.iter().map(|t| t.image.width()).max().unwrap_or(0);
        let h = glyphs.iter().map(|t| t.image.height()).max().unwrap_or(0);
        for glyph in &mut glyphs {
            glyph.image = glyph.image.resized(w, h);
        }
        glyphs.sort_by_key(|t| t.digit);
        Self { glyphs, size: (w, h) }
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Canonical glyph size `(w, h)` all templates share
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn glyphs(&self) -> &[DigitTemplate] {
        &self.glyphs
    }

    /// Best-matching digit for a glyph crop, resized to the canonical
    /// size when needed. Ties go to the lowest digit. `None` when the
    /// set is empty.
    pub fn best_match(&self, crop: &GrayBuffer) -> Result<Option<DigitMatch>> {
        let sized;
        let target = if crop.width() == self.size.0 && crop.height() == self.size.1 {
            crop
        } else {
            sized = crop.resized(self.size.0, self.size.1);
            &sized
        };

        let hit = best_match(self.glyphs.iter().map(|t| (t.digit, &t.image)), target)?;
        Ok(hit.map(|(digit, conf)| DigitMatch { digit, conf }))
    }
}
