//! Color classification rules and binary mask construction

use crate::error::{CvError, Result};
use crate::gray::GrayBuffer;
use image::RgbImage;
use vodsig_core::Roi;

/// Minimum green channel for the `green` rule
pub const GREEN_MIN: u8 = 120;
/// Required lead of green over red and blue for the `green` rule
pub const GREEN_MARGIN: u8 = 20;
/// Minimum channel average for the `white` rule
pub const WHITE_MIN_AVG: f64 = 140.0;
/// Maximum max-min channel spread for the `white` rule
pub const WHITE_MAX_SPREAD: u8 = 60;

/// Closed set of per-pixel foreground classifiers.
///
/// The rules are order-dependent: `white` never claims a pixel that
/// `green` classifies, so the two masks are disjoint by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskRule {
    Green,
    White,
}

impl MaskRule {
    pub fn is_foreground(self, r: u8, g: u8, b: u8) -> bool {
        match self {
            MaskRule::Green => is_green(r, g, b),
            MaskRule::White => {
                let max = r.max(g).max(b);
                let min = r.min(g).min(b);
                let avg = (r as f64 + g as f64 + b as f64) / 3.0;
                avg > WHITE_MIN_AVG && max - min < WHITE_MAX_SPREAD && !is_green(r, g, b)
            }
        }
    }
}

fn is_green(r: u8, g: u8, b: u8) -> bool {
    g > GREEN_MIN && g as i32 - r as i32 > GREEN_MARGIN as i32 && g as i32 - b as i32 > GREEN_MARGIN as i32
}

/// Classify a color crop into a {0, 255} mask
pub fn binary_mask(img: &RgbImage, roi: Option<&Roi>, rule: MaskRule) -> Result<GrayBuffer> {
    let full = Roi::new(0, 0, img.width(), img.height());
    let roi = *roi.unwrap_or(&full);
    if !roi.fits_within(img.width(), img.height()) {
        return Err(CvError::OutOfBounds {
            x: roi.x,
            y: roi.y,
            w: roi.w,
            h: roi.h,
            src_w: img.width(),
            src_h: img.height(),
        });
    }

    let mut pixels = Vec::with_capacity((roi.w * roi.h) as usize);
    for y in roi.y..roi.bottom() {
        for x in roi.x..roi.right() {
            let p = img.get_pixel(x, y);
            pixels.push(if rule.is_foreground(p[0], p[1], p[2]) { 255 } else { 0 });
        }
    }
    Ok(GrayBuffer::from_raw(roi.w, roi.h, pixels))
}
