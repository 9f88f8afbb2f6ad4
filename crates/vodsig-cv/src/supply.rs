//! Supply gauge reader: separator landmark localization, a small
//! drift-absorbing alignment search and per-glyph digit recognition

use crate::error::{CvError, Result};
use crate::gray::GrayBuffer;
use crate::template::{DigitTemplateSet, search};
use log::trace;
use serde::Serialize;
use vodsig_core::{Frame, Roi};

/// Binarized glyph crops with fewer foreground pixels are inactive
pub const MIN_ON_PIXELS: usize = 12;
/// Minimum best-match confidence for a digit to be accepted
pub const MIN_DIGIT_CONF: f64 = 0.5;
/// Confidence sentinel contributed by an inactive glyph box
pub const INACTIVE_CONF: f64 = 0.2;
/// Landmark fallback when no separator template is available:
/// this fraction of the strip width
pub const SEPARATOR_FALLBACK_FRACTION: f64 = 0.6;
/// Alignment search radius; offsets dx, dy in [-2, 2]
pub const ALIGN_RADIUS: i32 = 2;

/// One frame's recognized supply gauge
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SupplyReading {
    pub used: Option<u32>,
    pub total: Option<u32>,
    pub conf: f64,
}

impl SupplyReading {
    fn empty() -> Self {
        Self { used: None, total: None, conf: 0.0 }
    }
}

/// State-free per-frame reader over a shared digit template set
#[derive(Debug)]
pub struct SupplyReader {
    templates: DigitTemplateSet,
    separator: Option<GrayBuffer>,
}

impl SupplyReader {
    pub fn new(templates: DigitTemplateSet, separator: Option<GrayBuffer>) -> Self {
        Self { templates, separator }
    }

    pub fn templates(&self) -> &DigitTemplateSet {
        &self.templates
    }

    /// Recognize the `used/total` gauge inside one supply strip crop.
    ///
    /// Recognition uncertainty never errors: an empty template set, an
    /// inactive glyph or a sub-threshold match degrade the reading's
    /// fields and confidence instead.
    pub fn read(&self, strip: &GrayBuffer) -> Result<SupplyReading> {
        if self.templates.is_empty() {
            return Ok(SupplyReading::empty());
        }

        let sep_x = self.locate_separator(strip)?;
        let placement = self.align_boxes(strip, sep_x)?;
        let boxes = match placement {
            Some(boxes) => boxes,
            // Strip too small to hold four glyph boxes anywhere
            None => return Ok(SupplyReading::empty()),
        };

        let mut used_digits: Vec<u8> = Vec::new();
        let mut total_digits: Vec<u8> = Vec::new();
        let mut conf: f64 = 1.0;

        for (i, roi) in boxes.iter().enumerate() {
            let glyph = strip.crop(roi)?.binarized();
            if glyph.count_on() < MIN_ON_PIXELS {
                conf = conf.min(INACTIVE_CONF);
                continue;
            }
            let Some(hit) = self.templates.best_match(&glyph)? else {
                continue;
            };
            conf = conf.min(hit.conf);
            if hit.conf < MIN_DIGIT_CONF {
                trace!("glyph box {i} rejected at conf {:.3}", hit.conf);
                continue;
            }
            if i < 2 {
                used_digits.push(hit.digit);
            } else {
                total_digits.push(hit.digit);
            }
        }

        Ok(SupplyReading {
            used: digits_value(&used_digits),
            total: digits_value(&total_digits),
            conf,
        })
    }

    /// Landmark x coordinate: center of the best separator match, or
    /// a fixed fraction of the strip width when no template fits.
    fn locate_separator(&self, strip: &GrayBuffer) -> Result<i64> {
        let fallback = (strip.width() as f64 * SEPARATOR_FALLBACK_FRACTION).floor() as i64;
        let Some(separator) = &self.separator else {
            return Ok(fallback);
        };
        match search(strip, separator) {
            Ok(hit) => Ok(hit.x as i64 + (separator.width() / 2) as i64),
            Err(CvError::TemplateTooLarge { .. }) => Ok(fallback),
            Err(e) => Err(e),
        }
    }

    /// Exhaustive 5x5 offset search around the landmark: position two
    /// glyph boxes on each side (used left, total right, 1-px gaps)
    /// and keep the offset maximizing the summed best-match
    /// confidence. Compensates sub-pixel ROI drift without
    /// re-calibrating per frame.
    fn align_boxes(&self, strip: &GrayBuffer, sep_x: i64) -> Result<Option<[Roi; 4]>> {
        let mut best: Option<([Roi; 4], f64)> = None;

        for dy in -ALIGN_RADIUS..=ALIGN_RADIUS {
            for dx in -ALIGN_RADIUS..=ALIGN_RADIUS {
                let Some(boxes) = self.place_boxes(strip, sep_x, dx as i64, dy as i64) else {
                    continue;
                };
                let mut score = 0.0;
                for roi in &boxes {
                    let glyph = strip.crop(roi)?.binarized();
                    if let Some(hit) = self.templates.best_match(&glyph)? {
                        score += hit.conf;
                    }
                }
                if best.as_ref().is_none_or(|(_, s)| score > *s) {
                    best = Some((boxes, score));
                }
            }
        }

        Ok(best.map(|(boxes, _)| boxes))
    }

    /// Glyph box geometry for one candidate offset, or `None` when a
    /// box would leave the strip.
    fn place_boxes(&self, strip: &GrayBuffer, sep_x: i64, dx: i64, dy: i64) -> Option<[Roi; 4]> {
        let (gw, gh) = self.templates.size();
        let (gw_i, gh_i) = (gw as i64, gh as i64);
        let base_y = (strip.height() as i64 - gh_i) / 2 + dy;

        // One blank column on each side of the landmark column, and
        // one between adjacent glyph boxes.
        let left1 = sep_x - 1 - gw_i + dx;
        let left0 = left1 - 1 - gw_i;
        let right0 = sep_x + 2 + dx;
        let right1 = right0 + gw_i + 1;

        let mut boxes = [Roi::new(0, 0, gw, gh); 4];
        for (slot, x) in [left0, left1, right0, right1].into_iter().enumerate() {
            if x < 0
                || base_y < 0
                || x + gw_i > strip.width() as i64
                || base_y + gh_i > strip.height() as i64
            {
                return None;
            }
            boxes[slot] = Roi::new(x as u32, base_y as u32, gw, gh);
        }
        Some(boxes)
    }
}

/// Read the supply strip of every frame, in frame order.
///
/// With the `parallel` feature the per-frame reads fan out across a
/// rayon pool (each read is a pure function over the shared immutable
/// template set); results come back in input order so the
/// change-point fold downstream stays strictly sequential.
pub fn read_supply_series(
    reader: &SupplyReader,
    frames: &[Frame],
    strip: &Roi,
) -> Result<Vec<SupplyReading>> {
    let read_one = |frame: &Frame| {
        let crop = GrayBuffer::load(&frame.path, Some(strip), None)?;
        reader.read(&crop)
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        frames.par_iter().map(read_one).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        frames.iter().map(read_one).collect()
    }
}

/// Concatenate accepted digits into a numeric value; `None` when no
/// digit was accepted for the field
fn digits_value(digits: &[u8]) -> Option<u32> {
    if digits.is_empty() {
        return None;
    }
    Some(digits.iter().fold(0u32, |acc, &d| acc * 10 + d as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::DigitTemplate;

    const GLYPH_W: u32 = 8;
    const GLYPH_H: u32 = 12;

    /// Seven-segment rendering of a digit on an 8x12 canvas; every
    /// digit is a distinct high-contrast pattern with enough
    /// foreground pixels to clear the inactive check.
    fn glyph_pixels(digit: u8) -> Vec<u8> {
        let mut pixels = vec![0u8; (GLYPH_W * GLYPH_H) as usize];
        let mut seg = |xs: std::ops::RangeInclusive<u32>, ys: std::ops::RangeInclusive<u32>| {
            for y in ys {
                for x in xs.clone() {
                    pixels[(y * GLYPH_W + x) as usize] = 255;
                }
            }
        };
        // a f b g e c d
        let on = match digit {
            0 => [true, true, true, false, true, true, true],
            1 => [false, false, true, false, false, true, false],
            2 => [true, false, true, true, true, false, true],
            3 => [true, false, true, true, false, true, true],
            4 => [false, true, true, true, false, true, false],
            5 => [true, true, false, true, false, true, true],
            6 => [true, true, false, true, true, true, true],
            7 => [true, false, true, false, false, true, false],
            8 => [true, true, true, true, true, true, true],
            _ => [true, true, true, true, false, true, true],
        };
        if on[0] {
            seg(1..=6, 0..=0); // a: top
        }
        if on[1] {
            seg(0..=1, 1..=4); // f: top left
        }
        if on[2] {
            seg(6..=7, 1..=4); // b: top right
        }
        if on[3] {
            seg(1..=6, 5..=5); // g: middle
        }
        if on[4] {
            seg(0..=1, 6..=10); // e: bottom left
        }
        if on[5] {
            seg(6..=7, 6..=10); // c: bottom right
        }
        if on[6] {
            seg(1..=6, 11..=11); // d: bottom
        }
        pixels
    }

    fn template_set(digits: &[u8]) -> DigitTemplateSet {
        DigitTemplateSet::new(
            digits
                .iter()
                .map(|&d| DigitTemplate {
                    digit: d,
                    image: GrayBuffer::from_raw(GLYPH_W, GLYPH_H, glyph_pixels(d)),
                })
                .collect(),
        )
    }

    /// Paint a glyph into a strip at the given top-left corner
    fn blit(strip_pixels: &mut [u8], strip_w: u32, glyph: &[u8], x0: u32, y0: u32) {
        for y in 0..GLYPH_H {
            for x in 0..GLYPH_W {
                strip_pixels[((y0 + y) * strip_w + x0 + x) as usize] =
                    glyph[(y * GLYPH_W + x) as usize];
            }
        }
    }

    /// Glyph box x positions around a landmark, matching the reader's
    /// placement geometry
    fn box_positions(sep_x: i64) -> [i64; 4] {
        let left1 = sep_x - 1 - GLYPH_W as i64;
        let right0 = sep_x + 2;
        [left1 - 1 - GLYPH_W as i64, left1, right0, right0 + GLYPH_W as i64 + 1]
    }

    /// 70x16 strip with four digits rendered at the fallback-landmark
    /// box positions, shifted by (dx, dy) to exercise alignment
    fn strip_with(digits: [u8; 4], dx: i64, dy: i64) -> GrayBuffer {
        let (w, h) = (70u32, 16u32);
        let mut pixels = vec![0u8; (w * h) as usize];
        let sep_x = (w as f64 * SEPARATOR_FALLBACK_FRACTION).floor() as i64; // 42
        let base_y = (h as i64 - GLYPH_H as i64) / 2;
        let xs = box_positions(sep_x);
        for (slot, &digit) in digits.iter().enumerate() {
            blit(
                &mut pixels,
                w,
                &glyph_pixels(digit),
                (xs[slot] + dx) as u32,
                (base_y + dy) as u32,
            );
        }
        GrayBuffer::from_raw(w, h, pixels)
    }

    #[test]
    fn test_exact_reading_high_confidence() {
        let reader = SupplyReader::new(template_set(&[0, 1, 2, 4]), None);
        let strip = strip_with([0, 4, 1, 2], 0, 0);
        let reading = reader.read(&strip).unwrap();
        assert_eq!(reading.used, Some(4));
        assert_eq!(reading.total, Some(12));
        assert!(reading.conf > 0.9, "conf was {}", reading.conf);
    }

    #[test]
    fn test_alignment_absorbs_small_drift() {
        let reader = SupplyReader::new(template_set(&[0, 1, 2, 4]), None);
        for &(dx, dy) in &[(2i64, 0i64), (-2, 1), (1, -2)] {
            let strip = strip_with([0, 4, 1, 2], dx, dy);
            let reading = reader.read(&strip).unwrap();
            assert_eq!(reading.used, Some(4), "dx={dx} dy={dy}");
            assert_eq!(reading.total, Some(12), "dx={dx} dy={dy}");
            assert!(reading.conf > 0.9, "dx={dx} dy={dy} conf={}", reading.conf);
        }
    }

    #[test]
    fn test_blank_strip_is_inactive_everywhere() {
        let reader = SupplyReader::new(template_set(&[0, 1]), None);
        let strip = GrayBuffer::from_raw(70, 16, vec![0; 70 * 16]);
        let reading = reader.read(&strip).unwrap();
        assert_eq!(reading.used, None);
        assert_eq!(reading.total, None);
        assert_eq!(reading.conf, INACTIVE_CONF);
    }

    #[test]
    fn test_empty_template_set_reads_nothing() {
        let reader = SupplyReader::new(DigitTemplateSet::default(), None);
        let strip = strip_with([0, 4, 1, 2], 0, 0);
        let reading = reader.read(&strip).unwrap();
        assert_eq!(reading.used, None);
        assert_eq!(reading.total, None);
        assert_eq!(reading.conf, 0.0);
    }

    #[test]
    fn test_strip_too_small_for_boxes() {
        let reader = SupplyReader::new(template_set(&[0, 1]), None);
        let strip = GrayBuffer::from_raw(10, 4, vec![0; 40]);
        let reading = reader.read(&strip).unwrap();
        assert_eq!(reading.used, None);
        assert_eq!(reading.conf, 0.0);
    }

    #[test]
    fn test_separator_template_localizes_landmark() {
        // Separator rendered away from the 0.6 fallback position; the
        // reader must find it and place boxes around it. The template
        // is a lit column followed by a dark one, a pair no glyph
        // column sequence in the fixture reproduces exactly.
        let (w, h) = (70u32, 16u32);
        let slash_x = 30u32;
        let sep_x = slash_x as i64 + 1; // landmark is the match center
        let mut pixels = vec![0u8; (w * h) as usize];
        let base_y = (h as i64 - GLYPH_H as i64) / 2;
        for y in 0..GLYPH_H {
            pixels[((base_y as u32 + y) * w + slash_x) as usize] = 255;
        }
        let xs = box_positions(sep_x);
        for (slot, &digit) in [3u8, 4, 1, 2].iter().enumerate() {
            blit(&mut pixels, w, &glyph_pixels(digit), xs[slot] as u32, base_y as u32);
        }
        let strip = GrayBuffer::from_raw(w, h, pixels);

        let mut slash_pixels = vec![0u8; 2 * GLYPH_H as usize];
        for y in 0..GLYPH_H as usize {
            slash_pixels[y * 2] = 255;
        }
        let slash = GrayBuffer::from_raw(2, GLYPH_H, slash_pixels);
        let reader = SupplyReader::new(template_set(&[1, 2, 3, 4]), Some(slash));
        let reading = reader.read(&strip).unwrap();
        assert_eq!(reading.used, Some(34));
        assert_eq!(reading.total, Some(12));
    }

    #[test]
    fn test_digits_value() {
        assert_eq!(digits_value(&[]), None);
        assert_eq!(digits_value(&[7]), Some(7));
        assert_eq!(digits_value(&[0, 4]), Some(4));
        assert_eq!(digits_value(&[1, 2]), Some(12));
    }
}
