//! Fixed-position similarity scoring and exhaustive sliding-window search

use crate::error::{CvError, Result};
use crate::gray::GrayBuffer;

/// Maximal squared pixel difference (255^2); the MSE normalizer
const MSE_SCALE: f64 = 65025.0;

/// Best offset of a sliding-window search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub x: u32,
    pub y: u32,
    pub score: f64,
}

/// Fixed-position similarity of two equal-sized buffers:
/// `1 - MSE/65025`, clamped to [0, 1]. Symmetric, and 1.0 for a
/// buffer against itself.
pub fn match_score(a: &GrayBuffer, b: &GrayBuffer) -> Result<f64> {
    if a.width() != b.width() || a.height() != b.height() {
        return Err(CvError::SizeMismatch {
            a_w: a.width(),
            a_h: a.height(),
            b_w: b.width(),
            b_h: b.height(),
        });
    }

    let sum: u64 = a
        .pixels()
        .iter()
        .zip(b.pixels())
        .map(|(&pa, &pb)| {
            let d = pa as i64 - pb as i64;
            (d * d) as u64
        })
        .sum();
    let mse = sum as f64 / a.pixels().len() as f64;
    Ok((1.0 - mse / MSE_SCALE).clamp(0.0, 1.0))
}

/// Best-scoring entry of a keyed template iterator against a target.
///
/// Iteration order is the tie-break: the first maximum wins, so
/// callers pass templates in a deterministic (sorted) order.
pub fn best_match<'a, K, I>(templates: I, target: &GrayBuffer) -> Result<Option<(K, f64)>>
where
    I: IntoIterator<Item = (K, &'a GrayBuffer)>,
{
    let mut best: Option<(K, f64)> = None;
    for (key, image) in templates {
        let conf = match_score(target, image)?;
        match &best {
            Some((_, best_conf)) if conf <= *best_conf => {}
            _ => best = Some((key, conf)),
        }
    }
    Ok(best)
}

/// Exhaustive sliding-window search: evaluate the fixed-position
/// similarity at every valid top-left offset and return the maximum.
///
/// Cost is O(target pixels x template pixels); keep inputs small.
pub fn search(target: &GrayBuffer, template: &GrayBuffer) -> Result<SearchHit> {
    let (gw, gh) = (target.width(), target.height());
    let (tw, th) = (template.width(), template.height());
    if tw > gw || th > gh {
        return Err(CvError::TemplateTooLarge {
            template_w: tw,
            template_h: th,
            target_w: gw,
            target_h: gh,
        });
    }

    let mut best = SearchHit { x: 0, y: 0, score: f64::NEG_INFINITY };
    for y in 0..=(gh - th) {
        for x in 0..=(gw - tw) {
            let mut sum: u64 = 0;
            for j in 0..th {
                for i in 0..tw {
                    let d = target.get(x + i, y + j) as i64 - template.get(i, j) as i64;
                    sum += (d * d) as u64;
                }
            }
            let mse = sum as f64 / (tw as u64 * th as u64) as f64;
            let score = 1.0 - mse / MSE_SCALE;
            if score > best.score {
                best = SearchHit { x, y, score };
            }
        }
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> GrayBuffer {
        let pixels = (0..w * h).map(|i| (i * 7 % 256) as u8).collect();
        GrayBuffer::from_raw(w, h, pixels)
    }

    #[test]
    fn test_score_symmetric_and_reflexive() {
        let a = gradient(6, 6);
        let b = GrayBuffer::from_raw(6, 6, vec![90; 36]);
        assert_eq!(match_score(&a, &b).unwrap(), match_score(&b, &a).unwrap());
        assert_eq!(match_score(&a, &a).unwrap(), 1.0);
    }

    #[test]
    fn test_score_opposite_extremes_is_zero() {
        let black = GrayBuffer::from_raw(3, 3, vec![0; 9]);
        let white = GrayBuffer::from_raw(3, 3, vec![255; 9]);
        assert_eq!(match_score(&black, &white).unwrap(), 0.0);
    }

    #[test]
    fn test_score_size_mismatch() {
        let a = gradient(4, 4);
        let b = gradient(4, 5);
        assert!(matches!(match_score(&a, &b), Err(CvError::SizeMismatch { .. })));
    }

    #[test]
    fn test_search_exact_target_is_origin() {
        let t = gradient(8, 8);
        let hit = search(&t, &t).unwrap();
        assert_eq!((hit.x, hit.y), (0, 0));
        assert_eq!(hit.score, 1.0);
    }

    #[test]
    fn test_search_finds_embedded_template() {
        let mut pixels = vec![0u8; 12 * 10];
        // 3x3 bright block at (5, 4)
        for j in 0..3 {
            for i in 0..3 {
                pixels[(4 + j) * 12 + 5 + i] = 250;
            }
        }
        let target = GrayBuffer::from_raw(12, 10, pixels);
        let template = GrayBuffer::from_raw(3, 3, vec![250; 9]);
        let hit = search(&target, &template).unwrap();
        assert_eq!((hit.x, hit.y), (5, 4));
        assert_eq!(hit.score, 1.0);
    }

    #[test]
    fn test_search_template_too_large() {
        let target = gradient(4, 4);
        let template = gradient(5, 4);
        assert!(matches!(
            search(&target, &template),
            Err(CvError::TemplateTooLarge { .. })
        ));
    }
}
