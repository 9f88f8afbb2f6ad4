//! Diff trigger: frame-to-frame change detection inside one ROI

use crate::error::Result;
use crate::gray::GrayBuffer;
use log::debug;
use vodsig_core::{Frame, Roi};

/// Default normalized difference threshold
pub const DEFAULT_DIFF_THRESHOLD: f64 = 0.08;

/// A frame where the monitored ROI changed enough to warrant deeper
/// analysis
#[derive(Debug, Clone, PartialEq)]
pub struct DiffHit {
    pub t: f64,
    pub frame: Frame,
    pub score: f64,
}

/// Sequential change detector over one ROI.
///
/// Comparisons run against the last *hit* frame, not the immediately
/// preceding one: a slow continuous change fires once instead of on
/// every frame, at the cost of coarser timing. The first frame only
/// seeds the reference and is never a hit.
#[derive(Debug)]
pub struct DiffTrigger {
    threshold: f64,
    reference: Option<GrayBuffer>,
}

impl DiffTrigger {
    pub fn new(threshold: f64) -> Self {
        Self { threshold, reference: None }
    }

    /// Feed the next frame's ROI buffer in timestamp order; returns
    /// the score when it fires.
    pub fn push(&mut self, current: GrayBuffer) -> Result<Option<f64>> {
        let Some(reference) = &self.reference else {
            self.reference = Some(current);
            return Ok(None);
        };

        let score = reference.mean_abs_diff(&current)?;
        if score >= self.threshold {
            self.reference = Some(current);
            return Ok(Some(score));
        }
        Ok(None)
    }
}

/// Run a [`DiffTrigger`] over a decoded frame sequence, loading the
/// ROI crop of each frame. Fewer than two frames never produce hits.
pub fn detect_roi_changes(frames: &[Frame], roi: &Roi, threshold: f64) -> Result<Vec<DiffHit>> {
    let mut hits = Vec::new();
    if frames.len() < 2 {
        return Ok(hits);
    }

    let mut trigger = DiffTrigger::new(threshold);
    for frame in frames {
        let crop = GrayBuffer::load(&frame.path, Some(roi), None)?;
        if let Some(score) = trigger.push(crop)? {
            debug!("roi change at t={:.2} score={:.4}", frame.t, score);
            hits.push(DiffHit {
                t: frame.t,
                frame: frame.clone(),
                score,
            });
        }
    }

    Ok(hits)
}
