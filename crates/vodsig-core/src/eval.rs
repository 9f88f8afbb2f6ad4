//! Event timeline evaluation against a hand-labeled ground truth

use crate::events::Event;
use serde::Serialize;

/// Aggregate match quality of a predicted timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvalResult {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub mean_dt: f64,
    pub matched: usize,
    pub predicted: usize,
    pub ground_truth: usize,
}

/// Greedy one-to-one matching of predictions to ground-truth events.
///
/// Each ground-truth event claims the nearest unused prediction with
/// the same id within `tol_sec`. A prediction is consumed by at most
/// one ground-truth event.
pub fn evaluate_events(pred: &[Event], gt: &[Event], tol_sec: f64) -> EvalResult {
    let mut used_pred = vec![false; pred.len()];
    let mut matched = 0usize;
    let mut sum_dt = 0.0;

    for g in gt {
        let mut best_idx = None;
        let mut best_dt = f64::INFINITY;

        for (j, p) in pred.iter().enumerate() {
            if used_pred[j] || p.id != g.id {
                continue;
            }
            let dt = (p.t - g.t).abs();
            if dt <= tol_sec && dt < best_dt {
                best_dt = dt;
                best_idx = Some(j);
            }
        }

        if let Some(j) = best_idx {
            used_pred[j] = true;
            matched += 1;
            sum_dt += best_dt;
        }
    }

    let precision = if pred.is_empty() { 0.0 } else { matched as f64 / pred.len() as f64 };
    let recall = if gt.is_empty() { 0.0 } else { matched as f64 / gt.len() as f64 };
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    let mean_dt = if matched > 0 { sum_dt / matched as f64 } else { 0.0 };

    EvalResult {
        precision,
        recall,
        f1,
        mean_dt,
        matched,
        predicted: pred.len(),
        ground_truth: gt.len(),
    }
}
