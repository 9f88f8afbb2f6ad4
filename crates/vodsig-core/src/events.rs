//! Timeline events, deduplication and change-point encoding

use crate::output::SupplySample;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// One entry of the final event timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub t: f64,
    pub id: String,
    pub count: u32,
    pub conf: f64,
    pub evidence: Vec<String>,
}

/// Collapses events into at most one per `(floor(t), id)` bucket.
///
/// Within a bucket the maximal-confidence event survives; output is
/// sorted by ascending timestamp, then by id so equal-timestamp
/// events always come out in the same order.
pub fn dedupe_events(events: Vec<Event>) -> Vec<Event> {
    let mut buckets: HashMap<(i64, String), Event> = HashMap::new();

    for event in events {
        let key = (event.t.floor() as i64, event.id.clone());
        match buckets.entry(key) {
            Entry::Occupied(mut slot) => {
                if event.conf > slot.get().conf {
                    slot.insert(event);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(event);
            }
        }
    }

    let mut deduped: Vec<Event> = buckets.into_values().collect();
    deduped.sort_by(|a, b| a.t.total_cmp(&b.t).then_with(|| a.id.cmp(&b.id)));
    deduped
}

/// Change-point encoder for the supply series.
///
/// Emits a sample only when the `(used, total)` pair differs from the
/// previously emitted one, keeping the series compact across long
/// stretches of identical readings.
#[derive(Debug, Default)]
pub struct ChangePointEncoder {
    last: Option<(Option<u32>, Option<u32>)>,
}

impl ChangePointEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one reading; returns the sample to emit, if any
    pub fn push(
        &mut self,
        t: f64,
        used: Option<u32>,
        total: Option<u32>,
        conf: f64,
    ) -> Option<SupplySample> {
        let key = (used, total);
        if self.last == Some(key) {
            return None;
        }
        self.last = Some(key);
        Some(SupplySample { t, used, total, conf })
    }
}
