//! Persisted signal output schema (version 1)

use crate::events::Event;
use serde::{Deserialize, Serialize};

pub const OUTPUT_VERSION: u32 = 1;

/// One change-point sample of the supply gauge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupplySample {
    pub t: f64,
    pub used: Option<u32>,
    pub total: Option<u32>,
    pub conf: f64,
}

/// A frame where the selection panel changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionChange {
    pub t: f64,
    pub frame: String,
}

/// An icon recognized in the production queue on a triggered frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEvent {
    pub t: f64,
    pub item_id: String,
    pub conf: f64,
    pub frame: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start_sec: f64,
    pub end_sec: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Signals {
    pub supply_series: Vec<SupplySample>,
    pub selection_changes: Vec<SelectionChange>,
    pub queue_events: Vec<QueueEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    pub warnings: Vec<String>,
}

/// Root of `result.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalOutput {
    pub version: u32,
    pub segment: Segment,
    pub roi_profile: String,
    pub signals: Signals,
    pub events: Vec<Event>,
    pub diagnostics: Diagnostics,
}

impl SignalOutput {
    pub fn new(segment: Segment, roi_profile: String) -> Self {
        Self {
            version: OUTPUT_VERSION,
            segment,
            roi_profile,
            signals: Signals::default(),
            events: Vec::new(),
            diagnostics: Diagnostics::default(),
        }
    }
}
