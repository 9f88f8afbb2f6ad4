//! ROI profile: persisted per-resolution UI layout

use crate::roi::{Roi, SlotLayout};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Screen resolution the profile was calibrated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub w: u32,
    pub h: u32,
}

/// Supply gauge strip plus the per-digit boxes derived by calibration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplyRegion {
    #[serde(flatten)]
    pub strip: Roi,
    pub used_boxes: Vec<Roi>,
    pub total_boxes: Vec<Roi>,
}

/// Production queue strip plus its slot geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueRegion {
    #[serde(flatten)]
    pub strip: Roi,
    pub slots: SlotLayout,
}

/// A named ROI layout for one UI resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub resolution: Resolution,
    pub supply: SupplyRegion,
    pub selection_panel: Roi,
    pub production_queue: QueueRegion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Profile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Profile> {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read profile: {:?}", path.as_ref()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse profile: {:?}", path.as_ref()))
    }
}
