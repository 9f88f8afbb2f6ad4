//! Rectangular regions of interest in frame pixel coordinates

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Roi {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    /// Whether this rectangle lies entirely inside a `width` x `height` extent
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.w > 0 && self.h > 0 && self.right() <= width && self.bottom() <= height
    }

    /// Same rectangle translated by the top-left corner of `origin`
    pub fn offset_by(&self, origin: &Roi) -> Roi {
        Roi::new(origin.x + self.x, origin.y + self.y, self.w, self.h)
    }
}

/// Fixed slot geometry of the production queue strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotLayout {
    pub count: u32,
    pub slot_w: u32,
    pub slot_h: u32,
    pub gap: u32,
    pub start_x: u32,
    pub start_y: u32,
}

impl SlotLayout {
    /// Absolute ROI of slot `index` inside a queue strip anchored at `queue`
    pub fn slot_roi(&self, queue: &Roi, index: u32) -> Roi {
        let x = queue.x + self.start_x + index * (self.slot_w + self.gap);
        let y = queue.y + self.start_y;
        Roi::new(x, y, self.slot_w, self.slot_h)
    }
}
