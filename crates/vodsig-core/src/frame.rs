//! Decoded frame handles produced by the frame source

use std::path::PathBuf;

/// One sampled frame of the input recording.
///
/// Frames are materialized up front by the decoder, ordered by
/// non-decreasing timestamp, and never mutated downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// 1-based decode index
    pub index: u32,
    /// Timestamp in seconds from the start of the recording
    pub t: f64,
    /// Path of the decoded still image
    pub path: PathBuf,
}

impl Frame {
    pub fn new(index: u32, t: f64, path: PathBuf) -> Self {
        Self { index, t, path }
    }
}
