//! Error taxonomy of the signal-extraction engine

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by pixel access and matching primitives.
///
/// Recognition uncertainty (low confidence, inactive glyphs, empty
/// template sets) is never an error; it flows through readings as
/// `None` fields and low confidence values.
#[derive(Debug, Error)]
pub enum CvError {
    #[error("ROI {x},{y} {w}x{h} exceeds source extent {src_w}x{src_h}")]
    OutOfBounds {
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        src_w: u32,
        src_h: u32,
    },

    #[error("pairwise pixel op on mismatched buffers: {a_w}x{a_h} vs {b_w}x{b_h}")]
    SizeMismatch {
        a_w: u32,
        a_h: u32,
        b_w: u32,
        b_h: u32,
    },

    #[error("template {template_w}x{template_h} does not fit target {target_w}x{target_h}")]
    TemplateTooLarge {
        template_w: u32,
        template_h: u32,
        target_w: u32,
        target_h: u32,
    },

    #[error("failed to decode image {path:?}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, CvError>;
