//! Signal-extraction engine for game-interface recordings.
//!
//! Color-based pixel classification, connected-component box
//! discovery, template matching with confidence scoring, the
//! drift-absorbing supply reader, queue icon recognition, diff
//! triggering and the calibration primitives behind ROI profiles.

pub mod calibrate;
pub mod components;
pub mod diff;
pub mod error;
pub mod gray;
pub mod mask;
pub mod queue;
pub mod supply;
pub mod template;

// Re-export commonly used types
pub use components::connected_components;
pub use diff::{DEFAULT_DIFF_THRESHOLD, DiffHit, DiffTrigger, detect_roi_changes};
pub use error::{CvError, Result};
pub use gray::GrayBuffer;
pub use mask::{MaskRule, binary_mask};
pub use queue::{MIN_QUEUE_CONF, QueueHit, read_queue_icons};
pub use supply::{SupplyReader, SupplyReading, read_supply_series};
pub use template::{
    DigitTemplate, DigitTemplateSet, QueueTemplate, load_digit_templates, load_queue_templates,
    load_separator,
};
