//! Core data model for the vodsig pipeline: ROIs, profiles, frames,
//! events and the persisted output schema.

pub mod eval;
pub mod events;
pub mod frame;
pub mod output;
pub mod profile;
pub mod roi;

pub use events::{ChangePointEncoder, Event, dedupe_events};
pub use frame::Frame;
pub use output::{QueueEvent, SelectionChange, Segment, SignalOutput, SupplySample};
pub use profile::Profile;
pub use roi::{Roi, SlotLayout};
