//! Command-line interface

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "vodsig",
    about = "Extract telemetry signals from a game interface recording"
)]
pub struct Args {
    /// Input video file
    #[arg(long)]
    pub input: PathBuf,

    /// Output directory for frames, evidence and result.json
    #[arg(long, default_value = "out")]
    pub out: PathBuf,

    /// ROI profile describing the UI layout
    #[arg(long, default_value = "profiles/profile_rm_1080p.json")]
    pub profile: PathBuf,

    /// Frame sampling rate
    #[arg(long, default_value_t = 2.0)]
    pub fps: f64,

    /// Segment start, in seconds
    #[arg(long, default_value_t = 0.0)]
    pub start: f64,

    /// Segment end, in seconds
    #[arg(long, default_value_t = 420.0)]
    pub end: f64,

    /// Directory of digit glyph templates (files named 0-9)
    #[arg(long, default_value = "assets/templates/digits")]
    pub digit_templates: PathBuf,

    /// Directory of queue icon templates (files named by item id)
    #[arg(long, default_value = "assets/templates/queue")]
    pub queue_templates: PathBuf,

    /// Separator landmark template for the supply strip
    #[arg(long, default_value = "assets/templates/digits/slash.jpg")]
    pub separator: PathBuf,
}
