//! End-to-end signal extraction: decode, read, trigger, aggregate,
//! persist

use crate::cli::Args;
use crate::decode::decode_frames;
use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::Path;
use vodsig_core::{
    ChangePointEncoder, Event, Profile, QueueEvent, Segment, SelectionChange, SignalOutput,
    dedupe_events,
};
use vodsig_cv::{
    MIN_QUEUE_CONF, SupplyReader, detect_roi_changes, load_digit_templates, load_queue_templates,
    load_separator, read_queue_icons, read_supply_series,
};

const DIFF_THRESHOLD: f64 = vodsig_cv::DEFAULT_DIFF_THRESHOLD;

pub fn run(args: &Args) -> Result<SignalOutput> {
    fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create output directory {:?}", args.out))?;
    let evidence_dir = args.out.join("evidence");

    let profile = Profile::load(&args.profile)?;
    info!("using ROI profile '{}'", profile.name);

    let mut output = SignalOutput::new(
        Segment { start_sec: args.start, end_sec: args.end },
        profile.name.clone(),
    );

    let digit_templates = load_digit_templates(&args.digit_templates)?;
    let queue_templates = load_queue_templates(&args.queue_templates)?;
    let separator = load_separator(&args.separator)?;
    if digit_templates.is_empty() {
        output.diagnostics.warnings.push("digit_templates_empty".to_string());
    }
    if queue_templates.is_empty() {
        output.diagnostics.warnings.push("queue_templates_empty".to_string());
    }

    let frames = decode_frames(&args.input, &args.out.join("frames"), args.fps, args.start, args.end)
        .context("Frame decode failed")?;

    // Supply gauge: per-frame reads, change-point encoded
    let reader = SupplyReader::new(digit_templates, separator);
    let readings = read_supply_series(&reader, &frames, &profile.supply.strip)?;
    let mut encoder = ChangePointEncoder::new();
    for (frame, reading) in frames.iter().zip(&readings) {
        if let Some(sample) = encoder.push(frame.t, reading.used, reading.total, reading.conf) {
            output.signals.supply_series.push(sample);
        }
    }
    info!(
        "supply series: {} change points over {} frames",
        output.signals.supply_series.len(),
        frames.len()
    );

    // Selection panel: diff hits become selection-change markers
    let selection_hits = detect_roi_changes(&frames, &profile.selection_panel, DIFF_THRESHOLD)?;
    for (i, hit) in selection_hits.iter().enumerate() {
        let evidence = copy_evidence(&hit.frame.path, &evidence_dir, "sel", i + 1)?;
        output.signals.selection_changes.push(SelectionChange { t: hit.t, frame: evidence });
    }

    // Production queue: icon recognition only on triggered frames
    let queue_hits = detect_roi_changes(&frames, &profile.production_queue.strip, DIFF_THRESHOLD)?;
    for (i, hit) in queue_hits.iter().enumerate() {
        let evidence = copy_evidence(&hit.frame.path, &evidence_dir, "q", i + 1)?;
        let frame_img = image::open(&hit.frame.path)
            .with_context(|| format!("Failed to load frame {:?}", hit.frame.path))?
            .to_rgb8();
        let icons = read_queue_icons(
            &frame_img,
            &profile.production_queue.strip,
            &profile.production_queue.slots,
            &queue_templates,
            MIN_QUEUE_CONF,
        )?;
        for icon in icons {
            output.signals.queue_events.push(QueueEvent {
                t: hit.t,
                item_id: icon.item_id,
                conf: icon.conf,
                frame: evidence.clone(),
            });
        }
    }
    info!(
        "{} selection changes, {} queue events",
        output.signals.selection_changes.len(),
        output.signals.queue_events.len()
    );

    output.events = dedupe_events(
        output
            .signals
            .queue_events
            .iter()
            .map(|e| Event {
                t: e.t,
                id: format!("{}_started", e.item_id),
                count: 1,
                conf: e.conf,
                evidence: vec![e.frame.clone()],
            })
            .collect(),
    );

    if !output.diagnostics.warnings.is_empty() {
        warn!("diagnostics: {}", output.diagnostics.warnings.join(", "));
    }

    let out_path = args.out.join("result.json");
    let json = serde_json::to_string_pretty(&output).context("Failed to serialize output")?;
    fs::write(&out_path, json).with_context(|| format!("Failed to write {:?}", out_path))?;
    info!("wrote {:?}", out_path);

    Ok(output)
}

/// Copy a triggering frame into the evidence directory under a
/// deterministic `{prefix}_{6-digit-ordinal}.jpg` name; returns the
/// output-relative reference stored in the signal file.
fn copy_evidence(frame: &Path, evidence_dir: &Path, prefix: &str, ordinal: usize) -> Result<String> {
    fs::create_dir_all(evidence_dir)
        .with_context(|| format!("Failed to create evidence directory {evidence_dir:?}"))?;
    let filename = format!("{prefix}_{ordinal:06}.jpg");
    fs::copy(frame, evidence_dir.join(&filename))
        .with_context(|| format!("Failed to copy evidence frame {frame:?}"))?;
    Ok(format!("evidence/{filename}"))
}
