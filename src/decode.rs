//! Frame source: external ffmpeg decode of a video segment into a
//! materialized list of timestamped stills

use log::{info, warn};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use vodsig_core::Frame;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to create frame directory {dir:?}")]
    Io {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch {command:?}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("ffmpeg exited with status {status}")]
    DecodeFailed { status: std::process::ExitStatus },
}

/// ffmpeg binary to invoke; `$FFMPEG_PATH` overrides the PATH lookup
fn ffmpeg_binary() -> String {
    std::env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string())
}

/// Decode `[start_sec, end_sec]` of `input` at `fps` frames per
/// second into `out_dir/frame_%06d.jpg` and materialize the ordered
/// frame list up front.
///
/// The list is trimmed to the files ffmpeg actually produced, so a
/// rounding shortfall at the segment tail does not surface later as a
/// missing-file read.
pub fn decode_frames(
    input: &Path,
    out_dir: &Path,
    fps: f64,
    start_sec: f64,
    end_sec: f64,
) -> Result<Vec<Frame>, DecodeError> {
    std::fs::create_dir_all(out_dir).map_err(|source| DecodeError::Io {
        dir: out_dir.to_path_buf(),
        source,
    })?;

    let pattern = out_dir.join("frame_%06d.jpg");
    let binary = ffmpeg_binary();
    let status = Command::new(&binary)
        .arg("-hide_banner")
        .args(["-loglevel", "error"])
        .args(["-ss", &start_sec.to_string()])
        .args(["-to", &end_sec.to_string()])
        .arg("-i")
        .arg(input)
        .args(["-vf", &format!("fps={fps}")])
        .args(["-q:v", "2"])
        .arg(&pattern)
        .status()
        .map_err(|source| DecodeError::Spawn { command: binary, source })?;

    if !status.success() {
        return Err(DecodeError::DecodeFailed { status });
    }

    let total = ((end_sec - start_sec) * fps).floor() as u32;
    let mut frames = Vec::with_capacity(total as usize);
    for i in 0..total {
        let index = i + 1;
        let path = out_dir.join(format!("frame_{index:06}.jpg"));
        if !path.exists() {
            warn!("expected {total} frames, decoder produced {}", frames.len());
            break;
        }
        frames.push(Frame::new(index, start_sec + i as f64 / fps, path));
    }

    info!("decoded {} frames at {fps} fps", frames.len());
    Ok(frames)
}
