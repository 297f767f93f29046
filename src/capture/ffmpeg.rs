//! [`VideoSource`] backed by the `ffprobe` and `ffmpeg` executables.
//!
//! Metadata is read once with `ffprobe`. Each seek spawns a short-lived
//! `ffmpeg` that decodes a single frame at the requested time to raw RGBA on
//! stdout. Children are killed if the seek future is dropped, so a timed-out
//! or cancelled seek leaves nothing running.
//!
//! FFmpeg applies the stream's display rotation while decoding, so the
//! reported dimensions are the displayed ones: width and height are swapped
//! for a quarter-turn rotation.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use serde::Deserialize;
use tokio::process::Command;

use crate::raster::{ImageView, RGBA_CHANNELS};

use super::errors::SourceError;
use super::source::VideoSource;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    #[serde(default)]
    side_data_list: Vec<ProbeSideData>,
    tags: Option<ProbeTags>,
}

#[derive(Debug, Deserialize)]
struct ProbeSideData {
    rotation: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ProbeTags {
    rotate: Option<String>,
}

impl ProbeStream {
    /// Display rotation in degrees: the display matrix side data, else the
    /// legacy `rotate` tag, else 0.
    fn rotation(&self) -> f64 {
        self.side_data_list
            .iter()
            .find_map(|d| d.rotation)
            .or_else(|| {
                self.tags
                    .as_ref()
                    .and_then(|t| t.rotate.as_deref())
                    .and_then(|r| r.trim().parse().ok())
            })
            .unwrap_or(0.0)
    }
}

/// True for rotations of 90 or 270 degrees in either direction.
fn is_quarter_turn(degrees: f64) -> bool {
    (degrees.round() as i64).rem_euclid(180) == 90
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// A video file decoded through FFmpeg subprocesses.
#[derive(Debug)]
pub struct FfmpegSource {
    path: PathBuf,
    width: u32,
    height: u32,
    duration: f64,
    frame: Vec<u8>,
}

impl FfmpegSource {
    /// Probe `path` and prepare a source for it.
    ///
    /// # Returns
    /// The opened source, or an error if FFmpeg is missing or the file has no video stream
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let output = Command::new("ffprobe")
            .args(["-v", "error", "-select_streams", "v:0"])
            .args([
                "-show_entries",
                "stream=width,height:stream_tags=rotate:stream_side_data=rotation:format=duration",
            ])
            .args(["-of", "json"])
            .arg(&path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| SourceError::spawn("ffprobe", e))?;

        if !output.status.success() {
            return Err(SourceError::ProcessFailed {
                program: "ffprobe",
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let (width, height, duration) = parse_probe(&output.stdout)?;
        log::info!(
            "Opened {} ({}x{}, {:.2}s)",
            path.display(),
            width,
            height,
            duration
        );

        Ok(Self {
            path,
            width,
            height,
            duration,
            frame: vec![0; width as usize * height as usize * RGBA_CHANNELS],
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * RGBA_CHANNELS
    }

    /// Replace the current frame with one decoded at `time`.
    ///
    /// An empty decode (past the last decodable frame) keeps the previous
    /// frame. Any other size that is not exactly one frame is an error.
    fn store_frame(&mut self, decoded: &[u8], time: f64) -> Result<(), SourceError> {
        let expected = self.frame_len();
        if decoded.is_empty() {
            log::debug!("No frame decoded at {:.3}s, keeping previous", time);
            return Ok(());
        }
        if decoded.len() != expected {
            return Err(SourceError::FrameSize {
                expected,
                actual: decoded.len(),
            });
        }
        self.frame.copy_from_slice(decoded);
        Ok(())
    }
}

fn parse_probe(stdout: &[u8]) -> Result<(u32, u32, f64), SourceError> {
    let probe: ProbeOutput =
        serde_json::from_slice(stdout).map_err(|e| SourceError::Probe(e.to_string()))?;

    let stream = probe
        .streams
        .first()
        .ok_or_else(|| SourceError::Probe("no video stream".to_string()))?;
    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(SourceError::Probe("video stream has no size".to_string())),
    };
    let rotation = stream.rotation();
    let (width, height) = if is_quarter_turn(rotation) {
        log::debug!("Stream rotated {} degrees, decoding as {}x{}", rotation, height, width);
        (height, width)
    } else {
        (width, height)
    };

    let duration = probe
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| SourceError::Probe("unknown duration".to_string()))?;

    Ok((width, height, duration))
}

impl VideoSource for FfmpegSource {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    async fn seek(&mut self, time: f64) -> Result<(), SourceError> {
        let output = Command::new("ffmpeg")
            .args(["-hide_banner", "-loglevel", "error"])
            .args(["-ss", &format!("{:.6}", time.max(0.0))])
            .arg("-i")
            .arg(&self.path)
            .args(["-an", "-sn", "-frames:v", "1"])
            .args(["-f", "rawvideo", "-pix_fmt", "rgba", "-"])
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| SourceError::spawn("ffmpeg", e))?;

        if !output.status.success() {
            return Err(SourceError::ProcessFailed {
                program: "ffmpeg",
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        self.store_frame(&output.stdout, time)
    }

    fn current_frame(&self) -> ImageView<'_> {
        ImageView {
            width: self.width,
            height: self.height,
            data: &self.frame,
        }
    }
}
