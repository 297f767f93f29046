//! Error types for capture operations.
//!
//! [`SourceError`] covers the video decoding collaborator; [`CaptureError`]
//! covers a whole capture run, including configuration rejected up front.

use std::time::Duration;

use crate::raster::RasterError;

/// Errors raised by a [`VideoSource`](super::VideoSource).
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("FFmpeg not found. Please install it with:\n\n    brew install ffmpeg\n")]
    FfmpegNotFound,

    #[error("Failed to spawn {program}: {source}")]
    SpawnFailed {
        program: &'static str,
        source: std::io::Error,
    },

    #[error("{program} exited with code {exit_code:?}\n{stderr}")]
    ProcessFailed {
        program: &'static str,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Could not read video metadata: {0}")]
    Probe(String),

    #[error("Decoded frame is {actual} bytes, expected {expected}")]
    FrameSize { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// Map a spawn failure, treating a missing executable as "not installed".
    pub fn spawn(program: &'static str, e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            SourceError::FfmpegNotFound
        } else {
            SourceError::SpawnFailed { program, source: e }
        }
    }
}

/// Errors that can occur during a capture run.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Out point {out_point}s is before in point {in_point}s")]
    InvalidRange { in_point: f64, out_point: f64 },

    #[error("Capture rate must be at least 1 fps, got {0}")]
    InvalidFps(f64),

    #[error("Column count must be at least 1")]
    InvalidColumns,

    #[error("No video loaded (source reports {width}x{height})")]
    NoVideo { width: u32, height: u32 },

    /// Absorbed inside a run by frame duplication; never returned from one.
    #[error("Seek to {time:.3}s timed out after {timeout:?}")]
    SeekTimeout { time: f64, timeout: Duration },

    #[error(transparent)]
    Rendering(#[from] RasterError),

    #[error("Video source failed: {0}")]
    Source(#[from] SourceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_range_display() {
        let err = CaptureError::InvalidRange {
            in_point: 4.0,
            out_point: 2.5,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("2.5s"));
        assert!(msg.contains("4s"));
    }

    #[test]
    fn test_invalid_fps_display() {
        let msg = format!("{}", CaptureError::InvalidFps(0.5));
        assert!(msg.contains("at least 1 fps"));
        assert!(msg.contains("0.5"));
    }

    #[test]
    fn test_seek_timeout_display() {
        let err = CaptureError::SeekTimeout {
            time: 1.25,
            timeout: Duration::from_secs(5),
        };
        assert_eq!(format!("{}", err), "Seek to 1.250s timed out after 5s");
    }

    #[test]
    fn test_rendering_is_transparent() {
        let err: CaptureError = RasterError::unavailable("no canvas").into();
        assert_eq!(format!("{}", err), "Rendering unavailable: no canvas");
    }

    #[test]
    fn test_spawn_not_found_maps_to_ffmpeg_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = SourceError::spawn("ffmpeg", io);
        assert!(matches!(err, SourceError::FfmpegNotFound));
        assert!(format!("{}", err).contains("brew install ffmpeg"));
    }

    #[test]
    fn test_spawn_other_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = SourceError::spawn("ffprobe", io);
        let msg = format!("{}", err);
        assert!(msg.contains("ffprobe"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_source_error_wraps() {
        let err: CaptureError = SourceError::Probe("no video stream".to_string()).into();
        assert_eq!(
            format!("{}", err),
            "Video source failed: Could not read video metadata: no video stream"
        );
    }
}
