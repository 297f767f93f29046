//! The video collaborator a capture run drives.

use crate::raster::{ImageView, RasterError, RGBA_CHANNELS};

use super::errors::SourceError;

/// A seekable video whose current frame can be read back as RGBA.
///
/// A capture run seeks one timestamp at a time and waits for each seek to
/// settle before reading [`current_frame`](VideoSource::current_frame).
#[allow(async_fn_in_trait)]
pub trait VideoSource {
    /// Intrinsic frame size in pixels. `(0, 0)` means nothing is loaded.
    fn dimensions(&self) -> (u32, u32);

    /// Length of the video in seconds.
    fn duration(&self) -> f64;

    /// Move the playhead to `time` seconds and decode the frame there.
    async fn seek(&mut self, time: f64) -> Result<(), SourceError>;

    /// The frame at the last settled seek.
    fn current_frame(&self) -> ImageView<'_>;
}

/// A decoded RGBA video frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    /// Raw pixel data in RGBA format
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl VideoFrame {
    /// Wrap an RGBA buffer, checking its length against the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RasterError> {
        ImageView::new(width, height, &data)?;
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// A frame filled with one colour.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * RGBA_CHANNELS)
            .collect();
        Self {
            data,
            width,
            height,
        }
    }

    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

/// An in-memory video: a list of same-sized frames shown at a fixed rate.
///
/// Seeking to `t` selects frame `floor(t * fps)`, clamped to the last frame.
#[derive(Debug, Clone)]
pub struct FrameListSource {
    frames: Vec<VideoFrame>,
    fps: f64,
    current: usize,
    seeks: usize,
}

impl FrameListSource {
    pub fn new(frames: Vec<VideoFrame>, fps: f64) -> Self {
        Self {
            frames,
            fps,
            current: 0,
            seeks: 0,
        }
    }

    /// A single still image lasting `duration` seconds.
    pub fn still(frame: VideoFrame, duration: f64) -> Self {
        Self::new(vec![frame], 1.0 / duration.max(f64::EPSILON))
    }

    /// Index shown after the last seek.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Number of seeks performed so far.
    pub fn seek_count(&self) -> usize {
        self.seeks
    }
}

impl VideoSource for FrameListSource {
    fn dimensions(&self) -> (u32, u32) {
        self.frames
            .first()
            .map(|f| (f.width, f.height))
            .unwrap_or((0, 0))
    }

    fn duration(&self) -> f64 {
        self.frames.len() as f64 / self.fps
    }

    async fn seek(&mut self, time: f64) -> Result<(), SourceError> {
        self.seeks += 1;
        let index = (time.max(0.0) * self.fps + 1e-9).floor() as usize;
        self.current = index.min(self.frames.len().saturating_sub(1));
        Ok(())
    }

    fn current_frame(&self) -> ImageView<'_> {
        match self.frames.get(self.current) {
            Some(frame) => frame.view(),
            None => ImageView {
                width: 0,
                height: 0,
                data: &[],
            },
        }
    }
}
