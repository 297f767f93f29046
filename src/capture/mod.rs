//! Video capture: walks a time window of a video and samples each frame
//! down to a grid of cell colours.
//!
//! The [`CaptureWalker`] owns the loop. It seeks a [`VideoSource`] to each
//! target time, waits for the seek to settle (or time out), and hands the
//! decoded frame to a [`FrameSampler`].

mod errors;
mod ffmpeg;
mod frame;
mod sampler;
mod source;
mod walker;
mod window;

pub use errors::{CaptureError, SourceError};
pub use ffmpeg::FfmpegSource;
pub use frame::{FrameSequence, PixelFrame};
pub use sampler::{FrameSampler, OVERSAMPLE};
pub use source::{FrameListSource, VideoFrame, VideoSource};
pub use walker::{CaptureStatus, CaptureWalker, DEFAULT_SEEK_TIMEOUT, YIELD_INTERVAL};
pub use window::CaptureWindow;
