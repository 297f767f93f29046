//! Drives a [`VideoSource`] across a [`CaptureWindow`], one frame at a time.

use std::time::Duration;

use tokio::sync::watch;

use crate::raster::Rasterizer;

use super::errors::CaptureError;
use super::frame::{FrameSequence, PixelFrame};
use super::sampler::FrameSampler;
use super::source::VideoSource;
use super::window::CaptureWindow;

/// How long a single seek may take before the frame is duplicated.
pub const DEFAULT_SEEK_TIMEOUT: Duration = Duration::from_secs(5);

/// The walker yields to the scheduler after every this many frames.
pub const YIELD_INTERVAL: usize = 4;

/// Observable state of a [`CaptureWalker`].
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureStatus {
    Idle,
    Running { completed: usize, total: usize },
    Completed { frames: usize, degraded: usize },
    Cancelled { completed: usize, total: usize },
    Failed { reason: String },
}

impl CaptureStatus {
    /// Fraction of frames captured, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        match self {
            CaptureStatus::Idle | CaptureStatus::Failed { .. } => 0.0,
            CaptureStatus::Completed { .. } => 1.0,
            CaptureStatus::Running { completed, total }
            | CaptureStatus::Cancelled { completed, total } => {
                if *total == 0 {
                    0.0
                } else {
                    *completed as f64 / *total as f64
                }
            }
        }
    }
}

/// Marks the run cancelled if its future is dropped mid-flight.
struct RunGuard<'a> {
    status: &'a watch::Sender<CaptureStatus>,
    armed: bool,
}

impl RunGuard<'_> {
    fn finish(mut self, status: CaptureStatus) {
        self.armed = false;
        self.status.send_replace(status);
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.status.send_modify(|status| {
            if let CaptureStatus::Running { completed, total } = *status {
                log::info!("Capture cancelled after {}/{} frames", completed, total);
                *status = CaptureStatus::Cancelled { completed, total };
            }
        });
    }
}

/// Captures a window of video into a [`FrameSequence`].
///
/// Seeks are strictly sequential. A seek that does not settle within the
/// timeout is absorbed: the previous frame is reused (or an empty placeholder
/// at the start) and the run continues. Any other source or drawing error
/// ends the run.
///
/// Dropping the future returned by [`run`](CaptureWalker::run) cancels the
/// capture; subscribers then observe [`CaptureStatus::Cancelled`].
pub struct CaptureWalker<R> {
    sampler: FrameSampler<R>,
    status: watch::Sender<CaptureStatus>,
    seek_timeout: Duration,
}

impl<R: Rasterizer> CaptureWalker<R> {
    pub fn new(rasterizer: R, cols: u32) -> Self {
        let (status, _) = watch::channel(CaptureStatus::Idle);
        Self {
            sampler: FrameSampler::new(rasterizer, cols),
            status,
            seek_timeout: DEFAULT_SEEK_TIMEOUT,
        }
    }

    pub fn with_seek_timeout(mut self, timeout: Duration) -> Self {
        self.seek_timeout = timeout;
        self
    }

    pub fn seek_timeout(&self) -> Duration {
        self.seek_timeout
    }

    pub fn cols(&self) -> u32 {
        self.sampler.cols()
    }

    pub fn set_cols(&mut self, cols: u32) {
        self.sampler.set_cols(cols);
    }

    /// Watch status changes from another task.
    pub fn subscribe(&self) -> watch::Receiver<CaptureStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> CaptureStatus {
        self.status.borrow().clone()
    }

    /// Capture every frame of `window` from `source`.
    pub async fn run<S: VideoSource>(
        &mut self,
        source: &mut S,
        window: &CaptureWindow,
    ) -> Result<FrameSequence, CaptureError> {
        self.run_with_progress(source, window, |_| {}).await
    }

    /// Like [`run`](CaptureWalker::run), calling `on_progress` with the
    /// completed fraction after each frame.
    ///
    /// # Arguments
    /// * `source` - Video to seek through
    /// * `window` - In/out points and capture rate
    /// * `on_progress` - Receives `completed / total`, ending at exactly 1.0
    ///
    /// # Returns
    /// One [`PixelFrame`] per target time, in order
    pub async fn run_with_progress<S, F>(
        &mut self,
        source: &mut S,
        window: &CaptureWindow,
        mut on_progress: F,
    ) -> Result<FrameSequence, CaptureError>
    where
        S: VideoSource,
        F: FnMut(f64),
    {
        window.validate()?;
        let cols = self.sampler.cols();
        if cols == 0 {
            return Err(CaptureError::InvalidColumns);
        }
        let (width, height) = source.dimensions();
        if width == 0 || height == 0 {
            return Err(CaptureError::NoVideo { width, height });
        }

        let total = window.total_frames();
        let rows = self.sampler.rows_for(width, height);
        log::info!(
            "Capturing {} frames at {} fps ({:.3}s..{:.3}s) into {}x{}",
            total,
            window.fps,
            window.in_point,
            window.out_point,
            cols,
            rows
        );

        self.sampler.reset();
        self.status.send_replace(CaptureStatus::Running {
            completed: 0,
            total,
        });
        let guard = RunGuard {
            status: &self.status,
            armed: true,
        };

        let mut frames: Vec<PixelFrame> = Vec::with_capacity(total);
        let mut degraded = 0;

        for index in 0..total {
            let time = window.timestamp(index);
            match tokio::time::timeout(self.seek_timeout, source.seek(time)).await {
                Ok(Ok(())) => match self.sampler.sample(source.current_frame()) {
                    Ok(frame) => frames.push(frame),
                    Err(e) => {
                        guard.finish(CaptureStatus::Failed {
                            reason: e.to_string(),
                        });
                        return Err(e.into());
                    }
                },
                Ok(Err(e)) => {
                    log::error!("Seek to {:.3}s failed: {}", time, e);
                    guard.finish(CaptureStatus::Failed {
                        reason: e.to_string(),
                    });
                    return Err(e.into());
                }
                Err(_) => {
                    let err = CaptureError::SeekTimeout {
                        time,
                        timeout: self.seek_timeout,
                    };
                    log::warn!("{}; reusing previous frame", err);
                    degraded += 1;
                    let previous = frames.last().cloned().unwrap_or_else(PixelFrame::empty);
                    frames.push(previous);
                }
            }

            let completed = index + 1;
            self.status
                .send_replace(CaptureStatus::Running { completed, total });
            on_progress(completed as f64 / total as f64);

            if index % YIELD_INTERVAL == YIELD_INTERVAL - 1 {
                tokio::task::yield_now().await;
            }
        }

        guard.finish(CaptureStatus::Completed {
            frames: frames.len(),
            degraded,
        });
        if degraded > 0 {
            log::warn!("{} of {} frames were duplicated after seek timeouts", degraded, total);
        }

        Ok(FrameSequence::new(cols, rows, frames))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_fractions() {
        assert_eq!(CaptureStatus::Idle.progress(), 0.0);
        assert_eq!(
            CaptureStatus::Running {
                completed: 1,
                total: 4
            }
            .progress(),
            0.25
        );
        assert_eq!(
            CaptureStatus::Completed {
                frames: 4,
                degraded: 0
            }
            .progress(),
            1.0
        );
        assert_eq!(
            CaptureStatus::Cancelled {
                completed: 0,
                total: 0
            }
            .progress(),
            0.0
        );
    }

    #[test]
    fn test_guard_marks_running_as_cancelled() {
        let (tx, rx) = watch::channel(CaptureStatus::Running {
            completed: 2,
            total: 5,
        });
        drop(RunGuard {
            status: &tx,
            armed: true,
        });
        assert_eq!(
            *rx.borrow(),
            CaptureStatus::Cancelled {
                completed: 2,
                total: 5
            }
        );
    }

    #[test]
    fn test_finished_guard_keeps_status() {
        let (tx, rx) = watch::channel(CaptureStatus::Idle);
        let guard = RunGuard {
            status: &tx,
            armed: true,
        };
        guard.finish(CaptureStatus::Completed {
            frames: 3,
            degraded: 1,
        });
        assert!(matches!(*rx.borrow(), CaptureStatus::Completed { .. }));
    }
}
