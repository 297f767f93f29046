//! The span of video time a capture run samples.

use super::errors::CaptureError;

/// In/out points (seconds) and the rate at which to sample between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureWindow {
    pub in_point: f64,
    pub out_point: f64,
    pub fps: f64,
}

impl CaptureWindow {
    /// Build a validated window.
    pub fn new(in_point: f64, out_point: f64, fps: f64) -> Result<Self, CaptureError> {
        let window = Self {
            in_point,
            out_point,
            fps,
        };
        window.validate()?;
        Ok(window)
    }

    /// The whole of a video of `duration` seconds.
    pub fn full(duration: f64, fps: f64) -> Result<Self, CaptureError> {
        Self::new(0.0, duration, fps)
    }

    /// Reject `out_point < in_point` and `fps < 1`.
    pub fn validate(&self) -> Result<(), CaptureError> {
        if !(self.fps.is_finite() && self.fps >= 1.0) {
            return Err(CaptureError::InvalidFps(self.fps));
        }
        if !(self.in_point.is_finite() && self.out_point.is_finite())
            || self.out_point < self.in_point
        {
            return Err(CaptureError::InvalidRange {
                in_point: self.in_point,
                out_point: self.out_point,
            });
        }
        Ok(())
    }

    pub fn duration(&self) -> f64 {
        self.out_point - self.in_point
    }

    /// `ceil((out - in) * fps)`
    pub fn total_frames(&self) -> usize {
        (self.duration() * self.fps).ceil().max(0.0) as usize
    }

    /// Target time of frame `index`, never past the out point.
    pub fn timestamp(&self, index: usize) -> f64 {
        (self.in_point + index as f64 / self.fps).min(self.out_point)
    }

    /// All target times in capture order.
    pub fn timestamps(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.total_frames()).map(move |i| self.timestamp(i))
    }
}
