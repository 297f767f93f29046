//! Drift-corrected frame selection for playback.
//!
//! The scheduler does no timing of its own. Something external (a render
//! loop, a `tokio::time::interval`) calls [`PlaybackScheduler::tick`] with a
//! monotonic timestamp in milliseconds and gets back the frame to show.
//! Elapsed time is measured from an anchor that only moves forward by whole
//! frames, so late ticks never accumulate drift.

/// Result of a [`tick`](PlaybackScheduler::tick) that changed the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Frame index to display
    pub index: usize,
    /// Playback reached the last frame without looping and has stopped
    pub stopped: bool,
}

#[derive(Debug, Clone)]
pub struct PlaybackScheduler {
    frame_count: usize,
    fps: f64,
    looping: bool,
    playing: bool,
    anchor_ms: Option<f64>,
    local_frame: usize,
}

impl PlaybackScheduler {
    /// A scheduler positioned at frame 0, ready to play.
    pub fn new(frame_count: usize, fps: f64, looping: bool) -> Self {
        Self {
            frame_count,
            fps,
            looping,
            playing: frame_count > 0,
            anchor_ms: None,
            local_frame: 0,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn current_frame(&self) -> usize {
        self.local_frame
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Milliseconds each frame stays on screen.
    pub fn frame_duration_ms(&self) -> f64 {
        1000.0 / self.fps
    }

    /// Change the rate. The next tick re-anchors.
    pub fn set_fps(&mut self, fps: f64) {
        self.fps = fps;
        self.anchor_ms = None;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Continue from the current frame. The next tick re-anchors, so time
    /// spent paused is not caught up.
    pub fn resume(&mut self) {
        if self.frame_count == 0 {
            return;
        }
        self.playing = true;
        self.anchor_ms = None;
    }

    /// Jump to `index` (clamped to the last frame).
    pub fn seek(&mut self, index: usize) {
        self.local_frame = index.min(self.frame_count.saturating_sub(1));
        self.anchor_ms = None;
    }

    /// Advance to timestamp `now_ms`.
    ///
    /// # Returns
    /// The frame to display when the selection changes (or on the first tick
    /// after a start, resume or seek); `None` while paused or between frames.
    pub fn tick(&mut self, now_ms: f64) -> Option<Selection> {
        if !self.playing || self.frame_count == 0 {
            return None;
        }

        let start = match self.anchor_ms {
            Some(start) if now_ms >= start => start,
            // First tick, or the clock went backwards
            _ => {
                self.anchor_ms = Some(now_ms);
                return Some(Selection {
                    index: self.local_frame,
                    stopped: false,
                });
            }
        };

        let frame_duration = self.frame_duration_ms();
        let elapsed = now_ms - start;
        let advanced = (elapsed / frame_duration).floor() as usize;
        if advanced == 0 {
            return None;
        }

        let target = self.local_frame + advanced;
        let last = self.frame_count - 1;
        let (next, mut stopped) = if target >= self.frame_count {
            if self.looping {
                (target % self.frame_count, false)
            } else {
                (last, true)
            }
        } else {
            (target, false)
        };
        if !self.looping && next >= last {
            stopped = true;
        }

        self.anchor_ms = Some(now_ms - elapsed % frame_duration);
        self.local_frame = next;
        if stopped {
            log::debug!("Playback reached final frame {}", next);
            self.playing = false;
            self.anchor_ms = None;
        }

        Some(Selection {
            index: next,
            stopped,
        })
    }
}
