//! Brightness to character mapping.

use std::fmt;

use super::charset::CharacterRamp;
use super::gamma::{GammaCache, GammaTable, DEFAULT_GAMMA};
use crate::capture::{FrameSequence, PixelFrame};

/// ITU-R BT.709 luma weights for linear R, G, B.
pub const BT709_WEIGHTS: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// Cosmetic tone-mapping parameters, applied per render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Decode exponent; must be > 0
    pub gamma: f64,
    /// Linear-space contrast around mid-grey; must be >= 0
    pub contrast: f64,
    /// Linear-space offset added after contrast
    pub brightness: f64,
    /// Map bright pixels to sparse characters instead of dense ones
    pub invert: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            contrast: 1.0,
            brightness: 0.0,
            invert: false,
        }
    }
}

/// Out-of-range render options.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderOptionsError {
    #[error("Gamma must be greater than 0, got {0}")]
    NonPositiveGamma(f64),

    #[error("Contrast must not be negative, got {0}")]
    NegativeContrast(f64),
}

impl RenderOptions {
    pub fn validate(&self) -> Result<(), RenderOptionsError> {
        if self.gamma.is_nan() || self.gamma <= 0.0 {
            return Err(RenderOptionsError::NonPositiveGamma(self.gamma));
        }
        if self.contrast.is_nan() || self.contrast < 0.0 {
            return Err(RenderOptionsError::NegativeContrast(self.contrast));
        }
        Ok(())
    }
}

/// A character grid: rows joined by `\n`, no trailing newline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedFrame {
    text: String,
}

impl RenderedFrame {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> std::str::Lines<'_> {
        self.text.lines()
    }

    /// Number of rows in the grid.
    pub fn rows(&self) -> usize {
        if self.text.is_empty() {
            0
        } else {
            self.text.split('\n').count()
        }
    }
}

impl fmt::Display for RenderedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<RenderedFrame> for String {
    fn from(frame: RenderedFrame) -> Self {
        frame.text
    }
}

/// Linear luminance of an RGBA pixel (alpha ignored).
#[inline]
pub fn luminance(lut: &GammaTable, px: [u8; 4]) -> f64 {
    BT709_WEIGHTS[0] * lut.decode(px[0])
        + BT709_WEIGHTS[1] * lut.decode(px[1])
        + BT709_WEIGHTS[2] * lut.decode(px[2])
}

/// Ramp index for a linear luminance value.
///
/// Applies contrast and brightness in linear space, clamps, optionally
/// inverts, then re-encodes with `1 / gamma` so the ramp is walked on a
/// perceptual scale.
#[inline]
pub fn tone_index(linear: f64, options: &RenderOptions, levels: usize) -> usize {
    let mut l = (linear - 0.5) * options.contrast + 0.5 + options.brightness;
    l = l.clamp(0.0, 1.0);
    if options.invert {
        l = 1.0 - l;
    }
    let perceptual = l.powf(1.0 / options.gamma);
    let idx = (perceptual * levels as f64).floor();
    (idx.max(0.0) as usize).min(levels.saturating_sub(1))
}

/// Maps pixel frames to character grids.
///
/// Rendering reruns on every cosmetic change. The only state kept between
/// passes is the gamma table for the last gamma used.
#[derive(Debug, Clone, Default)]
pub struct TonalRenderer {
    gamma: GammaCache,
}

impl TonalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render one frame into a new [`RenderedFrame`].
    ///
    /// Cells beyond the end of a short (placeholder) buffer are treated as
    /// transparent black.
    pub fn render(
        &mut self,
        frame: &PixelFrame,
        cols: u32,
        rows: u32,
        ramp: &CharacterRamp,
        options: &RenderOptions,
    ) -> RenderedFrame {
        let mut text = String::new();
        self.render_into(frame, cols, rows, ramp, options, &mut text);
        RenderedFrame { text }
    }

    /// Render one frame into `buffer`, reusing its allocation.
    ///
    /// # Returns
    /// The number of characters written, excluding row separators.
    pub fn render_into(
        &mut self,
        frame: &PixelFrame,
        cols: u32,
        rows: u32,
        ramp: &CharacterRamp,
        options: &RenderOptions,
        buffer: &mut String,
    ) -> usize {
        buffer.clear();
        buffer.reserve((cols as usize + 1) * rows as usize);

        let lut = self.gamma.get(options.gamma);
        let levels = ramp.len();

        for y in 0..rows {
            if y > 0 {
                buffer.push('\n');
            }
            for x in 0..cols {
                let l = luminance(lut, frame.pixel(x, y));
                buffer.push(ramp.at(tone_index(l, options, levels)));
            }
        }

        cols as usize * rows as usize
    }

    /// Render every frame of a sequence with the same ramp and options.
    pub fn render_sequence(
        &mut self,
        sequence: &FrameSequence,
        ramp: &CharacterRamp,
        options: &RenderOptions,
    ) -> Vec<RenderedFrame> {
        sequence
            .iter()
            .map(|frame| self.render(frame, sequence.cols(), sequence.rows(), ramp, options))
            .collect()
    }
}
