//! Downscales a video frame to a grid of cell colours.

use crate::ascii::rows_for;
use crate::raster::{Canvas, ImageView, RasterError, Rasterizer};

use super::frame::PixelFrame;

/// Factor of the intermediate draw over the target grid.
pub const OVERSAMPLE: u32 = 2;

/// Samples frames through a [`Rasterizer`] into `cols x rows` RGBA grids.
///
/// The frame is first drawn at twice the grid size and then reduced to the
/// grid, which averages more source pixels into each cell than a single
/// scaled draw would. Both canvases live for the sampler's lifetime and are
/// only reallocated when the target size changes.
pub struct FrameSampler<R> {
    rasterizer: R,
    cols: u32,
    oversample: Canvas,
    output: Canvas,
}

impl<R: Rasterizer> FrameSampler<R> {
    pub fn new(rasterizer: R, cols: u32) -> Self {
        Self {
            rasterizer,
            cols,
            oversample: Canvas::default(),
            output: Canvas::default(),
        }
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn set_cols(&mut self, cols: u32) {
        self.cols = cols;
    }

    /// Grid rows for a source of the given size at the current column count.
    pub fn rows_for(&self, width: u32, height: u32) -> u32 {
        rows_for(self.cols, width, height)
    }

    /// Release the working canvases.
    pub fn reset(&mut self) {
        self.oversample = Canvas::default();
        self.output = Canvas::default();
    }

    /// Sample one frame into a fresh [`PixelFrame`].
    ///
    /// # Arguments
    /// * `frame` - Current video frame at its intrinsic resolution
    ///
    /// # Returns
    /// A `cols x rows` grid, or an error if the frame is empty or drawing fails
    pub fn sample(&mut self, frame: ImageView<'_>) -> Result<PixelFrame, RasterError> {
        let rows = self.rows_for(frame.width, frame.height);
        if self.cols == 0 || rows == 0 {
            return Err(RasterError::EmptyCanvas {
                width: self.cols,
                height: rows,
            });
        }

        if self
            .oversample
            .resize(self.cols * OVERSAMPLE, rows * OVERSAMPLE)
        {
            log::debug!(
                "Sampler canvases resized to {}x{} (grid {}x{})",
                self.cols * OVERSAMPLE,
                rows * OVERSAMPLE,
                self.cols,
                rows
            );
        }
        self.output.resize(self.cols, rows);

        self.rasterizer.draw_scaled(frame, &mut self.oversample)?;
        self.rasterizer
            .draw_scaled(self.oversample.view(), &mut self.output)?;

        PixelFrame::new(self.cols, rows, self.output.pixels().to_vec())
    }
}
