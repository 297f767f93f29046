//! Off-screen raster surfaces and the drawing capabilities built on them.
//!
//! The capture and calibration stages never talk to a platform drawing API
//! directly. They draw into a [`Canvas`] through one of two capabilities:
//!
//! - [`Rasterizer`] - scaled blits of an RGBA image into a canvas
//! - [`GlyphRasterizer`] - drawing a single character in a given font
//!
//! Readback is just [`Canvas::pixels`].

mod glyph;
mod software;

pub use glyph::{blit_coverage, FontRegistry, FontdueRasterizer, GlyphRasterizer, FALLBACK_FAMILY};
pub use software::{area_average_into, SoftwareRasterizer};

/// Bytes per RGBA pixel.
pub const RGBA_CHANNELS: usize = 4;

/// Errors raised by raster surfaces and drawing capabilities.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("Rendering unavailable: {reason}")]
    RenderingUnavailable {
        /// Why no drawing capability could serve the request
        reason: String,
    },

    #[error("Image buffer is {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Cannot draw into an empty {width}x{height} canvas")]
    EmptyCanvas { width: u32, height: u32 },
}

impl RasterError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        RasterError::RenderingUnavailable {
            reason: reason.into(),
        }
    }
}

/// A borrowed, row-major RGBA8 image.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a> {
    pub width: u32,
    pub height: u32,
    pub data: &'a [u8],
}

impl<'a> ImageView<'a> {
    /// Wrap an RGBA buffer, checking that it holds exactly `width * height` pixels.
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> Result<Self, RasterError> {
        let expected = width as usize * height as usize * RGBA_CHANNELS;
        if data.len() != expected {
            return Err(RasterError::BufferSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// RGBA value at (x, y). Out-of-range coordinates read as transparent black.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let idx = (y as usize * self.width as usize + x as usize) * RGBA_CHANNELS;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }
}

/// An owned RGBA8 drawing surface.
///
/// Canvases are meant to be kept around and resized rather than reallocated
/// for every frame; [`Canvas::resize`] only touches the allocation when the
/// dimensions actually change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * RGBA_CHANNELS],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Set the canvas dimensions, clearing its contents.
    ///
    /// Returns `true` if the dimensions changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let changed = width != self.width || height != self.height;
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data
            .resize(width as usize * height as usize * RGBA_CHANNELS, 0);
        changed
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Raw RGBA readback.
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    /// Sum of the alpha channel over every pixel.
    pub fn alpha_sum(&self) -> u64 {
        self.data
            .chunks_exact(RGBA_CHANNELS)
            .map(|px| px[3] as u64)
            .sum()
    }
}

/// Scaled image drawing with pixel readback through the target [`Canvas`].
pub trait Rasterizer {
    /// Draw `src` stretched to cover all of `dst`, replacing its contents.
    fn draw_scaled(&mut self, src: ImageView<'_>, dst: &mut Canvas) -> Result<(), RasterError>;
}

impl<R: Rasterizer + ?Sized> Rasterizer for &mut R {
    fn draw_scaled(&mut self, src: ImageView<'_>, dst: &mut Canvas) -> Result<(), RasterError> {
        (**self).draw_scaled(src, dst)
    }
}
