//! Pure in-memory rasterizer using area-average (box filter) resampling.

use super::{Canvas, ImageView, RasterError, Rasterizer, RGBA_CHANNELS};

/// A [`Rasterizer`] that resamples by averaging every source pixel a
/// destination pixel covers, weighted by the covered area.
///
/// Downscaling by an integer factor is an exact box filter: halving a
/// 4x4 image averages each 2x2 block. Upscaling degenerates to nearest
/// neighbour since each destination footprint lies inside one source pixel.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareRasterizer;

impl SoftwareRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl Rasterizer for SoftwareRasterizer {
    fn draw_scaled(&mut self, src: ImageView<'_>, dst: &mut Canvas) -> Result<(), RasterError> {
        if dst.is_empty() {
            return Err(RasterError::EmptyCanvas {
                width: dst.width(),
                height: dst.height(),
            });
        }
        let (width, height) = (dst.width(), dst.height());
        area_average_into(src, width, height, dst.pixels_mut());
        Ok(())
    }
}

/// Resample `src` to `dst_width x dst_height` into `out` (RGBA, row-major).
///
/// An empty source leaves `out` transparent black.
///
/// # Returns
/// The number of pixels written.
pub fn area_average_into(src: ImageView<'_>, dst_width: u32, dst_height: u32, out: &mut [u8]) -> usize {
    let pixel_count = dst_width as usize * dst_height as usize;
    debug_assert_eq!(out.len(), pixel_count * RGBA_CHANNELS);

    if src.is_empty() || pixel_count == 0 {
        out.fill(0);
        return 0;
    }

    // Source footprint of a single destination pixel
    let cell_w = src.width as f64 / dst_width as f64;
    let cell_h = src.height as f64 / dst_height as f64;

    for dy in 0..dst_height {
        let y0 = dy as f64 * cell_h;
        let y1 = y0 + cell_h;
        for dx in 0..dst_width {
            let x0 = dx as f64 * cell_w;
            let x1 = x0 + cell_w;

            let mut sum = [0f64; 4];
            let mut weight = 0f64;

            let sy_end = (y1.ceil() as u32).min(src.height);
            let sx_end = (x1.ceil() as u32).min(src.width);
            for sy in (y0.floor() as u32)..sy_end {
                let wy = (y1.min(sy as f64 + 1.0) - y0.max(sy as f64)).max(0.0);
                if wy == 0.0 {
                    continue;
                }
                for sx in (x0.floor() as u32)..sx_end {
                    let wx = (x1.min(sx as f64 + 1.0) - x0.max(sx as f64)).max(0.0);
                    if wx == 0.0 {
                        continue;
                    }
                    let w = wx * wy;
                    let px = src.pixel(sx, sy);
                    for (acc, &channel) in sum.iter_mut().zip(px.iter()) {
                        *acc += channel as f64 * w;
                    }
                    weight += w;
                }
            }

            let idx = (dy as usize * dst_width as usize + dx as usize) * RGBA_CHANNELS;
            for c in 0..RGBA_CHANNELS {
                out[idx + c] = if weight > 0.0 {
                    (sum[c] / weight).round().clamp(0.0, 255.0) as u8
                } else {
                    0
                };
            }
        }
    }

    pixel_count
}
