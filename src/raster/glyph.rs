//! Glyph drawing for ink-coverage measurement.

use std::collections::HashMap;
use std::path::Path;

use fontdue::{Font, FontSettings};

use super::{Canvas, RasterError, RGBA_CHANNELS};

/// Family name tried when a requested family is not registered.
pub const FALLBACK_FAMILY: &str = "monospace";

/// Draws single characters into a canvas.
pub trait GlyphRasterizer {
    /// Draw `ch` in black at `size` pixels, top-aligned at the canvas origin.
    ///
    /// Coverage is written to the alpha channel on top of whatever the
    /// canvas already holds; callers clear the canvas between glyphs.
    fn draw_glyph(
        &mut self,
        ch: char,
        font: &str,
        size: f32,
        dst: &mut Canvas,
    ) -> Result<(), RasterError>;
}

impl<G: GlyphRasterizer + ?Sized> GlyphRasterizer for &mut G {
    fn draw_glyph(
        &mut self,
        ch: char,
        font: &str,
        size: f32,
        dst: &mut Canvas,
    ) -> Result<(), RasterError> {
        (**self).draw_glyph(ch, font, size, dst)
    }
}

/// Locally loaded fonts, looked up by family name.
#[derive(Default)]
pub struct FontRegistry {
    fonts: HashMap<String, Font>,
}

impl std::fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut families: Vec<&String> = self.fonts.keys().collect();
        families.sort();
        f.debug_struct("FontRegistry")
            .field("families", &families)
            .finish()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and register font data under `family`, replacing any previous entry.
    pub fn register_bytes(&mut self, family: &str, bytes: Vec<u8>) -> Result<(), RasterError> {
        let font = Font::from_bytes(bytes, FontSettings::default()).map_err(|e| {
            RasterError::unavailable(format!("failed to parse font '{}': {}", family, e))
        })?;
        log::debug!("Registered font family '{}'", family);
        self.fonts.insert(family.to_string(), font);
        Ok(())
    }

    /// Load a TTF/OTF file and register it under `family`.
    pub fn register_file(&mut self, family: &str, path: &Path) -> Result<(), RasterError> {
        let bytes = std::fs::read(path).map_err(|e| {
            RasterError::unavailable(format!(
                "failed to read font file '{}': {}",
                path.display(),
                e
            ))
        })?;
        self.register_bytes(family, bytes)
    }

    pub fn contains(&self, family: &str) -> bool {
        self.fonts.contains_key(family)
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Find a font for `family`: exact name, then case-insensitive, then the
    /// `monospace` fallback.
    pub fn resolve(&self, family: &str) -> Option<&Font> {
        if let Some(font) = self.fonts.get(family) {
            return Some(font);
        }
        let lower = family.to_lowercase();
        self.fonts
            .iter()
            .find(|(name, _)| name.to_lowercase() == lower)
            .map(|(_, font)| font)
            .or_else(|| self.fonts.get(FALLBACK_FAMILY))
    }
}

/// [`GlyphRasterizer`] backed by fontdue's coverage rasterizer.
#[derive(Debug, Default)]
pub struct FontdueRasterizer {
    registry: FontRegistry,
}

impl FontdueRasterizer {
    pub fn new(registry: FontRegistry) -> Self {
        Self { registry }
    }
}

impl GlyphRasterizer for FontdueRasterizer {
    fn draw_glyph(
        &mut self,
        ch: char,
        font: &str,
        size: f32,
        dst: &mut Canvas,
    ) -> Result<(), RasterError> {
        let face = self.registry.resolve(font).ok_or_else(|| {
            RasterError::unavailable(format!(
                "no font registered for '{}' and no '{}' fallback",
                font, FALLBACK_FAMILY
            ))
        })?;

        let (metrics, coverage) = face.rasterize(ch, size);
        if metrics.width == 0 || metrics.height == 0 {
            // Whitespace and other inkless glyphs
            return Ok(());
        }

        // Top of the line box sits at y = 0, so the baseline is one ascent down
        let ascent = face
            .horizontal_line_metrics(size)
            .map(|m| m.ascent)
            .unwrap_or(size);
        let top = ascent.round() as i32 - (metrics.ymin + metrics.height as i32);

        blit_coverage(
            dst,
            &coverage,
            metrics.width,
            metrics.height,
            metrics.xmin,
            top,
        );
        Ok(())
    }
}

/// Composite an 8-bit coverage bitmap onto `dst` as black ink, clipping to
/// the canvas bounds. Alpha is combined source-over.
pub fn blit_coverage(
    dst: &mut Canvas,
    coverage: &[u8],
    width: usize,
    height: usize,
    x: i32,
    y: i32,
) {
    let (canvas_w, canvas_h) = (dst.width() as i32, dst.height() as i32);
    let pixels = dst.pixels_mut();

    for row in 0..height {
        let cy = y + row as i32;
        if cy < 0 || cy >= canvas_h {
            continue;
        }
        for col in 0..width {
            let cx = x + col as i32;
            if cx < 0 || cx >= canvas_w {
                continue;
            }
            let src_a = coverage[row * width + col] as u32;
            if src_a == 0 {
                continue;
            }
            let idx = (cy as usize * canvas_w as usize + cx as usize) * RGBA_CHANNELS;
            let dst_a = pixels[idx + 3] as u32;
            // a = src + dst * (1 - src), in 0..=255 fixed point
            let out_a = src_a + (dst_a * (255 - src_a) + 127) / 255;
            pixels[idx] = 0;
            pixels[idx + 1] = 0;
            pixels[idx + 2] = 0;
            pixels[idx + 3] = out_a.min(255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blit_coverage_writes_alpha() {
        let mut canvas = Canvas::new(3, 3);
        blit_coverage(&mut canvas, &[255, 128, 0, 64], 2, 2, 1, 1);
        let view = canvas.view();
        assert_eq!(view.pixel(1, 1)[3], 255);
        assert_eq!(view.pixel(2, 1)[3], 128);
        assert_eq!(view.pixel(1, 2)[3], 0);
        assert_eq!(view.pixel(2, 2)[3], 64);
        assert_eq!(view.pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_blit_coverage_clips_to_canvas() {
        let mut canvas = Canvas::new(2, 2);
        blit_coverage(&mut canvas, &[200; 9], 3, 3, -1, -1);
        // Only the 2x2 overlap is drawn
        assert_eq!(canvas.alpha_sum(), 4 * 200);
    }

    #[test]
    fn test_blit_coverage_is_source_over() {
        let mut canvas = Canvas::new(1, 1);
        blit_coverage(&mut canvas, &[128], 1, 1, 0, 0);
        blit_coverage(&mut canvas, &[128], 1, 1, 0, 0);
        // 128 + 128 * 127 / 255 ~= 192
        let a = canvas.view().pixel(0, 0)[3];
        assert!((191..=193).contains(&a), "alpha was {}", a);
    }

    #[test]
    fn test_unregistered_font_is_unavailable() {
        let mut rasterizer = FontdueRasterizer::default();
        let mut canvas = Canvas::new(8, 8);
        let err = rasterizer
            .draw_glyph('#', "JetBrains Mono", 4.0, &mut canvas)
            .unwrap_err();
        assert!(matches!(err, RasterError::RenderingUnavailable { .. }));
        assert!(format!("{}", err).contains("JetBrains Mono"));
    }

    #[test]
    fn test_register_invalid_font_bytes_fails() {
        let mut registry = FontRegistry::new();
        let err = registry
            .register_bytes("Broken", b"not a font".to_vec())
            .unwrap_err();
        assert!(matches!(err, RasterError::RenderingUnavailable { .. }));
        assert!(!registry.contains("Broken"));
    }

    #[test]
    fn test_register_missing_file_fails() {
        let mut registry = FontRegistry::new();
        let err = registry
            .register_file("Missing", Path::new("/definitely/not/here.ttf"))
            .unwrap_err();
        assert!(format!("{}", err).contains("not/here.ttf"));
    }
}
