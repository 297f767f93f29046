//! Ink-density calibration of character ramps.

use std::collections::HashMap;

use super::charset::{usable_chars, CharacterRamp, RampError};
use crate::raster::{Canvas, GlyphRasterizer};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RampKey {
    chars: String,
    font: String,
    // f32 bits; sizes come from user settings so exact equality is what we want
    size_bits: u32,
}

/// Orders characters by how much ink they put on screen in a given font.
///
/// Results are cached per `(chars, font, font_size)` for the lifetime of the
/// calibrator. The cache is never evicted; the key space is whatever the user
/// types into the character field, which stays small.
pub struct DensityCalibrator<G> {
    glyphs: G,
    canvas: Canvas,
    cache: HashMap<RampKey, CharacterRamp>,
}

impl<G: GlyphRasterizer> DensityCalibrator<G> {
    pub fn new(glyphs: G) -> Self {
        Self {
            glyphs,
            canvas: Canvas::default(),
            cache: HashMap::new(),
        }
    }

    /// Number of cached ramps.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Sort `chars` by ascending measured ink coverage.
    ///
    /// Each glyph is drawn alone into a `ceil(2 * font_size)` square canvas and
    /// its alpha channel summed. Ties are broken by code point so identical
    /// inputs always produce the identical ramp.
    ///
    /// # Errors
    /// - [`RampError::EmptyRamp`] if `chars` has no usable characters
    /// - [`RampError::Rendering`] if the glyph rasterizer cannot draw in `font`
    pub fn calibrate(
        &mut self,
        chars: &str,
        font: &str,
        font_size: f32,
    ) -> Result<CharacterRamp, RampError> {
        let key = RampKey {
            chars: chars.to_string(),
            font: font.to_string(),
            size_bits: font_size.to_bits(),
        };
        if let Some(ramp) = self.cache.get(&key) {
            log::debug!("Density ramp cache hit for font '{}' at {}px", font, font_size);
            return Ok(ramp.clone());
        }

        let candidates = usable_chars(chars);
        if candidates.is_empty() {
            return Err(RampError::EmptyRamp);
        }

        let side = (font_size * 2.0).ceil().max(1.0) as u32;
        self.canvas.resize(side, side);

        let mut densities: Vec<(char, u64)> = Vec::with_capacity(candidates.len());
        for ch in candidates {
            self.canvas.clear();
            self.glyphs
                .draw_glyph(ch, font, font_size, &mut self.canvas)?;
            densities.push((ch, self.canvas.alpha_sum()));
        }

        densities.sort_by_key(|&(ch, ink)| (ink, ch as u32));
        let ramp = CharacterRamp::new(densities.into_iter().map(|(ch, _)| ch).collect())?;

        log::debug!(
            "Calibrated {}-character ramp for font '{}' at {}px: {}",
            ramp.len(),
            font,
            font_size,
            ramp
        );
        self.cache.insert(key, ramp.clone());
        Ok(ramp)
    }
}
